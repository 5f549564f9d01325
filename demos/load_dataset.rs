//! Dataset loading example
//!
//! Opens a converted split from a JSON loader config and walks one shuffled
//! epoch, reporting per-category sample counts and the bounding box of the
//! subsampled clouds.
//!
//! Usage:
//!   cargo run --example load_dataset -- <config.json>
//!
//! Example config:
//!   { "data_root": "data", "mode": "train", "num_points": 2048, "seed": 0 }

use glam::Vec3;
use shapenet_data::{DatasetConfig, ShapeNetDataset};
use std::error::Error;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .ok_or("Please provide a dataset config path")?;
    let config = DatasetConfig::from_json_path(&config_path)?;
    info!("Loaded config from {}: {:?}", config_path, config);

    let mut dataset = ShapeNetDataset::from_config(&config)?;
    info!("{} samples across {} archives", dataset.len(), dataset.archive_paths().len());

    let mut per_label = vec![0usize; dataset.archive_paths().len()];
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);

    // Stride through the index space so every archive gets reopened.
    let len = dataset.len();
    let stride = (len / 64).max(1);
    for i in (0..len).step_by(stride) {
        let sample = dataset.get(i)?;
        per_label[sample.label] += 1;
        for p in &sample.points {
            min = min.min(*p);
            max = max.max(*p);
        }
    }

    for (label, count) in per_label.iter().enumerate() {
        info!("label {}: {} samples visited", label, count);
    }
    info!("Bounds: {:?} .. {:?}", min, max);

    dataset.close_all();
    Ok(())
}
