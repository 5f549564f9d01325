//! Conversion round trip example
//!
//! Converts the train and valid splits of a ShapeNet tree, then opens the
//! valid split in test mode and prints the first sample.
//!
//! Usage:
//!   cargo run --example convert_then_load -- <data_root>

use shapenet_data::{ArchiveBuilder, BuildConfig, Mode, ShapeNetDataset, Split};
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let data_root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("Please provide the ShapeNet data root")?;

    let builder = ArchiveBuilder::new(BuildConfig::new(&data_root));
    for split in [Split::Train, Split::Valid] {
        let report = builder.build(split)?;
        info!(
            "{}: {} categories, {} shapes",
            split,
            report.categories.len(),
            report.total_shapes()
        );
    }

    let mut dataset = ShapeNetDataset::builder(&data_root)
        .mode(Mode::Test)
        .require_normal(true)
        .num_points(2048)
        .seed(0)
        .open()?;

    if dataset.is_empty() {
        warn!("Validation split is empty");
        return Ok(());
    }

    let sample = dataset.get(0)?;
    info!(
        "First validation sample: label {}, {} points, rendering {}",
        sample.label,
        sample.num_points(),
        sample.path
    );
    Ok(())
}
