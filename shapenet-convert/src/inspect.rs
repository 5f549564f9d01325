//! `inspect` subcommand: load a converted split like the training loader does.

use clap::Args;
use shapenet_data::{
    CategorySelector, DatasetConfig, InputDim, Mode, Result, ShapeNetDataset,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Root containing ShapeNetAtlasNetH5
    #[arg(long, default_value = "data")]
    data_root: PathBuf,

    /// train, valid or test
    #[arg(long, default_value = "valid", value_parser = parse_mode)]
    mode: Mode,

    /// Input dimensionality (2 uses the planar archive)
    #[arg(long, default_value_t = 3)]
    indim: u32,

    /// Only load this manifest entry
    #[arg(long)]
    category: Option<usize>,

    #[arg(long, default_value_t = 1024)]
    num_points: usize,

    /// Also read normals
    #[arg(long)]
    normals: bool,

    /// Take the first points and attach precomputed transforms
    #[arg(long)]
    freeze: bool,

    #[arg(long)]
    seed: Option<u64>,

    /// Number of leading samples to print
    #[arg(long, default_value_t = 3)]
    items: usize,
}

fn parse_mode(value: &str) -> std::result::Result<Mode, String> {
    value.parse().map_err(|e: shapenet_data::DataError| e.to_string())
}

impl InspectArgs {
    fn to_config(&self) -> Result<DatasetConfig> {
        Ok(DatasetConfig {
            indim: InputDim::try_from(self.indim)?,
            mode: self.mode,
            category: self
                .category
                .map_or(CategorySelector::All, CategorySelector::Index),
            require_normal: self.normals,
            num_points: self.num_points,
            freeze: self.freeze,
            seed: self.seed,
            ..DatasetConfig::new(self.data_root.clone())
        })
    }
}

pub fn run(args: InspectArgs) -> Result<()> {
    let config = args.to_config()?;
    let mut dataset = ShapeNetDataset::from_config(&config)?;

    info!("{} samples, cuts {:?}", dataset.len(), dataset.cuts());
    for path in dataset.archive_paths() {
        info!("  {}", path.display());
    }

    for i in 0..args.items.min(dataset.len()) {
        let sample = dataset.get(i)?;
        let centroid =
            sample.points.iter().copied().sum::<glam::Vec3>() / sample.num_points().max(1) as f32;
        info!(
            "#{} label {} points {} normals {} centroid {:.3?} path {}",
            i,
            sample.label,
            sample.num_points(),
            sample.normals.as_ref().map_or(0, Vec::len),
            centroid,
            sample.path
        );
        if let Some(frozen) = sample.frozen {
            info!("    transform for item {}: {:?}", frozen.item_index, frozen.transform);
        }
    }
    Ok(())
}
