//! ShapeNet Convert
//!
//! Converts a ShapeNet tree of `.points.ply` files into per-category HDF5
//! archives, and inspects converted datasets.
//!
//! Features:
//! - `convert`: builds train and valid archives plus their manifests
//! - `inspect`: opens a split the way the training loader does and prints samples

mod inspect;

use clap::{Parser, Subcommand};
use shapenet_data::{ArchiveBuilder, BuildConfig, Split};
use std::path::PathBuf;
use tracing::{error, info};

/// ShapeNet point-cloud archive tool
#[derive(Parser, Debug)]
#[command(name = "shapenet-convert")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert PLY point clouds into per-category archives
    Convert {
        /// Root containing synsetoffset2category.txt, ShapeNetRenderings and customShapeNet
        #[arg(long, default_value = "data")]
        data_root: PathBuf,

        /// Only convert this split (train or valid); both by default
        #[arg(long, value_parser = parse_split)]
        split: Option<Split>,

        /// Point count every cloud is expected to have
        #[arg(long, default_value_t = shapenet_data::config::EXPECTED_POINTS)]
        expected_points: usize,

        /// Output directory (defaults to <data-root>/ShapeNetAtlasNetH5)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Open a converted split and print a few samples
    Inspect(inspect::InspectArgs),
}

fn parse_split(value: &str) -> Result<Split, String> {
    value.parse().map_err(|e: shapenet_data::DataError| e.to_string())
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}

fn convert(
    data_root: PathBuf,
    split: Option<Split>,
    expected_points: usize,
    output_dir: Option<PathBuf>,
) -> shapenet_data::Result<()> {
    let mut config = BuildConfig::new(data_root).with_expected_points(expected_points);
    if let Some(output_dir) = output_dir {
        config = config.with_output_dir(output_dir);
    }
    let builder = ArchiveBuilder::new(config);

    let splits = match split {
        Some(split) => vec![split],
        None => vec![Split::Train, Split::Valid],
    };
    for split in splits {
        let report = builder.build(split)?;
        for category in &report.categories {
            info!(
                "[{}] {} -> {} ({} shapes)",
                category.label,
                category.name,
                category.archive.display(),
                category.shapes
            );
        }
        if !report.skipped.is_empty() {
            info!("Skipped (no matched shapes): {:?}", report.skipped);
        }
        info!(
            "{}: {} shapes, manifest {}",
            split,
            report.total_shapes(),
            report.manifest.display()
        );
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    let result = match args.command {
        Command::Convert {
            data_root,
            split,
            expected_points,
            output_dir,
        } => convert(data_root, split, expected_points, output_dir),
        Command::Inspect(inspect_args) => inspect::run(inspect_args),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_defaults_to_both_splits() {
        let args = Args::try_parse_from(["shapenet-convert", "convert"]).unwrap();
        match args.command {
            Command::Convert {
                data_root,
                split,
                expected_points,
                ..
            } => {
                assert_eq!(data_root, PathBuf::from("data"));
                assert_eq!(split, None);
                assert_eq!(expected_points, 30_000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_split_flag_is_validated() {
        let args =
            Args::try_parse_from(["shapenet-convert", "convert", "--split", "valid"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Convert {
                split: Some(Split::Valid),
                ..
            }
        ));
        assert!(Args::try_parse_from(["shapenet-convert", "convert", "--split", "test"]).is_err());
    }

    #[test]
    fn test_inspect_accepts_test_mode() {
        let args = Args::try_parse_from([
            "shapenet-convert",
            "inspect",
            "--mode",
            "test",
            "--category",
            "2",
            "--freeze",
        ])
        .unwrap();
        assert!(matches!(args.command, Command::Inspect(_)));
    }
}
