//! ShapeNet Data Crate
//!
//! Point-cloud dataset loading for training 3D generative and reconstruction
//! models. Per-category HDF5 archives are exposed as one indexable dataset with
//! per-item subsampling, and [`ArchiveBuilder`] converts a ShapeNet tree of
//! `.points.ply` files into those archives.

pub mod archive;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ply;
pub mod sampling;
pub mod types;

pub use archive::{ShapeArchive, ShapeArchiveWriter, read_transforms, write_transforms};
pub use builder::{ArchiveBuilder, BuildReport, CategorySummary, match_shapes, split_shapes};
pub use catalog::{Category, CategoryMap, read_manifest, write_manifest};
pub use config::{BuildConfig, CategorySelector, DatasetConfig, InputDim, Mode, Split};
pub use dataset::{Dataset, DatasetBuilder, ShapeNetDataset};
pub use error::{DataError, Result};
pub use ply::{PlyVertex, load_oriented_points, load_point_cloud};
pub use sampling::sample_indices;
pub use types::{FrozenItem, PointCloud, Sample};
