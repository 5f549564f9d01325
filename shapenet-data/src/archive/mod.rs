//! HDF5 archive layout shared by the dataset reader and the archive builder.
//!
//! A category archive holds three groups keyed by the decimal shape index:
//!
//! ```text
//! pcd/point/{i}    f32 [N, 3]
//! pcd/normal/{i}   f32 [N, 3]
//! path/{i}         variable-length UTF-8 scalar
//! ```
//!
//! The transform archive holds one `transform` dataset of shape `[count, 4, 4]`.

mod reader;
mod transforms;
mod writer;

pub use reader::ShapeArchive;
pub use transforms::{read_transforms, write_transforms};
pub use writer::ShapeArchiveWriter;

pub(crate) const POINT_GROUP: &str = "pcd/point";
pub(crate) const NORMAL_GROUP: &str = "pcd/normal";
pub(crate) const PATH_GROUP: &str = "path";
pub(crate) const TRANSFORM_DATASET: &str = "transform";
