//! Error types for archive loading and conversion.

use std::path::PathBuf;

/// Errors that can occur while reading or writing ShapeNet archives.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    #[error("PLY error: {0}")]
    Ply(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Unsupported input dimension {0} (expected 2 or 3)")]
    InvalidDim(u32),

    #[error("Unknown mode '{0}' (expected train, valid or test)")]
    InvalidMode(String),

    #[error("{}:{line}: {message}", .path.display())]
    CategoryMap {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Manifest {} lists no archives", .0.display())]
    EmptyManifest(PathBuf),

    #[error("Category index {index} out of range ({available} archives in manifest)")]
    CategoryOutOfRange { index: usize, available: usize },

    #[error("Sample index {index} out of range (dataset length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Cannot sample {requested} points from a cloud of {available}")]
    InsufficientPoints { requested: usize, available: usize },

    #[error("No transform for sample {index} ({count} transforms loaded)")]
    MissingTransform { index: usize, count: usize },

    #[error("Dataset '{key}' has unexpected shape {shape:?}")]
    InvalidShape { key: String, shape: Vec<usize> },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DataError>;
