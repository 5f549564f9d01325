//! Dataset and conversion configuration.
//!
//! [`DatasetConfig`] can be deserialized from JSON so training scripts can keep
//! loader settings next to their other hyperparameters. [`BuildConfig`] drives
//! the archive builder.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory (under the data root) holding converted archives and manifests.
pub const ARCHIVE_DIR: &str = "ShapeNetAtlasNetH5";
/// Directory (under the data root) holding per-synset rendering folders.
pub const RENDERINGS_DIR: &str = "ShapeNetRenderings";
/// Directory (under the data root) holding per-synset `ply/` folders.
pub const POINT_CLOUD_DIR: &str = "customShapeNet";
/// Category map file (under the data root).
pub const CATEGORY_FILE: &str = "synsetoffset2category.txt";
/// Precomputed evaluation transforms (under the data root).
pub const TRANSFORM_FILE: &str = "random_T_100k_uni-180-0.2.h5";
/// The single archive used for 2D inputs.
pub const PLANE_2D_ARCHIVE: &str = "plane_2d.h5";
/// Point count every converted ShapeNet cloud is expected to have.
pub const EXPECTED_POINTS: usize = 30_000;

/// On-disk partition. There is no separate test split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Valid,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Valid => "valid",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Split::Train),
            "valid" => Ok(Split::Valid),
            other => Err(DataError::InvalidMode(other.to_string())),
        }
    }
}

/// Mode requested by the caller. `Test` reads the validation split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Train,
    Valid,
    Test,
}

impl Mode {
    pub fn split(&self) -> Split {
        match self {
            Mode::Train => Split::Train,
            Mode::Valid | Mode::Test => Split::Valid,
        }
    }
}

impl FromStr for Mode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Mode::Train),
            "valid" => Ok(Mode::Valid),
            "test" => Ok(Mode::Test),
            other => Err(DataError::InvalidMode(other.to_string())),
        }
    }
}

/// Dimensionality of the model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum InputDim {
    Two,
    #[default]
    Three,
}

impl TryFrom<u32> for InputDim {
    type Error = DataError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            2 => Ok(InputDim::Two),
            3 => Ok(InputDim::Three),
            other => Err(DataError::InvalidDim(other)),
        }
    }
}

impl From<InputDim> for u32 {
    fn from(dim: InputDim) -> u32 {
        match dim {
            InputDim::Two => 2,
            InputDim::Three => 3,
        }
    }
}

/// Which manifest entries to load.
///
/// In JSON this is an integer index, with `-1` (or `null`) meaning all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<i64>", into = "Option<i64>")]
pub enum CategorySelector {
    #[default]
    All,
    Index(usize),
}

impl TryFrom<Option<i64>> for CategorySelector {
    type Error = String;

    fn try_from(value: Option<i64>) -> std::result::Result<Self, String> {
        match value {
            None | Some(-1) => Ok(CategorySelector::All),
            Some(i) if i >= 0 => Ok(CategorySelector::Index(i as usize)),
            Some(i) => Err(format!("invalid category selector {i}")),
        }
    }
}

impl From<CategorySelector> for Option<i64> {
    fn from(selector: CategorySelector) -> Option<i64> {
        match selector {
            CategorySelector::All => None,
            CategorySelector::Index(i) => Some(i as i64),
        }
    }
}

fn default_num_points() -> usize {
    1024
}

/// Loader settings, mirroring [`crate::DatasetBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub data_root: PathBuf,
    #[serde(default)]
    pub indim: InputDim,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub category: CategorySelector,
    #[serde(default)]
    pub require_normal: bool,
    #[serde(default = "default_num_points")]
    pub num_points: usize,
    #[serde(default)]
    pub freeze: bool,
    /// Seed for point subsampling. OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DatasetConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            indim: InputDim::default(),
            mode: Mode::default(),
            category: CategorySelector::default(),
            require_normal: false,
            num_points: default_num_points(),
            freeze: false,
            seed: None,
        }
    }

    /// Load a config from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Directory holding manifests and per-split archive folders.
    pub fn archive_dir(&self) -> PathBuf {
        self.data_root.join(ARCHIVE_DIR)
    }
}

/// Settings for [`crate::ArchiveBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub data_root: PathBuf,
    pub expected_points: usize,
    pub output_dir: PathBuf,
}

impl BuildConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        let data_root = data_root.into();
        Self {
            output_dir: data_root.join(ARCHIVE_DIR),
            data_root,
            expected_points: EXPECTED_POINTS,
        }
    }

    pub fn with_expected_points(mut self, expected_points: usize) -> Self {
        self.expected_points = expected_points;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn category_file(&self) -> PathBuf {
        self.data_root.join(CATEGORY_FILE)
    }

    pub fn renderings_dir(&self) -> PathBuf {
        self.data_root.join(RENDERINGS_DIR)
    }

    pub fn point_cloud_dir(&self) -> PathBuf {
        self.data_root.join(POINT_CLOUD_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_mode_reads_valid_split() {
        assert_eq!(Mode::Test.split(), Split::Valid);
        assert_eq!(Mode::Valid.split(), Split::Valid);
        assert_eq!(Mode::Train.split(), Split::Train);
        assert!("bogus".parse::<Mode>().is_err());
    }

    #[test]
    fn test_input_dim_rejects_other_values() {
        assert_eq!(InputDim::try_from(2).unwrap(), InputDim::Two);
        assert!(matches!(InputDim::try_from(4), Err(DataError::InvalidDim(4))));
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config: DatasetConfig = serde_json::from_str(r#"{ "data_root": "data" }"#).unwrap();
        assert_eq!(config, DatasetConfig::new("data"));
        assert_eq!(config.num_points, 1024);
        assert_eq!(config.indim, InputDim::Three);
    }

    #[test]
    fn test_config_from_json_full() {
        let config: DatasetConfig = serde_json::from_str(
            r#"{
                "data_root": "/mnt/shapenet",
                "indim": 2,
                "mode": "test",
                "category": 4,
                "require_normal": true,
                "num_points": 2048,
                "freeze": true,
                "seed": 7
            }"#,
        )
        .unwrap();
        assert_eq!(config.indim, InputDim::Two);
        assert_eq!(config.mode, Mode::Test);
        assert_eq!(config.category, CategorySelector::Index(4));
        assert!(config.require_normal && config.freeze);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.archive_dir(), PathBuf::from("/mnt/shapenet/ShapeNetAtlasNetH5"));
    }

    #[test]
    fn test_category_selector_sentinel() {
        let all: CategorySelector = serde_json::from_str("-1").unwrap();
        assert_eq!(all, CategorySelector::All);
        assert!(serde_json::from_str::<CategorySelector>("-3").is_err());
        assert!(serde_json::from_str::<DatasetConfig>(r#"{ "data_root": "d", "indim": 5 }"#).is_err());
    }
}
