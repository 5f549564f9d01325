//! Indexable view over one or more category archives.
//!
//! The archives of a split are concatenated into one global index space. Each
//! archive is opened once at construction to read its length and closed again;
//! the handle is reacquired the first time an item from it is requested and
//! kept until [`ShapeNetDataset::close_all`] or drop.

use crate::archive::{ShapeArchive, read_transforms};
use crate::catalog::read_manifest;
use crate::config::{
    CategorySelector, DatasetConfig, InputDim, Mode, PLANE_2D_ARCHIVE, TRANSFORM_FILE,
};
use crate::error::{DataError, Result};
use crate::sampling::sample_indices;
use crate::types::{FrozenItem, PointCloud, Sample};
use glam::Mat4;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An indexed collection of samples, as consumed by a training loop.
pub trait Dataset {
    /// Total number of samples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produce the sample at `index`.
    fn get(&mut self, index: usize) -> Result<Sample>;
}

/// Lifecycle of one archive handle. Every archive is probed at construction,
/// so slots start out `Closed`.
#[derive(Debug)]
enum ArchiveSlot {
    Open(ShapeArchive),
    /// Released; reopened on next access.
    Closed,
}

/// Point-cloud dataset backed by per-category HDF5 archives.
#[derive(Debug)]
pub struct ShapeNetDataset {
    paths: Vec<PathBuf>,
    slots: Vec<ArchiveSlot>,
    cuts: Vec<usize>,
    len: usize,
    num_points: usize,
    require_normal: bool,
    frozen: bool,
    transforms: Option<Vec<Mat4>>,
    rng: StdRng,
}

/// Builder for [`ShapeNetDataset`].
pub struct DatasetBuilder {
    config: DatasetConfig,
    rng: Option<StdRng>,
}

impl DatasetBuilder {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self::from_config(DatasetConfig::new(data_root))
    }

    pub fn from_config(config: DatasetConfig) -> Self {
        Self { config, rng: None }
    }

    pub fn indim(mut self, indim: InputDim) -> Self {
        self.config.indim = indim;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn category(mut self, category: CategorySelector) -> Self {
        self.config.category = category;
        self
    }

    pub fn require_normal(mut self, require_normal: bool) -> Self {
        self.config.require_normal = require_normal;
        self
    }

    pub fn num_points(mut self, num_points: usize) -> Self {
        self.config.num_points = num_points;
        self
    }

    /// Disable random subsampling and attach precomputed transforms.
    pub fn freeze(mut self, freeze: bool) -> Self {
        self.config.freeze = freeze;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Use an explicit random source. Takes precedence over [`Self::seed`].
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn open(self) -> Result<ShapeNetDataset> {
        let rng = match (self.rng, self.config.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => StdRng::seed_from_u64(seed),
            (None, None) => StdRng::from_os_rng(),
        };
        ShapeNetDataset::open_with_rng(&self.config, rng)
    }
}

/// Resolve the archive file names a config refers to.
///
/// 2D inputs always use the single planar archive and never read the manifest.
pub fn resolve_archive_names(config: &DatasetConfig) -> Result<Vec<String>> {
    if config.indim == InputDim::Two {
        return Ok(vec![PLANE_2D_ARCHIVE.to_string()]);
    }

    let manifest = config
        .archive_dir()
        .join(format!("{}_cat.txt", config.mode.split()));
    let mut names = read_manifest(&manifest)?;
    if names.is_empty() {
        return Err(DataError::EmptyManifest(manifest));
    }

    if let CategorySelector::Index(index) = config.category {
        if index >= names.len() {
            return Err(DataError::CategoryOutOfRange {
                index,
                available: names.len(),
            });
        }
        names = vec![names.swap_remove(index)];
    }
    Ok(names)
}

impl ShapeNetDataset {
    pub fn builder(data_root: impl Into<PathBuf>) -> DatasetBuilder {
        DatasetBuilder::new(data_root)
    }

    pub fn from_config(config: &DatasetConfig) -> Result<Self> {
        DatasetBuilder::from_config(config.clone()).open()
    }

    #[tracing::instrument(skip_all, fields(root = %config.data_root.display(), mode = ?config.mode))]
    fn open_with_rng(config: &DatasetConfig, rng: StdRng) -> Result<Self> {
        let transforms = if config.freeze {
            info!("Freezing data. No randomness!");
            Some(read_transforms(config.data_root.join(TRANSFORM_FILE))?)
        } else {
            None
        };

        let names = resolve_archive_names(config)?;
        info!("Loading archives: {:?}", names);

        let paths: Vec<PathBuf> = names.iter().map(|name| archive_path(config, name)).collect();

        let mut cuts = Vec::with_capacity(paths.len());
        let mut total = 0;
        for path in &paths {
            // Probe the length and release the handle right away.
            let count = ShapeArchive::open(path)?.len()?;
            debug!("{}: {} shapes", path.display(), count);
            total += count;
            cuts.push(total);
        }

        if let Some(transforms) = &transforms {
            if transforms.len() < total {
                return Err(DataError::MissingTransform {
                    index: total - 1,
                    count: transforms.len(),
                });
            }
        }

        info!("Dataset ready: {} samples in {} archives", total, paths.len());
        Ok(Self {
            slots: paths.iter().map(|_| ArchiveSlot::Closed).collect(),
            paths,
            cuts,
            len: total,
            num_points: config.num_points,
            require_normal: config.require_normal,
            frozen: config.freeze,
            transforms,
            rng,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cumulative archive lengths; `cuts()[d]` is the end of archive `d`.
    pub fn cuts(&self) -> &[usize] {
        &self.cuts
    }

    pub fn archive_paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of archives currently holding an open handle.
    pub fn open_archives(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, ArchiveSlot::Open(_)))
            .count()
    }

    /// Map a global index to `(archive, local index)`.
    pub fn locate(&self, index: usize) -> Option<(usize, usize)> {
        locate_in(&self.cuts, index)
    }

    /// Release every open archive handle. Later reads reopen lazily.
    pub fn close_all(&mut self) {
        for slot in &mut self.slots {
            if matches!(slot, ArchiveSlot::Open(_)) {
                *slot = ArchiveSlot::Closed;
            }
        }
    }

    fn archive(&mut self, d: usize) -> Result<&ShapeArchive> {
        let slot = &mut self.slots[d];
        if !matches!(slot, ArchiveSlot::Open(_)) {
            debug!("Reopening {}", self.paths[d].display());
            *slot = ArchiveSlot::Open(ShapeArchive::open(&self.paths[d])?);
        }
        match slot {
            ArchiveSlot::Open(archive) => Ok(archive),
            ArchiveSlot::Closed => unreachable!("slot was just opened"),
        }
    }

    /// Read and subsample the sample at global `index`.
    pub fn get(&mut self, index: usize) -> Result<Sample> {
        let (d, local) = self.locate(index).ok_or(DataError::IndexOutOfRange {
            index,
            len: self.len,
        })?;

        let require_normal = self.require_normal;
        let (cloud, path) = {
            let archive = self.archive(d)?;
            let points = archive.read_points(local)?;
            let path = archive.read_path(local)?;
            let normals = if require_normal {
                let normals = archive.read_normals(local)?;
                if normals.len() != points.len() {
                    return Err(DataError::InvalidShape {
                        key: format!("{}:pcd/normal/{}", archive.path().display(), local),
                        shape: vec![normals.len(), 3],
                    });
                }
                Some(normals)
            } else {
                None
            };
            (PointCloud { points, normals }, path)
        };

        let indices = sample_indices(cloud.len(), self.num_points, self.frozen, &mut self.rng)?;
        let picked = cloud.select(&indices);

        let frozen = match &self.transforms {
            Some(transforms) => {
                let transform = *transforms.get(index).ok_or(DataError::MissingTransform {
                    index,
                    count: transforms.len(),
                })?;
                Some(FrozenItem {
                    transform,
                    item_index: index,
                })
            }
            None => None,
        };

        Ok(Sample {
            points: picked.points,
            normals: picked.normals,
            label: d,
            path,
            frozen,
        })
    }
}

impl Dataset for ShapeNetDataset {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&mut self, index: usize) -> Result<Sample> {
        ShapeNetDataset::get(self, index)
    }
}

/// First archive whose cumulative length exceeds `index`, and the offset into it.
pub fn locate_in(cuts: &[usize], index: usize) -> Option<(usize, usize)> {
    let d = cuts.partition_point(|&cut| cut <= index);
    if d == cuts.len() {
        return None;
    }
    let start = if d == 0 { 0 } else { cuts[d - 1] };
    Some((d, index - start))
}

/// Path of the archive `name` for `config`'s split.
pub fn archive_path(config: &DatasetConfig, name: &str) -> PathBuf {
    config
        .archive_dir()
        .join(config.mode.split().as_str())
        .join(Path::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_every_index() {
        let cuts = [3, 3, 7, 8];
        let lens = [3, 0, 4, 1];
        for i in 0..8 {
            let (d, local) = locate_in(&cuts, i).unwrap();
            assert!(local < lens[d], "index {i} -> ({d}, {local})");
        }
        assert_eq!(locate_in(&cuts, 0), Some((0, 0)));
        assert_eq!(locate_in(&cuts, 3), Some((2, 0)));
        assert_eq!(locate_in(&cuts, 7), Some((3, 0)));
        assert_eq!(locate_in(&cuts, 8), None);
    }

    #[test]
    fn test_locate_empty() {
        assert_eq!(locate_in(&[], 0), None);
        assert_eq!(locate_in(&[0, 0], 0), None);
    }

    #[test]
    fn test_two_dim_ignores_selector_and_manifest() {
        let config = DatasetConfig {
            indim: InputDim::Two,
            category: CategorySelector::Index(42),
            ..DatasetConfig::new("/does/not/exist")
        };
        assert_eq!(resolve_archive_names(&config).unwrap(), vec![PLANE_2D_ARCHIVE]);
    }

    #[test]
    fn test_archive_path_uses_split() {
        let config = DatasetConfig {
            mode: Mode::Test,
            ..DatasetConfig::new("data")
        };
        assert_eq!(
            archive_path(&config, "Chair.h5"),
            PathBuf::from("data/ShapeNetAtlasNetH5/valid/Chair.h5")
        );
    }
}
