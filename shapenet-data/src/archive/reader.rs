//! Read-only access to a single category archive.

use super::{NORMAL_GROUP, PATH_GROUP, POINT_GROUP};
use crate::error::{DataError, Result};
use glam::Vec3;
use hdf5::types::VarLenUnicode;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An open category archive.
pub struct ShapeArchive {
    file: hdf5::File,
    path: PathBuf,
}

impl ShapeArchive {
    /// Open an archive read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Opening archive {}", path.display());
        let file = hdf5::File::open(&path)?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of shapes, i.e. members of `pcd/point`.
    pub fn len(&self) -> Result<usize> {
        Ok(self.file.group(POINT_GROUP)?.len() as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn read_points(&self, index: usize) -> Result<Vec<Vec3>> {
        self.read_vectors(&format!("{POINT_GROUP}/{index}"))
    }

    pub fn read_normals(&self, index: usize) -> Result<Vec<Vec3>> {
        self.read_vectors(&format!("{NORMAL_GROUP}/{index}"))
    }

    /// Rendering directory recorded for the shape.
    pub fn read_path(&self, index: usize) -> Result<String> {
        let value: VarLenUnicode = self
            .file
            .dataset(&format!("{PATH_GROUP}/{index}"))?
            .read_scalar()?;
        Ok(value.as_str().to_string())
    }

    // 2-column data (the planar archive) is lifted to z = 0.
    fn read_vectors(&self, key: &str) -> Result<Vec<Vec3>> {
        let array = self.file.dataset(key)?.read_2d::<f32>()?;
        match array.ncols() {
            3 => Ok(array
                .rows()
                .into_iter()
                .map(|r| Vec3::new(r[0], r[1], r[2]))
                .collect()),
            2 => Ok(array
                .rows()
                .into_iter()
                .map(|r| Vec3::new(r[0], r[1], 0.0))
                .collect()),
            _ => Err(DataError::InvalidShape {
                key: key.to_string(),
                shape: array.shape().to_vec(),
            }),
        }
    }
}

impl std::fmt::Debug for ShapeArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeArchive").field("path", &self.path).finish()
    }
}
