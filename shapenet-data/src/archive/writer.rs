//! Creating category archives.

use super::PATH_GROUP;
use crate::error::{DataError, Result};
use glam::Vec3;
use hdf5::types::VarLenUnicode;
use ndarray::Array2;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Appends shapes to a freshly created archive.
pub struct ShapeArchiveWriter {
    file: hdf5::File,
    points: hdf5::Group,
    normals: hdf5::Group,
    paths: hdf5::Group,
    path: PathBuf,
    len: usize,
}

impl ShapeArchiveWriter {
    /// Create (or truncate) an archive at `path` with empty groups.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Creating archive {}", path.display());
        let file = hdf5::File::create(&path)?;
        let pcd = file.create_group("pcd")?;
        let points = pcd.create_group("point")?;
        let normals = pcd.create_group("normal")?;
        let paths = file.create_group(PATH_GROUP)?;
        Ok(Self {
            file,
            points,
            normals,
            paths,
            path,
            len: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of shapes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Write one shape under the next index and return that index.
    pub fn push(&mut self, points: &[Vec3], normals: &[Vec3], render_path: &str) -> Result<usize> {
        let key = self.len.to_string();

        self.points
            .new_dataset_builder()
            .with_data(&to_array(points)?)
            .create(key.as_str())?;
        self.normals
            .new_dataset_builder()
            .with_data(&to_array(normals)?)
            .create(key.as_str())?;

        let value = render_path
            .parse::<VarLenUnicode>()
            .map_err(|e| hdf5::Error::from(e.to_string()))?;
        self.paths
            .new_dataset::<VarLenUnicode>()
            .shape(())
            .create(key.as_str())?
            .write_scalar(&value)?;

        self.len += 1;
        Ok(self.len - 1)
    }

    /// Flush and close the archive.
    pub fn finish(self) -> Result<PathBuf> {
        self.file.flush()?;
        debug!("Wrote {} shapes to {}", self.len, self.path.display());
        Ok(self.path)
    }
}

pub(crate) fn to_array(vectors: &[Vec3]) -> Result<Array2<f32>> {
    let flat: Vec<f32> = vectors.iter().flat_map(|v| v.to_array()).collect();
    Array2::from_shape_vec((vectors.len(), 3), flat).map_err(|_| DataError::InvalidShape {
        key: "vec3 buffer".to_string(),
        shape: vec![vectors.len(), 3],
    })
}
