//! Precomputed rigid transforms used when randomness is frozen.
//!
//! Matrices are stored row-major (`[count, 4, 4]`), the layout numpy writes.

use super::TRANSFORM_DATASET;
use crate::error::{DataError, Result};
use glam::Mat4;
use ndarray::Array3;
use std::path::Path;
use tracing::info;

/// Load every transform from the `transform` dataset of `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_transforms(path: impl AsRef<Path>) -> Result<Vec<Mat4>> {
    let file = hdf5::File::open(path.as_ref())?;
    let array = file.dataset(TRANSFORM_DATASET)?.read_dyn::<f32>()?;

    let shape = array.shape().to_vec();
    if shape.len() != 3 || shape[1] != 4 || shape[2] != 4 {
        return Err(DataError::InvalidShape {
            key: TRANSFORM_DATASET.to_string(),
            shape,
        });
    }

    let flat: Vec<f32> = array.iter().copied().collect();
    let transforms: Vec<Mat4> = flat
        .chunks_exact(16)
        .map(|rows| {
            let mut cols = [0.0f32; 16];
            cols.copy_from_slice(rows);
            Mat4::from_cols_array(&cols).transpose()
        })
        .collect();

    info!("Loaded {} frozen transforms", transforms.len());
    Ok(transforms)
}

/// Write `transforms` as a `[count, 4, 4]` row-major dataset, replacing `path`.
pub fn write_transforms(path: impl AsRef<Path>, transforms: &[Mat4]) -> Result<()> {
    let flat: Vec<f32> = transforms
        .iter()
        .flat_map(|m| m.transpose().to_cols_array())
        .collect();
    let array = Array3::from_shape_vec((transforms.len(), 4, 4), flat).map_err(|_| {
        DataError::InvalidShape {
            key: TRANSFORM_DATASET.to_string(),
            shape: vec![transforms.len(), 4, 4],
        }
    })?;

    let file = hdf5::File::create(path.as_ref())?;
    file.new_dataset_builder()
        .with_data(&array)
        .create(TRANSFORM_DATASET)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_transforms_keep_translation_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("T.h5");
        let transforms = vec![
            Mat4::IDENTITY,
            Mat4::from_rotation_translation(Quat::from_rotation_y(0.5), Vec3::new(0.1, -0.2, 0.3)),
        ];
        write_transforms(&path, &transforms).unwrap();

        let loaded = read_transforms(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded[1].abs_diff_eq(transforms[1], 1e-6));
        assert_eq!(loaded[1].w_axis.truncate(), Vec3::new(0.1, -0.2, 0.3));

        // Row-major on disk: translation sits in the last column of each row.
        let file = hdf5::File::open(&path).unwrap();
        let raw = file.dataset(TRANSFORM_DATASET).unwrap().read_dyn::<f32>().unwrap();
        assert_eq!(raw.shape(), &[2, 4, 4]);
        assert_eq!(raw[[1, 0, 3]], 0.1);
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.h5");
        let file = hdf5::File::create(&path).unwrap();
        let data = ndarray::Array2::<f32>::zeros((3, 16));
        file.new_dataset_builder()
            .with_data(&data)
            .create(TRANSFORM_DATASET)
            .unwrap();
        drop(file);

        let err = read_transforms(&path).unwrap_err();
        assert!(matches!(err, DataError::InvalidShape { .. }));
    }
}
