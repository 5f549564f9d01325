//! Core data types for point clouds and dataset samples.
//!
//! These are CPU-side representations handed to the training code.

use glam::{Mat4, Vec3};

/// A point cloud with optional per-point normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    /// Positions in object space.
    pub points: Vec<Vec3>,
    /// Unit normals aligned with `points`, when available.
    pub normals: Option<Vec<Vec3>>,
}

impl PointCloud {
    /// Create a cloud without normals.
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            normals: None,
        }
    }

    /// Create a cloud with aligned normals.
    pub fn with_normals(points: Vec<Vec3>, normals: Vec<Vec3>) -> Self {
        debug_assert_eq!(points.len(), normals.len());
        Self {
            points,
            normals: Some(normals),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Gather the points (and normals) at `indices`, in that order.
    ///
    /// Indices must be in bounds.
    pub fn select(&self, indices: &[usize]) -> PointCloud {
        let points = indices.iter().map(|&i| self.points[i]).collect();
        let normals = self
            .normals
            .as_ref()
            .map(|normals| indices.iter().map(|&i| normals[i]).collect());
        PointCloud { points, normals }
    }
}

/// Extra data attached to a sample when randomness is frozen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrozenItem {
    /// Precomputed rigid transform for this sample.
    pub transform: Mat4,
    /// Global index the sample was requested with.
    pub item_index: usize,
}

/// One item produced by [`crate::ShapeNetDataset::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Subsampled positions, exactly `num_points` long.
    pub points: Vec<Vec3>,
    /// Normals aligned with `points`, when requested.
    pub normals: Option<Vec<Vec3>>,
    /// Index of the archive (category) the sample came from.
    pub label: usize,
    /// Rendering directory for the shape.
    pub path: String,
    pub frozen: Option<FrozenItem>,
}

impl Sample {
    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}
