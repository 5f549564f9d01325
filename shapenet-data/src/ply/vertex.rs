//! PLY vertex data structures

use glam::Vec3;

/// Oriented point extracted from a PLY vertex element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlyVertex {
    pub position: Vec3,
    pub normal: Option<Vec3>,
}
