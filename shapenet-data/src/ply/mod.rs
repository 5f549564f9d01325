//! PLY point-cloud loading and parsing

mod loader;
mod vertex;

pub use loader::{load_oriented_points, load_point_cloud};
pub use vertex::PlyVertex;
