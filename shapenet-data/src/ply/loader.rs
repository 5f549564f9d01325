//! PLY file loading functions

use crate::error::{DataError, Result};
use crate::ply::PlyVertex;
use crate::types::PointCloud;
use glam::Vec3;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

// Only the vertex element matters for point clouds; faces are ignored.
#[derive(Deserialize, Debug)]
struct PlyFile {
    #[serde(rename = "vertex")]
    vertex: Vec<HashMap<String, JsonValue>>,
}

fn get_f32(prop: Option<&JsonValue>) -> Option<f32> {
    prop.and_then(|v| match v {
        JsonValue::Number(n) => n.as_f64().map(|f| f as f32),
        _ => None,
    })
}

/// Load positions and (if present) `nx/ny/nz` normals from a PLY file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_oriented_points(path: impl AsRef<Path>) -> Result<Vec<PlyVertex>> {
    let path = path.as_ref();
    debug!("Loading PLY vertices from: {}", path.display());
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let ply_data: PlyFile = serde_ply::from_reader(reader).map_err(|e| {
        warn!("Failed to parse PLY file: {}", e);
        DataError::Ply(format!("{}: {}", path.display(), e))
    })?;

    let mut vertices = Vec::with_capacity(ply_data.vertex.len());

    for (i, vertex) in ply_data.vertex.iter().enumerate() {
        let coord = |key: &str| {
            get_f32(vertex.get(key)).ok_or_else(|| {
                DataError::Ply(format!("{}: missing '{}' at vertex {}", path.display(), key, i))
            })
        };
        let position = Vec3::new(coord("x")?, coord("y")?, coord("z")?);

        let normal = match (
            get_f32(vertex.get("nx")),
            get_f32(vertex.get("ny")),
            get_f32(vertex.get("nz")),
        ) {
            (Some(x), Some(y), Some(z)) => Some(Vec3::new(x, y, z)),
            _ => None,
        };

        vertices.push(PlyVertex { position, normal });
    }

    debug!("Loaded {} vertices from PLY file", vertices.len());
    Ok(vertices)
}

/// Load a PLY file as a [`PointCloud`].
///
/// Normals are kept only when every vertex carries them.
pub fn load_point_cloud(path: impl AsRef<Path>) -> Result<PointCloud> {
    let vertices = load_oriented_points(path)?;
    let points = vertices.iter().map(|v| v.position).collect();
    let normals: Option<Vec<Vec3>> = vertices.iter().map(|v| v.normal).collect();
    Ok(PointCloud { points, normals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_binary_ply(path: &Path, rows: &[[f32; 6]], with_normals: bool) {
        let mut header = format!(
            "ply\nformat binary_little_endian 1.0\nelement vertex {}\nproperty float x\nproperty float y\nproperty float z\n",
            rows.len()
        );
        if with_normals {
            header.push_str("property float nx\nproperty float ny\nproperty float nz\n");
        }
        header.push_str("end_header\n");

        let mut file = File::create(path).unwrap();
        file.write_all(header.as_bytes()).unwrap();
        let width = if with_normals { 6 } else { 3 };
        for row in rows {
            for value in &row[..width] {
                file.write_all(&value.to_le_bytes()).unwrap();
            }
        }
    }

    #[test]
    fn test_load_points_with_normals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shape.points.ply");
        write_binary_ply(
            &path,
            &[[1.0, 2.0, 3.0, 0.0, 0.0, 1.0], [4.0, 5.0, 6.0, 1.0, 0.0, 0.0]],
            true,
        );

        let cloud = load_point_cloud(&path).unwrap();
        assert_eq!(cloud.points, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
        assert_eq!(cloud.normals, Some(vec![Vec3::Z, Vec3::X]));
    }

    #[test]
    fn test_load_points_without_normals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.ply");
        write_binary_ply(&path, &[[0.5, 0.5, 0.5, 0.0, 0.0, 0.0]], false);

        let vertices = load_oriented_points(&path).unwrap();
        assert_eq!(vertices.len(), 1);
        assert!(vertices[0].normal.is_none());
        assert!(load_point_cloud(&path).unwrap().normals.is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_point_cloud(dir.path().join("nope.ply")).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}
