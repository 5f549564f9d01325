//! Fixture helpers shared by the integration tests.

#![allow(dead_code)]

use glam::Vec3;
use shapenet_data::{ShapeArchiveWriter, write_manifest};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write a binary little-endian PLY with `x y z nx ny nz` float properties.
pub fn write_oriented_ply(path: &Path, points: &[Vec3], normals: &[Vec3]) {
    let mut file = BufWriter::new(File::create(path).unwrap());
    write!(
        file,
        "ply\nformat binary_little_endian 1.0\nelement vertex {}\n\
         property float x\nproperty float y\nproperty float z\n\
         property float nx\nproperty float ny\nproperty float nz\nend_header\n",
        points.len()
    )
    .unwrap();
    for (p, n) in points.iter().zip(normals) {
        for value in p.to_array().into_iter().chain(n.to_array()) {
            file.write_all(&value.to_le_bytes()).unwrap();
        }
    }
    file.flush().unwrap();
}

/// Points of shape `shape`: x tags the shape, y the point index.
pub fn tagged_points(shape: usize, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| Vec3::new(shape as f32, i as f32, 0.5))
        .collect()
}

/// Normals whose z component repeats the point index.
pub fn tagged_normals(count: usize) -> Vec<Vec3> {
    (0..count).map(|i| Vec3::new(0.0, 0.0, i as f32)).collect()
}

/// Lay out a ShapeNet source tree for one category.
///
/// Creates `shapes` rendering folders; the first `with_points` of them also get
/// a point file of `points_per_shape` points.
pub fn add_source_category(
    root: &Path,
    synset: &str,
    shapes: usize,
    with_points: Option<usize>,
    points_per_shape: usize,
) {
    let render_dir = root.join("ShapeNetRenderings").join(synset);
    for s in 0..shapes {
        fs::create_dir_all(render_dir.join(format!("shape{s:03}")).join("rendering")).unwrap();
    }
    if let Some(with_points) = with_points {
        let ply_dir = root.join("customShapeNet").join(synset).join("ply");
        fs::create_dir_all(&ply_dir).unwrap();
        for s in 0..with_points {
            let path = ply_dir.join(format!("shape{s:03}.points.ply"));
            write_oriented_ply(
                &path,
                &tagged_points(s, points_per_shape),
                &tagged_normals(points_per_shape),
            );
        }
    }
}

pub fn write_category_map(root: &Path, lines: &[(&str, &str)]) {
    let text: String = lines
        .iter()
        .map(|(name, synset)| format!("{name} {synset}\n"))
        .collect();
    fs::write(root.join("synsetoffset2category.txt"), text).unwrap();
}

/// Write converted archives directly, plus the split manifest.
///
/// `lengths[c]` shapes are written for category `c`; shape `s` of category `c`
/// is tagged with `global_offset(c) + s`.
pub fn write_converted_split(
    root: &Path,
    split: &str,
    lengths: &[usize],
    points_per_shape: usize,
) -> Vec<PathBuf> {
    let archive_dir = root.join("ShapeNetAtlasNetH5");
    let split_dir = archive_dir.join(split);
    fs::create_dir_all(&split_dir).unwrap();

    let mut names = Vec::new();
    let mut paths = Vec::new();
    let mut global = 0;
    for (c, &len) in lengths.iter().enumerate() {
        let name = format!("cat{c}.h5");
        let path = split_dir.join(&name);
        let mut writer = ShapeArchiveWriter::create(&path).unwrap();
        for _ in 0..len {
            writer
                .push(
                    &tagged_points(global, points_per_shape),
                    &tagged_normals(points_per_shape),
                    &format!("renderings/cat{c}/shape{global}/rendering"),
                )
                .unwrap();
            global += 1;
        }
        writer.finish().unwrap();
        names.push(name);
        paths.push(path);
    }
    write_manifest(archive_dir.join(format!("{split}_cat.txt")), &names).unwrap();
    paths
}
