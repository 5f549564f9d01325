//! Conversion of a ShapeNet directory tree into per-category archives.
//!
//! Expected input layout under the data root:
//!
//! ```text
//! synsetoffset2category.txt
//! ShapeNetRenderings/{synset}/{shape}/rendering/...
//! customShapeNet/{synset}/ply/{shape}.points.ply
//! ```
//!
//! A shape is kept when it has both a rendering folder and a point file. The
//! sorted list of kept shapes is split 80/20 into train and valid by position.

use crate::archive::ShapeArchiveWriter;
use crate::catalog::{CategoryMap, write_manifest};
use crate::config::{BuildConfig, Split};
use crate::error::{DataError, Result};
use crate::ply::load_point_cloud;
use std::fs;
use std::io::ErrorKind;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const POINT_FILE_SUFFIX: &str = ".points.ply";

/// Summary of one archive written by [`ArchiveBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    /// Contiguous label among the categories that were written.
    pub label: usize,
    pub name: String,
    pub synset: String,
    pub shapes: usize,
    pub archive: PathBuf,
}

/// Outcome of converting one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub split: Split,
    pub categories: Vec<CategorySummary>,
    /// Categories left out because no shape matched in this split.
    pub skipped: Vec<String>,
    pub manifest: PathBuf,
}

impl BuildReport {
    pub fn total_shapes(&self) -> usize {
        self.categories.iter().map(|c| c.shapes).sum()
    }
}

/// Range of the sorted matched list that belongs to `split`.
///
/// Train takes the first `floor(0.8 * total)` shapes, valid the rest.
pub fn split_shapes(total: usize, split: Split) -> Range<usize> {
    let cut = total * 4 / 5;
    match split {
        Split::Train => 0..cut,
        Split::Valid => cut..total,
    }
}

/// Shape names present in both listings, in `renderings` order.
pub fn match_shapes(renderings: &[String], point_files: &[String]) -> Vec<String> {
    renderings
        .iter()
        .filter(|name| {
            let file = format!("{name}{POINT_FILE_SUFFIX}");
            point_files.binary_search(&file).is_ok()
        })
        .cloned()
        .collect()
}

fn sorted_listing(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

struct PlannedCategory {
    name: String,
    synset: String,
    render_dir: PathBuf,
    point_dir: PathBuf,
    shapes: Vec<String>,
}

/// Converts ShapeNet point files into archives.
pub struct ArchiveBuilder {
    config: BuildConfig,
}

impl ArchiveBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Convert one split and write its manifest.
    #[tracing::instrument(skip_all, fields(split = %split))]
    pub fn build(&self, split: Split) -> Result<BuildReport> {
        let categories = CategoryMap::from_path(self.config.category_file())?;
        info!("{} categories in map", categories.len());

        let mut planned = Vec::new();
        let mut skipped = Vec::new();
        for category in categories.iter() {
            let render_dir = self.config.renderings_dir().join(&category.synset);
            let point_dir = self.config.point_cloud_dir().join(&category.synset).join("ply");

            let renderings = sorted_listing(&render_dir)?;
            let point_files = match sorted_listing(&point_dir) {
                Ok(files) => files,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(
                        "No point-cloud directory for {} at {}; treating as empty",
                        category.name,
                        point_dir.display()
                    );
                    Vec::new()
                }
                Err(e) => return Err(e.into()),
            };

            let matched = match_shapes(&renderings, &point_files);
            let ratio = if renderings.is_empty() {
                0.0
            } else {
                matched.len() as f64 / renderings.len() as f64
            };
            info!(
                "category {} files {} ({:.1}% of renderings)",
                category.name,
                matched.len(),
                ratio * 100.0
            );

            let shapes = matched[split_shapes(matched.len(), split)].to_vec();
            if shapes.is_empty() {
                skipped.push(category.name.clone());
                continue;
            }
            planned.push(PlannedCategory {
                name: category.name.clone(),
                synset: category.synset.clone(),
                render_dir,
                point_dir,
                shapes,
            });
        }

        let out_dir = self.config.output_dir.join(split.as_str());
        fs::create_dir_all(&out_dir)?;

        let mut summaries = Vec::with_capacity(planned.len());
        for (label, category) in planned.into_iter().enumerate() {
            let archive = self.write_category(&category, &out_dir, split)?;
            summaries.push(CategorySummary {
                label,
                name: category.name,
                synset: category.synset,
                shapes: category.shapes.len(),
                archive,
            });
        }

        let manifest = self.config.output_dir.join(format!("{split}_cat.txt"));
        let names: Vec<String> = summaries
            .iter()
            .map(|c| format!("{}.h5", c.name))
            .collect();
        write_manifest(&manifest, &names)?;

        info!(
            "{} split done: {} archives, {} skipped",
            split,
            summaries.len(),
            skipped.len()
        );
        Ok(BuildReport {
            split,
            categories: summaries,
            skipped,
            manifest,
        })
    }

    fn write_category(&self, category: &PlannedCategory, out_dir: &Path, split: Split) -> Result<PathBuf> {
        let archive_path = out_dir.join(format!("{}.h5", category.name));
        info!(
            "writing h5 for: {}_{}, {}",
            category.name,
            split,
            category.shapes.len()
        );

        let mut writer = ShapeArchiveWriter::create(&archive_path)?;
        for shape in &category.shapes {
            let point_file = category.point_dir.join(format!("{shape}{POINT_FILE_SUFFIX}"));
            let cloud = load_point_cloud(&point_file)?;
            if cloud.len() != self.config.expected_points {
                warn!("len: {}, fn: {}", cloud.len(), point_file.display());
            }
            let normals = cloud.normals.as_ref().ok_or_else(|| {
                DataError::Ply(format!("{}: no vertex normals", point_file.display()))
            })?;

            let render_path = category.render_dir.join(shape).join("rendering");
            writer.push(&cloud.points, normals, &render_path.to_string_lossy())?;
        }
        writer.finish()
    }
}
