//! Category map and manifest files.
//!
//! `synsetoffset2category.txt` pairs a category name with its ShapeNet synset
//! offset, e.g. `Airplane 02691156`. Manifests (`{split}_cat.txt`) list the
//! archive file names making up a split, one per line.

use crate::error::{DataError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// One line of the category map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category name; also the archive file stem.
    pub name: String,
    /// Synset offset; the directory name in the rendering and point-cloud trees.
    pub synset: String,
}

/// Ordered category map, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    categories: Vec<Category>,
}

impl CategoryMap {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::parse_with_origin(&text, path)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_origin(text, Path::new("<category map>"))
    }

    fn parse_with_origin(text: &str, origin: &Path) -> Result<Self> {
        let mut categories: Vec<Category> = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [] => continue,
                [name, synset] => {
                    // A repeated name overrides the earlier synset but keeps its position.
                    if let Some(existing) = categories.iter_mut().find(|c| c.name == *name) {
                        existing.synset = synset.to_string();
                    } else {
                        categories.push(Category {
                            name: name.to_string(),
                            synset: synset.to_string(),
                        });
                    }
                }
                _ => {
                    return Err(DataError::CategoryMap {
                        path: PathBuf::from(origin),
                        line: lineno + 1,
                        message: format!("expected 'name synset', found '{}'", line.trim()),
                    });
                }
            }
        }
        Ok(Self { categories })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Read a manifest: one archive file name per non-blank line.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Write a manifest, replacing any existing file.
pub fn write_manifest<S: AsRef<str>>(path: impl AsRef<Path>, names: &[S]) -> Result<()> {
    let mut text = String::new();
    for name in names {
        text.push_str(name.as_ref());
        text.push('\n');
    }
    fs::write(path.as_ref(), text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_file_order() {
        let map = CategoryMap::parse("Airplane\t02691156\nChair 03001627\n\n  Lamp  03636649  \n").unwrap();
        let names: Vec<&str> = map.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Airplane", "Chair", "Lamp"]);
        assert_eq!(map.get("Chair").unwrap().synset, "03001627");
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let err = CategoryMap::parse("Airplane 02691156\nbroken\n").unwrap_err();
        match err {
            DataError::CategoryMap { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_manifest_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train_cat.txt");
        fs::write(&path, "Airplane.h5\n\nChair.h5  \n").unwrap();
        assert_eq!(read_manifest(&path).unwrap(), vec!["Airplane.h5", "Chair.h5"]);

        write_manifest(&path, &["Lamp.h5"]).unwrap();
        assert_eq!(read_manifest(&path).unwrap(), vec!["Lamp.h5"]);
    }
}
