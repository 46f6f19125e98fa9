//! Catalog source: reads suggestion items from JSON.
//!
//! A catalog is either a single file holding a JSON array of records, or a
//! directory tree of such files. Records without a `category` take it from
//! the directory they live in: `<parent>/<category>/items.json`.

use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Item;

const FALLBACK_CATEGORY: &str = "misc";

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    id: String,
    text: String,
    #[serde(alias = "hotScore", default)]
    popularity: f64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "parentCategory")]
    parent_category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "pinyin")]
    phonetic: Option<String>,
    #[serde(default, alias = "pinyinFirst")]
    phonetic_initials: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PathFacet {
    category: Option<String>,
    parent: Option<String>,
}

#[derive(Default)]
pub struct CatalogLoader {
    limit: Option<usize>,
}

impl CatalogLoader {
    pub fn new() -> Self { Self::default() }

    /// Stop after `limit` items.
    pub fn with_limit(limit: usize) -> Self { Self { limit: Some(limit) } }

    pub fn load(&self, path: &Path) -> Result<Vec<Item>> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let mut items = if path.is_dir() { self.load_directory(path)? } else { self.load_file(path, &PathFacet::default())? };
        if let Some(limit) = self.limit {
            items.truncate(limit);
        }
        tracing::info!(path = %path.display(), items = items.len(), "catalog loaded");
        Ok(items)
    }

    fn load_directory(&self, root: &Path) -> Result<Vec<Item>> {
        let files = self.list_json_files(root);
        if files.is_empty() {
            tracing::warn!(root = %root.display(), "no .json files found in catalog directory");
            return Ok(vec![]);
        }
        let mut items = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            tracing::debug!(file = %file_path.display(), "reading catalog file {}/{}", file_index + 1, files.len());
            let facet = self.facet_from_path(file_path, root);
            items.extend(self.load_file(file_path, &facet)?);
            if self.limit.is_some_and(|limit| items.len() >= limit) {
                break;
            }
        }
        Ok(items)
    }

    fn load_file(&self, path: &Path, facet: &PathFacet) -> Result<Vec<Item>> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        let records: Vec<CatalogRecord> =
            serde_json::from_str(&raw).map_err(|source| Error::Json { path: path.to_path_buf(), source })?;
        records.into_iter().map(|record| Self::into_item(record, facet, path)).collect()
    }

    fn into_item(record: CatalogRecord, facet: &PathFacet, path: &Path) -> Result<Item> {
        if record.id.trim().is_empty() {
            return Err(Error::Catalog { path: path.to_path_buf(), reason: format!("record {:?} has an empty id", record.text) });
        }
        let (category, parent_category) = match record.category {
            Some(category) => (category, record.parent_category),
            None => (
                facet.category.clone().unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
                record.parent_category.or_else(|| facet.parent.clone()),
            ),
        };
        Ok(Item {
            id: record.id,
            text: record.text,
            popularity: record.popularity,
            category,
            parent_category,
            description: record.description,
            phonetic: record.phonetic,
            phonetic_initials: record.phonetic_initials,
        })
    }

    fn facet_from_path(&self, file_path: &Path, root: &Path) -> PathFacet {
        let relative = file_path.strip_prefix(root).unwrap_or(file_path);
        let dirs: Vec<String> = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter_map(|c| match c {
                        Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let mut rev = dirs.into_iter().rev();
        let category = rev.next();
        let parent = rev.next();
        PathFacet { category, parent }
    }

    fn list_json_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut json_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                json_files.push(path.to_path_buf());
            }
        }
        json_files.sort();
        json_files
    }
}

/// Shorthand for `CatalogLoader::new().load(path)`.
pub fn load_catalog(path: &Path) -> Result<Vec<Item>> {
    CatalogLoader::new().load(path)
}
