use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Errors loading a category catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid category id: {0}")]
    InvalidId(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: HashMap<String, CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    name: String,
}

/// Category id to category name lookup
///
/// Loaded once per run and shared read-only between components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCatalog {
    names: BTreeMap<u32, String>,
}

impl CategoryCatalog {
    /// Loads a catalog from a JSON file
    ///
    /// The file follows the fingerprint catalog layout, where categories sit
    /// under a top-level `categories` object keyed by id. Other top-level
    /// keys (such as `apps`) are ignored.
    ///
    /// ```json
    /// { "categories": { "1": { "name": "CMS" }, "22": { "name": "Web servers" } } }
    /// ```
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a catalog from JSON text
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;

        let mut names = BTreeMap::new();
        for (id, entry) in file.categories {
            let id: u32 = id
                .trim()
                .parse()
                .map_err(|_| CatalogError::InvalidId(id.clone()))?;
            names.insert(id, entry.name);
        }

        Ok(Self { names })
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(u32, String)> for CategoryCatalog {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
