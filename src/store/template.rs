//! Read-only template source
//!
//! ```text
//! <templates>/
//! ├── metadata.json          # {"version": "1.4.0"} for the whole set
//! ├── modes/ workflows/ agents/
//! └── starter-packs/
//!     ├── schema.json        # pack JSON schema (optional)
//!     └── <pack>.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::{ContentStore, Filesystem, StoreRole};
use crate::error::{ModepackError, Result};

/// Template set metadata file
pub const METADATA_FILE: &str = "metadata.json";

/// Directory holding pack manifests
pub const PACKS_DIR: &str = "starter-packs";

/// Pack schema file inside [`PACKS_DIR`]
pub const SCHEMA_FILE: &str = "schema.json";

/// Version reported when the template set carries no metadata
pub const UNKNOWN_VERSION: &str = "0.0.0";

/// Schema used when the template source ships none
const BUILTIN_PACK_SCHEMA: &str = include_str!("../../schemas/pack.schema.json");

#[derive(Debug, Deserialize)]
struct TemplateMetadata {
    version: Option<String>,
}

/// The template source: component files plus pack manifests
#[derive(Debug, Clone)]
pub struct TemplateSource {
    store: ContentStore,
}

impl TemplateSource {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            store: ContentStore::new(root, StoreRole::Templates, fs),
        }
    }

    #[cfg(test)]
    pub fn os(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Arc::new(super::OsFilesystem))
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }

    pub fn components(&self) -> &ContentStore {
        &self.store
    }

    pub fn exists(&self) -> bool {
        self.store.fs().is_dir(self.store.root())
    }

    /// Global version of the template set.
    ///
    /// A missing or unreadable `metadata.json` yields [`UNKNOWN_VERSION`].
    pub fn version(&self) -> String {
        let path = self.root().join(METADATA_FILE);
        if !self.store.fs().exists(&path) {
            return UNKNOWN_VERSION.to_string();
        }
        let parsed = self
            .store
            .fs()
            .read_to_string(&path)
            .and_then(|content| Ok(serde_json::from_str::<TemplateMetadata>(&content)?));
        match parsed {
            Ok(meta) => meta
                .version
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                UNKNOWN_VERSION.to_string()
            }
        }
    }

    pub fn packs_dir(&self) -> PathBuf {
        self.root().join(PACKS_DIR)
    }

    fn pack_path(&self, name: &str) -> PathBuf {
        self.packs_dir().join(format!("{name}.json"))
    }

    pub fn has_pack(&self, name: &str) -> bool {
        self.store.fs().exists(&self.pack_path(name))
    }

    /// Names of all pack manifests (file stems), excluding the schema
    pub fn pack_names(&self) -> Vec<String> {
        let dir = self.packs_dir();
        let entries = match self.store.fs().list_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot list {}: {}", dir.display(), e);
                return Vec::new();
            }
        };
        entries
            .iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter(|p| p.file_name().is_some_and(|n| n != SCHEMA_FILE))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
            .collect()
    }

    /// Raw JSON of a pack manifest, for schema validation
    pub fn read_pack_value(&self, name: &str) -> Result<Value> {
        let path = self.pack_path(name);
        if !self.store.fs().exists(&path) {
            return Err(ModepackError::PackNotFound {
                name: name.to_string(),
            });
        }
        let content = self.store.fs().read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| ModepackError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// The pack schema: `starter-packs/schema.json`, or the built-in one
    pub fn pack_schema(&self) -> Result<Value> {
        let path = self.packs_dir().join(SCHEMA_FILE);
        if !self.store.fs().exists(&path) {
            return Ok(serde_json::from_str(BUILTIN_PACK_SCHEMA)?);
        }
        let content = self.store.fs().read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| ModepackError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
