//! Content stores for component files
//!
//! A [`ContentStore`] is rooted at a directory containing one subdirectory
//! per component kind. The same type serves the template source, the
//! project's `.modepack/` directory and the global scope; only the error
//! reported for a missing component differs, chosen by [`StoreRole`].
//!
//! ```text
//! <root>/
//! ├── modes/<name>.md
//! ├── workflows/<name>.md
//! └── agents/<name>.md
//! ```

pub mod fs;
pub mod template;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::component::{
    COMPONENT_EXTENSION, ComponentKind, ComponentMetadata, ComponentRef, parse_metadata,
};
use crate::error::{ModepackError, Result};
use crate::hash;

pub use fs::{Filesystem, OsFilesystem};
pub use template::TemplateSource;

/// What a store's root holds, which decides the not-found error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreRole {
    Templates,
    Project,
    Global,
}

/// Component files under a root directory
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    role: StoreRole,
    fs: Arc<dyn Filesystem>,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>, role: StoreRole, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            root: root.into(),
            role,
            fs,
        }
    }

    /// Store on the real file system
    #[cfg(test)]
    pub fn os(root: impl Into<PathBuf>, role: StoreRole) -> Self {
        Self::new(root, role, Arc::new(OsFilesystem))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fs(&self) -> &Arc<dyn Filesystem> {
        &self.fs
    }

    pub fn kind_dir(&self, kind: ComponentKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    pub fn path_of(&self, component: &ComponentRef) -> PathBuf {
        self.kind_dir(component.kind)
            .join(format!("{}.{}", component.name, COMPONENT_EXTENSION))
    }

    pub fn exists(&self, component: &ComponentRef) -> bool {
        self.fs.exists(&self.path_of(component))
    }

    fn not_found(&self, component: &ComponentRef) -> ModepackError {
        match self.role {
            StoreRole::Templates => ModepackError::template_not_found(component),
            StoreRole::Project | StoreRole::Global => ModepackError::not_installed(component),
        }
    }

    pub fn read_bytes(&self, component: &ComponentRef) -> Result<Vec<u8>> {
        let path = self.path_of(component);
        if !self.fs.exists(&path) {
            return Err(self.not_found(component));
        }
        self.fs.read(&path)
    }

    pub fn read(&self, component: &ComponentRef) -> Result<String> {
        let path = self.path_of(component);
        if !self.fs.exists(&path) {
            return Err(self.not_found(component));
        }
        self.fs.read_to_string(&path)
    }

    pub fn write(&self, component: &ComponentRef, content: &str) -> Result<()> {
        self.fs.write(&self.path_of(component), content.as_bytes())
    }

    pub fn remove(&self, component: &ComponentRef) -> Result<()> {
        let path = self.path_of(component);
        if !self.fs.exists(&path) {
            return Err(self.not_found(component));
        }
        self.fs.remove_file(&path)
    }

    /// Digest of raw content; the drift-detection primitive
    pub fn hash(content: &[u8]) -> String {
        hash::hash_bytes(content)
    }

    /// Digest of the stored file
    pub fn hash_of(&self, component: &ComponentRef) -> Result<String> {
        Ok(Self::hash(&self.read_bytes(component)?))
    }

    pub fn metadata(&self, component: &ComponentRef) -> Result<ComponentMetadata> {
        let content = self.read(component)?;
        let path = self.path_of(component);
        parse_metadata(component.kind, &content, &path.display().to_string())
    }

    /// Names of all `*.md` files of a kind, without parsing them
    pub fn list_names(&self, kind: ComponentKind) -> Vec<String> {
        let dir = self.kind_dir(kind);
        match self.fs.list_dir(&dir) {
            Ok(entries) => entries
                .iter()
                .filter(|p| p.extension().is_some_and(|ext| ext == COMPONENT_EXTENSION))
                .filter(|p| !self.fs.is_dir(p))
                .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
                .collect(),
            Err(e) => {
                tracing::warn!("Cannot list {}: {}", dir.display(), e);
                Vec::new()
            }
        }
    }

    /// Metadata of every component of a kind.
    ///
    /// Never fails: files that cannot be read or lack the required
    /// front-matter fields are skipped with a warning. The file name is the
    /// component's identity; a differing `name` field is overridden.
    pub fn list_available(&self, kind: ComponentKind) -> Vec<ComponentMetadata> {
        let mut available = Vec::new();
        for name in self.list_names(kind) {
            let component = ComponentRef::new(kind, name.clone());
            match self.metadata(&component) {
                Ok(mut meta) => {
                    if meta.name != name {
                        tracing::debug!(
                            "Front matter name '{}' differs from file name '{}'",
                            meta.name,
                            name
                        );
                        meta.name = name;
                    }
                    available.push(meta);
                }
                Err(e) => tracing::warn!("Skipping {}: {}", component, e),
            }
        }
        available
    }
}
