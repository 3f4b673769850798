//! Project state directory
//!
//! ## Project Structure
//!
//! ```text
//! .modepack/
//! ├── manifest.json          # Installed components and packs
//! ├── config.yaml            # Optional per-project settings
//! ├── modes/                 # Installed components, one file each
//! │   └── .backups/<stamp>/  # Copies taken before an update overwrote them
//! ├── workflows/
//! ├── agents/
//! └── tickets/
//!     ├── pending/
//!     ├── in-progress/
//!     └── done/
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::component::ComponentKind;
use crate::error::{ModepackError, Result};
use crate::manifest::{Manifest, ManifestStore};
use crate::store::{ContentStore, Filesystem, OsFilesystem, StoreRole};

/// Project state directory name
pub const PROJECT_DIR: &str = ".modepack";

/// Per-project settings file
pub const CONFIG_FILE: &str = "config.yaml";

/// Tickets subdirectory
pub const TICKETS_DIR: &str = "tickets";

/// Backups subdirectory inside each kind directory
pub const BACKUPS_DIR: &str = ".backups";

/// A project with a `.modepack/` directory
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory containing `.modepack/`
    pub root: PathBuf,

    /// The `.modepack/` directory itself
    pub dir: PathBuf,

    fs: Arc<dyn Filesystem>,
}

impl Project {
    pub fn exists(root: &Path) -> bool {
        root.join(PROJECT_DIR).is_dir()
    }

    /// Find a project by searching upward from the given path
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if Self::exists(&current) {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Open an existing project
    pub fn open(root: &Path) -> Result<Self> {
        Self::open_with(root, Arc::new(OsFilesystem))
    }

    pub fn open_with(root: &Path, fs: Arc<dyn Filesystem>) -> Result<Self> {
        let dir = root.join(PROJECT_DIR);
        if !fs.is_dir(&dir) {
            return Err(ModepackError::ProjectNotFound {
                path: root.display().to_string(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
            dir,
            fs,
        })
    }

    /// Create the project layout; existing content is left alone
    pub fn init(root: &Path) -> Result<Self> {
        let fs: Arc<dyn Filesystem> = Arc::new(OsFilesystem);
        let dir = root.join(PROJECT_DIR);

        for kind in ComponentKind::ALL {
            fs.create_dir_all(&dir.join(kind.dir_name()))?;
        }
        for status in crate::ticket::TicketStatus::ALL {
            fs.create_dir_all(&dir.join(TICKETS_DIR).join(status.dir_name()))?;
        }

        let gitignore = dir.join(".gitignore");
        if !fs.exists(&gitignore) {
            fs.write(&gitignore, format!("*/{BACKUPS_DIR}/\n").as_bytes())?;
        }

        let project = Self {
            root: root.to_path_buf(),
            dir,
            fs,
        };
        let manifests = project.manifest_store();
        if !project.fs.exists(manifests.path()) {
            manifests.save(&Manifest::default())?;
        }
        tracing::debug!("Initialized project at {}", project.dir.display());
        Ok(project)
    }

    pub fn fs(&self) -> &Arc<dyn Filesystem> {
        &self.fs
    }

    /// Installed component files
    pub fn store(&self) -> ContentStore {
        ContentStore::new(self.dir.clone(), StoreRole::Project, self.fs.clone())
    }

    pub fn manifest_store(&self) -> ManifestStore {
        ManifestStore::new(&self.dir, self.fs.clone())
    }

    /// Directory for backups taken by one operation
    pub fn backup_dir(&self, kind: ComponentKind, stamp: &str) -> PathBuf {
        self.dir.join(kind.dir_name()).join(BACKUPS_DIR).join(stamp)
    }

    pub fn tickets_dir(&self) -> PathBuf {
        self.dir.join(TICKETS_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }
}
