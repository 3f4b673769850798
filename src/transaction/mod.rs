//! Transaction support for multi-file operations
//!
//! Every file the lifecycle engine creates, overwrites or deletes is
//! journaled here first. Dropping an uncommitted transaction rolls the
//! project back: created files are removed and previous content restored.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new(fs.clone());
//! transaction.write(&path, content)?;
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::store::Filesystem;

/// Content of a file before the transaction touched it
#[derive(Debug, Clone)]
struct FileBackup {
    path: PathBuf,
    content: Vec<u8>,
}

/// A journal of file changes that can be undone
#[derive(Debug)]
pub struct Transaction {
    fs: Arc<dyn Filesystem>,

    /// Files that did not exist before
    created_files: Vec<PathBuf>,

    /// Original content of files that existed before
    modified_files: Vec<FileBackup>,

    /// Every path already journaled, so only the first snapshot is kept
    touched: HashSet<PathBuf>,

    committed: bool,
}

impl Transaction {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self {
            fs,
            created_files: Vec::new(),
            modified_files: Vec::new(),
            touched: HashSet::new(),
            committed: false,
        }
    }

    /// Record the current state of `path` before it is changed
    pub fn track(&mut self, path: &Path) -> Result<()> {
        if !self.touched.insert(path.to_path_buf()) {
            return Ok(());
        }
        if self.fs.exists(path) {
            let content = self.fs.read(path)?;
            self.modified_files.push(FileBackup {
                path: path.to_path_buf(),
                content,
            });
        } else {
            self.created_files.push(path.to_path_buf());
        }
        Ok(())
    }

    /// Journal then write a file
    pub fn write(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        self.track(path)?;
        self.fs.write(path, content)
    }

    /// Journal then delete a file
    pub fn remove(&mut self, path: &Path) -> Result<()> {
        self.track(path)?;
        self.fs.remove_file(path)
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Keep all changes
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Undo all journaled changes
    pub fn rollback(&mut self) {
        if self.committed {
            return;
        }

        for path in self.created_files.iter().rev() {
            if self.fs.exists(path) {
                if let Err(e) = self.fs.remove_file(path) {
                    tracing::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }

        for backup in self.modified_files.iter().rev() {
            if let Err(e) = self.fs.write(&backup.path, &backup.content) {
                tracing::warn!("Failed to restore {}: {}", backup.path.display(), e);
            }
        }

        self.created_files.clear();
        self.modified_files.clear();
        self.touched.clear();
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed && !self.is_empty() {
            tracing::debug!("Rolling back uncommitted transaction");
            self.rollback();
        }
    }
}
