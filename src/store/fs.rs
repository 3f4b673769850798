//! File system capability used by every store
//!
//! Stores never touch `std::fs` directly; they go through [`Filesystem`] so
//! the engine only depends on read/write/list/exists/remove.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::{ModepackError, Result};

/// Minimal file system capability
pub trait Filesystem: fmt::Debug {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a file, creating parent directories as needed
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Entries directly inside `path`, sorted by file name.
    /// A missing directory yields an empty list.
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| ModepackError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// [`Filesystem`] backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

fn write_failed(path: &Path, e: impl fmt::Display) -> ModepackError {
    ModepackError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

impl Filesystem for OsFilesystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| ModepackError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Writes go through a temp file in the target directory and a rename,
    /// so readers never observe a half-written file.
    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        self.create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| write_failed(path, e))?;
        temp.write_all(content).map_err(|e| write_failed(path, e))?;
        temp.persist(path).map_err(|e| write_failed(path, e.error))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ModepackError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            entries.push(entry.into_path());
        }
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| write_failed(path, e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if let Some(parent) = to.parent() {
            self.create_dir_all(parent)?;
        }
        fs::rename(from, to).map_err(|e| write_failed(to, e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| write_failed(path, e))
    }
}
