//! Settings resolution
//!
//! Each invocation resolves its settings once, highest precedence first:
//!
//! 1. command-line flags (`--project`, `--templates`) and their
//!    `MODEPACK_PROJECT` / `MODEPACK_TEMPLATES` environment fallbacks
//! 2. `.modepack/config.yaml` in the project
//! 3. defaults: the enclosing project (or the current directory) and
//!    `$MODEPACK_HOME/templates`, where `MODEPACK_HOME` defaults to
//!    `~/.modepack`
//!
//! The editor comes from `VISUAL`, then `EDITOR`, then `config.yaml`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ModepackError, Result};
use crate::project::{PROJECT_DIR, Project};
use crate::store::{Filesystem, OsFilesystem};

/// Global modepack home directory
pub const HOME_ENV: &str = "MODEPACK_HOME";

/// Optional per-project settings in `.modepack/config.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Template source; relative paths are taken from the project root
    pub templates: Option<PathBuf>,
    pub editor: Option<String>,
}

impl ProjectConfig {
    /// Load the config file; a missing file yields defaults
    pub fn load(path: &Path, fs: &dyn Filesystem) -> Result<Self> {
        if !fs.exists(path) {
            return Ok(Self::default());
        }
        let content = fs.read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ModepackError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory that holds (or will hold) `.modepack/`
    pub project_root: PathBuf,
    pub templates: PathBuf,
    /// Global scope: components shared across projects
    pub global_dir: PathBuf,
    pub editor: Option<String>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project: Option<PathBuf>,
    pub templates: Option<PathBuf>,
}

impl Settings {
    /// Resolve from the process environment
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::resolve_with(
            overrides,
            &cwd,
            |key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()),
            dirs::home_dir(),
            &OsFilesystem,
        )
    }

    /// Resolve from explicit sources
    pub fn resolve_with(
        overrides: &Overrides,
        cwd: &Path,
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
        fs: &dyn Filesystem,
    ) -> Result<Self> {
        let project_root = match &overrides.project {
            Some(path) => absolutize(cwd, path),
            None => Project::find_from(cwd).unwrap_or_else(|| cwd.to_path_buf()),
        };

        let config_path = project_root.join(PROJECT_DIR).join(crate::project::CONFIG_FILE);
        let config = ProjectConfig::load(&config_path, fs)?;

        let global_dir = match env(HOME_ENV) {
            Some(dir) => absolutize(cwd, Path::new(&dir)),
            None => home
                .map(|h| h.join(PROJECT_DIR))
                .unwrap_or_else(|| cwd.join(PROJECT_DIR)),
        };

        let templates = overrides
            .templates
            .as_ref()
            .map(|p| absolutize(cwd, p))
            .or_else(|| config.templates.as_ref().map(|p| absolutize(&project_root, p)))
            .unwrap_or_else(|| global_dir.join("templates"));

        let editor = env("VISUAL").or_else(|| env("EDITOR")).or(config.editor);

        tracing::debug!(
            "Settings: project {}, templates {}",
            project_root.display(),
            templates.display()
        );

        Ok(Self {
            project_root,
            templates,
            global_dir,
            editor,
        })
    }

    pub fn fs(&self) -> Arc<dyn Filesystem> {
        Arc::new(OsFilesystem)
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    dunce::canonicalize(&joined).unwrap_or(joined)
}
