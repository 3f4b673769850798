//! Test fixtures for template sources and projects.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{TemplateFixture, ProjectFixture};
//!
//! #[test]
//! fn my_test() {
//!     let templates = TemplateFixture::new();
//!     templates.mode("architect", "System design", &["reviewer"]);
//!     templates.mode("reviewer", "Code review", &[]);
//!
//!     let project = ProjectFixture::new();
//!     let engine = project.engine(&templates);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::component::{ComponentKind, ComponentRef};
use crate::lifecycle::LifecycleEngine;
use crate::manifest::Manifest;
use crate::project::Project;
use crate::store::{ContentStore, StoreRole, TemplateSource};

/// Absolute base for temp dirs, even when TMPDIR is relative
fn temp_dir_base() -> PathBuf {
    let base = std::env::temp_dir();
    if base.is_absolute() {
        base
    } else {
        PathBuf::from("/tmp")
    }
}

/// Create a temp directory outside the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(temp_dir_base()).expect("Failed to create temp directory")
}

/// Markdown for a component with front matter
pub fn component_markdown(name: &str, description: &str, dependencies: &[&str]) -> String {
    let mut content = format!("---\nname: {name}\ndescription: {description}\n");
    if !dependencies.is_empty() {
        content.push_str("dependencies:\n");
        for dependency in dependencies {
            content.push_str(&format!("  - {dependency}\n"));
        }
    }
    content.push_str(&format!("---\n\n# {name}\n\nInstructions for {name}.\n"));
    content
}

/// A template source in a temp directory
pub struct TemplateFixture {
    temp: TempDir,
}

impl TemplateFixture {
    #[must_use]
    pub fn new() -> Self {
        Self {
            temp: create_temp_dir(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write a file relative to the template root
    pub fn write_raw(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create template directory");
        }
        fs::write(&path, content).expect("Failed to write template file");
        path
    }

    pub fn component(
        &self,
        kind: ComponentKind,
        name: &str,
        description: &str,
        dependencies: &[&str],
    ) -> ComponentRef {
        self.write_raw(
            &format!("{}/{name}.md", kind.dir_name()),
            &component_markdown(name, description, dependencies),
        );
        ComponentRef::new(kind, name)
    }

    pub fn mode(&self, name: &str, description: &str, dependencies: &[&str]) -> ComponentRef {
        self.component(ComponentKind::Mode, name, description, dependencies)
    }

    pub fn workflow(&self, name: &str, description: &str) -> ComponentRef {
        self.component(ComponentKind::Workflow, name, description, &[])
    }

    pub fn agent(&self, name: &str, description: &str) -> ComponentRef {
        self.component(ComponentKind::Agent, name, description, &[])
    }

    pub fn set_version(&self, version: &str) {
        self.write_raw("metadata.json", &format!("{{\"version\": \"{version}\"}}"));
    }

    /// Write `starter-packs/<name>.json`
    pub fn pack(&self, name: &str, json: &serde_json::Value) {
        self.write_raw(
            &format!("starter-packs/{name}.json"),
            &serde_json::to_string_pretty(json).expect("Failed to render pack"),
        );
    }

    pub fn store(&self) -> ContentStore {
        ContentStore::os(self.temp.path(), StoreRole::Templates)
    }

    pub fn source(&self) -> TemplateSource {
        TemplateSource::os(self.temp.path())
    }
}

/// An initialized project in a temp directory
pub struct ProjectFixture {
    temp: TempDir,
    pub project: Project,
}

impl ProjectFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp = create_temp_dir();
        let project = Project::init(temp.path()).expect("Failed to init project");
        Self { temp, project }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn engine(&self, templates: &TemplateFixture) -> LifecycleEngine {
        LifecycleEngine::new(templates.source(), self.project.clone())
    }

    pub fn manifest(&self) -> Manifest {
        self.project
            .manifest_store()
            .load()
            .expect("Failed to load manifest")
    }

    pub fn component_path(&self, component: &ComponentRef) -> PathBuf {
        self.project.store().path_of(component)
    }

    pub fn read(&self, component: &ComponentRef) -> String {
        fs::read_to_string(self.component_path(component)).expect("Failed to read component")
    }

    pub fn edit(&self, component: &ComponentRef, content: &str) {
        fs::write(self.component_path(component), content).expect("Failed to edit component");
    }
}
