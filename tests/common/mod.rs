//! Common test utilities for modepack integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A project directory with its own template catalog and global home
pub struct TestProject {
    /// Keeps the project and templates alive for the test
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Project root (the directory that holds `.modepack/`)
    pub path: PathBuf,
    /// Template catalog
    pub templates: PathBuf,
    /// `MODEPACK_HOME` for the test run
    pub home: PathBuf,
}

impl TestProject {
    /// Create a new, uninitialized project
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("project");
        let templates = temp.path().join("templates");
        let home = temp.path().join("home");
        for dir in [&path, &templates, &home] {
            std::fs::create_dir_all(dir).expect("Failed to create test directory");
        }
        Self {
            temp,
            path,
            templates,
            home,
        }
    }

    /// Create a project and run `modepack init` in it
    pub fn initialized() -> Self {
        let project = Self::new();
        project.cmd().arg("init").assert().success();
        project
    }

    /// Command for the modepack binary, scoped to this project
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("modepack").expect("Failed to find modepack binary");
        cmd.current_dir(&self.path)
            .env("MODEPACK_TEMPLATES", &self.templates)
            .env("MODEPACK_HOME", &self.home)
            .env_remove("MODEPACK_PROJECT")
            .env_remove("MODEPACK_VERBOSE")
            .env_remove("RUST_LOG")
            .env_remove("VISUAL")
            .env_remove("EDITOR");
        cmd
    }

    /// Write a file relative to `base`
    pub fn write_in(base: &Path, path: &str, content: &str) {
        let file_path = base.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write a file in the project
    #[allow(dead_code)]
    pub fn write_file(&self, path: &str, content: &str) {
        Self::write_in(&self.path, path, content);
    }

    /// Read a file from the project
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Add a component to the template catalog
    #[allow(dead_code)]
    pub fn template(&self, kind_dir: &str, name: &str, description: &str, dependencies: &[&str]) {
        Self::write_in(
            &self.templates,
            &format!("{kind_dir}/{name}.md"),
            &component_markdown(name, description, dependencies),
        );
    }

    /// Set the catalog version in `metadata.json`
    #[allow(dead_code)]
    pub fn set_version(&self, version: &str) {
        Self::write_in(
            &self.templates,
            "metadata.json",
            &format!("{{\"version\": \"{version}\"}}"),
        );
    }

    /// Add a starter pack to the template catalog
    #[allow(dead_code)]
    pub fn pack(&self, name: &str, dependencies: &[&str], modes: &[&str]) {
        let modes: Vec<String> = modes
            .iter()
            .map(|m| format!("{{\"name\": \"{m}\"}}"))
            .collect();
        let dependencies: Vec<String> = dependencies.iter().map(|d| format!("\"{d}\"")).collect();
        let json = format!(
            "{{\"name\": \"{name}\", \"version\": \"1.0.0\", \"description\": \"{name} pack\", \
             \"category\": \"general\", \"components\": {{\"modes\": [{}]}}, \
             \"dependencies\": [{}]}}",
            modes.join(", "),
            dependencies.join(", ")
        );
        Self::write_in(&self.templates, &format!("starter-packs/{name}.json"), &json);
    }
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
