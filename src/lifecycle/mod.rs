//! Component lifecycle: install, update, diff and remove
//!
//! The engine compares three things for every component:
//!
//! - the project copy under `.modepack/<kind dir>/`
//! - the manifest record (version and hash as last written by modepack)
//! - the template source and its set-wide version
//!
//! A live hash that differs from the recorded hash means the user edited the
//! file. A recorded version that differs from the template-set version means
//! the template moved on. Either makes an update available; only the first
//! blocks it without `--force`.
//!
//! All writes go through a [`Transaction`]. Call [`LifecycleEngine::commit`]
//! once the manifest is saved; dropping the engine without committing rolls
//! the project files back.

mod graph;

use std::path::PathBuf;

use chrono::Utc;

use crate::component::ComponentRef;
use crate::error::{ModepackError, Result};
use crate::hash;
use crate::manifest::Manifest;
use crate::project::Project;
use crate::resolver;
use crate::store::{ContentStore, TemplateSource};
use crate::transaction::Transaction;
use crate::ui::ProgressReporter;

pub use graph::ComponentGraph;

/// What `install` did for one component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    /// Copied from the template source
    Installed,
    /// Present in the project but unknown to the manifest; recorded as is
    Adopted,
    /// Already installed and not forced; left untouched
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Every component touched, dependencies first
    pub steps: Vec<(ComponentRef, InstallStatus)>,
}

impl InstallReport {
    #[cfg(test)]
    pub fn with_status(&self, status: InstallStatus) -> Vec<&ComponentRef> {
        self.steps
            .iter()
            .filter(|(_, s)| *s == status)
            .map(|(c, _)| c)
            .collect()
    }
}

/// Comparison of an installed component with its template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheck {
    pub component: ComponentRef,
    /// `None` for record-less components
    pub installed_version: Option<String>,
    pub available_version: String,
    pub local_changes: bool,
    pub update_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    UpToDate,
    Applied {
        from: Option<String>,
        to: String,
        /// Where the previous file was copied
        backup: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub component: ComponentRef,
    pub differs: bool,
    pub installed_hash: String,
    pub template_hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub available: Vec<UpdateCheck>,
    pub removed_upstream: Vec<ComponentRef>,
}

/// Result of a batch update; failures do not stop the batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub updated: Vec<ComponentRef>,
    pub up_to_date: Vec<ComponentRef>,
    pub failed: Vec<(ComponentRef, ModepackError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Install, update and remove components of one project
#[derive(Debug)]
pub struct LifecycleEngine {
    templates: TemplateSource,
    project: Project,
    installed: ContentStore,
    template_version: String,
    /// Backup directory name shared by every file this engine backs up
    stamp: String,
    journal: Transaction,
}

impl LifecycleEngine {
    pub fn new(templates: TemplateSource, project: Project) -> Self {
        let template_version = templates.version();
        let installed = project.store();
        let journal = Transaction::new(project.fs().clone());
        Self {
            templates,
            project,
            installed,
            template_version,
            stamp: Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string(),
            journal,
        }
    }

    pub fn templates(&self) -> &TemplateSource {
        &self.templates
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn template_version(&self) -> &str {
        &self.template_version
    }

    /// Keep every file written by this engine
    pub fn commit(self) {
        self.journal.commit();
    }

    /// Undo every file written by this engine so far
    pub fn rollback(&mut self) {
        self.journal.rollback();
    }

    fn write_installed(&mut self, component: &ComponentRef, content: &[u8]) -> Result<()> {
        let path = self.installed.path_of(component);
        self.journal.write(&path, content)
    }

    /// Install a component and the modes it depends on.
    ///
    /// Dependencies are resolved before anything is written; a missing or
    /// circular dependency fails the whole install.
    pub fn install(
        &mut self,
        manifest: &mut Manifest,
        component: &ComponentRef,
        force: bool,
    ) -> Result<InstallReport> {
        if manifest.is_installed(component) && !force {
            tracing::warn!("{} is already installed; use --force to reinstall", component);
            return Ok(InstallReport {
                steps: vec![(component.clone(), InstallStatus::Unchanged)],
            });
        }

        let templates = self.templates.components();
        if !templates.exists(component) {
            if self.installed.exists(component) {
                let status = self.adopt(manifest, component)?;
                return Ok(InstallReport {
                    steps: vec![(component.clone(), status)],
                });
            }
            return Err(ModepackError::template_not_found(component));
        }

        let graph = ComponentGraph::new(templates);
        let order = resolver::resolve(&graph, std::slice::from_ref(component))
            .into_order(&component.to_string())?;

        let mut steps = Vec::with_capacity(order.len());
        for node in &order {
            let status = self.install_one(manifest, node, force)?;
            steps.push((node.clone(), status));
        }
        Ok(InstallReport { steps })
    }

    fn install_one(
        &mut self,
        manifest: &mut Manifest,
        component: &ComponentRef,
        force: bool,
    ) -> Result<InstallStatus> {
        if !force {
            if manifest.is_installed(component) {
                return Ok(InstallStatus::Unchanged);
            }
            if self.installed.exists(component) {
                return self.adopt(manifest, component);
            }
        }

        let content = self.templates.components().read_bytes(component)?;
        self.write_installed(component, &content)?;
        manifest.record_version(component, &self.template_version, &hash::hash_bytes(&content));
        tracing::debug!("Installed {} ({})", component, self.template_version);
        Ok(InstallStatus::Installed)
    }

    /// Record a component that was placed in the project out of band
    fn adopt(&mut self, manifest: &mut Manifest, component: &ComponentRef) -> Result<InstallStatus> {
        let digest = self.installed.hash_of(component)?;
        manifest.record_version(component, &self.template_version, &digest);
        tracing::debug!("Adopted existing {}", component);
        Ok(InstallStatus::Adopted)
    }

    /// Write a component that does not come from the template source.
    ///
    /// The component is tracked without a version record, so it is always
    /// up to date. An existing project file is kept unless `force`.
    pub fn install_local(
        &mut self,
        manifest: &mut Manifest,
        component: &ComponentRef,
        content: &[u8],
        force: bool,
    ) -> Result<InstallStatus> {
        if self.installed.exists(component) && !force {
            if manifest.is_installed(component) {
                tracing::warn!("{} already exists; use --force to overwrite", component);
                return Ok(InstallStatus::Unchanged);
            }
            manifest.add_installed(component);
            return Ok(InstallStatus::Adopted);
        }
        self.write_installed(component, content)?;
        manifest.add_installed(component);
        tracing::debug!("Wrote local {}", component);
        Ok(InstallStatus::Installed)
    }

    /// Compare an installed component with its template
    pub fn check_update(&self, manifest: &Manifest, component: &ComponentRef) -> Result<UpdateCheck> {
        if !manifest.is_installed(component) {
            return Err(ModepackError::not_installed(component));
        }

        let Some(record) = manifest.get_version(component) else {
            return Ok(UpdateCheck {
                component: component.clone(),
                installed_version: None,
                available_version: self.template_version.clone(),
                local_changes: false,
                update_available: false,
            });
        };

        if !self.templates.components().exists(component) {
            return Err(ModepackError::TemplateRemoved {
                kind: component.kind,
                name: component.name.clone(),
            });
        }

        let live = self.installed.hash_of(component)?;
        let local_changes = !hash::verify_hash(&record.hash, &live);
        let version_changed = record.version != self.template_version;

        Ok(UpdateCheck {
            component: component.clone(),
            installed_version: Some(record.version.clone()),
            available_version: self.template_version.clone(),
            local_changes,
            update_available: version_changed || local_changes,
        })
    }

    /// Replace an installed component with the current template.
    ///
    /// Local edits are only overwritten with `force`; the previous file is
    /// always backed up first.
    pub fn update(
        &mut self,
        manifest: &mut Manifest,
        component: &ComponentRef,
        force: bool,
    ) -> Result<UpdateOutcome> {
        let check = self.check_update(manifest, component)?;
        if !check.update_available {
            return Ok(UpdateOutcome::UpToDate);
        }
        if check.local_changes && !force {
            return Err(ModepackError::LocalModification {
                kind: component.kind,
                name: component.name.clone(),
            });
        }

        let current = self.installed.read_bytes(component)?;
        let backup = self
            .project
            .backup_dir(component.kind, &self.stamp)
            .join(format!("{}.{}", component.name, crate::component::COMPONENT_EXTENSION));
        self.journal.write(&backup, &current)?;

        let content = self.templates.components().read_bytes(component)?;
        self.write_installed(component, &content)?;
        manifest.record_version(component, &self.template_version, &hash::hash_bytes(&content));
        tracing::debug!(
            "Updated {} to {} (backup at {})",
            component,
            self.template_version,
            backup.display()
        );

        Ok(UpdateOutcome::Applied {
            from: check.installed_version,
            to: self.template_version.clone(),
            backup,
        })
    }

    /// Whether the installed copy differs from the template, byte for byte
    pub fn diff(&self, component: &ComponentRef) -> Result<DiffReport> {
        let installed = self.installed.read_bytes(component)?;
        let template = self.templates.components().read_bytes(component)?;
        Ok(DiffReport {
            component: component.clone(),
            differs: installed != template,
            installed_hash: hash::hash_bytes(&installed),
            template_hash: hash::hash_bytes(&template),
        })
    }

    /// Run the update comparison for every installed component
    pub fn check_for_updates(&self, manifest: &Manifest) -> UpdateReport {
        let mut report = UpdateReport::default();
        for component in manifest.installed_refs() {
            match self.check_update(manifest, &component) {
                Ok(check) if check.update_available => report.available.push(check),
                Ok(_) => {}
                Err(ModepackError::TemplateRemoved { .. }) => {
                    report.removed_upstream.push(component)
                }
                Err(e) => tracing::warn!("Cannot check {}: {}", component, e),
            }
        }
        report
    }

    /// Update every installed component, continuing past failures
    pub fn update_all(
        &mut self,
        manifest: &mut Manifest,
        force: bool,
        progress: &mut dyn ProgressReporter,
    ) -> BatchReport {
        let components = manifest.installed_refs();
        let mut report = BatchReport::default();
        progress.start(components.len() as u64);

        for component in components {
            progress.update(&component.to_string());
            match self.update(manifest, &component, force) {
                Ok(UpdateOutcome::Applied { .. }) => report.updated.push(component),
                Ok(UpdateOutcome::UpToDate) => report.up_to_date.push(component),
                Err(e) => {
                    tracing::warn!("Failed to update {}: {}", component, e);
                    report.failed.push((component, e));
                }
            }
            progress.inc();
        }

        if report.is_success() {
            progress.finish();
        } else {
            progress.abandon();
        }
        report
    }

    /// Delete an installed component and forget it
    pub fn remove(&mut self, manifest: &mut Manifest, component: &ComponentRef) -> Result<()> {
        let path = self.installed.path_of(component);
        let on_disk = self.installed.exists(component);
        if !on_disk && !manifest.is_installed(component) {
            return Err(ModepackError::not_installed(component));
        }
        if on_disk {
            self.journal.remove(&path)?;
        }
        manifest.forget(component);
        tracing::debug!("Removed {}", component);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
