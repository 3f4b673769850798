//! Pack validation and installation
//!
//! Installing a pack runs in two phases. Planning reads and checks every pack
//! in the dependency closure and writes nothing:
//!
//! 1. load the pack
//! 2. validate it against the JSON schema
//! 3. check the version format of every pack in the closure
//! 4. reject self dependencies, then resolve the closure (missing/circular)
//! 5. make sure every referenced component has a template
//! 6. probe tools, skipping optional components whose tools are missing
//!
//! Applying installs the planned components through the lifecycle engine,
//! dependencies first. Any failure rolls back files and the manifest.

use chrono::Utc;

use super::schema::{PackSchema, is_valid_version};
use super::tools::ToolChecker;
use super::{Pack, PackCategory, PackGraph};
use crate::component::ComponentRef;
use crate::error::{ModepackError, Result};
use crate::lifecycle::{InstallStatus, LifecycleEngine};
use crate::manifest::{Manifest, PackRecord};
use crate::resolver::{self, DependencyGraph, Resolution};
use crate::store::TemplateSource;

/// Catalog entry for `pack list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSummary {
    pub name: String,
    pub version: String,
    pub description: String,
    pub category: PackCategory,
    pub components: usize,
    pub dependencies: Vec<String>,
}

/// What happened to one pack of the closure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOutcome {
    pub name: String,
    pub version: String,
    pub installed: Vec<ComponentRef>,
    /// Optional components skipped for missing tools
    pub skipped: Vec<ComponentRef>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackInstallReport {
    /// Dependencies first, the requested pack last
    pub packs: Vec<PackOutcome>,
}

/// A pack ready to install
#[derive(Debug)]
struct PlannedPack {
    pack: Pack,
    install: Vec<ComponentRef>,
    skipped: Vec<ComponentRef>,
    warnings: Vec<String>,
}

/// Validates and installs packs from a template source
#[derive(Debug)]
pub struct PackInstaller {
    source: TemplateSource,
    schema: PackSchema,
    tools: ToolChecker,
}

impl PackInstaller {
    pub fn new(source: TemplateSource, tools: ToolChecker) -> Result<Self> {
        let schema = PackSchema::new(&source.pack_schema()?)?;
        Ok(Self {
            source,
            schema,
            tools,
        })
    }

    /// Load, schema-check and version-check one pack
    fn load(&self, name: &str) -> Result<Pack> {
        let value = self.source.read_pack_value(name)?;
        self.schema.validate(name, &value)?;
        let pack: Pack = serde_json::from_value(value)
            .map_err(|e| ModepackError::validation(format!("pack '{name}'"), e.to_string()))?;
        if !is_valid_version(&pack.version) {
            return Err(ModepackError::validation(
                format!("pack '{name}'"),
                format!("version '{}' is not MAJOR.MINOR.PATCH", pack.version),
            ));
        }
        Ok(pack)
    }

    /// Dependency closure of a pack, without failing on problems
    pub fn deps(&self, name: &str) -> Result<Resolution<String>> {
        if !self.source.has_pack(name) {
            return Err(ModepackError::PackNotFound {
                name: name.to_string(),
            });
        }
        Ok(resolver::resolve(
            &PackGraph::new(&self.source),
            &[name.to_string()],
        ))
    }

    /// Every pack of the closure, dependencies first, fully checked
    pub fn validate(&self, name: &str) -> Result<Vec<Pack>> {
        let root = self.load(name)?;
        resolver::check_self_dependency(&root.name, &root.dependencies)?;

        // A pack listing itself also shows up as a one-node cycle; report it
        // as a self-dependency before the cycle list
        let resolution = self.deps(name)?;
        let graph = PackGraph::new(&self.source);
        for pack_name in resolution.resolved.iter().chain(&resolution.circular) {
            if let Some(dependencies) = graph.dependencies(pack_name) {
                resolver::check_self_dependency(pack_name, &dependencies)?;
            }
        }
        let order = resolution.into_order(&format!("pack '{name}'"))?;

        let mut packs = Vec::with_capacity(order.len());
        for pack_name in &order {
            if *pack_name == name {
                packs.push(root.clone());
            } else {
                packs.push(self.load(pack_name)?);
            }
        }

        let templates = self.source.components();
        let unknown: Vec<String> = packs
            .iter()
            .flat_map(|pack| {
                pack.components
                    .iter()
                    .filter(move |(component, _)| !templates.exists(component))
                    .map(move |(component, _)| format!("{component} (in pack '{}')", pack.name))
            })
            .collect();
        if !unknown.is_empty() {
            return Err(ModepackError::ValidationFailed {
                subject: format!("pack '{name}'"),
                messages: unknown
                    .into_iter()
                    .map(|c| format!("unknown component {c}"))
                    .collect(),
            });
        }

        Ok(packs)
    }

    fn plan(&mut self, name: &str) -> Result<Vec<PlannedPack>> {
        let packs = self.validate(name)?;
        let mut planned = Vec::with_capacity(packs.len());

        for pack in packs {
            let mut install = Vec::new();
            let mut skipped = Vec::new();
            let mut warnings = Vec::new();

            for (tool, spec) in &pack.tools {
                if !self.tools.is_available(tool)? && spec.required {
                    warnings.push(format!("required tool '{tool}' is not available"));
                }
            }

            for (component, entry) in pack.components.iter() {
                let missing = self.tools.missing(&entry.tools)?;
                if missing.is_empty() {
                    install.push(component);
                } else if entry.required {
                    warnings.push(format!(
                        "{component} needs {} which is not available",
                        missing.join(", ")
                    ));
                    install.push(component);
                } else {
                    tracing::debug!("Skipping optional {}: missing {:?}", component, missing);
                    skipped.push(component);
                }
            }

            planned.push(PlannedPack {
                pack,
                install,
                skipped,
                warnings,
            });
        }
        Ok(planned)
    }

    /// Install a pack and its dependency packs.
    ///
    /// On failure every file written so far is restored and `manifest` is
    /// reset to its state before the call.
    pub fn install(
        &mut self,
        engine: &mut LifecycleEngine,
        manifest: &mut Manifest,
        name: &str,
        force: bool,
    ) -> Result<PackInstallReport> {
        let planned = self.plan(name)?;
        let snapshot = manifest.clone();

        match Self::apply(engine, manifest, planned, force) {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::warn!("Installing pack '{}' failed, rolling back: {}", name, e);
                engine.rollback();
                *manifest = snapshot;
                Err(e)
            }
        }
    }

    fn apply(
        engine: &mut LifecycleEngine,
        manifest: &mut Manifest,
        planned: Vec<PlannedPack>,
        force: bool,
    ) -> Result<PackInstallReport> {
        let mut report = PackInstallReport::default();

        for plan in planned {
            let mut installed = Vec::new();
            for component in &plan.install {
                let result = engine.install(manifest, component, force)?;
                for (step, status) in result.steps {
                    let touched = status != InstallStatus::Unchanged || step == *component;
                    if touched && !installed.contains(&step) {
                        installed.push(step);
                    }
                }
            }
            for warning in &plan.warnings {
                tracing::warn!("pack '{}': {}", plan.pack.name, warning);
            }

            manifest.record_pack(
                &plan.pack.name,
                PackRecord {
                    version: plan.pack.version.clone(),
                    installed_at: Utc::now(),
                    components: installed.clone(),
                    skipped: plan.skipped.clone(),
                },
            );
            report.packs.push(PackOutcome {
                name: plan.pack.name,
                version: plan.pack.version,
                installed,
                skipped: plan.skipped,
                warnings: plan.warnings,
            });
        }
        Ok(report)
    }

    /// Summaries of every readable pack; broken packs are skipped
    pub fn list(&self) -> Vec<PackSummary> {
        let mut summaries = Vec::new();
        for name in self.source.pack_names() {
            match self.load(&name) {
                Ok(pack) => summaries.push(PackSummary {
                    components: pack.components.len(),
                    name: pack.name,
                    version: pack.version,
                    description: pack.description,
                    category: pack.category,
                    dependencies: pack.dependencies,
                }),
                Err(e) => tracing::warn!("Skipping pack '{}': {}", name, e),
            }
        }
        summaries
    }
}
