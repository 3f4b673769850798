//! Starter packs
//!
//! A pack bundles components of every kind under one name and may depend on
//! other packs. Pack manifests live in the template source:
//!
//! ```json
//! {
//!   "name": "frontend",
//!   "version": "1.0.0",
//!   "description": "UI work",
//!   "category": "frontend",
//!   "components": {
//!     "modes": [{"name": "architect", "required": true}],
//!     "agents": [{"name": "e2e", "required": false, "tools": ["npx"]}]
//!   },
//!   "dependencies": ["base"],
//!   "tools": {"npx": {"description": "Runs Playwright", "required": false}}
//! }
//! ```

pub mod installer;
pub mod schema;
pub mod tools;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::{ComponentKind, ComponentRef};
use crate::resolver::DependencyGraph;
use crate::store::TemplateSource;

pub use installer::PackInstaller;
pub use tools::ToolChecker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackCategory {
    Frontend,
    Backend,
    Fullstack,
    Devops,
    Data,
    Testing,
    Documentation,
    Security,
    General,
}

impl fmt::Display for PackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PackCategory::Frontend => "frontend",
            PackCategory::Backend => "backend",
            PackCategory::Fullstack => "fullstack",
            PackCategory::Devops => "devops",
            PackCategory::Data => "data",
            PackCategory::Testing => "testing",
            PackCategory::Documentation => "documentation",
            PackCategory::Security => "security",
            PackCategory::General => "general",
        })
    }
}

fn default_required() -> bool {
    true
}

/// A component entry in a pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackComponent {
    pub name: String,
    /// Optional components are skipped when their tools are missing
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackComponents {
    #[serde(default)]
    pub modes: Vec<PackComponent>,
    #[serde(default)]
    pub workflows: Vec<PackComponent>,
    #[serde(default)]
    pub agents: Vec<PackComponent>,
}

impl PackComponents {
    pub fn of_kind(&self, kind: ComponentKind) -> &[PackComponent] {
        match kind {
            ComponentKind::Mode => &self.modes,
            ComponentKind::Workflow => &self.workflows,
            ComponentKind::Agent => &self.agents,
        }
    }

    /// Every entry with its reference, modes first
    pub fn iter(&self) -> impl Iterator<Item = (ComponentRef, &PackComponent)> {
        ComponentKind::ALL.into_iter().flat_map(move |kind| {
            self.of_kind(kind)
                .iter()
                .map(move |entry| (ComponentRef::new(kind, entry.name.clone()), entry))
        })
    }

    pub fn len(&self) -> usize {
        self.modes.len() + self.workflows.len() + self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A tool the pack relies on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

/// A parsed pack manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub name: String,
    pub version: String,
    pub description: String,
    pub category: PackCategory,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub components: PackComponents,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tools: BTreeMap<String, ToolSpec>,
}

/// Pack dependencies over the packs in a template source
#[derive(Debug)]
pub struct PackGraph<'a> {
    source: &'a TemplateSource,
}

impl<'a> PackGraph<'a> {
    pub fn new(source: &'a TemplateSource) -> Self {
        Self { source }
    }
}

impl DependencyGraph for PackGraph<'_> {
    type Node = String;

    /// Malformed packs are treated as leaves; validation reports them later.
    fn dependencies(&self, node: &String) -> Option<Vec<String>> {
        if !self.source.has_pack(node) {
            return None;
        }
        let dependencies = self
            .source
            .read_pack_value(node)
            .ok()
            .and_then(|value| value.get("dependencies").cloned())
            .and_then(|deps| serde_json::from_value::<Vec<String>>(deps).ok())
            .unwrap_or_default();
        Some(dependencies)
    }
}
