//! Component identity and metadata
//!
//! A component is a Markdown file with YAML front matter. Its identity is the
//! pair `(kind, name)`; the same name may exist once per kind.
//!
//! ## Kinds
//!
//! ```text
//! mode      -> modes/<name>.md       (may be depended upon)
//! workflow  -> workflows/<name>.md
//! agent     -> agents/<name>.md
//! ```

pub mod frontmatter;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModepackError, Result};

pub use frontmatter::{parse_metadata, render_component};

/// File extension shared by all component kinds
pub const COMPONENT_EXTENSION: &str = "md";

/// The kind of a component
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Mode,
    Workflow,
    Agent,
}

impl ComponentKind {
    /// All kinds, in display order
    pub const ALL: [ComponentKind; 3] = [
        ComponentKind::Mode,
        ComponentKind::Workflow,
        ComponentKind::Agent,
    ];

    /// Directory holding components of this kind (template source and project)
    pub fn dir_name(self) -> &'static str {
        match self {
            ComponentKind::Mode => "modes",
            ComponentKind::Workflow => "workflows",
            ComponentKind::Agent => "agents",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Mode => "mode",
            ComponentKind::Workflow => "workflow",
            ComponentKind::Agent => "agent",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = ModepackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mode" | "modes" => Ok(ComponentKind::Mode),
            "workflow" | "workflows" => Ok(ComponentKind::Workflow),
            "agent" | "agents" => Ok(ComponentKind::Agent),
            other => Err(ModepackError::ValidationFailed {
                subject: "component kind".to_string(),
                messages: vec![format!(
                    "Unknown component kind '{other}' (expected mode, workflow or agent)"
                )],
            }),
        }
    }
}

/// Reference to a component by kind and name, rendered as `kind:name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ComponentRef {
    pub kind: ComponentKind,
    pub name: String,
}

impl ComponentRef {
    pub fn new(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn mode(name: impl Into<String>) -> Self {
        Self::new(ComponentKind::Mode, name)
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

impl FromStr for ComponentRef {
    type Err = ModepackError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, name) = s
            .split_once(':')
            .ok_or_else(|| ModepackError::ValidationFailed {
                subject: "component reference".to_string(),
                messages: vec![format!("'{s}' is not of the form kind:name")],
            })?;
        Ok(Self::new(kind.parse()?, name))
    }
}

impl From<ComponentRef> for String {
    fn from(value: ComponentRef) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ComponentRef {
    type Error = ModepackError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Metadata extracted from a component's front matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMetadata {
    pub kind: ComponentKind,
    pub name: String,
    pub description: String,
    pub author: Option<String>,
    /// Free-form version tag, never interpreted as semver
    pub version: Option<String>,
    pub tags: Vec<String>,
    /// Names of modes this component depends on
    pub dependencies: Vec<String>,
}

impl ComponentMetadata {
    pub fn reference(&self) -> ComponentRef {
        ComponentRef::new(self.kind, self.name.clone())
    }

    /// Declared dependencies; only modes can be depended on
    pub fn dependency_refs(&self) -> Vec<ComponentRef> {
        self.dependencies
            .iter()
            .map(|name| ComponentRef::mode(name.clone()))
            .collect()
    }
}
