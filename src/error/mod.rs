//! Error types and handling for modepack
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostic codes
//! and remediation hints. Every variant carries a `help` text that the CLI
//! prints under the error message.
//!
//! Variants fall into the categories of [`ErrorCategory`]:
//! - not found: templates, installed components, packs, tickets
//! - local modification: update blocked until `--force`
//! - validation: pack schema and front matter violations
//! - dependency: missing, circular and self dependencies
//! - security: tool checks outside the allow-list
//! - io: file system and configuration plumbing

use miette::Diagnostic;
use thiserror::Error;

use crate::component::{ComponentKind, ComponentRef};

/// Coarse classification of errors, used by callers that react by category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    LocalModification,
    Validation,
    Dependency,
    Security,
    Io,
}

/// Main error type for modepack operations
#[derive(Error, Diagnostic, Debug)]
pub enum ModepackError {
    // Not found
    #[error("{kind} '{name}' is not installed")]
    #[diagnostic(
        code(modepack::component::not_found),
        help("Run 'modepack list' to see installed components")
    )]
    ComponentNotFound { kind: ComponentKind, name: String },

    #[error("No template for {kind} '{name}'")]
    #[diagnostic(
        code(modepack::template::not_found),
        help("Run 'modepack list --available' to see available components")
    )]
    TemplateNotFound { kind: ComponentKind, name: String },

    #[error("Template for {kind} '{name}' was removed upstream")]
    #[diagnostic(
        code(modepack::template::removed),
        help("The installed copy was kept; delete it with 'modepack delete' if it is no longer needed")
    )]
    TemplateRemoved { kind: ComponentKind, name: String },

    #[error("'{query}' matches several names: {}", .candidates.join(", "))]
    #[diagnostic(
        code(modepack::name::ambiguous),
        help("Use a more specific name or the exact name shown above")
    )]
    AmbiguousName {
        query: String,
        candidates: Vec<String>,
    },

    #[error("No {what} matches '{query}'")]
    #[diagnostic(
        code(modepack::name::not_found),
        help("Run 'modepack search <name>' to find names, or 'modepack list --available' to browse")
    )]
    NameNotFound { query: String, what: String },

    #[error("Template catalog not found at: {path}")]
    #[diagnostic(
        code(modepack::template::catalog_not_found),
        help("Pass --templates, set MODEPACK_TEMPLATES, or set 'templates' in .modepack/config.yaml")
    )]
    TemplatesNotFound { path: String },

    #[error("Pack '{name}' not found")]
    #[diagnostic(
        code(modepack::pack::not_found),
        help("Run 'modepack pack list' to see available packs")
    )]
    PackNotFound { name: String },

    #[error("Ticket '{id}' not found")]
    #[diagnostic(
        code(modepack::ticket::not_found),
        help("Run 'modepack ticket list' to see tickets")
    )]
    TicketNotFound { id: String },

    #[error("Project not found at: {path}")]
    #[diagnostic(
        code(modepack::project::not_found),
        help("Run 'modepack init' to create a project")
    )]
    ProjectNotFound { path: String },

    // Local modification
    #[error("{kind} '{name}' has local changes")]
    #[diagnostic(
        code(modepack::update::local_changes),
        help("Use --force to overwrite local changes; the current file is backed up first")
    )]
    LocalModification { kind: ComponentKind, name: String },

    // Validation
    #[error("Validation failed for {subject}: {}", .messages.join("; "))]
    #[diagnostic(
        code(modepack::validation::failed),
        help("Fix the listed problems in the source file and try again")
    )]
    ValidationFailed {
        subject: String,
        messages: Vec<String>,
    },

    #[error("Invalid front matter in {path}: {reason}")]
    #[diagnostic(
        code(modepack::validation::front_matter),
        help("Component files must open with a '---' YAML block containing 'name' and 'description'")
    )]
    InvalidFrontMatter { path: String, reason: String },

    // Dependency
    #[error(
        "Cannot resolve dependencies of {subject}: missing [{}], circular [{}]",
        .missing.join(", "),
        .circular.join(", ")
    )]
    #[diagnostic(
        code(modepack::deps::unresolved),
        help("Add the missing entries to the template source and remove the circular references")
    )]
    DependencyResolution {
        subject: String,
        missing: Vec<String>,
        circular: Vec<String>,
    },

    #[error("Pack '{name}' depends on itself")]
    #[diagnostic(
        code(modepack::deps::self_dependency),
        help("Remove the pack from its own dependencies list")
    )]
    SelfDependency { name: String },

    // Security
    #[error("Refusing to run '{command}': not an allow-listed tool")]
    #[diagnostic(
        code(modepack::security::command_not_allowed),
        help("Tool checks only run known tools; remove the tool or mark the component required")
    )]
    CommandNotAllowed { command: String },

    #[error("{failed} of {total} updates failed")]
    #[diagnostic(
        code(modepack::update::batch_failed),
        help("The other components were updated; re-run with -v for details, or --force to overwrite local changes")
    )]
    BatchFailed { failed: usize, total: usize },

    // Io and configuration
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(
        code(modepack::fs::read_failed),
        help("Check that the file exists and is readable")
    )]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(
        code(modepack::fs::write_failed),
        help("Check permissions and free space for the project directory")
    )]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(modepack::fs::io_error), help("Run with -v for more detail"))]
    IoError { message: String },

    #[error("Failed to parse {path}: {reason}")]
    #[diagnostic(
        code(modepack::config::parse_failed),
        help("Fix the syntax error, or move the file aside to start from defaults")
    )]
    ConfigParseFailed { path: String, reason: String },

    #[error("Editor '{editor}' failed: {reason}")]
    #[diagnostic(
        code(modepack::editor::failed),
        help("Set VISUAL or EDITOR to an editor available on PATH")
    )]
    EditorFailed { editor: String, reason: String },
}

impl ModepackError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ModepackError::ComponentNotFound { .. }
            | ModepackError::TemplateNotFound { .. }
            | ModepackError::TemplateRemoved { .. }
            | ModepackError::AmbiguousName { .. }
            | ModepackError::NameNotFound { .. }
            | ModepackError::TemplatesNotFound { .. }
            | ModepackError::PackNotFound { .. }
            | ModepackError::TicketNotFound { .. }
            | ModepackError::ProjectNotFound { .. } => ErrorCategory::NotFound,
            ModepackError::LocalModification { .. } | ModepackError::BatchFailed { .. } => {
                ErrorCategory::LocalModification
            }
            ModepackError::ValidationFailed { .. } | ModepackError::InvalidFrontMatter { .. } => {
                ErrorCategory::Validation
            }
            ModepackError::DependencyResolution { .. } | ModepackError::SelfDependency { .. } => {
                ErrorCategory::Dependency
            }
            ModepackError::CommandNotAllowed { .. } => ErrorCategory::Security,
            ModepackError::FileReadFailed { .. }
            | ModepackError::FileWriteFailed { .. }
            | ModepackError::IoError { .. }
            | ModepackError::ConfigParseFailed { .. }
            | ModepackError::EditorFailed { .. } => ErrorCategory::Io,
        }
    }

    pub fn template_not_found(reference: &ComponentRef) -> Self {
        ModepackError::TemplateNotFound {
            kind: reference.kind,
            name: reference.name.clone(),
        }
    }

    pub fn not_installed(reference: &ComponentRef) -> Self {
        ModepackError::ComponentNotFound {
            kind: reference.kind,
            name: reference.name.clone(),
        }
    }

    pub fn validation(subject: impl Into<String>, message: impl Into<String>) -> Self {
        ModepackError::ValidationFailed {
            subject: subject.into(),
            messages: vec![message.into()],
        }
    }
}

impl From<std::io::Error> for ModepackError {
    fn from(err: std::io::Error) -> Self {
        ModepackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ModepackError {
    fn from(err: serde_yaml::Error) -> Self {
        ModepackError::ConfigParseFailed {
            path: "yaml".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ModepackError {
    fn from(err: serde_json::Error) -> Self {
        ModepackError::ConfigParseFailed {
            path: "json".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for ModepackError {
    fn from(err: inquire::InquireError) -> Self {
        ModepackError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ModepackError>;
