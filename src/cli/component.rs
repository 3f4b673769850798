//! Arguments for the component commands

use clap::Parser;

use crate::component::ComponentKind;

/// Arguments for list command
#[derive(Parser, Debug, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  List installed components:\n    modepack list\n\n\
                  List installed workflows:\n    modepack list --type workflow\n\n\
                  List components available in the template catalog:\n    modepack list --available")]
pub struct ListArgs {
    /// Only show components of this type
    #[arg(long = "type", short = 't', value_enum)]
    pub kind: Option<ComponentKind>,

    /// Show the template catalog instead of installed components
    #[arg(long, short = 'a')]
    pub available: bool,
}

/// Arguments for search command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Search by partial name:\n    modepack search review\n\n\
                  Search by acronym:\n    modepack search crh --type mode")]
pub struct SearchArgs {
    /// Partial name, acronym or misspelling
    pub query: String,

    /// Only search components of this type
    #[arg(long = "type", short = 't', value_enum)]
    pub kind: Option<ComponentKind>,

    /// Maximum number of results
    #[arg(long, short = 'n', default_value_t = 10)]
    pub limit: usize,
}

/// Arguments for install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install a mode and the modes it depends on:\n    modepack install architect\n\n\
                  Install an agent by partial name:\n    modepack install scout --type agent\n\n\
                  Reinstall over an existing copy:\n    modepack install architect --force")]
pub struct InstallArgs {
    /// Component name (partial names are resolved)
    pub name: String,

    /// Component type; inferred from the name when omitted
    #[arg(long = "type", short = 't', value_enum)]
    pub kind: Option<ComponentKind>,

    /// Reinstall even if already installed
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Arguments for update command
#[derive(Parser, Debug, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Show available updates:\n    modepack update --check\n\n\
                  Update one component:\n    modepack update architect\n\n\
                  Update everything, overwriting local edits (backups are kept):\n    modepack update --all --force")]
pub struct UpdateArgs {
    /// Component to update
    #[arg(conflicts_with = "all")]
    pub name: Option<String>,

    /// Component type; inferred from the name when omitted
    #[arg(long = "type", short = 't', value_enum)]
    pub kind: Option<ComponentKind>,

    /// Update every installed component
    #[arg(long)]
    pub all: bool,

    /// Only report what would be updated
    #[arg(long, short = 'c')]
    pub check: bool,

    /// Overwrite local changes
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Arguments for diff command
#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Installed component name
    pub name: String,

    #[arg(long = "type", short = 't', value_enum)]
    pub kind: Option<ComponentKind>,
}

/// Arguments for create command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Create a mode:\n    modepack create reviewer --description \"Reviews pull requests\"\n\n\
                  Create a workflow:\n    modepack create release --type workflow")]
pub struct CreateArgs {
    /// Name of the new component
    pub name: String,

    #[arg(long = "type", short = 't', value_enum, default_value_t = ComponentKind::Mode)]
    pub kind: ComponentKind,

    /// One-line description written to the front matter
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

/// Arguments for delete command
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Installed component name
    pub name: String,

    #[arg(long = "type", short = 't', value_enum)]
    pub kind: Option<ComponentKind>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for edit command
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Installed component name
    pub name: String,

    #[arg(long = "type", short = 't', value_enum)]
    pub kind: Option<ComponentKind>,
}
