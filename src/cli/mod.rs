//! CLI definitions using clap derive API
//!
//! Argument types live in submodules:
//! - component: component commands (list, search, install, update, diff,
//!   create, delete, edit)
//! - pack: starter pack commands
//! - ticket: ticket commands
//! - completions: completions command arguments

use clap::builder::{FalseyValueParser, Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod component;
pub mod pack;
pub mod ticket;

pub use completions::CompletionsArgs;
pub use component::{
    CreateArgs, DeleteArgs, DiffArgs, EditArgs, InstallArgs, ListArgs, SearchArgs, UpdateArgs,
};
pub use pack::{PackArgs, PackSubcommand};
pub use ticket::{TicketArgs, TicketSubcommand};

/// modepack - AI component manager
///
/// Install, update and compose modes, workflows and agents from a template catalog.
#[derive(Parser, Debug)]
#[command(
    name = "modepack",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Package manager for AI assistant modes, workflows and agents",
    long_about = "modepack installs components (modes, workflows, agents) from a local template \
                  catalog into a project's .modepack/ directory, tracks their versions, detects \
                  local edits and installs curated starter packs.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  modepack init                         \x1b[90m# Create .modepack/ here\x1b[0m\n   \
                  modepack install architect            \x1b[90m# Install a mode and its dependencies\x1b[0m\n   \
                  modepack update --check               \x1b[90m# Show available updates\x1b[0m\n   \
                  modepack update --all                 \x1b[90m# Update every installed component\x1b[0m\n   \
                  modepack pack install frontend        \x1b[90m# Install a starter pack\x1b[0m\n   \
                  modepack ticket create \"Fix login\"    \x1b[90m# File a ticket\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory (defaults to the enclosing project or current directory)
    #[arg(long, short = 'p', global = true, env = "MODEPACK_PROJECT")]
    pub project: Option<PathBuf>,

    /// Template catalog directory
    #[arg(long, global = true, env = "MODEPACK_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// Enable verbose output
    #[arg(
        long,
        short = 'v',
        global = true,
        env = "MODEPACK_VERBOSE",
        value_parser = FalseyValueParser::new()
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .modepack/ in the project directory
    Init,

    /// List installed or available components
    List(ListArgs),

    /// Search components by name
    Search(SearchArgs),

    /// Install a component and its dependencies
    Install(InstallArgs),

    /// Update installed components from the template catalog
    Update(UpdateArgs),

    /// Show whether an installed component differs from its template
    Diff(DiffArgs),

    /// Create a new component in the project
    Create(CreateArgs),

    /// Delete an installed component
    Delete(DeleteArgs),

    /// Open an installed component in the editor
    Edit(EditArgs),

    /// Manage starter packs
    Pack(PackArgs),

    /// Manage project tickets
    Ticket(TicketArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    #[test]
    fn test_cli_parsing_init() {
        let cli = Cli::try_parse_from(["modepack", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init));
    }

    #[test]
    fn test_cli_parsing_install() {
        let cli =
            Cli::try_parse_from(["modepack", "install", "architect", "--type", "mode", "-f"])
                .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.name, "architect");
                assert_eq!(args.kind, Some(ComponentKind::Mode));
                assert!(args.force);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["modepack", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "modepack",
            "-v",
            "-p",
            "/tmp/project",
            "--templates",
            "/tmp/templates",
            "list",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.project, Some(PathBuf::from("/tmp/project")));
        assert_eq!(cli.templates, Some(PathBuf::from("/tmp/templates")));
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["modepack", "list", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parsing_pack_install() {
        let cli = Cli::try_parse_from(["modepack", "pack", "install", "frontend"]).unwrap();
        match cli.command {
            Commands::Pack(PackArgs {
                command: PackSubcommand::Install { name, force },
            }) => {
                assert_eq!(name, "frontend");
                assert!(!force);
            }
            _ => panic!("Expected pack install"),
        }
    }

    #[test]
    fn test_cli_parsing_ticket_move() {
        let cli = Cli::try_parse_from(["modepack", "ticket", "move", "3", "done"]).unwrap();
        match cli.command {
            Commands::Ticket(TicketArgs {
                command: TicketSubcommand::Move { id, status },
            }) => {
                assert_eq!(id, "3");
                assert_eq!(status, crate::ticket::TicketStatus::Done);
            }
            _ => panic!("Expected ticket move"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["modepack", "install", "x", "--type", "skill"]).is_err());
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["modepack", "completions", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => {
                assert_eq!(args.shell, "bash");
            }
            _ => panic!("Expected Completions command"),
        }
    }
}
