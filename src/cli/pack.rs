use clap::{Parser, Subcommand};

/// Arguments for pack command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List starter packs:\n    modepack pack list\n\n\
                  Check a pack without installing it:\n    modepack pack validate frontend\n\n\
                  Install a pack and the packs it depends on:\n    modepack pack install frontend")]
pub struct PackArgs {
    #[command(subcommand)]
    pub command: PackSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PackSubcommand {
    /// List starter packs in the template catalog
    List,

    /// Install a starter pack
    Install {
        /// Pack name
        name: String,

        /// Reinstall components that are already installed
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Check a pack, its dependencies and component references
    Validate {
        /// Pack name
        name: String,
    },

    /// Show the dependency order of a pack
    Deps {
        /// Pack name
        name: String,
    },
}
