use clap::{Parser, Subcommand};

use crate::ticket::TicketStatus;

/// Arguments for ticket command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  File a ticket:\n    modepack ticket create \"Fix login redirect\"\n\n\
                  Start working on ticket 2:\n    modepack ticket move 2 in-progress\n\n\
                  List finished tickets:\n    modepack ticket list --status done")]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TicketSubcommand {
    /// Create a pending ticket
    Create {
        /// Ticket title
        title: String,

        /// Ticket body (Markdown)
        #[arg(long, short = 'b', default_value = "")]
        body: String,
    },

    /// List tickets
    List {
        /// Only show tickets with this status
        #[arg(long, short = 's', value_enum)]
        status: Option<TicketStatus>,
    },

    /// Move a ticket to another status
    Move {
        /// Ticket id, number or partial title
        id: String,

        #[arg(value_enum)]
        status: TicketStatus,
    },

    /// Delete a ticket
    Delete {
        /// Ticket id, number or partial title
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
