//! Ticket command implementation

use console::Style;
use inquire::Confirm;

use crate::cli::{TicketArgs, TicketSubcommand};
use crate::commands::helpers::Context;
use crate::error::Result;
use crate::ticket::{TicketStatus, TicketStore};

/// Run ticket command
pub fn run(ctx: &Context, args: TicketArgs) -> Result<()> {
    let project = ctx.project()?;
    let store = TicketStore::new(project.tickets_dir(), project.fs().clone());

    match args.command {
        TicketSubcommand::Create { title, body } => {
            let ticket = store.create(&title, &body)?;
            println!(
                "{} ticket {}",
                Style::new().green().bold().apply_to("Created"),
                ticket.id
            );
        }
        TicketSubcommand::List { status } => {
            let tickets = store.list(status);
            if tickets.is_empty() {
                println!("No tickets.");
            }
            for ticket in &tickets {
                let status = match ticket.status {
                    TicketStatus::Pending => Style::new().yellow(),
                    TicketStatus::InProgress => Style::new().cyan(),
                    TicketStatus::Done => Style::new().green(),
                }
                .apply_to(format!("{:<11}", ticket.status.to_string()));
                println!(
                    "  {} {:<40} {}",
                    status,
                    ticket.id,
                    Style::new().dim().apply_to(ticket.created.format("%Y-%m-%d"))
                );
            }
        }
        TicketSubcommand::Move { id, status } => {
            let ticket = store.move_to(&id, status)?;
            println!("Moved {} to {}", ticket.id, ticket.status);
        }
        TicketSubcommand::Delete { id, yes } => {
            let ticket = store.find(&id)?;
            if !yes {
                let confirmed = Confirm::new(&format!("Delete ticket {}?", ticket.id))
                    .with_default(false)
                    .prompt()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            store.delete(&ticket.id)?;
            println!(
                "{} ticket {}",
                Style::new().red().bold().apply_to("Deleted"),
                ticket.id
            );
        }
    }
    Ok(())
}
