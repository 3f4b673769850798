//! modepack - package manager for AI assistant components
//!
//! Installs modes, workflows and agents from a local template catalog into a
//! project's `.modepack/` directory, tracks their versions and local edits,
//! and composes them through starter packs.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod component;
mod config;
mod error;
mod fuzzy;
mod hash;
mod lifecycle;
mod manifest;
mod pack;
mod project;
mod resolver;
mod store;
mod ticket;
mod transaction;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use commands::Context;
use config::Overrides;
use error::{ModepackError, Result};

/// Log filter: `RUST_LOG` wins, then `--verbose`
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }
    EnvFilter::new(if verbose { "warn,modepack=debug" } else { "warn" })
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn dispatch(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        project: cli.project,
        templates: cli.templates,
    };
    let context = || Context::resolve(&overrides);

    match cli.command {
        Commands::Init => commands::init::run(&context()?),
        Commands::List(args) => commands::list::run(&context()?, args),
        Commands::Search(args) => commands::search::run(&context()?, args),
        Commands::Install(args) => commands::install::run(&context()?, args),
        Commands::Update(args) => commands::update::run(&context()?, args),
        Commands::Diff(args) => commands::diff::run(&context()?, args),
        Commands::Create(args) => commands::create::run(&context()?, args),
        Commands::Delete(args) => commands::delete::run(&context()?, args),
        Commands::Edit(args) => commands::edit::run(&context()?, args),
        Commands::Pack(args) => commands::pack::run(&context()?, args),
        Commands::Ticket(args) => commands::ticket::run(&context()?, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn report(err: &ModepackError) {
    eprintln!("Error: {err}");
    if let Some(help) = err.help() {
        eprintln!("  help: {help}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dispatch(cli) {
        tracing::debug!(category = ?e.category(), "{:?}", e);
        report(&e);
        std::process::exit(1);
    }
}
