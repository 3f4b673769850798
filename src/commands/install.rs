//! Install command implementation
//!
//! Names are resolved against the project, the global scope and the
//! template catalog. Catalog components are installed with their mode
//! dependencies; components that only exist in the global scope are copied
//! in as local, record-less components.

use console::Style;

use crate::cli::InstallArgs;
use crate::commands::helpers::{Context, NameResolver};
use crate::error::Result;
use crate::fuzzy::Scope;
use crate::lifecycle::InstallStatus;

/// Run install command
pub fn run(ctx: &Context, args: InstallArgs) -> Result<()> {
    let mut engine = ctx.engine()?;
    let store = engine.project().manifest_store();
    let mut manifest = store.load()?;

    let global = ctx.global_store();
    let resolved = NameResolver::installable(
        &manifest,
        Some(engine.project()),
        global.clone(),
        engine.templates().components().clone(),
    )
    .resolve(&args.name, args.kind)?;
    let component = resolved.component;

    let from_global =
        resolved.scope == Scope::Global && !engine.templates().components().exists(&component);
    let steps = if from_global {
        let content = global.read_bytes(&component)?;
        let status = engine.install_local(&mut manifest, &component, &content, args.force)?;
        vec![(component.clone(), status)]
    } else {
        engine.install(&mut manifest, &component, args.force)?.steps
    };

    store.save(&manifest)?;
    engine.commit();

    for (step, status) in &steps {
        match status {
            InstallStatus::Installed => println!(
                "{} {}",
                Style::new().green().bold().apply_to("Installed"),
                step
            ),
            InstallStatus::Adopted => println!(
                "{} {} (existing file kept)",
                Style::new().cyan().bold().apply_to("Adopted"),
                step
            ),
            InstallStatus::Unchanged if *step == component => println!(
                "{} is already installed; use --force to reinstall",
                step
            ),
            InstallStatus::Unchanged => {}
        }
    }
    Ok(())
}
