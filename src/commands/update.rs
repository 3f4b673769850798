//! Update command implementation
//!
//! `update --check` (or `update` with no name) only reports. `update <name>`
//! updates one component and `update --all` runs the batch update; both save
//! the manifest once at the end.

use console::Style;

use crate::cli::UpdateArgs;
use crate::commands::helpers::{Context, NameResolver};
use crate::error::{ModepackError, Result};
use crate::lifecycle::{LifecycleEngine, UpdateCheck, UpdateOutcome};
use crate::manifest::Manifest;
use crate::ui::InteractiveProgressReporter;

/// Run update command
pub fn run(ctx: &Context, args: UpdateArgs) -> Result<()> {
    ctx.require_templates()?;
    let mut engine = ctx.engine()?;
    let store = engine.project().manifest_store();
    let mut manifest = store.load()?;

    if args.all {
        if args.check {
            return report_available(&engine, &manifest);
        }
        return update_all(engine, &mut manifest, args.force, |m| store.save(m));
    }

    let Some(name) = args.name else {
        return report_available(&engine, &manifest);
    };

    let component = NameResolver::installed(&manifest, engine.project())
        .resolve(&name, args.kind)?
        .component;

    if args.check {
        print_check(&engine.check_update(&manifest, &component)?);
        return Ok(());
    }

    match engine.update(&mut manifest, &component, args.force)? {
        UpdateOutcome::UpToDate => println!("{component} is up to date"),
        UpdateOutcome::Applied { from, to, backup } => {
            store.save(&manifest)?;
            engine.commit();
            println!(
                "{} {} {} -> {}",
                Style::new().green().bold().apply_to("Updated"),
                component,
                from.as_deref().unwrap_or("local"),
                to
            );
            println!("  backup: {}", backup.display());
        }
    }
    Ok(())
}

fn print_check(check: &UpdateCheck) {
    if !check.update_available {
        println!("{} is up to date", check.component);
        return;
    }
    let changes = if check.local_changes {
        Style::new().yellow().apply_to(" (local changes)").to_string()
    } else {
        String::new()
    };
    println!(
        "  {:<40} {} -> {}{}",
        check.component.to_string(),
        check.installed_version.as_deref().unwrap_or("local"),
        check.available_version,
        changes
    );
}

fn report_available(engine: &LifecycleEngine, manifest: &Manifest) -> Result<()> {
    let report = engine.check_for_updates(manifest);
    if report.available.is_empty() {
        println!("All components are up to date.");
    } else {
        println!("Updates available ({}):", report.available.len());
        for check in &report.available {
            print_check(check);
        }
        if report.available.iter().any(|c| c.local_changes) {
            println!();
            println!("Components with local changes need --force; the current file is backed up first.");
        }
    }
    if !report.removed_upstream.is_empty() {
        println!();
        println!(
            "{}",
            Style::new().yellow().apply_to("Removed from the template catalog (kept installed):")
        );
        for component in &report.removed_upstream {
            println!("  {component}");
        }
    }
    Ok(())
}

fn update_all(
    mut engine: LifecycleEngine,
    manifest: &mut Manifest,
    force: bool,
    save: impl FnOnce(&Manifest) -> Result<()>,
) -> Result<()> {
    let total = manifest.installed_refs().len();
    let mut progress = InteractiveProgressReporter::new();
    let report = engine.update_all(manifest, force, &mut progress);

    save(manifest)?;
    engine.commit();

    for component in &report.updated {
        println!(
            "{} {}",
            Style::new().green().bold().apply_to("Updated"),
            component
        );
    }
    println!(
        "{} updated, {} up to date, {} failed",
        report.updated.len(),
        report.up_to_date.len(),
        report.failed.len()
    );
    for (component, err) in &report.failed {
        eprintln!("  {} {}: {}", Style::new().red().apply_to("✗"), component, err);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(ModepackError::BatchFailed {
            failed: report.failed.len(),
            total,
        })
    }
}
