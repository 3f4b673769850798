//! Pack command implementation

use console::Style;

use crate::cli::{PackArgs, PackSubcommand};
use crate::commands::helpers::Context;
use crate::error::Result;
use crate::pack::{PackInstaller, ToolChecker};

/// Run pack command
pub fn run(ctx: &Context, args: PackArgs) -> Result<()> {
    let templates = ctx.require_templates()?;
    let mut installer = PackInstaller::new(templates, ToolChecker::system())?;

    match args.command {
        PackSubcommand::List => list(&installer),
        PackSubcommand::Validate { name } => {
            let packs = installer.validate(&name)?;
            let components: usize = packs.iter().map(|p| p.components.len()).sum();
            println!(
                "{} pack '{}' ({} packs, {} components)",
                Style::new().green().bold().apply_to("Valid"),
                name,
                packs.len(),
                components
            );
            Ok(())
        }
        PackSubcommand::Deps { name } => {
            let resolution = installer.deps(&name)?;
            println!("Install order for '{name}':");
            for (i, pack) in resolution.resolved.iter().enumerate() {
                println!("  {}. {}", i + 1, pack);
            }
            if !resolution.missing.is_empty() {
                println!(
                    "{} {}",
                    Style::new().red().apply_to("missing:"),
                    resolution.missing.join(", ")
                );
            }
            if !resolution.circular.is_empty() {
                println!(
                    "{} {}",
                    Style::new().red().apply_to("circular:"),
                    resolution.circular.join(", ")
                );
            }
            resolution.into_order(&format!("pack '{name}'")).map(|_| ())
        }
        PackSubcommand::Install { name, force } => {
            let mut engine = ctx.engine()?;
            let store = engine.project().manifest_store();
            let mut manifest = store.load()?;

            let report = installer.install(&mut engine, &mut manifest, &name, force)?;
            store.save(&manifest)?;
            engine.commit();

            for pack in &report.packs {
                println!(
                    "{} pack '{}' {}",
                    Style::new().green().bold().apply_to("Installed"),
                    pack.name,
                    pack.version
                );
                for component in &pack.installed {
                    println!("  + {component}");
                }
                for component in &pack.skipped {
                    println!(
                        "  {} {} (optional, tools missing)",
                        Style::new().dim().apply_to("-"),
                        component
                    );
                }
                for warning in &pack.warnings {
                    println!("  {} {}", Style::new().yellow().apply_to("warning:"), warning);
                }
            }
            Ok(())
        }
    }
}

fn list(installer: &PackInstaller) -> Result<()> {
    let packs = installer.list();
    if packs.is_empty() {
        println!("No starter packs found.");
        return Ok(());
    }

    println!("Starter packs ({}):", packs.len());
    println!();
    for pack in &packs {
        println!(
            "  {} {} [{}]",
            Style::new().bold().yellow().apply_to(&pack.name),
            pack.version,
            pack.category
        );
        println!("    {}", pack.description);
        println!("    {} components", pack.components);
        if !pack.dependencies.is_empty() {
            println!("    depends on: {}", pack.dependencies.join(", "));
        }
    }
    Ok(())
}
