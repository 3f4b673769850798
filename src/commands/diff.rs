//! Diff command implementation

use console::Style;

use crate::cli::DiffArgs;
use crate::commands::helpers::{Context, NameResolver};
use crate::error::Result;

/// Run diff command
pub fn run(ctx: &Context, args: DiffArgs) -> Result<()> {
    let engine = ctx.engine()?;
    let manifest = engine.project().manifest_store().load()?;
    let component = NameResolver::installed(&manifest, engine.project())
        .resolve(&args.name, args.kind)?
        .component;

    let report = engine.diff(&component)?;
    if report.differs {
        println!(
            "{} {} differs from its template",
            Style::new().yellow().bold().apply_to("≠"),
            component
        );
    } else {
        println!(
            "{} {} matches its template",
            Style::new().green().bold().apply_to("="),
            component
        );
    }
    println!("  installed: {}", report.installed_hash);
    println!("  template:  {}", report.template_hash);
    Ok(())
}
