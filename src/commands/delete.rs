//! Delete command implementation

use console::Style;
use inquire::Confirm;

use crate::cli::DeleteArgs;
use crate::commands::helpers::{Context, NameResolver};
use crate::error::Result;

/// Run delete command
pub fn run(ctx: &Context, args: DeleteArgs) -> Result<()> {
    let mut engine = ctx.engine()?;
    let store = engine.project().manifest_store();
    let mut manifest = store.load()?;

    let component = NameResolver::installed(&manifest, engine.project())
        .resolve(&args.name, args.kind)?
        .component;

    if !args.yes {
        let confirmed = Confirm::new(&format!("Delete {component}?"))
            .with_default(false)
            .with_help_message("The file under .modepack/ is removed")
            .prompt()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    engine.remove(&mut manifest, &component)?;
    store.save(&manifest)?;
    engine.commit();

    println!(
        "{} {}",
        Style::new().red().bold().apply_to("Deleted"),
        component
    );
    Ok(())
}
