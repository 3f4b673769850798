//! Init command implementation

use console::Style;

use crate::commands::helpers::Context;
use crate::error::Result;
use crate::project::Project;

/// Run init command
pub fn run(ctx: &Context) -> Result<()> {
    let root = &ctx.settings.project_root;
    let existed = Project::exists(root);
    let project = Project::init(root)?;

    if existed {
        println!("Project already initialized at {}", project.dir.display());
    } else {
        println!(
            "{} {}",
            Style::new().green().bold().apply_to("Initialized"),
            project.dir.display()
        );
    }

    let templates = ctx.templates();
    if !templates.exists() {
        println!(
            "{} no template catalog at {}",
            Style::new().yellow().apply_to("note:"),
            templates.root().display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_context;
    use crate::test_fixtures::{TemplateFixture, create_temp_dir};

    #[test]
    fn test_init_is_repeatable() {
        let temp = create_temp_dir();
        let templates = TemplateFixture::new();
        let ctx = test_context(temp.path(), &templates);

        run(&ctx).unwrap();
        assert!(temp.path().join(".modepack/manifest.json").is_file());
        assert!(temp.path().join(".modepack/tickets/pending").is_dir());
        run(&ctx).unwrap();
    }
}
