//! Create command implementation
//!
//! Writes a skeleton component into the project. Created components have no
//! template, so they are tracked without a version record.

use console::Style;

use crate::cli::CreateArgs;
use crate::commands::helpers::Context;
use crate::component::{ComponentMetadata, ComponentRef, render_component};
use crate::error::{ModepackError, Result};

/// Component names: lowercase letters, digits, `-` and `_`
fn validate_name(name: &str) -> Result<()> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ModepackError::validation(
            format!("name '{name}'"),
            "use lowercase letters, digits, '-' and '_', starting with a letter or digit",
        ))
    }
}

fn skeleton(metadata: &ComponentMetadata) -> Result<String> {
    let title: String = metadata
        .name
        .split(['-', '_'])
        .filter(|s| !s.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    render_component(
        metadata,
        &format!("# {title}\n\nDescribe how the assistant should behave in this {}.", metadata.kind),
    )
}

/// Run create command
pub fn run(ctx: &Context, args: CreateArgs) -> Result<()> {
    validate_name(&args.name)?;
    let mut engine = ctx.engine()?;
    let store = engine.project().manifest_store();
    let mut manifest = store.load()?;

    let component = ComponentRef::new(args.kind, args.name.clone());
    if engine.project().store().exists(&component) {
        return Err(ModepackError::validation(
            component.to_string(),
            "already exists in the project; use 'modepack edit' to change it",
        ));
    }

    let metadata = ComponentMetadata {
        kind: args.kind,
        name: args.name,
        description: args
            .description
            .unwrap_or_else(|| format!("Custom {}", args.kind)),
        author: None,
        version: None,
        tags: Vec::new(),
        dependencies: Vec::new(),
    };
    let content = skeleton(&metadata)?;
    engine.install_local(&mut manifest, &component, content.as_bytes(), false)?;

    store.save(&manifest)?;
    let path = engine.project().store().path_of(&component);
    engine.commit();

    println!(
        "{} {} at {}",
        Style::new().green().bold().apply_to("Created"),
        component,
        path.display()
    );
    Ok(())
}
