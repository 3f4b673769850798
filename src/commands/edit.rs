//! Edit command implementation
//!
//! Opens an installed component in `$VISUAL`, `$EDITOR` or the editor from
//! `config.yaml`. The editor string may carry arguments (`code -w`).

use std::path::Path;
use std::process::Command;

use console::Style;

use crate::cli::EditArgs;
use crate::commands::helpers::{Context, NameResolver};
use crate::error::{ModepackError, Result};

/// Run the editor on `path` and wait for it to exit
pub fn open_in_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().ok_or_else(|| ModepackError::EditorFailed {
        editor: editor.to_string(),
        reason: "empty editor command".to_string(),
    })?;

    tracing::debug!("Running {} on {}", editor, path.display());
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| ModepackError::EditorFailed {
            editor: editor.to_string(),
            reason: e.to_string(),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ModepackError::EditorFailed {
            editor: editor.to_string(),
            reason: format!("exited with {status}"),
        })
    }
}

/// Run edit command
pub fn run(ctx: &Context, args: EditArgs) -> Result<()> {
    let project = ctx.project()?;
    let manifest = project.manifest_store().load()?;
    let component = NameResolver::installed(&manifest, &project)
        .resolve(&args.name, args.kind)?
        .component;

    let editor = ctx
        .settings
        .editor
        .clone()
        .ok_or_else(|| ModepackError::EditorFailed {
            editor: String::new(),
            reason: "no editor configured".to_string(),
        })?;

    let store = project.store();
    let path = store.path_of(&component);
    if !store.exists(&component) {
        return Err(ModepackError::not_installed(&component));
    }
    let before = store.hash_of(&component)?;
    open_in_editor(&editor, &path)?;

    if store.hash_of(&component)? != before && manifest.get_version(&component).is_some() {
        println!(
            "{} {} now has local changes; updates will need --force",
            Style::new().yellow().apply_to("note:"),
            component
        );
    }
    Ok(())
}
