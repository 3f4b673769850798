//! List command implementation
//!
//! Without flags this lists installed components with their recorded
//! version and whether the file was edited since modepack wrote it. With
//! `--available` it lists the template catalog and the global scope.

use console::Style;

use crate::cli::ListArgs;
use crate::commands::helpers::Context;
use crate::component::{ComponentKind, ComponentRef};
use crate::error::Result;
use crate::hash;
use crate::manifest::Manifest;
use crate::project::Project;
use crate::store::ContentStore;

/// Run list command
pub fn run(ctx: &Context, args: ListArgs) -> Result<()> {
    let kinds: Vec<ComponentKind> = match args.kind {
        Some(kind) => vec![kind],
        None => ComponentKind::ALL.to_vec(),
    };

    if args.available {
        let project = ctx.project().ok();
        let manifest = match &project {
            Some(project) => project.manifest_store().load()?,
            None => Manifest::default(),
        };
        let templates = ctx.require_templates()?;
        println!(
            "Template catalog {} (version {})",
            templates.root().display(),
            templates.version()
        );
        for kind in kinds {
            list_catalog(kind, templates.components(), &ctx.global_store(), &manifest);
        }
        return Ok(());
    }

    let project = ctx.project()?;
    let manifest = project.manifest_store().load()?;
    let total: usize = kinds.iter().map(|k| manifest.installed(*k).len()).sum();
    if total == 0 {
        println!("No components installed.");
    }
    for kind in kinds {
        list_installed(kind, &project, &manifest);
    }
    Ok(())
}

fn heading(kind: ComponentKind, count: usize) {
    println!();
    println!(
        "{} ({})",
        Style::new().bold().apply_to(kind.dir_name()),
        count
    );
}

fn list_installed(kind: ComponentKind, project: &Project, manifest: &Manifest) {
    let store = project.store();
    let names = manifest.installed(kind);
    if !names.is_empty() {
        heading(kind, names.len());
    }
    for name in names {
        let component = ComponentRef::new(kind, name.clone());
        let record = manifest.get_version(&component);
        let version = record.map_or("local", |r| r.version.as_str());

        let state = if !store.exists(&component) {
            Style::new().red().apply_to("missing").to_string()
        } else {
            match (record, store.hash_of(&component)) {
                (Some(r), Ok(live)) if !hash::verify_hash(&r.hash, &live) => {
                    Style::new().yellow().apply_to("modified").to_string()
                }
                _ => String::new(),
            }
        };
        println!(
            "  {:<32} {:<10} {}",
            Style::new().bold().yellow().apply_to(name),
            version,
            state
        );
    }

    let untracked: Vec<String> = store
        .list_names(kind)
        .into_iter()
        .filter(|name| !names.contains(name))
        .collect();
    for name in untracked {
        println!(
            "  {:<32} {:<10} {}",
            name,
            "-",
            Style::new().dim().apply_to("untracked")
        );
    }
}

fn list_catalog(kind: ComponentKind, templates: &ContentStore, global: &ContentStore, manifest: &Manifest) {
    let builtin = templates.list_available(kind);
    let personal = global.list_available(kind);
    heading(kind, builtin.len() + personal.len());

    let installed_mark = |name: &str| {
        if manifest.is_installed(&ComponentRef::new(kind, name)) {
            Style::new().green().apply_to("✓").to_string()
        } else {
            " ".to_string()
        }
    };

    for meta in &builtin {
        println!(
            "  {} {:<32} {}",
            installed_mark(&meta.name),
            Style::new().bold().apply_to(&meta.name),
            meta.description
        );
    }
    for meta in &personal {
        println!(
            "  {} {:<32} {} {}",
            installed_mark(&meta.name),
            Style::new().bold().apply_to(&meta.name),
            meta.description,
            Style::new().dim().apply_to("(global)")
        );
    }
}
