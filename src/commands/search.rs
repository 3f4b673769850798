//! Search command implementation

use console::Style;

use crate::cli::SearchArgs;
use crate::commands::helpers::{Context, NameResolver};
use crate::component::{ComponentKind, ComponentRef};
use crate::error::Result;
use crate::fuzzy::{Match, MatchOptions};
use crate::manifest::Manifest;

/// Run search command
pub fn run(ctx: &Context, args: SearchArgs) -> Result<()> {
    let project = ctx.project().ok();
    let manifest = match &project {
        Some(project) => project.manifest_store().load()?,
        None => Manifest::default(),
    };
    let resolver = NameResolver::installable(
        &manifest,
        project.as_ref(),
        ctx.global_store(),
        ctx.templates().components().clone(),
    );

    let results = search(&resolver, &args.query, args.kind, args.limit);
    if results.is_empty() {
        println!("No components match '{}'.", args.query);
        return Ok(());
    }

    for (component, m) in &results {
        println!(
            "  {:>3}  {:<40} {}",
            m.score,
            Style::new().bold().apply_to(component),
            Style::new().dim().apply_to(m.scope)
        );
    }
    Ok(())
}

/// Matches across the requested kinds, best first
pub fn search(
    resolver: &NameResolver<'_>,
    query: &str,
    kind: Option<ComponentKind>,
    limit: usize,
) -> Vec<(ComponentRef, Match)> {
    let kinds: Vec<ComponentKind> = match kind {
        Some(kind) => vec![kind],
        None => ComponentKind::ALL.to_vec(),
    };
    let options = MatchOptions {
        max_results: limit,
        ..MatchOptions::default()
    };

    let mut results: Vec<(ComponentRef, Match)> = kinds
        .into_iter()
        .flat_map(|kind| {
            resolver
                .matcher(kind)
                .with_options(options)
                .search(query)
                .into_iter()
                .map(move |m| (ComponentRef::new(kind, m.name.clone()), m))
        })
        .collect();
    results.sort_by(|(ca, a), (cb, b)| {
        b.score
            .cmp(&a.score)
            .then(a.scope.cmp(&b.scope))
            .then_with(|| ca.cmp(cb))
    });
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContentStore, StoreRole};
    use crate::test_fixtures::{TemplateFixture, create_temp_dir};

    #[test]
    fn test_search_ranks_across_kinds() {
        let templates = TemplateFixture::new();
        templates.mode("code-review-helper", "Reviews", &[]);
        templates.agent("reviewer", "Reviews too");
        templates.workflow("release", "Ships");
        let global = create_temp_dir();
        let manifest = Manifest::default();
        let resolver = NameResolver::installable(
            &manifest,
            None,
            ContentStore::os(global.path(), StoreRole::Global),
            templates.store(),
        );

        let results = search(&resolver, "review", None, 10);
        let names: Vec<String> = results.iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(names[0], "agent:reviewer");
        assert!(names.contains(&"mode:code-review-helper".to_string()));

        let limited = search(&resolver, "review", None, 1);
        assert_eq!(limited.len(), 1);
    }
}
