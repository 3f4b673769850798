//! Command helper utilities
//!
//! [`Context`] turns the resolved settings into projects, stores and
//! engines. [`NameResolver`] maps user-typed names onto components across
//! the project, global and built-in scopes.

use console::Style;

use crate::component::{ComponentKind, ComponentRef};
use crate::config::{Overrides, Settings};
use crate::error::{ModepackError, Result};
use crate::fuzzy::{Candidate, FuzzyMatcher, Match, MatchKind, Resolved, Scope};
use crate::lifecycle::LifecycleEngine;
use crate::manifest::Manifest;
use crate::project::Project;
use crate::store::{ContentStore, StoreRole, TemplateSource};

/// Everything a command needs to find its inputs
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
}

impl Context {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Resolve settings from flags, environment and config file
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        Ok(Self::new(Settings::resolve(overrides)?))
    }

    pub fn project(&self) -> Result<Project> {
        Project::open_with(&self.settings.project_root, self.settings.fs())
    }

    /// Template source, whether or not it exists yet
    pub fn templates(&self) -> TemplateSource {
        TemplateSource::new(&self.settings.templates, self.settings.fs())
    }

    /// Template source that must exist on disk
    pub fn require_templates(&self) -> Result<TemplateSource> {
        let templates = self.templates();
        if !templates.exists() {
            return Err(ModepackError::TemplatesNotFound {
                path: self.settings.templates.display().to_string(),
            });
        }
        Ok(templates)
    }

    pub fn global_store(&self) -> ContentStore {
        ContentStore::new(&self.settings.global_dir, StoreRole::Global, self.settings.fs())
    }

    pub fn engine(&self) -> Result<LifecycleEngine> {
        Ok(LifecycleEngine::new(self.templates(), self.project()?))
    }
}

/// A name resolved to one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub component: ComponentRef,
    pub scope: Scope,
    pub exact: bool,
}

/// Fuzzy name lookup over the scopes a command cares about
#[derive(Debug)]
pub struct NameResolver<'a> {
    manifest: &'a Manifest,
    project: Option<ContentStore>,
    catalogs: Vec<(Scope, ContentStore)>,
    what: &'static str,
}

impl<'a> NameResolver<'a> {
    /// Only components installed in the project
    pub fn installed(manifest: &'a Manifest, project: &Project) -> Self {
        Self {
            manifest,
            project: Some(project.store()),
            catalogs: Vec::new(),
            what: "installed component",
        }
    }

    /// Installed components plus the global and built-in catalogs
    pub fn installable(
        manifest: &'a Manifest,
        project: Option<&Project>,
        global: ContentStore,
        templates: ContentStore,
    ) -> Self {
        Self {
            manifest,
            project: project.map(Project::store),
            catalogs: vec![(Scope::Global, global), (Scope::BuiltIn, templates)],
            what: "component",
        }
    }

    pub fn candidates(&self, kind: ComponentKind) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .manifest
            .installed(kind)
            .iter()
            .map(|name| Candidate::new(name.clone(), Scope::Project))
            .collect();
        if let Some(project) = &self.project {
            candidates.extend(
                project
                    .list_names(kind)
                    .into_iter()
                    .map(|name| Candidate::new(name, Scope::Project)),
            );
        }
        for (scope, store) in &self.catalogs {
            candidates.extend(
                store
                    .list_names(kind)
                    .into_iter()
                    .map(|name| Candidate::new(name, *scope)),
            );
        }
        candidates
    }

    pub fn matcher(&self, kind: ComponentKind) -> FuzzyMatcher {
        FuzzyMatcher::new(self.candidates(kind))
    }

    /// Resolve `query` within `kind`, or across every kind when `None`.
    ///
    /// An exact name wins outright. Otherwise the single best match across
    /// kinds is taken; ties are reported as ambiguous.
    pub fn resolve(&self, query: &str, kind: Option<ComponentKind>) -> Result<ResolvedName> {
        let kinds: Vec<ComponentKind> = match kind {
            Some(kind) => vec![kind],
            None => ComponentKind::ALL.to_vec(),
        };

        let mut exact = Vec::new();
        let mut inexact: Vec<(ComponentKind, Match)> = Vec::new();
        let mut tied: Vec<(ComponentKind, Match)> = Vec::new();
        let mut suggestions: Vec<(ComponentKind, Match)> = Vec::new();

        for kind in kinds {
            match self.matcher(kind).resolve(query) {
                Resolved::Exact(m) => exact.push((kind, m)),
                Resolved::Best(m) => inexact.push((kind, m)),
                Resolved::Ambiguous(matches) => {
                    tied.extend(matches.into_iter().map(|m| (kind, m)));
                }
                Resolved::NotFound { suggestions: s } => {
                    suggestions.extend(s.into_iter().map(|m| (kind, m)));
                }
            }
        }

        if exact.len() == 1 {
            let (kind, m) = exact.remove(0);
            return Ok(chosen(kind, m));
        }
        if exact.len() > 1 {
            return Err(ambiguous(query, &exact));
        }

        let top = inexact
            .iter()
            .chain(tied.iter())
            .map(|(_, m)| m.score)
            .max();
        if let Some(top) = top {
            let mut best: Vec<(ComponentKind, Match)> = inexact
                .into_iter()
                .chain(tied)
                .filter(|(_, m)| m.score == top)
                .collect();
            if best.len() == 1 {
                let (kind, m) = best.remove(0);
                let resolved = chosen(kind, m);
                eprintln!(
                    "{} '{}' resolved to {}",
                    Style::new().dim().apply_to("note:"),
                    query,
                    resolved.component
                );
                return Ok(resolved);
            }
            return Err(ambiguous(query, &best));
        }

        suggestions.sort_by(|(ka, a), (kb, b)| {
            b.score
                .cmp(&a.score)
                .then(a.scope.cmp(&b.scope))
                .then(ka.cmp(kb))
                .then_with(|| a.name.cmp(&b.name))
        });
        suggestions.truncate(3);
        if !suggestions.is_empty() {
            let names: Vec<String> = suggestions
                .iter()
                .map(|(kind, m)| ComponentRef::new(*kind, m.name.clone()).to_string())
                .collect();
            eprintln!(
                "{} {}",
                Style::new().yellow().apply_to("Did you mean:"),
                names.join(", ")
            );
        }
        Err(ModepackError::NameNotFound {
            query: query.to_string(),
            what: match kind {
                Some(kind) => self.what.replace("component", kind.as_str()),
                None => self.what.to_string(),
            },
        })
    }
}

fn chosen(kind: ComponentKind, m: Match) -> ResolvedName {
    ResolvedName {
        exact: m.kind == MatchKind::Exact,
        scope: m.scope,
        component: ComponentRef::new(kind, m.name),
    }
}

fn ambiguous(query: &str, matches: &[(ComponentKind, Match)]) -> ModepackError {
    ModepackError::AmbiguousName {
        query: query.to_string(),
        candidates: matches
            .iter()
            .map(|(kind, m)| ComponentRef::new(*kind, m.name.clone()).to_string())
            .collect(),
    }
}
