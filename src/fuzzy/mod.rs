//! Fuzzy name resolution
//!
//! Maps partial or misspelled names to component (or ticket) names. Each
//! candidate gets the highest score of the rules it satisfies:
//!
//! | Rule       | Condition                                  | Score               |
//! |------------|--------------------------------------------|---------------------|
//! | exact      | case-insensitive equality                  | 100                 |
//! | substring  | name contains the query                    | 50 + 49 * q/n       |
//! | acronym    | query is the segment acronym (`crh`)       | 45                  |
//! | acronym    | query (2+ chars) prefixes the acronym      | 40                  |
//! | partial    | Sørensen–Dice bigram similarity            | 39 * similarity     |
//!
//! Ties on score are broken by scope (project, global, built-in) and then by
//! name, so results are deterministic.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::error::{ModepackError, Result};

pub const EXACT_SCORE: u32 = 100;
const SUBSTRING_BASE: u32 = 50;
const SUBSTRING_SPAN: u32 = 49;
const ACRONYM_SCORE: u32 = 45;
const ACRONYM_PREFIX_SCORE: u32 = 40;
const PARTIAL_SPAN: f64 = 39.0;

/// Threshold and cap for "did you mean" suggestions
const SUGGESTION_MIN_SCORE: u32 = 10;
const SUGGESTION_LIMIT: usize = 3;

/// Where a candidate lives; earlier variants win ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    Project,
    Global,
    BuiltIn,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Project => "project",
            Scope::Global => "global",
            Scope::BuiltIn => "built-in",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub scope: Scope,
}

impl Candidate {
    pub fn new(name: impl Into<String>, scope: Scope) -> Self {
        Self {
            name: name.into(),
            scope,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    Acronym,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub name: String,
    pub scope: Scope,
    pub score: u32,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub max_results: usize,
    pub min_score: u32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            min_score: 30,
        }
    }
}

/// Outcome of resolving a single query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Exact(Match),
    /// A unique highest-scoring inexact match
    Best(Match),
    /// Several matches share the top score
    Ambiguous(Vec<Match>),
    NotFound { suggestions: Vec<Match> },
}

impl Resolved {
    /// The chosen match, or an error for ambiguity and absence.
    ///
    /// `not_found` builds the error when nothing matched at all.
    pub fn into_match(
        self,
        query: &str,
        not_found: impl FnOnce(&[Match]) -> ModepackError,
    ) -> Result<Match> {
        match self {
            Resolved::Exact(m) | Resolved::Best(m) => Ok(m),
            Resolved::Ambiguous(matches) => Err(ModepackError::AmbiguousName {
                query: query.to_string(),
                candidates: matches.into_iter().map(|m| m.name).collect(),
            }),
            Resolved::NotFound { suggestions } => Err(not_found(&suggestions)),
        }
    }
}

/// Acronym of a `-`/`_` delimited name; `None` for single-segment names
fn acronym(name: &str) -> Option<String> {
    let segments: Vec<&str> = name
        .split(['-', '_'])
        .filter(|s| !s.is_empty())
        .collect();
    if segments.len() < 2 {
        return None;
    }
    Some(segments.iter().filter_map(|s| s.chars().next()).collect())
}

/// Score one candidate name against a query, both compared lowercase
pub fn score(query: &str, name: &str) -> Option<(u32, MatchKind)> {
    let query = query.trim().to_lowercase();
    let name = name.to_lowercase();
    if query.is_empty() || name.is_empty() {
        return None;
    }
    if query == name {
        return Some((EXACT_SCORE, MatchKind::Exact));
    }

    let mut best: Option<(u32, MatchKind)> = None;
    let mut consider = |score: u32, kind: MatchKind| {
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, kind));
        }
    };

    if name.contains(&query) {
        let q = query.chars().count() as u32;
        let n = name.chars().count() as u32;
        consider(SUBSTRING_BASE + SUBSTRING_SPAN * q / n, MatchKind::Substring);
    }

    if let Some(acronym) = acronym(&name) {
        if query == acronym {
            consider(ACRONYM_SCORE, MatchKind::Acronym);
        } else if query.chars().count() >= 2 && acronym.starts_with(&query) {
            consider(ACRONYM_PREFIX_SCORE, MatchKind::Acronym);
        }
    }

    let similarity = strsim::sorensen_dice(&query, &name);
    consider((PARTIAL_SPAN * similarity).floor() as u32, MatchKind::Partial);

    best
}

fn ranking(a: &Match, b: &Match) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(a.scope.cmp(&b.scope))
        .then_with(|| a.name.cmp(&b.name))
}

/// Scores a query against a fixed candidate set
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    candidates: Vec<Candidate>,
    options: MatchOptions,
}

impl FuzzyMatcher {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            options: MatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    fn ranked(&self, query: &str, min_score: u32, limit: usize) -> Vec<Match> {
        let mut best: HashMap<&str, Match> = HashMap::new();
        for candidate in &self.candidates {
            let Some((score, kind)) = score(query, &candidate.name) else {
                continue;
            };
            if score < min_score {
                continue;
            }
            let m = Match {
                name: candidate.name.clone(),
                scope: candidate.scope,
                score,
                kind,
            };
            match best.get(candidate.name.as_str()) {
                Some(existing) if ranking(existing, &m) != Ordering::Greater => {}
                _ => {
                    best.insert(candidate.name.as_str(), m);
                }
            }
        }

        let mut matches: Vec<Match> = best.into_values().collect();
        matches.sort_by(ranking);
        matches.truncate(limit);
        matches
    }

    /// Matches at or above the minimum score, best first
    pub fn search(&self, query: &str) -> Vec<Match> {
        self.ranked(query, self.options.min_score, self.options.max_results)
    }

    /// Looser matches for "did you mean" hints
    pub fn suggestions(&self, query: &str) -> Vec<Match> {
        self.ranked(query, SUGGESTION_MIN_SCORE, SUGGESTION_LIMIT)
    }

    pub fn resolve(&self, query: &str) -> Resolved {
        let matches = self.search(query);
        let Some(top) = matches.first() else {
            return Resolved::NotFound {
                suggestions: self.suggestions(query),
            };
        };
        if top.kind == MatchKind::Exact {
            return Resolved::Exact(top.clone());
        }
        let tied: Vec<Match> = matches
            .iter()
            .take_while(|m| m.score == top.score)
            .cloned()
            .collect();
        if tied.len() > 1 {
            Resolved::Ambiguous(tied)
        } else {
            Resolved::Best(top.clone())
        }
    }
}
