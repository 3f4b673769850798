//! Dependency resolution by depth-first search
//!
//! One algorithm serves both pack dependencies (nodes are pack names over the
//! pack catalog) and mode dependencies (nodes are [`ComponentRef`]s over the
//! template source). Graphs are built per call and never persisted.
//!
//! ## Algorithm
//!
//! Three-color marking with an explicit path:
//!
//! 1. **unvisited**: node not seen yet
//! 2. **visiting**: node is on the current DFS path
//! 3. **visited**: node and its dependencies are done
//!
//! Reaching a *visiting* node closes a cycle. Every node on the path from that
//! node to the top is reported in `circular` and none of them is resolved.
//! Nodes the graph does not know go to `missing`. A node is only resolved
//! when every dependency resolved, so nodes above a cycle or a missing node
//! are left out as well. Resolution never stops at the first problem, so
//! callers can report both lists in full.
//!
//! ```text
//! a -> b -> c          resolved: [c, b, a]
//! p -> q -> p          circular: [p, q]
//! a -> ghost           missing:  [ghost]     resolved: []
//! r -> x -> y -> x     circular: [x, y]      resolved: []
//! ```
//!
//! [`ComponentRef`]: crate::component::ComponentRef

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::error::{ModepackError, Result};

/// A graph that can be walked from any node
pub trait DependencyGraph {
    type Node: Clone + Eq + Hash + fmt::Display;

    /// Direct dependencies of `node`, or `None` if the node does not exist
    fn dependencies(&self, node: &Self::Node) -> Option<Vec<Self::Node>>;
}

/// Outcome of a resolution: install order plus everything that went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<N> {
    /// Dependencies before dependents
    pub resolved: Vec<N>,
    pub missing: Vec<N>,
    pub circular: Vec<N>,
}

impl<N> Default for Resolution<N> {
    fn default() -> Self {
        Self {
            resolved: Vec::new(),
            missing: Vec::new(),
            circular: Vec::new(),
        }
    }
}

impl<N: fmt::Display> Resolution<N> {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty() && self.circular.is_empty()
    }

    /// The install order, or a dependency error listing both problem lists
    pub fn into_order(self, subject: &str) -> Result<Vec<N>> {
        if self.is_ok() {
            return Ok(self.resolved);
        }
        Err(ModepackError::DependencyResolution {
            subject: subject.to_string(),
            missing: self.missing.iter().map(ToString::to_string).collect(),
            circular: self.circular.iter().map(ToString::to_string).collect(),
        })
    }
}

struct DfsContext<'a, G: DependencyGraph> {
    graph: &'a G,
    visiting: HashSet<G::Node>,
    visited: HashSet<G::Node>,
    in_cycle: HashSet<G::Node>,
    /// Finished nodes that cannot be resolved
    blocked: HashSet<G::Node>,
    path: Vec<G::Node>,
    resolution: Resolution<G::Node>,
}

fn push_unique<N: PartialEq + Clone>(list: &mut Vec<N>, node: &N) {
    if !list.contains(node) {
        list.push(node.clone());
    }
}

impl<G: DependencyGraph> DfsContext<'_, G> {
    fn visit(&mut self, node: &G::Node) {
        if self.visiting.contains(node) {
            let start = self.path.iter().position(|n| n == node).unwrap_or(0);
            for member in &self.path[start..] {
                self.in_cycle.insert(member.clone());
                push_unique(&mut self.resolution.circular, member);
            }
            return;
        }
        if self.visited.contains(node) {
            return;
        }

        let Some(dependencies) = self.graph.dependencies(node) else {
            self.visited.insert(node.clone());
            self.blocked.insert(node.clone());
            push_unique(&mut self.resolution.missing, node);
            return;
        };

        self.visiting.insert(node.clone());
        self.path.push(node.clone());
        for dependency in &dependencies {
            self.visit(dependency);
        }
        self.path.pop();
        self.visiting.remove(node);
        self.visited.insert(node.clone());

        let unresolved_dependency = dependencies
            .iter()
            .any(|d| self.in_cycle.contains(d) || self.blocked.contains(d));
        if self.in_cycle.contains(node) || unresolved_dependency {
            self.blocked.insert(node.clone());
            return;
        }

        // Post-order: dependencies were pushed first
        push_unique(&mut self.resolution.resolved, node);
    }
}

/// Resolve the dependency closure of `roots` in install order
pub fn resolve<G: DependencyGraph>(graph: &G, roots: &[G::Node]) -> Resolution<G::Node> {
    let mut ctx = DfsContext {
        graph,
        visiting: HashSet::new(),
        visited: HashSet::new(),
        in_cycle: HashSet::new(),
        blocked: HashSet::new(),
        path: Vec::new(),
        resolution: Resolution::default(),
    };
    for root in roots {
        ctx.visit(root);
    }
    ctx.resolution
}

/// A pack listing itself among its dependencies
pub fn check_self_dependency(name: &str, dependencies: &[String]) -> Result<()> {
    if dependencies.iter().any(|d| d == name) {
        return Err(ModepackError::SelfDependency {
            name: name.to_string(),
        });
    }
    Ok(())
}
