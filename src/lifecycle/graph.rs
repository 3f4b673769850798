//! Mode dependencies as a [`DependencyGraph`]

use crate::component::ComponentRef;
use crate::resolver::DependencyGraph;
use crate::store::ContentStore;

/// Component dependencies read from template front matter
#[derive(Debug)]
pub struct ComponentGraph<'a> {
    templates: &'a ContentStore,
}

impl<'a> ComponentGraph<'a> {
    pub fn new(templates: &'a ContentStore) -> Self {
        Self { templates }
    }
}

impl DependencyGraph for ComponentGraph<'_> {
    type Node = ComponentRef;

    fn dependencies(&self, node: &ComponentRef) -> Option<Vec<ComponentRef>> {
        if !self.templates.exists(node) {
            return None;
        }
        match self.templates.metadata(node) {
            Ok(meta) => Some(meta.dependency_refs()),
            Err(e) => {
                tracing::warn!("Treating {} as dependency-free: {}", node, e);
                Some(Vec::new())
            }
        }
    }
}
