//! Command implementations for modepack CLI
//!
//! Every mutating command follows the same shape: load the manifest, run
//! the operation through a [`LifecycleEngine`](crate::lifecycle::LifecycleEngine),
//! save the manifest once and commit the engine's file writes.

pub mod completions;
pub mod create;
pub mod delete;
pub mod diff;
pub mod edit;
pub mod helpers;
pub mod init;
pub mod install;
pub mod list;
pub mod pack;
pub mod search;
pub mod ticket;
pub mod update;
pub mod version;

pub use helpers::Context;

#[cfg(test)]
pub(crate) fn test_context(
    project_root: &std::path::Path,
    templates: &crate::test_fixtures::TemplateFixture,
) -> Context {
    Context::new(crate::config::Settings {
        project_root: project_root.to_path_buf(),
        templates: templates.path().to_path_buf(),
        global_dir: project_root.join("global-home"),
        editor: None,
    })
}
