//! Tests for the lifecycle engine

use super::*;
use crate::component::ComponentKind;
use crate::error::ErrorCategory;
use crate::test_fixtures::{ProjectFixture, TemplateFixture};
use crate::ui::SilentProgressReporter;

fn setup() -> (TemplateFixture, ProjectFixture) {
    let templates = TemplateFixture::new();
    templates.set_version("1.0.0");
    (templates, ProjectFixture::new())
}

#[test]
fn test_install_copies_template_and_records() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);

    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    let report = engine.install(&mut manifest, &architect, false).unwrap();
    engine.commit();

    assert_eq!(report.steps, vec![(architect.clone(), InstallStatus::Installed)]);
    assert!(manifest.is_installed(&architect));
    let record = manifest.get_version(&architect).unwrap();
    assert_eq!(record.version, "1.0.0");
    assert_eq!(record.hash, hash::hash_bytes(project.read(&architect).as_bytes()));
}

#[test]
fn test_install_is_idempotent() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();
    let record = manifest.get_version(&architect).cloned();

    project.edit(&architect, "my own notes");
    let report = engine.install(&mut manifest, &architect, false).unwrap();
    engine.commit();

    assert_eq!(report.with_status(InstallStatus::Unchanged), vec![&architect]);
    assert_eq!(project.read(&architect), "my own notes");
    assert_eq!(manifest.get_version(&architect).cloned(), record);
    assert_eq!(manifest.installed(ComponentKind::Mode), ["architect"]);
}

#[test]
fn test_force_install_overwrites() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();

    project.edit(&architect, "my own notes");
    engine.install(&mut manifest, &architect, true).unwrap();
    engine.commit();

    assert!(project.read(&architect).contains("name: architect"));
}

#[test]
fn test_install_dependencies_first() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &["reviewer"]);
    let reviewer = templates.mode("reviewer", "Code review", &[]);

    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    let report = engine.install(&mut manifest, &architect, false).unwrap();
    engine.commit();

    let order: Vec<&ComponentRef> = report.steps.iter().map(|(c, _)| c).collect();
    assert_eq!(order, vec![&reviewer, &architect]);
    assert_eq!(manifest.installed(ComponentKind::Mode), ["reviewer", "architect"]);
}

#[test]
fn test_installed_dependency_is_not_rewritten() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &["reviewer"]);
    let reviewer = templates.mode("reviewer", "Code review", &[]);

    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &reviewer, false).unwrap();
    project.edit(&reviewer, "tuned reviewer");

    let report = engine.install(&mut manifest, &architect, false).unwrap();
    engine.commit();

    assert_eq!(report.with_status(InstallStatus::Unchanged), vec![&reviewer]);
    assert_eq!(project.read(&reviewer), "tuned reviewer");
}

#[test]
fn test_workflow_depending_on_mode() {
    let (templates, project) = setup();
    templates.mode("planner", "Planning", &[]);
    templates.write_raw(
        "workflows/release.md",
        "---\nname: release\ndescription: Ship it\ndependencies: [planner]\n---\nSteps\n",
    );
    let release = ComponentRef::new(ComponentKind::Workflow, "release");

    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &release, false).unwrap();
    engine.commit();

    assert!(manifest.is_installed(&ComponentRef::mode("planner")));
    assert!(manifest.is_installed(&release));
}

#[test]
fn test_missing_dependency_writes_nothing() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &["ghost"]);

    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    let err = engine.install(&mut manifest, &architect, false).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Dependency);
    assert!(err.to_string().contains("missing [mode:ghost]"));
    assert!(!project.component_path(&architect).exists());
    assert!(!manifest.is_installed(&architect));
}

#[test]
fn test_circular_dependency_writes_nothing() {
    let (templates, project) = setup();
    let a = templates.mode("a", "A", &["b"]);
    let b = templates.mode("b", "B", &["a"]);

    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    let err = engine.install(&mut manifest, &a, false).unwrap_err();

    let ModepackError::DependencyResolution { circular, .. } = err else {
        panic!("expected a dependency error");
    };
    assert_eq!(circular, vec!["mode:a", "mode:b"]);
    assert!(!project.component_path(&a).exists());
    assert!(!project.component_path(&b).exists());
}

#[test]
fn test_missing_template() {
    let (templates, project) = setup();
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    let err = engine
        .install(&mut manifest, &ComponentRef::mode("nowhere"), false)
        .unwrap_err();
    assert!(matches!(err, ModepackError::TemplateNotFound { .. }));
}

#[test]
fn test_out_of_band_file_is_adopted() {
    let (templates, project) = setup();
    let local = ComponentRef::mode("homegrown");
    project.edit(&local, "---\nname: homegrown\ndescription: Mine\n---\n");

    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    let report = engine.install(&mut manifest, &local, false).unwrap();
    engine.commit();

    assert_eq!(report.with_status(InstallStatus::Adopted), vec![&local]);
    assert!(manifest.is_installed(&local));
    assert!(project.read(&local).contains("Mine"));
}

#[test]
fn test_fresh_install_is_up_to_date() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();

    let check = engine.check_update(&manifest, &architect).unwrap();
    assert!(!check.update_available);
    assert!(!check.local_changes);
    assert_eq!(
        engine.update(&mut manifest, &architect, false).unwrap(),
        UpdateOutcome::UpToDate
    );
}

#[test]
fn test_new_template_version_is_available() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();
    engine.commit();

    templates.set_version("1.1.0");
    templates.mode("architect", "System design, revised", &[]);
    let mut engine = project.engine(&templates);

    let check = engine.check_update(&manifest, &architect).unwrap();
    assert!(check.update_available);
    assert!(!check.local_changes);
    assert_eq!(check.installed_version.as_deref(), Some("1.0.0"));
    assert_eq!(check.available_version, "1.1.0");

    let outcome = engine.update(&mut manifest, &architect, false).unwrap();
    engine.commit();
    let UpdateOutcome::Applied { backup, .. } = outcome else {
        panic!("expected an applied update");
    };
    assert!(backup.exists());
    assert!(project.read(&architect).contains("revised"));
    assert_eq!(manifest.get_version(&architect).unwrap().version, "1.1.0");
}

#[test]
fn test_local_changes_block_update() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();

    project.edit(&architect, "hand tuned");
    let check = engine.check_update(&manifest, &architect).unwrap();
    assert!(check.local_changes);
    assert!(check.update_available);

    let err = engine.update(&mut manifest, &architect, false).unwrap_err();
    assert!(matches!(err, ModepackError::LocalModification { .. }));
    assert_eq!(project.read(&architect), "hand tuned");
}

#[test]
fn test_forced_update_backs_up_local_changes() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();

    project.edit(&architect, "hand tuned");
    let outcome = engine.update(&mut manifest, &architect, true).unwrap();
    engine.commit();

    let UpdateOutcome::Applied { backup, .. } = outcome else {
        panic!("expected an applied update");
    };
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), "hand tuned");
    assert!(backup.starts_with(project.project.dir.join("modes").join(".backups")));
    assert!(project.read(&architect).contains("name: architect"));
}

#[test]
fn test_record_less_component_is_up_to_date() {
    let (templates, project) = setup();
    let legacy = templates.mode("legacy", "Old", &[]);
    project.edit(&legacy, "whatever");
    std::fs::write(
        project.project.manifest_store().path(),
        r#"{"installed": {"mode": ["legacy"]}}"#,
    )
    .unwrap();

    let engine = project.engine(&templates);
    let manifest = project.manifest();
    let check = engine.check_update(&manifest, &legacy).unwrap();
    assert!(!check.update_available);
    assert_eq!(check.installed_version, None);
}

#[test]
fn test_removed_template() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();
    engine.commit();

    std::fs::remove_file(templates.path().join("modes/architect.md")).unwrap();
    let mut engine = project.engine(&templates);

    let err = engine.update(&mut manifest, &architect, false).unwrap_err();
    assert!(matches!(err, ModepackError::TemplateRemoved { .. }));
    assert!(project.component_path(&architect).exists());

    let report = engine.check_for_updates(&manifest);
    assert_eq!(report.removed_upstream, vec![architect]);
}

#[test]
fn test_check_for_updates_reports_available() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let scout = templates.agent("scout", "Explores");
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();
    engine.install(&mut manifest, &scout, false).unwrap();
    engine.commit();

    project.edit(&scout, "changed");
    let engine = project.engine(&templates);
    let report = engine.check_for_updates(&manifest);

    assert_eq!(report.available.len(), 1);
    assert_eq!(report.available[0].component, scout);
    assert!(report.available[0].local_changes);
}

#[test]
fn test_diff() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();

    let same = engine.diff(&architect).unwrap();
    assert!(!same.differs);
    assert_eq!(same.installed_hash, same.template_hash);

    project.edit(&architect, "changed");
    let changed = engine.diff(&architect).unwrap();
    assert!(changed.differs);
    assert_ne!(changed.installed_hash, changed.template_hash);
    assert_eq!(project.read(&architect), "changed");
}

#[test]
fn test_update_all_continues_past_failures() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let reviewer = templates.mode("reviewer", "Code review", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();
    engine.install(&mut manifest, &reviewer, false).unwrap();
    engine.commit();

    templates.set_version("2.0.0");
    project.edit(&architect, "hand tuned");
    let mut engine = project.engine(&templates);
    let report = engine.update_all(&mut manifest, false, &mut SilentProgressReporter);
    engine.commit();

    assert_eq!(report.updated, vec![reviewer]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, architect);
    assert!(!report.is_success());
    assert_eq!(project.read(&architect), "hand tuned");
}

#[test]
fn test_remove() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();
    engine.install(&mut manifest, &architect, false).unwrap();
    engine.remove(&mut manifest, &architect).unwrap();
    engine.commit();

    assert!(!project.component_path(&architect).exists());
    assert!(!manifest.is_installed(&architect));

    let mut engine = project.engine(&templates);
    let err = engine.remove(&mut manifest, &architect).unwrap_err();
    assert!(matches!(err, ModepackError::ComponentNotFound { .. }));
}

#[test]
fn test_uncommitted_engine_rolls_back() {
    let (templates, project) = setup();
    let architect = templates.mode("architect", "System design", &[]);
    {
        let mut engine = project.engine(&templates);
        let mut manifest = project.manifest();
        engine.install(&mut manifest, &architect, false).unwrap();
    }
    assert!(!project.component_path(&architect).exists());
}

#[test]
fn test_install_local_is_record_less() {
    let (templates, project) = setup();
    let scratch = ComponentRef::new(ComponentKind::Agent, "scratch");
    let mut engine = project.engine(&templates);
    let mut manifest = project.manifest();

    let status = engine
        .install_local(&mut manifest, &scratch, b"---\nname: scratch\ndescription: Local\n---\n", false)
        .unwrap();
    assert_eq!(status, InstallStatus::Installed);
    assert!(manifest.is_installed(&scratch));
    assert!(manifest.get_version(&scratch).is_none());

    let again = engine
        .install_local(&mut manifest, &scratch, b"other", false)
        .unwrap();
    assert_eq!(again, InstallStatus::Unchanged);
    engine.commit();

    assert!(project.read(&scratch).contains("name: scratch"));
    let engine = project.engine(&templates);
    assert!(!engine.check_update(&manifest, &scratch).unwrap().update_available);
}
