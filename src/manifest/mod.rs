//! Manifest of installed components and packs
//!
//! `.modepack/manifest.json` is the single source of truth for what is
//! installed. Saving is read-modify-write: the file on disk is re-read and
//! only what this invocation changed since `load` is merged over it, so keys
//! written by other tools (or edited by hand in the meantime) survive.
//! Arrays and scalars are replaced, objects merge key by key, and entries
//! removed with [`Manifest::forget`] are deleted from the merged result.
//!
//! There is no locking; two concurrent invocations may race on save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::component::{ComponentKind, ComponentRef};
use crate::error::{ModepackError, Result};
use crate::store::Filesystem;

/// Manifest file name inside the project directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Current manifest format version
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Version and content digest of a component as last written by modepack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledRecord {
    pub version: String,
    pub hash: String,
    pub last_updated: DateTime<Utc>,
}

/// An installed pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRecord {
    pub version: String,
    pub installed_at: DateTime<Utc>,
    #[serde(default)]
    pub components: Vec<ComponentRef>,
    #[serde(default)]
    pub skipped: Vec<ComponentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Removal {
    Component(ComponentRef),
    Pack(String),
}

/// In-memory manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    installed: BTreeMap<ComponentKind, Vec<String>>,

    #[serde(default)]
    records: BTreeMap<ComponentKind, BTreeMap<String, InstalledRecord>>,

    #[serde(default)]
    packs: BTreeMap<String, PackRecord>,

    /// Top-level keys this version does not know about
    #[serde(flatten)]
    extra: Map<String, Value>,

    #[serde(skip)]
    removals: Vec<Removal>,

    /// Serialized form as loaded; `None` for a manifest never read from disk
    #[serde(skip)]
    baseline: Option<Value>,
}

impl Default for Manifest {
    fn default() -> Self {
        let installed = ComponentKind::ALL
            .iter()
            .map(|kind| (*kind, Vec::new()))
            .collect();
        Self {
            schema_version: SCHEMA_VERSION,
            installed,
            records: BTreeMap::new(),
            packs: BTreeMap::new(),
            extra: Map::new(),
            removals: Vec::new(),
            baseline: None,
        }
    }
}

impl Manifest {
    /// Names installed for a kind, in installation order
    pub fn installed(&self, kind: ComponentKind) -> &[String] {
        self.installed.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every installed component, grouped by kind
    pub fn installed_refs(&self) -> Vec<ComponentRef> {
        ComponentKind::ALL
            .iter()
            .flat_map(|kind| {
                self.installed(*kind)
                    .iter()
                    .map(|name| ComponentRef::new(*kind, name.clone()))
            })
            .collect()
    }

    pub fn is_installed(&self, component: &ComponentRef) -> bool {
        self.installed(component.kind).contains(&component.name)
    }

    pub fn get_version(&self, component: &ComponentRef) -> Option<&InstalledRecord> {
        self.records
            .get(&component.kind)
            .and_then(|records| records.get(&component.name))
    }

    /// Add the component to its type list and upsert its record
    pub fn record_version(&mut self, component: &ComponentRef, version: &str, hash: &str) {
        self.removals
            .retain(|r| *r != Removal::Component(component.clone()));

        let names = self.installed.entry(component.kind).or_default();
        if !names.contains(&component.name) {
            names.push(component.name.clone());
        }
        self.records.entry(component.kind).or_default().insert(
            component.name.clone(),
            InstalledRecord {
                version: version.to_string(),
                hash: hash.to_string(),
                last_updated: Utc::now(),
            },
        );
    }

    /// Add the component to its type list without a record; record-less
    /// components are always up to date
    pub fn add_installed(&mut self, component: &ComponentRef) {
        self.removals
            .retain(|r| *r != Removal::Component(component.clone()));
        let names = self.installed.entry(component.kind).or_default();
        if !names.contains(&component.name) {
            names.push(component.name.clone());
        }
    }

    /// Drop a component from the type list and records.
    ///
    /// The removal is remembered so that [`ManifestStore::save`] does not
    /// bring the entry back from the on-disk copy.
    pub fn forget(&mut self, component: &ComponentRef) {
        if let Some(names) = self.installed.get_mut(&component.kind) {
            names.retain(|n| *n != component.name);
        }
        if let Some(records) = self.records.get_mut(&component.kind) {
            records.remove(&component.name);
        }
        let removal = Removal::Component(component.clone());
        if !self.removals.contains(&removal) {
            self.removals.push(removal);
        }

        // Packs left without any installed component are forgotten too
        let mut emptied = Vec::new();
        for (name, pack) in &mut self.packs {
            let before = pack.components.len();
            pack.components.retain(|c| c != component);
            if before > 0 && pack.components.is_empty() {
                emptied.push(name.clone());
            }
        }
        for name in emptied {
            self.forget_pack(&name);
        }
    }

    pub fn record_pack(&mut self, name: &str, record: PackRecord) {
        self.removals.retain(|r| *r != Removal::Pack(name.to_string()));
        self.packs.insert(name.to_string(), record);
    }

    pub fn forget_pack(&mut self, name: &str) {
        self.packs.remove(name);
        let removal = Removal::Pack(name.to_string());
        if !self.removals.contains(&removal) {
            self.removals.push(removal);
        }
    }

    pub fn pack(&self, name: &str) -> Option<&PackRecord> {
        self.packs.get(name)
    }

    pub fn packs(&self) -> &BTreeMap<String, PackRecord> {
        &self.packs
    }

    fn apply_removals(&self, merged: &mut Value) {
        for removal in &self.removals {
            match removal {
                Removal::Component(component) => {
                    if let Some(records) = merged
                        .pointer_mut(&format!("/records/{}", component.kind))
                        .and_then(Value::as_object_mut)
                    {
                        records.remove(&component.name);
                    }
                }
                Removal::Pack(name) => {
                    if let Some(packs) = merged.get_mut("packs").and_then(Value::as_object_mut) {
                        packs.remove(name);
                    }
                }
            }
        }
    }
}

/// The parts of `current` that differ from `baseline`. Objects are compared
/// key by key; any other value is kept whole when it changed.
fn changes(current: Value, baseline: Option<&Value>) -> Option<Value> {
    match (current, baseline) {
        (Value::Object(current), Some(Value::Object(baseline))) => {
            let changed: Map<String, Value> = current
                .into_iter()
                .filter_map(|(key, value)| {
                    changes(value, baseline.get(&key)).map(|diff| (key, diff))
                })
                .collect();
            (!changed.is_empty()).then_some(Value::Object(changed))
        }
        (current, Some(baseline)) if current == *baseline => None,
        (current, _) => Some(current),
    }
}

/// Merge `overlay` into `base`: objects key by key, everything else replaced
fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Loads and saves the manifest file
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
    fs: Arc<dyn Filesystem>,
}

impl ManifestStore {
    /// Store for `<project_dir>/manifest.json`
    pub fn new(project_dir: &Path, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            path: project_dir.join(MANIFEST_FILE),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_value(&self) -> Result<Option<Value>> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        let content = self.fs.read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| self.parse_failed(e))
    }

    fn parse_failed(&self, e: serde_json::Error) -> ModepackError {
        ModepackError::ConfigParseFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }

    /// Load the manifest; an absent file yields an empty manifest
    pub fn load(&self) -> Result<Manifest> {
        let Some(value) = self.read_value()? else {
            return Ok(Manifest::default());
        };
        let mut manifest: Manifest =
            serde_json::from_value(value).map_err(|e| self.parse_failed(e))?;
        manifest.baseline = Some(serde_json::to_value(&manifest)?);
        Ok(manifest)
    }

    /// Persist what changed since `load`, merging over whatever is on disk now
    pub fn save(&self, manifest: &Manifest) -> Result<()> {
        let current = serde_json::to_value(manifest)?;
        let overlay = match &manifest.baseline {
            Some(baseline) => {
                changes(current, Some(baseline)).unwrap_or_else(|| Value::Object(Map::new()))
            }
            None => current,
        };
        let mut merged = match self.read_value() {
            Ok(Some(value)) => value,
            Ok(None) => Value::Object(Map::new()),
            Err(e) => {
                tracing::warn!("Overwriting unreadable manifest: {}", e);
                Value::Object(Map::new())
            }
        };
        deep_merge(&mut merged, overlay);
        manifest.apply_removals(&mut merged);

        let mut content = serde_json::to_string_pretty(&merged)?;
        content.push('\n');
        self.fs.write(&self.path, content.as_bytes())?;
        tracing::debug!("Saved manifest to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OsFilesystem;
    use crate::test_fixtures::create_temp_dir;

    fn store(dir: &Path) -> ManifestStore {
        ManifestStore::new(dir, Arc::new(OsFilesystem))
    }

    #[test]
    fn test_load_missing_is_empty() {
        let temp = create_temp_dir();
        let manifest = store(temp.path()).load().unwrap();
        assert!(manifest.installed(ComponentKind::Mode).is_empty());
        assert_eq!(manifest.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_malformed_manifest_is_parse_error() {
        let temp = create_temp_dir();
        std::fs::write(temp.path().join(MANIFEST_FILE), "{ broken").unwrap();
        let err = store(temp.path()).load().unwrap_err();
        assert!(matches!(err, ModepackError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_record_and_reload() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        let architect = ComponentRef::mode("architect");

        let mut manifest = store.load().unwrap();
        manifest.record_version(&architect, "1.2.0", "blake3:abc");
        manifest.record_version(&architect, "1.3.0", "blake3:def");
        store.save(&manifest).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.installed(ComponentKind::Mode), ["architect"]);
        let record = reloaded.get_version(&architect).unwrap();
        assert_eq!(record.version, "1.3.0");
        assert_eq!(record.hash, "blake3:def");
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let temp = create_temp_dir();
        std::fs::write(
            temp.path().join(MANIFEST_FILE),
            r#"{
                "schema_version": 1,
                "installed": {"mode": [], "workflow": [], "agent": []},
                "records": {"mode": {"old": {"version": "1.0.0", "hash": "blake3:0", "last_updated": "2026-01-01T00:00:00Z", "note": "kept"}}},
                "telemetry": {"enabled": false}
            }"#,
        )
        .unwrap();

        let store = store(temp.path());
        let mut manifest = store.load().unwrap();
        manifest.record_version(&ComponentRef::mode("new"), "2.0.0", "blake3:1");
        store.save(&manifest).unwrap();

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["telemetry"]["enabled"], Value::Bool(false));
        assert_eq!(raw["records"]["mode"]["old"]["note"], "kept");
        assert_eq!(raw["records"]["mode"]["new"]["version"], "2.0.0");
    }

    #[test]
    fn test_save_merges_concurrent_disk_changes() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        let manifest = store.load().unwrap();

        // Another writer adds a key after we loaded
        std::fs::write(store.path(), r#"{"plugins": {"x": 1}}"#).unwrap();
        store.save(&manifest).unwrap();

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["plugins"]["x"], 1);
    }

    #[test]
    fn test_save_keeps_disk_edits_to_untouched_records() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        let reviewer = ComponentRef::mode("reviewer");
        let architect = ComponentRef::mode("architect");

        let mut manifest = store.load().unwrap();
        manifest.record_version(&reviewer, "1.0.0", "blake3:1");
        store.save(&manifest).unwrap();

        let mut manifest = store.load().unwrap();

        // Edited by hand while this manifest is in memory
        let mut raw: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        raw["records"]["mode"]["reviewer"]["version"] = Value::from("9.9.9");
        std::fs::write(store.path(), serde_json::to_string(&raw).unwrap()).unwrap();

        manifest.record_version(&architect, "2.0.0", "blake3:2");
        store.save(&manifest).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.get_version(&reviewer).unwrap().version, "9.9.9");
        assert_eq!(reloaded.get_version(&architect).unwrap().version, "2.0.0");
        assert_eq!(reloaded.installed(ComponentKind::Mode), ["reviewer", "architect"]);
    }

    #[test]
    fn test_changes_only_reports_differences() {
        let baseline = serde_json::json!({"a": {"x": 1, "y": 2}, "b": [1], "c": "same"});
        let current = serde_json::json!({"a": {"x": 1, "y": 3}, "b": [1, 2], "c": "same"});
        assert_eq!(
            changes(current, Some(&baseline)),
            Some(serde_json::json!({"a": {"y": 3}, "b": [1, 2]}))
        );
        assert_eq!(changes(baseline.clone(), Some(&baseline)), None);
    }

    #[test]
    fn test_forget_is_not_resurrected_by_merge() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        let reviewer = ComponentRef::mode("reviewer");

        let mut manifest = store.load().unwrap();
        manifest.record_version(&reviewer, "1.0.0", "blake3:1");
        store.save(&manifest).unwrap();

        let mut manifest = store.load().unwrap();
        manifest.forget(&reviewer);
        store.save(&manifest).unwrap();

        let reloaded = store.load().unwrap();
        assert!(!reloaded.is_installed(&reviewer));
        assert!(reloaded.get_version(&reviewer).is_none());
    }

    #[test]
    fn test_pack_records() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        let mut manifest = store.load().unwrap();
        manifest.record_pack(
            "frontend",
            PackRecord {
                version: "1.0.0".to_string(),
                installed_at: Utc::now(),
                components: vec![ComponentRef::mode("architect")],
                skipped: vec![],
            },
        );
        store.save(&manifest).unwrap();

        let reloaded = store.load().unwrap();
        let pack = reloaded.pack("frontend").unwrap();
        assert_eq!(pack.components, vec![ComponentRef::mode("architect")]);

        let mut manifest = reloaded;
        manifest.forget(&ComponentRef::mode("architect"));
        store.save(&manifest).unwrap();
        assert!(store.load().unwrap().pack("frontend").is_none());
    }

    #[test]
    fn test_add_installed_without_record() {
        let mut manifest = Manifest::default();
        let scratch = ComponentRef::new(ComponentKind::Agent, "scratch");
        manifest.add_installed(&scratch);
        manifest.add_installed(&scratch);
        assert_eq!(manifest.installed(ComponentKind::Agent), ["scratch"]);
        assert!(manifest.get_version(&scratch).is_none());
    }

    #[test]
    fn test_deep_merge_replaces_arrays() {
        let mut base = serde_json::json!({"a": [1, 2, 3], "b": {"c": 1, "d": 2}});
        deep_merge(&mut base, serde_json::json!({"a": [9], "b": {"c": 5}}));
        assert_eq!(base, serde_json::json!({"a": [9], "b": {"c": 5, "d": 2}}));
    }
}
