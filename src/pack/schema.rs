//! JSON Schema validation of pack manifests

use jsonschema::Validator;
use serde_json::Value;

use crate::error::{ModepackError, Result};

/// Compiled pack schema
pub struct PackSchema {
    validator: Validator,
}

impl std::fmt::Debug for PackSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackSchema").finish_non_exhaustive()
    }
}

impl PackSchema {
    pub fn new(schema: &Value) -> Result<Self> {
        let validator = Validator::new(schema).map_err(|e| ModepackError::ConfigParseFailed {
            path: "pack schema".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { validator })
    }

    /// Every violation, as `<instance path>: <message>`
    pub fn violations(&self, instance: &Value) -> Vec<String> {
        self.validator
            .iter_errors(instance)
            .map(|error| {
                let path = error.instance_path.to_string();
                if path.is_empty() {
                    error.to_string()
                } else {
                    format!("{path}: {error}")
                }
            })
            .collect()
    }

    /// Fail with all violations reported verbatim
    pub fn validate(&self, pack_name: &str, instance: &Value) -> Result<()> {
        let messages = self.violations(instance);
        if messages.is_empty() {
            return Ok(());
        }
        Err(ModepackError::ValidationFailed {
            subject: format!("pack '{pack_name}'"),
            messages,
        })
    }
}

/// `MAJOR.MINOR.PATCH`, digits only. Format check, no range semantics.
pub fn is_valid_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builtin() -> PackSchema {
        let schema: Value =
            serde_json::from_str(include_str!("../../schemas/pack.schema.json")).unwrap();
        PackSchema::new(&schema).unwrap()
    }

    #[test]
    fn test_valid_pack_passes() {
        let pack = json!({
            "name": "web",
            "version": "1.0.0",
            "description": "Web work",
            "category": "frontend",
            "components": {"modes": [{"name": "architect", "required": true, "tools": ["node"]}]},
            "dependencies": [],
            "tools": {"node": {"description": "Runtime", "required": true}}
        });
        assert!(builtin().validate("web", &pack).is_ok());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let pack = json!({
            "name": "web",
            "version": "1.0.0",
            "category": "gardening",
            "components": {"modes": [{"required": true}]}
        });
        let err = builtin().validate("web", &pack).unwrap_err();
        let ModepackError::ValidationFailed { messages, .. } = err else {
            panic!("expected validation failure");
        };
        assert!(messages.len() >= 3, "got {messages:?}");
        assert!(messages.iter().any(|m| m.contains("description")));
        assert!(messages.iter().any(|m| m.starts_with("/category")));
    }

    #[test]
    fn test_version_format() {
        assert!(is_valid_version("1.0.0"));
        assert!(is_valid_version("10.20.30"));
        assert!(!is_valid_version("1.0"));
        assert!(!is_valid_version("1.0.0-beta"));
        assert!(!is_valid_version("v1.0.0"));
        assert!(!is_valid_version("1..0"));
    }
}
