//! Parse component front matter into typed metadata.
//!
//! The YAML block between the first `---` and the next `---` is deserialized
//! into [`FrontMatter`], a record of optional fields. Presence of the required
//! fields is checked here, so callers only ever see [`ComponentMetadata`].

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::{ComponentKind, ComponentMetadata};
use crate::error::{ModepackError, Result};

/// Raw front matter as written by template authors
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    name: Option<String>,
    description: Option<String>,
    author: Option<String>,
    version: Option<Value>,
    tags: Vec<String>,
    dependencies: Vec<String>,
}

/// Front matter written by `render_component`
#[derive(Serialize)]
struct FrontMatterOut<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    tags: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    dependencies: &'a [String],
}

/// Split content into the front matter block and the body.
/// Returns `None` when the content does not open with a `---` delimited block.
pub fn split_front_matter(content: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 2 || lines[0].trim() != "---" {
        return None;
    }
    let end_idx = lines[1..].iter().position(|l| l.trim() == "---")? + 1;
    let front = lines[1..end_idx].join("\n");
    let body = lines[end_idx + 1..].join("\n");
    Some((front, body))
}

/// Text of a top-level scalar exactly as written, without trailing comment
fn raw_scalar<'a>(front: &'a str, key: &str) -> Option<&'a str> {
    front.lines().find_map(|line| {
        let rest = line.strip_prefix(key)?.trim_start().strip_prefix(':')?;
        let text = rest.split(" #").next().unwrap_or(rest).trim();
        (!text.is_empty()).then_some(text)
    })
}

/// Version tags may be written unquoted (`version: 1.10`). YAML reads those
/// as numbers, so the tag is taken from the source text instead.
fn version_text(value: Value, front: &str) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(_) | Value::Bool(_) => raw_scalar(front, "version").map(str::to_string),
        _ => None,
    }
}

fn required(field: Option<String>, key: &str, source: &str) -> Result<String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ModepackError::InvalidFrontMatter {
            path: source.to_string(),
            reason: format!("missing required field '{key}'"),
        }),
    }
}

/// Parse component metadata from file content.
///
/// `source` names the file in error messages.
pub fn parse_metadata(kind: ComponentKind, content: &str, source: &str) -> Result<ComponentMetadata> {
    let (front, _) =
        split_front_matter(content).ok_or_else(|| ModepackError::InvalidFrontMatter {
            path: source.to_string(),
            reason: "missing front matter block".to_string(),
        })?;

    let raw: FrontMatter = if front.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(&front).map_err(|e| ModepackError::InvalidFrontMatter {
            path: source.to_string(),
            reason: e.to_string(),
        })?
    };

    Ok(ComponentMetadata {
        kind,
        name: required(raw.name, "name", source)?,
        description: required(raw.description, "description", source)?,
        author: raw.author,
        version: raw.version.and_then(|v| version_text(v, &front)),
        tags: raw.tags,
        dependencies: raw
            .dependencies
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect(),
    })
}

/// Render a component file from metadata and body
pub fn render_component(metadata: &ComponentMetadata, body: &str) -> Result<String> {
    let out = FrontMatterOut {
        name: &metadata.name,
        description: &metadata.description,
        author: metadata.author.as_deref(),
        version: metadata.version.as_deref(),
        tags: &metadata.tags,
        dependencies: &metadata.dependencies,
    };
    let yaml = serde_yaml::to_string(&out)?;
    Ok(format!("---\n{}---\n\n{}\n", yaml, body.trim_end()))
}
