//! Partial slot overrides and their TOML form
//!
//! An overrides file binds slot names to renderers:
//!
//! ```toml
//! [metadata]
//! name = "compact"
//!
//! [slots]
//! code = "kbd"
//! h1 = { tag = "h2" }
//! admonition = { template = "<aside class=\"note\">{children}</aside>" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::renderer::Renderer;

/// Errors that can occur when loading overrides
#[derive(Error, Debug)]
pub enum OverrideError {
    #[error("Failed to read overrides file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse overrides TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid override for slot '{slot}': {reason}")]
    InvalidOverride { slot: String, reason: String },
}

/// A partial mapping from slot name to renderer
///
/// An entry may be present without a renderer; merging treats such an entry
/// exactly like a missing key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Optional name, from `[metadata]`
    pub name: Option<String>,
    /// Optional description, from `[metadata]`
    pub description: Option<String>,
    entries: BTreeMap<String, Option<Renderer>>,
}

#[derive(Deserialize)]
struct TomlOverrides {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    slots: toml::Table,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a slot
    pub fn with(mut self, slot: impl Into<String>, renderer: Renderer) -> Self {
        self.set(slot, renderer);
        self
    }

    /// Add an entry that carries no renderer
    pub fn with_absent(mut self, slot: impl Into<String>) -> Self {
        self.entries.insert(slot.into(), None);
        self
    }

    pub fn set(&mut self, slot: impl Into<String>, renderer: Renderer) {
        self.entries.insert(slot.into(), Some(renderer));
    }

    /// Get the renderer for a slot, if one is present
    pub fn get(&self, slot: &str) -> Option<&Renderer> {
        self.entries.get(slot).and_then(Option::as_ref)
    }

    /// Entries that carry a renderer
    pub fn present(&self) -> impl Iterator<Item = (&str, &Renderer)> {
        self.entries
            .iter()
            .filter_map(|(slot, r)| r.as_ref().map(|r| (slot.as_str(), r)))
    }

    /// Number of entries, including ones without a renderer
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold another set of overrides into this one; `other` wins per key
    ///
    /// An absent entry in `other` does not erase a renderer bound here.
    pub fn extend(&mut self, other: Overrides) {
        for (slot, renderer) in other.entries {
            match renderer {
                Some(r) => {
                    self.entries.insert(slot, Some(r));
                }
                None => {
                    self.entries.entry(slot).or_insert(None);
                }
            }
        }
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
    }

    /// Load overrides from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, OverrideError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load overrides from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, OverrideError> {
        let parsed: TomlOverrides = toml::from_str(content)?;
        let mut overrides = Self::from_table(&parsed.slots)?;
        overrides.name = parsed.metadata.as_ref().and_then(|m| m.name.clone());
        overrides.description = parsed.metadata.as_ref().and_then(|m| m.description.clone());
        Ok(overrides)
    }

    /// Build overrides from a TOML table of `slot = value` pairs
    ///
    /// A value is either a tag name string or a table with exactly one of
    /// `tag` or `template`. Anything else is rejected.
    pub fn from_table(table: &toml::Table) -> Result<Self, OverrideError> {
        let mut overrides = Self::new();
        for (slot, value) in table {
            overrides.set(slot.clone(), renderer_from_value(slot, value)?);
        }
        Ok(overrides)
    }
}

fn renderer_from_value(slot: &str, value: &toml::Value) -> Result<Renderer, OverrideError> {
    let invalid = |reason: String| OverrideError::InvalidOverride {
        slot: slot.to_string(),
        reason,
    };

    match value {
        toml::Value::String(tag) => Ok(Renderer::Tag(validate_tag(tag).map_err(invalid)?)),
        toml::Value::Table(table) => {
            if table.len() != 1 {
                return Err(invalid(format!(
                    "expected exactly one of 'tag' or 'template', found {} keys",
                    table.len()
                )));
            }
            match (table.get("tag"), table.get("template")) {
                (Some(toml::Value::String(tag)), None) => {
                    Ok(Renderer::Tag(validate_tag(tag).map_err(invalid)?))
                }
                (None, Some(toml::Value::String(text))) => Ok(Renderer::Template(text.clone())),
                (Some(other), None) | (None, Some(other)) => Err(invalid(format!(
                    "expected a string, found {}",
                    other.type_str()
                ))),
                _ => {
                    let key = table.keys().next().map(String::as_str).unwrap_or_default();
                    Err(invalid(format!("unknown key '{}'", key)))
                }
            }
        }
        other => Err(invalid(format!(
            "expected a tag name or a table, found {}",
            other.type_str()
        ))),
    }
}

/// Check that a string is usable as an element tag name
pub(crate) fn validate_tag(tag: &str) -> Result<String, String> {
    if tag.is_empty() {
        return Err("tag name is empty".to_string());
    }
    if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(format!("'{}' is not a valid tag name", tag));
    }
    Ok(tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_with_metadata() {
        let toml_str = r#"
[metadata]
name = "compact"
description = "Smaller headings"

[slots]
h1 = "h2"
"#;
        let overrides = Overrides::from_str(toml_str).expect("Should parse");
        assert_eq!(overrides.name, Some("compact".to_string()));
        assert_eq!(overrides.description, Some("Smaller headings".to_string()));
        assert_eq!(overrides.get("h1"), Some(&Renderer::tag("h2")));
    }

    #[test]
    fn test_parse_table_forms() {
        let toml_str = r#"
[slots]
code = { tag = "kbd" }
admonition = { template = "<aside>{children}</aside>" }
"#;
        let overrides = Overrides::from_str(toml_str).expect("Should parse");
        assert_eq!(overrides.name, None);
        assert_eq!(overrides.get("code"), Some(&Renderer::tag("kbd")));
        assert_eq!(
            overrides.get("admonition"),
            Some(&Renderer::template("<aside>{children}</aside>"))
        );
    }

    #[test]
    fn test_missing_slots_table_is_empty() {
        let overrides = Overrides::from_str("[metadata]\nname = \"x\"\n").expect("Should parse");
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_reject_non_string_value() {
        let err = Overrides::from_str("[slots]\ncode = 3\n").unwrap_err();
        assert!(matches!(
            err,
            OverrideError::InvalidOverride { ref slot, .. } if slot == "code"
        ));
    }

    #[test]
    fn test_reject_both_tag_and_template() {
        let err = Overrides::from_str("[slots]\ncode = { tag = \"kbd\", template = \"x\" }\n")
            .unwrap_err();
        assert!(matches!(err, OverrideError::InvalidOverride { .. }));
    }

    #[test]
    fn test_reject_unknown_key() {
        let err = Overrides::from_str("[slots]\ncode = { component = \"Kbd\" }\n").unwrap_err();
        assert!(err.to_string().contains("unknown key 'component'"));
    }

    #[test]
    fn test_reject_bad_tag_name() {
        let err = Overrides::from_str("[slots]\ncode = \"<script>\"\n").unwrap_err();
        assert!(err.to_string().contains("not a valid tag name"));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = Overrides::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(OverrideError::ParseError(_))));
    }

    #[test]
    fn test_extend_later_wins_and_absent_keeps() {
        let mut first = Overrides::new()
            .with("code", Renderer::tag("kbd"))
            .with("h1", Renderer::tag("h1"));
        first.extend(
            Overrides::new()
                .with_absent("code")
                .with("h1", Renderer::tag("h2")),
        );
        assert_eq!(first.get("code"), Some(&Renderer::tag("kbd")));
        assert_eq!(first.get("h1"), Some(&Renderer::tag("h2")));
    }

    #[test]
    fn test_present_skips_absent_entries() {
        let overrides = Overrides::new()
            .with_absent("code")
            .with("li", Renderer::tag("li"));
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.present().map(|(s, _)| s).collect::<Vec<_>>(), vec!["li"]);
    }
}
