//! Content documents: a tree of slot-tagged elements and text
//!
//! Documents are written in TOML. Every node is either text or an element
//! naming the slot it renders through:
//!
//! ```toml
//! title = "api.sh"
//!
//! [components]
//! code = "kbd"
//!
//! [[children]]
//! slot = "h1"
//! id = "apish"
//! text = "api.sh"
//!
//! [[children]]
//! slot = "p"
//! [[children.children]]
//! text = "The "
//! [[children.children]]
//! slot = "code"
//! text = "api.sh"
//! ```
//!
//! `text` on an element is shorthand for a single text child.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::overrides::{validate_tag, OverrideError, Overrides};

/// Errors that can occur when loading a document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse document TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid node at {path}: {reason}")]
    InvalidNode { path: String, reason: String },
    #[error("invalid document components: {0}")]
    Components(#[from] OverrideError),
}

/// A content node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Element with children and no attributes
    pub fn element(slot: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element(Element {
            slot: slot.into(),
            children,
            ..Element::default()
        })
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element rendered through a slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub slot: String,
    pub id: Option<String>,
    pub class: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(slot: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }
}

/// A renderable document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub title: Option<String>,
    /// Slot overrides that apply to this document only
    pub components: Overrides,
    pub children: Vec<Node>,
}

#[derive(Deserialize)]
struct TomlDocument {
    title: Option<String>,
    #[serde(default)]
    components: toml::Table,
    #[serde(default)]
    children: Vec<TomlNode>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlNode {
    slot: Option<String>,
    text: Option<String>,
    id: Option<String>,
    class: Option<String>,
    #[serde(default)]
    children: Vec<TomlNode>,
}

impl Document {
    /// Load a document from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a document from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, DocumentError> {
        let parsed: TomlDocument = toml::from_str(content)?;
        Ok(Document {
            title: parsed.title,
            components: Overrides::from_table(&parsed.components)?,
            children: convert_nodes(parsed.children, "children")?,
        })
    }
}

fn convert_nodes(nodes: Vec<TomlNode>, parent: &str) -> Result<Vec<Node>, DocumentError> {
    nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| convert_node(node, &format!("{}[{}]", parent, i)))
        .collect()
}

fn convert_node(node: TomlNode, path: &str) -> Result<Node, DocumentError> {
    let invalid = |reason: &str| DocumentError::InvalidNode {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    match (node.slot, node.text) {
        (None, None) => Err(invalid("node needs a 'slot' or 'text'")),
        (None, Some(text)) => {
            if node.id.is_some() || node.class.is_some() || !node.children.is_empty() {
                return Err(invalid("text nodes cannot carry id, class or children"));
            }
            Ok(Node::Text(text))
        }
        (Some(slot), text) => {
            if slot.is_empty() {
                return Err(invalid("slot name is empty"));
            }
            // Unbound slots render as bare tags, so the name must be a valid tag.
            validate_tag(&slot).map_err(|reason| invalid(&reason))?;
            if text.is_some() && !node.children.is_empty() {
                return Err(invalid("use either 'text' or 'children', not both"));
            }
            let children = match text {
                Some(text) => vec![Node::Text(text)],
                None => convert_nodes(node.children, &format!("{}.children", path))?,
            };
            Ok(Node::Element(Element {
                slot,
                id: node.id,
                class: node.class,
                children,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Renderer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_nested_document() {
        let doc = Document::from_str(
            r#"
title = "api.sys"

[[children]]
slot = "h1"
id = "apisys"
text = "api.sys"

[[children]]
slot = "p"
[[children.children]]
text = "The "
[[children.children]]
slot = "code"
text = "api.sys"
"#,
        )
        .expect("Should parse");

        let expected: Vec<Node> = vec![
            Element::new("h1").with_id("apisys").with_text("api.sys").into(),
            Element::new("p")
                .with_text("The ")
                .with_child(Element::new("code").with_text("api.sys"))
                .into(),
        ];
        assert_eq!(doc.title.as_deref(), Some("api.sys"));
        assert_eq!(doc.children, expected);
    }

    #[test]
    fn test_parse_components() {
        let doc = Document::from_str("[components]\ncode = \"kbd\"\n").expect("Should parse");
        assert_eq!(doc.components.get("code"), Some(&Renderer::tag("kbd")));
        assert!(doc.children.is_empty());
    }

    #[test]
    fn test_invalid_components_fail() {
        let err = Document::from_str("[components]\ncode = 1\n").unwrap_err();
        assert!(matches!(err, DocumentError::Components(_)));
    }

    #[test]
    fn test_empty_node_reports_path() {
        let err = Document::from_str(
            r#"
[[children]]
slot = "ul"
[[children.children]]
id = "x"
"#,
        )
        .unwrap_err();
        match err {
            DocumentError::InvalidNode { path, .. } => assert_eq!(path, "children[0].children[0]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_slot_with_markup_rejected() {
        let err = Document::from_str(
            r#"
[[children]]
slot = "img src=x onerror=alert(1)"
text = "hi"
"#,
        )
        .unwrap_err();
        match err {
            DocumentError::InvalidNode { path, reason } => {
                assert_eq!(path, "children[0]");
                assert!(reason.contains("not a valid tag name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_hyphenated_slot_accepted() {
        let doc = Document::from_str("[[children]]\nslot = \"api-table\"\ntext = \"x\"\n")
            .expect("Should parse");
        assert_eq!(doc.children, vec![Node::element("api-table", vec![Node::text("x")])]);
    }

    #[test]
    fn test_text_node_with_attributes_rejected() {
        let err = Document::from_str("[[children]]\ntext = \"x\"\nclass = \"y\"\n").unwrap_err();
        assert!(matches!(err, DocumentError::InvalidNode { .. }));
    }

    #[test]
    fn test_unknown_node_field_rejected() {
        let err = Document::from_str("[[children]]\nslot = \"p\"\ncolour = \"red\"\n").unwrap_err();
        assert!(matches!(err, DocumentError::ParseError(_)));
    }
}
