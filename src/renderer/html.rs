//! HTML generation from content documents

use tracing::{debug, trace};

use crate::config_set::ConfigSet;
use crate::context;
use crate::document::{Document, Element, Node};
use crate::error::RenderError;
use crate::overrides::validate_tag;

use super::{RenderOptions, RenderProps, Renderer};

/// Built-in slot bindings: `(slot, tag)`
///
/// These sit underneath the ambient set, so any provided override wins.
pub const DEFAULT_SLOTS: &[(&str, &str)] = &[
    ("a", "a"),
    ("admonition", "aside"),
    ("blockquote", "blockquote"),
    ("code", "code"),
    ("em", "em"),
    ("h1", "h1"),
    ("h2", "h2"),
    ("h3", "h3"),
    ("h4", "h4"),
    ("li", "li"),
    ("ol", "ol"),
    ("p", "p"),
    ("pre", "pre"),
    ("strong", "strong"),
    ("ul", "ul"),
];

/// The built-in slot bindings as a [`ConfigSet`]
pub fn default_slots() -> ConfigSet {
    DEFAULT_SLOTS
        .iter()
        .map(|(slot, tag)| (*slot, Renderer::tag(*tag)))
        .collect()
}

/// Render a document against the ambient slot set
///
/// Slot precedence, lowest first: built-in defaults (when enabled), the
/// ambient set, the document's own `components`. If the resulting set binds
/// the wrapper slot, the rendered body is passed through it together with the
/// document title.
pub fn render_document(doc: &Document, options: &RenderOptions) -> Result<String, RenderError> {
    let ambient = context::resolve(None);
    let base = if options.include_defaults {
        default_slots().overlay(&ambient)
    } else {
        ambient
    };
    let slots = base.merge(&doc.components);
    debug!(
        slots = slots.len(),
        nodes = doc.children.len(),
        "rendering document"
    );

    let body = render_nodes(&doc.children, &slots)?;

    let wrapper = options
        .wrapper_slot
        .as_deref()
        .and_then(|slot| slots.get(slot).map(|renderer| (slot, renderer)));
    match wrapper {
        Some((slot, renderer)) => renderer.render(&RenderProps {
            slot,
            id: None,
            class: None,
            title: doc.title.as_deref(),
            children: &body,
        }),
        None => Ok(body),
    }
}

/// Render a sequence of nodes with an explicit slot set
pub fn render_nodes(nodes: &[Node], slots: &ConfigSet) -> Result<String, RenderError> {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(element) => out.push_str(&render_element(element, slots)?),
        }
    }
    Ok(out)
}

fn render_element(element: &Element, slots: &ConfigSet) -> Result<String, RenderError> {
    let children = render_nodes(&element.children, slots)?;
    let props = RenderProps {
        slot: &element.slot,
        id: element.id.as_deref(),
        class: element.class.as_deref(),
        title: None,
        children: &children,
    };
    match slots.get(&element.slot) {
        Some(renderer) => renderer.render(&props),
        None => {
            trace!(slot = %element.slot, "unbound slot, emitting bare tag");
            emit_tag(&element.slot, &props)
        }
    }
}

/// Emit `<tag id=".." class="..">children</tag>`
///
/// Tag names reach this point from code as well as from checked input, so
/// they are validated again before being written.
pub(crate) fn emit_tag(tag: &str, props: &RenderProps<'_>) -> Result<String, RenderError> {
    validate_tag(tag).map_err(|reason| RenderError::InvalidTag {
        slot: props.slot.to_string(),
        reason,
    })?;

    let mut out = format!("<{}", tag);
    if let Some(id) = props.id {
        out.push_str(&format!(r#" id="{}""#, escape_attr(id)));
    }
    if let Some(class) = props.class {
        out.push_str(&format!(r#" class="{}""#, escape_attr(class)));
    }
    out.push('>');
    out.push_str(props.children);
    out.push_str(&format!("</{}>", tag));
    Ok(out)
}

/// Expand a template renderer
///
/// Placeholders: `{children}` (inserted as-is), `{id}` and `{class}`
/// (attribute-escaped, empty when unset), `{slot}`, `{title}` (attribute-escaped,
/// only set for the wrapper slot). `{{` emits a literal `{`.
pub(crate) fn expand_template(
    template: &str,
    props: &RenderProps<'_>,
) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len() + props.children.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        if let Some(escaped) = after.strip_prefix('{') {
            out.push('{');
            rest = escaped;
            continue;
        }

        let end = after
            .find('}')
            .ok_or_else(|| RenderError::UnknownPlaceholder {
                slot: props.slot.to_string(),
                name: after.to_string(),
            })?;
        match &after[..end] {
            "children" => out.push_str(props.children),
            "id" => out.push_str(&escape_attr(props.id.unwrap_or_default())),
            "class" => out.push_str(&escape_attr(props.class.unwrap_or_default())),
            "slot" => out.push_str(props.slot),
            "title" => out.push_str(&escape_attr(props.title.unwrap_or_default())),
            other => {
                return Err(RenderError::UnknownPlaceholder {
                    slot: props.slot.to_string(),
                    name: other.to_string(),
                })
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Escape text content
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value
pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
