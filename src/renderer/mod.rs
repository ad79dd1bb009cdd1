//! Slot renderers and the content walk that invokes them
//!
//! A [`Renderer`] answers for one slot. The merge machinery in
//! [`crate::config_set`] treats renderers as opaque values; only the walk in
//! [`html`] ever calls them.

pub mod config;
pub mod html;

use std::fmt;
use std::sync::Arc;

use crate::error::RenderError;

pub use config::RenderOptions;
pub use html::{default_slots, render_document, render_nodes, DEFAULT_SLOTS};

/// Signature of a caller-supplied renderer
///
/// Returns the rendered markup, or a message that is surfaced as
/// [`RenderError::Renderer`].
pub type RenderFn = dyn Fn(&RenderProps<'_>) -> Result<String, String> + Send + Sync;

/// Everything a renderer gets to see about the element it renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProps<'a> {
    /// Slot the element was authored against
    pub slot: &'a str,
    pub id: Option<&'a str>,
    pub class: Option<&'a str>,
    /// Document title; only set when rendering the wrapper slot
    pub title: Option<&'a str>,
    /// Already-rendered markup of the element's children
    pub children: &'a str,
}

/// Implementation bound to a slot
#[derive(Clone)]
pub enum Renderer {
    /// Emit an element with this tag name
    Tag(String),
    /// Expand a text template; see [`html::expand_template`] for placeholders
    Template(String),
    /// Call into user code
    Custom(Arc<RenderFn>),
}

impl Renderer {
    pub fn tag(name: impl Into<String>) -> Self {
        Renderer::Tag(name.into())
    }

    pub fn template(text: impl Into<String>) -> Self {
        Renderer::Template(text.into())
    }

    /// Wrap a closure as a renderer
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&RenderProps<'_>) -> Result<String, String> + Send + Sync + 'static,
    {
        Renderer::Custom(Arc::new(f))
    }

    /// Render one element
    pub fn render(&self, props: &RenderProps<'_>) -> Result<String, RenderError> {
        match self {
            Renderer::Tag(tag) => html::emit_tag(tag, props),
            Renderer::Template(text) => html::expand_template(text, props),
            Renderer::Custom(f) => f(props).map_err(|message| RenderError::Renderer {
                slot: props.slot.to_string(),
                message,
            }),
        }
    }
}

// Closures have no structural equality, so custom renderers compare by identity.
impl PartialEq for Renderer {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Renderer::Tag(a), Renderer::Tag(b)) => a == b,
            (Renderer::Template(a), Renderer::Template(b)) => a == b,
            (Renderer::Custom(a), Renderer::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Renderer::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            Renderer::Template(text) => f.debug_tuple("Template").field(text).finish(),
            Renderer::Custom(func) => write!(f, "Custom({:p})", Arc::as_ptr(func)),
        }
    }
}
