//! Slot Context - scoped slot-to-renderer overrides for content rendering
//!
//! Content is a tree of elements, each authored against a named slot such as
//! `code`, `h1` or `admonition`. A [`ConfigSet`] says which [`Renderer`]
//! answers for each slot. Callers override a subset of slots for a nested
//! scope with [`context::provide`]; everything outside that scope keeps the
//! bindings it had.
//!
//! # Example
//!
//! ```rust
//! use slot_context::{render_with_config, Overrides, RenderConfig, Renderer};
//!
//! let source = r#"
//! [[children]]
//! slot = "code"
//! text = "api.sh"
//! "#;
//!
//! let config = RenderConfig::new()
//!     .with_slots(Overrides::new().with("code", Renderer::tag("kbd")));
//! let html = render_with_config(source, config).unwrap();
//! assert_eq!(html, "<kbd>api.sh</kbd>");
//! ```

pub mod config_set;
pub mod context;
pub mod document;
pub mod error;
pub mod logging;
pub mod overrides;
pub mod renderer;

pub use config_set::ConfigSet;
pub use context::{provide, provide_with, resolve, resolve_with, Provider};
pub use document::{Document, DocumentError, Element, Node};
pub use error::RenderError;
pub use overrides::{OverrideError, Overrides};
pub use renderer::{render_document, RenderOptions, RenderProps, Renderer};

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Overrides provided around the whole render
    pub slots: Overrides,
    /// Document rendering options
    pub options: RenderOptions,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overrides provided around the render
    pub fn with_slots(mut self, slots: Overrides) -> Self {
        self.slots = slots;
        self
    }

    /// Set the document rendering options
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}

/// Render a TOML document with default configuration
///
/// # Example
///
/// ```rust
/// use slot_context::render;
///
/// let html = render(r#"
///     [[children]]
///     slot = "h1"
///     id = "apish"
///     text = "api.sh"
/// "#).unwrap();
///
/// assert_eq!(html, r#"<h1 id="apish">api.sh</h1>"#);
/// ```
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a TOML document with custom configuration
///
/// The configured slots are provided for the duration of the render, so they
/// sit above the built-in defaults and below the document's own components.
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let doc = Document::from_str(source)?;
    context::provide(&config.slots, || render_document(&doc, &config.options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_heading() {
        let html = render("[[children]]\nslot = \"h2\"\ntext = \"Returns:\"\n").unwrap();
        assert_eq!(html, "<h2>Returns:</h2>");
    }

    #[test]
    fn test_render_document_components_beat_config_slots() {
        let source = r#"
[components]
code = "samp"

[[children]]
slot = "code"
text = "x"
"#;
        let config = RenderConfig::new()
            .with_slots(Overrides::new().with("code", Renderer::tag("kbd")));
        assert_eq!(render_with_config(source, config).unwrap(), "<samp>x</samp>");
    }

    #[test]
    fn test_render_invalid_document_error() {
        let result = render("[[children]]\nid = \"x\"\n");
        assert!(matches!(result, Err(RenderError::Document(_))));
    }

    #[test]
    fn test_render_leaves_ambient_untouched() {
        let config = RenderConfig::new()
            .with_slots(Overrides::new().with("code", Renderer::tag("kbd")));
        render_with_config("", config).unwrap();
        assert!(resolve(None).is_empty());
    }
}
