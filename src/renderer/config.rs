//! Configuration for rendering a content document

/// Name of the slot that wraps a whole rendered document
pub const WRAPPER_SLOT: &str = "wrapper";

/// Options for [`render_document`](super::render_document)
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Layer the built-in [`DEFAULT_SLOTS`](super::DEFAULT_SLOTS) underneath
    /// the ambient set
    pub include_defaults: bool,

    /// Slot consulted to wrap the rendered body, if any
    pub wrapper_slot: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_defaults: true,
            wrapper_slot: Some(WRAPPER_SLOT.to_string()),
        }
    }
}

impl RenderOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether built-in slot defaults apply
    pub fn with_defaults(mut self, include: bool) -> Self {
        self.include_defaults = include;
        self
    }

    /// Use a different slot name for the document wrapper
    pub fn with_wrapper_slot(mut self, slot: impl Into<String>) -> Self {
        self.wrapper_slot = Some(slot.into());
        self
    }

    /// Never wrap the rendered body
    pub fn without_wrapper(mut self) -> Self {
        self.wrapper_slot = None;
        self
    }
}
