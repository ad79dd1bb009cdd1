//! Errors surfaced by the render pipeline

use thiserror::Error;

use crate::document::DocumentError;
use crate::overrides::OverrideError;

/// Errors that can occur while loading inputs or rendering content
///
/// Errors returned from inside a [`provide`](crate::context::provide) body
/// are never wrapped; this type only covers failures of the pipeline itself.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error loading slot overrides
    #[error("overrides error: {0}")]
    Overrides(#[from] OverrideError),

    /// Error loading a document
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// A custom renderer reported failure
    #[error("renderer for slot '{slot}' failed: {message}")]
    Renderer { slot: String, message: String },

    /// A tag name would not produce a well-formed element
    #[error("invalid tag for slot '{slot}': {reason}")]
    InvalidTag { slot: String, reason: String },

    /// A template refers to a placeholder that does not exist
    #[error("unknown placeholder '{{{name}}}' in template for slot '{slot}'")]
    UnknownPlaceholder { slot: String, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_message_keeps_braces() {
        let err = RenderError::UnknownPlaceholder {
            slot: "pre".to_string(),
            name: "lang".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown placeholder '{lang}' in template for slot 'pre'"
        );
    }

    #[test]
    fn test_override_error_converts() {
        let err: RenderError = OverrideError::InvalidOverride {
            slot: "code".to_string(),
            reason: "bad".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "overrides error: invalid override for slot 'code': bad"
        );
    }
}
