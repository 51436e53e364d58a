//! Error types for request validation and rendering.

use thiserror::Error;

/// Result type for core rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors surfaced while validating a request or rendering an agenda.
///
/// All of these are terminal for the request that produced them and are
/// meant to be shown to the caller verbatim.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required field is missing or malformed.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// An exclude or highlight pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The highlight list does not alternate pattern and color.
    #[error("invalid highlights, expected a csv list of regex,color pairs (got {count} items)")]
    InvalidHighlightFormat { count: usize },

    /// The timezone name does not resolve to an IANA zone.
    #[error("invalid timezone '{name}'")]
    InvalidTimezone { name: String },
}

impl RenderError {
    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates an invalid timezone error.
    pub fn invalid_timezone(name: impl Into<String>) -> Self {
        Self::InvalidTimezone { name: name.into() }
    }
}
