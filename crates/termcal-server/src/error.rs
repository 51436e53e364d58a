//! Server error types.

use std::io;

use termcal_core::RenderError;
use termcal_providers::ProviderError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Result type for credential cache and store operations.
pub type CredentialResult<T> = Result<T, CredentialError>;

/// Failures of the durable credential store itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the credential cache.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No record is stored under the id.
    #[error("no credential found for '{id}'")]
    NotFound { id: String },

    /// A stored blob did not decode.
    #[error("stored credential for '{id}' is corrupt: {source}")]
    CorruptRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The durable store failed a read or write.
    #[error("credential store failed for '{id}': {source}")]
    Persistence {
        id: String,
        #[source]
        source: StoreError,
    },
}

impl CredentialError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn persistence(id: impl Into<String>, source: StoreError) -> Self {
        Self::Persistence {
            id: id.into(),
            source,
        }
    }
}

/// Errors that can occur while serving a render.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Request validation or timezone resolution failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The credential store could not be opened.
    #[error("credential store: {0}")]
    Store(#[from] StoreError),

    /// The event source or token endpoint failed.
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[from] ProviderError),

    /// Credential lookup, refresh and fetch did not finish within the deadline.
    #[error("upstream fetch timed out after {seconds}s")]
    UpstreamTimeout { seconds: u64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ServerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's request options.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Render(_))
    }
}
