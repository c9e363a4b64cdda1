//! Content repository errors

use thiserror::Error;

/// Errors raised while talking to the content repository
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("No {kind} document with uid {uid:?}")]
    NotFound { kind: String, uid: String },

    #[error("Invalid cursor {0:?}")]
    InvalidCursor(String),

    #[error("Repository has no master ref")]
    MissingMasterRef,
}

impl ContentError {
    /// Whether the document simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}
