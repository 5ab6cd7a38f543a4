//! Client for the hosted content store (Sanity HTTP API).

mod client;

pub use client::SanityClient;

/// Failures reported while talking to the content store.
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("content store project id is not configured")]
    NotConfigured,
    #[error("content store write token is not configured")]
    MissingWriteToken,
    #[error("content store rejected credentials (status {status})")]
    Unauthorized { status: u16 },
    #[error("content store returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("content store request failed: {0}")]
    Transport(String),
    #[error("unexpected content store payload: {0}")]
    Decode(String),
}

impl CmsError {
    /// Token or credential problems, as opposed to transient or data errors.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            CmsError::MissingWriteToken | CmsError::Unauthorized { .. }
        )
    }
}

impl From<reqwest::Error> for CmsError {
    fn from(value: reqwest::Error) -> Self {
        CmsError::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for CmsError {
    fn from(value: serde_json::Error) -> Self {
        CmsError::Decode(value.to_string())
    }
}
