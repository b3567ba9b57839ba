//! Error types for the client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced to the view layer
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected caller input
    #[error("{0}")]
    Validation(String),

    /// Network failure or a server-side failure independent of the request
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server rejected the request document itself
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// The response did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
