//! Error types for data lake file system operations
//!
//! Every backend surfaces the same taxonomy. Collaborator clients report
//! their failures through the same enum so that authentication and transport
//! errors pass through the core untouched.

use thiserror::Error;

/// Errors surfaced by the `FileSystem` contract and its collaborators
#[derive(Debug, Error)]
pub enum FsError {
    /// A caller-supplied argument was rejected (e.g. an unsupported open mode)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested path does not exist in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend reported data the core cannot interpret
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid or missing configuration, detected before any network call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential acquisition or token refresh failed in the collaborator
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Network or service failure reported by the collaborator
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local I/O error while reading a materialized handle
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    /// Whether this error is the collaborator's "resource not found" signal
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for data lake operations
pub type Result<T> = std::result::Result<T, FsError>;
