//! Error types for memory store operations.

/// Errors returned by memory stores.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Identifier or namespace that cannot be mapped onto storage.
    #[error("invalid path component: {0}")]
    InvalidPath(String),
    /// The backing store rejected or could not serve the request.
    #[error("memory store unavailable: {0}")]
    Unavailable(String),
}
