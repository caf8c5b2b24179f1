//! Error types for artifact dump and load.

use polyserde_core::{DecodeError, EncodeError};
use thiserror::Error;

/// Result type for artifact operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing or reading an artifact
#[derive(Debug, Error)]
pub enum Error {
    /// The value could not be encoded; nothing was written
    #[error("Serialization error: {0}")]
    Serialization(#[from] EncodeError),

    /// The payload could not be reconstructed
    #[error("Reconstruction error: {0}")]
    Reconstruction(#[from] DecodeError),

    /// The artifact envelope is malformed
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// JSON text or I/O errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
