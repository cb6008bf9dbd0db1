//! Error types for the feed engine.

use thiserror::Error;

/// Why a raw notification could not be turned into a typed event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Unknown event kind: {0}")]
    UnknownKind(String),

    #[error("Missing required id field: {0}")]
    MissingId(&'static str),

    #[error("Invalid payload for {kind}: {message}")]
    InvalidPayload { kind: String, message: String },
}

/// Main error type for the fallible boundaries of the engine.
///
/// Reconciliation itself never fails; these cover snapshot loading,
/// channel plumbing and serialization.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot load failed: {0}")]
    Snapshot(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Push channel closed")]
    ChannelClosed,

    #[error("Feed session is no longer active")]
    Inactive,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Serialization(e.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, SyncError>;
