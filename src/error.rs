//! Error types for protomarshal
//!
//! Provides a unified error type for all encode/decode operations.
//! Every error is terminal for the call that raised it.

use thiserror::Error;

/// Result type alias using ProtoError
pub type Result<T> = std::result::Result<T, ProtoError>;

/// Unified error type for marshalling operations
#[derive(Debug, Error)]
pub enum ProtoError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Insufficient data: needed {needed} bytes, {available} available")]
    InsufficientData { needed: usize, available: usize },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Value out of range: {0}")]
    ValueRange(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Schema Errors
    // -------------------------------------------------------------------------
    #[error("Ambiguous version mapping: {record}.{field} has more than one descriptor for version {version}")]
    AmbiguousVersionMapping {
        record: String,
        field: String,
        version: u32,
    },

    #[error("Schema error: {0}")]
    Schema(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProtoError {
    /// Shorthand for an insufficient-data failure
    pub(crate) fn short(needed: usize, available: usize) -> Self {
        ProtoError::InsufficientData { needed, available }
    }
}
