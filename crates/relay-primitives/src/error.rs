//! Error types for relay primitives

use thiserror::Error;

/// Errors raised while parsing, hashing or signing relay primitives
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Malformed hex input
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Input had the wrong number of bytes
    #[error("Invalid length for {what}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Signature bytes could not be interpreted or recovered
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Secret key bytes were rejected by the curve
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Binary proof decoding failed
    #[error("Decode failed: {0}")]
    Decode(String),

    /// A batch or tree was built without any leaves
    #[error("Batch cannot be empty")]
    EmptyBatch,

    /// Requested a path for a leaf the tree does not hold
    #[error("Leaf index {index} out of bounds (num leaves: {len})")]
    LeafOutOfBounds { index: usize, len: usize },

    /// JSON (de)serialization failed
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl PrimitiveError {
    /// Create a decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an invalid signature error
    pub fn invalid_signature<S: Into<String>>(msg: S) -> Self {
        Self::InvalidSignature(msg.into())
    }
}

impl From<hex::FromHexError> for PrimitiveError {
    fn from(err: hex::FromHexError) -> Self {
        PrimitiveError::InvalidHex(err.to_string())
    }
}

/// Result type for primitive operations
pub type PrimitiveResult<T> = Result<T, PrimitiveError>;
