//! Error types for the root ledger

use relay_primitives::{Principal, Root};
use thiserror::Error;

/// Errors raised by root history mutations and access checks
///
/// Every failure leaves the ledger untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// `init` was called a second time
    #[error("Already initialized")]
    AlreadyInitialized,

    /// An operation ran before `init`
    #[error("Not initialized")]
    NotInitialized,

    /// The destination root is already recorded
    #[error("Duplicate root: {0}")]
    DuplicateRoot(Root),

    /// A transition from a root to itself
    #[error("Identical roots: {0}")]
    IdenticalRoots(Root),

    /// The transition was not authorized by the attester
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// The caller is not an owner
    #[error("Unauthorized caller: {0}")]
    Unauthorized(Principal),
}

impl LedgerError {
    /// Create an invalid signature error
    pub fn invalid_signature<S: Into<String>>(msg: S) -> Self {
        Self::InvalidSignature(msg.into())
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
