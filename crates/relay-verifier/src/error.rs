//! Error types for proof gating

use relay_primitives::Root;
use thiserror::Error;

/// Failures reported by a group membership verifier
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// The proof does not verify against the given root
    #[error("Proof invalid")]
    ProofInvalid,

    /// Any other verifier-specific failure
    #[error("Verifier rejected proof: {0}")]
    Rejected(String),
}

impl MembershipError {
    pub fn rejected<S: Into<String>>(msg: S) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Errors returned by the proof gate
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No transition has been applied yet
    #[error("No roots seen")]
    NoRootsSeen,

    /// The root was never recorded
    #[error("Unknown root: {0}")]
    UnknownRoot(Root),

    /// The root is recorded but its validity window has passed
    #[error("Expired root: {0}")]
    ExpiredRoot(Root),

    /// Passed through from the membership verifier
    #[error(transparent)]
    Membership(#[from] MembershipError),
}

/// Result type for gated verification
pub type GateResult<T> = Result<T, GateError>;
