//! Error types for the identity manager

use relay_ledger::LedgerError;
use relay_verifier::GateError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by [`crate::IdentityManager`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManagerError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot could not be encoded or restored
    #[error("State error: {0}")]
    State(String),
}

impl ManagerError {
    pub fn state<S: Into<String>>(msg: S) -> Self {
        Self::State(msg.into())
    }
}

/// Result type for manager operations
pub type ManagerResult<T> = Result<T, ManagerError>;
