//! Deployment configuration
//!
//! Everything a relay needs to know at initialization: who signs batches,
//! which source deployment the leaves are bound to, a human readable label
//! for the source chain, the initial owners and the validity window.

use std::path::Path;

use relay_ledger::DEFAULT_VALIDITY_WINDOW;
use relay_primitives::Principal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating a configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(String),
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("chain_label must not be empty")]
    EmptyChainLabel,
    #[error("validity_window_secs must be greater than zero")]
    ZeroValidityWindow,
    #[error("attester must not be the zero principal")]
    ZeroAttester,
    #[error("attester and origin_id must differ, both are {0}")]
    AttesterIsOrigin(Principal),
}

/// Parameters for a one-time `init`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitParams {
    pub attester: Principal,
    pub origin_id: Principal,
    pub chain_label: String,
    #[serde(default)]
    pub owners: Vec<Principal>,
}

/// Relay configuration as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Principal whose signature authorizes transition batches
    pub attester: Principal,

    /// Source deployment the transition leaves are bound to
    pub origin_id: Principal,

    /// Source chain name, e.g. "sepolia"
    pub chain_label: String,

    /// Owners in addition to the initializing caller
    #[serde(default)]
    pub owners: Vec<Principal>,

    /// Grace period for superseded roots
    #[serde(default = "default_validity_window")]
    pub validity_window_secs: u64,
}

fn default_validity_window() -> u64 {
    DEFAULT_VALIDITY_WINDOW
}

impl RelayConfig {
    pub fn new(attester: Principal, origin_id: Principal, chain_label: impl Into<String>) -> Self {
        Self {
            attester,
            origin_id,
            chain_label: chain_label.into(),
            owners: Vec::new(),
            validity_window_secs: DEFAULT_VALIDITY_WINDOW,
        }
    }

    pub fn with_owners(mut self, owners: impl IntoIterator<Item = Principal>) -> Self {
        self.owners.extend(owners);
        self
    }

    pub fn with_validity_window(mut self, secs: u64) -> Self {
        self.validity_window_secs = secs;
        self
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_label.trim().is_empty() {
            return Err(ConfigError::EmptyChainLabel);
        }
        if self.validity_window_secs == 0 {
            return Err(ConfigError::ZeroValidityWindow);
        }
        if self.attester.is_zero() {
            return Err(ConfigError::ZeroAttester);
        }
        if self.attester == self.origin_id {
            return Err(ConfigError::AttesterIsOrigin(self.attester));
        }
        Ok(())
    }

    pub fn init_params(&self) -> InitParams {
        InitParams {
            attester: self.attester,
            origin_id: self.origin_id,
            chain_label: self.chain_label.clone(),
            owners: self.owners.clone(),
        }
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
