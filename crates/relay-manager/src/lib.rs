//! Root Relay Identity Manager
//!
//! Composes the root ledger, attester authentication, owner administration
//! and membership proof gating into the unit that is deployed per source
//! chain.
//!
//! ```ignore
//! use relay_ledger::SystemClock;
//! use relay_manager::{IdentityManager, RelayConfig};
//!
//! let config = RelayConfig::from_file("relay.json")?;
//! let mut manager = IdentityManager::from_config(&config, owner, verifier, SystemClock)?;
//! for transition in &signed_batch.transitions {
//!     manager.apply_signed(transition)?;
//! }
//! manager.verify_proof(&root, &claim)?;
//! ```

mod config;
mod error;
mod manager;
mod state;

pub use config::{ConfigError, InitParams, RelayConfig};
pub use error::{ManagerError, ManagerResult};
pub use manager::IdentityManager;
pub use state::{DeploymentState, ManagerState};
