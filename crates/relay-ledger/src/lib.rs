//! Root Relay Ledger
//!
//! Append-only history of identity tree roots relayed from a source chain.
//!
//! ## Components
//!
//! - [`RootLedger`]: records, head pointer, windowed validity
//! - [`TransitionAuthenticator`]: checks the attester's batch signature for a transition
//! - [`AccessController`]: owner and attester guards
//! - [`RootHistory`]: read-only view consumed by proof gates
//! - [`Clock`]: time source for validity queries
//!
//! ## Example
//!
//! ```
//! use relay_ledger::RootLedger;
//! use relay_primitives::Root;
//!
//! let mut ledger = RootLedger::new(3600);
//! ledger.apply_transition(Root::from_u64(1), Root::from_u64(2), 100).unwrap();
//! ledger.apply_transition(Root::from_u64(2), Root::from_u64(3), 200).unwrap();
//!
//! assert_eq!(ledger.latest_root(), Some((Root::from_u64(3), 200)));
//! assert!(ledger.is_valid_root(&Root::from_u64(2), 200 + 3600));
//! assert!(!ledger.is_valid_root(&Root::from_u64(2), 200 + 3601));
//! ```

pub mod access;
pub mod authenticator;
pub mod clock;
pub mod error;
pub mod history;
pub mod ledger;

pub use access::AccessController;
pub use authenticator::TransitionAuthenticator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LedgerError, LedgerResult};
pub use history::{LedgerView, RootHistory};
pub use ledger::{RootInfo, RootLedger, RootRecord, RootTransited, DEFAULT_VALIDITY_WINDOW};
