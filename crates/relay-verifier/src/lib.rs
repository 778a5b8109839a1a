//! Root Relay Verifier
//!
//! Gates zero-knowledge group membership proofs on the relayed root history.
//! A proof is forwarded to the external verifier only when its root is the
//! current head or a superseded root still inside the validity window.
//!
//! # Usage
//!
//! ```ignore
//! use relay_ledger::{LedgerView, SystemClock};
//! use relay_verifier::ProofGate;
//!
//! let gate = ProofGate::new(LedgerView::new(&ledger, SystemClock), semaphore);
//! gate.verify_proof(&root, &claim)?;
//! ```

mod claim;
mod error;
mod gate;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use claim::{GroupMembershipVerifier, MembershipClaim, MEMBERSHIP_PROOF_LEN};
pub use error::{GateError, GateResult, MembershipError};
pub use gate::{check_root, verify_gated, ProofGate};
