//! Root Relay - identity tree roots relayed across chains
//!
//! Relays the roots of an identity Merkle tree maintained on a source chain
//! so that group membership proofs can be checked against a recent root
//! elsewhere.
//!
//! # Overview
//!
//! An attester observes root transitions on the source chain, commits to a
//! batch of them with a sorted-pair Merkle tree and signs the batch root
//! once. Each transition is then applied on its own with its sibling path.
//! Applied roots form an append-only history; a superseded root remains
//! acceptable for a configurable validity window.
//!
//! # Crates
//!
//! - `relay-primitives`: digests, principals, leaf hashing, Merkle paths, signatures
//! - `relay-ledger`: root history, attester authentication, access control
//! - `relay-verifier`: validity-gated membership proof verification
//! - `relay-manager`: the deployable identity manager and its configuration
//!
//! # Example
//!
//! ```no_run
//! use relay_ledger::SystemClock;
//! use relay_manager::{IdentityManager, InitParams};
//! use relay_primitives::{AttestationBatch, AttesterKey, Principal, Root};
//! # use relay_verifier::{GroupMembershipVerifier, MembershipClaim, MembershipError};
//! # struct Semaphore;
//! # impl GroupMembershipVerifier for Semaphore {
//! #     fn verify_proof(&self, _: &Root, _: &MembershipClaim) -> Result<(), MembershipError> { Ok(()) }
//! # }
//!
//! let attester = AttesterKey::generate();
//! let origin = Principal::from_bytes([0x0c; 20]);
//! let owner = Principal::from_bytes([0x01; 20]);
//!
//! let mut manager = IdentityManager::new(Semaphore, SystemClock);
//! manager.init(owner, InitParams {
//!     attester: attester.principal(),
//!     origin_id: origin,
//!     chain_label: "sepolia".into(),
//!     owners: vec![],
//! }).unwrap();
//!
//! let batch = AttestationBatch::new(origin)
//!     .add_transition(Root::from_u64(1), Root::from_u64(2), 100)
//!     .sign(&attester)
//!     .unwrap();
//! manager.apply_signed(&batch.transitions[0]).unwrap();
//!
//! manager.verify_proof(&Root::from_u64(2), &MembershipClaim::default()).unwrap();
//! ```

// Re-export sub-crates
pub use relay_ledger as ledger;
pub use relay_manager as manager;
pub use relay_primitives as primitives;
pub use relay_verifier as verifier;
