//! Root Relay Primitives
//!
//! This crate provides the building blocks shared by every root relay component:
//! - 256-bit digests (`Hash256`, aliased as `Root`) and 20-byte principals
//! - Attestation leaf hashing with origin domain separation
//! - Sorted-pair Merkle trees and sibling-path recomputation
//! - secp256k1 recoverable attestation signatures
//! - The `TransitionProof` wire codec
//! - An attestation batch builder used by tooling and tests

pub mod batch;
pub mod error;
pub mod hash;
pub mod leaf;
pub mod merkle;
pub mod principal;
pub mod proof;
pub mod signature;

pub use batch::{AttestationBatch, SignedBatch, SignedTransition, Transition};
pub use error::{PrimitiveError, PrimitiveResult};
pub use hash::{Hash256, Root};
pub use leaf::{AttestationLeaf, LEAF_DOMAIN};
pub use merkle::{hash_pair_sorted, process_path, verify_path, SortedMerkleTree};
pub use principal::Principal;
pub use proof::TransitionProof;
pub use signature::{AttestationSignature, AttesterKey, SIGNATURE_LEN};
