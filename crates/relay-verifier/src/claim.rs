//! Group membership claims and the verifier capability

use relay_primitives::{Hash256, Root};
use serde::{Deserialize, Serialize};

use crate::error::MembershipError;

/// Number of field elements in a membership proof
pub const MEMBERSHIP_PROOF_LEN: usize = 8;

/// A zero-knowledge group membership claim, opaque to the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MembershipClaim {
    pub signal: Hash256,
    pub nullifier: Hash256,
    pub external_nullifier: Hash256,
    pub proof: [Hash256; MEMBERSHIP_PROOF_LEN],
}

/// External verifier of group membership proofs
pub trait GroupMembershipVerifier {
    /// Verify `claim` against the tree `root`
    fn verify_proof(&self, root: &Root, claim: &MembershipClaim) -> Result<(), MembershipError>;
}

impl<V: GroupMembershipVerifier + ?Sized> GroupMembershipVerifier for &V {
    fn verify_proof(&self, root: &Root, claim: &MembershipClaim) -> Result<(), MembershipError> {
        (**self).verify_proof(root, claim)
    }
}

impl<V: GroupMembershipVerifier + ?Sized> GroupMembershipVerifier for std::sync::Arc<V> {
    fn verify_proof(&self, root: &Root, claim: &MembershipClaim) -> Result<(), MembershipError> {
        (**self).verify_proof(root, claim)
    }
}

impl<V: GroupMembershipVerifier + ?Sized> GroupMembershipVerifier for Box<V> {
    fn verify_proof(&self, root: &Root, claim: &MembershipClaim) -> Result<(), MembershipError> {
        (**self).verify_proof(root, claim)
    }
}
