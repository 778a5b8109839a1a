//! Attestation leaves
//!
//! Each root transition in an attested batch becomes one leaf. The leaf binds
//! the transition to the origin deployment so a batch signed for one origin
//! cannot be redeemed against another.

use serde::{Deserialize, Serialize};

use crate::hash::{Hash256, Root};
use crate::principal::{Principal, PRINCIPAL_LEN};

/// Domain separator for transition leaves
pub const LEAF_DOMAIN: &[u8] = b"ROOT_RELAY_TRANSITION_LEAF_V1";

/// Encoded leaf preimage length (excluding the domain tag)
const LEAF_PREIMAGE_LEN: usize = PRINCIPAL_LEN + 32 + 32 + 32;

/// A single attested root transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationLeaf {
    /// Deployment the transition is intended for
    pub origin_id: Principal,
    /// Root being replaced
    pub prev_root: Root,
    /// Root replacing it
    pub post_root: Root,
    /// Logical time the replacement took effect
    pub replaced_at: u64,
}

impl AttestationLeaf {
    pub fn new(origin_id: Principal, prev_root: Root, post_root: Root, replaced_at: u64) -> Self {
        Self {
            origin_id,
            prev_root,
            post_root,
            replaced_at,
        }
    }

    /// Packed preimage: origin ‖ prev ‖ post ‖ replaced_at as a 32-byte big-endian word
    pub fn preimage(&self) -> [u8; LEAF_PREIMAGE_LEN] {
        let mut out = [0u8; LEAF_PREIMAGE_LEN];
        let mut offset = 0;
        out[offset..offset + PRINCIPAL_LEN].copy_from_slice(self.origin_id.as_bytes());
        offset += PRINCIPAL_LEN;
        out[offset..offset + 32].copy_from_slice(self.prev_root.as_bytes());
        offset += 32;
        out[offset..offset + 32].copy_from_slice(self.post_root.as_bytes());
        offset += 32;
        out[offset + 24..offset + 32].copy_from_slice(&self.replaced_at.to_be_bytes());
        out
    }

    /// Compute the leaf hash
    pub fn hash(&self) -> Hash256 {
        Hash256::sha256_with_domain(LEAF_DOMAIN, &self.preimage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf() -> AttestationLeaf {
        AttestationLeaf::new(
            Principal::from_bytes([0x11; 20]),
            Hash256::from_u64(1),
            Hash256::from_u64(2),
            100,
        )
    }

    #[test]
    fn test_leaf_hash_deterministic() {
        assert_eq!(leaf().hash(), leaf().hash());
    }

    #[test]
    fn test_preimage_layout() {
        let bytes = leaf().preimage();
        assert_eq!(&bytes[..20], &[0x11; 20]);
        assert_eq!(bytes[20 + 31], 1);
        assert_eq!(bytes[52 + 31], 2);
        assert_eq!(&bytes[84..108], &[0u8; 24]);
        assert_eq!(&bytes[108..], &100u64.to_be_bytes());
    }

    #[test]
    fn test_leaf_hash_binds_every_field() {
        let base = leaf().hash();

        let mut other = leaf();
        other.origin_id = Principal::from_bytes([0x22; 20]);
        assert_ne!(base, other.hash());

        let mut other = leaf();
        other.prev_root = Hash256::from_u64(9);
        assert_ne!(base, other.hash());

        let mut other = leaf();
        other.post_root = Hash256::from_u64(9);
        assert_ne!(base, other.hash());

        let mut other = leaf();
        other.replaced_at = 101;
        assert_ne!(base, other.hash());
    }

    #[test]
    fn test_leaf_hash_is_domain_separated() {
        let leaf = leaf();
        assert_ne!(leaf.hash(), Hash256::sha256(&leaf.preimage()));
    }
}
