//! Transition proofs
//!
//! A transition proof carries everything needed to redeem one leaf of an
//! attested batch: the sibling path from the leaf to the batch root and the
//! attester's signature over that root.
//!
//! Binary layout:
//! `version(1) ‖ sibling_count(u32 BE) ‖ siblings(32 each) ‖ signature(65)`

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{PrimitiveError, PrimitiveResult};
use crate::hash::Hash256;
use crate::merkle::process_path;
use crate::signature::{AttestationSignature, SIGNATURE_LEN};

/// Proof that a transition belongs to a signed batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionProof {
    /// Sibling path from the leaf to the batch root
    pub siblings: Vec<Hash256>,

    /// Attester signature over the batch root
    pub signature: AttestationSignature,
}

impl TransitionProof {
    /// Current binary format version
    pub const VERSION: u8 = 1;

    /// Version byte plus sibling count
    const HEADER_LEN: usize = 5;

    pub fn new(siblings: Vec<Hash256>, signature: AttestationSignature) -> Self {
        Self {
            siblings,
            signature,
        }
    }

    /// Recompute the batch root this proof commits `leaf` to
    pub fn batch_root(&self, leaf: &Hash256) -> Hash256 {
        process_path(leaf, &self.siblings)
    }

    /// Encoded length in bytes
    pub fn encoded_len(&self) -> usize {
        Self::HEADER_LEN + self.siblings.len() * 32 + SIGNATURE_LEN
    }

    /// Serialize to compact binary format
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());

        bytes.push(Self::VERSION);
        bytes.extend_from_slice(&(self.siblings.len() as u32).to_be_bytes());
        for sibling in &self.siblings {
            bytes.extend_from_slice(sibling.as_bytes());
        }
        bytes.extend_from_slice(self.signature.as_bytes());

        bytes
    }

    /// Deserialize from compact binary format
    pub fn from_bytes(bytes: &[u8]) -> PrimitiveResult<Self> {
        if bytes.len() < Self::HEADER_LEN {
            return Err(PrimitiveError::decode("Input too short"));
        }

        let version = bytes[0];
        if version != Self::VERSION {
            return Err(PrimitiveError::decode(format!(
                "Unsupported version: {}",
                version
            )));
        }

        let count = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;
        let expected = count
            .checked_mul(32)
            .and_then(|n| n.checked_add(Self::HEADER_LEN + SIGNATURE_LEN))
            .ok_or_else(|| PrimitiveError::decode("Sibling count overflows"))?;

        if bytes.len() < expected {
            return Err(PrimitiveError::decode(format!(
                "Input too short: expected {} bytes, got {}",
                expected,
                bytes.len()
            )));
        }
        if bytes.len() > expected {
            return Err(PrimitiveError::decode(format!(
                "Trailing bytes: expected {} bytes, got {}",
                expected,
                bytes.len()
            )));
        }

        let body = &bytes[Self::HEADER_LEN..];
        let (path, signature) = body.split_at(count * 32);
        let siblings = path
            .chunks_exact(32)
            .map(Hash256::from_slice)
            .collect::<PrimitiveResult<Vec<_>>>()?;
        let signature = AttestationSignature::from_slice(signature)?;

        Ok(Self {
            siblings,
            signature,
        })
    }

    /// Binary form, base64 encoded
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.to_bytes())
    }

    /// Parse the base64 encoded binary form
    pub fn from_base64(encoded: &str) -> PrimitiveResult<Self> {
        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| PrimitiveError::decode(format!("base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}
