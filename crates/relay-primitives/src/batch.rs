//! Attestation batches
//!
//! The attester collects the root transitions observed on the source chain,
//! commits to them with a sorted-pair Merkle tree and signs the tree root
//! once. Each transition is then redeemed on its own with its sibling path
//! and the shared signature.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PrimitiveError, PrimitiveResult};
use crate::hash::{Hash256, Root};
use crate::leaf::AttestationLeaf;
use crate::merkle::SortedMerkleTree;
use crate::principal::Principal;
use crate::proof::TransitionProof;
use crate::signature::{AttestationSignature, AttesterKey};

/// One observed root transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub prev_root: Root,
    pub post_root: Root,
    pub replaced_at: u64,
}

/// Unsigned batch of transitions for one origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationBatch {
    pub batch_id: Uuid,
    pub origin_id: Principal,
    pub transitions: Vec<Transition>,
}

impl AttestationBatch {
    /// Start an empty batch for `origin_id`
    pub fn new(origin_id: Principal) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            origin_id,
            transitions: Vec::new(),
        }
    }

    /// Append a transition
    pub fn add_transition(mut self, prev_root: Root, post_root: Root, replaced_at: u64) -> Self {
        self.transitions.push(Transition {
            prev_root,
            post_root,
            replaced_at,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Leaves in insertion order
    pub fn leaves(&self) -> Vec<AttestationLeaf> {
        self.transitions
            .iter()
            .map(|t| AttestationLeaf::new(self.origin_id, t.prev_root, t.post_root, t.replaced_at))
            .collect()
    }

    /// Build the commitment tree over the batch
    pub fn tree(&self) -> PrimitiveResult<SortedMerkleTree> {
        SortedMerkleTree::from_leaf_hashes(self.leaves().iter().map(AttestationLeaf::hash).collect())
    }

    /// Sign the batch root and derive one proof per transition
    pub fn sign(&self, key: &AttesterKey) -> PrimitiveResult<SignedBatch> {
        let tree = self.tree()?;
        let batch_root = tree.root();
        let signature = key.sign_digest(&batch_root);

        let transitions = self
            .transitions
            .iter()
            .enumerate()
            .map(|(index, t)| {
                Ok(SignedTransition {
                    prev_root: t.prev_root,
                    post_root: t.post_root,
                    replaced_at: t.replaced_at,
                    proof: TransitionProof::new(tree.proof(index)?, signature),
                })
            })
            .collect::<PrimitiveResult<Vec<_>>>()?;

        Ok(SignedBatch {
            batch_id: self.batch_id,
            origin_id: self.origin_id,
            batch_root,
            signature,
            transitions,
        })
    }
}

/// A transition ready to be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransition {
    pub prev_root: Root,
    pub post_root: Root,
    pub replaced_at: u64,
    pub proof: TransitionProof,
}

/// Signed batch as published by the attester
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedBatch {
    pub batch_id: Uuid,
    pub origin_id: Principal,
    pub batch_root: Hash256,
    pub signature: AttestationSignature,
    pub transitions: Vec<SignedTransition>,
}

impl SignedBatch {
    /// Serialize to JSON
    pub fn to_json(&self) -> PrimitiveResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PrimitiveError::Serialization(format!("JSON error: {}", e)))
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> PrimitiveResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PrimitiveError::Serialization(format!("JSON error: {}", e)))
    }

    /// Find the transition with the given destination root
    pub fn find(&self, post_root: &Root) -> Option<&SignedTransition> {
        self.transitions.iter().find(|t| t.post_root == *post_root)
    }
}
