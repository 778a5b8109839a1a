//! Transition authentication
//!
//! A transition is accepted only if its leaf, folded up its sibling path,
//! reaches a batch root that the configured attester signed. The leaf
//! includes the deployment's origin id, so proofs do not carry over between
//! deployments.

use relay_primitives::{AttestationLeaf, Hash256, Principal, Root, TransitionProof};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::AccessController;
use crate::error::{LedgerError, LedgerResult};

/// Checks attester signatures over batch roots for one origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionAuthenticator {
    origin_id: Principal,
}

impl TransitionAuthenticator {
    pub fn new(origin_id: Principal) -> Self {
        Self { origin_id }
    }

    pub fn origin_id(&self) -> Principal {
        self.origin_id
    }

    /// Leaf hash for a transition at this origin
    pub fn leaf_hash(&self, prev_root: &Root, post_root: &Root, replaced_at: u64) -> Hash256 {
        AttestationLeaf::new(self.origin_id, *prev_root, *post_root, replaced_at).hash()
    }

    /// Verify that the attester signed the batch containing this transition
    ///
    /// Returns the authenticated batch root.
    pub fn authenticate(
        &self,
        access: &AccessController,
        prev_root: &Root,
        post_root: &Root,
        replaced_at: u64,
        proof: &TransitionProof,
    ) -> LedgerResult<Hash256> {
        let leaf = self.leaf_hash(prev_root, post_root, replaced_at);
        let batch_root = proof.batch_root(&leaf);

        let signer = proof
            .signature
            .recover_signer(&batch_root)
            .map_err(|e| LedgerError::invalid_signature(e.to_string()))?;
        debug!(batch_root = %batch_root, signer = %signer, "Recovered batch signer");

        if !access.is_attester(&signer) {
            return Err(LedgerError::invalid_signature(format!(
                "recovered signer {} is not the attester",
                signer
            )));
        }
        Ok(batch_root)
    }
}
