//! Test verifier
//!
//! Accepts every proof until toggled, then rejects every proof with
//! [`MembershipError::ProofInvalid`]. Records the calls it receives.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use relay_primitives::Root;

use crate::claim::{GroupMembershipVerifier, MembershipClaim};
use crate::error::MembershipError;

#[derive(Debug, Default)]
pub struct ToggleVerifier {
    revert: AtomicBool,
    calls: AtomicUsize,
    last_root: Mutex<Option<Root>>,
}

impl ToggleVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip between accepting and rejecting
    pub fn toggle_revert(&self) {
        self.revert.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn is_reverting(&self) -> bool {
        self.revert.load(Ordering::SeqCst)
    }

    /// Number of proofs received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Root of the most recent call
    pub fn last_root(&self) -> Option<Root> {
        self.last_root.lock().ok().and_then(|guard| *guard)
    }
}

impl GroupMembershipVerifier for ToggleVerifier {
    fn verify_proof(&self, root: &Root, _claim: &MembershipClaim) -> Result<(), MembershipError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_root.lock() {
            *guard = Some(*root);
        }
        if self.is_reverting() {
            Err(MembershipError::ProofInvalid)
        } else {
            Ok(())
        }
    }
}
