//! Proof gate
//!
//! Membership proofs are only forwarded to the verifier when their root is
//! one the relay currently accepts. Checks run in this order:
//!
//! 1. no roots at all: [`GateError::NoRootsSeen`]
//! 2. root recorded but past its window: [`GateError::ExpiredRoot`]
//! 3. root never recorded: [`GateError::UnknownRoot`]
//!
//! The verifier's own result is returned unchanged.

use relay_ledger::RootHistory;
use relay_primitives::Root;
use tracing::debug;

use crate::claim::{GroupMembershipVerifier, MembershipClaim};
use crate::error::{GateError, GateResult};

/// Root acceptance checks alone, without calling the verifier
pub fn check_root<H: RootHistory + ?Sized>(history: &H, root: &Root) -> GateResult<()> {
    if !history.has_roots() {
        debug!(root = %root, "Gate closed: no roots seen");
        return Err(GateError::NoRootsSeen);
    }
    if history.is_valid_root(root) {
        return Ok(());
    }
    if history.is_recorded(root) {
        debug!(root = %root, "Gate closed: root expired");
        Err(GateError::ExpiredRoot(*root))
    } else {
        debug!(root = %root, "Gate closed: unknown root");
        Err(GateError::UnknownRoot(*root))
    }
}

/// Check the root, then delegate to the verifier
pub fn verify_gated<H, V>(
    history: &H,
    verifier: &V,
    root: &Root,
    claim: &MembershipClaim,
) -> GateResult<()>
where
    H: RootHistory + ?Sized,
    V: GroupMembershipVerifier + ?Sized,
{
    check_root(history, root)?;
    debug!(root = %root, "Gate open, delegating to verifier");
    verifier.verify_proof(root, claim)?;
    Ok(())
}

/// Standalone gate over a root history and a membership verifier
#[derive(Debug, Clone)]
pub struct ProofGate<H, V> {
    history: H,
    verifier: V,
}

impl<H: RootHistory, V: GroupMembershipVerifier> ProofGate<H, V> {
    pub fn new(history: H, verifier: V) -> Self {
        Self { history, verifier }
    }

    /// Run the root checks only
    pub fn check_root(&self, root: &Root) -> GateResult<()> {
        check_root(&self.history, root)
    }

    /// Gate and verify a membership claim
    pub fn verify_proof(&self, root: &Root, claim: &MembershipClaim) -> GateResult<()> {
        verify_gated(&self.history, &self.verifier, root, claim)
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub fn into_parts(self) -> (H, V) {
        (self.history, self.verifier)
    }
}
