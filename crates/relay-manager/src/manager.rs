//! Identity manager
//!
//! The deployable unit of the relay: root history, attester authentication,
//! owner administration and proof gating behind one interface. A manager
//! starts uninitialized and is configured exactly once through
//! [`IdentityManager::init`].

use std::collections::BTreeSet;

use relay_ledger::{
    AccessController, Clock, LedgerError, RootHistory, RootInfo, RootLedger, RootTransited,
    SystemClock, TransitionAuthenticator,
};
use relay_primitives::{Principal, Root, SignedTransition, TransitionProof};
use relay_verifier::{check_root, verify_gated, GroupMembershipVerifier, MembershipClaim};
use tracing::info;

use crate::config::{InitParams, RelayConfig};
use crate::error::{ManagerError, ManagerResult};
use crate::state::{DeploymentState, ManagerState};

/// Settings fixed at `init`
#[derive(Debug, Clone)]
struct Deployment {
    access: AccessController,
    authenticator: TransitionAuthenticator,
    chain_label: String,
}

/// Root relay for one source deployment
#[derive(Debug)]
pub struct IdentityManager<V, C = SystemClock> {
    verifier: V,
    clock: C,
    deployment: Option<Deployment>,
    ledger: RootLedger,
    events: Vec<RootTransited>,
}

impl<V: GroupMembershipVerifier, C: Clock> IdentityManager<V, C> {
    /// Create an uninitialized manager with the default validity window
    pub fn new(verifier: V, clock: C) -> Self {
        Self::with_ledger(verifier, clock, RootLedger::default())
    }

    fn with_ledger(verifier: V, clock: C, ledger: RootLedger) -> Self {
        Self {
            verifier,
            clock,
            deployment: None,
            ledger,
            events: Vec::new(),
        }
    }

    /// Create and initialize from a validated configuration
    pub fn from_config(
        config: &RelayConfig,
        caller: Principal,
        verifier: V,
        clock: C,
    ) -> ManagerResult<Self> {
        config.validate()?;
        let mut manager = Self::with_ledger(
            verifier,
            clock,
            RootLedger::new(config.validity_window_secs),
        );
        manager.init(caller, config.init_params())?;
        Ok(manager)
    }

    /// One-time initialization; the caller becomes an owner
    pub fn init(&mut self, caller: Principal, params: InitParams) -> ManagerResult<()> {
        if self.deployment.is_some() {
            return Err(LedgerError::AlreadyInitialized.into());
        }

        let owners = std::iter::once(caller).chain(params.owners);
        let deployment = Deployment {
            access: AccessController::new(params.attester, owners),
            authenticator: TransitionAuthenticator::new(params.origin_id),
            chain_label: params.chain_label,
        };
        info!(
            attester = %params.attester,
            origin_id = %params.origin_id,
            chain = %deployment.chain_label,
            owners = deployment.access.owners().len(),
            "Identity manager initialized"
        );
        self.deployment = Some(deployment);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.deployment.is_some()
    }

    fn deployment(&self) -> ManagerResult<&Deployment> {
        self.deployment
            .as_ref()
            .ok_or(ManagerError::Ledger(LedgerError::NotInitialized))
    }

    fn deployment_mut(&mut self) -> ManagerResult<&mut Deployment> {
        self.deployment
            .as_mut()
            .ok_or(ManagerError::Ledger(LedgerError::NotInitialized))
    }

    /// Authenticate and apply one attested transition
    ///
    /// All checks, including the signature, run before the history changes.
    pub fn apply_transition(
        &mut self,
        prev_root: Root,
        post_root: Root,
        replaced_at: u64,
        proof: &TransitionProof,
    ) -> ManagerResult<RootTransited> {
        let deployment = self.deployment()?;
        self.ledger.check_transition(&prev_root, &post_root)?;
        deployment.authenticator.authenticate(
            &deployment.access,
            &prev_root,
            &post_root,
            replaced_at,
            proof,
        )?;

        let event = self
            .ledger
            .apply_transition(prev_root, post_root, replaced_at)?;
        self.events.push(event);
        Ok(event)
    }

    /// Apply a transition taken from a signed batch
    pub fn apply_signed(&mut self, transition: &SignedTransition) -> ManagerResult<RootTransited> {
        self.apply_transition(
            transition.prev_root,
            transition.post_root,
            transition.replaced_at,
            &transition.proof,
        )
    }

    /// Gate a membership proof on root validity, then verify it
    pub fn verify_proof(&self, root: &Root, claim: &MembershipClaim) -> ManagerResult<()> {
        self.deployment()?;
        verify_gated(self, &self.verifier, root, claim)?;
        Ok(())
    }

    /// Root acceptance checks without calling the verifier
    pub fn check_root(&self, root: &Root) -> ManagerResult<()> {
        self.deployment()?;
        check_root(self, root)?;
        Ok(())
    }

    pub fn set_validity_window(&mut self, caller: &Principal, secs: u64) -> ManagerResult<()> {
        self.deployment()?.access.ensure_owner(caller)?;
        self.ledger.set_validity_window(secs);
        Ok(())
    }

    /// Returns how many of `owners` were not already owners
    pub fn add_owners(
        &mut self,
        caller: &Principal,
        owners: impl IntoIterator<Item = Principal>,
    ) -> ManagerResult<usize> {
        Ok(self.deployment_mut()?.access.add_owners(caller, owners)?)
    }

    pub fn root_exists(&self, root: &Root) -> bool {
        self.ledger.root_exists(root)
    }

    pub fn is_recorded(&self, root: &Root) -> bool {
        self.ledger.is_recorded(root)
    }

    pub fn is_latest_root(&self, root: &Root) -> bool {
        self.ledger.is_latest_root(root)
    }

    pub fn is_valid_root(&self, root: &Root) -> bool {
        self.ledger.is_valid_root(root, self.clock.now())
    }

    pub fn root_info(&self, root: &Root) -> RootInfo {
        self.ledger.root_info(root, self.clock.now())
    }

    pub fn latest_root(&self) -> Option<(Root, u64)> {
        self.ledger.latest_root()
    }

    pub fn validity_window(&self) -> u64 {
        self.ledger.validity_window()
    }

    pub fn attester(&self) -> Option<Principal> {
        self.deployment.as_ref().map(|d| d.access.attester())
    }

    pub fn origin_id(&self) -> Option<Principal> {
        self.deployment.as_ref().map(|d| d.authenticator.origin_id())
    }

    pub fn chain_label(&self) -> Option<&str> {
        self.deployment.as_ref().map(|d| d.chain_label.as_str())
    }

    pub fn owners(&self) -> Option<&BTreeSet<Principal>> {
        self.deployment.as_ref().map(|d| d.access.owners())
    }

    /// Applied transitions in application order
    pub fn events(&self) -> &[RootTransited] {
        &self.events
    }

    pub fn ledger(&self) -> &RootLedger {
        &self.ledger
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Snapshot everything except the verifier and clock
    pub fn to_state(&self) -> ManagerState {
        ManagerState {
            version: ManagerState::VERSION,
            deployment: self.deployment.as_ref().map(|d| DeploymentState {
                attester: d.access.attester(),
                origin_id: d.authenticator.origin_id(),
                chain_label: d.chain_label.clone(),
                owners: d.access.owners().iter().copied().collect(),
            }),
            ledger: self.ledger.clone(),
            events: self.events.clone(),
        }
    }

    /// Rebuild a manager from a snapshot
    pub fn from_state(state: ManagerState, verifier: V, clock: C) -> ManagerResult<Self> {
        state.validate()?;
        let deployment = state.deployment.map(|d| Deployment {
            access: AccessController::new(d.attester, d.owners),
            authenticator: TransitionAuthenticator::new(d.origin_id),
            chain_label: d.chain_label,
        });
        Ok(Self {
            verifier,
            clock,
            deployment,
            ledger: state.ledger,
            events: state.events,
        })
    }
}

impl<V, C: Clock> RootHistory for IdentityManager<V, C> {
    fn has_roots(&self) -> bool {
        self.ledger.has_roots()
    }

    fn is_recorded(&self, root: &Root) -> bool {
        self.ledger.is_recorded(root)
    }

    fn is_valid_root(&self, root: &Root) -> bool {
        self.ledger.is_valid_root(root, self.clock.now())
    }
}
