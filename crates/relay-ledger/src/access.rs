//! Role checks
//!
//! Two roles exist: owners administer the relay (validity window, owner
//! set) and a single attester authorizes root transitions.

use std::collections::BTreeSet;

use relay_primitives::Principal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{LedgerError, LedgerResult};

/// Owner set and attester identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessController {
    attester: Principal,
    owners: BTreeSet<Principal>,
}

impl AccessController {
    pub fn new(attester: Principal, owners: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            attester,
            owners: owners.into_iter().collect(),
        }
    }

    /// Fail with `Unauthorized` unless `caller` is an owner
    pub fn ensure_owner(&self, caller: &Principal) -> LedgerResult<()> {
        if self.owners.contains(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(*caller))
        }
    }

    pub fn is_owner(&self, principal: &Principal) -> bool {
        self.owners.contains(principal)
    }

    pub fn is_attester(&self, principal: &Principal) -> bool {
        self.attester == *principal
    }

    pub fn attester(&self) -> Principal {
        self.attester
    }

    pub fn owners(&self) -> &BTreeSet<Principal> {
        &self.owners
    }

    /// Add owners on behalf of an existing owner; returns how many were new
    pub fn add_owners(
        &mut self,
        caller: &Principal,
        owners: impl IntoIterator<Item = Principal>,
    ) -> LedgerResult<usize> {
        self.ensure_owner(caller)?;
        let added = owners
            .into_iter()
            .filter(|owner| self.owners.insert(*owner))
            .count();
        info!(caller = %caller, added, total = self.owners.len(), "Owners added");
        Ok(added)
    }
}
