//! Read-only history access
//!
//! Proof gating needs only three questions answered about the history. This
//! trait lets the gate sit in front of anything that can answer them, with
//! "now" already bound.

use std::sync::Arc;

use relay_primitives::Root;

use crate::clock::Clock;
use crate::ledger::RootLedger;

/// Read access to a root history at the current time
pub trait RootHistory {
    /// Whether any transition has been applied
    fn has_roots(&self) -> bool;

    /// Whether the history holds a record for `root`, including the bootstrap root
    fn is_recorded(&self, root: &Root) -> bool;

    fn is_valid_root(&self, root: &Root) -> bool;
}

impl<H: RootHistory + ?Sized> RootHistory for &H {
    fn has_roots(&self) -> bool {
        (**self).has_roots()
    }

    fn is_recorded(&self, root: &Root) -> bool {
        (**self).is_recorded(root)
    }

    fn is_valid_root(&self, root: &Root) -> bool {
        (**self).is_valid_root(root)
    }
}

impl<H: RootHistory + ?Sized> RootHistory for Arc<H> {
    fn has_roots(&self) -> bool {
        (**self).has_roots()
    }

    fn is_recorded(&self, root: &Root) -> bool {
        (**self).is_recorded(root)
    }

    fn is_valid_root(&self, root: &Root) -> bool {
        (**self).is_valid_root(root)
    }
}

/// A ledger paired with a clock
#[derive(Debug, Clone, Copy)]
pub struct LedgerView<'a, C> {
    ledger: &'a RootLedger,
    clock: C,
}

impl<'a, C: Clock> LedgerView<'a, C> {
    pub fn new(ledger: &'a RootLedger, clock: C) -> Self {
        Self { ledger, clock }
    }

    pub fn ledger(&self) -> &RootLedger {
        self.ledger
    }
}

impl<C: Clock> RootHistory for LedgerView<'_, C> {
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
