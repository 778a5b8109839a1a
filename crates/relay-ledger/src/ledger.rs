//! Root history ledger
//!
//! An append-only record of every root the relay has seen, linked by
//! successor pointers. Records are created by transitions and never removed.
//! Whether a root is still acceptable is derived from the clock on every
//! query: the head is always valid, a superseded root stays valid for
//! `validity_window` seconds after it was replaced.

use std::collections::BTreeMap;

use relay_primitives::Root;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};

/// Default grace period for superseded roots (one hour)
pub const DEFAULT_VALIDITY_WINDOW: u64 = 3600;

/// History entry for a single root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RootRecord {
    /// Successor root, `None` for the head
    pub replaced_by: Option<Root>,

    /// Attested time this root stopped being current
    pub replaced_at: u64,

    /// Attested time this root became current, `None` for the bootstrap root
    pub accepted_at: Option<u64>,
}

impl RootRecord {
    pub fn is_head(&self) -> bool {
        self.replaced_by.is_none()
    }

    /// Whether this root was the destination of a transition
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }
}

/// Query result for a root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RootInfo {
    pub replaced_by: Option<Root>,
    pub replaced_at: u64,
    pub is_latest: bool,
    pub is_valid: bool,
}

/// Emitted for every applied transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootTransited {
    pub prev_root: Root,
    pub post_root: Root,
    pub replaced_at: u64,
    /// Head after the transition
    pub latest_root: Root,
}

/// Append-only root history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootLedger {
    records: BTreeMap<Root, RootRecord>,
    latest_root: Option<Root>,
    validity_window: u64,
}

impl Default for RootLedger {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDITY_WINDOW)
    }
}

impl RootLedger {
    /// Create an empty ledger
    pub fn new(validity_window: u64) -> Self {
        Self {
            records: BTreeMap::new(),
            latest_root: None,
            validity_window,
        }
    }

    /// Check the preconditions of a transition without applying it
    pub fn check_transition(&self, prev_root: &Root, post_root: &Root) -> LedgerResult<()> {
        if self.records.contains_key(post_root) {
            return Err(LedgerError::DuplicateRoot(*post_root));
        }
        if prev_root == post_root {
            return Err(LedgerError::IdenticalRoots(*post_root));
        }
        Ok(())
    }

    /// Link `post_root` into the history
    ///
    /// The record extended is `prev_root` when it is known, otherwise the
    /// current head. On an empty ledger `prev_root` is recorded as the
    /// bootstrap root. If the extended record already had a successor,
    /// `post_root` is spliced in before it and the head does not move.
    pub fn apply_transition(
        &mut self,
        prev_root: Root,
        post_root: Root,
        replaced_at: u64,
    ) -> LedgerResult<RootTransited> {
        self.check_transition(&prev_root, &post_root)?;

        let located = match self.latest_root {
            _ if self.records.contains_key(&prev_root) => prev_root,
            Some(head) => {
                warn!(
                    prev_root = %prev_root,
                    head = %head,
                    "Unknown previous root, linking at head"
                );
                head
            }
            None => {
                debug!(root = %prev_root, "Recording bootstrap root");
                prev_root
            }
        };
        let extends_head = self.latest_root.map_or(true, |head| head == located);

        let record = self.records.entry(located).or_default();
        let inherited = RootRecord {
            replaced_by: record.replaced_by,
            replaced_at: record.replaced_at,
            accepted_at: Some(replaced_at),
        };
        record.replaced_by = Some(post_root);
        record.replaced_at = replaced_at;
        self.records.insert(post_root, inherited);

        if extends_head {
            self.latest_root = Some(post_root);
        }

        let event = RootTransited {
            prev_root,
            post_root,
            replaced_at,
            latest_root: self.latest_root.unwrap_or(post_root),
        };
        info!(
            prev_root = %event.prev_root,
            post_root = %event.post_root,
            replaced_at = event.replaced_at,
            latest_root = %event.latest_root,
            spliced = !extends_head,
            "Root transited"
        );
        Ok(event)
    }

    /// Whether any transition has been applied
    pub fn has_roots(&self) -> bool {
        self.latest_root.is_some()
    }

    /// Whether `root` was accepted as the destination of a transition
    ///
    /// The bootstrap root is recorded but was never accepted.
    pub fn root_exists(&self, root: &Root) -> bool {
        self.records.get(root).map_or(false, RootRecord::is_accepted)
    }

    /// Whether the history holds a record for `root`, including the bootstrap root
    pub fn is_recorded(&self, root: &Root) -> bool {
        self.records.contains_key(root)
    }

    pub fn is_latest_root(&self, root: &Root) -> bool {
        self.latest_root.as_ref() == Some(root)
    }

    /// The head is always valid; a superseded root is valid up to and
    /// including `replaced_at + validity_window`
    pub fn is_valid_root(&self, root: &Root, now: u64) -> bool {
        if self.is_latest_root(root) {
            return true;
        }
        self.records
            .get(root)
            .map_or(false, |record| {
                now <= record.replaced_at.saturating_add(self.validity_window)
            })
    }

    /// History entry and current verdict for a root; unknown roots yield the default
    pub fn root_info(&self, root: &Root, now: u64) -> RootInfo {
        match self.records.get(root) {
            Some(record) => RootInfo {
                replaced_by: record.replaced_by,
                replaced_at: record.replaced_at,
                is_latest: self.is_latest_root(root),
                is_valid: self.is_valid_root(root, now),
            },
            None => RootInfo::default(),
        }
    }

    /// Current head and the time it was accepted
    pub fn latest_root(&self) -> Option<(Root, u64)> {
        let head = self.latest_root?;
        let accepted_at = self
            .records
            .get(&head)
            .and_then(|r| r.accepted_at)
            .unwrap_or(0);
        Some((head, accepted_at))
    }

    pub fn validity_window(&self) -> u64 {
        self.validity_window
    }

    /// Change the grace period; applies to every historical record immediately
    pub fn set_validity_window(&mut self, validity_window: u64) {
        info!(
            old = self.validity_window,
            new = validity_window,
            "Validity window updated"
        );
        self.validity_window = validity_window;
    }

    pub fn record(&self, root: &Root) -> Option<&RootRecord> {
        self.records.get(root)
    }

    /// All records in root order
    pub fn records(&self) -> impl Iterator<Item = (&Root, &RootRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Walk successor pointers from `root` to the head
    pub fn chain_from(&self, root: &Root) -> Vec<Root> {
        let mut chain = Vec::new();
        let mut current = self.records.contains_key(root).then_some(*root);
        while let Some(r) = current {
            // the history never branches, but a tampered snapshot could loop
            if chain.len() > self.records.len() {
                break;
            }
            chain.push(r);
            current = self.records.get(&r).and_then(|rec| rec.replaced_by);
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(n: u64) -> Root {
        Root::from_u64(n)
    }

    fn ledger_with(transitions: &[(u64, u64, u64)]) -> RootLedger {
        let mut ledger = RootLedger::new(3600);
        for (prev, post, at) in transitions {
            ledger.apply_transition(root(*prev), root(*post), *at).unwrap();
        }
        ledger
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = RootLedger::default();
        assert!(!ledger.has_roots());
        assert!(ledger.is_empty());
        assert_eq!(ledger.latest_root(), None);
        assert_eq!(ledger.validity_window(), DEFAULT_VALIDITY_WINDOW);
        assert!(!ledger.is_valid_root(&root(1), 0));
        assert_eq!(ledger.root_info(&root(1), 0), RootInfo::default());
    }

    #[test]
    fn test_bootstrap_transition() {
        let mut ledger = RootLedger::new(3600);
        let event = ledger.apply_transition(root(1), root(2), 100).unwrap();

        assert_eq!(
            event,
            RootTransited {
                prev_root: root(1),
                post_root: root(2),
                replaced_at: 100,
                latest_root: root(2),
            }
        );
        assert!(!ledger.root_exists(&root(1)));
        assert!(ledger.is_recorded(&root(1)));
        assert!(ledger.root_exists(&root(2)));
        assert_eq!(ledger.latest_root(), Some((root(2), 100)));

        let bootstrap = ledger.record(&root(1)).unwrap();
        assert_eq!(bootstrap.replaced_by, Some(root(2)));
        assert_eq!(bootstrap.replaced_at, 100);
        assert_eq!(bootstrap.accepted_at, None);
    }

    #[test]
    fn test_only_destinations_exist() {
        let ledger = ledger_with(&[(1, 2, 100), (2, 3, 200)]);

        assert!(!ledger.root_exists(&Root::zero()));
        assert!(!ledger.root_exists(&root(1)));
        assert!(ledger.root_exists(&root(2)));
        assert!(ledger.root_exists(&root(3)));
        assert!(!ledger.root_exists(&root(4)));

        // still recorded, so it cannot come back as a destination
        assert!(ledger.is_recorded(&root(1)));
        assert_eq!(
            ledger.root_info(&root(1), 0),
            RootInfo {
                replaced_by: Some(root(2)),
                replaced_at: 100,
                is_latest: false,
                is_valid: true,
            }
        );
    }

    #[test]
    fn test_linear_chain() {
        let ledger = ledger_with(&[(1, 2, 100), (2, 3, 200)]);

        assert_eq!(ledger.latest_root(), Some((root(3), 200)));
        assert!(ledger.is_latest_root(&root(3)));
        assert!(!ledger.is_latest_root(&root(2)));
        assert_eq!(ledger.chain_from(&root(1)), vec![root(1), root(2), root(3)]);

        let info = ledger.root_info(&root(2), 150);
        assert_eq!(info.replaced_by, Some(root(3)));
        assert_eq!(info.replaced_at, 200);
        assert!(!info.is_latest);
        assert!(info.is_valid);
    }

    #[test]
    fn test_duplicate_root_rejected() {
        let mut ledger = ledger_with(&[(1, 2, 100)]);
        let before = ledger.clone();

        assert_eq!(
            ledger.apply_transition(root(5), root(2), 300),
            Err(LedgerError::DuplicateRoot(root(2)))
        );
        // the bootstrap root counts as recorded
        assert_eq!(
            ledger.apply_transition(root(2), root(1), 300),
            Err(LedgerError::DuplicateRoot(root(1)))
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_identical_roots_rejected() {
        let mut ledger = RootLedger::new(3600);
        assert_eq!(
            ledger.apply_transition(root(1), root(1), 100),
            Err(LedgerError::IdenticalRoots(root(1)))
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_duplicate_checked_before_identical() {
        let mut ledger = ledger_with(&[(1, 2, 100)]);
        assert_eq!(
            ledger.apply_transition(root(2), root(2), 300),
            Err(LedgerError::DuplicateRoot(root(2)))
        );
    }

    #[test]
    fn test_out_of_order_splice() {
        let mut ledger = ledger_with(&[(1, 2, 100), (2, 3, 200)]);

        // 5 is unknown: links at the head
        let event = ledger.apply_transition(root(5), root(6), 500).unwrap();
        assert_eq!(event.latest_root, root(6));
        assert_eq!(ledger.record(&root(3)).unwrap().replaced_by, Some(root(6)));
        assert!(!ledger.is_recorded(&root(5)));

        // 3 -> 4 arrives late and is spliced before 6
        let event = ledger.apply_transition(root(3), root(4), 300).unwrap();
        assert_eq!(event.latest_root, root(6));
        assert_eq!(ledger.latest_root(), Some((root(6), 500)));

        let three = ledger.record(&root(3)).unwrap();
        assert_eq!(three.replaced_by, Some(root(4)));
        assert_eq!(three.replaced_at, 300);

        let four = ledger.record(&root(4)).unwrap();
        assert_eq!(four.replaced_by, Some(root(6)));
        assert_eq!(four.replaced_at, 500);
        assert_eq!(four.accepted_at, Some(300));

        assert_eq!(
            ledger.chain_from(&root(1)),
            vec![root(1), root(2), root(3), root(4), root(6)]
        );
    }

    #[test]
    fn test_single_head() {
        let ledger = ledger_with(&[(1, 2, 100), (2, 3, 200), (7, 8, 300), (2, 9, 150)]);
        let heads: Vec<_> = ledger.records().filter(|(_, r)| r.is_head()).collect();
        assert_eq!(heads.len(), 1);
        assert_eq!(Some(*heads[0].0), ledger.latest_root().map(|(r, _)| r));
    }

    #[test]
    fn test_expiry_boundary_inclusive() {
        let ledger = ledger_with(&[(1, 2, 100), (2, 3, 200)]);

        assert!(ledger.is_valid_root(&root(2), 200 + 3600));
        assert!(!ledger.is_valid_root(&root(2), 200 + 3601));
        // head never expires
        assert!(ledger.is_valid_root(&root(3), u64::MAX));
    }

    #[test]
    fn test_bootstrap_root_expires() {
        let ledger = ledger_with(&[(1, 2, 100)]);
        assert!(ledger.is_valid_root(&root(1), 100 + 3600));
        assert!(!ledger.is_valid_root(&root(1), 100 + 3601));
    }

    #[test]
    fn test_window_change_is_retroactive() {
        let mut ledger = ledger_with(&[(1, 2, 100), (2, 3, 200)]);
        let now = 1_000;
        assert!(ledger.is_valid_root(&root(2), now));

        ledger.set_validity_window(10);
        assert!(!ledger.is_valid_root(&root(2), now));

        ledger.set_validity_window(5_000);
        assert!(ledger.is_valid_root(&root(2), now));
    }

    #[test]
    fn test_window_saturates() {
        let mut ledger = ledger_with(&[(1, 2, u64::MAX - 1), (2, 3, u64::MAX)]);
        ledger.set_validity_window(u64::MAX);
        assert!(ledger.is_valid_root(&root(2), u64::MAX));
    }

    #[test]
    fn test_never_recorded_root_invalid() {
        let ledger = ledger_with(&[(1, 2, 100)]);
        assert!(!ledger.is_valid_root(&root(42), 0));
        assert!(!ledger.root_exists(&root(42)));
        assert!(!ledger.is_recorded(&root(42)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let ledger = ledger_with(&[(1, 2, 100), (2, 3, 200)]);
        let json = serde_json::to_string(&ledger).unwrap();
        let restored: RootLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ledger);
    }
}
