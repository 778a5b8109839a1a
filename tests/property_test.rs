//! Property-Based Tests for root relay
//!
//! These tests use proptest to check invariants over arbitrary transition
//! sequences:
//! - Recorded roots can never be resubmitted as destinations
//! - Exactly one record is the head, and it is `latest_root`
//! - The head is always valid; superseded roots expire exactly once
//! - Failed transitions leave the ledger unchanged
//! - Every leaf of a signed batch authenticates against the batch root

use proptest::prelude::*;
use relay_ledger::{AccessController, LedgerError, RootLedger, TransitionAuthenticator};
use relay_primitives::{
    hash_pair_sorted, verify_path, AttestationBatch, AttesterKey, Hash256, Principal, Root,
    SortedMerkleTree,
};

// =============================================================================
// Test Helpers
// =============================================================================

/// Small root alphabet so sequences collide often
fn arb_root() -> impl Strategy<Value = Root> {
    (0u64..24).prop_map(Root::from_u64)
}

fn arb_transitions() -> impl Strategy<Value = Vec<(Root, Root, u64)>> {
    prop::collection::vec((arb_root(), arb_root(), 0u64..10_000), 1..40)
}

fn apply_all(ledger: &mut RootLedger, transitions: &[(Root, Root, u64)]) {
    for (prev, post, at) in transitions {
        let _ = ledger.apply_transition(*prev, *post, *at);
    }
}

// =============================================================================
// Ledger Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: a recorded root is rejected as a destination forever after
    #[test]
    fn prop_recorded_root_never_reaccepted(
        transitions in arb_transitions(),
        prev in arb_root(),
        at in 0u64..10_000,
    ) {
        let mut ledger = RootLedger::new(3600);
        apply_all(&mut ledger, &transitions);

        let recorded: Vec<Root> = ledger.records().map(|(r, _)| *r).collect();
        for root in recorded {
            prop_assert_eq!(
                ledger.apply_transition(prev, root, at),
                Err(LedgerError::DuplicateRoot(root))
            );
        }
    }

    /// Property: exactly one head, and it is the latest root
    #[test]
    fn prop_single_head(transitions in arb_transitions()) {
        let mut ledger = RootLedger::new(3600);
        apply_all(&mut ledger, &transitions);

        let heads: Vec<Root> = ledger
            .records()
            .filter(|(_, record)| record.is_head())
            .map(|(root, _)| *root)
            .collect();

        if ledger.has_roots() {
            prop_assert_eq!(heads.len(), 1);
            prop_assert_eq!(Some(heads[0]), ledger.latest_root().map(|(r, _)| r));
        } else {
            prop_assert!(heads.is_empty());
        }
    }

    /// Property: the head advances only when the located record was the head
    #[test]
    fn prop_latest_tracks_head_extensions(transitions in arb_transitions()) {
        let mut ledger = RootLedger::new(3600);

        for (prev, post, at) in transitions {
            let head_before = ledger.latest_root().map(|(r, _)| r);
            let prev_recorded = ledger.is_recorded(&prev);
            let extends_head = match head_before {
                None => true,
                Some(head) => !prev_recorded || prev == head,
            };

            if let Ok(event) = ledger.apply_transition(prev, post, at) {
                let head_after = ledger.latest_root().map(|(r, _)| r);
                if extends_head {
                    prop_assert_eq!(head_after, Some(post));
                } else {
                    prop_assert_eq!(head_after, head_before);
                }
                prop_assert_eq!(Some(event.latest_root), head_after);
            }
        }
    }

    /// Property: the whole history is a single chain from the first root
    #[test]
    fn prop_history_is_one_chain(transitions in arb_transitions()) {
        let mut ledger = RootLedger::new(3600);
        apply_all(&mut ledger, &transitions);

        // the root with no predecessor
        let successors: Vec<Root> = ledger.records().filter_map(|(_, r)| r.replaced_by).collect();
        let firsts: Vec<Root> = ledger
            .records()
            .map(|(root, _)| *root)
            .filter(|root| !successors.contains(root))
            .collect();

        if ledger.has_roots() {
            prop_assert_eq!(firsts.len(), 1);
            let chain = ledger.chain_from(&firsts[0]);
            prop_assert_eq!(chain.len(), ledger.len());
            prop_assert_eq!(chain.last().copied(), ledger.latest_root().map(|(r, _)| r));
        }
    }

    /// Property: failed transitions have no observable effect
    #[test]
    fn prop_failures_are_atomic(transitions in arb_transitions()) {
        let mut ledger = RootLedger::new(3600);

        for (prev, post, at) in transitions {
            let before = ledger.clone();
            if ledger.apply_transition(prev, post, at).is_err() {
                prop_assert_eq!(&ledger, &before);
            }
        }
    }

    /// Property: the head is valid at any time
    #[test]
    fn prop_head_always_valid(transitions in arb_transitions(), now in any::<u64>()) {
        let mut ledger = RootLedger::new(3600);
        apply_all(&mut ledger, &transitions);

        if let Some((head, _)) = ledger.latest_root() {
            prop_assert!(ledger.is_valid_root(&head, now));
        }
    }

    /// Property: a superseded root flips to invalid exactly after replaced_at + window
    #[test]
    fn prop_expiry_is_monotonic(
        transitions in arb_transitions(),
        window in 0u64..5_000,
    ) {
        let mut ledger = RootLedger::new(window);
        apply_all(&mut ledger, &transitions);

        for (root, record) in ledger.records() {
            if ledger.is_latest_root(root) {
                continue;
            }
            let deadline = record.replaced_at.saturating_add(window);
            prop_assert!(ledger.is_valid_root(root, deadline));
            if deadline < u64::MAX {
                prop_assert!(!ledger.is_valid_root(root, deadline + 1));
                prop_assert!(!ledger.is_valid_root(root, u64::MAX));
            }
        }
    }

    /// Property: never-recorded roots are never valid
    #[test]
    fn prop_unknown_never_valid(
        transitions in arb_transitions(),
        now in any::<u64>(),
    ) {
        let mut ledger = RootLedger::new(u64::MAX);
        apply_all(&mut ledger, &transitions);

        let outsider = Root::from_u64(1_000);
        prop_assert!(!ledger.is_valid_root(&outsider, now));
        prop_assert!(!ledger.root_info(&outsider, now).is_valid);
    }
}

// =============================================================================
// Merkle and Signature Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Property: sorted pair hashing is order independent
    #[test]
    fn prop_pair_hash_symmetric(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let (a, b) = (Hash256::from_bytes(a), Hash256::from_bytes(b));
        prop_assert_eq!(hash_pair_sorted(&a, &b), hash_pair_sorted(&b, &a));
    }

    /// Property: every leaf path verifies for any tree size
    #[test]
    fn prop_every_path_verifies(n in 1usize..64) {
        let leaves: Vec<Hash256> = (0..n as u64).map(|i| Hash256::sha256(&i.to_le_bytes())).collect();
        let tree = SortedMerkleTree::from_leaf_hashes(leaves.clone()).unwrap();

        for (i, leaf) in leaves.iter().enumerate() {
            let path = tree.proof(i).unwrap();
            prop_assert!(path.len() <= tree.depth());
            prop_assert!(verify_path(&tree.root(), leaf, &path));
        }
    }

    /// Property: every transition of a signed batch authenticates
    #[test]
    fn prop_signed_batch_authenticates(
        // [0xff; 32] exceeds the curve order
        seed in 1u8..0xff,
        count in 1u64..12,
    ) {
        let key = AttesterKey::from_bytes(&[seed; 32]).unwrap();
        let origin = Principal::from_bytes([0xee; 20]);
        let access = AccessController::new(key.principal(), []);
        let auth = TransitionAuthenticator::new(origin);

        let batch = (0..count)
            .fold(AttestationBatch::new(origin), |b, i| {
                b.add_transition(Root::from_u64(i), Root::from_u64(i + 1), 100 * i)
            })
            .sign(&key)
            .unwrap();

        for t in &batch.transitions {
            let root = auth
                .authenticate(&access, &t.prev_root, &t.post_root, t.replaced_at, &t.proof)
                .unwrap();
            prop_assert_eq!(root, batch.batch_root);
        }
    }
}
