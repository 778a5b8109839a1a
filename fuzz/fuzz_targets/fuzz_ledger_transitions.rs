//! Fuzz target for ledger transition sequences
//!
//! This target ensures, for any sequence of transitions:
//! 1. Applying transitions never panics
//! 2. Failed transitions leave the ledger unchanged
//! 3. Exactly one record is the head and it is the latest root
//! 4. The head is always valid

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use relay_ledger::RootLedger;
use relay_primitives::Root;

#[derive(Debug, Arbitrary)]
struct Step {
    /// Roots are drawn from a small alphabet so collisions are common
    prev: u8,
    post: u8,
    replaced_at: u64,
    now: u64,
}

#[derive(Debug, Arbitrary)]
struct Input {
    validity_window: u64,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    let mut ledger = RootLedger::new(input.validity_window);

    for step in input.steps.iter().take(256) {
        let prev = Root::from_u64(u64::from(step.prev % 32));
        let post = Root::from_u64(u64::from(step.post % 32));

        let before = ledger.clone();
        match ledger.apply_transition(prev, post, step.replaced_at) {
            Ok(event) => {
                assert!(ledger.root_exists(&post));
                assert_eq!(ledger.latest_root().map(|(r, _)| r), Some(event.latest_root));
            }
            Err(_) => assert_eq!(ledger, before),
        }

        let heads = ledger.records().filter(|(_, r)| r.is_head()).count();
        assert_eq!(heads, usize::from(ledger.has_roots()));

        if let Some((head, _)) = ledger.latest_root() {
            assert!(ledger.is_valid_root(&head, step.now));
        }
    }
});
