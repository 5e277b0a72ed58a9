// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Property tests: classification completeness and table/list agreement over
//! random step sequences with random sleeping sets.

use std::collections::BTreeSet;

use echo_pairs::{BodyId, Collision, PairId, PairRegistry};
use proptest::prelude::*;
use proptest::test_runner::{Config as PropConfig, RngAlgorithm, TestRng, TestRunner};
use rustc_hash::FxHashSet;

const BODIES: u32 = 6;

/// One step: the set of touching body pairs (canonical `a < b`) plus the set
/// of sleeping bodies.
type Step = (BTreeSet<(u32, u32)>, BTreeSet<u32>);

fn step_strategy() -> impl Strategy<Value = Step> {
    let pair = (0..BODIES, 0..BODIES)
        .prop_filter("distinct bodies", |(a, b)| a != b)
        .prop_map(|(a, b)| (a.min(b), a.max(b)));
    (
        prop::collection::btree_set(pair, 0..8),
        prop::collection::btree_set(0..BODIES, 0..3),
    )
}

fn records(touching: &BTreeSet<(u32, u32)>, flip: bool) -> Vec<Collision> {
    touching
        .iter()
        .map(|&(a, b)| {
            let (a, b) = if flip { (b, a) } else { (a, b) };
            Collision::new(BodyId(a), BodyId(b)).expect("distinct bodies")
        })
        .collect()
}

fn run_steps(steps: &[Step]) -> Result<(), TestCaseError> {
    let mut pairs = PairRegistry::new();
    let mut previously_active: BTreeSet<PairId> = BTreeSet::new();

    for (i, (touching, asleep)) in steps.iter().enumerate() {
        let sleeping: FxHashSet<BodyId> = asleep.iter().map(|&b| BodyId(b)).collect();
        let tracked_before: BTreeSet<PairId> = pairs.iter().map(|(_, p)| p.id()).collect();
        let batch = records(touching, i % 2 == 1);
        pairs
            .update(&batch, f64::from(u32::try_from(i).unwrap_or(u32::MAX)), &sleeping)
            .map_err(|e| TestCaseError::fail(format!("update failed: {e}")))?;

        prop_assert_eq!(
            pairs.started().len() + pairs.active().len(),
            touching.len(),
            "one classification per record"
        );

        for &handle in pairs.list() {
            let hits = [pairs.started(), pairs.active(), pairs.ended()]
                .iter()
                .filter(|list| list.contains(&handle))
                .count();
            prop_assert_eq!(hits, 1);
        }

        let touched: BTreeSet<PairId> = touching
            .iter()
            .map(|&(a, b)| PairId::new(BodyId(a), BodyId(b)))
            .collect();
        for pair in pairs.active_pairs() {
            prop_assert!(previously_active.contains(&pair.id()));
        }
        for pair in pairs.started_pairs() {
            prop_assert!(!previously_active.contains(&pair.id()));
        }
        let ended: BTreeSet<PairId> = pairs.ended_pairs().map(|p| p.id()).collect();
        let expected_ended: BTreeSet<PairId> =
            tracked_before.difference(&touched).copied().collect();
        prop_assert_eq!(ended, expected_ended);

        // Ended pairs stay tracked exactly when a participant sleeps.
        for pair in pairs.ended_pairs() {
            let (a, b) = pair.id().bodies();
            let retained = sleeping.contains(&a) || sleeping.contains(&b);
            prop_assert_eq!(pairs.contains(a, b), retained);
        }

        pairs
            .check_invariants()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        previously_active = touched;
    }
    Ok(())
}

#[test]
fn proptest_seed_pinned_classification_is_complete() {
    const SEED_BYTES: [u8; 32] = [
        0x50, 0x41, 0x49, 0x52, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0,
    ];
    let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &SEED_BYTES);
    let mut runner = TestRunner::new_with_rng(PropConfig::default(), rng);

    let steps = prop::collection::vec(step_strategy(), 1..12);
    runner
        .run(&steps, |steps| run_steps(&steps))
        .expect("classification property holds for pinned seed");
}

proptest! {
    #[test]
    fn clear_always_empties_everything(steps in prop::collection::vec(step_strategy(), 1..6)) {
        let mut pairs = PairRegistry::new();
        let mut handles = Vec::new();
        for (i, (touching, asleep)) in steps.iter().enumerate() {
            let sleeping: FxHashSet<BodyId> = asleep.iter().map(|&b| BodyId(b)).collect();
            let batch = records(touching, false);
            pairs
                .update(&batch, f64::from(u32::try_from(i).unwrap_or(u32::MAX)), &sleeping)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            handles.extend_from_slice(pairs.list());
        }
        pairs.clear();
        prop_assert!(pairs.is_empty());
        prop_assert!(pairs.started().is_empty() && pairs.active().is_empty() && pairs.ended().is_empty());
        prop_assert!(handles.iter().all(|&h| pairs.get(h).is_none()));
    }
}
