//! Store buffering: each actor stores 1 into its own slot, then reads
//! the other actor's slot, both under the sequentially-consistent
//! discipline. In the total order one of the two loads must come after
//! the other's store, so both actors reading 0 is forbidden. The three
//! permitted shapes are tallied to describe how tightly the actors
//! overlapped.

use litmus_core::{Aggregate, ScCell, Scenario};

const ACTOR_A: usize = 0;
const ACTOR_B: usize = 1;

pub struct StoreBufferingState {
    a: Vec<ScCell<u32>>,
    b: Vec<ScCell<u32>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreBufferingObs {
    /// The other actor's slot, as read after this actor's own store.
    pub seen: u32,
}

fn reset(iterations: u32) -> StoreBufferingState {
    StoreBufferingState {
        a: (0..iterations).map(|_| ScCell::new(0)).collect(),
        b: (0..iterations).map(|_| ScCell::new(0)).collect(),
    }
}

fn actor_a(state: &StoreBufferingState, iteration: u32, obs: &mut StoreBufferingObs) {
    let i = iteration as usize;
    state.a[i].store(1);
    obs.seen = state.b[i].load();
}

fn actor_b(state: &StoreBufferingState, iteration: u32, obs: &mut StoreBufferingObs) {
    let i = iteration as usize;
    state.b[i].store(1);
    obs.seen = state.a[i].load();
}

fn classify(_state: &StoreBufferingState, lanes: &[Vec<StoreBufferingObs>]) -> Aggregate {
    let mut agg = Aggregate::new();
    for (a, b) in lanes[ACTOR_A].iter().zip(&lanes[ACTOR_B]) {
        match (a.seen, b.seen) {
            (0, 0) => agg.record_violation(),
            (1, 1) => agg.bump("side_by_side"),
            // A finished before B's store landed: A read 0, B read 1.
            (0, _) => agg.bump("a_outruns_b"),
            (_, 0) => agg.bump("b_outruns_a"),
            _ => agg.bump("side_by_side"),
        }
    }
    agg
}

#[must_use]
pub fn store_buffering() -> Scenario<StoreBufferingState, StoreBufferingObs> {
    Scenario::new(
        "store_buffering",
        30_000,
        reset,
        vec![actor_a, actor_b],
        classify,
    )
    .expect("catalog scenario is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use litmus_core::run_trial;
    use proptest::prelude::*;

    #[test]
    fn both_stale_never_happens() {
        let scenario = store_buffering().with_iterations(10_000);
        let agg = run_trial(&scenario);
        assert!(agg.is_clean(), "{}", agg.format());
    }

    #[test]
    fn shapes_are_tallied() {
        let state = reset(0);
        let lanes = vec![
            vec![
                StoreBufferingObs { seen: 1 },
                StoreBufferingObs { seen: 0 },
                StoreBufferingObs { seen: 1 },
                StoreBufferingObs { seen: 0 },
            ],
            vec![
                StoreBufferingObs { seen: 1 },
                StoreBufferingObs { seen: 1 },
                StoreBufferingObs { seen: 0 },
                StoreBufferingObs { seen: 0 },
            ],
        ];
        let agg = classify(&state, &lanes);
        assert_eq!(agg.violations, 1);
        assert_eq!(agg.category("side_by_side"), 1);
        assert_eq!(agg.category("a_outruns_b"), 1);
        assert_eq!(agg.category("b_outruns_a"), 1);
    }

    proptest! {
        /// Violations and the three shape categories partition the
        /// iteration space, whatever the recorded values.
        #[test]
        fn categories_partition_iterations(pairs in proptest::collection::vec((0u32..=1, 0u32..=1), 0..256)) {
            let state = reset(0);
            let lanes = vec![
                pairs.iter().map(|&(a, _)| StoreBufferingObs { seen: a }).collect::<Vec<_>>(),
                pairs.iter().map(|&(_, b)| StoreBufferingObs { seen: b }).collect::<Vec<_>>(),
            ];
            let agg = classify(&state, &lanes);
            let total = agg.violations
                + agg.category("side_by_side")
                + agg.category("a_outruns_b")
                + agg.category("b_outruns_a");
            prop_assert_eq!(total, pairs.len() as u64);
        }
    }
}
