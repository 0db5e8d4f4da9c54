//! Mutex atomicity: two actors each run one critical section per
//! iteration, incrementing the slot's counter five times inside it.
//! Critical sections on one cell are mutually exclusive and totally
//! ordered, so every slot must end at exactly ten - anything else is a
//! lost update.

use litmus_core::{Aggregate, GuardedCell, Scenario};

const INCREMENTS_PER_SECTION: u32 = 5;
const ACTORS: u32 = 2;
const EXPECTED: u32 = ACTORS * INCREMENTS_PER_SECTION;

pub struct MutexCounterState {
    counters: Vec<GuardedCell<u32>>,
}

fn reset(iterations: u32) -> MutexCounterState {
    MutexCounterState {
        counters: (0..iterations).map(|_| GuardedCell::new(0)).collect(),
    }
}

fn increment(state: &MutexCounterState, iteration: u32, _obs: &mut ()) {
    state.counters[iteration as usize].with(|counter| {
        for _ in 0..INCREMENTS_PER_SECTION {
            *counter += 1;
        }
    });
}

fn classify(state: &MutexCounterState, _lanes: &[Vec<()>]) -> Aggregate {
    let mut agg = Aggregate::new();
    for counter in &state.counters {
        if counter.read() != EXPECTED {
            agg.record_violation();
        }
    }
    agg
}

#[must_use]
pub fn mutex_counter() -> Scenario<MutexCounterState, ()> {
    Scenario::new(
        "mutex_counter",
        30_000,
        reset,
        vec![increment, increment],
        classify,
    )
    .expect("catalog scenario is well-formed")
}
