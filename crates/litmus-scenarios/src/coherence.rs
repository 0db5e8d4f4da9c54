//! Coherence: one writer counts a shared variable up; one reader polls
//! it twice per iteration. For a single observer, reads of a single
//! variable form a monotonically consistent sequence - the second poll
//! may never return an older value than the first.

use litmus_core::{Aggregate, Scenario, SyncCell};

const READER: usize = 1;

pub struct CoherenceState {
    counter: SyncCell<u32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CoherenceObs {
    pub first: u32,
    pub second: u32,
}

fn reset(_iterations: u32) -> CoherenceState {
    CoherenceState {
        counter: SyncCell::new(0),
    }
}

/// Single writer, so load-then-store is a well-defined increment.
fn writer(state: &CoherenceState, _iteration: u32, _obs: &mut CoherenceObs) {
    let current = state.counter.load();
    state.counter.store(current + 1);
}

fn reader(state: &CoherenceState, _iteration: u32, obs: &mut CoherenceObs) {
    obs.first = state.counter.load();
    obs.second = state.counter.load();
}

fn classify(_state: &CoherenceState, lanes: &[Vec<CoherenceObs>]) -> Aggregate {
    let mut agg = Aggregate::new();
    for obs in &lanes[READER] {
        if obs.second < obs.first {
            agg.record_violation();
        } else if obs.second > obs.first {
            agg.bump("advanced");
        } else {
            agg.bump("steady");
        }
    }
    agg
}

#[must_use]
pub fn coherence() -> Scenario<CoherenceState, CoherenceObs> {
    Scenario::new("coherence", 100_000, reset, vec![writer, reader], classify)
        .expect("catalog scenario is well-formed")
}
