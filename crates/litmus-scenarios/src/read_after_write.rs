//! Read-after-write across two racing counters, under the
//! sequentially-consistent discipline.
//!
//! Each actor stores the iteration index into its own counter, then
//! reads the other's. In the total order, if actor A's read at
//! iteration `i` came back `j - 1`, that read sits between B's stores
//! of `j - 1` and `j` - so B's read at iteration `j` sits after A's
//! store of `i` and must come back at least `i`. A smaller value means
//! a read ran backward in the order.

use litmus_core::{Aggregate, ScCell, Scenario};

const ACTOR_A: usize = 0;
const ACTOR_B: usize = 1;

/// Early iterations are skipped by the classifier: the actors ramp out
/// of the rendezvous at slightly different times and the bound below
/// only holds once both are inside their measured loops.
const WARMUP: usize = 100;

pub struct ReadAfterWriteState {
    a: ScCell<u32>,
    b: ScCell<u32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadAfterWriteObs {
    pub seen: u32,
}

fn reset(_iterations: u32) -> ReadAfterWriteState {
    ReadAfterWriteState {
        a: ScCell::new(0),
        b: ScCell::new(0),
    }
}

fn actor_a(state: &ReadAfterWriteState, iteration: u32, obs: &mut ReadAfterWriteObs) {
    state.a.store(iteration);
    obs.seen = state.b.load();
}

fn actor_b(state: &ReadAfterWriteState, iteration: u32, obs: &mut ReadAfterWriteObs) {
    state.b.store(iteration);
    obs.seen = state.a.load();
}

fn classify(_state: &ReadAfterWriteState, lanes: &[Vec<ReadAfterWriteObs>]) -> Aggregate {
    let mut agg = Aggregate::new();
    let iterations = lanes[ACTOR_A].len();
    for i in WARMUP..iterations {
        let j = lanes[ACTOR_A][i].seen as usize + 1;
        if WARMUP < j && j < iterations && lanes[ACTOR_B][j].seen < i as u32 {
            agg.record_violation();
        }
    }
    agg
}

#[must_use]
pub fn read_after_write() -> Scenario<ReadAfterWriteState, ReadAfterWriteObs> {
    Scenario::new(
        "read_after_write",
        30_000,
        reset,
        vec![actor_a, actor_b],
        classify,
    )
    .expect("catalog scenario is well-formed")
}
