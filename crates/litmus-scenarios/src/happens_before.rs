//! Happens-before edges between a plain payload and an ordered flag.
//!
//! Two entries share this module:
//!
//! - [`message_passing`]: the producer stores a plain payload, then a
//!   release flag; the consumer reads the flag, then the payload. A
//!   consumer that observed the flag must observe the payload. A default
//!   flag read means the pair has not synchronized yet and makes no
//!   claim about the payload - only a non-default flag with a stale
//!   payload is a violation.
//! - [`load_buffering`]: each actor first loads, then stores the other
//!   actor's location, with the flag under acquire-release. Both loads
//!   observing the other's later store would close a cycle through the
//!   release/acquire edge and is forbidden.

use litmus_core::{Aggregate, PlainCell, Scenario, SyncCell};

const PRODUCER: usize = 0;
const CONSUMER: usize = 1;

pub struct HappensBeforeState {
    payload: Vec<PlainCell<u32>>,
    flag: Vec<SyncCell<u32>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HappensBeforeObs {
    pub flag: u32,
    pub payload: u32,
}

fn reset(iterations: u32) -> HappensBeforeState {
    HappensBeforeState {
        payload: (0..iterations).map(|_| PlainCell::new(0)).collect(),
        flag: (0..iterations).map(|_| SyncCell::new(0)).collect(),
    }
}

// --- message passing -------------------------------------------------------

fn produce(state: &HappensBeforeState, iteration: u32, _obs: &mut HappensBeforeObs) {
    let i = iteration as usize;
    state.payload[i].store(iteration + 1);
    state.flag[i].store(iteration + 1);
}

fn consume(state: &HappensBeforeState, iteration: u32, obs: &mut HappensBeforeObs) {
    let i = iteration as usize;
    obs.flag = state.flag[i].load();
    obs.payload = state.payload[i].load();
}

fn classify_message_passing(
    _state: &HappensBeforeState,
    lanes: &[Vec<HappensBeforeObs>],
) -> Aggregate {
    let mut agg = Aggregate::new();
    for (i, obs) in lanes[CONSUMER].iter().enumerate() {
        if obs.flag == 0 {
            // Not yet synchronized; no claim about the payload.
            agg.bump("unsynchronized");
            continue;
        }
        agg.bump("synchronized");
        if obs.payload != i as u32 + 1 {
            agg.record_violation();
        }
    }
    agg
}

/// Message passing: flag visible ⇒ payload visible.
#[must_use]
pub fn message_passing() -> Scenario<HappensBeforeState, HappensBeforeObs> {
    Scenario::new(
        "message_passing",
        30_000,
        reset,
        vec![produce, consume],
        classify_message_passing,
    )
    .expect("catalog scenario is well-formed")
}

// --- load buffering --------------------------------------------------------

fn load_then_flag(state: &HappensBeforeState, iteration: u32, obs: &mut HappensBeforeObs) {
    let i = iteration as usize;
    obs.payload = state.payload[i].load();
    state.flag[i].store(iteration + 1);
}

fn flag_then_store(state: &HappensBeforeState, iteration: u32, obs: &mut HappensBeforeObs) {
    let i = iteration as usize;
    obs.flag = state.flag[i].load();
    state.payload[i].store(iteration + 1);
}

fn classify_load_buffering(
    _state: &HappensBeforeState,
    lanes: &[Vec<HappensBeforeObs>],
) -> Aggregate {
    let mut agg = Aggregate::new();
    for (i, (alpha, beta)) in lanes[PRODUCER].iter().zip(&lanes[CONSUMER]).enumerate() {
        let written = i as u32 + 1;
        if beta.flag != 0 {
            agg.bump("synchronized");
        } else {
            agg.bump("unsynchronized");
        }
        // Each load observing the other actor's later store closes an
        // impossible cycle through the release/acquire edge.
        if beta.flag == written && alpha.payload == written {
            agg.record_violation();
        }
    }
    agg
}

/// Load buffering: no cycle through a release/acquire edge.
#[must_use]
pub fn load_buffering() -> Scenario<HappensBeforeState, HappensBeforeObs> {
    Scenario::new(
        "load_buffering",
        30_000,
        reset,
        vec![load_then_flag, flag_then_store],
        classify_load_buffering,
    )
    .expect("catalog scenario is well-formed")
}
