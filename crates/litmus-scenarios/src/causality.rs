//! Causality: outcomes that would require information to flow backward
//! through a dependency chain.
//!
//! Four entries:
//!
//! - [`causality_chain`] (4 actors): two relays copy `x → y` and
//!   `y → x`; a seeder writes 1 into `z`; a prober copies `z → x`. The
//!   value 1 can only enter the `x`/`y` loop through the prober, so
//!   both relays observing 1 while the prober observed 0 is forbidden -
//!   it would mean the 1 came out of thin air.
//! - [`causality_cycle`] (2 actors): each actor writes 1 only if it read
//!   1 from the other's location. Nobody ever writes 1 first, so any
//!   outcome other than both-zero is forbidden.
//! - [`causality_relay`] (2 actors): the decider reads its probe cell
//!   and answers on the fast (ordered) or slow (plain) channel; the
//!   responder waits for either answer, then writes the probe. The
//!   decider's read precedes its answer, the answer precedes the
//!   responder's write, so the decider observing a nonzero probe is
//!   forbidden.
//! - [`causality_gate`] (3 actors): the relay shape again, but the
//!   decider consults its probe only after a third actor opens an
//!   ordered gate. The cycle is forbidden for the same reason.

use litmus_core::{Aggregate, PlainCell, Scenario, SyncCell};

// --- chain -----------------------------------------------------------------

const RELAY_X: usize = 0;
const RELAY_Y: usize = 1;
const PROBER: usize = 3;

pub struct CausalityChainState {
    x: Vec<PlainCell<u32>>,
    y: Vec<PlainCell<u32>>,
    z: Vec<PlainCell<u32>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CausalityObs {
    pub seen: u32,
}

fn chain_reset(iterations: u32) -> CausalityChainState {
    CausalityChainState {
        x: (0..iterations).map(|_| PlainCell::new(0)).collect(),
        y: (0..iterations).map(|_| PlainCell::new(0)).collect(),
        z: (0..iterations).map(|_| PlainCell::new(0)).collect(),
    }
}

fn relay_x_to_y(state: &CausalityChainState, iteration: u32, obs: &mut CausalityObs) {
    let i = iteration as usize;
    obs.seen = state.x[i].load();
    state.y[i].store(obs.seen);
}

fn relay_y_to_x(state: &CausalityChainState, iteration: u32, obs: &mut CausalityObs) {
    let i = iteration as usize;
    obs.seen = state.y[i].load();
    state.x[i].store(obs.seen);
}

fn seed_z(state: &CausalityChainState, iteration: u32, _obs: &mut CausalityObs) {
    state.z[iteration as usize].store(1);
}

fn probe_z_to_x(state: &CausalityChainState, iteration: u32, obs: &mut CausalityObs) {
    let i = iteration as usize;
    obs.seen = state.z[i].load();
    state.x[i].store(obs.seen);
}

fn chain_classify(_state: &CausalityChainState, lanes: &[Vec<CausalityObs>]) -> Aggregate {
    let mut agg = Aggregate::new();
    for i in 0..lanes[RELAY_X].len() {
        let relayed_x = lanes[RELAY_X][i].seen;
        let relayed_y = lanes[RELAY_Y][i].seen;
        let probed = lanes[PROBER][i].seen;
        if relayed_x == 1 && relayed_y == 1 && probed == 0 {
            agg.record_violation();
        }
    }
    agg
}

#[must_use]
pub fn causality_chain() -> Scenario<CausalityChainState, CausalityObs> {
    Scenario::new(
        "causality_chain",
        30_000,
        chain_reset,
        vec![relay_x_to_y, relay_y_to_x, seed_z, probe_z_to_x],
        chain_classify,
    )
    .expect("catalog scenario is well-formed")
}

// --- cycle -----------------------------------------------------------------

pub struct CausalityCycleState {
    x: Vec<PlainCell<u32>>,
    y: Vec<PlainCell<u32>>,
}

fn cycle_reset(iterations: u32) -> CausalityCycleState {
    CausalityCycleState {
        x: (0..iterations).map(|_| PlainCell::new(0)).collect(),
        y: (0..iterations).map(|_| PlainCell::new(0)).collect(),
    }
}

fn echo_x_to_y(state: &CausalityCycleState, iteration: u32, obs: &mut CausalityObs) {
    let i = iteration as usize;
    obs.seen = state.x[i].load();
    if obs.seen == 1 {
        state.y[i].store(1);
    }
}

fn echo_y_to_x(state: &CausalityCycleState, iteration: u32, obs: &mut CausalityObs) {
    let i = iteration as usize;
    obs.seen = state.y[i].load();
    if obs.seen == 1 {
        state.x[i].store(1);
    }
}

fn cycle_classify(_state: &CausalityCycleState, lanes: &[Vec<CausalityObs>]) -> Aggregate {
    let mut agg = Aggregate::new();
    for (a, b) in lanes[0].iter().zip(&lanes[1]) {
        if !(a.seen == 0 && b.seen == 0) {
            agg.record_violation();
        }
    }
    agg
}

#[must_use]
pub fn causality_cycle() -> Scenario<CausalityCycleState, CausalityObs> {
    Scenario::new(
        "causality_cycle",
        30_000,
        cycle_reset,
        vec![echo_x_to_y, echo_y_to_x],
        cycle_classify,
    )
    .expect("catalog scenario is well-formed")
}

// --- relay -----------------------------------------------------------------

const DECIDER: usize = 0;
const RESPONDER: usize = 1;

pub struct CausalityRelayState {
    probe: Vec<PlainCell<u32>>,
    fast: Vec<SyncCell<u32>>,
    slow: Vec<PlainCell<u32>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RelayObs {
    pub decision: u32,
    pub seen_fast: u32,
    pub seen_slow: u32,
}

fn relay_reset(iterations: u32) -> CausalityRelayState {
    CausalityRelayState {
        probe: (0..iterations).map(|_| PlainCell::new(0)).collect(),
        fast: (0..iterations).map(|_| SyncCell::new(0)).collect(),
        slow: (0..iterations).map(|_| PlainCell::new(0)).collect(),
    }
}

fn decide(state: &CausalityRelayState, iteration: u32, obs: &mut RelayObs) {
    let i = iteration as usize;
    obs.decision = state.probe[i].load();
    if obs.decision == 0 {
        state.fast[i].store(1);
    } else {
        state.slow[i].store(1);
    }
}

/// Waits for the decider's answer; exactly one channel is written per
/// iteration, so the wait terminates.
fn respond(state: &CausalityRelayState, iteration: u32, obs: &mut RelayObs) {
    let i = iteration as usize;
    loop {
        obs.seen_fast = state.fast[i].load();
        obs.seen_slow = state.slow[i].load();
        if obs.seen_fast + obs.seen_slow != 0 {
            break;
        }
        std::hint::spin_loop();
    }
    state.probe[i].store(1);
}

fn relay_classify(_state: &CausalityRelayState, lanes: &[Vec<RelayObs>]) -> Aggregate {
    let mut agg = Aggregate::new();
    for (decider, responder) in lanes[DECIDER].iter().zip(&lanes[RESPONDER]) {
        if decider.decision != 0 {
            agg.record_violation();
        }
        if responder.seen_fast != 0 {
            agg.bump("fast_path");
        } else {
            agg.bump("slow_path");
        }
    }
    agg
}

#[must_use]
pub fn causality_relay() -> Scenario<CausalityRelayState, RelayObs> {
    Scenario::new(
        "causality_relay",
        30_000,
        relay_reset,
        vec![decide, respond],
        relay_classify,
    )
    .expect("catalog scenario is well-formed")
}

// --- gate ------------------------------------------------------------------

pub struct CausalityGateState {
    gate: Vec<SyncCell<u32>>,
    reply: Vec<SyncCell<u32>>,
    probe: Vec<PlainCell<u32>>,
    slow: Vec<PlainCell<u32>>,
}

fn gate_reset(iterations: u32) -> CausalityGateState {
    CausalityGateState {
        gate: (0..iterations).map(|_| SyncCell::new(0)).collect(),
        reply: (0..iterations).map(|_| SyncCell::new(0)).collect(),
        probe: (0..iterations).map(|_| PlainCell::new(0)).collect(),
        slow: (0..iterations).map(|_| PlainCell::new(0)).collect(),
    }
}

fn gated_decide(state: &CausalityGateState, iteration: u32, obs: &mut RelayObs) {
    let i = iteration as usize;
    let opened = state.gate[i].load();
    obs.decision = if opened == 1 { state.probe[i].load() } else { 0 };
    if obs.decision == 0 {
        state.reply[i].store(1);
    } else {
        state.slow[i].store(1);
    }
}

fn gated_respond(state: &CausalityGateState, iteration: u32, obs: &mut RelayObs) {
    let i = iteration as usize;
    loop {
        obs.seen_fast = state.reply[i].load();
        obs.seen_slow = state.slow[i].load();
        if obs.seen_fast + obs.seen_slow != 0 {
            break;
        }
        std::hint::spin_loop();
    }
    state.probe[i].store(1);
}

fn open_gate(state: &CausalityGateState, iteration: u32, _obs: &mut RelayObs) {
    state.gate[iteration as usize].store(1);
}

fn gate_classify(_state: &CausalityGateState, lanes: &[Vec<RelayObs>]) -> Aggregate {
    let mut agg = Aggregate::new();
    for (decider, responder) in lanes[DECIDER].iter().zip(&lanes[RESPONDER]) {
        if decider.decision != 0 {
            agg.record_violation();
        }
        if responder.seen_fast != 0 {
            agg.bump("fast_path");
        } else {
            agg.bump("slow_path");
        }
    }
    agg
}

#[must_use]
pub fn causality_gate() -> Scenario<CausalityGateState, RelayObs> {
    Scenario::new(
        "causality_gate",
        30_000,
        gate_reset,
        vec![gated_decide, gated_respond, open_gate],
        gate_classify,
    )
    .expect("catalog scenario is well-formed")
}
