//! Actor execution engine.
//!
//! One trial: build fresh state via the scenario's reset, spawn exactly
//! one OS thread per actor body, rendezvous, race for `iterations`
//! rounds, join, classify. The engine imposes no synchronization beyond
//! the barrier and the final join; an incidental lock or fence here
//! would mask the races under test.
//!
//! Observation lanes are partitioned per actor (single writer) and are
//! handed to the classifier only after every actor has joined, so
//! classification is sequential and race-free by construction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::barrier::StartFlags;
use crate::outcome::Aggregate;
use crate::scenario::Scenario;

/// Run one trial of `scenario` and return its aggregate.
///
/// Blocks until every actor joins and classification completes. With an
/// unbounded spin budget and a scenario body that itself deadlocks, this
/// call hangs; bounding that is the external driver's job.
///
/// Nothing is retained across calls: state, start flags, and lanes are
/// rebuilt per trial, so trials of the same (or different) scenarios may
/// run concurrently in one process.
pub fn run_trial<S, R>(scenario: &Scenario<S, R>) -> Aggregate
where
    S: Sync,
    R: Clone + Default + Send,
{
    let iterations = scenario.iterations;
    let state = (scenario.reset)(iterations);
    let flags = StartFlags::new(scenario.actors.len(), scenario.start, scenario.spin);
    let mut lanes: Vec<Vec<R>> = scenario
        .actors
        .iter()
        .map(|_| vec![R::default(); iterations as usize])
        .collect();
    let timed_out = AtomicBool::new(false);

    thread::scope(|scope| {
        let state = &state;
        let flags = &flags;
        let timed_out = &timed_out;

        for (actor, (body, lane)) in scenario
            .actors
            .iter()
            .copied()
            .zip(lanes.iter_mut())
            .enumerate()
        {
            scope.spawn(move || {
                if flags.rendezvous(actor).is_err() {
                    // Relaxed is enough: the scope join orders this store
                    // before the read below.
                    timed_out.store(true, Ordering::Relaxed);
                    return;
                }

                for i in 0..iterations {
                    body(state, i, &mut lane[i as usize]);
                }
            });
        }
    });

    if timed_out.load(Ordering::Relaxed) {
        return Aggregate::barrier_timeout();
    }

    (scenario.classify)(&state, &lanes)
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use crate::barrier::StartDiscipline;
    use std::sync::atomic::AtomicU32;

    struct TicketState {
        gate: AtomicU32,
    }

    fn ticket_reset(_iterations: u32) -> TicketState {
        TicketState {
            gate: AtomicU32::new(0),
        }
    }

    /// Take a gate ticket on loop entry, then record the iteration index.
    fn ticket_body(state: &TicketState, iteration: u32, observation: &mut (u32, u32)) {
        if iteration == 0 {
            observation.0 = state.gate.fetch_add(1, Ordering::SeqCst);
        }
        observation.1 = iteration;
    }

    fn ticket_classify(state: &TicketState, lanes: &[Vec<(u32, u32)>]) -> Aggregate {
        let mut agg = Aggregate::new();

        // Each actor entered its measured loop exactly once.
        let mut tickets: Vec<u32> = lanes.iter().map(|lane| lane[0].0).collect();
        tickets.sort_unstable();
        let expected: Vec<u32> = (0..lanes.len() as u32).collect();
        if tickets != expected {
            agg.record_violation();
        }
        assert_eq!(state.gate.load(Ordering::SeqCst), lanes.len() as u32);

        // Every lane slot was written by its own iteration.
        for lane in lanes {
            for (i, observation) in lane.iter().enumerate() {
                if observation.1 != i as u32 {
                    agg.record_violation();
                }
            }
        }
        agg
    }

    #[test]
    fn trial_runs_every_actor_through_every_iteration() {
        let scenario = Scenario::new(
            "tickets",
            500,
            ticket_reset,
            vec![ticket_body, ticket_body, ticket_body],
            ticket_classify,
        )
        .unwrap();

        let agg = run_trial(&scenario);
        assert!(agg.is_clean(), "{}", agg.format());
    }

    #[test]
    fn plain_start_flags_still_release_the_trial() {
        let scenario = Scenario::new(
            "tickets-plain-start",
            100,
            ticket_reset,
            vec![ticket_body, ticket_body],
            ticket_classify,
        )
        .unwrap()
        .with_start(StartDiscipline::Plain);

        let agg = run_trial(&scenario);
        assert!(agg.is_clean(), "{}", agg.format());
    }

    #[test]
    fn trials_share_nothing() {
        let scenario = Scenario::new(
            "tickets-repeat",
            50,
            ticket_reset,
            vec![ticket_body, ticket_body],
            ticket_classify,
        )
        .unwrap();

        // Gate counts restart from zero every trial; stale state would
        // trip the permutation check.
        for _ in 0..10 {
            let agg = run_trial(&scenario);
            assert!(agg.is_clean(), "{}", agg.format());
        }
    }
}
