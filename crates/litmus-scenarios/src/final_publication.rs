//! Publication of a fixed-at-construction field through a plain slot.
//!
//! The publisher constructs an object whose `value` field is set once,
//! at construction, and never written again, then publishes a reference
//! to it through a plain (relaxed) pointer slot. The observer spins
//! until the slot is non-null and reads the field through the reference
//! it got. Observing the reference but not the construction-time value
//! is the forbidden outcome.

use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use litmus_core::{Aggregate, Scenario};

const OBSERVER: usize = 1;

/// Construction-time value of the frozen field.
const FROZEN_VALUE: i64 = -12;

/// An object whose field is fixed at construction.
pub struct Frozen {
    value: i64,
}

pub struct FinalPublicationState {
    slots: Vec<AtomicPtr<Frozen>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FinalPublicationObs {
    pub value: i64,
}

fn reset(iterations: u32) -> FinalPublicationState {
    FinalPublicationState {
        slots: (0..iterations)
            .map(|_| AtomicPtr::new(ptr::null_mut()))
            .collect(),
    }
}

fn publish(state: &FinalPublicationState, iteration: u32, _obs: &mut FinalPublicationObs) {
    let frozen = Box::into_raw(Box::new(Frozen {
        value: FROZEN_VALUE,
    }));
    // Plain publication: the pointer itself is the only edge to the
    // observer.
    state.slots[iteration as usize].store(frozen, Ordering::Relaxed);
}

fn observe(state: &FinalPublicationState, iteration: u32, obs: &mut FinalPublicationObs) {
    let slot = &state.slots[iteration as usize];
    loop {
        let frozen = slot.load(Ordering::Relaxed);
        if !frozen.is_null() {
            // Safety: a published object stays allocated until the trial
            // state is dropped, and `value` is never written after
            // construction. Whether the construction-time value is
            // visible through the plainly-published pointer is exactly
            // the race under probe.
            obs.value = unsafe { (*frozen).value };
            return;
        }
        std::hint::spin_loop();
    }
}

fn classify(_state: &FinalPublicationState, lanes: &[Vec<FinalPublicationObs>]) -> Aggregate {
    let mut agg = Aggregate::new();
    for obs in &lanes[OBSERVER] {
        if obs.value != FROZEN_VALUE {
            agg.record_violation();
        }
    }
    agg
}

impl Drop for FinalPublicationState {
    fn drop(&mut self) {
        for slot in &mut self.slots {
            let frozen = *slot.get_mut();
            if !frozen.is_null() {
                // Safety: exclusive access after all actors joined; every
                // slot was published at most once.
                drop(unsafe { Box::from_raw(frozen) });
            }
        }
    }
}

#[must_use]
pub fn final_publication() -> Scenario<FinalPublicationState, FinalPublicationObs> {
    Scenario::new(
        "final_publication",
        30_000,
        reset,
        vec![publish, observe],
        classify,
    )
    .expect("catalog scenario is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use litmus_core::run_trial;

    #[test]
    fn frozen_field_is_always_visible() {
        let agg = run_trial(&final_publication().with_iterations(10_000));
        assert!(agg.is_clean(), "{}", agg.format());
    }

    #[test]
    fn default_field_value_is_flagged() {
        let state = reset(0);
        let lanes = vec![
            vec![FinalPublicationObs::default(); 2],
            vec![
                FinalPublicationObs {
                    value: FROZEN_VALUE,
                },
                FinalPublicationObs { value: 0 },
            ],
        ];
        let agg = classify(&state, &lanes);
        assert_eq!(agg.violations, 1);
    }

    #[test]
    fn published_objects_are_reclaimed() {
        // Drop without any publication, and drop after a partial fill.
        let empty = reset(4);
        drop(empty);

        let state = reset(4);
        let mut obs = FinalPublicationObs::default();
        publish(&state, 0, &mut obs);
        publish(&state, 2, &mut obs);
        drop(state);
    }
}
