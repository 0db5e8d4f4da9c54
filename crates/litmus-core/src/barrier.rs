//! Rendezvous barrier for trial starts.
//!
//! Every actor publishes its own started flag, then busy-spins until it
//! has seen every peer's flag. There is no parking and no yielding:
//! actors must enter their measured loops as close together as possible,
//! and a blocking primitive here biases the schedule toward non-overlap.
//!
//! The flag discipline is itself a scenario parameter - some scenarios
//! probe whether a plain start flag still achieves overlap.
//!
//! If the flag count does not match the number of tasks that actually
//! rendezvous, the spin never completes. That is a fatal liveness failure
//! the engine does not recover from; callers that cannot tolerate a hang
//! opt into [`SpinBudget::Bounded`], which turns it into a
//! [`RendezvousTimeout`].

#[cfg(not(loom))]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(loom)]
use loom::sync::atomic::{AtomicBool, Ordering};

use crossbeam_utils::CachePadded;
use thiserror::Error;

/// Maximum number of actors a single trial may rendezvous.
pub const ACTORS_MAX: usize = 16;

/// Memory discipline used for the started flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDiscipline {
    /// Relaxed flag writes and reads.
    Plain,
    /// Release flag writes, acquire flag reads.
    AcquireRelease,
}

/// Bound on the rendezvous spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinBudget {
    /// Spin until every peer is visible, however long that takes.
    Unbounded,
    /// Give up after this many spin probes and report a timeout.
    Bounded(u64),
}

/// The rendezvous never completed within the configured spin budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("actor {actor} gave up waiting for peers after {spins} spin probes")]
pub struct RendezvousTimeout {
    pub actor: usize,
    pub spins: u64,
}

/// One started flag per actor.
///
/// Each flag is written exactly once, by its owning actor, and read by
/// all peers. Flags are never reset mid-trial; a fresh set is built for
/// every trial. Padding keeps each flag on its own cache line so peers
/// polling the array do not evict the owner's store.
pub struct StartFlags {
    flags: Box<[CachePadded<AtomicBool>]>,
    discipline: StartDiscipline,
    budget: SpinBudget,
}

impl StartFlags {
    #[must_use]
    pub fn new(actors: usize, discipline: StartDiscipline, budget: SpinBudget) -> Self {
        assert!(actors >= 1, "rendezvous needs at least one actor");
        assert!(actors <= ACTORS_MAX, "too many actors: {actors}");

        let flags = (0..actors)
            .map(|_| CachePadded::new(AtomicBool::new(false)))
            .collect();

        Self {
            flags,
            discipline,
            budget,
        }
    }

    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.flags.len()
    }

    /// Publish actor `me`'s flag, then spin until every flag is visible.
    ///
    /// Returns once this actor has observed all peers started. With an
    /// unbounded budget this may never return (see module docs).
    pub fn rendezvous(&self, me: usize) -> Result<(), RendezvousTimeout> {
        let (store_order, load_order) = match self.discipline {
            StartDiscipline::Plain => (Ordering::Relaxed, Ordering::Relaxed),
            StartDiscipline::AcquireRelease => (Ordering::Release, Ordering::Acquire),
        };

        self.flags[me].store(true, store_order);

        let mut spins: u64 = 0;
        loop {
            if self.flags.iter().all(|flag| flag.load(load_order)) {
                return Ok(());
            }

            if let SpinBudget::Bounded(max) = self.budget {
                spins += 1;
                if spins >= max {
                    return Err(RendezvousTimeout { actor: me, spins });
                }
            }

            #[cfg(loom)]
            loom::thread::yield_now();
            #[cfg(not(loom))]
            std::hint::spin_loop();
        }
    }

    /// Whether every actor has published its flag, as visible from the
    /// calling thread. Used by tests and post-join assertions.
    #[must_use]
    pub fn all_started(&self) -> bool {
        let load_order = match self.discipline {
            StartDiscipline::Plain => Ordering::Relaxed,
            StartDiscipline::AcquireRelease => Ordering::Acquire,
        };
        self.flags.iter().all(|flag| flag.load(load_order))
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn rendezvous_completes_for_all_actors() {
        let flags = StartFlags::new(4, StartDiscipline::AcquireRelease, SpinBudget::Unbounded);

        thread::scope(|scope| {
            for actor in 0..4 {
                let flags = &flags;
                scope.spawn(move || {
                    flags.rendezvous(actor).unwrap();
                    // Once the rendezvous returns, every peer flag must be up.
                    assert!(flags.all_started());
                });
            }
        });
    }

    #[test]
    fn plain_discipline_also_completes() {
        let flags = StartFlags::new(3, StartDiscipline::Plain, SpinBudget::Unbounded);

        thread::scope(|scope| {
            for actor in 0..3 {
                let flags = &flags;
                scope.spawn(move || {
                    flags.rendezvous(actor).unwrap();
                });
            }
        });

        assert!(flags.all_started());
    }

    #[test]
    fn missing_actor_times_out_under_bounded_budget() {
        // Three flags, but only two actors ever arrive.
        let flags = StartFlags::new(3, StartDiscipline::AcquireRelease, SpinBudget::Bounded(10_000));

        thread::scope(|scope| {
            for actor in 0..2 {
                let flags = &flags;
                scope.spawn(move || {
                    let err = flags.rendezvous(actor).unwrap_err();
                    assert_eq!(err.actor, actor);
                    assert_eq!(err.spins, 10_000);
                });
            }
        });

        assert!(!flags.all_started());
    }

    #[test]
    #[should_panic(expected = "too many actors")]
    fn actor_limit_is_enforced() {
        let _ = StartFlags::new(ACTORS_MAX + 1, StartDiscipline::Plain, SpinBudget::Unbounded);
    }
}
