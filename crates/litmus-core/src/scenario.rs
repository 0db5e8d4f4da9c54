//! Scenario descriptors.
//!
//! A scenario is data: an iteration count, a reset routine that builds
//! the trial's shared state, one body per actor, and a pure classifier
//! over the recorded observation lanes. The engine (see
//! [`crate::engine::run_trial`]) is the only code that interprets it.
//!
//! Misconfiguration is rejected here, before any actor is spawned. The
//! one invariant that cannot be misconfigured at all is the actor-body
//! count: the body list *is* the actor list, so a body/actor mismatch is
//! unrepresentable.

use thiserror::Error;

use crate::barrier::{SpinBudget, StartDiscipline, ACTORS_MAX};
use crate::outcome::Aggregate;

/// Builds the trial's shared state. Called exactly once per trial,
/// before any actor is spawned; must leave every variable fully
/// initialized and deterministic.
pub type ResetFn<S> = fn(iterations: u32) -> S;

/// One actor's per-iteration body: shared state, iteration index, and
/// the actor's own observation slot for that iteration.
pub type ActorFn<S, R> = fn(state: &S, iteration: u32, observation: &mut R);

/// Pure post-join classification over all actors' observation lanes.
pub type ClassifyFn<S, R> = fn(state: &S, lanes: &[Vec<R>]) -> Aggregate;

/// Construction-time misconfiguration. Raised before any actor spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("scenario `{name}` declares {actors} actor body(ies); at least 2 are required")]
    TooFewActors { name: &'static str, actors: usize },

    #[error("scenario `{name}` declares {actors} actor bodies; the engine supports at most {max}", max = ACTORS_MAX)]
    TooManyActors { name: &'static str, actors: usize },

    #[error("scenario `{name}` must run at least one iteration")]
    ZeroIterations { name: &'static str },
}

/// Declarative description of one racing experiment.
///
/// `S` is the trial's shared-state type; `R` is the per-iteration record
/// each actor writes into its own lane. A descriptor is constructed once
/// (typically by the catalog) and is immutable thereafter; every call to
/// `run_trial` builds fresh state, flags, and lanes from it.
#[derive(Debug)]
pub struct Scenario<S, R> {
    pub(crate) name: &'static str,
    pub(crate) iterations: u32,
    pub(crate) start: StartDiscipline,
    pub(crate) spin: SpinBudget,
    pub(crate) reset: ResetFn<S>,
    pub(crate) actors: Vec<ActorFn<S, R>>,
    pub(crate) classify: ClassifyFn<S, R>,
}

impl<S, R> Scenario<S, R> {
    /// Validate and build a descriptor.
    ///
    /// Defaults: acquire-release start flags, unbounded rendezvous spin.
    pub fn new(
        name: &'static str,
        iterations: u32,
        reset: ResetFn<S>,
        actors: Vec<ActorFn<S, R>>,
        classify: ClassifyFn<S, R>,
    ) -> Result<Self, ScenarioError> {
        if actors.len() < 2 {
            return Err(ScenarioError::TooFewActors {
                name,
                actors: actors.len(),
            });
        }
        if actors.len() > ACTORS_MAX {
            return Err(ScenarioError::TooManyActors {
                name,
                actors: actors.len(),
            });
        }
        if iterations == 0 {
            return Err(ScenarioError::ZeroIterations { name });
        }

        Ok(Self {
            name,
            iterations,
            start: StartDiscipline::AcquireRelease,
            spin: SpinBudget::Unbounded,
            reset,
            actors,
            classify,
        })
    }

    /// Override the start-flag discipline.
    #[must_use]
    pub fn with_start(mut self, start: StartDiscipline) -> Self {
        self.start = start;
        self
    }

    /// Override the rendezvous spin budget.
    #[must_use]
    pub fn with_spin(mut self, spin: SpinBudget) -> Self {
        self.spin = spin;
        self
    }

    /// Override the iteration count.
    ///
    /// # Panics
    ///
    /// Panics on zero, mirroring the construction-time check.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        assert!(iterations > 0, "scenario `{}` must run at least one iteration", self.name);
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    #[must_use]
    pub fn start(&self) -> StartDiscipline {
        self.start
    }

    #[must_use]
    pub fn spin(&self) -> SpinBudget {
        self.spin
    }
}
