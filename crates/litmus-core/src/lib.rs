//! # litmus-core
//!
//! Engine for empirically detecting memory-model violations: race a
//! small, fixed set of actor threads over shared, discipline-tagged
//! state for many iterations, then classify the recorded observations.
//!
//! This crate provides:
//! - [`cell`]: value containers tagged with their access discipline
//!   (plain, acquire-release, sequentially consistent, mutex-guarded)
//! - [`barrier`]: the spin-only rendezvous that releases all actors
//!   into their measured loops together
//! - [`scenario`]: the declarative trial descriptor and its
//!   construction-time validation
//! - [`engine`]: [`run_trial`]: reset, spawn, rendezvous, race, join,
//!   classify
//! - [`outcome`]: the per-trial [`Aggregate`] of violation and
//!   category counts
//!
//! Concrete racing experiments live in the companion catalog crate;
//! here a scenario is only data.
//!
//! ## Usage
//!
//! ```rust
//! use litmus_core::{run_trial, Aggregate, Scenario};
//!
//! struct Empty;
//!
//! fn reset(_iterations: u32) -> Empty {
//!     Empty
//! }
//!
//! fn body(_state: &Empty, iteration: u32, observation: &mut u32) {
//!     *observation = iteration;
//! }
//!
//! fn classify(_state: &Empty, lanes: &[Vec<u32>]) -> Aggregate {
//!     let mut agg = Aggregate::new();
//!     for lane in lanes {
//!         for (i, &seen) in lane.iter().enumerate() {
//!             if seen != i as u32 {
//!                 agg.record_violation();
//!             }
//!         }
//!     }
//!     agg
//! }
//!
//! let scenario = Scenario::new("smoke", 100, reset, vec![body, body], classify).unwrap();
//! let agg = run_trial(&scenario);
//! assert!(agg.is_clean());
//! ```
//!
//! ## Loom
//!
//! The cell contracts are model-checked under loom:
//!
//! ```bash
//! RUSTFLAGS="--cfg loom" cargo test -p litmus-core --release
//! ```

pub mod barrier;
pub mod cell;
pub mod engine;
pub mod outcome;
pub mod scenario;

pub use barrier::{RendezvousTimeout, SpinBudget, StartDiscipline, StartFlags, ACTORS_MAX};
pub use cell::{GuardedCell, PlainCell, RaceWord, ScCell, SyncCell};
pub use engine::run_trial;
pub use outcome::{Aggregate, TrialOutcome};
pub use scenario::{ActorFn, ClassifyFn, ResetFn, Scenario, ScenarioError};
