//! # litmus-scenarios
//!
//! The scenario catalog: concrete racing experiments expressed as data
//! for the `litmus-core` engine. Each module declares one family -
//! shared-state layout, per-actor bodies, and the classifier that
//! separates forbidden outcomes from merely rare ones - and exports a
//! constructor returning a ready-made descriptor.
//!
//! ## Families
//!
//! - [`coherence`]: reads of one monotonically-written variable must not
//!   run backward for a single observer
//! - [`happens_before`]: a visible release-store must drag its plain
//!   payload along (message passing), and release/acquire edges forbid
//!   load-buffering cycles
//! - [`causality`]: value and control cycles that would require
//!   information to flow backward (chain, cycle, relay, gate)
//! - [`wide_word`]: 64-bit tearing - expected under the plain
//!   discipline, forbidden under acquire-release
//! - [`final_publication`]: a fixed-at-construction field read through a
//!   plainly-published reference
//! - [`mutex_counter`]: guarded composite increments never lose updates
//! - [`store_buffering`]: both racing readers stale is forbidden under
//!   the total-order discipline; interleaving shape is tallied
//! - [`read_after_write`]: index arithmetic over two racing
//!   writer/reader lanes must respect the total order
//!
//! Forbidden versus rare-but-legal is encoded per family, never
//! inferred: e.g. message passing counts a stale payload only when the
//! flag read is non-default, and plain-discipline tearing is a category,
//! not a violation.
//!
//! ## Usage
//!
//! ```rust
//! use litmus_core::run_trial;
//! use litmus_scenarios::mutex_counter::mutex_counter;
//!
//! let scenario = mutex_counter().with_iterations(1_000);
//! let agg = run_trial(&scenario);
//! assert!(agg.is_clean(), "{}", agg.format());
//! ```

pub mod causality;
pub mod coherence;
pub mod final_publication;
pub mod happens_before;
pub mod mutex_counter;
pub mod read_after_write;
pub mod store_buffering;
pub mod wide_word;

pub use causality::{causality_chain, causality_cycle, causality_gate, causality_relay};
pub use coherence::coherence;
pub use final_publication::final_publication;
pub use happens_before::{load_buffering, message_passing};
pub use mutex_counter::mutex_counter;
pub use read_after_write::read_after_write;
pub use store_buffering::store_buffering;
pub use wide_word::{wide_word_plain, wide_word_sync};
