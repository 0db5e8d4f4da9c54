//! Tearing of a 64-bit word under racing writers.
//!
//! Two actors race over one shared 64-bit word. Each actor reads the
//! word, records its high and low halves, then stores its own key - a
//! value whose halves are equal (56/56 for one actor, 98/98 for the
//! other), so any observation with unequal halves is a torn read.
//!
//! The discipline decides what a torn read means:
//!
//! - [`wide_word_plain`]: the word is plain (two independent halves);
//!   tearing is the expected outcome and is tallied as a category.
//! - [`wide_word_sync`]: the word is acquire-release (one atomic word);
//!   tearing is forbidden and counted as a violation.

use litmus_core::{Aggregate, PlainCell, Scenario, SyncCell};

const KEY_A: u64 = (56 << 32) | 56;
const KEY_B: u64 = (98 << 32) | 98;

/// The shared word, abstracted over its discipline.
pub trait Word64: Send + Sync + 'static {
    fn zeroed() -> Self;
    fn load(&self) -> u64;
    fn store(&self, value: u64);
}

impl Word64 for PlainCell<u64> {
    fn zeroed() -> Self {
        PlainCell::new(0)
    }

    fn load(&self) -> u64 {
        PlainCell::load(self)
    }

    fn store(&self, value: u64) {
        PlainCell::store(self, value);
    }
}

impl Word64 for SyncCell<u64> {
    fn zeroed() -> Self {
        SyncCell::new(0)
    }

    fn load(&self) -> u64 {
        SyncCell::load(self)
    }

    fn store(&self, value: u64) {
        SyncCell::store(self, value);
    }
}

pub struct WideWordState<C: Word64> {
    word: C,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WideWordObs {
    pub hi: u32,
    pub lo: u32,
}

fn reset<C: Word64>(_iterations: u32) -> WideWordState<C> {
    WideWordState { word: C::zeroed() }
}

fn probe<C: Word64, const KEY: u64>(
    state: &WideWordState<C>,
    _iteration: u32,
    obs: &mut WideWordObs,
) {
    let seen = state.word.load();
    obs.hi = (seen >> 32) as u32;
    obs.lo = seen as u32;
    state.word.store(KEY);
}

fn tally(lanes: &[Vec<WideWordObs>], torn_is_violation: bool) -> Aggregate {
    let mut agg = Aggregate::new();
    for lane in lanes {
        for obs in lane {
            if obs.hi == obs.lo {
                agg.bump("intact");
            } else if torn_is_violation {
                agg.record_violation();
            } else {
                agg.bump("torn");
            }
        }
    }
    agg
}

fn classify_plain(_state: &WideWordState<PlainCell<u64>>, lanes: &[Vec<WideWordObs>]) -> Aggregate {
    tally(lanes, false)
}

fn classify_sync(_state: &WideWordState<SyncCell<u64>>, lanes: &[Vec<WideWordObs>]) -> Aggregate {
    tally(lanes, true)
}

/// Plain 64-bit word: torn reads are permitted and tallied.
#[must_use]
pub fn wide_word_plain() -> Scenario<WideWordState<PlainCell<u64>>, WideWordObs> {
    Scenario::new(
        "wide_word_plain",
        30_000,
        reset::<PlainCell<u64>>,
        vec![
            probe::<PlainCell<u64>, KEY_A>,
            probe::<PlainCell<u64>, KEY_B>,
        ],
        classify_plain,
    )
    .expect("catalog scenario is well-formed")
}

/// Acquire-release 64-bit word: any torn read is a violation.
#[must_use]
pub fn wide_word_sync() -> Scenario<WideWordState<SyncCell<u64>>, WideWordObs> {
    Scenario::new(
        "wide_word_sync",
        30_000,
        reset::<SyncCell<u64>>,
        vec![probe::<SyncCell<u64>, KEY_A>, probe::<SyncCell<u64>, KEY_B>],
        classify_sync,
    )
    .expect("catalog scenario is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use litmus_core::run_trial;
    use proptest::prelude::*;

    #[test]
    fn ordered_word_never_tears() {
        let agg = run_trial(&wide_word_sync().with_iterations(10_000));
        assert!(agg.is_clean(), "{}", agg.format());
        assert_eq!(agg.category("intact"), 2 * 10_000);
    }

    #[test]
    fn plain_word_tearing_is_not_a_violation() {
        let agg = run_trial(&wide_word_plain().with_iterations(10_000));
        assert!(agg.is_clean(), "{}", agg.format());
        assert_eq!(agg.category("intact") + agg.category("torn"), 2 * 10_000);
    }

    proptest! {
        /// The two classifiers agree on which observations are torn; they
        /// differ only in whether torn counts as a violation.
        #[test]
        fn classifiers_agree_on_tearing(halves in proptest::collection::vec((0u32..100, 0u32..100), 0..128)) {
            let lane: Vec<WideWordObs> = halves
                .iter()
                .map(|&(hi, lo)| WideWordObs { hi, lo })
                .collect();
            let lanes = vec![lane];

            let lenient = tally(&lanes, false);
            let strict = tally(&lanes, true);

            prop_assert_eq!(lenient.violations, 0);
            prop_assert_eq!(strict.violations, lenient.category("torn"));
            prop_assert_eq!(strict.category("intact"), lenient.category("intact"));
        }
    }
}
