//! Per-trial outcome aggregation.
//!
//! A trial produces exactly one [`Aggregate`]: the number of iterations
//! whose recorded observations matched a forbidden pattern, plus named
//! tallies for permitted-but-interesting shapes (interleaving statistics,
//! torn reads under the plain discipline, and so on). Violations are
//! counted, never thrown; the trial always runs to completion and the
//! external driver decides what to do with nonzero counts.

use std::collections::BTreeMap;

use serde::Serialize;

/// How the trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrialOutcome {
    /// All actors joined and classification ran.
    Completed,
    /// The rendezvous barrier hit its bounded spin budget; no
    /// classification was performed.
    BarrierTimeout,
}

/// Aggregated result of one trial.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub outcome: TrialOutcome,
    /// Iterations whose observations a correct implementation of the
    /// declared disciplines must never allow.
    pub violations: u64,
    /// Descriptive tallies for permitted outcome shapes.
    pub categories: BTreeMap<&'static str, u64>,
}

impl Aggregate {
    #[must_use]
    pub fn new() -> Self {
        Self {
            outcome: TrialOutcome::Completed,
            violations: 0,
            categories: BTreeMap::new(),
        }
    }

    /// Aggregate for a trial whose barrier never completed.
    #[must_use]
    pub fn barrier_timeout() -> Self {
        Self {
            outcome: TrialOutcome::BarrierTimeout,
            violations: 0,
            categories: BTreeMap::new(),
        }
    }

    /// Count one forbidden-outcome iteration.
    pub fn record_violation(&mut self) {
        self.violations += 1;
    }

    /// Count one iteration under a permitted category.
    pub fn bump(&mut self, category: &'static str) {
        *self.categories.entry(category).or_insert(0) += 1;
    }

    /// Tally for a category, zero if it never occurred.
    #[must_use]
    pub fn category(&self, name: &str) -> u64 {
        self.categories.get(name).copied().unwrap_or(0)
    }

    /// A completed trial with no forbidden outcomes.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.outcome == TrialOutcome::Completed && self.violations == 0
    }

    /// One-line summary for drivers and logs.
    #[must_use]
    pub fn format(&self) -> String {
        let status = match self.outcome {
            TrialOutcome::BarrierTimeout => "TIMEOUT",
            TrialOutcome::Completed if self.violations == 0 => "CLEAN",
            TrialOutcome::Completed => "VIOLATIONS",
        };

        let mut line = format!("[{}] violations={}", status, self.violations);
        for (category, count) in &self.categories {
            line.push_str(&format!(" {}={}", category, count));
        }
        line
    }
}

impl Default for Aggregate {
    fn default() -> Self {
        Self::new()
    }
}
