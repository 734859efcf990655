//! Decision statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Counters collected by a `MoveEvaluator` across its decisions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionStats {
    /// Decisions made.
    pub decisions: u32,

    /// Decisions that returned `Pass` for lack of an affordable card.
    pub passes: u32,

    /// Candidates scored across all decisions.
    pub candidates_scored: u32,

    /// Rollout trials run.
    pub rollouts: u32,

    /// Decisions where rollouts changed the heuristic's top choice.
    pub rollout_overrides: u32,
}

impl DecisionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Average number of candidates per decision.
    #[must_use]
    pub fn avg_candidates(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.candidates_scored as f64 / self.decisions as f64
        }
    }

    /// Fraction of refined decisions where rollouts picked a different card.
    #[must_use]
    pub fn override_rate(&self) -> f64 {
        let refined = self.decisions - self.passes;
        if self.rollouts == 0 || refined == 0 {
            0.0
        } else {
            self.rollout_overrides as f64 / refined as f64
        }
    }
}
