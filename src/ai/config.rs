//! Move evaluator configuration: difficulty tiers and heuristic weights.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Named difficulty tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Always the top heuristic candidate.
    #[default]
    Easy,
    /// Heuristic scores perturbed by symmetric noise.
    Medium,
    /// Heuristic plus rollout refinement of the top candidates.
    Hard,
}

impl Difficulty {
    /// All tiers, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(SimError::InvalidInput(format!(
                "unknown difficulty '{}' (expected easy, medium or hard)",
                other
            ))),
        }
    }
}

/// Weights for heuristic move scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    /// Multiplier on a government card's base power.
    pub power: f64,

    /// Row pressure bonus when the own government row is empty.
    pub row_pressure: f64,

    /// Row size at which the pressure bonus reaches zero.
    pub row_target: usize,

    /// Opponent government power lead needed to trigger catch-up play.
    pub catch_up_margin: u32,

    /// Catch-up bonus per point of base power.
    pub catch_up: f64,

    /// Base score of an intervention.
    pub intervention: f64,

    /// Base score of a permanent initiative.
    pub permanent_initiative: f64,

    /// Base score of an instant initiative.
    pub instant_initiative: f64,

    /// Extra score for an intervention that counters the opponent's board.
    pub counter: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            power: 2.0,
            row_pressure: 3.0,
            row_target: 5,
            catch_up_margin: 3,
            catch_up: 1.0,
            intervention: 6.0,
            permanent_initiative: 4.0,
            instant_initiative: 2.0,
            counter: 5.0,
        }
    }
}

impl HeuristicWeights {
    /// Bounded bonus for adding to a row that already holds `filled` cards.
    #[must_use]
    pub fn row_pressure_bonus(&self, filled: usize) -> f64 {
        if self.row_target == 0 {
            return 0.0;
        }
        let remaining = self.row_target.saturating_sub(filled) as f64;
        self.row_pressure * remaining / self.row_target as f64
    }
}

/// Full evaluator configuration for one seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Tier this configuration was derived from.
    pub tier: Difficulty,

    /// Noise magnitude added to each score (0 disables).
    pub noise: f64,

    /// Fixed bonus added to every score.
    pub bonus: f64,

    /// Candidates refined by rollouts (0 disables refinement).
    pub rollout_candidates: usize,

    /// Independent rollout trials per candidate.
    pub rollout_trials: u32,

    /// Random plies played after the candidate in each trial.
    pub rollout_depth: u32,

    /// Multiplier on the averaged rollout differential.
    pub rollout_weight: f64,

    /// Heuristic weights.
    pub weights: HeuristicWeights,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::for_tier(Difficulty::Easy)
    }
}

impl DifficultyConfig {
    /// Defaults for a tier.
    #[must_use]
    pub fn for_tier(tier: Difficulty) -> Self {
        let base = Self {
            tier,
            noise: 0.0,
            bonus: 0.0,
            rollout_candidates: 0,
            rollout_trials: 0,
            rollout_depth: 0,
            rollout_weight: 0.0,
            weights: HeuristicWeights::default(),
        };
        match tier {
            Difficulty::Easy => base,
            Difficulty::Medium => Self { noise: 1.5, ..base },
            Difficulty::Hard => Self {
                bonus: 1.0,
                rollout_candidates: 4,
                rollout_trials: 8,
                rollout_depth: 2,
                rollout_weight: 1.0,
                ..base
            },
        }
    }

    /// Set the rollout depth.
    #[must_use]
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Set the heuristic weights.
    #[must_use]
    pub fn with_weights(mut self, weights: HeuristicWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Check if rollout refinement is active.
    #[must_use]
    pub fn refines(&self) -> bool {
        self.rollout_candidates > 0 && self.rollout_trials > 0
    }
}

impl From<Difficulty> for DifficultyConfig {
    fn from(tier: Difficulty) -> Self {
        Self::for_tier(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_defaults() {
        let easy = DifficultyConfig::for_tier(Difficulty::Easy);
        assert_eq!(easy.noise, 0.0);
        assert!(!easy.refines());

        let medium = DifficultyConfig::for_tier(Difficulty::Medium);
        assert!(medium.noise > 0.0);
        assert!(!medium.refines());

        let hard = DifficultyConfig::for_tier(Difficulty::Hard);
        assert!(hard.bonus > 0.0);
        assert_eq!(hard.rollout_candidates, 4);
        assert_eq!(hard.rollout_trials, 8);
        assert_eq!(hard.rollout_depth, 2);
        assert!(hard.refines());
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("brutal".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Easy.to_string(), "easy");
    }

    #[test]
    fn test_row_pressure_decreases() {
        let weights = HeuristicWeights::default();
        let empty = weights.row_pressure_bonus(0);
        let some = weights.row_pressure_bonus(2);
        let full = weights.row_pressure_bonus(5);
        let over = weights.row_pressure_bonus(9);

        assert_eq!(empty, weights.row_pressure);
        assert!(some < empty && some > 0.0);
        assert_eq!(full, 0.0);
        assert_eq!(over, 0.0);
    }

    #[test]
    fn test_serialization() {
        let config = DifficultyConfig::for_tier(Difficulty::Hard);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: DifficultyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
