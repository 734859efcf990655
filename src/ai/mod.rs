//! Move selection for automated seats.
//!
//! ## Key Types
//!
//! - `Agent`: Anything that picks an action for a seat
//! - `MoveEvaluator`: Heuristic scoring with difficulty tiers and rollouts
//! - `UniformAgent`: Uniformly random affordable plays
//! - `DifficultyConfig` / `HeuristicWeights`: Evaluator tuning
//! - `DecisionStats`: Diagnostics

pub mod config;
pub mod evaluator;
pub mod random;
pub mod stats;

pub use config::{Difficulty, DifficultyConfig, HeuristicWeights};
pub use evaluator::{Candidate, MoveEvaluator};
pub use random::UniformAgent;
pub use stats::DecisionStats;

use crate::core::{Action, GameRng, MatchState, Seat};
use crate::error::SimError;

/// Chooses actions for a seat.
///
/// Agents are expected to propose only affordable plays; the match machine
/// rejects anything else and forces a pass. An `Err` aborts the match.
pub trait Agent {
    /// Choose an action for `seat` in `state`.
    ///
    /// `rng` is the match's random stream; agents must not keep it.
    fn choose(
        &mut self,
        state: &MatchState,
        seat: Seat,
        rng: &mut GameRng,
    ) -> Result<Action, SimError>;

    /// Decision statistics, for agents that keep them.
    fn decision_stats(&self) -> Option<&DecisionStats> {
        None
    }
}
