//! Uniform random agent.

use super::Agent;
use crate::core::{Action, GameRng, MatchState, Seat};
use crate::error::SimError;

/// Plays a uniformly random affordable card; passes only when none is left.
///
/// Used as the ply policy inside rollouts and as a baseline opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformAgent;

impl UniformAgent {
    /// Pick a play without going through the `Agent` interface.
    pub fn pick(state: &MatchState, seat: Seat, rng: &mut GameRng) -> Action {
        let plays = state.legal_plays(seat);
        rng.choose(&plays)
            .map_or(Action::Pass, |&index| Action::Play(index))
    }
}

impl Agent for UniformAgent {
    fn choose(
        &mut self,
        state: &MatchState,
        seat: Seat,
        rng: &mut GameRng,
    ) -> Result<Action, SimError> {
        Ok(Self::pick(state, seat, rng))
    }
}
