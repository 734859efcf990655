//! Round resolution.
//!
//! The seat with the strictly greater government-row power takes the
//! round. Ties fall back to the `passed` flags of the round just played:
//! when exactly one seat passed, the seat that kept acting wins; any other
//! tie goes to the second seat.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{MatchState, Seat, SeatMap};

/// How a round winner was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundDecision {
    /// Strictly greater government power.
    Power,
    /// Tie; the only seat that had not passed wins.
    KeptActing,
    /// Tie with both or neither seat passed; the second seat wins.
    DefaultSecond,
}

/// Result of resolving one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Round number.
    pub round: u32,
    /// Seat credited with the round.
    pub winner: Seat,
    /// End-of-round government power per seat.
    pub powers: SeatMap<u32>,
    /// How the winner was decided.
    pub decision: RoundDecision,
}

/// Decides rounds and detects match termination.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoundResolver;

impl RoundResolver {
    /// Create a resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decide the current round without touching the state.
    #[must_use]
    pub fn judge(&self, state: &MatchState) -> RoundOutcome {
        let powers = SeatMap::new(|seat| state.government_power(seat));
        let first = powers[Seat::First];
        let second = powers[Seat::Second];

        let (winner, decision) = if first > second {
            (Seat::First, RoundDecision::Power)
        } else if second > first {
            (Seat::Second, RoundDecision::Power)
        } else {
            let passed = SeatMap::new(|seat| state.seat(seat).passed);
            match (passed[Seat::First], passed[Seat::Second]) {
                (true, false) => (Seat::Second, RoundDecision::KeptActing),
                (false, true) => (Seat::First, RoundDecision::KeptActing),
                _ => (Seat::Second, RoundDecision::DefaultSecond),
            }
        };

        RoundOutcome {
            round: state.round,
            winner,
            powers,
            decision,
        }
    }

    /// Decide the current round and credit the winner.
    pub fn resolve(&self, state: &mut MatchState) -> RoundOutcome {
        let outcome = self.judge(state);
        state.seat_mut(outcome.winner).round_wins += 1;

        debug!(
            round = outcome.round,
            winner = %outcome.winner,
            first_power = outcome.powers[Seat::First],
            second_power = outcome.powers[Seat::Second],
            decision = ?outcome.decision,
            "round resolved"
        );
        outcome
    }

    /// The seat that has reached the win threshold, if any.
    #[must_use]
    pub fn match_winner(&self, state: &MatchState) -> Option<Seat> {
        Seat::all().find(|&seat| state.seat(seat).round_wins >= state.config.rounds_to_win)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCategory, CardId, CardInstance};
    use crate::core::{Action, MatchConfig};

    fn deck(powers: &[u32]) -> Vec<CardInstance> {
        powers
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                CardInstance::new(i as u32, CardId::new(1), CardCategory::Government, 1, p)
            })
            .collect()
    }

    /// Both seats play their first card, then the given seats pass.
    fn played(first: u32, second: u32, passes: &[Seat]) -> MatchState {
        let mut state = MatchState::new(MatchConfig::default(), deck(&[first]), deck(&[second]));
        state.start_round();
        for seat in Seat::all() {
            state.start_turn(seat);
            state.apply(seat, Action::Play(0)).unwrap();
        }
        for &seat in passes {
            state.apply(seat, Action::Pass).unwrap();
        }
        state
    }

    #[test]
    fn test_greater_power_wins() {
        let mut state = played(5, 3, &[]);
        let outcome = RoundResolver::new().resolve(&mut state);

        assert_eq!(outcome.winner, Seat::First);
        assert_eq!(outcome.decision, RoundDecision::Power);
        assert_eq!(outcome.powers, SeatMap::from_pair(5, 3));
        assert_eq!(state.seat(Seat::First).round_wins, 1);
        assert_eq!(state.seat(Seat::Second).round_wins, 0);
    }

    #[test]
    fn test_tie_seat_that_kept_acting_wins() {
        let state = played(4, 4, &[Seat::Second]);
        let outcome = RoundResolver::new().judge(&state);
        assert_eq!(outcome.winner, Seat::First);
        assert_eq!(outcome.decision, RoundDecision::KeptActing);

        let state = played(4, 4, &[Seat::First]);
        assert_eq!(RoundResolver::new().judge(&state).winner, Seat::Second);
    }

    #[test]
    fn test_tie_defaults_to_second_seat() {
        let both = played(4, 4, &[Seat::First, Seat::Second]);
        let neither = played(4, 4, &[]);

        for state in [both, neither] {
            let outcome = RoundResolver::new().judge(&state);
            assert_eq!(outcome.winner, Seat::Second);
            assert_eq!(outcome.decision, RoundDecision::DefaultSecond);
        }
    }

    #[test]
    fn test_judge_does_not_mutate() {
        let state = played(2, 1, &[]);
        let before = state.clone();
        let _ = RoundResolver::new().judge(&state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_match_winner_threshold() {
        let resolver = RoundResolver::new();
        let mut state = played(5, 3, &[]);

        resolver.resolve(&mut state);
        assert_eq!(resolver.match_winner(&state), None);

        resolver.resolve(&mut state);
        assert_eq!(resolver.match_winner(&state), Some(Seat::First));
    }
}
