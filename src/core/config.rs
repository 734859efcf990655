//! Match configuration.
//!
//! `MatchConfig` fixes the resource and progression rules for one match:
//! hand size, the per-turn action point allotment, how much a play costs,
//! and how many round wins end the match.

use serde::{Deserialize, Serialize};

use super::seat::Seat;
use crate::cards::CardInstance;

/// How much a play debits from the acting seat's action points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayCost {
    /// Every play costs the same fixed amount.
    Flat(u32),
    /// Each play costs the card's `base_cost`.
    CardCost,
}

impl PlayCost {
    /// Cost of playing the given card.
    #[must_use]
    pub fn of(self, card: &CardInstance) -> u32 {
        match self {
            PlayCost::Flat(cost) => cost,
            PlayCost::CardCost => card.cost,
        }
    }
}

/// Rules for a single match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Maximum hand size; hands are refilled up to this at each round start.
    pub hand_size: usize,

    /// Action points granted at the start of each turn.
    pub turn_action_points: u32,

    /// Cost model for plays.
    pub play_cost: PlayCost,

    /// Round wins needed to take the match.
    pub rounds_to_win: u32,

    /// Turns (both seats combined) after which a round is resolved even if
    /// a seat has not passed.
    pub max_turns_per_round: u32,

    /// Seat that opens the first round. Later rounds alternate.
    pub first_seat: Seat,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            hand_size: 5,
            turn_action_points: 2,
            play_cost: PlayCost::Flat(1),
            rounds_to_win: 2,
            max_turns_per_round: 12,
            first_seat: Seat::First,
        }
    }
}

impl MatchConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum hand size.
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    /// Set the per-turn action point allotment.
    #[must_use]
    pub fn with_turn_action_points(mut self, points: u32) -> Self {
        self.turn_action_points = points;
        self
    }

    /// Set the play cost model.
    #[must_use]
    pub fn with_play_cost(mut self, cost: PlayCost) -> Self {
        self.play_cost = cost;
        self
    }

    /// Set the round wins needed to win the match.
    #[must_use]
    pub fn with_rounds_to_win(mut self, rounds: u32) -> Self {
        assert!(rounds > 0, "Match needs at least one round win");
        self.rounds_to_win = rounds;
        self
    }

    /// Set the per-round turn cap.
    #[must_use]
    pub fn with_max_turns_per_round(mut self, turns: u32) -> Self {
        assert!(turns > 0, "Round needs at least one turn");
        self.max_turns_per_round = turns;
        self
    }

    /// Set the seat that opens the first round.
    #[must_use]
    pub fn with_first_seat(mut self, seat: Seat) -> Self {
        self.first_seat = seat;
        self
    }

    /// Seat that opens the given round (1-based).
    #[must_use]
    pub fn opener_for_round(&self, round: u32) -> Seat {
        if round % 2 == 1 {
            self.first_seat
        } else {
            self.first_seat.other()
        }
    }
}
