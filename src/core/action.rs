//! Action representation.
//!
//! A seat either plays the card at a hand index or passes. Hand indices are
//! positions at the time the action is taken; they shift once a card leaves
//! the hand.

use serde::{Deserialize, Serialize};

use super::seat::Seat;

/// A seat's move.
///
/// ## Example
///
/// ```
/// use ccg_balance::core::Action;
///
/// let play = Action::Play(2);
/// assert_eq!(play.hand_index(), Some(2));
/// assert!(Action::Pass.is_pass());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play the card at this hand index.
    Play(usize),
    /// End participation in the current round.
    Pass,
}

impl Action {
    /// Hand index of a play, `None` for a pass.
    #[must_use]
    pub fn hand_index(self) -> Option<usize> {
        match self {
            Action::Play(index) => Some(index),
            Action::Pass => None,
        }
    }

    /// Check if this is a pass.
    #[must_use]
    pub fn is_pass(self) -> bool {
        matches!(self, Action::Pass)
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that acted.
    pub seat: Seat,

    /// The action taken.
    pub action: Action,

    /// Round number when the action was taken.
    pub round: u32,

    /// Sequence number within the round (for ordering).
    pub sequence: u32,

    /// Action point cost debited.
    pub cost: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(seat: Seat, action: Action, round: u32, sequence: u32, cost: u32) -> Self {
        Self {
            seat,
            action,
            round,
            sequence,
            cost,
        }
    }
}
