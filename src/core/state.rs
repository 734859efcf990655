//! Match state: per-seat zones, resources, and round progression.
//!
//! ## SeatState
//!
//! Everything one seat owns during a match:
//! - Deck (remaining, top at the front), hand, discard
//! - Board zone (government row, public row, pending-instant area)
//! - Trap zone (face-down interventions, persists across rounds)
//! - Action points, round wins, and the per-round `passed` flag
//!
//! ## MatchState
//!
//! Both seats plus round number, active seat and action history.
//!
//! All zones are `im::Vector`, so cloning a whole `MatchState` for a
//! rollout trial is O(1) and the clone shares structure with the live match
//! until one side writes.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::{Action, ActionRecord};
use super::config::MatchConfig;
use super::seat::{Seat, SeatMap};
use crate::cards::{CardCategory, CardInstance};
use crate::error::SimError;

/// Hand indices of legal plays.
pub type LegalPlays = SmallVec<[usize; 8]>;

/// Cards played during the current round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardZone {
    /// Government-kind cards; the only source of round power.
    pub government: Vector<CardInstance>,
    /// Permanent initiatives.
    pub public: Vector<CardInstance>,
    /// Instant initiatives waiting to resolve.
    pub pending: Vector<CardInstance>,
}

impl BoardZone {
    /// Total number of cards across the three areas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.government.len() + self.public.len() + self.pending.len()
    }

    /// Check if all three areas are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of base power in the government row.
    #[must_use]
    pub fn government_power(&self) -> u32 {
        self.government.iter().map(|c| c.power).sum()
    }

    /// Iterate over every card on the board.
    pub fn iter(&self) -> impl Iterator<Item = &CardInstance> {
        self.government
            .iter()
            .chain(self.public.iter())
            .chain(self.pending.iter())
    }
}

/// One seat's cards and resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    /// Remaining deck; the next draw comes from the front.
    pub deck: Vector<CardInstance>,
    /// Cards held, in draw order.
    pub hand: Vector<CardInstance>,
    /// Cards played this round.
    pub board: BoardZone,
    /// Face-down interventions.
    pub traps: Vector<CardInstance>,
    /// Cards cleared from the board at earlier round starts.
    pub discard: Vector<CardInstance>,
    /// Action points left this turn.
    pub action_points: u32,
    /// Rounds won so far.
    pub round_wins: u32,
    /// Whether this seat passed in the current round.
    pub passed: bool,
    built_size: usize,
}

impl SeatState {
    /// Create a seat from a deck in draw order.
    #[must_use]
    pub fn new(deck: impl IntoIterator<Item = CardInstance>) -> Self {
        let deck: Vector<CardInstance> = deck.into_iter().collect();
        Self {
            built_size: deck.len(),
            deck,
            hand: Vector::new(),
            board: BoardZone::default(),
            traps: Vector::new(),
            discard: Vector::new(),
            action_points: 0,
            round_wins: 0,
            passed: false,
        }
    }

    /// Size of the deck this seat started the match with.
    #[must_use]
    pub fn built_size(&self) -> usize {
        self.built_size
    }

    /// Number of cards across all of this seat's zones.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len() + self.hand.len() + self.board.len() + self.traps.len() + self.discard.len()
    }

    /// Check that no card was created or lost.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.card_count() == self.built_size
    }

    /// Government row power.
    #[must_use]
    pub fn government_power(&self) -> u32 {
        self.board.government_power()
    }

    /// Draw from the deck until the hand holds `max` cards or the deck runs out.
    ///
    /// Returns the number of cards drawn.
    pub fn refill_hand(&mut self, max: usize) -> usize {
        let mut drawn = 0;
        while self.hand.len() < max {
            match self.deck.pop_front() {
                Some(card) => {
                    self.hand.push_back(card);
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }

    /// Move every board card to the discard pile. Traps stay.
    pub fn clear_board(&mut self) {
        let board = std::mem::take(&mut self.board);
        self.discard.append(board.government);
        self.discard.append(board.public);
        self.discard.append(board.pending);
    }

    fn place(&mut self, card: CardInstance) {
        match card.category {
            CardCategory::Government => self.board.government.push_back(card),
            CardCategory::PermanentInitiative => self.board.public.push_back(card),
            CardCategory::InstantInitiative => self.board.pending.push_back(card),
            CardCategory::Intervention => self.traps.push_back(card),
        }
    }
}

/// Complete state of one match.
///
/// ## Example
///
/// ```
/// use ccg_balance::cards::{CardCategory, CardId, CardInstance};
/// use ccg_balance::core::{Action, MatchConfig, MatchState, Seat};
///
/// let deck: Vec<_> = (0..6)
///     .map(|i| CardInstance::new(i, CardId::new(1), CardCategory::Government, 1, 3))
///     .collect();
///
/// let mut state = MatchState::new(MatchConfig::default(), deck.clone(), deck);
/// state.start_round();
/// state.start_turn(Seat::First);
///
/// state.apply(Seat::First, Action::Play(0)).unwrap();
/// assert_eq!(state.government_power(Seat::First), 3);
/// assert_eq!(state.seat(Seat::First).action_points, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    /// Rules for this match.
    pub config: MatchConfig,

    /// Per-seat zones and resources.
    pub seats: SeatMap<SeatState>,

    /// Current round (starts at 1 once the first round begins).
    pub round: u32,

    /// Seat currently taking a turn.
    pub active: Seat,

    /// Turns taken in the current round, both seats combined.
    pub turns_this_round: u32,

    /// Action sequence within the round.
    pub sequence: u32,

    /// Every accepted action.
    pub history: Vector<ActionRecord>,
}

impl MatchState {
    /// Create a state with both decks in draw order. No round has started.
    #[must_use]
    pub fn new(
        config: MatchConfig,
        first_deck: impl IntoIterator<Item = CardInstance>,
        second_deck: impl IntoIterator<Item = CardInstance>,
    ) -> Self {
        Self {
            config,
            seats: SeatMap::from_pair(SeatState::new(first_deck), SeatState::new(second_deck)),
            round: 0,
            active: config.first_seat,
            turns_this_round: 0,
            sequence: 0,
            history: Vector::new(),
        }
    }

    /// Get a seat's state.
    #[must_use]
    pub fn seat(&self, seat: Seat) -> &SeatState {
        &self.seats[seat]
    }

    /// Get a seat's state mutably.
    pub fn seat_mut(&mut self, seat: Seat) -> &mut SeatState {
        &mut self.seats[seat]
    }

    /// Government row power for a seat.
    #[must_use]
    pub fn government_power(&self, seat: Seat) -> u32 {
        self.seats[seat].government_power()
    }

    /// Government power of `seat` minus its opponent's.
    #[must_use]
    pub fn power_differential(&self, seat: Seat) -> i64 {
        i64::from(self.government_power(seat)) - i64::from(self.government_power(seat.other()))
    }

    /// Begin the next round: clear boards, reset pass flags, refill hands.
    ///
    /// The opener for the new round becomes the active seat.
    pub fn start_round(&mut self) {
        self.round += 1;
        self.turns_this_round = 0;
        self.sequence = 0;
        let hand_size = self.config.hand_size;
        for (_, seat) in self.seats.iter_mut() {
            seat.clear_board();
            seat.passed = false;
            seat.action_points = 0;
            seat.refill_hand(hand_size);
        }
        self.active = self.config.opener_for_round(self.round);
    }

    /// Begin a turn for `seat`: make it active and grant its action points.
    pub fn start_turn(&mut self, seat: Seat) {
        self.active = seat;
        self.seats[seat].action_points = self.config.turn_action_points;
    }

    /// Action point cost of playing the card at `hand_index`.
    #[must_use]
    pub fn play_cost(&self, seat: Seat, hand_index: usize) -> Option<u32> {
        self.seats[seat]
            .hand
            .get(hand_index)
            .map(|card| self.config.play_cost.of(card))
    }

    /// Check if playing `hand_index` is affordable for `seat` right now.
    #[must_use]
    pub fn can_play(&self, seat: Seat, hand_index: usize) -> bool {
        let state = &self.seats[seat];
        !state.passed
            && self
                .play_cost(seat, hand_index)
                .is_some_and(|cost| cost <= state.action_points)
    }

    /// Hand indices `seat` can afford, in hand order.
    #[must_use]
    pub fn legal_plays(&self, seat: Seat) -> LegalPlays {
        (0..self.seats[seat].hand.len())
            .filter(|&i| self.can_play(seat, i))
            .collect()
    }

    /// Check if `seat` holds at least one affordable card.
    #[must_use]
    pub fn has_legal_play(&self, seat: Seat) -> bool {
        (0..self.seats[seat].hand.len()).any(|i| self.can_play(seat, i))
    }

    /// Validate an action without applying it. Returns the action point cost.
    pub fn check(&self, seat: Seat, action: Action) -> Result<u32, SimError> {
        let state = &self.seats[seat];
        if state.passed {
            return Err(SimError::illegal(seat, action, "seat already passed this round"));
        }
        match action {
            Action::Pass => Ok(0),
            Action::Play(index) => {
                let cost = self.play_cost(seat, index).ok_or_else(|| {
                    SimError::illegal(
                        seat,
                        action,
                        format!(
                            "hand index {} out of range (hand size {})",
                            index,
                            state.hand.len()
                        ),
                    )
                })?;
                if cost > state.action_points {
                    return Err(SimError::illegal(
                        seat,
                        action,
                        format!("cost {} exceeds {} action points", cost, state.action_points),
                    ));
                }
                Ok(cost)
            }
        }
    }

    /// Apply an action for `seat`.
    ///
    /// On error the state is left untouched.
    pub fn apply(&mut self, seat: Seat, action: Action) -> Result<(), SimError> {
        let cost = self.check(seat, action)?;
        match action {
            Action::Pass => {
                self.seats[seat].passed = true;
            }
            Action::Play(index) => {
                let state = &mut self.seats[seat];
                let card = state.hand.remove(index);
                state.action_points -= cost;
                state.place(card);
            }
        }
        self.history.push_back(ActionRecord::new(
            seat,
            action,
            self.round,
            self.sequence,
            cost,
        ));
        self.sequence += 1;
        Ok(())
    }

    /// Both seats have passed.
    #[must_use]
    pub fn both_passed(&self) -> bool {
        self.seats.iter().all(|(_, s)| s.passed)
    }

    /// Card conservation holds for both seats.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.seats.iter().all(|(_, s)| s.is_conserved())
    }
}
