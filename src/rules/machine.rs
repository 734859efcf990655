//! Match state machine.
//!
//! ## Phases
//!
//! ```text
//! RoundStart -> TurnActive(seat) -> TurnActive(other) | RoundResolving
//! RoundResolving -> RoundStart | MatchOver
//! ```
//!
//! - `RoundStart`: boards go to discard, pass flags reset, hands refill,
//!   and the round's opener begins a turn.
//! - `TurnActive(seat)`: one action per step. The turn ends when the seat
//!   passes, runs out of action points, or has nothing affordable left. A
//!   seat that starts a turn with nothing affordable passes automatically.
//! - `RoundResolving`: the `RoundResolver` credits the round; the match
//!   ends when a seat reaches the win threshold.
//! - `MatchOver`: terminal.
//!
//! A round also resolves once `max_turns_per_round` turns have been taken,
//! with the pass flags as they stand.
//!
//! The machine owns the match's only `GameRng`. It is seeded once in
//! `MatchMachine::new`, shuffles both decks, and is then lent to agents.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::resolver::{RoundOutcome, RoundResolver};
use crate::ai::Agent;
use crate::core::{Action, GameRng, MatchConfig, MatchState, Seat, SeatMap};
use crate::deck::Deck;
use crate::error::SimError;

/// Where the match is in its progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// About to start a round.
    RoundStart,
    /// The seat is taking its turn.
    TurnActive(Seat),
    /// Both seats are done; the round is about to be decided.
    RoundResolving,
    /// A seat reached the win threshold.
    MatchOver,
}

/// Summary of a finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Seat that reached the win threshold.
    pub winner: Seat,
    /// Round wins per seat.
    pub round_wins: SeatMap<u32>,
    /// Rounds played.
    pub rounds_played: u32,
    /// Seed the match was played with.
    pub seed: u64,
    /// Accepted actions, both seats.
    pub actions: usize,
    /// Actions rejected and replaced by a forced pass.
    pub forced_passes: u32,
    /// Per-round outcomes.
    pub rounds: Vec<RoundOutcome>,
}

/// Drives one match from the first round to `MatchOver`.
///
/// ## Example
///
/// ```
/// use ccg_balance::ai::{Agent, UniformAgent};
/// use ccg_balance::cards::standard_catalog;
/// use ccg_balance::core::{MatchConfig, SeatMap};
/// use ccg_balance::deck::{standard_presets, DeckBuilder};
/// use ccg_balance::rules::MatchMachine;
///
/// let catalog = standard_catalog();
/// let decks = DeckBuilder::new(&catalog).build_all(&standard_presets()).unwrap();
///
/// let mut a = UniformAgent;
/// let mut b = UniformAgent;
/// let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);
///
/// let result = MatchMachine::new(MatchConfig::default(), &decks[0], &decks[1], 42)
///     .run(&mut agents)
///     .unwrap();
/// assert!(result.round_wins[result.winner] >= 2);
/// ```
#[derive(Clone, Debug)]
pub struct MatchMachine {
    state: MatchState,
    phase: MatchPhase,
    rng: GameRng,
    resolver: RoundResolver,
    rounds: Vec<RoundOutcome>,
    forced_passes: u32,
}

impl MatchMachine {
    /// Set up a match: seed the RNG, shuffle both decks, deal nothing yet.
    #[must_use]
    pub fn new(config: MatchConfig, first: &Deck, second: &Deck, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let first_cards = first.shuffled(&mut rng);
        let second_cards = second.shuffled(&mut rng);
        Self::from_state(MatchState::new(config, first_cards, second_cards), rng)
    }

    /// Start from a prepared state (decks already in draw order).
    #[must_use]
    pub fn from_state(state: MatchState, rng: GameRng) -> Self {
        Self {
            state,
            phase: MatchPhase::RoundStart,
            rng,
            resolver: RoundResolver::new(),
            rounds: Vec::new(),
            forced_passes: 0,
        }
    }

    /// Current match state.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Seed of the match RNG.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Check if the match has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::MatchOver
    }

    /// Apply an action for the active seat.
    ///
    /// Only valid in `TurnActive`. An illegal action is rejected and leaves
    /// both the state and the phase unchanged. A legal action may end the
    /// turn and move the phase on.
    pub fn apply(&mut self, action: Action) -> Result<(), SimError> {
        let MatchPhase::TurnActive(seat) = self.phase else {
            return Err(SimError::illegal(
                self.state.active,
                action,
                format!("no turn in progress ({:?})", self.phase),
            ));
        };

        self.state.apply(seat, action)?;
        trace!(
            seed = self.rng.seed(),
            round = self.state.round,
            %seat,
            ?action,
            action_points = self.state.seat(seat).action_points,
            "action applied"
        );

        let turn_over = action.is_pass()
            || self.state.seat(seat).action_points == 0
            || !self.state.has_legal_play(seat);
        if turn_over {
            self.end_turn(seat);
        }
        Ok(())
    }

    /// Advance by one step: a phase transition, or one action in a turn.
    pub fn step(
        &mut self,
        agents: &mut SeatMap<&mut (dyn Agent + '_)>,
    ) -> Result<MatchPhase, SimError> {
        match self.phase {
            MatchPhase::RoundStart => self.start_round(),
            MatchPhase::TurnActive(seat) => self.take_action(seat, agents)?,
            MatchPhase::RoundResolving => self.resolve_round(),
            MatchPhase::MatchOver => {}
        }
        Ok(self.phase)
    }

    /// Play the match to completion.
    pub fn run(
        mut self,
        agents: &mut SeatMap<&mut (dyn Agent + '_)>,
    ) -> Result<MatchResult, SimError> {
        while !self.is_over() {
            self.step(agents)?;
        }
        self.finish()
    }

    /// Result of a finished match.
    pub fn finish(self) -> Result<MatchResult, SimError> {
        let winner = self
            .resolver
            .match_winner(&self.state)
            .filter(|_| self.is_over())
            .ok_or_else(|| {
                SimError::InvalidInput(format!("match not finished ({:?})", self.phase))
            })?;

        Ok(MatchResult {
            winner,
            round_wins: SeatMap::new(|seat| self.state.seat(seat).round_wins),
            rounds_played: self.state.round,
            seed: self.rng.seed(),
            actions: self.state.history.len(),
            forced_passes: self.forced_passes,
            rounds: self.rounds,
        })
    }

    fn start_round(&mut self) {
        self.state.start_round();
        let opener = self.state.active;
        debug!(
            seed = self.rng.seed(),
            round = self.state.round,
            opener = %opener,
            first_hand = self.state.seat(Seat::First).hand.len(),
            second_hand = self.state.seat(Seat::Second).hand.len(),
            "round start"
        );
        self.begin_turn(opener);
    }

    fn begin_turn(&mut self, seat: Seat) {
        self.state.start_turn(seat);
        self.phase = MatchPhase::TurnActive(seat);
    }

    fn take_action(
        &mut self,
        seat: Seat,
        agents: &mut SeatMap<&mut (dyn Agent + '_)>,
    ) -> Result<(), SimError> {
        if !self.state.has_legal_play(seat) {
            // nothing affordable: the seat must pass
            return self.apply(Action::Pass);
        }

        let action = agents[seat].choose(&self.state, seat, &mut self.rng)?;
        if let Err(err) = self.apply(action) {
            warn!(
                seed = self.rng.seed(),
                round = self.state.round,
                %seat,
                error = %err,
                "illegal action rejected, forcing pass"
            );
            self.forced_passes += 1;
            self.apply(Action::Pass)?;
        }
        Ok(())
    }

    fn end_turn(&mut self, seat: Seat) {
        self.state.turns_this_round += 1;
        let limit = self.state.config.max_turns_per_round;
        if self.state.both_passed() || self.state.turns_this_round >= limit {
            self.phase = MatchPhase::RoundResolving;
            return;
        }

        let next = if self.state.seat(seat.other()).passed {
            seat
        } else {
            seat.other()
        };
        self.begin_turn(next);
    }

    fn resolve_round(&mut self) {
        let outcome = self.resolver.resolve(&mut self.state);
        self.rounds.push(outcome);

        self.phase = match self.resolver.match_winner(&self.state) {
            Some(winner) => {
                debug!(
                    seed = self.rng.seed(),
                    winner = %winner,
                    rounds = self.state.round,
                    "match over"
                );
                MatchPhase::MatchOver
            }
            None => MatchPhase::RoundStart,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::UniformAgent;
    use crate::cards::{CardCategory, CardId, CardInstance};

    fn gov_deck(name: &str, n: u32, power: u32) -> Deck {
        Deck {
            name: name.to_string(),
            cards: (0..n)
                .map(|i| CardInstance::new(i, CardId::new(1), CardCategory::Government, 1, power))
                .collect(),
        }
    }

    /// Always plays hand index 0 while it can.
    struct FirstCard;

    impl Agent for FirstCard {
        fn choose(
            &mut self,
            state: &MatchState,
            seat: Seat,
            _rng: &mut GameRng,
        ) -> Result<Action, SimError> {
            Ok(if state.has_legal_play(seat) { Action::Play(0) } else { Action::Pass })
        }
    }

    /// Proposes a hand index that never exists.
    struct OutOfRange;

    impl Agent for OutOfRange {
        fn choose(
            &mut self,
            _state: &MatchState,
            _seat: Seat,
            _rng: &mut GameRng,
        ) -> Result<Action, SimError> {
            Ok(Action::Play(usize::MAX))
        }
    }

    /// Passes immediately.
    struct Passer;

    impl Agent for Passer {
        fn choose(
            &mut self,
            _state: &MatchState,
            _seat: Seat,
            _rng: &mut GameRng,
        ) -> Result<Action, SimError> {
            Ok(Action::Pass)
        }
    }

    struct Failing;

    impl Agent for Failing {
        fn choose(
            &mut self,
            _state: &MatchState,
            _seat: Seat,
            _rng: &mut GameRng,
        ) -> Result<Action, SimError> {
            Err(SimError::InvalidInput("evaluation failed".to_string()))
        }
    }

    #[test]
    fn test_first_step_starts_round() {
        let deck = gov_deck("A", 10, 1);
        let mut machine = MatchMachine::new(MatchConfig::default(), &deck, &deck, 1);
        let (mut a, mut b) = (FirstCard, FirstCard);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);

        assert_eq!(machine.phase(), MatchPhase::RoundStart);
        let phase = machine.step(&mut agents).unwrap();

        assert_eq!(phase, MatchPhase::TurnActive(Seat::First));
        assert_eq!(machine.state().round, 1);
        assert_eq!(machine.state().seat(Seat::First).hand.len(), 5);
        assert_eq!(machine.state().seat(Seat::First).action_points, 2);
    }

    #[test]
    fn test_turn_passes_after_action_points_spent() {
        let deck = gov_deck("A", 10, 1);
        let mut machine = MatchMachine::new(MatchConfig::default(), &deck, &deck, 1);
        let (mut a, mut b) = (FirstCard, FirstCard);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);

        machine.step(&mut agents).unwrap();
        assert_eq!(machine.step(&mut agents).unwrap(), MatchPhase::TurnActive(Seat::First));
        assert_eq!(machine.step(&mut agents).unwrap(), MatchPhase::TurnActive(Seat::Second));
        assert!(!machine.state().seat(Seat::First).passed);
        assert_eq!(machine.state().seat(Seat::Second).action_points, 2);
    }

    #[test]
    fn test_stronger_deck_wins() {
        let strong = gov_deck("Strong", 10, 5);
        let weak = gov_deck("Weak", 10, 1);
        let (mut a, mut b) = (FirstCard, FirstCard);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);

        let result = MatchMachine::new(MatchConfig::default(), &strong, &weak, 3)
            .run(&mut agents)
            .unwrap();

        assert_eq!(result.winner, Seat::First);
        assert_eq!(result.round_wins, SeatMap::from_pair(2, 0));
        assert_eq!(result.rounds_played, 2);
        assert_eq!(result.rounds.len(), 2);
    }

    #[test]
    fn test_external_illegal_action_rejected() {
        let deck = gov_deck("A", 10, 1);
        let mut machine = MatchMachine::new(MatchConfig::default(), &deck, &deck, 1);
        let (mut a, mut b) = (FirstCard, FirstCard);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);
        machine.step(&mut agents).unwrap();

        let before = machine.state().clone();
        let err = machine.apply(Action::Play(17)).unwrap_err();

        assert!(matches!(err, SimError::IllegalAction { seat: Seat::First, .. }));
        assert_eq!(machine.state(), &before);
        assert_eq!(machine.phase(), MatchPhase::TurnActive(Seat::First));
    }

    #[test]
    fn test_apply_outside_turn_rejected() {
        let deck = gov_deck("A", 4, 1);
        let mut machine = MatchMachine::new(MatchConfig::default(), &deck, &deck, 1);
        assert!(machine.apply(Action::Pass).is_err());
        assert_eq!(machine.phase(), MatchPhase::RoundStart);
    }

    #[test]
    fn test_illegal_agent_forced_to_pass() {
        let deck = gov_deck("A", 10, 1);
        let (mut a, mut b) = (OutOfRange, FirstCard);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);

        let result = MatchMachine::new(MatchConfig::default(), &deck, &deck, 9)
            .run(&mut agents)
            .unwrap();

        assert_eq!(result.winner, Seat::Second);
        assert!(result.forced_passes >= 2);
    }

    #[test]
    fn test_agent_error_aborts_match() {
        let deck = gov_deck("A", 10, 1);
        let (mut a, mut b) = (Failing, FirstCard);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);

        let result = MatchMachine::new(MatchConfig::default(), &deck, &deck, 9).run(&mut agents);
        assert!(result.is_err());
    }

    #[test]
    fn test_passing_tie_goes_to_second_seat() {
        let deck = gov_deck("A", 10, 1);
        let (mut a, mut b) = (Passer, Passer);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);

        let result = MatchMachine::new(MatchConfig::default(), &deck, &deck, 2)
            .run(&mut agents)
            .unwrap();

        assert_eq!(result.winner, Seat::Second);
        assert_eq!(result.rounds_played, 2);
    }

    #[test]
    fn test_empty_decks_terminate() {
        let empty = Deck {
            name: "Empty".to_string(),
            cards: Vec::new(),
        };
        let (mut a, mut b) = (UniformAgent, UniformAgent);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);

        let result = MatchMachine::new(MatchConfig::default(), &empty, &empty, 2)
            .run(&mut agents)
            .unwrap();
        assert_eq!(result.winner, Seat::Second);
    }

    #[test]
    fn test_turn_cap_resolves_round() {
        let deck = gov_deck("A", 30, 1);
        let config = MatchConfig::default().with_hand_size(10).with_max_turns_per_round(2);
        let (mut a, mut b) = (FirstCard, FirstCard);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);

        let mut machine = MatchMachine::new(config, &deck, &deck, 4);
        while machine.phase() != MatchPhase::RoundResolving {
            machine.step(&mut agents).unwrap();
        }

        assert_eq!(machine.state().turns_this_round, 2);
        assert!(!machine.state().both_passed());
    }

    #[test]
    fn test_openers_alternate() {
        let deck = gov_deck("A", 10, 1);
        let (mut a, mut b) = (Passer, Passer);
        let mut agents: SeatMap<&mut dyn Agent> = SeatMap::from_pair(&mut a, &mut b);
        let mut machine = MatchMachine::new(MatchConfig::default(), &deck, &deck, 2);

        let mut openers = Vec::new();
        while !machine.is_over() {
            if machine.phase() == MatchPhase::RoundStart {
                if let MatchPhase::TurnActive(seat) = machine.step(&mut agents).unwrap() {
                    openers.push(seat);
                }
            } else {
                machine.step(&mut agents).unwrap();
            }
        }

        assert_eq!(openers, vec![Seat::First, Seat::Second]);
    }

    #[test]
    fn test_finish_before_over_is_error() {
        let deck = gov_deck("A", 4, 1);
        let machine = MatchMachine::new(MatchConfig::default(), &deck, &deck, 1);
        assert!(machine.finish().is_err());
    }
}
