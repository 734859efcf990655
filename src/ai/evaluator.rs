//! Heuristic move evaluation with optional rollout refinement.
//!
//! ## Scoring
//!
//! Each affordable hand card gets a heuristic score:
//!
//! - Government cards: `power_weight * power`, plus a row pressure bonus
//!   that shrinks as the own government row fills, plus a catch-up bonus
//!   proportional to power when the opponent's government row leads by more
//!   than the configured margin.
//! - Special cards: a fixed score per category (intervention, then
//!   permanent initiative, then instant initiative). An intervention whose
//!   counter keywords match a card on the opponent's board earns an extra
//!   counter bonus.
//!
//! Candidates are ranked by score, highest first; equal scores keep hand
//! order.
//!
//! ## Difficulty
//!
//! - Easy: the top-ranked candidate.
//! - Medium: each score is perturbed by symmetric noise before ranking.
//! - Hard: every score gets a fixed bonus, then the top K candidates are
//!   replayed on cloned states. Each trial applies the candidate and plays a
//!   few random plies; the averaged government power differential is added
//!   to the candidate's score and the best combined score wins.
//!
//! The evaluator never mutates the live state. Rollouts draw from forks of
//! the match RNG.

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::config::DifficultyConfig;
use super::random::UniformAgent;
use super::stats::DecisionStats;
use super::Agent;
use crate::cards::{CardCatalog, CardCategory, CardInstance};
use crate::core::{Action, GameRng, MatchState, Seat};
use crate::error::SimError;

/// A scored play.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Hand index of the card.
    pub hand_index: usize,
    /// Score used for ranking.
    pub score: f64,
}

/// Heuristic move evaluator for one seat.
///
/// ## Example
///
/// ```
/// use ccg_balance::ai::{DifficultyConfig, Difficulty, MoveEvaluator};
/// use ccg_balance::cards::{standard_catalog, CardInstance};
/// use ccg_balance::core::{Action, GameRng, MatchConfig, MatchState, Seat};
///
/// let catalog = standard_catalog();
/// let pm = catalog.by_name("Prime Minister").unwrap();
/// let clerk = catalog.by_name("Junior Clerk").unwrap();
/// let deck = vec![CardInstance::from_definition(0, clerk), CardInstance::from_definition(1, pm)];
///
/// let mut state = MatchState::new(MatchConfig::default(), deck.clone(), deck);
/// state.start_round();
/// state.start_turn(Seat::First);
///
/// let mut evaluator = MoveEvaluator::new(&catalog, DifficultyConfig::for_tier(Difficulty::Easy));
/// let action = evaluator.evaluate(&state, Seat::First, &mut GameRng::new(1));
/// assert_eq!(action, Action::Play(1));
/// ```
#[derive(Clone, Debug)]
pub struct MoveEvaluator<'a> {
    catalog: &'a CardCatalog,
    config: DifficultyConfig,
    stats: DecisionStats,
}

impl<'a> MoveEvaluator<'a> {
    /// Create an evaluator.
    #[must_use]
    pub fn new(catalog: &'a CardCatalog, config: DifficultyConfig) -> Self {
        Self {
            catalog,
            config,
            stats: DecisionStats::new(),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Get the decision statistics.
    #[must_use]
    pub fn stats(&self) -> &DecisionStats {
        &self.stats
    }

    /// Heuristic score of the card at `hand_index`, without noise or bonus.
    ///
    /// Returns `None` if the index is out of range.
    #[must_use]
    pub fn heuristic_score(
        &self,
        state: &MatchState,
        seat: Seat,
        hand_index: usize,
    ) -> Option<f64> {
        let card = state.seat(seat).hand.get(hand_index)?;
        Some(self.score_card(state, seat, card))
    }

    fn score_card(&self, state: &MatchState, seat: Seat, card: &CardInstance) -> f64 {
        let w = &self.config.weights;
        match card.category {
            CardCategory::Government => {
                let power = f64::from(card.power);
                let own = state.seat(seat);
                let mut score = w.power * power + w.row_pressure_bonus(own.board.government.len());

                let own_power = own.government_power();
                let their_power = state.government_power(seat.other());
                if their_power > own_power.saturating_add(w.catch_up_margin) {
                    score += w.catch_up * power;
                }
                score
            }
            CardCategory::Intervention => {
                let mut score = w.intervention;
                if self.counters_opponent(state, seat, card) {
                    score += w.counter;
                }
                score
            }
            CardCategory::PermanentInitiative => w.permanent_initiative,
            CardCategory::InstantInitiative => w.instant_initiative,
        }
    }

    /// Whether an intervention's counter keywords match the opponent's board.
    fn counters_opponent(&self, state: &MatchState, seat: Seat, card: &CardInstance) -> bool {
        let Some(def) = self.catalog.get(card.card_id) else {
            return false;
        };
        if def.counters.is_empty() {
            return false;
        }
        state
            .seat(seat.other())
            .board
            .iter()
            .filter_map(|c| self.catalog.get(c.card_id))
            .any(|target| def.counters.iter().any(|k| target.mentions(k)))
    }

    /// Score and rank all affordable plays.
    ///
    /// Applies the tier's noise and bonus. The result is sorted by score,
    /// highest first; equal scores keep hand order.
    pub fn rank_candidates(
        &self,
        state: &MatchState,
        seat: Seat,
        rng: &mut GameRng,
    ) -> Vec<Candidate> {
        let hand = &state.seat(seat).hand;
        let mut candidates: Vec<Candidate> = state
            .legal_plays(seat)
            .into_iter()
            .filter_map(|hand_index| {
                let card = hand.get(hand_index)?;
                Some(Candidate {
                    hand_index,
                    score: self.score_card(state, seat, card),
                })
            })
            .collect();

        for candidate in &mut candidates {
            candidate.score += self.config.bonus + rng.noise(self.config.noise);
        }

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates
    }

    /// Choose an action for `seat`.
    ///
    /// Returns `Pass` only when no card is affordable.
    pub fn evaluate(&mut self, state: &MatchState, seat: Seat, rng: &mut GameRng) -> Action {
        self.stats.decisions += 1;
        let candidates = self.rank_candidates(state, seat, rng);
        self.stats.candidates_scored += candidates.len() as u32;

        let Some(top) = candidates.first().copied() else {
            self.stats.passes += 1;
            return Action::Pass;
        };

        let chosen = if self.config.refines() && candidates.len() > 1 {
            let refined = self.refine(state, seat, &candidates, rng);
            if refined.hand_index != top.hand_index {
                self.stats.rollout_overrides += 1;
            }
            refined
        } else {
            top
        };

        trace!(%seat, hand_index = chosen.hand_index, score = chosen.score, "move chosen");
        Action::Play(chosen.hand_index)
    }

    /// Re-score the top candidates with rollouts and return the best.
    fn refine(
        &mut self,
        state: &MatchState,
        seat: Seat,
        ranked: &[Candidate],
        rng: &mut GameRng,
    ) -> Candidate {
        let k = self.config.rollout_candidates.min(ranked.len());
        let trials = self.config.rollout_trials;

        let mut refined: SmallVec<[Candidate; 4]> = SmallVec::new();
        for candidate in &ranked[..k] {
            let total: f64 = (0..trials)
                .map(|_| {
                    let mut trial_rng = rng.fork();
                    self.rollout(state, seat, candidate.hand_index, &mut trial_rng)
                })
                .sum();
            self.stats.rollouts += trials;

            let mean = total / f64::from(trials.max(1));
            refined.push(Candidate {
                hand_index: candidate.hand_index,
                score: candidate.score + self.config.rollout_weight * mean,
            });
        }

        let best = refined
            .iter()
            .copied()
            .reduce(|best, c| if c.score > best.score { c } else { best })
            .unwrap_or(ranked[0]);

        debug!(
            %seat,
            candidates = k,
            trials,
            heuristic_choice = ranked[0].hand_index,
            refined_choice = best.hand_index,
            "rollout refinement"
        );
        best
    }

    /// One rollout trial: play the candidate on a clone, then random plies.
    ///
    /// Returns the acting seat's government power minus the opponent's.
    fn rollout(&self, state: &MatchState, seat: Seat, hand_index: usize, rng: &mut GameRng) -> f64 {
        let mut trial = state.clone();
        if trial.apply(seat, Action::Play(hand_index)).is_err() {
            return trial.power_differential(seat) as f64;
        }

        let mut actor = seat.other();
        for _ in 0..self.config.rollout_depth {
            if !trial.seat(actor).passed {
                trial.start_turn(actor);
                if let Action::Play(index) = UniformAgent::pick(&trial, actor, rng) {
                    // pick only returns affordable indices
                    let _ = trial.apply(actor, Action::Play(index));
                }
            }
            actor = actor.other();
        }

        trial.power_differential(seat) as f64
    }
}

impl Agent for MoveEvaluator<'_> {
    fn choose(
        &mut self,
        state: &MatchState,
        seat: Seat,
        rng: &mut GameRng,
    ) -> Result<Action, SimError> {
        Ok(self.evaluate(state, seat, rng))
    }

    fn decision_stats(&self) -> Option<&DecisionStats> {
        Some(&self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Difficulty, HeuristicWeights};
    use crate::cards::{CardDefinition, CardId};
    use crate::core::MatchConfig;

    fn catalog() -> CardCatalog {
        CardCatalog::from_definitions(vec![
            CardDefinition::new(CardId::new(1), "Clerk", CardCategory::Government)
                .with_cost(1)
                .with_power(2),
            CardDefinition::new(CardId::new(2), "Tycoon", CardCategory::Government)
                .with_cost(1)
                .with_power(8)
                .with_tag("money"),
            CardDefinition::new(CardId::new(3), "Audit", CardCategory::Intervention)
                .with_cost(1)
                .with_counter("money"),
            CardDefinition::new(CardId::new(4), "Parade", CardCategory::PermanentInitiative)
                .with_cost(1),
            CardDefinition::new(CardId::new(5), "Speech", CardCategory::InstantInitiative)
                .with_cost(1),
            CardDefinition::new(CardId::new(6), "Lawyer", CardCategory::Government)
                .with_cost(1)
                .with_power(2),
        ])
        .unwrap()
    }

    fn hand(catalog: &CardCatalog, names: &[&str]) -> Vec<CardInstance> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| CardInstance::from_definition(i as u32, catalog.by_name(n).unwrap()))
            .collect()
    }

    fn state_with(first: Vec<CardInstance>, second: Vec<CardInstance>) -> MatchState {
        let mut state = MatchState::new(MatchConfig::default(), first, second);
        state.start_round();
        state.start_turn(Seat::First);
        state
    }

    fn easy(catalog: &CardCatalog) -> MoveEvaluator<'_> {
        MoveEvaluator::new(catalog, DifficultyConfig::for_tier(Difficulty::Easy))
    }

    #[test]
    fn test_easy_prefers_power() {
        let catalog = catalog();
        let state = state_with(hand(&catalog, &["Clerk", "Tycoon"]), hand(&catalog, &["Clerk"]));

        let action = easy(&catalog).evaluate(&state, Seat::First, &mut GameRng::new(0));
        assert_eq!(action, Action::Play(1));
    }

    #[test]
    fn test_ties_keep_hand_order() {
        let catalog = catalog();
        let state = state_with(hand(&catalog, &["Clerk", "Lawyer"]), hand(&catalog, &["Clerk"]));

        let ranked = easy(&catalog).rank_candidates(&state, Seat::First, &mut GameRng::new(0));
        assert_eq!(ranked[0].hand_index, 0);
        assert_eq!(ranked[1].hand_index, 1);
        assert_eq!(ranked[0].score, ranked[1].score);
    }

    #[test]
    fn test_special_category_order() {
        let catalog = catalog();
        let state = state_with(
            hand(&catalog, &["Speech", "Parade", "Audit"]),
            hand(&catalog, &["Clerk"]),
        );

        let ranked = easy(&catalog).rank_candidates(&state, Seat::First, &mut GameRng::new(0));
        let order: Vec<_> = ranked.iter().map(|c| c.hand_index).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_counter_bonus() {
        let catalog = catalog();
        let mut state =
            state_with(hand(&catalog, &["Audit"]), hand(&catalog, &["Tycoon", "Clerk"]));
        let evaluator = easy(&catalog);
        let weights = HeuristicWeights::default();

        let before = evaluator.heuristic_score(&state, Seat::First, 0).unwrap();
        assert_eq!(before, weights.intervention);

        state.start_turn(Seat::Second);
        state.apply(Seat::Second, Action::Play(0)).unwrap();

        let after = evaluator.heuristic_score(&state, Seat::First, 0).unwrap();
        assert_eq!(after, weights.intervention + weights.counter);
    }

    #[test]
    fn test_row_pressure_and_catch_up() {
        let catalog = catalog();
        let weights = HeuristicWeights::default();
        let mut state = state_with(
            hand(&catalog, &["Clerk", "Clerk", "Clerk"]),
            hand(&catalog, &["Tycoon"]),
        );
        let evaluator = easy(&catalog);

        let empty_row = evaluator.heuristic_score(&state, Seat::First, 0).unwrap();
        assert_eq!(empty_row, 4.0 + weights.row_pressure);

        state.apply(Seat::First, Action::Play(0)).unwrap();
        let one_in_row = evaluator.heuristic_score(&state, Seat::First, 0).unwrap();
        assert!(one_in_row < empty_row);

        // opponent leads 8 to 2, beyond the margin of 3
        state.start_turn(Seat::Second);
        state.apply(Seat::Second, Action::Play(0)).unwrap();
        let behind = evaluator.heuristic_score(&state, Seat::First, 0).unwrap();
        assert_eq!(behind, one_in_row + weights.catch_up * 2.0);
    }

    #[test]
    fn test_pass_when_nothing_affordable() {
        let catalog = catalog();
        let mut state = state_with(hand(&catalog, &["Clerk"]), hand(&catalog, &["Clerk"]));
        state.seat_mut(Seat::First).action_points = 0;

        let mut evaluator = easy(&catalog);
        assert_eq!(evaluator.evaluate(&state, Seat::First, &mut GameRng::new(0)), Action::Pass);
        assert_eq!(evaluator.stats().passes, 1);
    }

    #[test]
    fn test_medium_noise_is_seeded() {
        let catalog = catalog();
        let state = state_with(
            hand(&catalog, &["Clerk", "Lawyer", "Tycoon", "Parade"]),
            hand(&catalog, &["Clerk"]),
        );
        let evaluator =
            MoveEvaluator::new(&catalog, DifficultyConfig::for_tier(Difficulty::Medium));

        let a = evaluator.rank_candidates(&state, Seat::First, &mut GameRng::new(9));
        let b = evaluator.rank_candidates(&state, Seat::First, &mut GameRng::new(9));
        assert_eq!(a, b);

        let plain = easy(&catalog).rank_candidates(&state, Seat::First, &mut GameRng::new(9));
        assert!(a.iter().zip(&plain).any(|(x, y)| x.score != y.score));
    }

    #[test]
    fn test_hard_bonus_shifts_scores() {
        let catalog = catalog();
        let state = state_with(hand(&catalog, &["Clerk"]), hand(&catalog, &["Clerk"]));
        let hard = MoveEvaluator::new(&catalog, DifficultyConfig::for_tier(Difficulty::Hard));

        let plain = easy(&catalog).rank_candidates(&state, Seat::First, &mut GameRng::new(0));
        let bonus = hard.rank_candidates(&state, Seat::First, &mut GameRng::new(0));
        assert_eq!(bonus[0].score, plain[0].score + hard.config().bonus);
    }

    #[test]
    fn test_hard_rollouts_leave_state_untouched() {
        let catalog = catalog();
        let state = state_with(
            hand(&catalog, &["Clerk", "Tycoon", "Audit", "Parade"]),
            hand(&catalog, &["Clerk", "Tycoon", "Lawyer"]),
        );
        let before = state.clone();

        let mut evaluator =
            MoveEvaluator::new(&catalog, DifficultyConfig::for_tier(Difficulty::Hard));
        let action = evaluator.evaluate(&state, Seat::First, &mut GameRng::new(3));

        assert_eq!(state, before);
        assert!(matches!(action, Action::Play(i) if i < 4));
        assert_eq!(evaluator.stats().rollouts, 4 * 8);
    }

    #[test]
    fn test_hard_rollouts_deterministic() {
        let catalog = catalog();
        let state = state_with(
            hand(&catalog, &["Clerk", "Tycoon", "Audit", "Parade", "Speech"]),
            hand(&catalog, &["Clerk", "Tycoon", "Lawyer"]),
        );
        let config = DifficultyConfig::for_tier(Difficulty::Hard);

        let a = MoveEvaluator::new(&catalog, config.clone()).evaluate(
            &state,
            Seat::First,
            &mut GameRng::new(5),
        );
        let b = MoveEvaluator::new(&catalog, config).evaluate(
            &state,
            Seat::First,
            &mut GameRng::new(5),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_rollouts_favor_power() {
        let catalog = catalog();
        // equal heuristic scores, only the rollout differential separates them
        let weights = HeuristicWeights {
            power: 0.0,
            row_pressure: 0.0,
            catch_up: 0.0,
            ..HeuristicWeights::default()
        };
        let config = DifficultyConfig::for_tier(Difficulty::Hard)
            .with_weights(weights)
            .with_rollout_depth(0);
        let state = state_with(hand(&catalog, &["Clerk", "Tycoon"]), hand(&catalog, &["Clerk"]));

        let mut evaluator = MoveEvaluator::new(&catalog, config);
        assert_eq!(evaluator.evaluate(&state, Seat::First, &mut GameRng::new(0)), Action::Play(1));
        assert_eq!(evaluator.stats().rollout_overrides, 1);
    }
}
