//! Batch runner for deck balance evaluation.
//!
//! Plays every ordered pairing of distinct decks a fixed number of times.
//! Each match gets a fresh `MatchState` and its own `GameRng`, seeded from
//! the batch seed, the pairing index, and the iteration index; no two
//! matches share a stream.
//!
//! A match that fails (an agent error or a panic) is logged, recorded as a
//! failure, and left out of every aggregate. The batch carries on.

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::metrics::{BalanceMetric, PairingSummary, Recommendation, Thresholds};
use crate::ai::{Agent, DecisionStats, DifficultyConfig, MoveEvaluator};
use crate::cards::CardCatalog;
use crate::core::{GameRng, MatchConfig, Seat, SeatMap};
use crate::deck::Deck;
use crate::error::SimError;
use crate::rules::{MatchMachine, MatchResult};

/// Configuration for a batch run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Matches per ordered pairing.
    pub iterations_per_pairing: u32,

    /// Seed every match seed is derived from.
    pub base_seed: u64,

    /// Rules for each match.
    pub match_config: MatchConfig,

    /// Evaluator configuration per seat.
    pub difficulty: SeatMap<DifficultyConfig>,

    /// Classification thresholds.
    pub thresholds: Thresholds,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            iterations_per_pairing: 10,
            base_seed: 42,
            match_config: MatchConfig::default(),
            difficulty: SeatMap::with_value(DifficultyConfig::default()),
            thresholds: Thresholds::default(),
        }
    }
}

impl BatchConfig {
    /// Create a new batch config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set matches per pairing.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations_per_pairing = iterations;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Set the match rules.
    pub fn with_match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    /// Use the same evaluator configuration for both seats.
    pub fn with_difficulty(mut self, config: DifficultyConfig) -> Self {
        self.difficulty = SeatMap::with_value(config);
        self
    }

    /// Set the evaluator configuration for one seat.
    pub fn with_seat_difficulty(mut self, seat: Seat, config: DifficultyConfig) -> Self {
        self.difficulty[seat] = config;
        self
    }

    /// Set the classification thresholds.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Seed for one match.
    #[must_use]
    pub fn match_seed(&self, pairing: usize, iteration: u32) -> u64 {
        GameRng::derive_seed(self.base_seed, &[pairing as u64, u64::from(iteration)])
    }
}

/// Identifies one scheduled match.
#[derive(Clone, Copy, Debug)]
pub struct MatchContext<'d> {
    /// Index of the ordered pairing.
    pub pairing: usize,
    /// Iteration within the pairing.
    pub iteration: u32,
    /// Derived match seed.
    pub seed: u64,
    /// Deck in the first seat.
    pub first: &'d Deck,
    /// Deck in the second seat.
    pub second: &'d Deck,
}

/// A completed match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Deck in the first seat.
    pub first_deck: String,
    /// Deck in the second seat.
    pub second_deck: String,
    /// Iteration within the pairing.
    pub iteration: u32,
    /// Match summary.
    pub result: MatchResult,
    /// Evaluator statistics per seat; empty for agents that keep none.
    #[serde(default)]
    pub decisions: SeatMap<DecisionStats>,
}

impl MatchRecord {
    /// Name of the winning deck.
    #[must_use]
    pub fn winning_deck(&self) -> &str {
        match self.result.winner {
            Seat::First => &self.first_deck,
            Seat::Second => &self.second_deck,
        }
    }
}

/// A match that was skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFailure {
    /// Deck in the first seat.
    pub first_deck: String,
    /// Deck in the second seat.
    pub second_deck: String,
    /// Iteration within the pairing.
    pub iteration: u32,
    /// Match seed.
    pub seed: u64,
    /// What went wrong.
    pub reason: String,
}

/// Everything a batch produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Per-deck metrics, in deck order.
    pub metrics: Vec<BalanceMetric>,
    /// Head-to-head summaries, in pairing order.
    pub pairings: Vec<PairingSummary>,
    /// Completed matches.
    pub matches: Vec<MatchRecord>,
    /// Skipped matches.
    pub failures: Vec<MatchFailure>,
    /// One entry per non-balanced deck.
    pub recommendations: Vec<Recommendation>,
}

impl BatchOutcome {
    /// Completed matches.
    #[must_use]
    pub fn total_games(&self) -> usize {
        self.matches.len()
    }

    /// Metric for a deck by name.
    #[must_use]
    pub fn metric(&self, deck: &str) -> Option<&BalanceMetric> {
        self.metrics.iter().find(|m| m.deck == deck)
    }
}

/// Runs batches of matches against one catalog.
///
/// ## Example
///
/// ```
/// use ccg_balance::batch::{BatchConfig, BatchRunner};
/// use ccg_balance::cards::standard_catalog;
/// use ccg_balance::deck::{standard_presets, DeckBuilder};
///
/// let catalog = standard_catalog();
/// let decks = DeckBuilder::new(&catalog).build_all(&standard_presets()[..2]).unwrap();
///
/// let runner = BatchRunner::new(&catalog, BatchConfig::new().with_iterations(2));
/// let outcome = runner.run(&decks).unwrap();
///
/// assert_eq!(outcome.total_games(), 4);
/// assert_eq!(outcome.metrics[0].games_played, 4);
/// ```
#[derive(Clone, Debug)]
pub struct BatchRunner<'a> {
    catalog: &'a CardCatalog,
    config: BatchConfig,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner.
    #[must_use]
    pub fn new(catalog: &'a CardCatalog, config: BatchConfig) -> Self {
        Self { catalog, config }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run the batch with a `MoveEvaluator` per seat.
    pub fn run(&self, decks: &[Deck]) -> Result<BatchOutcome, SimError> {
        let catalog = self.catalog;
        let difficulty = self.config.difficulty.clone();
        self.run_with(decks, |_| {
            SeatMap::new(|seat| {
                let evaluator = MoveEvaluator::new(catalog, difficulty[seat].clone());
                Box::new(evaluator) as Box<dyn Agent + 'a>
            })
        })
    }

    /// Run the batch with agents from `make_agents`, called once per match.
    ///
    /// Fails only if fewer than two decks are given.
    pub fn run_with<'g, F>(
        &self,
        decks: &[Deck],
        mut make_agents: F,
    ) -> Result<BatchOutcome, SimError>
    where
        F: FnMut(&MatchContext<'_>) -> SeatMap<Box<dyn Agent + 'g>>,
    {
        if decks.len() < 2 {
            return Err(SimError::InvalidInput(format!(
                "a batch needs at least two decks, got {}",
                decks.len()
            )));
        }

        let thresholds = self.config.thresholds;
        let mut metrics: Vec<BalanceMetric> =
            decks.iter().map(|d| BalanceMetric::new(d.name.clone())).collect();
        let mut pairings = Vec::new();
        let mut matches = Vec::new();
        let mut failures = Vec::new();

        let ordered: Vec<(usize, usize)> = (0..decks.len())
            .flat_map(|i| (0..decks.len()).filter(move |&j| j != i).map(move |j| (i, j)))
            .collect();

        info!(
            decks = decks.len(),
            pairings = ordered.len(),
            iterations = self.config.iterations_per_pairing,
            seed = self.config.base_seed,
            "batch start"
        );

        for (pairing, &(i, j)) in ordered.iter().enumerate() {
            let (first, second) = (&decks[i], &decks[j]);
            let mut summary = PairingSummary::new(first.name.clone(), second.name.clone());

            for iteration in 0..self.config.iterations_per_pairing {
                let ctx = MatchContext {
                    pairing,
                    iteration,
                    seed: self.config.match_seed(pairing, iteration),
                    first,
                    second,
                };
                let agents = make_agents(&ctx);

                match self.play_match(&ctx, agents) {
                    Ok((result, decisions)) => {
                        let first_won = result.winner == Seat::First;
                        metrics[i].record(first_won, result.rounds_played, &thresholds);
                        metrics[j].record(!first_won, result.rounds_played, &thresholds);
                        summary.games += 1;
                        if first_won {
                            summary.first_wins += 1;
                        } else {
                            summary.second_wins += 1;
                        }
                        matches.push(MatchRecord {
                            first_deck: first.name.clone(),
                            second_deck: second.name.clone(),
                            iteration,
                            result,
                            decisions,
                        });
                    }
                    Err(err) => {
                        warn!(
                            first = %first.name,
                            second = %second.name,
                            seed = ctx.seed,
                            iteration,
                            error = %err,
                            "match failed, skipping"
                        );
                        summary.failures += 1;
                        failures.push(MatchFailure {
                            first_deck: first.name.clone(),
                            second_deck: second.name.clone(),
                            iteration,
                            seed: ctx.seed,
                            reason: err.to_string(),
                        });
                    }
                }
            }

            info!(
                first = %summary.first,
                second = %summary.second,
                games = summary.games,
                first_wins = summary.first_wins,
                second_wins = summary.second_wins,
                failures = summary.failures,
                "pairing complete"
            );
            pairings.push(summary);
        }

        let recommendations: Vec<Recommendation> =
            metrics.iter().filter_map(Recommendation::for_metric).collect();

        info!(
            games = matches.len(),
            failures = failures.len(),
            flagged = recommendations.len(),
            "batch finished"
        );

        Ok(BatchOutcome {
            metrics,
            pairings,
            matches,
            failures,
            recommendations,
        })
    }

    /// Play one match, turning agent errors and panics into
    /// `MatchSimulationFailure`.
    ///
    /// Returns the result and each seat's decision statistics.
    fn play_match(
        &self,
        ctx: &MatchContext<'_>,
        agents: SeatMap<Box<dyn Agent + '_>>,
    ) -> Result<(MatchResult, SeatMap<DecisionStats>), SimError> {
        let failure = |reason: String| SimError::MatchSimulationFailure {
            first: ctx.first.name.clone(),
            second: ctx.second.name.clone(),
            seed: ctx.seed,
            reason,
        };

        let config = self.config.match_config;
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            let mut agents = agents;
            let (first, second) = agents.both_mut();
            let mut seats = SeatMap::from_pair(first.as_mut(), second.as_mut());
            let result =
                MatchMachine::new(config, ctx.first, ctx.second, ctx.seed).run(&mut seats)?;
            let decisions = SeatMap::new(|seat| {
                agents[seat].decision_stats().cloned().unwrap_or_default()
            });
            Ok::<_, SimError>((result, decisions))
        }));

        match outcome {
            Ok(Ok((result, decisions))) => {
                for (seat, stats) in decisions.iter() {
                    debug!(
                        seed = ctx.seed,
                        %seat,
                        decisions = stats.decisions,
                        avg_candidates = stats.avg_candidates(),
                        rollouts = stats.rollouts,
                        override_rate = stats.override_rate(),
                        "decision stats"
                    );
                }
                Ok((result, decisions))
            }
            Ok(Err(err)) => Err(failure(err.to_string())),
            Err(payload) => Err(failure(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic".to_string()
    }
}
