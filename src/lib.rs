//! # ccg-balance
//!
//! Deterministic self-play simulator for balance testing a two-seat,
//! round-based card game.
//!
//! ## Design Principles
//!
//! 1. **Reproducible**: Every match runs on its own seeded ChaCha8 stream,
//!    derived from the batch seed plus pairing and iteration. Same seed, same
//!    batch.
//!
//! 2. **One Action Per Step**: `MatchMachine` advances a match by exactly one
//!    seat decision, so drivers and tests can observe every intermediate state.
//!
//! 3. **Contained Failures**: A match that errors or panics is logged and
//!    skipped; the rest of the batch and its metrics are unaffected.
//!
//! ## Architecture
//!
//! - **Persistent Zones**: Deck, hand, board and trap zones are `im::Vector`s,
//!   so rollouts clone a `MatchState` in O(1).
//!
//! - **Agent Seam**: Seats are driven through the `Agent` trait. The heuristic
//!   `MoveEvaluator` implements it for the three difficulty tiers.
//!
//! ## Modules
//!
//! - `core`: Seats, RNG, match configuration, actions, match state
//! - `cards`: Card definitions, instances and the catalog
//! - `deck`: Preset and rule-generated deck construction
//! - `rules`: Match state machine and round resolution
//! - `ai`: Heuristic move evaluation and rollout refinement
//! - `batch`: Batch self-play, balance metrics, export
//! - `cli`: Command-line batch invocation
//!
//! ## Example
//!
//! ```
//! use ccg_balance::{standard_catalog, standard_presets, BatchConfig, BatchRunner, DeckBuilder};
//!
//! let catalog = standard_catalog();
//! let decks = DeckBuilder::new(&catalog).build_all(&standard_presets()).unwrap();
//! let runner = BatchRunner::new(&catalog, BatchConfig::new().with_iterations(2));
//! let outcome = runner.run(&decks).unwrap();
//!
//! assert_eq!(outcome.metrics.len(), decks.len());
//! ```

pub mod ai;
pub mod batch;
pub mod cards;
pub mod cli;
pub mod core;
pub mod deck;
pub mod error;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, BoardZone, GameRng, GameRngState, LegalPlays, MatchConfig, MatchState,
    PlayCost, Seat, SeatMap, SeatState,
};

pub use crate::cards::{
    standard_catalog, CardCatalog, CardCategory, CardDefinition, CardId, CardInstance, CardKind,
    FILLER_CARD,
};

pub use crate::deck::{
    standard_presets, Deck, DeckBuilder, DeckSpec, GenerationRule, MissingCardPolicy,
    SelectionHeuristic,
};

pub use crate::rules::{
    MatchMachine, MatchPhase, MatchResult, RoundDecision, RoundOutcome, RoundResolver,
};

pub use crate::ai::{
    Agent, Candidate, DecisionStats, Difficulty, DifficultyConfig, HeuristicWeights,
    MoveEvaluator, UniformAgent,
};

pub use crate::batch::{
    write_summary, Adjustment, BalanceMetric, BatchConfig, BatchOutcome, BatchReport, BatchRunner,
    Classification, MatchContext, MatchFailure, MatchRecord, PairingSummary, Recommendation,
    Thresholds,
};

pub use crate::error::SimError;
