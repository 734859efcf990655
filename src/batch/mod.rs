//! Batch simulation and balance evaluation.
//!
//! ## Key Types
//!
//! - `BatchRunner`: Plays every ordered deck pairing many times
//! - `BalanceMetric` / `Classification`: Per-deck aggregates and verdicts
//! - `PairingSummary`: Head-to-head totals
//! - `Recommendation`: Suggested adjustment for a non-balanced deck
//! - `BatchReport`: JSON export document

pub mod metrics;
pub mod report;
pub mod runner;

pub use metrics::{
    Adjustment, BalanceMetric, Classification, PairingSummary, Recommendation, Thresholds,
};
pub use report::{write_summary, BatchReport};
pub use runner::{BatchConfig, BatchOutcome, BatchRunner, MatchContext, MatchFailure, MatchRecord};
