//! Error taxonomy for the simulator.
//!
//! Failures inside one match stay inside that match: the batch runner turns
//! them into `MatchSimulationFailure` records and keeps going. Only deck
//! building (before any match starts) can abort a whole batch.

use thiserror::Error;

use crate::core::{Action, Seat};

/// Errors produced by deck building, simulation and export.
#[derive(Debug, Error)]
pub enum SimError {
    /// A deck specification references a name absent from the catalog.
    #[error("card not found in catalog: {name}")]
    CardNotFound { name: String },

    /// An action violated action point or hand constraints.
    #[error("illegal action {action:?} by {seat}: {reason}")]
    IllegalAction {
        seat: Seat,
        action: Action,
        reason: String,
    },

    /// A single match failed unexpectedly.
    #[error("match {first} vs {second} (seed {seed}) failed: {reason}")]
    MatchSimulationFailure {
        first: String,
        second: String,
        seed: u64,
        reason: String,
    },

    /// The batch export document could not be written.
    #[error("failed to write export to {path}: {reason}")]
    ExportWriteFailure { path: String, reason: String },

    /// Invalid configuration or input data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed JSON catalog or deck list.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure while reading inputs.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Shorthand for a rejected action.
    pub(crate) fn illegal(seat: Seat, action: Action, reason: impl Into<String>) -> Self {
        SimError::IllegalAction {
            seat,
            action,
            reason: reason.into(),
        }
    }
}
