//! Core simulation types: seats, state, actions, RNG, configuration.
//!
//! Everything here is independent of how moves are chosen or how matches
//! are scheduled; `rules`, `ai` and `batch` build on these types.

pub mod action;
pub mod config;
pub mod rng;
pub mod seat;
pub mod state;

pub use action::{Action, ActionRecord};
pub use config::{MatchConfig, PlayCost};
pub use rng::{GameRng, GameRngState};
pub use seat::{Seat, SeatMap};
pub use state::{BoardZone, LegalPlays, MatchState, SeatState};
