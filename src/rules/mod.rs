//! Match progression and round resolution.
//!
//! `MatchMachine` drives a single match through its phases, asking an
//! `Agent` per seat for actions. `RoundResolver` decides each round and
//! detects when the match is over.

pub mod machine;
pub mod resolver;

pub use machine::{MatchMachine, MatchPhase, MatchResult};
pub use resolver::{RoundDecision, RoundOutcome, RoundResolver};
