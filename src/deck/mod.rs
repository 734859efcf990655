//! Deck building: presets, generation rules, and built decks.
//!
//! ## Key Types
//!
//! - `DeckSpec`: A named preset list or a generation rule
//! - `DeckBuilder`: Resolves specs against a `CardCatalog`
//! - `Deck`: Built card list; each match shuffles its own copy

pub mod builder;
pub mod presets;

pub use builder::{
    Deck, DeckBuilder, DeckSpec, GenerationRule, MissingCardPolicy, SelectionHeuristic,
};
pub use presets::standard_presets;
