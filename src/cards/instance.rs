//! Card instances - owned copies of a card inside a built deck.
//!
//! Instances are small `Copy` values so match state can be cloned cheaply
//! for rollouts. The numeric attributes are copied from the definition at
//! deck-build time; the definition itself stays in the catalog.

use serde::{Deserialize, Serialize};

use super::definition::{CardCategory, CardDefinition, CardId, CardKind};

/// One copy of a card in a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Position of this copy in the built deck; unique within the deck.
    pub instance: u32,

    /// Reference to the card definition.
    pub card_id: CardId,

    /// Placement category.
    pub category: CardCategory,

    /// Base cost.
    pub cost: u32,

    /// Base power.
    pub power: u32,
}

impl CardInstance {
    /// Create a card instance from raw attributes.
    #[must_use]
    pub fn new(
        instance: u32,
        card_id: CardId,
        category: CardCategory,
        cost: u32,
        power: u32,
    ) -> Self {
        Self {
            instance,
            card_id,
            category,
            cost,
            power,
        }
    }

    /// Create an instance copying attributes from a definition.
    #[must_use]
    pub fn from_definition(instance: u32, def: &CardDefinition) -> Self {
        Self::new(instance, def.id, def.category, def.cost, def.power)
    }

    /// Card kind.
    #[must_use]
    pub fn kind(&self) -> CardKind {
        self.category.kind()
    }

    /// Check if this is a government card.
    #[must_use]
    pub fn is_government(&self) -> bool {
        self.kind() == CardKind::Government
    }
}
