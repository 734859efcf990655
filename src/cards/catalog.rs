//! Card catalog for definition lookup.
//!
//! The `CardCatalog` is the read-only table of card definitions a batch
//! runs against. Lookup is by `CardId` or by exact name; iteration is in
//! ascending id order so everything derived from the catalog is
//! deterministic.

use std::io::Read;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::error::SimError;

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use ccg_balance::cards::{CardCatalog, CardCategory, CardDefinition, CardId};
///
/// let mut catalog = CardCatalog::new();
/// let mayor =
///     CardDefinition::new(CardId::new(1), "Mayor", CardCategory::Government).with_power(4);
/// catalog.register(mayor).unwrap();
///
/// assert_eq!(catalog.by_name("Mayor").unwrap().power, 4);
/// assert!(catalog.by_name("Senator").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
    by_name: FxHashMap<String, CardId>,
    /// Registered ids, kept sorted.
    ids: Vec<CardId>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of definitions.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = CardDefinition>,
    ) -> Result<Self, SimError> {
        let mut catalog = Self::new();
        for def in definitions {
            catalog.register(def)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON array of definitions.
    ///
    /// The `kind` field is optional and ignored; it is derived from `category`.
    pub fn from_json(reader: impl Read) -> Result<Self, SimError> {
        let definitions: Vec<CardDefinition> = serde_json::from_reader(reader)?;
        Self::from_definitions(definitions)
    }

    /// Register a card definition.
    ///
    /// Fails if the id or the name is already taken.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), SimError> {
        self.check_unique(&card)?;
        self.insert(card);
        Ok(())
    }

    fn check_unique(&self, card: &CardDefinition) -> Result<(), SimError> {
        if self.cards.contains_key(&card.id) {
            return Err(SimError::InvalidInput(format!(
                "card id {} registered twice",
                card.id
            )));
        }
        if self.by_name.contains_key(&card.name) {
            return Err(SimError::InvalidInput(format!(
                "card name '{}' registered twice",
                card.name
            )));
        }
        Ok(())
    }

    /// Insert without the uniqueness check. Callers guarantee the id and
    /// name are new.
    pub(crate) fn insert(&mut self, mut card: CardDefinition) {
        card.kind = card.category.kind();
        let pos = self.ids.partition_point(|&id| id < card.id);
        self.ids.insert(pos, card.id);
        self.by_name.insert(card.name.clone(), card.id);
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a card definition by exact name.
    pub fn by_name(&self, name: &str) -> Result<&CardDefinition, SimError> {
        self.by_name
            .get(name)
            .and_then(|id| self.cards.get(id))
            .ok_or_else(|| SimError::CardNotFound {
                name: name.to_string(),
            })
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all definitions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.ids.iter().filter_map(|id| self.cards.get(id))
    }

    /// Find cards matching a predicate, in ascending id order.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardDefinition>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.iter().filter(move |c| predicate(c))
    }
}
