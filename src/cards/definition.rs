//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable identity of a card: its name, kind,
//! category, cost and power, plus archetype tags and (for interventions) the
//! keywords it counters. Definitions are loaded once into a `CardCatalog`
//! and never mutated.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card, not a specific copy in a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Broad card kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Contributes power to the government row.
    #[default]
    Government,
    /// Initiatives and interventions.
    Special,
}

/// Category tag; decides where a played card lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    /// Government row.
    Government,
    /// Face-down trap zone; persists across rounds.
    Intervention,
    /// Public row.
    PermanentInitiative,
    /// Pending-instant staging area.
    InstantInitiative,
}

impl CardCategory {
    /// The kind implied by this category.
    #[must_use]
    pub const fn kind(self) -> CardKind {
        match self {
            CardCategory::Government => CardKind::Government,
            _ => CardKind::Special,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_balance::cards::{CardCategory, CardDefinition, CardId, CardKind};
///
/// let minister = CardDefinition::new(CardId::new(1), "Finance Minister", CardCategory::Government)
///     .with_cost(2)
///     .with_power(5)
///     .with_tag("economy");
///
/// assert_eq!(minister.kind, CardKind::Government);
/// assert!(minister.has_tag("Economy"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DefinitionRecord")]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name, unique within a catalog.
    pub name: String,

    /// Card kind, derived from the category.
    pub kind: CardKind,

    /// Placement category.
    pub category: CardCategory,

    /// Base cost.
    pub cost: u32,

    /// Base power.
    pub power: u32,

    /// Archetype labels used by deck generation.
    #[serde(default)]
    pub tags: SmallVec<[String; 2]>,

    /// Keywords this card reacts to on the opponent's board.
    #[serde(default)]
    pub counters: SmallVec<[String; 2]>,
}

/// Serialized form of a definition. Any `kind` in the input is ignored.
#[derive(Deserialize)]
struct DefinitionRecord {
    id: CardId,
    name: String,
    category: CardCategory,
    cost: u32,
    power: u32,
    #[serde(default)]
    tags: SmallVec<[String; 2]>,
    #[serde(default)]
    counters: SmallVec<[String; 2]>,
}

impl From<DefinitionRecord> for CardDefinition {
    fn from(record: DefinitionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            kind: record.category.kind(),
            category: record.category,
            cost: record.cost,
            power: record.power,
            tags: record.tags,
            counters: record.counters,
        }
    }
}

impl CardDefinition {
    /// Create a new card definition with zero cost and power.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, category: CardCategory) -> Self {
        Self {
            id,
            name: name.into(),
            kind: category.kind(),
            category,
            cost: 0,
            power: 0,
            tags: SmallVec::new(),
            counters: SmallVec::new(),
        }
    }

    /// Set the base cost.
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Set the base power.
    #[must_use]
    pub fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    /// Add an archetype tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a counter keyword.
    #[must_use]
    pub fn with_counter(mut self, keyword: impl Into<String>) -> Self {
        self.counters.push(keyword.into());
        self
    }

    /// Case-insensitive tag check.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether the name or any tag contains `keyword` (case-insensitive).
    #[must_use]
    pub fn mentions(&self, keyword: &str) -> bool {
        let keyword = keyword.to_ascii_lowercase();
        if keyword.is_empty() {
            return false;
        }
        self.name.to_ascii_lowercase().contains(&keyword)
            || self
                .tags
                .iter()
                .any(|t| t.to_ascii_lowercase().contains(&keyword))
    }

    /// Power per point of cost; zero-cost cards count as cost 1.
    #[must_use]
    pub fn efficiency(&self) -> f64 {
        self.power as f64 / self.cost.max(1) as f64
    }
}
