//! Deck construction from presets and generation rules.
//!
//! A `DeckSpec` names a deck and says how to build it: either an explicit
//! ordered list of card names, or a `GenerationRule` that picks cards from
//! the catalog by archetype tag and a selection heuristic. `DeckBuilder`
//! turns specs into `Deck`s; it only reads the catalog.
//!
//! ## Missing cards
//!
//! A preset naming a card the catalog does not have either fails with
//! `SimError::CardNotFound` (`MissingCardPolicy::FailFast`, the default) or
//! gets the configured filler card in that slot
//! (`MissingCardPolicy::Substitute`).

use std::cmp::Ordering;
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cards::{CardCatalog, CardDefinition, CardInstance, CardKind};
use crate::core::GameRng;
use crate::error::SimError;

/// How the fill portion of a generated deck ranks candidate cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionHeuristic {
    /// Highest base power first.
    #[default]
    HighestPower,
    /// Highest power per point of cost first.
    BestEfficiency,
    /// Special-kind cards first, then government cards by power.
    SpecialsFirst,
    /// Lowest cost first, then higher power.
    Cheapest,
}

impl SelectionHeuristic {
    fn compare(self, a: &CardDefinition, b: &CardDefinition) -> Ordering {
        match self {
            SelectionHeuristic::HighestPower => b.power.cmp(&a.power),
            SelectionHeuristic::BestEfficiency => b.efficiency().total_cmp(&a.efficiency()),
            SelectionHeuristic::SpecialsFirst => {
                let special = |c: &CardDefinition| c.kind == CardKind::Special;
                special(b)
                    .cmp(&special(a))
                    .then_with(|| b.power.cmp(&a.power))
            }
            SelectionHeuristic::Cheapest => a.cost.cmp(&b.cost).then_with(|| b.power.cmp(&a.power)),
        }
    }
}

/// Rule for generating a deck from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRule {
    /// Archetype tag the core picks must carry.
    pub archetype: String,
    /// Total deck size.
    pub size: usize,
    /// Number of top-power government cards taken first.
    pub power_picks: usize,
    /// Ranking for the rest of the deck.
    #[serde(default)]
    pub heuristic: SelectionHeuristic,
}

impl GenerationRule {
    /// Create a rule with the default heuristic.
    #[must_use]
    pub fn new(archetype: impl Into<String>, size: usize, power_picks: usize) -> Self {
        Self {
            archetype: archetype.into(),
            size,
            power_picks,
            heuristic: SelectionHeuristic::default(),
        }
    }

    /// Set the fill heuristic.
    #[must_use]
    pub fn with_heuristic(mut self, heuristic: SelectionHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }
}

/// How a deck is described before it is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeckSpec {
    /// Explicit ordered list of card names.
    Preset { name: String, cards: Vec<String> },
    /// Cards picked from the catalog by rule.
    Generated { name: String, rule: GenerationRule },
}

impl DeckSpec {
    /// Create a preset spec.
    #[must_use]
    pub fn preset<S: Into<String>>(
        name: impl Into<String>,
        cards: impl IntoIterator<Item = S>,
    ) -> Self {
        DeckSpec::Preset {
            name: name.into(),
            cards: cards.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a generated spec.
    #[must_use]
    pub fn generated(name: impl Into<String>, rule: GenerationRule) -> Self {
        DeckSpec::Generated {
            name: name.into(),
            rule,
        }
    }

    /// Deck name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            DeckSpec::Preset { name, .. } | DeckSpec::Generated { name, .. } => name,
        }
    }

    /// Load a list of deck specs from JSON.
    pub fn load_all(reader: impl Read) -> Result<Vec<DeckSpec>, SimError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// What to do when a preset names a card the catalog lacks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingCardPolicy {
    /// Abort the build with `CardNotFound`.
    #[default]
    FailFast,
    /// Put the named filler card in the missing slot.
    Substitute { filler: String },
}

/// A built deck: its name and its cards in canonical order.
///
/// The deck itself is never consumed; each match takes a shuffled copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Deck name, used in metrics and reports.
    pub name: String,
    /// Cards in build order.
    pub cards: Vec<CardInstance>,
}

impl Deck {
    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// A copy of the cards in a random order drawn from `rng`.
    #[must_use]
    pub fn shuffled(&self, rng: &mut GameRng) -> Vec<CardInstance> {
        let mut cards = self.cards.clone();
        rng.shuffle(&mut cards);
        cards
    }

    /// Total base power across government cards.
    #[must_use]
    pub fn government_power(&self) -> u32 {
        self.cards
            .iter()
            .filter(|c| c.is_government())
            .map(|c| c.power)
            .sum()
    }
}

/// Builds decks against a catalog.
///
/// ## Example
///
/// ```
/// use ccg_balance::cards::standard_catalog;
/// use ccg_balance::deck::{DeckBuilder, DeckSpec, MissingCardPolicy};
///
/// let catalog = standard_catalog();
/// let spec = DeckSpec::preset("Pair", ["Ambassador", "Nobody"]);
///
/// assert!(DeckBuilder::new(&catalog).build(&spec).is_err());
///
/// let lenient = DeckBuilder::new(&catalog).with_policy(MissingCardPolicy::Substitute {
///     filler: "Junior Clerk".to_string(),
/// });
/// assert_eq!(lenient.build(&spec).unwrap().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct DeckBuilder<'a> {
    catalog: &'a CardCatalog,
    policy: MissingCardPolicy,
}

impl<'a> DeckBuilder<'a> {
    /// Create a fail-fast builder.
    #[must_use]
    pub fn new(catalog: &'a CardCatalog) -> Self {
        Self {
            catalog,
            policy: MissingCardPolicy::default(),
        }
    }

    /// Set the missing-card policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MissingCardPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build one deck.
    pub fn build(&self, spec: &DeckSpec) -> Result<Deck, SimError> {
        let definitions = match spec {
            DeckSpec::Preset { name, cards } => self.resolve_preset(name, cards)?,
            DeckSpec::Generated { name, rule } => self.generate(name, rule)?,
        };

        let cards: Vec<CardInstance> = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| CardInstance::from_definition(i as u32, def))
            .collect();

        debug!(deck = spec.name(), size = cards.len(), "deck built");
        Ok(Deck {
            name: spec.name().to_string(),
            cards,
        })
    }

    /// Build every deck, stopping at the first failure.
    pub fn build_all(&self, specs: &[DeckSpec]) -> Result<Vec<Deck>, SimError> {
        specs.iter().map(|spec| self.build(spec)).collect()
    }

    fn resolve_preset(
        &self,
        deck: &str,
        names: &[String],
    ) -> Result<Vec<&'a CardDefinition>, SimError> {
        if names.is_empty() {
            return Err(SimError::InvalidInput(format!("deck '{}' has no cards", deck)));
        }

        names
            .iter()
            .map(|name| match self.catalog.by_name(name) {
                Ok(def) => Ok(def),
                Err(err) => match &self.policy {
                    MissingCardPolicy::FailFast => Err(err),
                    MissingCardPolicy::Substitute { filler } => {
                        warn!(deck, missing = %name, filler = %filler, "substituting missing card");
                        self.catalog.by_name(filler)
                    }
                },
            })
            .collect()
    }

    fn generate(
        &self,
        deck: &str,
        rule: &GenerationRule,
    ) -> Result<Vec<&'a CardDefinition>, SimError> {
        if rule.size == 0 {
            return Err(SimError::InvalidInput(format!("deck '{}' has size 0", deck)));
        }
        if self.catalog.is_empty() {
            return Err(SimError::InvalidInput(format!(
                "cannot generate deck '{}' from an empty catalog",
                deck
            )));
        }

        let government: Vec<&CardDefinition> = self
            .catalog
            .find(|c| c.kind == CardKind::Government)
            .collect();
        let mut core: Vec<&CardDefinition> = government
            .iter()
            .copied()
            .filter(|c| c.has_tag(&rule.archetype))
            .collect();
        if core.is_empty() {
            debug!(
                deck,
                archetype = %rule.archetype,
                "no cards carry archetype, using all government cards"
            );
            core = government;
        }
        // stable sort keeps id order among equal power
        core.sort_by(|a, b| b.power.cmp(&a.power));
        core.truncate(rule.power_picks.min(rule.size));

        let mut pool: Vec<&CardDefinition> = self
            .catalog
            .iter()
            .filter(|c| !core.iter().any(|p| p.id == c.id))
            .collect();
        if pool.is_empty() {
            pool = self.catalog.iter().collect();
        }
        pool.sort_by(|a, b| rule.heuristic.compare(a, b));

        let fill = rule.size - core.len();
        let mut picks = core;
        picks.extend(pool.iter().copied().cycle().take(fill));
        Ok(picks)
    }
}
