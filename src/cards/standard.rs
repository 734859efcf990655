//! Built-in card set.
//!
//! Used when no catalog file is supplied. Government cards carry power;
//! special cards carry none and matter through their category.

use super::catalog::CardCatalog;
use super::definition::{CardCategory, CardDefinition, CardId};

/// Name of the card used to stand in for missing names.
pub const FILLER_CARD: &str = "Junior Clerk";

struct Row {
    id: u32,
    name: &'static str,
    category: CardCategory,
    cost: u32,
    power: u32,
    tags: &'static [&'static str],
    counters: &'static [&'static str],
}

const fn gov(
    id: u32,
    name: &'static str,
    cost: u32,
    power: u32,
    tags: &'static [&'static str],
) -> Row {
    Row {
        id,
        name,
        category: CardCategory::Government,
        cost,
        power,
        tags,
        counters: &[],
    }
}

const fn special(
    id: u32,
    name: &'static str,
    category: CardCategory,
    cost: u32,
    tags: &'static [&'static str],
    counters: &'static [&'static str],
) -> Row {
    Row {
        id,
        name,
        category,
        cost,
        power: 0,
        tags,
        counters,
    }
}

const STANDARD: &[Row] = &[
    gov(1, "Prime Minister", 3, 9, &["leadership"]),
    gov(2, "Finance Minister", 2, 6, &["economy"]),
    gov(3, "Interior Minister", 2, 6, &["security"]),
    gov(4, "Foreign Minister", 2, 5, &["diplomacy"]),
    gov(5, "Budget Chief", 1, 4, &["economy"]),
    gov(6, "Police Commissioner", 2, 5, &["security"]),
    gov(7, "Ambassador", 1, 3, &["diplomacy"]),
    gov(8, "Party Whip", 1, 4, &["leadership"]),
    gov(9, "Junior Clerk", 1, 2, &["bureaucracy"]),
    gov(10, "Civil Servant", 1, 3, &["bureaucracy"]),
    gov(11, "Spokesperson", 1, 3, &["media"]),
    gov(12, "Central Banker", 3, 8, &["economy"]),
    gov(13, "Intelligence Chief", 3, 7, &["security"]),
    gov(14, "Trade Envoy", 1, 3, &["diplomacy", "economy"]),
    gov(15, "Backbencher", 0, 1, &["leadership"]),
    special(20, "Audit", CardCategory::Intervention, 1, &["bureaucracy"], &["economy", "budget"]),
    special(
        21,
        "Inquiry Commission",
        CardCategory::Intervention,
        2,
        &["media"],
        &["security", "police"],
    ),
    special(
        22,
        "No-Confidence Motion",
        CardCategory::Intervention,
        2,
        &["leadership"],
        &["minister"],
    ),
    special(
        23,
        "Diplomatic Incident",
        CardCategory::Intervention,
        1,
        &["diplomacy"],
        &["ambassador", "envoy"],
    ),
    special(30, "Infrastructure Program", CardCategory::PermanentInitiative, 2, &["economy"], &[]),
    special(31, "Public Broadcaster", CardCategory::PermanentInitiative, 1, &["media"], &[]),
    special(32, "Border Patrol", CardCategory::PermanentInitiative, 2, &["security"], &[]),
    special(40, "Press Conference", CardCategory::InstantInitiative, 1, &["media"], &[]),
    special(41, "Emergency Decree", CardCategory::InstantInitiative, 2, &["leadership"], &[]),
    special(42, "Snap Poll", CardCategory::InstantInitiative, 0, &["media"], &[]),
];

/// The built-in catalog.
#[must_use]
pub fn standard_catalog() -> CardCatalog {
    let mut catalog = CardCatalog::new();
    for def in standard_definitions() {
        catalog.insert(def);
    }
    catalog
}

fn standard_definitions() -> impl Iterator<Item = CardDefinition> {
    STANDARD.iter().map(|row| {
        let mut def = CardDefinition::new(CardId::new(row.id), row.name, row.category)
            .with_cost(row.cost)
            .with_power(row.power);
        for tag in row.tags {
            def = def.with_tag(*tag);
        }
        for keyword in row.counters {
            def = def.with_counter(*keyword);
        }
        def
    })
}
