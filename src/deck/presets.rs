//! Built-in deck list for the standard catalog.

use super::builder::{DeckSpec, GenerationRule, SelectionHeuristic};

/// Curated presets plus one generated deck.
#[must_use]
pub fn standard_presets() -> Vec<DeckSpec> {
    vec![
        DeckSpec::preset(
            "Technocrats",
            [
                "Central Banker",
                "Finance Minister",
                "Budget Chief",
                "Budget Chief",
                "Trade Envoy",
                "Civil Servant",
                "Civil Servant",
                "Audit",
                "Infrastructure Program",
                "Press Conference",
            ],
        ),
        DeckSpec::preset(
            "Hardliners",
            [
                "Interior Minister",
                "Intelligence Chief",
                "Police Commissioner",
                "Police Commissioner",
                "Party Whip",
                "Civil Servant",
                "Junior Clerk",
                "Inquiry Commission",
                "Border Patrol",
                "Emergency Decree",
            ],
        ),
        DeckSpec::preset(
            "Diplomats",
            [
                "Foreign Minister",
                "Ambassador",
                "Ambassador",
                "Trade Envoy",
                "Trade Envoy",
                "Spokesperson",
                "Junior Clerk",
                "Diplomatic Incident",
                "Public Broadcaster",
                "Snap Poll",
            ],
        ),
        DeckSpec::preset(
            "Populists",
            [
                "Prime Minister",
                "Spokesperson",
                "Spokesperson",
                "Party Whip",
                "Backbencher",
                "Backbencher",
                "No-Confidence Motion",
                "Public Broadcaster",
                "Press Conference",
                "Snap Poll",
            ],
        ),
        DeckSpec::generated(
            "Security Council",
            GenerationRule::new("security", 15, 4)
                .with_heuristic(SelectionHeuristic::BestEfficiency),
        ),
    ]
}
