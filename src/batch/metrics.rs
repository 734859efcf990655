//! Per-deck balance metrics and classification.
//!
//! Metrics are updated incrementally after every match, so a batch stopped
//! between matches still holds consistent numbers.

use serde::{Deserialize, Serialize};

/// Balance verdict for a deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Win rate above the upper threshold.
    Overpowered,
    /// Win rate within the thresholds (inclusive).
    #[default]
    Balanced,
    /// Win rate below the lower threshold.
    Underpowered,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Classification::Overpowered => "overpowered",
            Classification::Balanced => "balanced",
            Classification::Underpowered => "underpowered",
        })
    }
}

/// Win rate thresholds for classification.
///
/// Both comparisons are strict: a win rate equal to a threshold is balanced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Win rates strictly above this are overpowered.
    pub overpowered_above: f64,
    /// Win rates strictly below this are underpowered.
    pub underpowered_below: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            overpowered_above: 0.6,
            underpowered_below: 0.4,
        }
    }
}

impl Thresholds {
    /// Classify a win rate.
    #[must_use]
    pub fn classify(&self, win_rate: f64) -> Classification {
        if win_rate > self.overpowered_above {
            Classification::Overpowered
        } else if win_rate < self.underpowered_below {
            Classification::Underpowered
        } else {
            Classification::Balanced
        }
    }
}

/// Aggregate results for one deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceMetric {
    /// Deck name.
    pub deck: String,
    /// Matches played, either seat.
    pub games_played: u32,
    /// Matches won.
    pub wins: u32,
    /// Matches lost.
    pub losses: u32,
    /// `wins / games_played`, 0 before the first game.
    pub win_rate: f64,
    /// Mean rounds per match.
    pub average_round_count: f64,
    /// Verdict for the current win rate.
    pub classification: Classification,
    total_rounds: u64,
}

impl BalanceMetric {
    /// Create an empty metric. A deck with no games is balanced.
    #[must_use]
    pub fn new(deck: impl Into<String>) -> Self {
        Self {
            deck: deck.into(),
            games_played: 0,
            wins: 0,
            losses: 0,
            win_rate: 0.0,
            average_round_count: 0.0,
            classification: Classification::Balanced,
            total_rounds: 0,
        }
    }

    /// Fold in one finished match.
    pub fn record(&mut self, won: bool, rounds: u32, thresholds: &Thresholds) {
        self.games_played += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.total_rounds += u64::from(rounds);

        let games = f64::from(self.games_played);
        self.win_rate = f64::from(self.wins) / games;
        self.average_round_count = self.total_rounds as f64 / games;
        self.classification = thresholds.classify(self.win_rate);
    }
}

/// Head-to-head totals for one ordered pairing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingSummary {
    /// Deck in the first seat.
    pub first: String,
    /// Deck in the second seat.
    pub second: String,
    /// Completed matches.
    pub games: u32,
    /// Matches won by the first-seat deck.
    pub first_wins: u32,
    /// Matches won by the second-seat deck.
    pub second_wins: u32,
    /// Matches that failed and were skipped.
    pub failures: u32,
}

impl PairingSummary {
    /// Create an empty summary.
    #[must_use]
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            ..Self::default()
        }
    }

    /// First-seat deck's win rate in this pairing.
    #[must_use]
    pub fn first_win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            f64::from(self.first_wins) / f64::from(self.games)
        }
    }
}

/// Which way to move a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Reduce power or raise cost.
    Weaken,
    /// Raise power or reduce cost.
    Strengthen,
}

/// Suggested change for a non-balanced deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Deck name.
    pub deck: String,
    /// Observed win rate.
    pub win_rate: f64,
    /// Verdict.
    pub classification: Classification,
    /// Direction of adjustment.
    pub adjustment: Adjustment,
}

impl Recommendation {
    /// Recommendation for a metric, `None` if the deck is balanced.
    #[must_use]
    pub fn for_metric(metric: &BalanceMetric) -> Option<Self> {
        let adjustment = match metric.classification {
            Classification::Overpowered => Adjustment::Weaken,
            Classification::Underpowered => Adjustment::Strengthen,
            Classification::Balanced => return None,
        };
        Some(Self {
            deck: metric.deck.clone(),
            win_rate: metric.win_rate,
            classification: metric.classification,
            adjustment,
        })
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = match self.adjustment {
            Adjustment::Weaken => "reduce power or raise cost",
            Adjustment::Strengthen => "raise power or reduce cost",
        };
        write!(
            f,
            "{}: win rate {:.1}% ({}), {}",
            self.deck,
            self.win_rate * 100.0,
            self.classification,
            direction
        )
    }
}
