//! Batch export document and human-readable summary.
//!
//! The export is one pretty-printed JSON document per batch, written to
//! `<results_dir>/balance_<YYYYmmdd_HHMMSS>.json`, with a numeric suffix
//! when that name is taken. The directory is created if missing. Writing is
//! the last step of a batch; a failure is returned as
//! `SimError::ExportWriteFailure` and never touches the computed metrics.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::{BalanceMetric, PairingSummary, Recommendation};
use super::runner::{BatchConfig, BatchOutcome, MatchFailure, MatchRecord};
use crate::error::SimError;

const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Machine-readable batch export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Creation time, RFC 3339.
    pub timestamp: String,
    /// Batch seed.
    pub base_seed: u64,
    /// Matches per ordered pairing.
    pub iterations_per_pairing: u32,
    /// Completed matches.
    pub total_games: usize,
    /// Skipped matches.
    pub failed_matches: usize,
    /// Every completed match.
    pub matches: Vec<MatchRecord>,
    /// Every skipped match.
    pub failures: Vec<MatchFailure>,
    /// Per-deck metrics.
    pub metrics: Vec<BalanceMetric>,
    /// Head-to-head summaries.
    pub pairings: Vec<PairingSummary>,
    /// Suggested adjustments, one line each.
    pub recommendations: Vec<String>,
    #[serde(skip)]
    file_stamp: String,
}

impl BatchReport {
    /// Build a report stamped with the current time.
    #[must_use]
    pub fn new(outcome: &BatchOutcome, config: &BatchConfig) -> Self {
        Self::at(outcome, config, Utc::now())
    }

    /// Build a report stamped with `time`.
    #[must_use]
    pub fn at(outcome: &BatchOutcome, config: &BatchConfig, time: DateTime<Utc>) -> Self {
        Self {
            timestamp: time.to_rfc3339(),
            base_seed: config.base_seed,
            iterations_per_pairing: config.iterations_per_pairing,
            total_games: outcome.total_games(),
            failed_matches: outcome.failures.len(),
            matches: outcome.matches.clone(),
            failures: outcome.failures.clone(),
            metrics: outcome.metrics.clone(),
            pairings: outcome.pairings.clone(),
            recommendations: outcome
                .recommendations
                .iter()
                .map(Recommendation::to_string)
                .collect(),
            file_stamp: time.format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// File name for this report.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("balance_{}.json", self.file_stamp)
    }

    /// Write the report into `dir`, creating it if needed.
    ///
    /// An existing file is never overwritten: when the stamped name is
    /// taken, a `_1`, `_2`, ... suffix is added. Returns the path written.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, SimError> {
        let fail = |path: &Path, reason: String| SimError::ExportWriteFailure {
            path: path.display().to_string(),
            reason,
        };

        fs::create_dir_all(dir).map_err(|e| fail(dir, e.to_string()))?;
        let json = serde_json::to_string_pretty(self).map_err(|e| fail(dir, e.to_string()))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = dir.join(self.candidate_name(attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(json.as_bytes()).map_err(|e| fail(&path, e.to_string()))?;
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(fail(&path, e.to_string())),
            }
        }
        Err(fail(
            &dir.join(self.file_name()),
            format!("{} files with this stamp already exist", MAX_NAME_ATTEMPTS),
        ))
    }

    fn candidate_name(&self, attempt: u32) -> String {
        if attempt == 0 {
            self.file_name()
        } else {
            format!("balance_{}_{}.json", self.file_stamp, attempt)
        }
    }
}

/// Write the per-deck summary table, pairings, and recommendations.
pub fn write_summary(out: &mut (impl Write + ?Sized), outcome: &BatchOutcome) -> io::Result<()> {
    writeln!(
        out,
        "Balance summary ({} games, {} skipped)",
        outcome.total_games(),
        outcome.failures.len()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<20} {:>6} {:>6} {:>6} {:>8} {:>7}  {}",
        "Deck", "Games", "Wins", "Losses", "Win %", "Rounds", "Class"
    )?;
    for m in &outcome.metrics {
        writeln!(
            out,
            "{:<20} {:>6} {:>6} {:>6} {:>7.1}% {:>7.2}  {}",
            m.deck,
            m.games_played,
            m.wins,
            m.losses,
            m.win_rate * 100.0,
            m.average_round_count,
            m.classification
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Head to head (first seat vs second seat)")?;
    for p in &outcome.pairings {
        write!(out, "  {} vs {}: {}-{}", p.first, p.second, p.first_wins, p.second_wins)?;
        if p.failures > 0 {
            write!(out, " ({} skipped)", p.failures)?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    if outcome.recommendations.is_empty() {
        writeln!(out, "All decks balanced.")?;
    } else {
        writeln!(out, "Recommendations")?;
        for r in &outcome.recommendations {
            writeln!(out, "  {}", r)?;
        }
    }
    Ok(())
}
