//! Command-line batch invocation.
//!
//! ```no_run
//! use std::io;
//! let args = ["ccg-balance", "--iterations", "20", "--seed", "7", "--no-export"];
//! let code = ccg_balance::cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn, Level};

use crate::ai::{Difficulty, DifficultyConfig};
use crate::batch::{write_summary, BatchConfig, BatchReport, BatchRunner};
use crate::cards::{standard_catalog, CardCatalog};
use crate::core::Seat;
use crate::deck::{standard_presets, Deck, DeckBuilder, DeckSpec, MissingCardPolicy};
use crate::error::SimError;

/// Batch completed; skipped matches and export warnings still count.
pub const SUCCESS: i32 = 0;
/// Catalog, deck list, or deck building failed.
pub const INPUT_ERROR: i32 = 1;
/// Command-line arguments were rejected.
pub const USAGE_ERROR: i32 = 2;

/// Run every deck against every other deck and report balance.
#[derive(Debug, Parser)]
#[command(name = "ccg-balance", version, about)]
pub struct Cli {
    /// Matches per ordered deck pairing.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: u32,

    /// Batch seed; every match seed is derived from it.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Difficulty for both seats (easy, medium, hard).
    #[arg(long, default_value = "easy")]
    pub difficulty: Difficulty,

    /// Override the first seat's difficulty.
    #[arg(long)]
    pub first_difficulty: Option<Difficulty>,

    /// Override the second seat's difficulty.
    #[arg(long)]
    pub second_difficulty: Option<Difficulty>,

    /// JSON card catalog; the built-in catalog is used otherwise.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// JSON deck list; the built-in presets are used otherwise.
    #[arg(long)]
    pub decks: Option<PathBuf>,

    /// Replace unknown card names with this card instead of failing.
    #[arg(long, value_name = "NAME")]
    pub substitute_missing: Option<String>,

    /// Directory for the JSON export.
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Skip writing the JSON export.
    #[arg(long)]
    pub no_export: bool,

    /// More log output (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Log level selected by `-v`/`-q`.
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Batch configuration for these arguments.
    pub fn batch_config(&self) -> BatchConfig {
        let tier = |seat_tier: Option<Difficulty>| {
            DifficultyConfig::for_tier(seat_tier.unwrap_or(self.difficulty))
        };
        BatchConfig::new()
            .with_iterations(self.iterations)
            .with_seed(self.seed)
            .with_seat_difficulty(Seat::First, tier(self.first_difficulty))
            .with_seat_difficulty(Seat::Second, tier(self.second_difficulty))
    }

    fn missing_card_policy(&self) -> MissingCardPolicy {
        match &self.substitute_missing {
            Some(filler) => MissingCardPolicy::Substitute { filler: filler.clone() },
            None => MissingCardPolicy::FailFast,
        }
    }
}

/// Parse `args` and run the batch. Returns the process exit code.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
    match Cli::try_parse_from(&argv) {
        Ok(cli) => execute(&cli, out, err),
        Err(e) => {
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return USAGE_ERROR;
                    }
                    SUCCESS
                }
                _ => {
                    let _ = write!(err, "{}", e);
                    USAGE_ERROR
                }
            }
        }
    }
}

/// Run the batch for already parsed arguments.
pub fn execute(cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    let catalog = match load_catalog(cli.catalog.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => return input_error(err, "card catalog", &e),
    };
    let decks = match load_decks(cli, &catalog) {
        Ok(decks) => decks,
        Err(e) => return input_error(err, "deck list", &e),
    };

    let config = cli.batch_config();
    let runner = BatchRunner::new(&catalog, config.clone());
    let outcome = match runner.run(&decks) {
        Ok(outcome) => outcome,
        Err(e) => return input_error(err, "batch", &e),
    };

    if let Err(e) = write_summary(out, &outcome) {
        let _ = writeln!(err, "Error: failed to write summary: {}", e);
    }

    if !cli.no_export {
        let report = BatchReport::new(&outcome, &config);
        match report.write_to_dir(&cli.results_dir) {
            Ok(path) => {
                info!(path = %path.display(), "export written");
                let _ = writeln!(out, "\nResults written to {}", path.display());
            }
            Err(e) => {
                warn!(error = %e, "export skipped");
                let _ = writeln!(err, "Warning: {}", e);
            }
        }
    }

    SUCCESS
}

fn input_error(err: &mut dyn Write, what: &str, e: &SimError) -> i32 {
    let _ = writeln!(err, "Error: {}: {}", what, e);
    INPUT_ERROR
}

fn load_catalog(path: Option<&Path>) -> Result<CardCatalog, SimError> {
    match path {
        Some(path) => CardCatalog::from_json(BufReader::new(File::open(path)?)),
        None => Ok(standard_catalog()),
    }
}

fn load_decks(cli: &Cli, catalog: &CardCatalog) -> Result<Vec<Deck>, SimError> {
    let specs = match &cli.decks {
        Some(path) => DeckSpec::load_all(BufReader::new(File::open(path)?))?,
        None => standard_presets(),
    };
    DeckBuilder::new(catalog)
        .with_policy(cli.missing_card_policy())
        .build_all(&specs)
}
