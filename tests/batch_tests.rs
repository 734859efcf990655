//! Batch runner, balance metrics and export tests.

use std::fs;

use ccg_balance::ai::{Agent, Difficulty, DifficultyConfig, UniformAgent};
use ccg_balance::batch::{
    Adjustment, BatchConfig, BatchReport, BatchRunner, Classification, Thresholds,
};
use ccg_balance::cards::standard_catalog;
use ccg_balance::core::{Action, GameRng, MatchState, Seat, SeatMap};
use ccg_balance::deck::{standard_presets, Deck, DeckBuilder, DeckSpec};
use ccg_balance::error::SimError;

fn lopsided_decks() -> Vec<Deck> {
    let catalog = standard_catalog();
    let builder = DeckBuilder::new(&catalog);
    vec![
        builder.build(&DeckSpec::preset("Cabinet", ["Prime Minister"; 10])).unwrap(),
        builder.build(&DeckSpec::preset("Backbench", ["Backbencher"; 10])).unwrap(),
    ]
}

struct Failing;

impl Agent for Failing {
    fn choose(
        &mut self,
        _state: &MatchState,
        _seat: Seat,
        _rng: &mut GameRng,
    ) -> Result<Action, SimError> {
        Err(SimError::InvalidInput("evaluator gave up".into()))
    }
}

struct Panicky;

impl Agent for Panicky {
    fn choose(
        &mut self,
        _state: &MatchState,
        _seat: Seat,
        _rng: &mut GameRng,
    ) -> Result<Action, SimError> {
        panic!("evaluator exploded")
    }
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn test_classification_boundaries_are_strict() {
    let t = Thresholds::default();

    assert_eq!(t.classify(0.6), Classification::Balanced);
    assert_eq!(t.classify(0.4), Classification::Balanced);
    assert_eq!(t.classify(0.61), Classification::Overpowered);
    assert_eq!(t.classify(0.39), Classification::Underpowered);
}

#[test]
fn test_lopsided_decks_are_flagged() {
    let catalog = standard_catalog();
    let config = BatchConfig::new()
        .with_iterations(100)
        .with_difficulty(DifficultyConfig::for_tier(Difficulty::Easy));
    let outcome = BatchRunner::new(&catalog, config).run(&lopsided_decks()).unwrap();

    let strong = outcome.metric("Cabinet").unwrap();
    let weak = outcome.metric("Backbench").unwrap();
    assert_eq!(strong.games_played, 200);
    assert_eq!(strong.classification, Classification::Overpowered);
    assert_eq!(weak.classification, Classification::Underpowered);
    assert!(strong.win_rate > 0.6);
    assert!(weak.win_rate < 0.4);

    assert_eq!(outcome.recommendations.len(), 2);
    let cabinet = outcome.recommendations.iter().find(|r| r.deck == "Cabinet").unwrap();
    assert_eq!(cabinet.adjustment, Adjustment::Weaken);
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn test_every_ordered_pairing_is_played() {
    let catalog = standard_catalog();
    let decks = DeckBuilder::new(&catalog).build_all(&standard_presets()).unwrap();
    let config = BatchConfig::new().with_iterations(3);
    let outcome = BatchRunner::new(&catalog, config).run(&decks).unwrap();

    let n = decks.len();
    assert_eq!(outcome.pairings.len(), n * (n - 1));
    assert_eq!(outcome.total_games(), n * (n - 1) * 3);
    assert!(outcome.failures.is_empty());

    let wins: u32 = outcome.metrics.iter().map(|m| m.wins).sum();
    assert_eq!(wins as usize, outcome.total_games());
    for m in &outcome.metrics {
        assert_eq!(m.wins + m.losses, m.games_played);
        assert_eq!(m.games_played as usize, 2 * (n - 1) * 3);
        assert!(m.average_round_count >= 2.0);
    }
    for p in &outcome.pairings {
        assert_ne!(p.first, p.second);
        assert_eq!(p.first_wins + p.second_wins, p.games);
    }
}

#[test]
fn test_batch_is_reproducible() {
    let catalog = standard_catalog();
    let decks = DeckBuilder::new(&catalog).build_all(&standard_presets()).unwrap();
    let config = BatchConfig::new()
        .with_iterations(2)
        .with_seed(77)
        .with_difficulty(DifficultyConfig::for_tier(Difficulty::Medium));

    let one = BatchRunner::new(&catalog, config.clone()).run(&decks).unwrap();
    let two = BatchRunner::new(&catalog, config).run(&decks).unwrap();
    assert_eq!(one, two);
}

#[test]
fn test_match_seeds_are_distinct() {
    let config = BatchConfig::new().with_seed(5);
    let mut seeds: Vec<u64> = (0..6)
        .flat_map(|p| (0..10).map(move |i| (p, i)))
        .map(|(p, i)| config.match_seed(p, i))
        .collect();
    let total = seeds.len();
    seeds.sort_unstable();
    seeds.dedup();
    assert_eq!(seeds.len(), total);
}

#[test]
fn test_single_deck_is_rejected() {
    let catalog = standard_catalog();
    let decks = lopsided_decks();
    let result = BatchRunner::new(&catalog, BatchConfig::new()).run(&decks[..1]);
    assert!(matches!(result, Err(SimError::InvalidInput(_))));
}

// =============================================================================
// Failure containment
// =============================================================================

#[test]
fn test_failed_matches_are_skipped() {
    let catalog = standard_catalog();
    let decks = lopsided_decks();
    let runner = BatchRunner::new(&catalog, BatchConfig::new().with_iterations(5));

    let outcome = runner
        .run_with(&decks, |ctx| {
            let first: Box<dyn Agent> = match (ctx.pairing, ctx.iteration) {
                (0, 1) => Box::new(Failing),
                (1, 3) => Box::new(Panicky),
                _ => Box::new(UniformAgent),
            };
            SeatMap::from_pair(first, Box::new(UniformAgent) as Box<dyn Agent>)
        })
        .unwrap();

    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(outcome.total_games(), 8);
    assert_eq!(outcome.pairings[0].failures, 1);
    assert_eq!(outcome.pairings[1].failures, 1);

    let panicked = outcome.failures.iter().find(|f| f.iteration == 3).unwrap();
    assert!(panicked.reason.contains("evaluator exploded"));
    assert_eq!(panicked.seed, runner.config().match_seed(1, 3));

    let games: u32 = outcome.metrics.iter().map(|m| m.games_played).sum();
    assert_eq!(games, 16);
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_creates_directory_and_round_trips() {
    let catalog = standard_catalog();
    let config = BatchConfig::new().with_iterations(4);
    let outcome = BatchRunner::new(&catalog, config.clone()).run(&lopsided_decks()).unwrap();
    let report = BatchReport::new(&outcome, &config);

    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("nested").join("results");
    let path = report.write_to_dir(&results).unwrap();

    assert!(path.starts_with(&results));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("balance_") && name.ends_with(".json"));

    let loaded: BatchReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.timestamp, report.timestamp);
    assert_eq!(loaded.total_games, 8);
    assert_eq!(loaded.matches, outcome.matches);
    assert_eq!(loaded.metrics, outcome.metrics);
    assert_eq!(loaded.pairings, outcome.pairings);
    assert_eq!(loaded.recommendations.len(), outcome.recommendations.len());
}

#[test]
fn test_export_failure_is_reported() {
    let catalog = standard_catalog();
    let config = BatchConfig::new().with_iterations(1);
    let outcome = BatchRunner::new(&catalog, config.clone()).run(&lopsided_decks()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("blocked");
    fs::write(&blocked, "not a directory").unwrap();

    let result = BatchReport::new(&outcome, &config).write_to_dir(&blocked);
    assert!(matches!(result, Err(SimError::ExportWriteFailure { .. })));
    assert_eq!(outcome.total_games(), 2);
}

#[test]
fn test_seat_difficulties_are_independent() {
    let config = BatchConfig::new()
        .with_seat_difficulty(Seat::Second, DifficultyConfig::for_tier(Difficulty::Hard));

    assert_eq!(config.difficulty[Seat::First].tier, Difficulty::Easy);
    assert_eq!(config.difficulty[Seat::Second].tier, Difficulty::Hard);
}
