//! Tests for the generate -> filter -> watchlist pipeline
//!
//! Exercises the public screener API end to end across many seeds.

use anyhow::Result;
use std::collections::HashSet;
use token_screener::screener::{
    AttributeRanges, FilterCriteria, FilterEngine, RenderPipeline, ScreenerBuilder, SeedPolicy,
    TokenGenerator, WatchlistAdd,
};
use token_screener::{Chain, ScoreWeights, SubScores, TokenRecord};

fn all_chains() -> HashSet<Chain> {
    Chain::all().into_iter().collect()
}

#[test]
fn test_generated_records_hold_invariants() {
    let pipeline = RenderPipeline::default();
    let ranges = AttributeRanges::default();

    for seed in 0..100 {
        let cycle = pipeline.run_with_seed(FilterCriteria::default(), seed);

        for record in &cycle.dataset {
            let expected = 0.3 * record.buzz_score() + 0.3 * record.safety_score() + 0.4 * record.momentum_score();
            assert!((record.total_score() - expected).abs() < 1e-9);

            assert!((5.0..=10.0).contains(&record.buzz_score()));
            assert!((4.0..=10.0).contains(&record.safety_score()));
            assert!((5.0..=10.0).contains(&record.momentum_score()));
            assert!((30_000.0..=150_000.0).contains(&record.liquidity()));
            assert!((500..=5_000).contains(&record.holders()));
            assert!((50_000.0..=400_000.0).contains(&record.volume_24h()));
            assert!(ranges.liquidity.contains(record.liquidity()));
        }

        assert!(cycle
            .dataset
            .windows(2)
            .all(|pair| pair[0].total_score() >= pair[1].total_score()));

        let unique: HashSet<_> = cycle.dataset.iter().map(|r| r.token()).collect();
        assert_eq!(unique.len(), cycle.dataset.len());
    }
}

#[test]
fn test_filter_floors_and_ceiling() {
    let pipeline = RenderPipeline::default();
    let floors = FilterCriteria {
        min_liquidity: 0.0,
        min_volume: 0.0,
        chains: all_chains(),
        min_score: 0.0,
    };

    for seed in 0..20 {
        let cycle = pipeline.run_with_seed(floors.clone(), seed);
        assert_eq!(cycle.filtered, cycle.dataset);

        let ceiling = FilterCriteria { min_score: 10.1, ..floors.clone() };
        assert!(FilterEngine::apply(&cycle.dataset, &ceiling).is_empty());
    }
}

#[test]
fn test_catfi_example_scenario() {
    // Sub-scores chosen so the total is 8.2.
    let catfi = TokenRecord::new(
        "CatFi",
        Chain::Solana,
        120_000.0,
        2_000,
        200_000.0,
        SubScores { buzz: 8.0, safety: 8.0, momentum: 8.5 },
        &ScoreWeights::default(),
    );
    assert!((catfi.total_score() - 8.2).abs() < 1e-9);
    let dataset = vec![catfi];

    let mut criteria = FilterCriteria {
        min_liquidity: 50_000.0,
        min_volume: 100_000.0,
        chains: [Chain::Solana].into_iter().collect(),
        min_score: 7.5,
    };
    let view = FilterEngine::apply(&dataset, &criteria);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].token(), "CatFi");

    criteria.chains = [Chain::Ethereum].into_iter().collect();
    assert!(FilterEngine::apply(&dataset, &criteria).is_empty());
}

#[test]
fn test_generator_catalog_is_stable_across_seeds() {
    let generator = TokenGenerator::default();
    let names = |seed| {
        let mut names: Vec<String> = generator.generate(seed).iter().map(|r| r.token().to_string()).collect();
        names.sort();
        names
    };
    assert_eq!(names(1), names(2));
}

#[tokio::test]
async fn test_watchlist_survives_regeneration() -> Result<()> {
    let screener = ScreenerBuilder::new().build()?;
    assert_eq!(screener.config().seed, SeedPolicy::Entropy);

    let (handle, created) = screener.open_session(None).await?;
    assert!(created);
    let id = {
        let mut session = handle.lock().await;
        screener.render(&mut session, FilterCriteria::default()).await;
        assert_eq!(screener.add_to_watchlist(&mut session, "WifHat").await, WatchlistAdd::Added);
        assert_eq!(screener.add_to_watchlist(&mut session, "WifHat").await, WatchlistAdd::AlreadyPresent);
        assert_eq!(screener.add_to_watchlist(&mut session, "Ghost").await, WatchlistAdd::UnknownToken);
        session.id
    };

    for _ in 0..5 {
        let (handle, created) = screener.open_session(Some(id)).await?;
        assert!(!created);
        let mut session = handle.lock().await;

        let cycle = screener.render(&mut session, FilterCriteria::default()).await;
        let view = screener.watchlist_view(&session);

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].token(), "WifHat");
        assert!(cycle.dataset.contains(&view[0]));
    }

    Ok(())
}
