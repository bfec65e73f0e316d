//! Token Screener - synthetic token market dashboard
//!
//! Generates a synthetic token market, filters it by liquidity, volume, chain
//! and composite score, and keeps a watchlist per browser session.

pub mod types;
pub mod screener;
pub mod dashboard;

// Re-export main types for convenience
pub use types::{Chain, ScoreWeights, SubScores, TokenRecord};
pub use screener::{FilterCriteria, Screener, ScreenerBuilder, ScreenerConfig};
