//! Screener module - synthetic token data, filtering and session watchlists.
//!
//! The pipeline is generate -> filter -> render. Each stage is a plain value
//! transformation; only the session store and the metrics collector carry
//! state between requests.

pub mod types;
pub mod generator;
pub mod filter;
pub mod watchlist;
pub mod pipeline;
pub mod session;
pub mod metrics;
pub mod service;

pub use types::{
    AttributeRanges, CatalogEntry, Dataset, FilterCriteria, ScreenerConfig, SeedPolicy,
    SliderSpec, SliderSpecs, ValueRange,
};
pub use generator::{TokenCatalog, TokenGenerator};
pub use filter::FilterEngine;
pub use watchlist::{Watchlist, WatchlistAdd};
pub use pipeline::{RenderCycle, RenderPipeline};
pub use session::{
    InMemorySessionStore, SessionContext, SessionHandle, SessionId, SessionStorage,
};
pub use metrics::{MetricsSnapshot, ScreenerMetricsCollector};
pub use service::Screener;

use crate::types::ScoreWeights;

/// Screener builder for convenient construction with sensible defaults.
pub struct ScreenerBuilder {
    config: ScreenerConfig,
}

impl ScreenerBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: ScreenerConfig::default(),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ScreenerConfig) -> Self {
        Self { config }
    }

    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Fix the generator seed so every render produces the same dataset.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = SeedPolicy::Fixed(seed);
        self
    }

    pub fn with_session_idle(mut self, seconds: u64) -> Self {
        self.config.session_idle_seconds = seconds;
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: u64) -> Self {
        self.config.max_sessions = max_sessions;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn with_ranges(mut self, ranges: AttributeRanges) -> Self {
        self.config.ranges = ranges;
        self
    }

    pub fn with_sliders(mut self, sliders: SliderSpecs) -> Self {
        self.config.sliders = sliders;
        self
    }

    /// Replace the built-in token catalog.
    pub fn with_catalog(mut self, entries: Vec<CatalogEntry>) -> Self {
        self.config.catalog = Some(entries);
        self
    }

    pub fn build_config(self) -> ScreenerConfig {
        self.config
    }

    /// Validate the configuration and build the screener.
    pub fn build(self) -> anyhow::Result<Screener> {
        Screener::new(self.config)
    }
}

impl Default for ScreenerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
