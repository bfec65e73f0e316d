//! Configuration and shared types for the screener pipeline.

use crate::types::{Chain, ScoreWeights, TokenId, TokenRecord};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::ops::RangeInclusive;

/// Ordered sequence of records, sorted descending by total score.
pub type Dataset = Vec<TokenRecord>;

/// Inclusive numeric range an attribute is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd> ValueRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn as_inclusive(&self) -> RangeInclusive<T> {
        self.min..=self.max
    }

    fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl ValueRange<f64> {
    /// Both bounds are finite, non-negative and ordered.
    fn is_sampleable(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.is_ordered()
    }
}

/// Ranges every generated attribute is drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRanges {
    pub liquidity: ValueRange<f64>,
    pub holders: ValueRange<u32>,
    pub volume_24h: ValueRange<f64>,
    pub buzz: ValueRange<f64>,
    pub safety: ValueRange<f64>,
    pub momentum: ValueRange<f64>,
}

impl Default for AttributeRanges {
    fn default() -> Self {
        Self {
            liquidity: ValueRange::new(30_000.0, 150_000.0),
            holders: ValueRange::new(500, 5_000),
            volume_24h: ValueRange::new(50_000.0, 400_000.0),
            buzz: ValueRange::new(5.0, 10.0),
            safety: ValueRange::new(4.0, 10.0),
            momentum: ValueRange::new(5.0, 10.0),
        }
    }
}

/// Bounds, step and default of a slider control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl SliderSpec {
    pub const fn new(min: f64, max: f64, step: f64, default: f64) -> Self {
        Self { min, max, step, default }
    }

    /// Clamp `value` into the slider bounds and snap it to the nearest step.
    /// Non-finite input falls back to the default.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // Six decimals is finer than any step we render; it strips float noise like 7.500000000000001.
        ((snapped * 1e6).round() / 1e6).clamp(self.min, self.max)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.default.is_finite()) {
            anyhow::bail!("slider {} bounds must be finite", name);
        }
        if !(self.step > 0.0 && self.step.is_finite()) {
            anyhow::bail!("slider {} must have a positive step", name);
        }
        if !(self.min <= self.default && self.default <= self.max) {
            anyhow::bail!(
                "slider {} default {} outside [{}, {}]",
                name,
                self.default,
                self.min,
                self.max
            );
        }
        Ok(())
    }
}

/// Slider controls exposed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderSpecs {
    pub min_liquidity: SliderSpec,
    pub min_volume: SliderSpec,
    pub min_score: SliderSpec,
}

impl Default for SliderSpecs {
    fn default() -> Self {
        Self {
            min_liquidity: SliderSpec::new(0.0, 150_000.0, 10_000.0, 50_000.0),
            min_volume: SliderSpec::new(0.0, 400_000.0, 25_000.0, 100_000.0),
            min_score: SliderSpec::new(0.0, 10.0, 0.1, 7.5),
        }
    }
}

/// Four independent constraints combined by logical AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub min_liquidity: f64,
    pub min_volume: f64,
    pub chains: HashSet<Chain>,
    pub min_score: f64,
}

impl FilterCriteria {
    /// Criteria at the slider defaults with every chain allowed.
    pub fn from_sliders(sliders: &SliderSpecs) -> Self {
        Self {
            min_liquidity: sliders.min_liquidity.default,
            min_volume: sliders.min_volume.default,
            chains: Chain::all().into_iter().collect(),
            min_score: sliders.min_score.default,
        }
    }

    /// Same criteria with the numeric values forced onto the slider grid.
    pub fn snapped(mut self, sliders: &SliderSpecs) -> Self {
        self.min_liquidity = sliders.min_liquidity.snap(self.min_liquidity);
        self.min_volume = sliders.min_volume.snap(self.min_volume);
        self.min_score = sliders.min_score.snap(self.min_score);
        self
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::from_sliders(&SliderSpecs::default())
    }
}

/// How each render cycle obtains its seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// Fresh seed per render; every interaction re-randomizes the table.
    #[default]
    Entropy,
    /// Same seed every render; the table is reproducible.
    Fixed(u64),
}

impl SeedPolicy {
    pub fn next_seed(&self) -> u64 {
        match self {
            SeedPolicy::Entropy => rand::random(),
            SeedPolicy::Fixed(seed) => *seed,
        }
    }
}

/// Catalog entry: a token name and the chain it lives on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub token: TokenId,
    pub chain: Chain,
}

/// Screener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Dashboard listen address
    pub listen_addr: String,
    /// Seed policy for the generator
    pub seed: SeedPolicy,
    /// Idle time after which a session is dropped
    pub session_idle_seconds: u64,
    /// Upper bound on live sessions
    pub max_sessions: u64,
    /// Total score weights
    pub weights: ScoreWeights,
    /// Generation ranges
    pub ranges: AttributeRanges,
    /// Dashboard slider controls
    pub sliders: SliderSpecs,
    /// Custom token catalog; `None` uses the built-in one
    pub catalog: Option<Vec<CatalogEntry>>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8501".to_string(),
            seed: SeedPolicy::Entropy,
            session_idle_seconds: 1_800,
            max_sessions: 10_000,
            weights: ScoreWeights::default(),
            ranges: AttributeRanges::default(),
            sliders: SliderSpecs::default(),
            catalog: None,
        }
    }
}

impl ScreenerConfig {
    /// Load overrides from the environment (and `.env` if present) on top of the defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup` on top of the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("SCREENER_LISTEN") {
            config.listen_addr = addr;
        }
        if let Some(seed) = lookup("SCREENER_SEED") {
            let seed = seed
                .parse::<u64>()
                .with_context(|| format!("SCREENER_SEED is not a u64: {}", seed))?;
            config.seed = SeedPolicy::Fixed(seed);
        }
        if let Some(idle) = lookup("SCREENER_SESSION_IDLE_SECS") {
            config.session_idle_seconds = idle
                .parse()
                .with_context(|| format!("SCREENER_SESSION_IDLE_SECS is not a number: {}", idle))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .with_context(|| format!("invalid listen address: {}", self.listen_addr))
    }

    /// Reject configurations the generator or dashboard cannot honour.
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.session_idle_seconds == 0 {
            anyhow::bail!("session_idle_seconds must be positive");
        }
        if self.max_sessions == 0 {
            anyhow::bail!("max_sessions must be positive");
        }

        let w = &self.weights;
        for weight in [w.buzz, w.safety, w.momentum] {
            if !weight.is_finite() || weight < 0.0 {
                anyhow::bail!("score weights must be finite and non-negative");
            }
        }

        let r = &self.ranges;
        let float_ranges = [
            ("liquidity", r.liquidity),
            ("volume_24h", r.volume_24h),
            ("buzz", r.buzz),
            ("safety", r.safety),
            ("momentum", r.momentum),
        ];
        for (name, range) in float_ranges {
            if !range.is_sampleable() {
                anyhow::bail!("range {} must be finite and satisfy 0 <= min <= max", name);
            }
        }
        if !r.holders.is_ordered() {
            anyhow::bail!("range holders must satisfy min <= max");
        }

        self.sliders.min_liquidity.validate("min_liquidity")?;
        self.sliders.min_volume.validate("min_volume")?;
        self.sliders.min_score.validate("min_score")?;

        if let Some(entries) = &self.catalog {
            crate::screener::generator::TokenCatalog::from_entries(entries.clone())?;
        }

        Ok(())
    }
}
