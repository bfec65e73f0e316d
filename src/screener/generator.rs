//! Synthetic token data generator.
//!
//! Produces one record per catalog entry with every numeric attribute drawn
//! independently and uniformly from its configured range.

use crate::screener::types::{AttributeRanges, CatalogEntry, Dataset};
use crate::types::{Chain, ScoreWeights, SubScores, TokenRecord};
use anyhow::Result;
use nonempty::NonEmpty;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, instrument};

const DEFAULT_CATALOG: [(&str, Chain); 12] = [
    ("PepeAI", Chain::Ethereum),
    ("CatFi", Chain::Solana),
    ("DogeX", Chain::Bsc),
    ("MoonInu", Chain::Ethereum),
    ("BonkFi", Chain::Solana),
    ("ShibaPro", Chain::Bsc),
    ("FrogKing", Chain::Ethereum),
    ("WifHat", Chain::Solana),
    ("BabyFloki", Chain::Bsc),
    ("GigaChad", Chain::Ethereum),
    ("SolCat", Chain::Solana),
    ("PandaSwap", Chain::Bsc),
];

/// Non-empty list of candidate tokens with unique names.
#[derive(Debug, Clone)]
pub struct TokenCatalog {
    entries: NonEmpty<CatalogEntry>,
}

impl TokenCatalog {
    /// Validate and wrap a custom catalog.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let entries = NonEmpty::from_vec(entries)
            .ok_or_else(|| anyhow::anyhow!("token catalog cannot be empty"))?;

        let mut seen = HashSet::new();
        for entry in entries.iter() {
            if entry.token.trim().is_empty() {
                anyhow::bail!("token catalog contains an empty name");
            }
            if !seen.insert(entry.token.as_str()) {
                anyhow::bail!("duplicate token in catalog: {}", entry.token);
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &NonEmpty<CatalogEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: `NonEmpty` guarantees at least one entry.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for TokenCatalog {
    fn default() -> Self {
        let head = CatalogEntry {
            token: DEFAULT_CATALOG[0].0.to_string(),
            chain: DEFAULT_CATALOG[0].1,
        };
        let tail = DEFAULT_CATALOG[1..]
            .iter()
            .map(|(token, chain)| CatalogEntry {
                token: token.to_string(),
                chain: *chain,
            })
            .collect();
        Self {
            entries: NonEmpty { head, tail },
        }
    }
}

/// Draws a fresh dataset from the catalog.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    catalog: TokenCatalog,
    ranges: AttributeRanges,
    weights: ScoreWeights,
}

impl TokenGenerator {
    pub fn new(catalog: TokenCatalog, ranges: AttributeRanges, weights: ScoreWeights) -> Self {
        Self {
            catalog,
            ranges,
            weights,
        }
    }

    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Generate a dataset from `seed`. The same seed always yields the same dataset.
    #[instrument(skip(self))]
    pub fn generate(&self, seed: u64) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_with(&mut rng)
    }

    /// Generate a dataset sorted descending by total score.
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Dataset {
        let r = &self.ranges;
        let mut dataset: Dataset = self
            .catalog
            .entries()
            .iter()
            .map(|entry| {
                let scores = SubScores {
                    buzz: rng.gen_range(r.buzz.as_inclusive()),
                    safety: rng.gen_range(r.safety.as_inclusive()),
                    momentum: rng.gen_range(r.momentum.as_inclusive()),
                };
                TokenRecord::new(
                    entry.token.clone(),
                    entry.chain,
                    rng.gen_range(r.liquidity.as_inclusive()),
                    rng.gen_range(r.holders.as_inclusive()),
                    rng.gen_range(r.volume_24h.as_inclusive()),
                    scores,
                    &self.weights,
                )
            })
            .collect();

        dataset.sort_by(|a, b| b.total_score().total_cmp(&a.total_score()));

        debug!("Generated {} token records", dataset.len());
        dataset
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new(
            TokenCatalog::default(),
            AttributeRanges::default(),
            ScoreWeights::default(),
        )
    }
}
