//! Core types and data structures for the token screener.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token identifier. Names are the only identity that survives a regeneration.
pub type TokenId = String;

/// Chain a token trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    Ethereum,
    Solana,
    #[serde(rename = "BSC")]
    Bsc,
}

impl Chain {
    /// Display name used in tables and form values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Solana => "Solana",
            Chain::Bsc => "BSC",
        }
    }

    /// Returns all supported chains in display order.
    pub fn all() -> Vec<Chain> {
        vec![Chain::Ethereum, Chain::Solana, Chain::Bsc]
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ethereum" => Ok(Chain::Ethereum),
            "Solana" => Ok(Chain::Solana),
            "BSC" => Ok(Chain::Bsc),
            other => Err(anyhow::anyhow!("unknown chain: {}", other)),
        }
    }
}

/// The three sub-scores a token is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    /// Social hype
    pub buzz: f64,
    /// Contract and liquidity safety
    pub safety: f64,
    /// Price and volume trend
    pub momentum: f64,
}

/// Weights applied to the sub-scores to form the total score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreWeights {
    pub buzz: f64,
    pub safety: f64,
    pub momentum: f64,
}

impl ScoreWeights {
    /// Weighted sum of the sub-scores.
    pub fn total(&self, scores: &SubScores) -> f64 {
        self.buzz * scores.buzz + self.safety * scores.safety + self.momentum * scores.momentum
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            buzz: 0.3,
            safety: 0.3,
            momentum: 0.4,
        }
    }
}

/// One row of synthetic market data.
///
/// Fields are private so the total score can only be produced from the
/// sub-scores it is derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRecord {
    token: TokenId,
    chain: Chain,
    liquidity: f64,
    holders: u32,
    volume_24h: f64,
    #[serde(flatten)]
    scores: SubScores,
    total_score: f64,
}

impl TokenRecord {
    /// Build a record, deriving its total score from `weights`.
    pub fn new(
        token: impl Into<TokenId>,
        chain: Chain,
        liquidity: f64,
        holders: u32,
        volume_24h: f64,
        scores: SubScores,
        weights: &ScoreWeights,
    ) -> Self {
        Self {
            token: token.into(),
            chain,
            liquidity,
            holders,
            volume_24h,
            total_score: weights.total(&scores),
            scores,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn liquidity(&self) -> f64 {
        self.liquidity
    }

    pub fn holders(&self) -> u32 {
        self.holders
    }

    pub fn volume_24h(&self) -> f64 {
        self.volume_24h
    }

    pub fn scores(&self) -> &SubScores {
        &self.scores
    }

    pub fn buzz_score(&self) -> f64 {
        self.scores.buzz
    }

    pub fn safety_score(&self) -> f64 {
        self.scores.safety
    }

    pub fn momentum_score(&self) -> f64 {
        self.scores.momentum
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    /// Copy of this record with new sub-scores; the total is recomputed.
    pub fn with_scores(&self, scores: SubScores, weights: &ScoreWeights) -> Self {
        Self {
            scores,
            total_score: weights.total(&scores),
            ..self.clone()
        }
    }
}
