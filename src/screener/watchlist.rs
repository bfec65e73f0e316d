//! Session-scoped watchlist.
//!
//! An insertion-ordered set of token identifiers. Tokens can only be added;
//! the view is always resolved against the dataset currently shown.

use crate::screener::types::Dataset;
use crate::types::{TokenId, TokenRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of an add request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchlistAdd {
    /// Token was inserted
    Added,
    /// Token was already tracked; nothing changed
    AlreadyPresent,
    /// Token is not part of the current dataset; nothing changed
    UnknownToken,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    tokens: Vec<TokenId>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `token` if it is in `dataset` and not already tracked.
    pub fn add(&mut self, token: &str, dataset: &[TokenRecord]) -> WatchlistAdd {
        if !dataset.iter().any(|record| record.token() == token) {
            debug!("Rejected unknown token {}", token);
            return WatchlistAdd::UnknownToken;
        }
        if self.contains(token) {
            return WatchlistAdd::AlreadyPresent;
        }
        self.tokens.push(token.to_string());
        WatchlistAdd::Added
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Tracked tokens in insertion order.
    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Records of `dataset` that are tracked, in the dataset's order.
    pub fn view(&self, dataset: &[TokenRecord]) -> Dataset {
        dataset
            .iter()
            .filter(|record| self.contains(record.token()))
            .cloned()
            .collect()
    }
}
