//! Filter engine over a generated dataset.

use crate::screener::types::{Dataset, FilterCriteria};
use crate::types::TokenRecord;
use tracing::{debug, instrument};

/// Applies a conjunction of threshold and membership predicates.
pub struct FilterEngine;

impl FilterEngine {
    /// Whether `record` satisfies every predicate in `criteria`.
    pub fn matches(record: &TokenRecord, criteria: &FilterCriteria) -> bool {
        record.liquidity() >= criteria.min_liquidity
            && record.volume_24h() >= criteria.min_volume
            && criteria.chains.contains(&record.chain())
            && record.total_score() >= criteria.min_score
    }

    /// Subsequence of `dataset` matching `criteria`, in the input order.
    #[instrument(skip(dataset, criteria), fields(rows = dataset.len()))]
    pub fn apply(dataset: &[TokenRecord], criteria: &FilterCriteria) -> Dataset {
        if criteria.chains.is_empty() {
            debug!("No chains selected, filter yields nothing");
            return Vec::new();
        }

        let filtered: Dataset = dataset
            .iter()
            .filter(|record| Self::matches(record, criteria))
            .cloned()
            .collect();

        debug!("Filter kept {} of {} records", filtered.len(), dataset.len());
        filtered
    }
}
