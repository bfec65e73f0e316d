//! Filter controls carried in the dashboard query string.

use crate::screener::{FilterCriteria, SliderSpecs};
use crate::types::Chain;
use std::collections::HashSet;
use tracing::debug;

/// Raw control values as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaQuery {
    pub min_liquidity: Option<f64>,
    pub min_volume: Option<f64>,
    pub min_score: Option<f64>,
    pub chains: Vec<Chain>,
    /// Set when the filter form was submitted, so an empty chain list means "none".
    pub applied: bool,
}

impl CriteriaQuery {
    /// Collect control values from query pairs. Unparseable values are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut query = Self::default();

        for (key, value) in pairs {
            let value = value.trim();
            match key.trim() {
                "min_liquidity" => query.min_liquidity = parse_number(key, value),
                "min_volume" => query.min_volume = parse_number(key, value),
                "min_score" => query.min_score = parse_number(key, value),
                "chains" => match value.parse::<Chain>() {
                    Ok(chain) => {
                        if !query.chains.contains(&chain) {
                            query.chains.push(chain);
                        }
                    }
                    Err(e) => debug!("Ignoring chain value: {}", e),
                },
                "applied" => query.applied = !value.is_empty() && value != "0",
                _ => {}
            }
        }

        query
    }

    /// Resolve into criteria: missing values take slider defaults, present ones
    /// are clamped and snapped to the slider grid.
    pub fn to_criteria(&self, sliders: &SliderSpecs) -> FilterCriteria {
        let mut criteria = FilterCriteria::from_sliders(sliders);

        if let Some(v) = self.min_liquidity {
            criteria.min_liquidity = v;
        }
        if let Some(v) = self.min_volume {
            criteria.min_volume = v;
        }
        if let Some(v) = self.min_score {
            criteria.min_score = v;
        }
        if self.applied || !self.chains.is_empty() {
            criteria.chains = self.chains.iter().copied().collect::<HashSet<_>>();
        }

        criteria.snapped(sliders)
    }
}

fn parse_number(key: &str, value: &str) -> Option<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            debug!("Ignoring {}={:?}", key, value);
            None
        }
    }
}

/// Encode criteria as a query string that [`CriteriaQuery::from_pairs`] reads back.
pub fn criteria_query_string(criteria: &FilterCriteria) -> String {
    let mut parts = vec![
        format!("min_liquidity={}", criteria.min_liquidity),
        format!("min_volume={}", criteria.min_volume),
        format!("min_score={}", criteria.min_score),
    ];
    for chain in Chain::all() {
        if criteria.chains.contains(&chain) {
            parts.push(format!("chains={}", chain.as_str()));
        }
    }
    parts.push("applied=1".to_string());
    parts.join("&")
}
