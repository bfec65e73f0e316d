//! Metrics collection for the screener.
//!
//! Counters, gauges and histograms kept in process and exported as a JSON
//! snapshot by the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

pub const RENDERS_TOTAL: &str = "screener_renders_total";
pub const SESSIONS_CREATED_TOTAL: &str = "screener_sessions_created_total";
pub const SESSIONS_TERMINATED_TOTAL: &str = "screener_sessions_terminated_total";
pub const WATCHLIST_ADDS_TOTAL: &str = "screener_watchlist_adds_total";
pub const WATCHLIST_REJECTED_TOTAL: &str = "screener_watchlist_rejected_total";
pub const LAST_FILTERED_ROWS: &str = "screener_last_filtered_rows";
pub const RENDER_DURATION_SECONDS: &str = "screener_render_duration_seconds";

/// Bounded so a long-running server does not grow without limit.
const MAX_HISTOGRAM_SAMPLES: usize = 1_024;

/// Screener metrics collector.
#[derive(Clone, Default)]
pub struct ScreenerMetricsCollector {
    metrics: Arc<RwLock<InternalMetrics>>,
}

#[derive(Debug, Default)]
struct InternalMetrics {
    counters: HashMap<String, u64>,
    gauges: HashMap<String, f64>,
    histograms: HashMap<String, VecDeque<f64>>,
}

impl ScreenerMetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self), fields(metric = %name))]
    pub async fn increment_counter(&self, name: &str) {
        let mut metrics = self.metrics.write().await;
        *metrics.counters.entry(name.to_string()).or_insert(0) += 1;
        debug!("Incremented counter: {}", name);
    }

    pub async fn set_gauge(&self, name: &str, value: f64) {
        let mut metrics = self.metrics.write().await;
        metrics.gauges.insert(name.to_string(), value);
    }

    pub async fn record_histogram(&self, name: &str, value: f64) {
        let mut metrics = self.metrics.write().await;
        let samples = metrics.histograms.entry(name.to_string()).or_default();
        if samples.len() == MAX_HISTOGRAM_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(value);
    }

    /// Record one render cycle.
    pub async fn record_render(&self, duration: Duration, filtered_rows: usize) {
        self.increment_counter(RENDERS_TOTAL).await;
        self.record_histogram(RENDER_DURATION_SECONDS, duration.as_secs_f64()).await;
        self.set_gauge(LAST_FILTERED_ROWS, filtered_rows as f64).await;
    }

    pub async fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        let metrics = self.metrics.read().await;

        let histograms = metrics
            .histograms
            .iter()
            .map(|(name, samples)| (name.clone(), HistogramSummary::from_samples(samples)))
            .collect();

        MetricsSnapshot {
            counters: metrics.counters.clone(),
            gauges: metrics.gauges.clone(),
            histograms,
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot of current metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub counters: HashMap<String, u64>,
    pub gauges: HashMap<String, f64>,
    pub histograms: HashMap<String, HistogramSummary>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSummary {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
}

impl HistogramSummary {
    fn from_samples(samples: &VecDeque<f64>) -> Self {
        let count = samples.len();
        let mean = if count == 0 {
            0.0
        } else {
            samples.iter().sum::<f64>() / count as f64
        };
        let max = samples.iter().copied().fold(0.0, f64::max);
        Self { count, mean, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_collector_creation() {
        let collector = ScreenerMetricsCollector::new();

        let snapshot = collector.get_metrics_snapshot().await;
        assert!(snapshot.counters.is_empty());
        assert!(snapshot.gauges.is_empty());
        assert!(snapshot.histograms.is_empty());
    }

    #[tokio::test]
    async fn test_increment_counter() {
        let collector = ScreenerMetricsCollector::new();

        collector.increment_counter(WATCHLIST_ADDS_TOTAL).await;
        collector.increment_counter(WATCHLIST_ADDS_TOTAL).await;

        let snapshot = collector.get_metrics_snapshot().await;
        assert_eq!(snapshot.counters.get(WATCHLIST_ADDS_TOTAL), Some(&2));
    }

    #[tokio::test]
    async fn test_record_render() {
        let collector = ScreenerMetricsCollector::new();

        collector.record_render(Duration::from_millis(500), 4).await;
        collector.record_render(Duration::from_millis(1500), 2).await;

        let snapshot = collector.get_metrics_snapshot().await;
        assert_eq!(snapshot.counters.get(RENDERS_TOTAL), Some(&2));
        assert_eq!(snapshot.gauges.get(LAST_FILTERED_ROWS), Some(&2.0));

        let histogram = snapshot.histograms.get(RENDER_DURATION_SECONDS).unwrap();
        assert_eq!(histogram.count, 2);
        assert!((histogram.mean - 1.0).abs() < 1e-9);
        assert!((histogram.max - 1.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_histogram_is_bounded() {
        let collector = ScreenerMetricsCollector::new();
        for i in 0..(MAX_HISTOGRAM_SAMPLES + 10) {
            collector.record_histogram("bounded", i as f64).await;
        }

        let snapshot = collector.get_metrics_snapshot().await;
        let histogram = &snapshot.histograms["bounded"];
        assert_eq!(histogram.count, MAX_HISTOGRAM_SAMPLES);

        // The ten oldest samples were evicted.
        let newest = (MAX_HISTOGRAM_SAMPLES + 9) as f64;
        assert_eq!(histogram.max, newest);
        assert!((histogram.mean - (10.0 + newest) / 2.0).abs() < 1e-9);
    }
}
