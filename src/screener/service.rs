//! The screener service: render pipeline, session store and metrics wired together.
//!
//! Handlers hold a `Screener`, lock the caller's [`SessionHandle`] for the
//! length of the request and pass the locked [`SessionContext`] explicitly
//! into every operation.

use crate::screener::generator::{TokenCatalog, TokenGenerator};
use crate::screener::metrics::{
    ScreenerMetricsCollector, SESSIONS_CREATED_TOTAL, SESSIONS_TERMINATED_TOTAL,
    WATCHLIST_ADDS_TOTAL, WATCHLIST_REJECTED_TOTAL,
};
use crate::screener::pipeline::{RenderCycle, RenderPipeline};
use crate::screener::session::{
    InMemorySessionStore, SessionContext, SessionHandle, SessionId, SessionStorage,
};
use crate::screener::types::{Dataset, FilterCriteria, ScreenerConfig};
use crate::screener::watchlist::WatchlistAdd;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct Screener {
    config: Arc<ScreenerConfig>,
    pipeline: Arc<RenderPipeline>,
    sessions: Arc<dyn SessionStorage>,
    metrics: ScreenerMetricsCollector,
}

impl Screener {
    /// Build a screener with the in-memory session store.
    pub fn new(config: ScreenerConfig) -> Result<Self> {
        let sessions = InMemorySessionStore::new(
            Duration::from_secs(config.session_idle_seconds),
            config.max_sessions,
        );
        Self::with_storage(config, Arc::new(sessions))
    }

    /// Build a screener over a caller-supplied session store.
    pub fn with_storage(config: ScreenerConfig, sessions: Arc<dyn SessionStorage>) -> Result<Self> {
        config.validate().context("invalid screener configuration")?;

        let catalog = match &config.catalog {
            Some(entries) => TokenCatalog::from_entries(entries.clone())?,
            None => TokenCatalog::default(),
        };
        let generator = TokenGenerator::new(catalog, config.ranges.clone(), config.weights.clone());
        let pipeline = RenderPipeline::new(generator, config.seed);

        info!(
            "Screener ready: {} tokens, seed policy {:?}",
            pipeline.generator().catalog().len(),
            config.seed
        );

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            sessions,
            metrics: ScreenerMetricsCollector::new(),
        })
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn metrics(&self) -> &ScreenerMetricsCollector {
        &self.metrics
    }

    /// Default criteria from the slider specs.
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::from_sliders(&self.config.sliders)
    }

    /// Resume the session `id` if it is still live, otherwise start a new one.
    /// The flag is true when a session was created.
    #[instrument(skip(self))]
    pub async fn open_session(&self, id: Option<SessionId>) -> Result<(SessionHandle, bool)> {
        if let Some(id) = id {
            if let Some(handle) = self.sessions.get(&id).await? {
                return Ok((handle, false));
            }
        }
        let handle = self.sessions.create().await?;
        self.metrics.increment_counter(SESSIONS_CREATED_TOTAL).await;
        Ok((handle, true))
    }

    /// Look up a live session without creating one.
    pub async fn find_session(&self, id: &SessionId) -> Result<Option<SessionHandle>> {
        self.sessions.get(id).await
    }

    pub async fn end_session(&self, id: &SessionId) -> Result<bool> {
        let ended = self.sessions.terminate(id).await?;
        if ended {
            self.metrics.increment_counter(SESSIONS_TERMINATED_TOTAL).await;
        }
        Ok(ended)
    }

    pub async fn live_sessions(&self) -> Result<u64> {
        self.sessions.count().await
    }

    /// Run a render cycle for `session` and make its dataset the session's current one.
    #[instrument(skip(self, session, criteria), fields(session = %session.id))]
    pub async fn render(&self, session: &mut SessionContext, criteria: FilterCriteria) -> RenderCycle {
        let started = Instant::now();
        let cycle = self.pipeline.run(criteria);
        session.dataset = cycle.dataset.clone();
        self.metrics.record_render(started.elapsed(), cycle.filtered.len()).await;
        cycle
    }

    /// Add `token` to the session's watchlist, validated against its current dataset.
    /// A session that has never rendered is given a dataset first.
    #[instrument(skip(self, session), fields(session = %session.id))]
    pub async fn add_to_watchlist(&self, session: &mut SessionContext, token: &str) -> WatchlistAdd {
        if session.dataset.is_empty() {
            let criteria = self.default_criteria();
            self.render(session, criteria).await;
        }

        let outcome = session.watchlist.add(token, &session.dataset);
        match outcome {
            WatchlistAdd::Added => {
                info!("Added {} to watchlist", token);
                self.metrics.increment_counter(WATCHLIST_ADDS_TOTAL).await;
            }
            WatchlistAdd::AlreadyPresent => {}
            WatchlistAdd::UnknownToken => {
                warn!("Ignored watchlist add for unknown token {}", token);
                self.metrics.increment_counter(WATCHLIST_REJECTED_TOTAL).await;
            }
        }
        outcome
    }

    /// Watchlist records of the session's current dataset, in dataset order.
    pub fn watchlist_view(&self, session: &SessionContext) -> Dataset {
        session.watchlist.view(&session.dataset)
    }
}
