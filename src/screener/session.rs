//! Session storage for per-user dashboard state.
//!
//! Each browser session owns one [`SessionContext`] behind a [`SessionHandle`].
//! Contexts are created on first contact, mutated in place under the handle's
//! lock, and dropped on explicit termination or after sitting idle.

use crate::screener::types::Dataset;
use crate::screener::watchlist::{Watchlist, WatchlistAdd};
use crate::types::TokenId;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

pub type SessionId = Uuid;

/// Shared, lockable session state. A request holds the lock for its whole
/// read-modify cycle, so requests on one session apply one after another.
pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// State owned by a single session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub watchlist: Watchlist,
    /// Dataset most recently rendered for this session
    pub dataset: Dataset,
    /// Outcome of the last form add, shown once on the next page render
    pub notice: Option<(WatchlistAdd, TokenId)>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            watchlist: Watchlist::new(),
            dataset: Vec::new(),
            notice: None,
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Contract for session persistence.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Create and store a fresh, empty session.
    async fn create(&self) -> Result<SessionHandle>;

    /// Fetch a live session by id.
    async fn get(&self, id: &SessionId) -> Result<Option<SessionHandle>>;

    /// End a session. Returns false if it was already gone. Handles still
    /// held by in-flight requests are detached, never re-inserted.
    async fn terminate(&self, id: &SessionId) -> Result<bool>;

    /// Number of live sessions.
    async fn count(&self) -> Result<u64>;
}

/// In-memory session store with idle expiry.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Cache<SessionId, SessionHandle>,
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Duration, max_sessions: u64) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle_timeout)
            .build();
        Self { sessions }
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStore {
    #[instrument(skip(self))]
    async fn create(&self) -> Result<SessionHandle> {
        let context = SessionContext::new();
        let id = context.id;
        let handle = Arc::new(Mutex::new(context));
        self.sessions.insert(id, handle.clone()).await;
        info!("Created session {}", id);
        Ok(handle)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionHandle>> {
        Ok(self.sessions.get(id).await)
    }

    #[instrument(skip(self))]
    async fn terminate(&self, id: &SessionId) -> Result<bool> {
        let removed = self.sessions.remove(id).await.is_some();
        if removed {
            info!("Terminated session {}", id);
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<u64> {
        self.sessions.run_pending_tasks().await;
        Ok(self.sessions.entry_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screener::generator::TokenGenerator;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::new(Duration::from_secs(60), 100)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store();
        let id = store.create().await.unwrap().lock().await.id;

        let fetched = store.get(&id).await.unwrap().unwrap();
        let fetched = fetched.lock().await;
        assert_eq!(fetched.id, id);
        assert!(fetched.watchlist.is_empty());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mutation_is_visible_to_later_gets() {
        let store = store();
        let handle = store.create().await.unwrap();
        let id = {
            let mut session = handle.lock().await;
            session.dataset = TokenGenerator::default().generate(4);
            let dataset = session.dataset.clone();
            session.watchlist.add("CatFi", &dataset);
            session.id
        };

        let fetched = store.get(&id).await.unwrap().unwrap();
        assert!(fetched.lock().await.watchlist.contains("CatFi"));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = store();
        let first = store.create().await.unwrap();
        let second = store.create().await.unwrap();
        let second_id = second.lock().await.id;
        assert_ne!(first.lock().await.id, second_id);

        {
            let mut first = first.lock().await;
            first.dataset = TokenGenerator::default().generate(4);
            let dataset = first.dataset.clone();
            first.watchlist.add("DogeX", &dataset);
        }

        let second = store.get(&second_id).await.unwrap().unwrap();
        assert!(second.lock().await.watchlist.is_empty());
    }

    #[tokio::test]
    async fn test_terminate() {
        let store = store();
        let handle = store.create().await.unwrap();
        let id = handle.lock().await.id;

        assert!(store.terminate(&id).await.unwrap());
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(!store.terminate(&id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_terminated_session_stays_gone_while_handle_is_held() {
        let store = store();
        let handle = store.create().await.unwrap();
        let mut session = handle.lock().await;

        assert!(store.terminate(&session.id).await.unwrap());
        session.notice = None;
        session.dataset = TokenGenerator::default().generate(1);
        let id = session.id;
        drop(session);

        assert!(store.get(&id).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = store();
        assert!(store.get(&Uuid::new_v4()).await.unwrap().is_none());
    }
}
