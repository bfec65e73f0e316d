//! Browser dashboard and JSON API over the screener.

mod handlers;
pub mod query;
pub mod render;

pub use handlers::{AddRequest, AddResponse, WatchlistResponse, SESSION_COOKIE};

use crate::screener::Screener;
use anyhow::{Context, Result};
use axum::{
    routing::{delete, get, post},
    Router,
};
use handlers::*;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handler state. Per-session data lives in the screener's session store.
#[derive(Clone)]
pub struct DashboardState {
    pub screener: Screener,
}

/// Build the dashboard router
pub fn create_app(screener: Screener) -> Router {
    let state = DashboardState { screener };

    Router::new()
        .route("/", get(index))
        .route("/watchlist", post(add_from_form))
        .route("/api/tokens", get(api_tokens))
        .route("/api/watchlist", get(api_get_watchlist).post(api_add_to_watchlist))
        .route("/api/session", delete(api_end_session))
        .route("/api/metrics", get(api_metrics))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the dashboard until Ctrl-C
pub async fn serve_dashboard(screener: Screener) -> Result<()> {
    let addr = screener.config().socket_addr()?;
    let app = create_app(screener);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind dashboard listener on {}", addr))?;
    info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("dashboard server error")?;

    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
