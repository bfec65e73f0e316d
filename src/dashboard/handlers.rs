//! Dashboard request handlers

use super::DashboardState;
use crate::dashboard::query::{criteria_query_string, CriteriaQuery};
use crate::dashboard::render::{render_dashboard_html, PageContext};
use crate::screener::{MetricsSnapshot, RenderCycle, SessionContext, WatchlistAdd};
use crate::types::{TokenId, TokenRecord};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Json, Redirect},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "screener_session";

/// Body of an add request, from the page form or the JSON API
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    /// Tracked tokens in insertion order
    pub tokens: Vec<TokenId>,
    /// Tracked records of the session's current dataset
    pub view: Vec<TokenRecord>,
}

#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub outcome: WatchlistAdd,
    pub watchlist: WatchlistResponse,
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Resume the caller's session or start one, attaching the cookie for new sessions.
/// The session stays locked until the returned guard drops at the end of the handler.
async fn resolve_session(
    state: &DashboardState,
    jar: CookieJar,
) -> Result<(OwnedMutexGuard<SessionContext>, CookieJar), StatusCode> {
    let (handle, created) = state
        .screener
        .open_session(session_id(&jar))
        .await
        .map_err(|e| {
            tracing::error!("Failed to open session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let session = handle.lock_owned().await;

    let jar = if created {
        jar.add(session_cookie(session.id))
    } else {
        jar
    };
    Ok((session, jar))
}

fn watchlist_response(state: &DashboardState, session: &SessionContext) -> WatchlistResponse {
    WatchlistResponse {
        tokens: session.watchlist.tokens().to_vec(),
        view: state.screener.watchlist_view(session),
    }
}

/// Dashboard page
pub async fn index(
    State(state): State<DashboardState>,
    jar: CookieJar,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<(CookieJar, Html<String>), StatusCode> {
    let (mut session, jar) = resolve_session(&state, jar).await?;
    let sliders = &state.screener.config().sliders;
    let criteria = CriteriaQuery::from_pairs(&pairs).to_criteria(sliders);

    let cycle = state.screener.render(&mut session, criteria).await;
    let notice = session.notice.take();
    let watchlist = state.screener.watchlist_view(&session);

    let html = render_dashboard_html(
        &cycle,
        &PageContext {
            sliders,
            watchlist: &watchlist,
            notice: notice.as_ref().map(|(outcome, token)| (*outcome, token.as_str())),
        },
    );

    Ok((jar, Html(html)))
}

/// Add from the page form, then redirect back with the same filters
pub async fn add_from_form(
    State(state): State<DashboardState>,
    jar: CookieJar,
    Query(pairs): Query<Vec<(String, String)>>,
    Form(request): Form<AddRequest>,
) -> Result<(CookieJar, Redirect), StatusCode> {
    let (mut session, jar) = resolve_session(&state, jar).await?;
    let criteria = CriteriaQuery::from_pairs(&pairs).to_criteria(&state.screener.config().sliders);

    let outcome = state.screener.add_to_watchlist(&mut session, &request.token).await;
    session.notice = Some((outcome, request.token));

    Ok((jar, Redirect::to(&format!("/?{}", criteria_query_string(&criteria)))))
}

/// Render cycle for the given filters as JSON
pub async fn api_tokens(
    State(state): State<DashboardState>,
    jar: CookieJar,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<(CookieJar, Json<RenderCycle>), StatusCode> {
    let (mut session, jar) = resolve_session(&state, jar).await?;
    let criteria = CriteriaQuery::from_pairs(&pairs).to_criteria(&state.screener.config().sliders);

    let cycle = state.screener.render(&mut session, criteria).await;

    Ok((jar, Json(cycle)))
}

/// Current watchlist view
pub async fn api_get_watchlist(
    State(state): State<DashboardState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<WatchlistResponse>), StatusCode> {
    let (session, jar) = resolve_session(&state, jar).await?;
    let response = watchlist_response(&state, &session);
    Ok((jar, Json(response)))
}

/// Add a token to the watchlist
pub async fn api_add_to_watchlist(
    State(state): State<DashboardState>,
    jar: CookieJar,
    Json(request): Json<AddRequest>,
) -> Result<(StatusCode, CookieJar, Json<AddResponse>), StatusCode> {
    let (mut session, jar) = resolve_session(&state, jar).await?;

    let outcome = state.screener.add_to_watchlist(&mut session, &request.token).await;
    let status = match outcome {
        WatchlistAdd::Added => StatusCode::CREATED,
        WatchlistAdd::AlreadyPresent => StatusCode::OK,
        WatchlistAdd::UnknownToken => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let watchlist = watchlist_response(&state, &session);

    Ok((status, jar, Json(AddResponse { outcome, watchlist })))
}

/// End the caller's session
pub async fn api_end_session(
    State(state): State<DashboardState>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), StatusCode> {
    let ended = match session_id(&jar) {
        Some(id) => state.screener.end_session(&id).await.map_err(|e| {
            tracing::error!("Failed to end session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?,
        None => false,
    };

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    let status = if ended {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    };
    Ok((status, jar))
}

pub async fn api_metrics(State(state): State<DashboardState>) -> Json<MetricsSnapshot> {
    Json(state.screener.metrics().get_metrics_snapshot().await)
}

pub async fn health(State(state): State<DashboardState>) -> Result<Json<Value>, StatusCode> {
    let live_sessions = state
        .screener
        .live_sessions()
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(json!({
        "status": "ok",
        "live_sessions": live_sessions,
    })))
}
