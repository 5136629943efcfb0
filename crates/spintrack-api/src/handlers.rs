//! REST endpoint handlers.
//!
//! Each handler validates its numeric query parameters against the
//! shared bounds before touching the store, then delegates to the
//! corresponding [`SpinStore`](spintrack_db::SpinStore) query.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML index page |
//! | `GET` | `/game-history` | Paged spin history, optional result filter |
//! | `GET` | `/top-multipliers` | Top 5 multiplier events in a trailing window |
//! | `GET` | `/spin-statistics` | Per-code frequency and recency |
//! | `GET` | `/topslot-rounds` | Rounds where the top slot matched the result |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use spintrack_types::{GameHistoryResponse, ResultCode, SpinResult, SpinStatistics};

use crate::error::ApiError;
use crate::state::AppState;

/// Window size used when `spins_amount` is omitted.
const DEFAULT_SPINS_AMOUNT: usize = 70;

/// Trailing window used when `hours` is omitted.
const DEFAULT_HOURS: i64 = 24;

/// Upper bound shared by all numeric query parameters.
const MAX_QUERY_VALUE: i64 = 10_000;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /game-history`.
#[derive(Debug, serde::Deserialize)]
pub struct HistoryQuery {
    /// Restrict history to rounds with this result code.
    pub game_id: Option<ResultCode>,
    /// Page size (default 70, bounds 1..=10000).
    pub spins_amount: Option<i64>,
    /// Zero-based page index (default 0, bounds 0..=10000).
    pub page: Option<i64>,
}

/// Query parameters for `GET /top-multipliers`.
#[derive(Debug, serde::Deserialize)]
pub struct TopMultipliersQuery {
    /// Trailing window in hours (default 24, bounds 1..=10000).
    pub hours: Option<i64>,
}

/// Query parameters for endpoints taking only a window size.
#[derive(Debug, serde::Deserialize)]
pub struct SpinsQuery {
    /// Window size (default 70, bounds 1..=10000).
    pub spins_amount: Option<i64>,
}

// ---------------------------------------------------------------------------
// Parameter validation
// ---------------------------------------------------------------------------

/// Validate a numeric parameter against `min..=10000`, applying the
/// default when absent.
fn bounded(name: &str, value: Option<i64>, default: i64, min: i64) -> Result<i64, ApiError> {
    let value = value.unwrap_or(default);
    if (min..=MAX_QUERY_VALUE).contains(&value) {
        Ok(value)
    } else {
        Err(ApiError::InvalidQuery(format!(
            "{name} must be between {min} and {MAX_QUERY_VALUE}, got {value}"
        )))
    }
}

/// Validate `spins_amount` (1..=10000, default 70).
fn bounded_spins(value: Option<i64>) -> Result<usize, ApiError> {
    let value = bounded("spins_amount", value, DEFAULT_SPINS_AMOUNT as i64, 1)?;
    Ok(usize::try_from(value).unwrap_or(DEFAULT_SPINS_AMOUNT))
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML index
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page listing the API endpoints.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let live_clients = state.hub.subscriber_count();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Spintrack</title>
    <style>
        body {{ background: #0d1117; color: #c9d1d9; font-family: monospace; padding: 2rem; max-width: 720px; margin: 0 auto; }}
        h1 {{ color: #58a6ff; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>Spintrack</h1>
    <p>Casino wheel outcome tracker. Live feed clients connected: {live_clients}</p>
    <ul>
        <li><a href="/events">/events</a> -- SSE stream of finalized rounds (<code>winners_added</code>)</li>
        <li><a href="/game-history">/game-history</a> -- paged history (?game_id=&amp;spins_amount=&amp;page=)</li>
        <li><a href="/top-multipliers">/top-multipliers</a> -- top 5 multipliers (?hours=)</li>
        <li><a href="/spin-statistics">/spin-statistics</a> -- per-code frequency (?spins_amount=)</li>
        <li><a href="/topslot-rounds">/topslot-rounds</a> -- top-slot matches (?spins_amount=)</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /game-history -- paged spin history
// ---------------------------------------------------------------------------

/// Return a page of spin history, most recent round first, with an
/// in-progress head round stripped.
///
/// # Query Parameters
///
/// - `game_id`: restrict to rounds with this result code
/// - `spins_amount`: page size (default 70)
/// - `page`: zero-based page index (default 0)
pub async fn get_game_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<GameHistoryResponse>, ApiError> {
    let spins_amount = bounded_spins(params.spins_amount)?;
    let page = bounded("page", params.page, 0, 0)?;
    let page = u64::try_from(page).unwrap_or(0);

    let history = state
        .store
        .fetch_game_history(params.game_id, spins_amount, page)
        .await?;
    Ok(Json(history))
}

// ---------------------------------------------------------------------------
// GET /top-multipliers -- top multiplier events in a trailing window
// ---------------------------------------------------------------------------

/// Return the top 5 multiplier events of the trailing window, each
/// merged with its full round document.
///
/// # Query Parameters
///
/// - `hours`: trailing window size (default 24)
pub async fn get_top_multipliers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopMultipliersQuery>,
) -> Result<Json<Vec<SpinResult>>, ApiError> {
    let hours = bounded("hours", params.hours, DEFAULT_HOURS, 1)?;

    let rounds = state.store.fetch_top_multipliers(hours).await?;
    Ok(Json(rounds))
}

// ---------------------------------------------------------------------------
// GET /spin-statistics -- per-code frequency and recency
// ---------------------------------------------------------------------------

/// Return frequency percentage and spins-since-last-occurrence for all
/// eight result codes over the most recent window.
///
/// # Query Parameters
///
/// - `spins_amount`: window size (default 70)
pub async fn get_spin_statistics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpinsQuery>,
) -> Result<Json<Vec<SpinStatistics>>, ApiError> {
    let spins_amount = bounded_spins(params.spins_amount)?;

    let statistics = state.store.fetch_spin_statistics(spins_amount).await?;
    Ok(Json(statistics))
}

// ---------------------------------------------------------------------------
// GET /topslot-rounds -- rounds where the top slot matched
// ---------------------------------------------------------------------------

/// Return rounds where the top-slot sub-result equals the round's
/// overall result and the top slot actually hit, most recent first.
///
/// # Query Parameters
///
/// - `spins_amount`: maximum number of rounds (default 70)
pub async fn get_topslot_rounds(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpinsQuery>,
) -> Result<Json<Vec<SpinResult>>, ApiError> {
    let spins_amount = bounded_spins(params.spins_amount)?;

    let rounds = state.store.fetch_topslot_rounds(spins_amount).await?;
    Ok(Json(rounds))
}
