//! Axum router construction.
//!
//! Assembles the REST and SSE routes into a single [`Router`] with CORS
//! middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::sse;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML index page
/// - `GET /events` -- SSE live feed of finalized rounds
/// - `GET /game-history` -- paged spin history
/// - `GET /top-multipliers` -- top multiplier events in a trailing window
/// - `GET /spin-statistics` -- per-code frequency and recency
/// - `GET /topslot-rounds` -- rounds where the top slot matched
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Index page
        .route("/", get(handlers::index))
        // Live feed
        .route("/events", get(sse::events))
        // REST API
        .route("/game-history", get(handlers::get_game_history))
        .route("/top-multipliers", get(handlers::get_top_multipliers))
        .route("/spin-statistics", get(handlers::get_spin_statistics))
        .route("/topslot-rounds", get(handlers::get_topslot_rounds))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
