//! SSE handler for the live winners feed.
//!
//! Clients connect to `GET /events` and receive one `winners_added`
//! event, carrying the full round document as JSON, each time a round is
//! finalized. The handler's hub subscription is owned by the response
//! stream, so the registry entry is released whenever the stream is
//! dropped: client disconnect, server error, or shutdown alike.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use tracing::debug;

use crate::state::AppState;

/// Name of the server-push event emitted for each finalized round.
const WINNERS_EVENT: &str = "winners_added";

/// Upgrade the request into an SSE stream of finalized rounds.
///
/// # Route
///
/// `GET /events`
pub async fn events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.hub.subscribe();
    debug!(
        subscribers = state.hub.subscriber_count(),
        "live feed client connected"
    );

    let stream = subscription.map(|change| {
        Ok(Event::default()
            .event(WINNERS_EVENT)
            .data(change.payload.as_ref()))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
