//! HTTP API server for the Spintrack tracker.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **SSE endpoint** (`GET /events`) streaming a `winners_added` event
//!   for every round finalized with a winners list, fanned out from the
//!   shared [`FeedHub`](spintrack_feed::FeedHub)
//! - **REST endpoints** for read-side projections over the spin store
//!   (paged history, top multipliers, per-code statistics, top-slot
//!   matches)
//! - **Minimal HTML index** (`GET /`) listing the endpoints
//!
//! All REST handlers validate their numeric query parameters at the
//! boundary (bounds 1..=10000) before any store access. The SSE handler
//! owns its hub subscription through a drop guard, so every disconnect
//! path deregisters the channel.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod sse;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
