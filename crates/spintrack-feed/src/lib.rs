//! Change-notification fan-out core for the Spintrack tracker.
//!
//! One background [`ChangeWatcher`] consumes the store's change stream
//! for rounds that just gained a `winners` field and publishes each full
//! round document through a shared [`FeedHub`]. Any number of subscribers
//! (one per live `/events` connection) each hold their own unbounded
//! channel; publishing never blocks on a slow consumer, and a
//! subscription deregisters itself on drop so the hub's registry always
//! mirrors the set of open connections.
//!
//! # Modules
//!
//! - [`hub`] -- subscriber registry and non-blocking publish
//! - [`watcher`] -- supervised change-stream consumer with backoff
//! - [`error`] -- shared error type

pub mod error;
pub mod hub;
pub mod watcher;

// Re-export primary types for convenience.
pub use error::FeedError;
pub use hub::{FeedHub, FeedSubscription, SubscriberId};
pub use watcher::{ChangeEvent, ChangeWatcher};
