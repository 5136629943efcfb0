//! MongoDB data layer for the Spintrack tracker.
//!
//! The `results` collection holds one document per spin round, written by
//! the upstream collector and mutated in place when a round is finalized.
//! The `max_multipliers` side collection holds the highest multiplier
//! event per round. This crate provides the typed interface to both:
//! read queries, aggregation projections, and the change-watch primitive
//! the live feed is built on.
//!
//! # Modules
//!
//! - [`mongo`] -- client configuration and connection
//! - [`spin_store`] -- typed queries and the change-watch primitive
//! - [`projections`] -- pure read-side projection helpers
//! - [`error`] -- shared error type

pub mod error;
pub mod mongo;
pub mod projections;
pub mod spin_store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use mongo::MongoConfig;
pub use spin_store::SpinStore;
