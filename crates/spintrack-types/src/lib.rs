//! Shared data model for the Spintrack tracker.
//!
//! Defines the persisted document shapes (spin rounds and the
//! `max_multipliers` side collection), the closed set of wheel result
//! codes, and the read-side response types served by the HTTP API.
//!
//! All wire names are camelCase to match the documents written by the
//! upstream collector (`gameId`, `topSlot`, `winners`, ...).

pub mod codes;
pub mod responses;
pub mod spin;

// Re-export primary types for convenience.
pub use codes::ResultCode;
pub use responses::{GameHistoryResponse, SpinStatistics};
pub use spin::{BonusGameExtraInfo, MaxMultiplierRecord, SpinResult, TOP_SLOT_MISS, TopSlot, Winner};
