//! Read-side response types served by the HTTP API.

use serde::{Deserialize, Serialize};

use crate::codes::ResultCode;
use crate::spin::SpinResult;

/// One row of the per-code spin statistics projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinStatistics {
    /// The result code this row describes.
    pub result: ResultCode,
    /// Share of the sampled window landing on this code, as a
    /// percentage rounded to two decimals.
    pub frequency: f64,
    /// How many spins ago this code last occurred (0 = the most recent
    /// spin), or `None` if it does not appear in the window.
    pub last_occurrence: Option<usize>,
}

/// A page of spin history, most recent round first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHistoryResponse {
    /// Whether another page of older rounds exists.
    pub has_next_page: bool,
    /// The rounds in this page.
    pub results: Vec<SpinResult>,
}
