//! The closed set of wheel result codes.
//!
//! A round's primary outcome is one of four number segments (`1`, `2`,
//! `5`, `10`) or one of four bonus games (`b1`..`b4`). The statistics
//! projection reports over this full set whether or not a code appears
//! in the sampled window.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eight possible wheel outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultCode {
    /// Number segment `1`.
    #[serde(rename = "1")]
    One,
    /// Number segment `2`.
    #[serde(rename = "2")]
    Two,
    /// Number segment `5`.
    #[serde(rename = "5")]
    Five,
    /// Number segment `10`.
    #[serde(rename = "10")]
    Ten,
    /// First bonus game.
    #[serde(rename = "b1")]
    Bonus1,
    /// Second bonus game.
    #[serde(rename = "b2")]
    Bonus2,
    /// Third bonus game.
    #[serde(rename = "b3")]
    Bonus3,
    /// Fourth bonus game.
    #[serde(rename = "b4")]
    Bonus4,
}

impl ResultCode {
    /// Every result code, in wheel order. Statistics are reported over
    /// this full set.
    pub const ALL: [Self; 8] = [
        Self::One,
        Self::Two,
        Self::Five,
        Self::Ten,
        Self::Bonus1,
        Self::Bonus2,
        Self::Bonus3,
        Self::Bonus4,
    ];

    /// The wire string stored in the `result` field of a round document.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Five => "5",
            Self::Ten => "10",
            Self::Bonus1 => "b1",
            Self::Bonus2 => "b2",
            Self::Bonus3 => "b3",
            Self::Bonus4 => "b4",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultCode {
    type Err = UnknownResultCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownResultCode(s.to_owned()))
    }
}

/// Error returned when parsing a string that is not one of the eight
/// known result codes.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown result code: {0}")]
pub struct UnknownResultCode(pub String);
