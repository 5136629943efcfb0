//! Persisted document shapes for spin rounds.
//!
//! A [`SpinResult`] is created when a round starts (no `winners` yet) and
//! mutated in place once payouts are computed, attaching the `winners`
//! list and `totalMultiplierHit`. That mutation is what the change
//! watcher listens for.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Sentinel value in [`TopSlot::multiplier`] meaning the top slot did not
/// land on anything.
pub const TOP_SLOT_MISS: &str = "Miss";

/// One play of the tracked game: the canonical persisted entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    /// Store-native document id.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Upstream game round identifier.
    pub game_id: String,
    /// Round timestamp, epoch milliseconds.
    pub game_time: i64,
    /// Secondary top-slot sub-result spun alongside the wheel.
    pub top_slot: TopSlot,
    /// Bonus-game detail payload, present only for bonus rounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_game_extra_info: Option<BonusGameExtraInfo>,
    /// Primary outcome code (`1`, `2`, `5`, `10`, `b1`..`b4`).
    pub result: String,
    /// Total multiplier applied to the round, attached at finalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_multiplier_hit: Option<i64>,
    /// Number of players who placed a bet on this round.
    pub total_bettors: i64,
    /// Total money paid out on this round.
    pub total_money_won: f64,
    /// Number of winning players.
    pub total_winners: i64,
    /// Winner records, attached when the round is finalized. `None`
    /// while the round is still in progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winners: Option<Vec<Winner>>,
}

impl SpinResult {
    /// Whether the round has been finalized with a winners list.
    pub const fn is_finalized(&self) -> bool {
        self.winners.is_some()
    }
}

/// A single winning player on a finalized round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    /// Player display name.
    pub screen_name: String,
    /// Amount won.
    pub winnings: f64,
    /// Multiplier applied to this player's win, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<i64>,
}

/// The top-slot sub-result spun alongside the main wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSlot {
    /// Result code the top slot landed on.
    pub result: String,
    /// Multiplier label, or [`TOP_SLOT_MISS`] when it missed.
    pub multiplier: String,
}

impl TopSlot {
    /// Whether the top slot landed (its multiplier is not the miss
    /// sentinel).
    pub fn is_hit(&self) -> bool {
        self.multiplier != TOP_SLOT_MISS
    }
}

/// Detail payload for bonus-game rounds.
///
/// Every field is optional: each bonus game populates a different
/// subset, and the upstream collector omits the rest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusGameExtraInfo {
    /// Coin-flip: where the coin was placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_placement: Option<String>,
    /// Coin-flip: multiplier on the heads side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heads_multiplier: Option<i64>,
    /// Coin-flip: multiplier on the tails side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tails_multiplier: Option<i64>,
    /// Coin-flip: which side landed up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_side_result: Option<String>,
    /// Pachinko: zone the puck was dropped into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_zone: Option<i64>,
    /// Pachinko: zone the puck landed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_zone: Option<i64>,
    /// Largest multiplier on the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_multiplier: Option<i64>,
    /// Smallest multiplier on the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_multiplier: Option<i64>,
    /// Base bonus result before the total is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<i64>,
    /// Final bonus result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_result: Option<i64>,
    /// Cash-hunt: results revealed under the green symbols.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green_results: Option<Vec<String>>,
    /// Cash-hunt: results revealed under the blue symbols.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue_results: Option<Vec<String>>,
    /// Cash-hunt: results revealed under the yellow symbols.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yellow_results: Option<Vec<String>>,
}

/// A record in the `max_multipliers` side collection: the highest
/// multiplier event observed for a round, written by the upstream
/// collector. Drives the top-multipliers query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxMultiplierRecord {
    /// Store-native document id.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Round identifier this multiplier belongs to.
    pub game_id: String,
    /// The multiplier hit.
    pub multiplier: i64,
    /// Round timestamp, epoch milliseconds.
    pub game_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_progress_round() -> SpinResult {
        SpinResult {
            id: None,
            game_id: "round-17".to_owned(),
            game_time: 1_700_000_000_000,
            top_slot: TopSlot {
                result: "5".to_owned(),
                multiplier: "Miss".to_owned(),
            },
            bonus_game_extra_info: None,
            result: "5".to_owned(),
            total_multiplier_hit: None,
            total_bettors: 412,
            total_money_won: 0.0,
            total_winners: 0,
            winners: None,
        }
    }

    #[test]
    fn wire_names_are_camel_case() {
        let round = in_progress_round();
        let json = serde_json::to_value(&round).unwrap();
        assert!(json.get("gameId").is_some());
        assert!(json.get("gameTime").is_some());
        assert!(json.get("topSlot").is_some());
        assert!(json.get("totalMoneyWon").is_some());
        // Unset optionals are omitted entirely.
        assert!(json.get("winners").is_none());
        assert!(json.get("bonusGameExtraInfo").is_none());
    }

    #[test]
    fn deserializes_finalized_round() {
        let json = r#"{
            "gameId": "round-17",
            "gameTime": 1700000000000,
            "topSlot": {"result": "10", "multiplier": "2x"},
            "result": "10",
            "totalMultiplierHit": 20,
            "totalBettors": 412,
            "totalMoneyWon": 1234.5,
            "totalWinners": 98,
            "winners": [
                {"screenName": "lucky", "winnings": 500.0, "multiplier": 20},
                {"screenName": "steady", "winnings": 12.5}
            ]
        }"#;
        let round: SpinResult = serde_json::from_str(json).unwrap();
        assert!(round.is_finalized());
        assert_eq!(round.winners.as_ref().map(Vec::len), Some(2));
        assert!(round.top_slot.is_hit());
    }

    #[test]
    fn in_progress_round_is_not_finalized() {
        assert!(!in_progress_round().is_finalized());
        assert!(!in_progress_round().top_slot.is_hit());
    }
}
