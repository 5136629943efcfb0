//! Pure read-side projection helpers.
//!
//! The store fetches raw windows of documents; the functions here turn
//! them into the shapes the API serves. Keeping them free of I/O makes
//! the numeric edge cases directly testable.

use std::collections::HashMap;

use spintrack_types::{
    GameHistoryResponse, MaxMultiplierRecord, ResultCode, SpinResult, SpinStatistics,
};

/// Compute per-code frequency and recency statistics over a window of
/// recent spins.
///
/// `recent` is the list of result codes, most recent spin first. The
/// frequency denominator is the requested window size `spins_amount`,
/// not the number of documents actually found, so a short history
/// reports proportionally lower frequencies rather than inflated ones.
///
/// Every code in [`ResultCode::ALL`] gets a row. `last_occurrence` is
/// the index of the first (most recent) appearance, or `None` if the
/// code is absent from the window.
pub fn compute_spin_statistics(recent: &[String], spins_amount: usize) -> Vec<SpinStatistics> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (idx, code) in recent.iter().enumerate() {
        *counts.entry(code.as_str()).or_insert(0) += 1;
        first_seen.entry(code.as_str()).or_insert(idx);
    }

    ResultCode::ALL
        .into_iter()
        .map(|code| {
            let count = counts.get(code.as_str()).copied().unwrap_or(0);
            let frequency = if spins_amount == 0 {
                0.0
            } else {
                round_percentage(count, spins_amount)
            };
            SpinStatistics {
                result: code,
                frequency,
                last_occurrence: first_seen.get(code.as_str()).copied(),
            }
        })
        .collect()
}

/// Percentage of `count` over `total`, rounded to two decimals.
fn round_percentage(count: usize, total: usize) -> f64 {
    let pct = (count as f64 / total as f64) * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Build a history page from an over-fetched window.
///
/// `docs` is most recent round first and contains up to
/// `spins_amount + 1` documents; the extra one only signals that a next
/// page exists. On the first page the head round is stripped when it is
/// still in progress (no `winners` attached yet) so clients never see a
/// half-built round in history.
pub fn page_window(
    mut docs: Vec<SpinResult>,
    spins_amount: usize,
    page: u64,
) -> GameHistoryResponse {
    let has_next_page = docs.len() > spins_amount;
    docs.truncate(spins_amount);

    if page == 0 && docs.first().is_some_and(|round| !round.is_finalized()) {
        docs.remove(0);
    }

    GameHistoryResponse {
        has_next_page,
        results: docs,
    }
}

/// Merge top multiplier records with their full round documents.
///
/// Output order follows `tops` (highest multiplier first). Records whose
/// round document is missing are skipped. Each merged round has its
/// `totalMultiplierHit` overwritten with the record's multiplier.
pub fn merge_top_multipliers(
    tops: &[MaxMultiplierRecord],
    rounds: Vec<SpinResult>,
) -> Vec<SpinResult> {
    let mut by_game_id: HashMap<String, SpinResult> = rounds
        .into_iter()
        .map(|round| (round.game_id.clone(), round))
        .collect();

    tops.iter()
        .filter_map(|record| {
            by_game_id.remove(&record.game_id).map(|mut round| {
                round.total_multiplier_hit = Some(record.multiplier);
                round
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use spintrack_types::{TopSlot, Winner};

    use super::*;

    fn round(game_id: &str, result: &str, winners: Option<Vec<Winner>>) -> SpinResult {
        SpinResult {
            id: None,
            game_id: game_id.to_owned(),
            game_time: 0,
            top_slot: TopSlot {
                result: result.to_owned(),
                multiplier: "Miss".to_owned(),
            },
            bonus_game_extra_info: None,
            result: result.to_owned(),
            total_multiplier_hit: None,
            total_bettors: 0,
            total_money_won: 0.0,
            total_winners: 0,
            winners,
        }
    }

    fn finalized(game_id: &str, result: &str) -> SpinResult {
        round(game_id, result, Some(Vec::new()))
    }

    fn stat(rows: &[SpinStatistics], code: ResultCode) -> &SpinStatistics {
        rows.iter()
            .find(|row| row.result == code)
            .unwrap_or_else(|| panic!("missing row for {code}"))
    }

    #[test]
    fn statistics_over_ten_spins() {
        // Chronological order 1,1,2,5,1,10,2,1,5,1 -- most recent first
        // for the projection input.
        let chronological = ["1", "1", "2", "5", "1", "10", "2", "1", "5", "1"];
        let recent: Vec<String> = chronological
            .iter()
            .rev()
            .map(|s| (*s).to_owned())
            .collect();

        let rows = compute_spin_statistics(&recent, 10);

        assert_eq!(stat(&rows, ResultCode::One).frequency, 50.0);
        assert_eq!(stat(&rows, ResultCode::Two).frequency, 20.0);
        assert_eq!(stat(&rows, ResultCode::Five).frequency, 20.0);
        assert_eq!(stat(&rows, ResultCode::Ten).frequency, 10.0);
        // The most recent spin was a "1".
        assert_eq!(stat(&rows, ResultCode::One).last_occurrence, Some(0));
        assert_eq!(stat(&rows, ResultCode::Ten).last_occurrence, Some(4));
        // Bonus games never occurred in the window.
        assert_eq!(stat(&rows, ResultCode::Bonus1).frequency, 0.0);
        assert_eq!(stat(&rows, ResultCode::Bonus1).last_occurrence, None);
    }

    #[test]
    fn statistics_round_to_two_decimals() {
        let recent = vec![String::from("5")];
        let rows = compute_spin_statistics(&recent, 3);
        // 1/3 = 33.333... -> 33.33
        assert_eq!(stat(&rows, ResultCode::Five).frequency, 33.33);
    }

    #[test]
    fn statistics_empty_window() {
        let rows = compute_spin_statistics(&[], 70);
        assert_eq!(rows.len(), 8);
        assert!(rows.iter().all(|row| row.frequency == 0.0));
        assert!(rows.iter().all(|row| row.last_occurrence.is_none()));
    }

    #[test]
    fn page_strips_in_progress_head() {
        let docs = vec![
            round("g3", "10", None), // in progress, most recent
            finalized("g2", "5"),
            finalized("g1", "1"),
        ];
        let page = page_window(docs, 3, 0);
        assert!(!page.has_next_page);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].game_id, "g2");
    }

    #[test]
    fn page_keeps_round_once_finalized() {
        let docs = vec![finalized("g3", "10"), finalized("g2", "5")];
        let page = page_window(docs, 3, 0);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].game_id, "g3");
    }

    #[test]
    fn over_fetch_signals_next_page() {
        let docs = vec![
            finalized("g4", "1"),
            finalized("g3", "2"),
            finalized("g2", "5"),
        ];
        let page = page_window(docs, 2, 0);
        assert!(page.has_next_page);
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn later_pages_do_not_strip_head() {
        // An in-progress round can only appear at the head of page 0;
        // the strip must not fire elsewhere even if data is odd.
        let docs = vec![round("g2", "5", None), finalized("g1", "1")];
        let page = page_window(docs, 2, 1);
        assert_eq!(page.results.len(), 2);
    }

    fn record(game_id: &str, multiplier: i64) -> MaxMultiplierRecord {
        MaxMultiplierRecord {
            id: None,
            game_id: game_id.to_owned(),
            multiplier,
            game_time: 0,
        }
    }

    #[test]
    fn merge_preserves_record_order_and_overwrites_multiplier() {
        let tops = vec![record("g2", 500), record("g1", 100)];
        let rounds = vec![finalized("g1", "5"), finalized("g2", "b1")];

        let merged = merge_top_multipliers(&tops, rounds);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].game_id, "g2");
        assert_eq!(merged[0].total_multiplier_hit, Some(500));
        assert_eq!(merged[1].game_id, "g1");
        assert_eq!(merged[1].total_multiplier_hit, Some(100));
    }

    #[test]
    fn merge_skips_records_without_a_round() {
        let tops = vec![record("gone", 1000), record("g1", 50)];
        let rounds = vec![finalized("g1", "2")];

        let merged = merge_top_multipliers(&tops, rounds);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].game_id, "g1");
    }
}
