//! Summary rollups over the normalized table.
//!
//! All sums are null-skipping: a row whose USD column is null simply
//! contributes nothing, it is never treated as zero-forcing or an error.

use std::collections::BTreeMap;

use crate::types::{BettingCategory, CategorySummary, NormalizedRecord, OverallSummary, TypeSummary};

/// Null-skipping sum over an optional column.
fn sum_column(rows: &[&NormalizedRecord], column: impl Fn(&NormalizedRecord) -> Option<f64>) -> f64 {
    rows.iter().filter_map(|r| column(r)).sum()
}

/// Overall totals: sum of bets, sum of payouts, and their difference.
pub fn overall(rows: &[NormalizedRecord]) -> OverallSummary {
    let all: Vec<&NormalizedRecord> = rows.iter().collect();
    let total_bet_usd = sum_column(&all, |r| r.amount_usd);
    let total_payout_usd = sum_column(&all, |r| r.payout_usd);
    OverallSummary {
        total_bet_usd,
        total_payout_usd,
        net_usd: total_bet_usd - total_payout_usd,
    }
}

/// Grouped sums for the slot and sports categories only, in stable
/// label order (slot before sports).
pub fn slot_vs_sports(rows: &[NormalizedRecord]) -> Vec<CategorySummary> {
    [BettingCategory::Slot, BettingCategory::Sports]
        .into_iter()
        .map(|category| {
            let group: Vec<&NormalizedRecord> =
                rows.iter().filter(|r| r.betting == category).collect();
            CategorySummary {
                betting: category,
                amount_usd: sum_column(&group, |r| r.amount_usd),
                payout_usd: sum_column(&group, |r| r.payout_usd),
            }
        })
        .collect()
}

/// Grouped sums per distinct `type` value, sorted by type. Rows with no
/// `type` have no grouping key and are excluded.
pub fn breakdown_by_type(rows: &[NormalizedRecord]) -> Vec<TypeSummary> {
    let mut groups: BTreeMap<&str, Vec<&NormalizedRecord>> = BTreeMap::new();
    for row in rows {
        if let Some(kind) = row.kind.as_deref() {
            groups.entry(kind).or_default().push(row);
        }
    }

    groups
        .into_iter()
        .map(|(kind, group)| TypeSummary {
            kind: kind.to_string(),
            amount_usd: sum_column(&group, |r| r.amount_usd),
            payout_usd: sum_column(&group, |r| r.payout_usd),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        betting: BettingCategory,
        kind: Option<&str>,
        amount_usd: Option<f64>,
        payout_usd: Option<f64>,
    ) -> NormalizedRecord {
        NormalizedRecord {
            game: None,
            kind: kind.map(str::to_string),
            value: None,
            amount: None,
            payout: None,
            currency: None,
            expected_amount: None,
            payout_multiplier: None,
            created_at_dt: None,
            created_at_date: None,
            price_usd: None,
            amount_usd,
            payout_usd,
            betting,
        }
    }

    #[test]
    fn test_overall_skips_nulls() {
        // amount_usd = [100, null], payout_usd = [40, 60]:
        // bet = 100, payout = 100, net = 0
        let rows = vec![
            row(BettingCategory::Slot, Some("softswiss"), Some(100.0), Some(40.0)),
            row(BettingCategory::Sports, Some("sportsbook"), None, Some(60.0)),
        ];
        let summary = overall(&rows);
        assert!((summary.total_bet_usd - 100.0).abs() < 1e-10);
        assert!((summary.total_payout_usd - 100.0).abs() < 1e-10);
        assert!(summary.net_usd.abs() < 1e-10);
    }

    #[test]
    fn test_overall_empty() {
        let summary = overall(&[]);
        assert_eq!(summary.total_bet_usd, 0.0);
        assert_eq!(summary.total_payout_usd, 0.0);
        assert_eq!(summary.net_usd, 0.0);
    }

    #[test]
    fn test_slot_vs_sports_filters_and_groups() {
        let rows = vec![
            row(BettingCategory::Slot, None, Some(10.0), Some(5.0)),
            row(BettingCategory::Slot, None, Some(20.0), None),
            row(BettingCategory::Sports, None, Some(7.0), Some(14.0)),
            // Other categories excluded from the comparison
            row(BettingCategory::Crash, None, Some(999.0), Some(999.0)),
            row(BettingCategory::CasinoOther, None, Some(999.0), Some(999.0)),
        ];
        let summary = slot_vs_sports(&rows);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].betting, BettingCategory::Slot);
        assert!((summary[0].amount_usd - 30.0).abs() < 1e-10);
        assert!((summary[0].payout_usd - 5.0).abs() < 1e-10);
        assert_eq!(summary[1].betting, BettingCategory::Sports);
        assert!((summary[1].amount_usd - 7.0).abs() < 1e-10);
        assert!((summary[1].payout_usd - 14.0).abs() < 1e-10);
    }

    #[test]
    fn test_breakdown_by_type() {
        let rows = vec![
            row(BettingCategory::Slot, Some("softswiss"), Some(10.0), Some(1.0)),
            row(BettingCategory::Slot, Some("softswiss"), Some(5.0), Some(2.0)),
            row(BettingCategory::Sports, Some("sportsbook"), Some(3.0), None),
            row(BettingCategory::CasinoOther, None, Some(999.0), Some(999.0)),
        ];
        let breakdown = breakdown_by_type(&rows);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].kind, "softswiss");
        assert!((breakdown[0].amount_usd - 15.0).abs() < 1e-10);
        assert!((breakdown[0].payout_usd - 3.0).abs() < 1e-10);
        assert_eq!(breakdown[1].kind, "sportsbook");
        assert!((breakdown[1].payout_usd - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_breakdown_sorted_by_type() {
        let rows = vec![
            row(BettingCategory::Slot, Some("zeta"), Some(1.0), None),
            row(BettingCategory::Slot, Some("alpha"), Some(2.0), None),
        ];
        let breakdown = breakdown_by_type(&rows);
        assert_eq!(breakdown[0].kind, "alpha");
        assert_eq!(breakdown[1].kind, "zeta");
    }
}
