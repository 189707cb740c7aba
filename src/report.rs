//! Output serialization.
//!
//! Writes the normalized analytics table, the three-section summary, and
//! the coin-price listing as CSV. Null values render as empty fields so
//! the table round-trips into spreadsheet tooling without fabricating
//! zeros.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::prices::PriceCache;
use crate::types::{CategorySummary, NormalizedRecord, OverallSummary, TypeSummary};

/// Fixed column order of the main table.
const TABLE_COLUMNS: &[&str] = &[
    "game",
    "type",
    "value",
    "amount",
    "payout",
    "currency",
    "expectedAmount",
    "payoutMultiplier",
    "createdAt_dt",
    "createdAt_date",
    "price_usd",
    "amount_usd",
    "payout_usd",
    "betting",
];

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the main analytics table, one row per input record.
pub fn write_table(path: impl AsRef<Path>, rows: &[NormalizedRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open output table {}", path.display()))?;

    writer.write_record(TABLE_COLUMNS)?;
    for row in rows {
        writer.write_record(&[
            opt_str(&row.game),
            opt_str(&row.kind),
            opt_num(row.value),
            opt_num(row.amount),
            opt_num(row.payout),
            opt_str(&row.currency),
            opt_num(row.expected_amount),
            opt_num(row.payout_multiplier),
            row.created_at_dt
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            row.created_at_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            opt_num(row.price_usd),
            opt_num(row.amount_usd),
            opt_num(row.payout_usd),
            row.betting.to_string(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Analytics table written");
    Ok(())
}

/// Write the summary report: three titled sections in one sheet-like CSV.
pub fn write_summary(
    path: impl AsRef<Path>,
    overall: &OverallSummary,
    slot_sports: &[CategorySummary],
    breakdown: &[TypeSummary],
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open summary report {}", path.display()))?;

    writer.write_record(["Overall summary"])?;
    writer.write_record(["Total Bet (USD)", "Total Payout (USD)", "Net Profit (USD)"])?;
    writer.write_record(&[
        overall.total_bet_usd.to_string(),
        overall.total_payout_usd.to_string(),
        overall.net_usd.to_string(),
    ])?;
    writer.write_record([""])?;

    writer.write_record(["Slot vs Sports"])?;
    writer.write_record(["betting", "amount_usd", "payout_usd"])?;
    for row in slot_sports {
        writer.write_record(&[
            row.betting.to_string(),
            row.amount_usd.to_string(),
            row.payout_usd.to_string(),
        ])?;
    }
    writer.write_record([""])?;

    writer.write_record(["Breakdown by type"])?;
    writer.write_record(["type", "amount_usd", "payout_usd"])?;
    for row in breakdown {
        writer.write_record(&[
            row.kind.clone(),
            row.amount_usd.to_string(),
            row.payout_usd.to_string(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), "Summary report written");
    Ok(())
}

/// Write the currency/date/price listing from the final cache state,
/// in deterministic (currency, date) order.
pub fn write_coin_prices(path: impl AsRef<Path>, cache: &PriceCache) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open coin price listing {}", path.display()))?;

    writer.write_record(["currency", "date", "price_usd"])?;
    for (symbol, date, price) in cache.iter() {
        writer.write_record(&[
            symbol.to_string(),
            date.format("%Y-%m-%d").to_string(),
            opt_num(price),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), entries = cache.len(), "Coin price listing written");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
