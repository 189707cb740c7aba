//! Record normalization.
//!
//! Joins each raw record to its resolved USD price and derives the USD
//! monetary columns. This is a pure function of (records, cache): the
//! cache is the only external state, threaded explicitly, so re-running
//! over a fully populated cache is byte-for-byte idempotent.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::classify::classify;
use crate::prices::PriceCache;
use crate::types::{BettingCategory, NormalizedRecord, PipelineError, Record};

/// `type` values whose rows are forced to the slot category after
/// classification.
const SLOT_TYPE_OVERRIDES: &[&str] = &["softswiss", "thirdparty"];

/// Collect the distinct (currency, date) pairs the fetch phase must
/// resolve, grouped per uppercased currency symbol. Records missing a
/// currency or a parseable timestamp contribute nothing.
pub fn price_requests(records: &[Record]) -> BTreeMap<String, BTreeSet<NaiveDate>> {
    let mut requests: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
    for record in records {
        let Some(currency) = record.currency.as_deref() else { continue };
        let Some(date) = created_date(record.created_at) else { continue };
        requests.entry(currency.to_uppercase()).or_default().insert(date);
    }
    requests
}

/// Epoch-millisecond timestamp → UTC datetime. Out-of-range values
/// coerce to `None` rather than erroring.
fn created_datetime(ms: Option<i64>) -> Option<DateTime<Utc>> {
    ms.and_then(DateTime::from_timestamp_millis)
}

fn created_date(ms: Option<i64>) -> Option<NaiveDate> {
    created_datetime(ms).map(|dt| dt.date_naive())
}

/// Coerce the raw `expectedAmount` value to a float.
///
/// Upstream emits numbers or numeric strings; anything else is malformed
/// source data and the one place a hard failure is appropriate.
fn coerce_expected_amount(raw: Option<&serde_json::Value>) -> Result<Option<f64>, PipelineError> {
    match raw {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| PipelineError::BadExpectedAmount(s.clone())),
        Some(other) => Err(PipelineError::BadExpectedAmount(other.to_string())),
    }
}

/// Normalize one record against the resolved price cache.
fn normalize_record(record: &Record, cache: &PriceCache) -> Result<NormalizedRecord, PipelineError> {
    let created_at_dt = created_datetime(record.created_at);
    let created_at_date = created_at_dt.map(|dt| dt.date_naive());

    // Cache lookup; absent and the null sentinel both surface as None.
    let price_usd = match (record.currency.as_deref(), created_at_date) {
        (Some(currency), Some(date)) => cache.price(currency, date),
        _ => None,
    };

    let amount_usd = record.amount.zip(price_usd).map(|(a, p)| a * p);

    // Multiplier branch: missing or null operands count as zero, so the
    // branch only fires for a genuinely positive multiplier and payout.
    let payout_usd = if record.payout_multiplier.unwrap_or(0.0) > 0.0
        && record.payout.unwrap_or(0.0) > 0.0
    {
        record.payout.zip(price_usd).map(|(p, price)| p * price)
    } else {
        amount_usd
    };

    let mut betting = classify(
        record.game.as_deref(),
        record.game_name.as_deref(),
        record.kind.as_deref(),
    );

    // Post-classification override: aggregator-managed types are slots
    // regardless of what the rules said.
    if let Some(kind) = record.kind.as_deref() {
        if SLOT_TYPE_OVERRIDES.contains(&kind.to_lowercase().as_str()) {
            betting = BettingCategory::Slot;
        }
    }

    Ok(NormalizedRecord {
        game: record.game.clone().or_else(|| record.kind.clone()),
        kind: record.kind.clone(),
        value: record.value,
        amount: record.amount,
        payout: record.payout,
        currency: record.currency.clone(),
        expected_amount: coerce_expected_amount(record.expected_amount.as_ref())?,
        payout_multiplier: record.payout_multiplier,
        created_at_dt,
        created_at_date,
        price_usd,
        amount_usd,
        payout_usd,
        betting,
    })
}

/// Normalize the whole batch. Pure with respect to the cache: no entry is
/// added or changed here, only read.
pub fn normalize(records: &[Record], cache: &PriceCache) -> Result<Vec<NormalizedRecord>> {
    let rows = records
        .iter()
        .map(|r| normalize_record(r, cache))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = rows.len(), "Batch normalized");
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
