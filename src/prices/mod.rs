//! Historical price resolution.
//!
//! Defines the `CandleSource` trait over the upstream daily-candle API,
//! the persistent `PriceCache`, and the batch fill strategy that keeps
//! external lookups to exactly one range query per currency per run.

pub mod cache;
pub mod cryptocompare;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub use cache::PriceCache;
pub use cryptocompare::CryptoCompareClient;

/// One daily OHLC candle from the upstream price source. Only the fields
/// the pipeline consumes are deserialized.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Candle {
    /// Candle timestamp, epoch seconds UTC (midnight-aligned for daily data).
    pub time: i64,
    /// USD closing price.
    pub close: f64,
}

impl Candle {
    /// UTC calendar date this candle covers. `None` for out-of-range
    /// timestamps.
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.time, 0).map(|dt| dt.date_naive())
    }
}

/// Abstraction over the upstream historical price API.
///
/// Production uses `CryptoCompareClient`; tests substitute an in-memory
/// source so the fill strategy is exercised without network.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch up to `limit` daily candles for `symbol` vs USD, ending at
    /// the day containing `to_ts` (epoch seconds UTC).
    async fn fetch_daily(&self, symbol: &str, to_ts: i64, limit: u32) -> Result<Vec<Candle>>;
}

/// Fill the cache for one currency with exactly one upstream range query.
///
/// Only dates with no existing entry (value or null sentinel) are fetched;
/// the query spans `[min, max]` of those dates, anchored at `max`. Any
/// failure in the request/parse path is caught here: every still-missing
/// date is written with the null sentinel so the currency is not retried
/// again this run (or in later runs, until the cache is cleared).
///
/// Candles for dates that were not requested are ignored. Requested dates
/// absent from a successful response stay absent in the cache.
pub async fn fill<S: CandleSource + ?Sized>(
    source: &S,
    symbol: &str,
    requested: &BTreeSet<NaiveDate>,
    cache: &mut PriceCache,
) {
    let to_fetch: BTreeSet<NaiveDate> = requested
        .iter()
        .copied()
        .filter(|d| !cache.has(symbol, *d))
        .collect();

    if to_fetch.is_empty() {
        debug!(symbol, "All requested dates already cached, skipping fetch");
        return;
    }

    // BTreeSet iterates in order, so first/last are min/max.
    let start = *to_fetch.first().expect("to_fetch is non-empty");
    let end = *to_fetch.last().expect("to_fetch is non-empty");
    let limit = ((end - start).num_days() + 1) as u32;
    let to_ts = end
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
        .timestamp();

    debug!(
        symbol,
        start = %start,
        end = %end,
        limit,
        dates = to_fetch.len(),
        "Fetching daily candles"
    );

    match source.fetch_daily(&symbol.to_uppercase(), to_ts, limit).await {
        Ok(candles) => {
            let mut filled = 0usize;
            for candle in candles {
                let Some(date) = candle.date() else { continue };
                if to_fetch.contains(&date) {
                    cache.put(symbol, date, Some(candle.close));
                    filled += 1;
                }
            }
            debug!(symbol, filled, requested = to_fetch.len(), "Candles cached");
        }
        Err(e) => {
            // One failure poisons the whole request span: every date is
            // marked unavailable rather than retried against a failing
            // upstream.
            warn!(symbol, error = %e, "Price fetch failed, caching null for requested dates");
            for date in &to_fetch {
                cache.put(symbol, *date, None);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
