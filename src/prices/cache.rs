//! Persistent price cache.
//!
//! Maps (currency symbol, UTC calendar date) to a USD closing price or an
//! explicit null sentinel meaning "looked up, unavailable". The cache is
//! the only state that survives across runs: loaded fully at run start,
//! mutated only by the fetch phase, written fully back at run end.
//!
//! On disk it is a JSON array of `[currency, "YYYY-MM-DD", price-or-null]`
//! triples. The null sentinel round-trips distinctly from "absent" — a key
//! missing from the map has never been looked up.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// ISO calendar date format used in the cache file.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// In-memory view of the persistent (currency, date) → price store.
///
/// Keys are case-normalized (currency uppercased) on both store and
/// lookup. Entries are never overwritten within a run and never evicted;
/// the map grows monotonically across runs.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    entries: BTreeMap<(String, NaiveDate), Option<f64>>,
}

impl PriceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(currency: &str, date: NaiveDate) -> (String, NaiveDate) {
        (currency.to_uppercase(), date)
    }

    /// Whether any entry (value or null sentinel) exists for this key.
    pub fn has(&self, currency: &str, date: NaiveDate) -> bool {
        self.entries.contains_key(&Self::key(currency, date))
    }

    /// Look up an entry. Outer `None` means the key was never looked up;
    /// `Some(None)` is the explicit "price unavailable" sentinel.
    pub fn lookup(&self, currency: &str, date: NaiveDate) -> Option<Option<f64>> {
        self.entries.get(&Self::key(currency, date)).copied()
    }

    /// Resolved price for a row: collapses "absent" and the null sentinel
    /// into `None`, which is what the USD derivations consume.
    pub fn price(&self, currency: &str, date: NaiveDate) -> Option<f64> {
        self.lookup(currency, date).flatten()
    }

    /// Insert an entry. First write wins: an existing entry (null or
    /// value) is never overwritten within a run.
    pub fn put(&mut self, currency: &str, date: NaiveDate, price: Option<f64>) {
        self.entries.entry(Self::key(currency, date)).or_insert(price);
    }

    /// Number of cached entries, null sentinels included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in deterministic (currency, date) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate, Option<f64>)> {
        self.entries
            .iter()
            .map(|((sym, date), price)| (sym.as_str(), *date, *price))
    }

    /// Load the cache from a JSON file.
    /// Returns an empty cache if the file doesn't exist (fresh start).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "No price cache found, starting fresh");
            return Ok(Self::new());
        }

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read price cache from {}", path.display()))?;

        let raw: Vec<(String, String, Option<f64>)> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse price cache from {}", path.display()))?;

        let mut cache = Self::new();
        for (symbol, date_str, price) in raw {
            let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Bad date {date_str} in price cache"))?;
            cache.put(&symbol, date, price);
        }

        info!(
            path = %path.display(),
            entries = cache.len(),
            "Price cache loaded from disk"
        );
        Ok(cache)
    }

    /// Save the cache to a JSON file, rewriting it wholesale.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let raw: Vec<(String, String, Option<f64>)> = self
            .entries
            .iter()
            .map(|((sym, date), price)| {
                (sym.clone(), date.format(DATE_FORMAT).to_string(), *price)
            })
            .collect();

        let json = serde_json::to_string_pretty(&raw)
            .context("Failed to serialise price cache")?;

        std::fs::write(path, &json)
            .with_context(|| format!("Failed to write price cache to {}", path.display()))?;

        debug!(path = %path.display(), entries = self.len(), "Price cache saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
