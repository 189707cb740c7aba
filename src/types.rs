//! Shared types for the STAKELENS pipeline.
//!
//! These types form the data model used across all modules: the raw
//! session record as it appears in the input JSON corpus, the normalized
//! record with resolved USD values, the betting-category label, and the
//! summary rollups produced by the aggregator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Raw record
// ---------------------------------------------------------------------------

/// One flattened game-session event from the input JSON corpus.
///
/// Every field may be absent or null in the source data; absence never
/// errors at parse time and propagates as `None` through the pipeline.
/// Per-game state blobs carried by some records are ignored — the output
/// schema is fixed and never includes them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Currency symbol the session was denominated in (e.g. "btc").
    #[serde(default)]
    pub currency: Option<String>,
    /// Session timestamp, epoch milliseconds UTC.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Wagered amount in the session currency.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Payout in the session currency.
    #[serde(default)]
    pub payout: Option<f64>,
    #[serde(default)]
    pub payout_multiplier: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
    /// Game identifier (e.g. "crash", "dice").
    #[serde(default)]
    pub game: Option<String>,
    /// Provider/vertical type (e.g. "sportsbook", "evolution", "softswiss").
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Human-readable game title, used for slot keyword matching.
    #[serde(default)]
    pub game_name: Option<String>,
    /// Expected amount as it appears in the source. Kept raw here because
    /// upstream emits it as a number or a numeric string; coercion happens
    /// in the normalizer and a non-numeric value is a fatal input error.
    #[serde(default)]
    pub expected_amount: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Betting category
// ---------------------------------------------------------------------------

/// Classification label assigned per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BettingCategory {
    Sports,
    Crash,
    Instant,
    Live,
    Slot,
    CasinoOther,
}

impl BettingCategory {
    /// All known categories (useful for iteration).
    pub const ALL: &'static [BettingCategory] = &[
        BettingCategory::Sports,
        BettingCategory::Crash,
        BettingCategory::Instant,
        BettingCategory::Live,
        BettingCategory::Slot,
        BettingCategory::CasinoOther,
    ];

    /// Wire/report name for the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            BettingCategory::Sports => "sports",
            BettingCategory::Crash => "crash",
            BettingCategory::Instant => "instant",
            BettingCategory::Live => "live",
            BettingCategory::Slot => "slot",
            BettingCategory::CasinoOther => "casino_other",
        }
    }
}

impl fmt::Display for BettingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BettingCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sports" => Ok(BettingCategory::Sports),
            "crash" => Ok(BettingCategory::Crash),
            "instant" => Ok(BettingCategory::Instant),
            "live" => Ok(BettingCategory::Live),
            "slot" => Ok(BettingCategory::Slot),
            "casino_other" => Ok(BettingCategory::CasinoOther),
            _ => Err(anyhow::anyhow!("Unknown betting category: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized record
// ---------------------------------------------------------------------------

/// A `Record` augmented with its resolved price and derived USD fields.
///
/// `price_usd` is `None` both when the cache holds the explicit null
/// sentinel and when the record has no resolvable (currency, date) key;
/// either way the USD derivations null-propagate and the row is retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// `game`, defaulted to `type` when the source field is absent.
    pub game: Option<String>,
    pub kind: Option<String>,
    pub value: Option<f64>,
    pub amount: Option<f64>,
    pub payout: Option<f64>,
    pub currency: Option<String>,
    pub expected_amount: Option<f64>,
    pub payout_multiplier: Option<f64>,
    pub created_at_dt: Option<DateTime<Utc>>,
    pub created_at_date: Option<NaiveDate>,
    pub price_usd: Option<f64>,
    pub amount_usd: Option<f64>,
    pub payout_usd: Option<f64>,
    pub betting: BettingCategory,
}

impl fmt::Display for NormalizedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} amount_usd={} payout_usd={}",
            self.betting,
            self.game.as_deref().unwrap_or("-"),
            self.currency.as_deref().unwrap_or("-"),
            self.amount_usd
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "null".to_string()),
            self.payout_usd
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "null".to_string()),
        )
    }
}

// ---------------------------------------------------------------------------
// Summary rollups
// ---------------------------------------------------------------------------

/// Overall totals across the whole normalized table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverallSummary {
    /// Sum of `amount_usd` over rows where it is non-null.
    pub total_bet_usd: f64,
    /// Sum of `payout_usd` over rows where it is non-null.
    pub total_payout_usd: f64,
    /// `total_bet_usd - total_payout_usd`.
    pub net_usd: f64,
}

impl fmt::Display for OverallSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bet=${:.2} payout=${:.2} net=${:.2}",
            self.total_bet_usd, self.total_payout_usd, self.net_usd,
        )
    }
}

/// Grouped sums for one betting category (slot-vs-sports comparison).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub betting: BettingCategory,
    pub amount_usd: f64,
    pub payout_usd: f64,
}

/// Grouped sums for one distinct `type` value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeSummary {
    pub kind: String,
    pub amount_usd: f64,
    pub payout_usd: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for STAKELENS.
///
/// Only the fatal, run-aborting conditions live here; recoverable fetch
/// failures are absorbed into the cache as null sentinels and never
/// surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Input directory not found: {0}")]
    MissingInputDir(String),

    #[error("No JSON files found under {0}")]
    NoInputFiles(String),

    #[error("Malformed input file {path}: {message}")]
    MalformedInput { path: String, message: String },

    #[error("Non-numeric expectedAmount: {0}")]
    BadExpectedAmount(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
