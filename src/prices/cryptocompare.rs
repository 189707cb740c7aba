//! CryptoCompare historical price client.
//!
//! Implements `CandleSource` against the `histoday` endpoint.
//!
//! API: `https://min-api.cryptocompare.com/data/v2/histoday`
//! Auth: none required for daily candles at this volume.
//! Query: `fsym` (uppercase symbol), `tsym=USD`, `toTs` (epoch seconds,
//! end of range), `limit` (day count).
//! Response: `{"Data": {"Data": [{"time": secs, "close": f64}, ...]}}`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{Candle, CandleSource};

const DEFAULT_BASE_URL: &str = "https://min-api.cryptocompare.com";

// ---------------------------------------------------------------------------
// API response types (CryptoCompare JSON → Rust)
// ---------------------------------------------------------------------------

/// Outer envelope of a `histoday` response. The nested `Data.Data` shape
/// is the API's, not ours.
#[derive(Debug, Deserialize)]
struct HistodayResponse {
    #[serde(rename = "Data")]
    data: HistodayData,
}

#[derive(Debug, Deserialize)]
struct HistodayData {
    #[serde(rename = "Data")]
    data: Vec<Candle>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// CryptoCompare daily-candle client.
pub struct CryptoCompareClient {
    http: Client,
    base_url: String,
}

impl CryptoCompareClient {
    /// Create a client against the public CryptoCompare API.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs)
    }

    /// Create a client against a custom base URL (used by tests).
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("STAKELENS/0.1.0")
            .build()
            .context("Failed to build CryptoCompare HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CandleSource for CryptoCompareClient {
    async fn fetch_daily(&self, symbol: &str, to_ts: i64, limit: u32) -> Result<Vec<Candle>> {
        let url = format!("{}/data/v2/histoday", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("fsym", symbol),
                ("tsym", "USD"),
                ("toTs", &to_ts.to_string()),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .context(format!("histoday request failed for {symbol}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("CryptoCompare API error for {symbol}: {status}");
        }

        let data: HistodayResponse = resp
            .json()
            .await
            .context(format!("Failed to parse histoday response for {symbol}"))?;

        debug!(symbol, candles = data.data.data.len(), "histoday response received");
        Ok(data.data.data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histoday_response_parses() {
        let json = r#"{
            "Response": "Success",
            "Data": {
                "TimeFrom": 1704067200,
                "TimeTo": 1704153600,
                "Data": [
                    {"time": 1704067200, "high": 44000, "low": 41000, "open": 42500, "close": 42000.5, "volumefrom": 1.0, "volumeto": 2.0},
                    {"time": 1704153600, "high": 45000, "low": 42000, "open": 42000, "close": 44100.0, "volumefrom": 1.0, "volumeto": 2.0}
                ]
            }
        }"#;
        let parsed: HistodayResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.data.len(), 2);
        assert_eq!(parsed.data.data[0].time, 1704067200);
        assert!((parsed.data.data[0].close - 42000.5).abs() < 1e-10);
    }

    #[test]
    fn test_histoday_response_missing_keys_is_error() {
        // An upstream error payload has no Data.Data — parsing must fail
        // so the fill phase can record null sentinels.
        let json = r#"{"Response": "Error", "Message": "market does not exist"}"#;
        let parsed: Result<HistodayResponse, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_client_builds() {
        let client = CryptoCompareClient::new(15).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);

        let client = CryptoCompareClient::with_base_url("http://localhost:9999/", 5).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
