//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a sensible default so the binary runs out of the box
//! against `./complete_data_extracted` with outputs in the working
//! directory; a missing config file falls back to those defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub prices: PricesConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    /// Directory tree holding the extracted session JSON files.
    pub data_dir: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: "complete_data_extracted".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub table_path: String,
    pub summary_path: String,
    pub coin_prices_path: String,
    /// Persistent price cache location.
    pub cache_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            table_path: "cleaned_data_with_crypto.csv".to_string(),
            summary_path: "summary.csv".to_string(),
            coin_prices_path: "coin_prices_by_date.csv".to_string(),
            cache_path: "crypto_price_cache.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PricesConfig {
    /// Upstream daily-candle API base URL.
    pub base_url: String,
    /// Per-request timeout; a hang here stalls the whole run, so keep it
    /// short.
    pub timeout_secs: u64,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://min-api.cryptocompare.com".to_string(),
            timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file doesn't exist.
    pub fn load(path: &str) -> Result<Self> {
        if !std::path::Path::new(path).exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.input.data_dir, "complete_data_extracted");
        assert_eq!(cfg.output.cache_path, "crypto_price_cache.json");
        assert_eq!(cfg.prices.timeout_secs, 15);
        assert!(cfg.prices.base_url.contains("cryptocompare"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let cfg = AppConfig::load("/tmp/stakelens_no_such_config_12345.toml").unwrap();
        assert_eq!(cfg.output.table_path, "cleaned_data_with_crypto.csv");
    }

    #[test]
    fn test_load_partial_toml() {
        let toml = r#"
            [input]
            data_dir = "/data/sessions"

            [prices]
            timeout_secs = 30
        "#;
        let cfg: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.input.data_dir, "/data/sessions");
        assert_eq!(cfg.prices.timeout_secs, 30);
        // Unspecified sections keep their defaults
        assert_eq!(cfg.output.summary_path, "summary.csv");
    }
}
