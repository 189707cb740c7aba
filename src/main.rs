//! STAKELENS — USD normalization and analytics for crypto game-session
//! records.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! then runs the batch pipeline once: discover input → load cache →
//! fetch missing prices → normalize → aggregate → write outputs →
//! persist cache.

use anyhow::Result;
use tracing::info;

use stakelens::aggregate;
use stakelens::config::AppConfig;
use stakelens::input;
use stakelens::normalize;
use stakelens::prices::{self, CryptoCompareClient, PriceCache};
use stakelens::report;

const BANNER: &str = r#"
 ____ _____  _    _  _______ _     _____ _   _ ____
/ ___|_   _|/ \  | |/ / ____| |   | ____| \ | / ___|
\___ \ | | / _ \ | ' /|  _| | |   |  _| |  \| \___ \
 ___) || |/ ___ \| . \| |___| |___| |___| |\  |___) |
|____/ |_/_/   \_\_|\_\_____|_____|_____|_| \_|____/

  Session analytics, normalized to USD
  v0.1.0 — batch pipeline
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        data_dir = %cfg.input.data_dir,
        cache_path = %cfg.output.cache_path,
        table_path = %cfg.output.table_path,
        "STAKELENS starting up"
    );

    // -- Load input corpus -----------------------------------------------

    let files = input::find_json_files(&cfg.input.data_dir)?;
    let records = input::load_records(&files)?;

    // -- Resolve prices ---------------------------------------------------

    let mut cache = PriceCache::load(&cfg.output.cache_path)?;
    let source = CryptoCompareClient::with_base_url(&cfg.prices.base_url, cfg.prices.timeout_secs)?;

    let requests = normalize::price_requests(&records);
    info!(currencies = requests.len(), "Price resolution starting");

    // Sequential by design: one awaited range query per currency, no
    // fan-out across currencies.
    for (currency, dates) in &requests {
        prices::fill(&source, currency, dates, &mut cache).await;
    }

    // -- Normalize, aggregate, write --------------------------------------

    let rows = normalize::normalize(&records, &cache)?;

    let overall = aggregate::overall(&rows);
    let slot_sports = aggregate::slot_vs_sports(&rows);
    let breakdown = aggregate::breakdown_by_type(&rows);

    report::write_table(&cfg.output.table_path, &rows)?;
    report::write_summary(&cfg.output.summary_path, &overall, &slot_sports, &breakdown)?;
    report::write_coin_prices(&cfg.output.coin_prices_path, &cache)?;

    // Persist the cache last so a write failure above doesn't strand a
    // half-reported run with fresh cache state.
    cache.save(&cfg.output.cache_path)?;

    info!(
        rows = rows.len(),
        cached_prices = cache.len(),
        total_bet_usd = format!("${:.2}", overall.total_bet_usd),
        total_payout_usd = format!("${:.2}", overall.total_payout_usd),
        net_usd = format!("${:.2}", overall.net_usd),
        "Pipeline complete"
    );

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stakelens=info"));

    let json_logging = std::env::var("STAKELENS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
