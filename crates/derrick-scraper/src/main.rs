//! `derrick-scraper` binary: scrapes the portal for every listed API number
//! and upserts the records into the store.

use std::time::Duration;

use anyhow::Context;

use derrick_config::{ConfigLoader, ENV_PREFIX};
use derrick_scraper::{read_api_numbers, Ingestor, WellFetcher};
use derrick_store::WellStore;
use derrick_telemetry::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_dotenv()
        .with_optional_file("derrick.toml")?
        .with_env_prefix(ENV_PREFIX)
        .load()?;

    init_logging(&config.logging.to_log_config())?;

    let api_numbers = read_api_numbers(&config.scraper.api_numbers_path).with_context(|| {
        format!(
            "failed to read identifier list from {}",
            config.scraper.api_numbers_path
        )
    })?;
    tracing::info!(count = api_numbers.len(), "loaded identifier list");

    let store = WellStore::open(&config.store.path)
        .with_context(|| format!("failed to open well store at {}", config.store.path))?;
    let fetcher = WellFetcher::new(&config.scraper).context("failed to build portal client")?;

    let ingestor = Ingestor::new(
        fetcher,
        store,
        Duration::from_millis(config.scraper.delay_ms),
        config.scraper.default_crs.clone(),
    );

    let summary = ingestor.run(&api_numbers).await;
    tracing::info!(
        attempted = summary.attempted,
        saved = summary.saved,
        failed = summary.failed,
        "ingest finished"
    );

    Ok(())
}
