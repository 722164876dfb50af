//! `derrick-server` binary: serves the read API over the record store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use derrick_config::{ConfigLoader, ENV_PREFIX};
use derrick_server::Server;
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

    let store = Arc::new(
        WellStore::open(&config.store.path)
            .with_context(|| format!("failed to open well store at {}", config.store.path))?,
    );
    tracing::info!(path = %config.store.path, "record store ready");

    let server = Server::builder(store)
        .http_addr(&config.server.http_addr)
        .request_timeout(Duration::from_millis(config.server.request_timeout_ms))
        .shutdown_timeout(Duration::from_secs(config.server.shutdown_timeout_secs))
        .build();

    server.run().await?;
    Ok(())
}
