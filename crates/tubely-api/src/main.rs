use std::str::FromStr;

use tubely_core::Config;
use tubely_infra::{init_telemetry, LogFormat};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let log_format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|value| LogFormat::from_str(&value).ok())
        .unwrap_or(LogFormat::Pretty);
    init_telemetry(log_format).map_err(|e| anyhow::anyhow!("Failed to init telemetry: {}", e))?;

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (database, storage, pipeline, routes)
    let (_state, router) = tubely_api::setup::initialize_app(config.clone()).await?;

    tubely_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
