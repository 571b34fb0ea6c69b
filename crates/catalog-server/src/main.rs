//! # Catalog Cloud Server
//!
//! Binary entry point: loads configuration, installs logging, and serves
//! the REST API until interrupted.

use anyhow::Context;
use catalog_config::ConfigLoader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::from_default_location()
        .load()
        .context("Failed to load configuration")?;

    catalog_server::logging::init_logging(&config.observability);

    catalog_server::run(config).await
}
