//! # Catalog Server
//!
//! Wires configuration, pools, repositories, the list cache, and services
//! into the HTTP router and runs it with graceful shutdown.

pub mod di;
pub mod logging;
pub mod startup;

use anyhow::Context;
use catalog_config::AppConfig;
use catalog_rest::create_router;
use di::AppContainer;
use tokio::signal;
use tracing::{error, info};

/// Runs the server until Ctrl+C or SIGTERM.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    startup::print_banner();
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let container = AppContainer::build(&config)
        .await
        .context("Failed to initialize application")?;

    let router = create_router(
        container.app_state(),
        container.token_provider(),
        &config.server,
    );

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    startup::print_startup_info(&addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    container.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
