//! Drivers API server entry point.
//!
//! # Responsibility
//! - Load configuration and start logging before anything else.
//! - Bootstrap the store, then serve the router until Ctrl-C.

use driver_api::{router, ServerConfig};
use driver_core::{init_logging, ConnectionProvider, DriverService, SqliteDriverRepository};
use log::{error, info};
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    let log_dir = config.log_dir.to_string_lossy().into_owned();
    init_logging(&config.log_level, &log_dir)?;

    if let Err(err) = serve(config).await {
        error!("event=server_exit module=server status=error error={err}");
        return Err(err);
    }
    info!("event=server_exit module=server status=ok");
    Ok(())
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    let provider = ConnectionProvider::open(&config.connection_string)?;
    let service = Arc::new(DriverService::new(SqliteDriverRepository::new(provider)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_start module=server status=ok addr={} version={}",
        config.bind_addr,
        driver_core::core_version()
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
    info!("event=shutdown_signal module=server status=ok");
}
