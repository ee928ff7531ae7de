//! Walk-in Queue Daemon - Main Entry Point
//! Serves the queue engine over JSON-RPC until Ctrl+C

mod logging;
mod settings;
mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use settings::Settings;
use walkin_api_rpc::RpcServer;
use walkin_core::port::SystemTimeProvider;
use walkin_core::QueueEngine;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (defaults < file < WALKIN_* env)
    let config_path = settings::config_path();
    let settings = Settings::load(config_path.clone())?;

    // 2. Initialize logging; the guard flushes file output on exit
    let (otel, otel_error) = match telemetry::otel_layer() {
        Ok(layer) => (layer, None),
        Err(e) => (None, Some(e)),
    };
    let _log_guard = logging::init_logging(&settings.log, otel)?;

    info!("Walk-in Queue v{} starting...", VERSION);
    if let Some(e) = otel_error {
        warn!(error = ?e, "Failed to initialize OpenTelemetry (continuing without it)");
    }
    if let Some(path) = &config_path {
        info!(path = %path.display(), exists = path.exists(), "Configuration file");
    }

    // 3. Setup dependencies (DI wiring)
    let registry = Arc::new(settings.registry()?);
    info!(
        units = ?registry.unit_ids(),
        interleave_basis = ?settings.queue.interleave_basis,
        "Unit registry loaded"
    );

    let time_provider = Arc::new(SystemTimeProvider);
    let engine = Arc::new(QueueEngine::new(registry, time_provider, settings.queue));

    // 4. Start JSON-RPC server
    let rpc_server = RpcServer::new(settings.rpc_config(), engine);
    let (addr, rpc_handle) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
