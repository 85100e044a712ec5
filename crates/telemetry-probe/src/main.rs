//! `telemetry-probe` — host binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Bootstrap the trace, metric, and log pipelines (fatal on failure).
//! 3. Install the `tracing` subscriber bridged into those pipelines.
//! 4. Emit one probe of each signal.
//! 5. Wait for Ctrl-C, then flush and close every pipeline.

mod config;
mod probe;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: telemetry-probe configuration invalid: {e:#}");
        e
    })?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    let telemetry_cfg = cfg.telemetry();
    let cancel = shutdown.clone();
    let telemetry =
        tokio::task::spawn_blocking(move || otel_bootstrap::bootstrap(&telemetry_cfg, &cancel))
            .await
            .context("telemetry bootstrap task panicked")?
            .map_err(|e| {
                eprintln!("ERROR: telemetry bootstrap failed: {e}");
                e
            })?;

    // -----------------------------------------------------------------------
    // 3. Subscriber
    // -----------------------------------------------------------------------
    otel_bootstrap::init_subscriber(telemetry.context(), &cfg.service_name, &cfg.log_level)?;
    info!(
        version = %cfg.service_version,
        environment = %cfg.environment,
        collector = %cfg.otel_exporter_otlp_endpoint,
        "telemetry-probe started"
    );

    // -----------------------------------------------------------------------
    // 4. Probe
    // -----------------------------------------------------------------------
    probe::emit(telemetry.context());

    // -----------------------------------------------------------------------
    // 5. Shutdown
    // -----------------------------------------------------------------------
    shutdown.cancelled().await;
    info!("shutdown requested");

    tokio::task::spawn_blocking(move || telemetry.shutdown())
        .await
        .context("telemetry shutdown task panicked")?
        .context("telemetry shutdown failed")?;

    Ok(())
}
