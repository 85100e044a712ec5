//! `tracing` subscriber wired into a [`TelemetryContext`].
//!
//! Configures:
//! - An [`EnvFilter`] read from `RUST_LOG`, falling back to the given level.
//! - A JSON-formatted [`tracing_subscriber::fmt`] layer for structured stdout logs.
//! - A [`tracing_opentelemetry`] layer exporting `tracing` spans as OTel spans.
//! - An [`OpenTelemetryTracingBridge`] forwarding `tracing` events to the log pipeline.

use anyhow::{Context, Result};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use tracing_subscriber::{
    filter::filter_fn, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::context::TelemetryContext;

/// Targets emitted by the exporters' own HTTP stack. Bridging them into the
/// log pipeline would make every export produce more logs to export.
const EXPORTER_TARGETS: [&str; 5] = ["hyper", "h2", "reqwest", "opentelemetry", "tower"];

fn is_exporter_target(target: &str) -> bool {
    EXPORTER_TARGETS.iter().any(|prefix| {
        target
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::") || rest.starts_with('_'))
    })
}

/// Install the global `tracing` subscriber for `telemetry`.
///
/// `service_name` names the instrumentation scope of bridged spans.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init_subscriber(
    telemetry: &TelemetryContext,
    service_name: &str,
    log_level: &str,
) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let otel_span_layer =
        tracing_opentelemetry::layer().with_tracer(telemetry.tracer(service_name));

    let otel_log_layer = OpenTelemetryTracingBridge::new(telemetry.logger_provider())
        .with_filter(filter_fn(|meta| !is_exporter_target(meta.target())));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .with(otel_span_layer)
        .with(otel_log_layer)
        .try_init()
        .context("failed to initialise tracing subscriber")?;

    Ok(())
}
