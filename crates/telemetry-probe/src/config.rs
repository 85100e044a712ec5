//! Configuration loading and validation for the telemetry probe.

use anyhow::{Context, Result};
use otel_bootstrap::TelemetryConfig;
use serde::Deserialize;

/// Validated probe configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// OTLP collector base URL, e.g. `http://otel-collector:4318`. **Required.**
    pub otel_exporter_otlp_endpoint: String,

    /// Service name reported on every signal. **Required.**
    pub service_name: String,

    /// Deployment environment tag. **Required.**
    pub environment: String,

    /// Service version reported on every signal.
    #[serde(default = "default_service_version")]
    pub service_version: String,

    /// Tracing log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is absent or empty.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build telemetry-probe configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise telemetry-probe configuration")?;

        c.telemetry()
            .validate()
            .context("telemetry-probe configuration invalid")?;
        Ok(c)
    }

    /// The bootstrap configuration derived from this one.
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig::new(
            self.otel_exporter_otlp_endpoint.clone(),
            self.service_name.clone(),
            self.environment.clone(),
            self.service_version.clone(),
        )
    }
}
