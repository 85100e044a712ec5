//! Per-signal pipeline construction.
//!
//! A [`PipelineFactory`] turns a validated [`TelemetryConfig`] into one SDK
//! provider per signal. The production factory is [`OtlpHttpPipelines`];
//! tests substitute their own to observe construction order.

pub mod otlp;
pub mod resource;
pub mod views;

use std::fmt;

use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::config::TelemetryConfig;
use crate::error::BootstrapError;

pub use otlp::OtlpHttpPipelines;

/// The three telemetry signals, in bootstrap order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Trace,
    Metric,
    Log,
}

impl Signal {
    /// Every signal, in the order they are initialised.
    pub const ALL: [Signal; 3] = [Signal::Trace, Signal::Metric, Signal::Log];

    /// Path segment under `/v1/` on the collector.
    pub fn path(self) -> &'static str {
        match self {
            Signal::Trace => "traces",
            Signal::Metric => "metrics",
            Signal::Log => "logs",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Signal::Trace => "trace",
            Signal::Metric => "metric",
            Signal::Log => "log",
        })
    }
}

/// Builds the provider for each signal.
///
/// Implementations must not register anything globally; the sequencer owns
/// process-wide registration and unwinding.
#[cfg_attr(test, mockall::automock)]
pub trait PipelineFactory {
    /// Build the trace pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ExporterConstruction`] if the exporter cannot be built.
    fn tracer_provider(&self, cfg: &TelemetryConfig) -> Result<SdkTracerProvider, BootstrapError>;

    /// Build the metric pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ExporterConstruction`] if the exporter cannot be built.
    fn meter_provider(&self, cfg: &TelemetryConfig) -> Result<SdkMeterProvider, BootstrapError>;

    /// Build the log pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ExporterConstruction`] if the exporter cannot be built.
    fn logger_provider(&self, cfg: &TelemetryConfig) -> Result<SdkLoggerProvider, BootstrapError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_are_ordered_trace_metric_log() {
        assert_eq!(Signal::ALL, [Signal::Trace, Signal::Metric, Signal::Log]);
    }

    #[test]
    fn display_and_path_differ() {
        assert_eq!(Signal::Metric.to_string(), "metric");
        assert_eq!(Signal::Metric.path(), "metrics");
    }
}
