//! OTLP/HTTP pipelines: one exporter per signal, each bound to
//! `<collector base>/v1/<signal>`.

use std::time::Duration;

use opentelemetry_otlp::{
    LogExporter, MetricExporter, Protocol, SpanExporter, WithExportConfig, WithHttpConfig,
};
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::debug;

use super::{resource, views, PipelineFactory, Signal};
use crate::config::TelemetryConfig;
use crate::error::BootstrapError;

/// Maximum time allowed for a single trace or metric export.
pub const EXPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// How often the periodic reader collects and exports metrics.
pub const METRIC_INTERVAL: Duration = Duration::from_secs(5);

/// Production [`PipelineFactory`] exporting over OTLP/HTTP.
///
/// Trace and metric exporters speak OTLP/JSON (`content-type:
/// application/json`); the log exporter keeps the transport defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtlpHttpPipelines;

impl PipelineFactory for OtlpHttpPipelines {
    fn tracer_provider(&self, cfg: &TelemetryConfig) -> Result<SdkTracerProvider, BootstrapError> {
        let endpoint = cfg.endpoint(Signal::Trace);
        debug!(%endpoint, "building OTLP span exporter");

        let exporter = SpanExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpJson)
            .with_endpoint(endpoint)
            .with_timeout(EXPORT_TIMEOUT)
            .with_headers(cfg.headers.clone())
            .build()
            .map_err(|e| BootstrapError::construction(Signal::Trace, e))?;

        Ok(SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource::service_resource(cfg))
            .build())
    }

    fn meter_provider(&self, cfg: &TelemetryConfig) -> Result<SdkMeterProvider, BootstrapError> {
        let endpoint = cfg.endpoint(Signal::Metric);
        debug!(%endpoint, "building OTLP metric exporter");

        let exporter = MetricExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpJson)
            .with_endpoint(endpoint)
            .with_timeout(EXPORT_TIMEOUT)
            .with_headers(cfg.headers.clone())
            .build()
            .map_err(|e| BootstrapError::construction(Signal::Metric, e))?;

        let reader = PeriodicReader::builder(exporter)
            .with_interval(METRIC_INTERVAL)
            .build();

        Ok(SdkMeterProvider::builder()
            .with_resource(resource::service_resource(cfg))
            .with_reader(reader)
            .with_view(views::http_server_duration_view)
            .build())
    }

    fn logger_provider(&self, cfg: &TelemetryConfig) -> Result<SdkLoggerProvider, BootstrapError> {
        let endpoint = cfg.endpoint(Signal::Log);
        debug!(%endpoint, "building OTLP log exporter");

        let exporter = LogExporter::builder()
            .with_http()
            .with_endpoint(endpoint)
            .with_headers(cfg.headers.clone())
            .build()
            .map_err(|e| BootstrapError::construction(Signal::Log, e))?;

        Ok(SdkLoggerProvider::builder()
            .with_resource(resource::merged_resource(cfg))
            .with_batch_exporter(exporter)
            .build())
    }
}
