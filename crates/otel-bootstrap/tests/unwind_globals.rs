//! Global providers after a failed bootstrap.
//!
//! Kept as a single test in its own binary: it mutates global state.

use opentelemetry::global;
use opentelemetry::trace::{Span as _, Tracer as _};
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
use otel_bootstrap::{
    bootstrap_with, BootstrapError, PipelineFactory, Signal, TelemetryConfig,
};
use tokio_util::sync::CancellationToken;

struct MetricFails {
    spans: InMemorySpanExporter,
}

impl PipelineFactory for MetricFails {
    fn tracer_provider(&self, _: &TelemetryConfig) -> Result<SdkTracerProvider, BootstrapError> {
        Ok(SdkTracerProvider::builder()
            .with_simple_exporter(self.spans.clone())
            .build())
    }

    fn meter_provider(&self, _: &TelemetryConfig) -> Result<SdkMeterProvider, BootstrapError> {
        Err(BootstrapError::construction(
            Signal::Metric,
            "collector unreachable",
        ))
    }

    fn logger_provider(&self, _: &TelemetryConfig) -> Result<SdkLoggerProvider, BootstrapError> {
        unreachable!("log pipeline built after a metric failure")
    }
}

#[test]
fn failed_bootstrap_leaves_no_closed_global_tracer() {
    let spans = InMemorySpanExporter::default();
    let factory = MetricFails {
        spans: spans.clone(),
    };
    let cfg = TelemetryConfig::new("http://collector:4318", "inventory", "ci", "0.1.0");

    let err = bootstrap_with(&factory, &cfg, &CancellationToken::new()).unwrap_err();
    assert_eq!(err.failed_signal(), Some(Signal::Metric));

    // A shut-down SDK provider hands out spans with an empty context; the
    // replacement provider still samples, it just has nowhere to export.
    let mut span = global::tracer("unwind-test").start("after-failure");
    assert!(span.span_context().is_valid());
    span.end();

    assert!(spans.get_finished_spans().unwrap().is_empty());
}
