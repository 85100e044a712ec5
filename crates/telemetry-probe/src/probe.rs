//! Probe signals emitted once after startup, so a collector operator can see
//! one of each signal arrive.

use std::time::Instant;

use opentelemetry::{Context, KeyValue};
use otel_bootstrap::pipeline::views::HTTP_SERVER_DURATION;
use otel_bootstrap::TelemetryContext;
use tracing::info;

/// Instrumentation scope for everything the probe emits.
pub const SCOPE: &str = "telemetry-probe";

/// Emit a marker span, a request span with a failure recorded on it, an
/// error log correlated with that span, and one request-duration sample.
pub fn emit(telemetry: &TelemetryContext) {
    telemetry.mark(SCOPE, "probe.startup");

    let started = Instant::now();
    let cx = telemetry.start_span(&Context::new(), SCOPE, "probe.request");

    let failure = std::io::Error::other("synthetic probe failure");
    telemetry.record_error(&cx, &failure);
    telemetry.log_error(&cx, SCOPE, "probe request failed on purpose");

    telemetry
        .meter(SCOPE)
        .f64_histogram(HTTP_SERVER_DURATION)
        .with_unit("s")
        .build()
        .record(
            started.elapsed().as_secs_f64(),
            &[KeyValue::new("http.route", "/probe")],
        );

    telemetry.end_span(&cx);
    info!("probe signals emitted");
}
