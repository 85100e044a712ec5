//! [`TelemetryContext`]: the three providers bundled into one value, plus a
//! process-wide slot for callers that want a zero-argument lookup.
//!
//! Code that can take a context explicitly should; [`current`] exists for
//! call sites that cannot thread one through. Until a bootstrap succeeds the
//! slot holds [`TelemetryContext::noop`].

use std::error::Error;
use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::SystemTime;

use arc_swap::ArcSwap;
use opentelemetry::logs::{AnyValue, LogRecord as _, Logger as _, LoggerProvider as _, Severity};
use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry::trace::{Span as _, Status, TraceContextExt, Tracer as _, TracerProvider as _};
use opentelemetry::{Context, InstrumentationScope};
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};

static CURRENT: LazyLock<ArcSwap<TelemetryContext>> =
    LazyLock::new(|| ArcSwap::from_pointee(TelemetryContext::noop()));

/// The process-wide telemetry context.
///
/// Lock-free; safe to call on hot paths.
pub fn current() -> Arc<TelemetryContext> {
    CURRENT.load_full()
}

/// Replace the process-wide telemetry context.
pub(crate) fn install(cx: TelemetryContext) {
    CURRENT.store(Arc::new(cx));
}

fn scope(name: &str) -> InstrumentationScope {
    InstrumentationScope::builder(name.to_owned()).build()
}

/// Trace, metric, and log providers for one bootstrap.
///
/// Cheap to clone: every provider is `Arc`-backed.
#[derive(Clone)]
pub struct TelemetryContext {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    logger_provider: SdkLoggerProvider,
}

impl TelemetryContext {
    /// Bundle already-built providers.
    pub fn new(
        tracer_provider: SdkTracerProvider,
        meter_provider: SdkMeterProvider,
        logger_provider: SdkLoggerProvider,
    ) -> Self {
        Self {
            tracer_provider,
            meter_provider,
            logger_provider,
        }
    }

    /// A context whose providers have no processors or readers: everything
    /// recorded through it is dropped.
    pub fn noop() -> Self {
        Self::new(
            SdkTracerProvider::builder().build(),
            SdkMeterProvider::builder().build(),
            SdkLoggerProvider::builder().build(),
        )
    }

    /// The trace pipeline's provider.
    pub fn tracer_provider(&self) -> &SdkTracerProvider {
        &self.tracer_provider
    }

    /// The metric pipeline's provider.
    pub fn meter_provider(&self) -> &SdkMeterProvider {
        &self.meter_provider
    }

    /// The log pipeline's provider. Never registered globally; the
    /// subscriber bridge and [`TelemetryContext::log_error`] reach it here.
    pub fn logger_provider(&self) -> &SdkLoggerProvider {
        &self.logger_provider
    }

    /// Tracer for the instrumentation scope `scope_name`.
    pub fn tracer(&self, scope_name: &str) -> SdkTracer {
        self.tracer_provider.tracer_with_scope(scope(scope_name))
    }

    /// Meter for the instrumentation scope `scope_name`, for recording custom metrics.
    pub fn meter(&self, scope_name: &str) -> Meter {
        self.meter_provider.meter_with_scope(scope(scope_name))
    }

    /// Start a span named `name` as a child of `parent` and return a context
    /// carrying it.
    ///
    /// The span stays open until [`TelemetryContext::end_span`] is called on
    /// the returned context.
    pub fn start_span(&self, parent: &Context, scope_name: &str, name: &str) -> Context {
        let span = self
            .tracer(scope_name)
            .start_with_context(name.to_owned(), parent);
        parent.with_span(span)
    }

    /// End the span carried by `cx`.
    pub fn end_span(&self, cx: &Context) {
        cx.span().end();
    }

    /// Record a zero-duration marker span: started and ended in one call.
    pub fn mark(&self, scope_name: &str, name: &str) {
        let mut span = self.tracer(scope_name).start(name.to_owned());
        span.end();
    }

    /// Mark the span in `cx` as failed with `err`'s message and attach `err`
    /// as an `exception` event.
    pub fn record_error(&self, cx: &Context, err: &dyn Error) {
        let span = cx.span();
        span.set_status(Status::error(err.to_string()));
        span.record_error(err);
    }

    /// Emit an error-level log record under `scope_name`.
    ///
    /// When `cx` carries a valid span, the record is correlated with it.
    pub fn log_error(&self, cx: &Context, scope_name: &str, message: &str) {
        let logger = self.logger_provider.logger_with_scope(scope(scope_name));
        let mut record = logger.create_log_record();

        let now = SystemTime::now();
        record.set_timestamp(now);
        record.set_observed_timestamp(now);
        record.set_severity_number(Severity::Error);
        record.set_severity_text("ERROR");
        record.set_body(AnyValue::from(message.to_owned()));

        let span = cx.span();
        let span_context = span.span_context();
        if span_context.is_valid() {
            record.set_trace_context(
                span_context.trace_id(),
                span_context.span_id(),
                Some(span_context.trace_flags()),
            );
        }

        logger.emit(record);
    }
}

impl fmt::Debug for TelemetryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryContext").finish_non_exhaustive()
    }
}

impl Default for TelemetryContext {
    fn default() -> Self {
        Self::noop()
    }
}
