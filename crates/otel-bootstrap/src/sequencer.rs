//! The bootstrap sequence: validate, install the propagator, then bring up
//! the trace, metric, and log pipelines in that order.
//!
//! # Failure semantics
//!
//! - Invalid configuration aborts before any exporter is built.
//! - The first pipeline that fails to build stops the sequence. Pipelines
//!   already up are released, and the construction error is joined with any
//!   release failures.
//! - Global providers set for released pipelines are put back to no-op
//!   providers, so nothing keeps recording into a closed pipeline.
//! - Nothing is retried. Callers are expected to treat any error as fatal.

use opentelemetry::global;
use opentelemetry::propagation::{TextMapCompositePropagator, TextMapPropagator};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::TelemetryConfig;
use crate::context::{self, TelemetryContext};
use crate::error::{BootstrapError, ShutdownError};
use crate::pipeline::{OtlpHttpPipelines, PipelineFactory, Signal};
use crate::registry::ShutdownRegistry;

/// Live telemetry returned by a successful bootstrap.
///
/// Call [`Telemetry::shutdown`] on graceful exit to flush and close every
/// pipeline. Dropping it without shutting down leaves flushing to the SDK
/// providers' own drop handling.
#[derive(Debug)]
pub struct Telemetry {
    context: TelemetryContext,
    registry: ShutdownRegistry,
}

impl Telemetry {
    /// The providers brought up by this bootstrap.
    pub fn context(&self) -> &TelemetryContext {
        &self.context
    }

    /// Flush and close every pipeline, joining all release failures.
    ///
    /// # Errors
    ///
    /// Returns a [`ShutdownError`] if any pipeline failed to release.
    pub fn shutdown(self) -> Result<(), ShutdownError> {
        info!(pipelines = self.registry.len(), "shutting down telemetry");
        self.registry.release()
    }
}

/// W3C trace-context plus baggage, as one propagator.
pub fn composite_propagator() -> TextMapCompositePropagator {
    let propagators: Vec<Box<dyn TextMapPropagator + Send + Sync>> = vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ];
    TextMapCompositePropagator::new(propagators)
}

/// Bootstrap OTLP/HTTP telemetry for `cfg`.
///
/// See [`bootstrap_with`].
///
/// # Errors
///
/// Returns a [`BootstrapError`] on invalid configuration or on the first
/// pipeline that cannot be built.
pub fn bootstrap(
    cfg: &TelemetryConfig,
    cancel: &CancellationToken,
) -> Result<Telemetry, BootstrapError> {
    bootstrap_with(&OtlpHttpPipelines, cfg, cancel)
}

/// Bootstrap telemetry using `factory` to build each pipeline.
///
/// On success the global propagator, tracer provider, and meter provider are
/// set, and [`context::current`] returns the new context. The returned
/// [`Telemetry`] is live; shutting it down is the caller's job.
///
/// A cancelled `cancel` token fails the next pipeline to be built, through
/// the normal unwind path. On failure the global tracer and meter providers
/// are no-op again, though the propagator stays installed.
///
/// # Errors
///
/// Returns a [`BootstrapError`] on invalid configuration or on the first
/// pipeline that cannot be built.
pub fn bootstrap_with<F>(
    factory: &F,
    cfg: &TelemetryConfig,
    cancel: &CancellationToken,
) -> Result<Telemetry, BootstrapError>
where
    F: PipelineFactory + ?Sized,
{
    cfg.validate()?;
    info!(
        service = %cfg.service_name,
        environment = %cfg.environment,
        version = %cfg.version,
        collector = %cfg.otlp_base_url,
        "bootstrapping telemetry"
    );

    global::set_text_map_propagator(composite_propagator());

    let mut registry = ShutdownRegistry::new();

    // --- Trace ---
    let tracer_provider = step(Signal::Trace, cancel, &mut registry, || {
        factory.tracer_provider(cfg)
    })?;
    global::set_tracer_provider(tracer_provider.clone());
    let release = tracer_provider.clone();
    registry.register(Signal::Trace, move || release.shutdown());
    installed(cfg, Signal::Trace);

    // --- Metric ---
    let meter_provider = step(Signal::Metric, cancel, &mut registry, || {
        factory.meter_provider(cfg)
    })?;
    global::set_meter_provider(meter_provider.clone());
    let release = meter_provider.clone();
    registry.register(Signal::Metric, move || release.shutdown());
    installed(cfg, Signal::Metric);

    // --- Log ---
    let logger_provider = step(Signal::Log, cancel, &mut registry, || {
        factory.logger_provider(cfg)
    })?;
    let release = logger_provider.clone();
    registry.register(Signal::Log, move || release.shutdown());
    installed(cfg, Signal::Log);

    let context = TelemetryContext::new(tracer_provider, meter_provider, logger_provider);
    context::install(context.clone());

    Ok(Telemetry { context, registry })
}

/// Build one pipeline, unwinding `registry` if that fails.
fn step<P>(
    signal: Signal,
    cancel: &CancellationToken,
    registry: &mut ShutdownRegistry,
    build: impl FnOnce() -> Result<P, BootstrapError>,
) -> Result<P, BootstrapError> {
    let built = if cancel.is_cancelled() {
        Err(BootstrapError::construction(signal, "bootstrap cancelled"))
    } else {
        build()
    };

    built.map_err(|cause| {
        warn!(
            %signal,
            error = %cause,
            unwinding = ?registry.signals(),
            "telemetry pipeline construction failed"
        );
        let released = registry.signals();
        let result = std::mem::take(registry).release();
        reset_globals(&released);
        match result {
            Ok(()) => cause,
            Err(unwind) => cause.join(unwind),
        }
    })
}

/// Point the OTel globals for `signals` at providers without processors or
/// readers.
fn reset_globals(signals: &[Signal]) {
    let noop = TelemetryContext::noop();
    for signal in signals {
        match signal {
            Signal::Trace => global::set_tracer_provider(noop.tracer_provider().clone()),
            Signal::Metric => global::set_meter_provider(noop.meter_provider().clone()),
            Signal::Log => {}
        }
    }
}

fn installed(cfg: &TelemetryConfig, signal: Signal) {
    info!(%signal, endpoint = %cfg.endpoint(signal), "telemetry pipeline installed");
}
