//! Fail-fast OpenTelemetry bootstrap.
//!
//! Validates a [`TelemetryConfig`], installs a W3C trace-context + baggage
//! propagator, then brings up trace, metric, and log pipelines exporting over
//! OTLP/HTTP to `<collector>/v1/{traces,metrics,logs}`.
//!
//! # Contract
//!
//! - Any [`BootstrapError`] is fatal: the host must not continue starting up.
//! - On success the returned [`Telemetry`] is live. The host calls
//!   [`Telemetry::shutdown`] on graceful exit; nothing here calls it for them.
//! - Batching, retry, encoding, and transport belong to the OpenTelemetry SDK.
//!
//! ```no_run
//! use otel_bootstrap::{bootstrap, TelemetryConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = TelemetryConfig::new("http://otel-collector:4318", "orders", "prod", "1.2.0");
//! let telemetry = bootstrap(&cfg, &CancellationToken::new())?;
//!
//! telemetry.context().mark("orders", "startup");
//!
//! telemetry.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod sequencer;
pub mod subscriber;

pub use config::TelemetryConfig;
pub use context::{current, TelemetryContext};
pub use error::{BootstrapError, ShutdownError, ValidationError};
pub use pipeline::{OtlpHttpPipelines, PipelineFactory, Signal};
pub use registry::ShutdownRegistry;
pub use sequencer::{bootstrap, bootstrap_with, composite_propagator, Telemetry};
pub use subscriber::init_subscriber;
