//! Error types produced while bootstrapping and tearing down telemetry.

use std::fmt;

use opentelemetry_sdk::error::OTelSdkError;
use thiserror::Error;

use crate::pipeline::Signal;

/// One or more required configuration fields are empty.
///
/// Raised before any exporter is constructed, so no network I/O has happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required telemetry configuration: {}", .missing.join(", "))]
pub struct ValidationError {
    /// Names of the empty fields, in declaration order.
    pub missing: Vec<&'static str>,
}

/// Failures collected while releasing initialised pipelines.
///
/// Every release in the registry is attempted; each failure is kept alongside
/// the signal whose pipeline produced it.
#[derive(Debug, Default, Error)]
pub struct ShutdownError {
    /// Per-signal release failures, in release order.
    pub failures: Vec<(Signal, OTelSdkError)>,
}

impl ShutdownError {
    /// Returns `true` if no release failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("telemetry shutdown failed: ")?;
        for (i, (signal, err)) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{signal} pipeline: {err}")?;
        }
        Ok(())
    }
}

/// Top-level bootstrap error.
///
/// Any value of this type is meant to be fatal to the hosting service.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The configuration was rejected before any pipeline was built.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Building the exporter or provider for `signal` failed.
    #[error("failed to construct {signal} pipeline: {source}")]
    ExporterConstruction {
        signal: Signal,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A construction failure whose unwind also failed to release one or
    /// more already-initialised pipelines.
    #[error("{cause}; {unwind}")]
    Unwound {
        cause: Box<BootstrapError>,
        unwind: ShutdownError,
    },
}

impl BootstrapError {
    /// Build an [`BootstrapError::ExporterConstruction`] for `signal`.
    pub fn construction<E>(signal: Signal, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        BootstrapError::ExporterConstruction {
            signal,
            source: source.into(),
        }
    }

    /// Join `self` with the outcome of unwinding the shutdown registry.
    ///
    /// An empty unwind leaves the error untouched.
    pub fn join(self, unwind: ShutdownError) -> Self {
        if unwind.is_empty() {
            self
        } else {
            BootstrapError::Unwound {
                cause: Box::new(self),
                unwind,
            }
        }
    }

    /// The signal whose construction failed, if this error came from a pipeline.
    pub fn failed_signal(&self) -> Option<Signal> {
        match self {
            BootstrapError::Validation(_) => None,
            BootstrapError::ExporterConstruction { signal, .. } => Some(*signal),
            BootstrapError::Unwound { cause, .. } => cause.failed_signal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_every_missing_field() {
        let e = ValidationError {
            missing: vec!["service_name", "version"],
        };
        assert_eq!(
            e.to_string(),
            "missing required telemetry configuration: service_name, version"
        );
    }

    #[test]
    fn join_with_empty_unwind_keeps_cause() {
        let e = BootstrapError::construction(Signal::Trace, "bad endpoint")
            .join(ShutdownError::default());
        assert!(matches!(e, BootstrapError::ExporterConstruction { .. }));
        assert_eq!(e.failed_signal(), Some(Signal::Trace));
    }

    #[test]
    fn join_keeps_both_failures_in_display() {
        let unwind = ShutdownError {
            failures: vec![(Signal::Trace, OTelSdkError::AlreadyShutdown)],
        };
        let e = BootstrapError::construction(Signal::Metric, "collector unreachable").join(unwind);

        let msg = e.to_string();
        assert!(msg.contains("metric pipeline: collector unreachable"));
        assert!(msg.contains("trace pipeline"));
        assert_eq!(e.failed_signal(), Some(Signal::Metric));
    }

    #[test]
    fn validation_has_no_failed_signal() {
        let e: BootstrapError = ValidationError {
            missing: vec!["otlp_base_url"],
        }
        .into();
        assert_eq!(e.failed_signal(), None);
    }
}
