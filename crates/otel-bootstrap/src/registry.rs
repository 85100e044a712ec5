//! [`ShutdownRegistry`]: ordered release operations for initialised pipelines.

use std::fmt;

use opentelemetry_sdk::error::OTelSdkResult;
use tracing::{debug, warn};

use crate::error::ShutdownError;
use crate::pipeline::Signal;

type Release = Box<dyn FnOnce() -> OTelSdkResult + Send>;

/// Release operations appended as each pipeline comes up.
///
/// Consumed by value, so each registered release runs at most once.
#[derive(Default)]
pub struct ShutdownRegistry {
    entries: Vec<(Signal, Release)>,
}

impl ShutdownRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the release operation for `signal`.
    pub fn register<F>(&mut self, signal: Signal, release: F)
    where
        F: FnOnce() -> OTelSdkResult + Send + 'static,
    {
        self.entries.push((signal, Box::new(release)));
    }

    /// Number of registered releases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Signals registered so far, in registration order.
    pub fn signals(&self) -> Vec<Signal> {
        self.entries.iter().map(|(signal, _)| *signal).collect()
    }

    /// Run every release in registration order and join their failures.
    ///
    /// A failing release does not stop the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns a [`ShutdownError`] holding every failure.
    pub fn release(self) -> Result<(), ShutdownError> {
        let mut joined = ShutdownError::default();
        for (signal, release) in self.entries {
            match release() {
                Ok(()) => debug!(%signal, "pipeline released"),
                Err(e) => {
                    warn!(%signal, error = %e, "pipeline release failed");
                    joined.failures.push((signal, e));
                }
            }
        }

        if joined.is_empty() {
            Ok(())
        } else {
            Err(joined)
        }
    }
}

impl fmt::Debug for ShutdownRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownRegistry")
            .field("signals", &self.signals())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_sdk::error::OTelSdkError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn empty_registry_releases_cleanly() {
        let registry = ShutdownRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.release().is_ok());
    }

    #[test]
    fn releases_run_once_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ShutdownRegistry::new();
        for signal in Signal::ALL {
            let order = order.clone();
            registry.register(signal, move || {
                order.lock().unwrap().push(signal);
                Ok(())
            });
        }
        assert_eq!(registry.len(), 3);

        registry.release().unwrap();
        assert_eq!(*order.lock().unwrap(), Signal::ALL.to_vec());
    }

    #[test]
    fn failures_are_joined_and_do_not_stop_later_releases() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ShutdownRegistry::new();

        let c = calls.clone();
        registry.register(Signal::Trace, move || {
            c.fetch_add(1, Ordering::SeqCst);
            Err(OTelSdkError::AlreadyShutdown)
        });
        let c = calls.clone();
        registry.register(Signal::Metric, move || {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let c = calls.clone();
        registry.register(Signal::Log, move || {
            c.fetch_add(1, Ordering::SeqCst);
            Err(OTelSdkError::InternalFailure("flush failed".into()))
        });

        let err = registry.release().unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let failed: Vec<Signal> = err.failures.iter().map(|(s, _)| *s).collect();
        assert_eq!(failed, vec![Signal::Trace, Signal::Log]);
        assert!(err.to_string().contains("flush failed"));
    }

    #[test]
    fn debug_lists_signals() {
        let mut registry = ShutdownRegistry::new();
        registry.register(Signal::Trace, || Ok(()));
        assert!(format!("{registry:?}").contains("Trace"));
    }
}
