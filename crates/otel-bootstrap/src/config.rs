//! Telemetry configuration and its validation.
//!
//! Reading the values (environment, files) is the host's job; this module only
//! describes the shape and checks that nothing required is empty.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ValidationError;
use crate::pipeline::Signal;

/// Immutable telemetry configuration supplied by the host process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TelemetryConfig {
    /// Collector base address, e.g. `http://otel-collector:4318`. **Required.**
    #[serde(alias = "otlpBaseURL")]
    pub otlp_base_url: String,

    /// Value of the `service.name` resource attribute. **Required.**
    #[serde(alias = "serviceName")]
    pub service_name: String,

    /// Value of the `deployment.environment.name` resource attribute. **Required.**
    pub environment: String,

    /// Value of the `service.version` resource attribute. **Required.**
    pub version: String,

    /// Extra HTTP headers attached to every export request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl TelemetryConfig {
    /// Convenience constructor for the four required fields.
    pub fn new(
        otlp_base_url: impl Into<String>,
        service_name: impl Into<String>,
        environment: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            otlp_base_url: otlp_base_url.into(),
            service_name: service_name.into(),
            environment: environment.into(),
            version: version.into(),
            headers: HashMap::new(),
        }
    }

    /// Attach an extra export header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Check that every required field is non-empty.
    ///
    /// Whitespace-only values count as empty.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every empty field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = [
            ("otlp_base_url", &self.otlp_base_url),
            ("service_name", &self.service_name),
            ("environment", &self.environment),
            ("version", &self.version),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Full collector URL for `signal`: `<base>/v1/<signal path>`.
    pub fn endpoint(&self, signal: Signal) -> String {
        format!(
            "{}/v1/{}",
            self.otlp_base_url.trim_end_matches('/'),
            signal.path()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TelemetryConfig {
        TelemetryConfig::new("http://collector:4318", "checkout", "staging", "1.4.2")
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_each_empty_field() {
        let cases: [(&str, fn(&mut TelemetryConfig)); 4] = [
            ("otlp_base_url", |c| c.otlp_base_url.clear()),
            ("service_name", |c| c.service_name.clear()),
            ("environment", |c| c.environment.clear()),
            ("version", |c| c.version.clear()),
        ];
        for (field, clear) in cases {
            let mut cfg = valid();
            clear(&mut cfg);
            let err = cfg.validate().unwrap_err();
            assert_eq!(err.missing, vec![field]);
        }
    }

    #[test]
    fn validate_reports_all_missing_fields_in_order() {
        let cfg = TelemetryConfig::new("", "svc", "  ", "");
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.missing, vec!["otlp_base_url", "environment", "version"]);
    }

    #[test]
    fn endpoint_appends_signal_path() {
        let cfg = valid();
        assert_eq!(cfg.endpoint(Signal::Trace), "http://collector:4318/v1/traces");
        assert_eq!(cfg.endpoint(Signal::Metric), "http://collector:4318/v1/metrics");
        assert_eq!(cfg.endpoint(Signal::Log), "http://collector:4318/v1/logs");
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let mut cfg = valid();
        cfg.otlp_base_url = "http://collector:4318/".into();
        assert_eq!(cfg.endpoint(Signal::Log), "http://collector:4318/v1/logs");
    }

    #[test]
    fn deserialises_camel_case_field_names() {
        let cfg: TelemetryConfig = serde_json::from_str(
            r#"{"otlpBaseURL":"http://c:4318","serviceName":"svc","environment":"prod","version":"2.0.0"}"#,
        )
        .unwrap();
        assert_eq!(cfg.otlp_base_url, "http://c:4318");
        assert_eq!(cfg.service_name, "svc");
        assert!(cfg.headers.is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn with_header_adds_entry() {
        let cfg = valid().with_header("authorization", "Bearer t");
        assert_eq!(cfg.headers.get("authorization").map(String::as_str), Some("Bearer t"));
    }
}
