//! Resource descriptors attached to every signal.

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{
    DEPLOYMENT_ENVIRONMENT_NAME, SERVICE_NAME, SERVICE_VERSION,
};
use opentelemetry_semantic_conventions::SCHEMA_URL;

use crate::config::TelemetryConfig;

fn service_attributes(cfg: &TelemetryConfig) -> [KeyValue; 3] {
    [
        KeyValue::new(SERVICE_NAME, cfg.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, cfg.version.clone()),
        KeyValue::new(DEPLOYMENT_ENVIRONMENT_NAME, cfg.environment.clone()),
    ]
}

/// Resource for the trace and metric pipelines: exactly the three service
/// attributes, tagged with the semantic-conventions schema URL.
pub fn service_resource(cfg: &TelemetryConfig) -> Resource {
    Resource::builder_empty()
        .with_schema_url(service_attributes(cfg), SCHEMA_URL)
        .build()
}

/// Resource for the log pipeline: SDK defaults (telemetry.sdk.*, env
/// detectors) merged with the three service attributes, which take priority.
pub fn merged_resource(cfg: &TelemetryConfig) -> Resource {
    // `with_schema_url` layers the detected attributes over the ones passed
    // in, so the service attributes are added afterwards to win over
    // `unknown_service` and `OTEL_RESOURCE_ATTRIBUTES`.
    Resource::builder()
        .with_schema_url(std::iter::empty::<KeyValue>(), SCHEMA_URL)
        .with_attributes(service_attributes(cfg))
        .build()
}
