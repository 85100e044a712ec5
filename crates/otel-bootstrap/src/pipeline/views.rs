//! Static metric view overrides applied when the meter provider is built.

use opentelemetry_sdk::metrics::{Aggregation, Instrument, InstrumentKind, Stream};

/// Histogram instrument whose buckets are overridden.
pub const HTTP_SERVER_DURATION: &str = "http.server.request.duration";

/// Explicit bucket boundaries, in seconds, for [`HTTP_SERVER_DURATION`].
pub const HTTP_SERVER_DURATION_BOUNDARIES: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// View matching the HTTP server duration histogram and replacing its
/// default buckets with [`HTTP_SERVER_DURATION_BOUNDARIES`].
///
/// Every other instrument keeps the SDK default stream.
pub fn http_server_duration_view(instrument: &Instrument) -> Option<Stream> {
    if instrument.name() != HTTP_SERVER_DURATION || instrument.kind() != InstrumentKind::Histogram
    {
        return None;
    }

    Stream::builder()
        .with_aggregation(Aggregation::ExplicitBucketHistogram {
            boundaries: HTTP_SERVER_DURATION_BOUNDARIES.to_vec(),
            record_min_max: true,
        })
        .with_unit("s")
        .build()
        .ok()
}
