//! Metric instrument factories for keepsake.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without an OTLP endpoint the global provider is a no-op, so building
//! instruments is always safe.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("keepsake")
}

/// Counter: queries evaluated.
/// Labels: `sort_by`.
pub fn query_evaluations() -> Counter<u64> {
    meter()
        .u64_counter("keepsake.query.evaluations")
        .with_description("Number of queries evaluated")
        .build()
}

/// Counter: records offered to the filter stage.
/// Labels: `sort_by`.
pub fn records_scanned() -> Counter<u64> {
    meter()
        .u64_counter("keepsake.query.records_scanned")
        .with_description("Records examined by queries")
        .build()
}

/// Counter: records returned by queries.
/// Labels: `sort_by`.
pub fn records_matched() -> Counter<u64> {
    meter()
        .u64_counter("keepsake.query.records_matched")
        .with_description("Records returned by queries")
        .build()
}

/// Counter: criteria rejected during validation.
pub fn invalid_criteria() -> Counter<u64> {
    meter()
        .u64_counter("keepsake.query.invalid_criteria")
        .with_description("Query criteria rejected as invalid")
        .build()
}

/// Histogram: evaluation time in milliseconds.
/// Labels: `sort_by`.
pub fn evaluation_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("keepsake.query.duration_ms")
        .with_description("Query evaluation duration in milliseconds")
        .with_unit("ms")
        .build()
}
