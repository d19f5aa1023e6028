//! The query engine: filter a record set by [`FilterCriteria`], then order it.
//!
//! [`evaluate`] is the pure core. [`QueryEngine`] wraps it with a tracing
//! span and metric instruments; neither affects the result, so an engine
//! can be shared freely across threads and called on every keystroke.

pub mod facets;
pub mod filter;
pub mod sort;

pub use facets::Facets;

use std::time::Instant;

use opentelemetry::KeyValue;

use crate::criteria::{CriteriaInput, FilterCriteria};
use crate::error::Result;
use crate::model::Record;
use crate::telemetry::{metrics, query as spans};

/// Filter and sort `records` by `criteria`, returning a new vector.
///
/// The input is never modified. Records with equal sort keys keep their
/// relative input order.
pub fn evaluate(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    let mut out: Vec<Record> = records
        .iter()
        .filter(|record| filter::matches(record, criteria))
        .cloned()
        .collect();
    sort::sort_records(&mut out, criteria.sort_by(), criteria.sort_order());
    out
}

/// Instrumented entry point for running queries.
#[derive(Clone)]
pub struct QueryEngine {
    evaluations: opentelemetry::metrics::Counter<u64>,
    scanned: opentelemetry::metrics::Counter<u64>,
    matched: opentelemetry::metrics::Counter<u64>,
    invalid: opentelemetry::metrics::Counter<u64>,
    duration_ms: opentelemetry::metrics::Histogram<f64>,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self {
            evaluations: metrics::query_evaluations(),
            scanned: metrics::records_scanned(),
            matched: metrics::records_matched(),
            invalid: metrics::invalid_criteria(),
            duration_ms: metrics::evaluation_duration_ms(),
        }
    }

    /// Run a validated query.
    pub fn evaluate(&self, records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
        let span = spans::start_query_span(criteria, records.len());
        let _entered = span.enter();
        let started = Instant::now();

        let out = evaluate(records, criteria);

        let labels = [KeyValue::new("sort_by", criteria.sort_by().to_string())];
        self.evaluations.add(1, &labels);
        self.scanned.add(records.len() as u64, &labels);
        self.matched.add(out.len() as u64, &labels);
        self.duration_ms
            .record(started.elapsed().as_secs_f64() * 1000.0, &labels);
        spans::record_matched(&span, out.len());

        tracing::debug!(
            scanned = records.len(),
            matched = out.len(),
            active_predicates = criteria.active_predicates(),
            "query evaluated"
        );
        out
    }

    /// Validate raw criteria and run the query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCriteria`](crate::error::Error::InvalidCriteria)
    /// for an unknown sort key, sort order, media type or tag mode, or an
    /// unparsable date bound. Nothing is evaluated in that case.
    pub fn evaluate_input(&self, records: &[Record], input: &CriteriaInput) -> Result<Vec<Record>> {
        let criteria = input.validate().inspect_err(|e| {
            self.invalid.add(1, &[]);
            tracing::warn!(error = %e, "rejected query criteria");
        })?;
        Ok(self.evaluate(records, &criteria))
    }

    /// Facet counts over the records a query would return.
    pub fn facets(&self, records: &[Record], criteria: &FilterCriteria) -> Facets {
        Facets::collect(&self.evaluate(records, criteria))
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}
