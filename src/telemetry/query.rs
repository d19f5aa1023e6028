//! Query span helpers.

use tracing::Span;

use crate::criteria::FilterCriteria;

/// Start a span for one query evaluation.
///
/// `query.matched` is declared empty and filled by [`record_matched`].
pub fn start_query_span(criteria: &FilterCriteria, input_len: usize) -> Span {
    tracing::debug_span!(
        "query.evaluate",
        "query.sort_by" = %criteria.sort_by(),
        "query.sort_order" = %criteria.sort_order(),
        "query.active_predicates" = criteria.active_predicates(),
        "query.input" = input_len,
        "query.matched" = tracing::field::Empty,
    )
}

pub fn record_matched(span: &Span, matched: usize) {
    span.record("query.matched", matched);
}
