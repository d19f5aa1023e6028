//! Result ordering.

use std::cmp::Ordering;

use crate::criteria::{SortBy, SortOrder};
use crate::model::Record;

/// Natural (ascending) comparison for a sort key.
fn compare(a: &Record, b: &Record, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Date => a.date.cmp(&b.date),
        SortBy::Relevance => a.engagement().cmp(&b.engagement()),
        SortBy::Author => a.author.cmp(&b.author),
    }
}

/// Sort in place. Stable: records with equal keys keep their input order
/// in both directions, since descending reverses the comparator rather
/// than the output.
pub fn sort_records(records: &mut [Record], sort_by: SortBy, order: SortOrder) {
    match order {
        SortOrder::Ascending => records.sort_by(|a, b| compare(a, b, sort_by)),
        SortOrder::Descending => records.sort_by(|a, b| compare(a, b, sort_by).reverse()),
    }
}
