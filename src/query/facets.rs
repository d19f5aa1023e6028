//! Facet counts over a record set.
//!
//! Drives the filter sidebar: which types, authors and tags exist in the
//! current results, how many records carry each, and the date span covered.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{MediaType, Record};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub total: usize,
    pub types: BTreeMap<MediaType, usize>,
    pub authors: BTreeMap<String, usize>,
    pub tags: BTreeMap<String, usize>,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

impl Facets {
    pub fn collect<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut facets = Facets::default();

        for record in records {
            facets.total += 1;
            *facets.types.entry(record.kind).or_default() += 1;
            *facets.authors.entry(record.author.clone()).or_default() += 1;
            for tag in &record.tags {
                *facets.tags.entry(tag.clone()).or_default() += 1;
            }
            facets.earliest = Some(facets.earliest.map_or(record.date, |d| d.min(record.date)));
            facets.latest = Some(facets.latest.map_or(record.date, |d| d.max(record.date)));
        }

        facets
    }

    /// Tags ordered by how many records carry them, most common first.
    /// Ties fall back to alphabetical order.
    pub fn top_tags(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut tags: Vec<(&str, usize)> = self
            .tags
            .iter()
            .map(|(tag, count)| (tag.as_str(), *count))
            .collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1));
        tags.truncate(limit);
        tags
    }
}
