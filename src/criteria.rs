//! Query criteria.
//!
//! [`FilterCriteria`] is the validated, immutable description of one query.
//! [`CriteriaInput`] is the loosely typed shape that arrives from JSON, TOML
//! presets and CLI flags; converting it is the only place criteria can fail.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::MediaType;

// ---------------------------------------------------------------------------
// Sort key / order / tag mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortBy {
    #[default]
    Date,
    /// Likes plus comments.
    Relevance,
    Author,
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SortBy::Date => "date",
            SortBy::Relevance => "relevance",
            SortBy::Author => "author",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "relevance" => Ok(SortBy::Relevance),
            "author" => Ok(SortBy::Author),
            other => Err(Error::invalid(format!(
                "unknown sort key '{other}' (expected date, relevance or author)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(Error::invalid(format!(
                "unknown sort order '{other}' (expected asc or desc)"
            ))),
        }
    }
}

/// How the tag list of a criteria is matched against a record's tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TagMatch {
    /// At least one listed tag is present.
    #[default]
    Any,
    /// Every listed tag is present.
    All,
}

impl std::fmt::Display for TagMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TagMatch::Any => "any",
            TagMatch::All => "all",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TagMatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(TagMatch::Any),
            "all" => Ok(TagMatch::All),
            other => Err(Error::invalid(format!(
                "unknown tag match mode '{other}' (expected any or all)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Date range
// ---------------------------------------------------------------------------

/// Inclusive date bounds. A missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn since(start: DateTime<Utc>) -> Self {
        Self::new(Some(start), None)
    }

    pub fn until(end: DateTime<Utc>) -> Self {
        Self::new(None, Some(end))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Parse a date bound. RFC 3339 timestamps are taken as given; a bare
/// `YYYY-MM-DD` covers the whole day, so it becomes midnight for a start
/// bound and the last nanosecond of the day for an end bound.
fn parse_bound(raw: &str, bound: Bound) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        Error::invalid(format!(
            "unparsable date '{raw}' (expected YYYY-MM-DD or RFC 3339)"
        ))
    })?;
    let naive = match bound {
        Bound::Start => day.and_hms_opt(0, 0, 0),
        Bound::End => day.and_hms_nano_opt(23, 59, 59, 999_999_999),
    }
    .ok_or_else(|| Error::invalid(format!("date '{raw}' out of range")))?;

    Ok(Utc.from_utc_datetime(&naive))
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// A validated query: which records to keep and how to order them.
///
/// Immutable once built. The `with_*` methods replace one field whole and
/// return the new value, so two criteria compare equal exactly when they
/// would select the same records in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CriteriaInput", into = "CriteriaInput")]
pub struct FilterCriteria {
    date_range: DateRange,
    types: BTreeSet<MediaType>,
    authors: BTreeSet<String>,
    tags: BTreeSet<String>,
    tag_match: TagMatch,
    text: Option<String>,
    sort_by: SortBy,
    sort_order: SortOrder,
}

impl FilterCriteria {
    /// The identity filter: everything, newest first.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = MediaType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    /// Authors are matched verbatim, so an empty name selects records
    /// whose author is empty.
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags
            .into_iter()
            .map(Into::into)
            .filter(|tag: &String| !tag.is_empty())
            .collect();
        self
    }

    pub fn with_tag_match(mut self, mode: TagMatch) -> Self {
        self.tag_match = mode;
        self
    }

    /// Free-text term. Blank input clears it.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        self.text = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    pub fn types(&self) -> &BTreeSet<MediaType> {
        &self.types
    }

    pub fn authors(&self) -> &BTreeSet<String> {
        &self.authors
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn tag_match(&self) -> TagMatch {
        self.tag_match
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Number of predicate categories that will actually constrain results.
    pub fn active_predicates(&self) -> usize {
        [
            !self.date_range.is_unbounded(),
            !self.types.is_empty(),
            !self.authors.is_empty(),
            !self.tags.is_empty(),
            self.text.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// True when no predicate is active and every record passes.
    pub fn is_identity(&self) -> bool {
        self.active_predicates() == 0
    }
}

// ---------------------------------------------------------------------------
// Unvalidated input
// ---------------------------------------------------------------------------

/// Criteria as they arrive from outside: every enum is still a string and
/// date bounds are unparsed. Accepts both snake_case and camelCase keys;
/// any other key is rejected rather than ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CriteriaInput {
    #[serde(alias = "dateRange", skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRangeInput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(alias = "tagMatchMode", alias = "tag_match_mode", skip_serializing_if = "Option::is_none")]
    pub tag_match: Option<String>,
    #[serde(alias = "query", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(alias = "sortBy", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(alias = "sortOrder", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateRangeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl CriteriaInput {
    /// Validate into a [`FilterCriteria`].
    pub fn validate(&self) -> Result<FilterCriteria> {
        FilterCriteria::try_from(self.clone())
    }

    /// Layer `other` on top of `self`. Every field `other` sets replaces the
    /// same field of `self` whole; unset fields (empty lists, `None`) leave
    /// `self` alone. A date range replaces both bounds together.
    pub fn overlay(self, other: CriteriaInput) -> CriteriaInput {
        fn list(base: Vec<String>, top: Vec<String>) -> Vec<String> {
            if top.is_empty() { base } else { top }
        }

        CriteriaInput {
            date_range: other.date_range.or(self.date_range),
            types: list(self.types, other.types),
            authors: list(self.authors, other.authors),
            tags: list(self.tags, other.tags),
            tag_match: other.tag_match.or(self.tag_match),
            text: other.text.or(self.text),
            sort_by: other.sort_by.or(self.sort_by),
            sort_order: other.sort_order.or(self.sort_order),
        }
    }

    /// Fill in the sort key and the sort order, each only where still unset.
    pub fn with_default_sort(mut self, sort_by: SortBy, sort_order: SortOrder) -> CriteriaInput {
        self.sort_by.get_or_insert_with(|| sort_by.to_string());
        self.sort_order.get_or_insert_with(|| sort_order.to_string());
        self
    }
}

impl TryFrom<CriteriaInput> for FilterCriteria {
    type Error = Error;

    fn try_from(input: CriteriaInput) -> Result<Self> {
        let date_range = match input.date_range {
            Some(range) => DateRange {
                start: range
                    .start
                    .as_deref()
                    .map(|s| parse_bound(s, Bound::Start))
                    .transpose()?,
                end: range
                    .end
                    .as_deref()
                    .map(|s| parse_bound(s, Bound::End))
                    .transpose()?,
            },
            None => DateRange::default(),
        };

        let types = input
            .types
            .iter()
            .map(|t| t.parse::<MediaType>())
            .collect::<Result<BTreeSet<_>>>()?;

        let mut criteria = FilterCriteria::new()
            .with_date_range(date_range)
            .with_types(types)
            .with_authors(input.authors)
            .with_tags(input.tags);

        if let Some(mode) = input.tag_match {
            criteria = criteria.with_tag_match(mode.parse()?);
        }
        if let Some(text) = input.text {
            criteria = criteria.with_text(text);
        }
        if let Some(sort_by) = input.sort_by {
            criteria = criteria.with_sort_by(sort_by.parse()?);
        }
        if let Some(sort_order) = input.sort_order {
            criteria = criteria.with_sort_order(sort_order.parse()?);
        }

        Ok(criteria)
    }
}

impl From<FilterCriteria> for CriteriaInput {
    fn from(criteria: FilterCriteria) -> Self {
        let date_range = (!criteria.date_range.is_unbounded()).then(|| DateRangeInput {
            start: criteria.date_range.start.map(|d| d.to_rfc3339()),
            end: criteria.date_range.end.map(|d| d.to_rfc3339()),
        });

        Self {
            date_range,
            types: criteria.types.iter().map(ToString::to_string).collect(),
            authors: criteria.authors.into_iter().collect(),
            tags: criteria.tags.into_iter().collect(),
            tag_match: Some(criteria.tag_match.to_string()),
            text: criteria.text,
            sort_by: Some(criteria.sort_by.to_string()),
            sort_order: Some(criteria.sort_order.to_string()),
        }
    }
}
