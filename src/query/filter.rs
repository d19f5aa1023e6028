//! Record predicates.
//!
//! Each category is checked only when its criteria field is active.
//! Categories combine with AND; tags combine per [`TagMatch`].

use crate::criteria::{FilterCriteria, TagMatch};
use crate::model::Record;

/// Does `record` pass every active predicate in `criteria`?
pub fn matches(record: &Record, criteria: &FilterCriteria) -> bool {
    matches_date(record, criteria)
        && matches_type(record, criteria)
        && matches_author(record, criteria)
        && matches_tags(record, criteria)
        && matches_text(record, criteria)
}

fn matches_date(record: &Record, criteria: &FilterCriteria) -> bool {
    criteria.date_range().contains(record.date)
}

fn matches_type(record: &Record, criteria: &FilterCriteria) -> bool {
    let types = criteria.types();
    types.is_empty() || types.contains(&record.kind)
}

fn matches_author(record: &Record, criteria: &FilterCriteria) -> bool {
    let authors = criteria.authors();
    authors.is_empty() || authors.contains(&record.author)
}

fn matches_tags(record: &Record, criteria: &FilterCriteria) -> bool {
    let wanted = criteria.tags();
    if wanted.is_empty() {
        return true;
    }
    match criteria.tag_match() {
        TagMatch::Any => wanted.iter().any(|tag| record.has_tag(tag)),
        TagMatch::All => wanted.is_subset(&record.tags),
    }
}

/// Case-insensitive substring match over the record's human-readable fields.
fn matches_text(record: &Record, criteria: &FilterCriteria) -> bool {
    let Some(term) = criteria.text() else {
        return true;
    };
    let needle = term.to_lowercase();
    let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);

    record.title.as_deref().is_some_and(hit)
        || record.description.as_deref().is_some_and(hit)
        || record.location.as_deref().is_some_and(hit)
        || hit(record.author.as_str())
        || record.tags.iter().any(|tag| hit(tag.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::DateRange;
    use crate::model::{MediaType, NewRecord};
    use chrono::{TimeZone, Utc};

    fn record() -> Record {
        NewRecord::new(
            MediaType::Photo,
            "Grandma Rose",
            Utc.with_ymd_and_hms(2023, 7, 4, 12, 0, 0).unwrap(),
        )
        .id("r1")
        .tags(["beach", "summer"])
        .location("Cape Cod")
        .title("Fourth of July picnic")
        .build()
    }

    #[test]
    fn identity_criteria_matches() {
        assert!(matches(&record(), &FilterCriteria::new()));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let at = Utc.with_ymd_and_hms(2023, 7, 4, 12, 0, 0).unwrap();
        let exact = FilterCriteria::new().with_date_range(DateRange::new(Some(at), Some(at)));
        assert!(matches(&record(), &exact));

        let after = FilterCriteria::new().with_date_range(DateRange::since(
            Utc.with_ymd_and_hms(2023, 7, 4, 12, 0, 1).unwrap(),
        ));
        assert!(!matches(&record(), &after));
    }

    #[test]
    fn tags_any_needs_one_overlap() {
        let some = FilterCriteria::new().with_tags(["summer", "winter"]);
        let none = FilterCriteria::new().with_tags(["winter", "ski"]);
        assert!(matches(&record(), &some));
        assert!(!matches(&record(), &none));
    }

    #[test]
    fn tags_all_needs_every_tag() {
        let both = FilterCriteria::new()
            .with_tags(["beach", "summer"])
            .with_tag_match(TagMatch::All);
        let extra = FilterCriteria::new()
            .with_tags(["beach", "summer", "winter"])
            .with_tag_match(TagMatch::All);
        assert!(matches(&record(), &both));
        assert!(!matches(&record(), &extra));
    }

    #[test]
    fn text_searches_title_location_author_and_tags() {
        for term in ["picnic", "cape cod", "ROSE", "summ"] {
            let criteria = FilterCriteria::new().with_text(term);
            assert!(matches(&record(), &criteria), "term {term:?} should match");
        }
        let miss = FilterCriteria::new().with_text("graduation");
        assert!(!matches(&record(), &miss));
    }

    #[test]
    fn empty_author_is_selectable() {
        let anonymous = NewRecord::new(
            MediaType::Story,
            "",
            Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap(),
        )
        .build();
        let criteria = FilterCriteria::new().with_authors([""]);
        assert!(matches(&anonymous, &criteria));
        assert!(!matches(&record(), &criteria));
    }

    #[test]
    fn categories_are_anded() {
        let criteria = FilterCriteria::new()
            .with_types([MediaType::Photo])
            .with_authors(["Uncle Joe"]);
        assert!(!matches(&record(), &criteria));
    }
}
