//! Integration tests for the query engine.

use chrono::{DateTime, TimeZone, Utc};
use keepsake::criteria::{CriteriaInput, DateRange, FilterCriteria, SortBy, SortOrder, TagMatch};
use keepsake::error::Error;
use keepsake::model::{MediaType, NewRecord, Record};
use keepsake::query::{Facets, QueryEngine, evaluate};
use serde_json::json;

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

/// The two records used throughout the worked examples.
fn pair() -> Vec<Record> {
    vec![
        NewRecord::new(MediaType::Photo, "Mom", day(2024, 1, 1))
            .id("1")
            .likes(5)
            .build(),
        NewRecord::new(MediaType::Video, "Dad", day(2024, 6, 1))
            .id("2")
            .likes(20)
            .build(),
    ]
}

fn family() -> Vec<Record> {
    vec![
        NewRecord::new(MediaType::Photo, "Grandma Rose", day(2019, 7, 4))
            .id("porch")
            .tags(["family", "summer"])
            .likes(24)
            .comments(6)
            .build(),
        NewRecord::new(MediaType::Video, "Dad", day(2021, 12, 25))
            .id("presents")
            .tags(["christmas", "family", "kids"])
            .likes(41)
            .comments(12)
            .build(),
        NewRecord::new(MediaType::Story, "Grandpa Joe", day(1968, 5, 12))
            .id("fair")
            .tags(["wedding"])
            .title("How we met at the county fair")
            .likes(57)
            .comments(19)
            .build(),
        NewRecord::new(MediaType::Audio, "Grandma Rose", day(2023, 3, 18))
            .id("gravy")
            .tags(["recipes"])
            .location("Rose's kitchen")
            .likes(15)
            .comments(9)
            .build(),
        NewRecord::new(MediaType::Photo, "Mom", day(2024, 6, 1))
            .id("graduation")
            .tags(["kids"])
            .likes(63)
            .comments(21)
            .build(),
    ]
}

// ---------------------------------------------------------------------------
// Worked examples
// ---------------------------------------------------------------------------

#[test]
fn sort_by_date_descending() {
    let criteria = FilterCriteria::new().with_sort(SortBy::Date, SortOrder::Descending);
    assert_eq!(ids(&evaluate(&pair(), &criteria)), ["2", "1"]);
}

#[test]
fn type_filter_keeps_only_videos() {
    let criteria = FilterCriteria::new().with_types([MediaType::Video]);
    assert_eq!(ids(&evaluate(&pair(), &criteria)), ["2"]);
}

#[test]
fn relevance_descending_puts_most_engaged_first() {
    let criteria = FilterCriteria::new().with_sort(SortBy::Relevance, SortOrder::Descending);
    assert_eq!(ids(&evaluate(&pair(), &criteria)), ["2", "1"]);
}

#[test]
fn tag_filter_matches_any_listed_tag() {
    let records = vec![
        NewRecord::new(MediaType::Photo, "Mom", day(2024, 1, 1))
            .id("a")
            .tag("a")
            .build(),
        NewRecord::new(MediaType::Photo, "Mom", day(2024, 1, 2))
            .id("b")
            .tag("b")
            .build(),
    ];
    let criteria = FilterCriteria::new().with_tags(["a", "c"]);
    assert_eq!(ids(&evaluate(&records, &criteria)), ["a"]);
}

#[test]
fn open_ended_date_range_from_start() {
    let engine = QueryEngine::new();
    let input: CriteriaInput =
        serde_json::from_value(json!({"dateRange": {"start": "2024-03-01"}})).unwrap();
    let out = engine.evaluate_input(&pair(), &input).unwrap();
    assert_eq!(ids(&out), ["2"]);
}

#[test]
fn bogus_sort_key_is_invalid_criteria() {
    let engine = QueryEngine::new();
    let input: CriteriaInput = serde_json::from_value(json!({"sortBy": "bogus"})).unwrap();
    let err = engine.evaluate_input(&pair(), &input).unwrap_err();
    assert!(matches!(err, Error::InvalidCriteria(_)), "got {err:?}");
}

#[test]
fn bogus_sort_order_is_invalid_criteria() {
    let input = CriteriaInput {
        sort_order: Some("sideways".to_string()),
        ..Default::default()
    };
    let err = QueryEngine::new().evaluate_input(&pair(), &input).unwrap_err();
    assert!(matches!(err, Error::InvalidCriteria(_)));
}

#[test]
fn unparsable_date_is_invalid_criteria_not_empty_result() {
    let input: CriteriaInput =
        serde_json::from_value(json!({"date_range": {"end": "2024-13-45"}})).unwrap();
    let err = QueryEngine::new().evaluate_input(&pair(), &input).unwrap_err();
    assert!(matches!(err, Error::InvalidCriteria(_)));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn identity_filter_is_idempotent() {
    let identity = FilterCriteria::new();
    assert!(identity.is_identity());

    let once = evaluate(&family(), &identity);
    let twice = evaluate(&once, &identity);
    assert_eq!(once.len(), family().len());
    assert_eq!(once, twice);
}

#[test]
fn equal_keys_keep_input_order_regardless_of_direction() {
    let same_day = day(2022, 2, 2);
    let records: Vec<Record> = ["x", "y", "z"]
        .into_iter()
        .map(|id| {
            NewRecord::new(MediaType::Photo, "Mom", same_day)
                .id(id)
                .build()
        })
        .collect();

    for order in [SortOrder::Ascending, SortOrder::Descending] {
        for sort_by in [SortBy::Date, SortBy::Author, SortBy::Relevance] {
            let criteria = FilterCriteria::new().with_sort(sort_by, order);
            assert_eq!(
                ids(&evaluate(&records, &criteria)),
                ["x", "y", "z"],
                "{sort_by} {order}"
            );
        }
    }
}

#[test]
fn adding_a_predicate_only_narrows() {
    let base = FilterCriteria::new().with_tags(["family", "kids"]);
    let stricter = [
        base.clone().with_types([MediaType::Video]),
        base.clone().with_authors(["Mom"]),
        base.clone().with_date_range(DateRange::since(day(2022, 1, 1))),
        base.clone().with_text("grandma"),
    ];

    let wide = evaluate(&family(), &base);
    for criteria in &stricter {
        let narrow = evaluate(&family(), criteria);
        assert!(narrow.len() <= wide.len());
        assert!(narrow.iter().all(|r| wide.contains(r)), "{criteria:?}");
    }
}

#[test]
fn flipping_order_reverses_date_and_author_sorts() {
    // All dates and authors distinct so there are no ties.
    let records = vec![
        NewRecord::new(MediaType::Photo, "Carol", day(2020, 1, 1)).id("c").build(),
        NewRecord::new(MediaType::Photo, "Alice", day(2022, 1, 1)).id("a").build(),
        NewRecord::new(MediaType::Photo, "Bob", day(2021, 1, 1)).id("b").build(),
    ];

    for sort_by in [SortBy::Date, SortBy::Author] {
        let asc = evaluate(&records, &FilterCriteria::new().with_sort(sort_by, SortOrder::Ascending));
        let mut desc =
            evaluate(&records, &FilterCriteria::new().with_sort(sort_by, SortOrder::Descending));
        desc.reverse();
        assert_eq!(asc, desc, "{sort_by}");
    }
}

#[test]
fn empty_input_is_empty_output() {
    let criteria = FilterCriteria::new()
        .with_types([MediaType::Audio])
        .with_sort(SortBy::Relevance, SortOrder::Ascending);
    assert!(evaluate(&[], &criteria).is_empty());
    assert!(QueryEngine::new().evaluate(&[], &FilterCriteria::new()).is_empty());
}

#[test]
fn tags_use_or_semantics_by_default() {
    let record = NewRecord::new(MediaType::Photo, "Mom", day(2024, 1, 1))
        .id("ab")
        .tags(["A", "B"])
        .build();
    let records = vec![record];

    let overlapping = FilterCriteria::new().with_tags(["B", "C"]);
    let disjoint = FilterCriteria::new().with_tags(["C", "D"]);
    assert_eq!(ids(&evaluate(&records, &overlapping)), ["ab"]);
    assert!(evaluate(&records, &disjoint).is_empty());
}

#[test]
fn input_records_are_not_modified() {
    let records = family();
    let before = records.clone();
    let criteria = FilterCriteria::new()
        .with_tags(["kids"])
        .with_sort(SortBy::Author, SortOrder::Ascending);
    let _ = evaluate(&records, &criteria);
    assert_eq!(records, before);
}

// ---------------------------------------------------------------------------
// Extensions
// ---------------------------------------------------------------------------

#[test]
fn all_tag_mode_requires_every_tag() {
    let criteria = FilterCriteria::new()
        .with_tags(["family", "kids"])
        .with_tag_match(TagMatch::All);
    assert_eq!(ids(&evaluate(&family(), &criteria)), ["presents"]);
}

#[test]
fn text_search_is_case_insensitive_across_fields() {
    let by_title = FilterCriteria::new().with_text("COUNTY FAIR");
    assert_eq!(ids(&evaluate(&family(), &by_title)), ["fair"]);

    let by_location = FilterCriteria::new().with_text("kitchen");
    assert_eq!(ids(&evaluate(&family(), &by_location)), ["gravy"]);

    let by_author = FilterCriteria::new()
        .with_text("rose")
        .with_sort(SortBy::Date, SortOrder::Ascending);
    assert_eq!(ids(&evaluate(&family(), &by_author)), ["porch", "gravy"]);
}

#[test]
fn date_only_end_bound_includes_that_day() {
    let input: CriteriaInput = serde_json::from_value(json!({
        "date_range": {"start": "2024-06-01", "end": "2024-06-01"}
    }))
    .unwrap();
    let out = QueryEngine::new().evaluate_input(&family(), &input).unwrap();
    assert_eq!(ids(&out), ["graduation"]);
}

#[test]
fn facets_count_filtered_results() {
    let engine = QueryEngine::new();
    let criteria = FilterCriteria::new().with_authors(["Grandma Rose"]);
    let facets = engine.facets(&family(), &criteria);

    assert_eq!(facets.total, 2);
    assert_eq!(facets.types.get(&MediaType::Photo), Some(&1));
    assert_eq!(facets.types.get(&MediaType::Audio), Some(&1));
    assert_eq!(facets.authors.get("Grandma Rose"), Some(&2));
    assert_eq!(facets.earliest, Some(day(2019, 7, 4)));
    assert_eq!(facets.latest, Some(day(2023, 3, 18)));
}

#[test]
fn top_tags_orders_by_count() {
    let facets = Facets::collect(&family());
    let top = facets.top_tags(2);
    // "family" and "kids" both appear twice; alphabetical among ties.
    assert_eq!(top, [("family", 2), ("kids", 2)]);
    assert!(Facets::collect(&Vec::<Record>::new()).earliest.is_none());
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = QueryEngine::new();
    let records = family();
    let criteria = FilterCriteria::new().with_sort(SortBy::Relevance, SortOrder::Descending);
    let expected = evaluate(&records, &criteria);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| engine.evaluate(&records, &criteria)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
