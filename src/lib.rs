//! # keepsake
//!
//! Filtering and ranking for shared family memories.
//!
//! Provides the record model, validated query criteria, a pure query engine
//! (filter, then stable sort), facet counts, saved query presets, and
//! OpenTelemetry observability.

pub mod config;
pub mod criteria;
pub mod error;
pub mod model;
pub mod presets;
pub mod query;
pub mod source;
pub mod telemetry;

pub use criteria::{CriteriaInput, DateRange, FilterCriteria, SortBy, SortOrder, TagMatch};
pub use model::{MediaType, NewRecord, Record, RecordId};
pub use query::{Facets, QueryEngine, evaluate};
