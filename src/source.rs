//! Record loading.
//!
//! Records arrive as one JSON array, fully materialized. There is no
//! pagination or streaming.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Record;

/// Read a JSON array of records from `path`.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    let records = parse_records(&content)?;
    tracing::debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

/// Parse a JSON array of records. Ids must be unique.
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    let records: Vec<Record> = serde_json::from_str(json)?;

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(&record.id) {
            return Err(Error::DuplicateRecord(record.id.clone()));
        }
    }

    Ok(records)
}
