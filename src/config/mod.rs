//! Typed configuration from environment variables.
//!
//! Loads once at startup and fails fast on malformed values. Nothing is
//! required: every variable has a default.

use std::path::PathBuf;

use crate::criteria::{SortBy, SortOrder};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Default records file when `--records` is not given.
    pub records_path: Option<PathBuf>,
    pub presets_dir: PathBuf,
    pub default_sort_by: SortBy,
    pub default_sort_order: SortOrder,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            records_path: optional_var("KEEPSAKE_RECORDS").map(PathBuf::from),
            presets_dir: optional_var("KEEPSAKE_PRESETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("presets")),
            default_sort_by: parsed_var("KEEPSAKE_SORT_BY")?.unwrap_or_default(),
            default_sort_order: parsed_var("KEEPSAKE_SORT_ORDER")?.unwrap_or_default(),
            otel_endpoint: optional_var("OTEL_ENDPOINT"),
            log_level: optional_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Unset and empty both count as absent.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = Error>,
{
    optional_var(name)
        .map(|raw| {
            raw.parse()
                .map_err(|e| Error::Config(format!("bad value for {name}: {e}")))
        })
        .transpose()
}
