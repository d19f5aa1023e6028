//! Error types for keepsake.

use thiserror::Error;

use crate::model::RecordId;

#[derive(Debug, Error)]
pub enum Error {
    /// Criteria that cannot be turned into a valid query: unknown sort key,
    /// sort order, media type or tag mode, or an unparsable date bound.
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate record id '{0}'")]
    DuplicateRecord(RecordId),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidCriteria(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
