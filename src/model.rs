//! Core data model.
//!
//! A record is one shared memory: a photo, a video, an audio clip or a
//! written story, with its author, tags and the engagement it has gathered.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A memory item as seen by the query engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier. Never changes once assigned.
    pub id: RecordId,

    /// When the memory happened (or was captured).
    pub date: DateTime<Utc>,

    /// What kind of media this is.
    #[serde(rename = "type")]
    pub kind: MediaType,

    /// Display name of the family member who shared it.
    pub author: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Engagement counters. Maintained elsewhere; read-only here.
    #[serde(default)]
    pub interactions: Interactions,
}

impl Record {
    /// Relevance sort key: likes plus comments. Views do not count.
    pub fn engagement(&self) -> u64 {
        self.interactions
            .likes
            .saturating_add(self.interactions.comments)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Newtype for record IDs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Media type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Photo,
    Video,
    Audio,
    Story,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MediaType::Photo => "photo",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Story => "story",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "photo" => Ok(MediaType::Photo),
            "video" => Ok(MediaType::Video),
            "audio" => Ok(MediaType::Audio),
            "story" => Ok(MediaType::Story),
            other => Err(Error::invalid(format!(
                "unknown media type '{other}' (expected photo, video, audio or story)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

/// Engagement counters on a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interactions {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub views: u64,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for records. Used by fixtures, tests and importers.
pub struct NewRecord {
    id: Option<RecordId>,
    date: DateTime<Utc>,
    kind: MediaType,
    author: String,
    tags: BTreeSet<String>,
    location: Option<String>,
    title: Option<String>,
    description: Option<String>,
    interactions: Interactions,
}

impl NewRecord {
    pub fn new(kind: MediaType, author: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            date,
            kind,
            author: author.into(),
            tags: BTreeSet::new(),
            location: None,
            title: None,
            description: None,
            interactions: Interactions::default(),
        }
    }

    pub fn id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn likes(mut self, n: u64) -> Self {
        self.interactions.likes = n;
        self
    }

    pub fn comments(mut self, n: u64) -> Self {
        self.interactions.comments = n;
        self
    }

    pub fn views(mut self, n: u64) -> Self {
        self.interactions.views = n;
        self
    }

    /// Finish the record, generating an id if none was set.
    pub fn build(self) -> Record {
        Record {
            id: self.id.unwrap_or_else(RecordId::generate),
            date: self.date,
            kind: self.kind,
            author: self.author,
            tags: self.tags,
            location: self.location,
            title: self.title,
            description: self.description,
            interactions: self.interactions,
        }
    }
}
