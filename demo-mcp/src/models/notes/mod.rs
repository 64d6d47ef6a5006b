// Notes module
//
// This module provides the note type and the store that persists the notes
// collection.

mod store;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use store::NotesStore;

/// A single immutable note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    /// Positive id, one more than the highest id assigned before it
    pub id: u64,
    /// Note title
    pub title: String,
    /// Note body
    pub content: String,
    /// When the note was added
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create a note stamped with the current time
    pub fn new(id: u64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Accept RFC 3339 timestamps, and offset-less ones read as local time
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(stamp.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))?;
    Ok(Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive)))
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Content: {}", self.content)?;
        writeln!(f, "Created: {}", self.created_at.to_rfc3339())
    }
}
