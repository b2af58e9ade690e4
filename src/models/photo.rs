use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{blank_as_none, null_as_default};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PhotoRow")]
pub struct Photo {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub event_id: Option<i64>,
    pub event_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row shape returned by `photos?select=*,event:events(name)`.
#[derive(Deserialize)]
struct PhotoRow {
    id: i64,
    url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    description: Option<String>,
    #[serde(default)]
    event_id: Option<i64>,
    #[serde(default)]
    event: Option<EmbeddedEvent>,
    #[serde(default, deserialize_with = "blank_as_none")]
    event_name: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct EmbeddedEvent {
    name: String,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        let event_name = row
            .event
            .map(|e| e.name)
            .filter(|n| !n.trim().is_empty())
            .or(row.event_name);

        Self {
            id: row.id,
            url: row.url,
            title: row.title,
            description: row.description,
            event_id: row.event_id,
            event_name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoInput {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub event_id: Option<i64>,
}

/// Editable photo metadata. `None` values are written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoUpdate {
    pub title: String,
    pub description: Option<String>,
    pub event_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    All,
    Named(String),
}

impl EventFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Self::All,
            Some(name) => Self::Named(name.to_string()),
        }
    }

    pub fn matches(&self, photo: &Photo) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => photo.event_name.as_deref() == Some(name.as_str()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Named(name) => name,
        }
    }
}

/// Event names present in `photos`, in first-seen order.
pub fn distinct_event_names(photos: &[Photo]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in photos.iter().filter_map(|p| p.event_name.as_ref()) {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

pub fn filter_photos<'a>(photos: &'a [Photo], filter: &EventFilter) -> Vec<&'a Photo> {
    photos.iter().filter(|p| filter.matches(p)).collect()
}
