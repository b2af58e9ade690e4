use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{blank_as_none, null_as_default};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ShowRow")]
pub struct Show {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub city: String,
    pub venue: String,
    pub description: Option<String>,
    pub ticket_price: Option<String>,
    pub ticket_link: Option<String>,
    pub type_ids: Vec<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Row shape returned by `shows?select=*,show_type_relations(type_id)`.
#[derive(Deserialize)]
struct ShowRow {
    id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(deserialize_with = "de_show_date")]
    date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_default")]
    time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    venue: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    ticket_price: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    ticket_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    show_type_relations: Vec<TypeRelation>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct TypeRelation {
    type_id: i64,
}

impl From<ShowRow> for Show {
    fn from(row: ShowRow) -> Self {
        let mut type_ids: Vec<i64> = row
            .show_type_relations
            .into_iter()
            .map(|r| r.type_id)
            .collect();
        type_ids.sort_unstable();
        type_ids.dedup();

        Self {
            id: row.id,
            title: row.title,
            date: row.date,
            time: row.time,
            city: row.city,
            venue: row.venue,
            description: row.description,
            ticket_price: row.ticket_price,
            ticket_link: row.ticket_link,
            type_ids,
            created_at: row.created_at,
        }
    }
}

/// Accepts either a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp.
fn de_show_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_show_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid show date: {raw}")))
}

pub fn parse_show_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

impl Show {
    pub fn from_input(id: i64, input: &ShowInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title.clone(),
            date: input.date,
            time: input.time.clone(),
            city: input.city.clone(),
            venue: input.venue.clone(),
            description: input.description.clone(),
            ticket_price: input.ticket_price.clone(),
            ticket_link: input.ticket_link.clone(),
            type_ids: input.type_ids.clone(),
            created_at: Some(created_at),
        }
    }

    /// Midnight UTC of the show's date; the point upcoming/past is decided against.
    pub fn starts_on(&self) -> DateTime<Utc> {
        self.date.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.starts_on() >= now
    }

    pub fn has_type(&self, type_id: i64) -> bool {
        self.type_ids.contains(&type_id)
    }

    pub fn date_label(&self) -> String {
        format!(
            "{}年{}月{}日",
            self.date.year(),
            self.date.month(),
            self.date.day()
        )
    }
}

/// Values written to the `shows` table; type ids go to `show_type_relations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowInput {
    pub title: String,
    pub description: Option<String>,
    pub venue: String,
    pub city: String,
    pub date: NaiveDate,
    pub time: String,
    pub ticket_price: Option<String>,
    pub ticket_link: Option<String>,
    #[serde(skip)]
    pub type_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScheduleView {
    #[default]
    Upcoming,
    Past,
}

impl ScheduleView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }

    /// Unknown values fall back to the upcoming view.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("past") => Self::Past,
            _ => Self::Upcoming,
        }
    }

    pub fn includes(&self, show: &Show, now: DateTime<Utc>) -> bool {
        match self {
            Self::Upcoming => show.is_upcoming(now),
            Self::Past => !show.is_upcoming(now),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Type(i64),
}

impl TypeFilter {
    /// `all`, an empty value or anything that is not a type id selects every show.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .and_then(|s| s.parse::<i64>().ok())
            .map(Self::Type)
            .unwrap_or(Self::All)
    }

    pub fn matches(&self, show: &Show) -> bool {
        match self {
            Self::All => true,
            Self::Type(id) => show.has_type(*id),
        }
    }

    pub fn selected_id(&self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Type(id) => Some(*id),
        }
    }
}

pub fn filter_shows<'a>(
    shows: &'a [Show],
    view: ScheduleView,
    filter: TypeFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Show> {
    shows
        .iter()
        .filter(|show| view.includes(show, now) && filter.matches(show))
        .collect()
}

/// Returns `(upcoming, past)` counts for the schedule tabs.
pub fn count_by_view(shows: &[Show], now: DateTime<Utc>) -> (usize, usize) {
    let upcoming = shows.iter().filter(|s| s.is_upcoming(now)).count();
    (upcoming, shows.len() - upcoming)
}
