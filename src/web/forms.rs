use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use std::collections::HashMap;

use crate::common::FormError;
use crate::models::{
    non_blank, parse_achievements, ContactUpsert, PhotoUpdate, ProfileUpsert, ShowInput,
    SocialLinks,
};

/// Checkbox prefix for a show's types: `type_<id>=on`.
pub const TYPE_FIELD_PREFIX: &str = "type_";
/// Checkbox prefix for bulk photo selection: `photo_<id>=on`.
pub const PHOTO_FIELD_PREFIX: &str = "photo_";

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Deserialize)]
pub struct AdminListQuery {
    pub notice: Option<String>,
    pub edit: Option<String>,
}

impl AdminListQuery {
    /// The row selected for editing; malformed ids select nothing.
    pub fn edit_id(&self) -> Option<i64> {
        self.edit.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

#[derive(Deserialize)]
pub struct ScheduleQuery {
    pub view: Option<String>,
    #[serde(rename = "type")]
    pub show_type: Option<String>,
}

#[derive(Deserialize)]
pub struct GalleryQuery {
    pub event: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmDeleteForm {
    #[serde(default)]
    pub ids: String,
}

fn field<'a>(form: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    form.get(name).map(String::as_str)
}

/// Ids of checked `<prefix><id>` boxes, ascending.
pub fn checked_ids(form: &HashMap<String, String>, prefix: &str) -> Vec<i64> {
    let mut ids: Vec<i64> = form
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .filter_map(|(key, _)| key.strip_prefix(prefix)?.parse().ok())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Parses `3,5,8` as carried by the delete confirmation form.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>, FormError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| FormError::InvalidId(s.to_string())))
        .collect()
}

pub fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Optional id field; blank means "none".
pub fn parse_optional_id(raw: Option<&str>) -> Result<Option<i64>, FormError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| FormError::InvalidId(s)),
    }
}

pub fn parse_show_form(form: &HashMap<String, String>) -> Result<ShowInput, FormError> {
    let title = non_blank(field(form, "title"));
    let venue = non_blank(field(form, "venue"));
    let type_ids = checked_ids(form, TYPE_FIELD_PREFIX);

    let (Some(title), Some(venue)) = (title, venue) else {
        return Err(FormError::MissingFields);
    };
    if type_ids.is_empty() {
        return Err(FormError::MissingFields);
    }

    let raw_date = non_blank(field(form, "date")).unwrap_or_default();
    let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate(raw_date.clone()))?;

    let raw_time = non_blank(field(form, "time")).unwrap_or_default();
    let time = NaiveTime::parse_from_str(&raw_time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&raw_time, "%H:%M:%S"))
        .map_err(|_| FormError::InvalidTime(raw_time.clone()))?;

    Ok(ShowInput {
        title,
        description: non_blank(field(form, "description")),
        venue,
        city: non_blank(field(form, "city")).unwrap_or_default(),
        date,
        time: time.format("%H:%M").to_string(),
        ticket_price: non_blank(field(form, "ticket_price")),
        ticket_link: non_blank(field(form, "ticket_link")),
        type_ids,
    })
}

#[derive(Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    pub tagline: Option<String>,
    #[serde(default)]
    pub achievements: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub weibo: Option<String>,
    pub douyin: Option<String>,
    pub bilibili: Option<String>,
}

impl ProfileForm {
    pub fn into_upsert(
        self,
        id: i64,
        avatar_url: Option<String>,
    ) -> Result<ProfileUpsert, FormError> {
        let name = non_blank(Some(&self.name)).ok_or(FormError::MissingFields)?;

        Ok(ProfileUpsert {
            id,
            name,
            bio: self.bio.trim().to_string(),
            tagline: non_blank(self.tagline.as_deref()),
            achievements: parse_achievements(&self.achievements),
            contact_email: non_blank(self.contact_email.as_deref()),
            contact_phone: non_blank(self.contact_phone.as_deref()),
            social_links: SocialLinks {
                weibo: non_blank(self.weibo.as_deref()),
                douyin: non_blank(self.douyin.as_deref()),
                bilibili: non_blank(self.bilibili.as_deref()),
            },
            avatar_url,
        })
    }
}

#[derive(Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub xiaohongshu_id: Option<String>,
    pub xiaohongshu_url: Option<String>,
}

impl ContactForm {
    pub fn into_upsert(self, id: i64) -> Result<ContactUpsert, FormError> {
        let email = non_blank(Some(&self.email)).ok_or(FormError::MissingFields)?;

        Ok(ContactUpsert {
            id,
            email,
            phone: non_blank(self.phone.as_deref()),
            xiaohongshu_id: non_blank(self.xiaohongshu_id.as_deref()),
            xiaohongshu_url: non_blank(self.xiaohongshu_url.as_deref()),
        })
    }
}

#[derive(Deserialize)]
pub struct PhotoUpdateForm {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub event_id: Option<String>,
}

impl PhotoUpdateForm {
    pub fn into_update(self) -> Result<PhotoUpdate, FormError> {
        let title = non_blank(Some(&self.title)).ok_or(FormError::MissingFields)?;

        Ok(PhotoUpdate {
            title,
            description: non_blank(self.description.as_deref()),
            event_id: parse_optional_id(self.event_id.as_deref())?,
        })
    }
}
