use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{blank_as_none, null_as_default};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Contact {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub xiaohongshu_id: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub xiaohongshu_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub other_contacts: BTreeMap<String, String>,
}

/// Payload for `contacts` upserts, keyed on `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactUpsert {
    pub id: i64,
    pub email: String,
    pub phone: Option<String>,
    pub xiaohongshu_id: Option<String>,
    pub xiaohongshu_url: Option<String>,
}

impl ContactUpsert {
    pub fn apply_to(&self, contact: &mut Contact) {
        contact.id = self.id;
        contact.email = self.email.clone();
        contact.phone = self.phone.clone();
        contact.xiaohongshu_id = self.xiaohongshu_id.clone();
        contact.xiaohongshu_url = self.xiaohongshu_url.clone();
    }
}
