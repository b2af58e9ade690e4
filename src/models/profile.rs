use serde::{Deserialize, Serialize};

use super::{blank_as_none, null_as_default};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub weibo: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub douyin: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub bilibili: Option<String>,
}

impl SocialLinks {
    /// Non-empty links as `(label, url)` pairs, in display order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("微博", self.weibo.as_deref()),
            ("抖音", self.douyin.as_deref()),
            ("哔哩哔哩", self.bilibili.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.map(|u| (label, u)))
        .collect()
    }
}

/// The performer's singleton record in `profiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub hero_image: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub social_links: SocialLinks,
}

impl Profile {
    /// First character of the name, shown when there is no avatar.
    pub fn initial(&self) -> String {
        self.name.chars().next().map(String::from).unwrap_or_default()
    }

    pub fn achievements_text(&self) -> String {
        self.achievements.join("\n")
    }
}

/// Payload for `profiles` upserts, keyed on `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpsert {
    pub id: i64,
    pub name: String,
    pub bio: String,
    pub tagline: Option<String>,
    pub achievements: Vec<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub social_links: SocialLinks,
    pub avatar_url: Option<String>,
}

impl ProfileUpsert {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            bio: profile.bio.clone(),
            tagline: profile.tagline.clone(),
            achievements: profile.achievements.clone(),
            contact_email: profile.contact_email.clone(),
            contact_phone: profile.contact_phone.clone(),
            social_links: profile.social_links.clone(),
            avatar_url: profile.avatar_url.clone(),
        }
    }

    pub fn apply_to(&self, profile: &mut Profile) {
        profile.id = self.id;
        profile.name = self.name.clone();
        profile.bio = self.bio.clone();
        profile.tagline = self.tagline.clone();
        profile.achievements = self.achievements.clone();
        profile.contact_email = self.contact_email.clone();
        profile.contact_phone = self.contact_phone.clone();
        profile.social_links = self.social_links.clone();
        profile.avatar_url = self.avatar_url.clone();
    }
}

/// Splits a textarea into achievements, one per non-blank line.
pub fn parse_achievements(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
