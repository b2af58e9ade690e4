use chrono::{DateTime, Duration, NaiveDate, Utc};

use std::sync::Arc;

use stagepress::config::SiteConfig;
use stagepress::db::MemoryBackend;
use stagepress::models::*;
use stagepress::services::AuthProvider;
use stagepress::web::AppState;

pub const ADMIN_EMAIL: &str = "admin@test.com";
pub const ADMIN_PASSWORD: &str = "password0";

pub fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("Invalid time format in test helper")
        .with_timezone(&Utc)
}

pub fn days_from_now(days: i64) -> NaiveDate {
    (Utc::now() + Duration::days(days)).date_naive()
}

pub fn get_seed_show_types() -> Vec<ShowType> {
    vec![
        ShowType::new(1, "主持"),
        ShowType::new(2, "单口"),
        ShowType::new(3, "比赛"),
        ShowType::new(6, "即兴"),
    ]
}

pub fn get_seed_show(id: i64, title: &str, date: NaiveDate, type_ids: &[i64]) -> Show {
    Show {
        id,
        title: title.to_string(),
        date,
        time: "20:00".to_string(),
        city: "北京".to_string(),
        venue: "笑果工厂".to_string(),
        description: Some(format!("{title} 简介")),
        ticket_price: Some("80元".to_string()),
        ticket_link: None,
        type_ids: type_ids.to_vec(),
        created_at: Some(parse_time("2026-01-04T22:15:06Z")),
    }
}

/// Two upcoming shows and one past show, with different types.
pub fn get_seed_shows() -> Vec<Show> {
    vec![
        get_seed_show(101, "开放麦之夜", days_from_now(5), &[2]),
        get_seed_show(102, "即兴对决", days_from_now(12), &[3, 6]),
        get_seed_show(103, "跨年主持专场", days_from_now(-30), &[1]),
    ]
}

pub fn get_seed_events() -> Vec<Event> {
    vec![
        Event {
            id: 1,
            name: "北京喜剧节".to_string(),
        },
        Event {
            id: 2,
            name: "深圳脱口秀专场".to_string(),
        },
    ]
}

pub fn get_seed_photo(
    id: i64,
    title: &str,
    description: Option<&str>,
    event: Option<(i64, &str)>,
    created_at: &str,
) -> Photo {
    Photo {
        id,
        url: format!("https://cdn.test/photos/{id}.jpg"),
        title: title.to_string(),
        description: description.map(str::to_string),
        event_id: event.map(|(id, _)| id),
        event_name: event.map(|(_, name)| name.to_string()),
        created_at: parse_time(created_at),
    }
}

pub fn get_seed_photos() -> Vec<Photo> {
    vec![
        get_seed_photo(
            201,
            "后台合影",
            Some("演出结束后的合影"),
            Some((1, "北京喜剧节")),
            "2026-01-03T10:00:00Z",
        ),
        get_seed_photo(
            202,
            "谢幕",
            Some("最后的鞠躬"),
            Some((2, "深圳脱口秀专场")),
            "2026-01-05T10:00:00Z",
        ),
        get_seed_photo(203, "彩排", None, None, "2026-01-04T10:00:00Z"),
    ]
}

pub fn get_seed_profile() -> Profile {
    Profile {
        id: 7,
        name: "测试演员".to_string(),
        bio: "测试用的简介".to_string(),
        avatar_url: None,
        hero_image: None,
        tagline: Some("测试标语".to_string()),
        achievements: vec!["测试成就".to_string()],
        contact_email: Some("actor@test.com".to_string()),
        contact_phone: None,
        social_links: SocialLinks::default(),
    }
}

pub fn get_seed_contact() -> Contact {
    Contact {
        id: 3,
        email: "booking@test.com".to_string(),
        phone: Some("+86 100 0000 0000".to_string()),
        xiaohongshu_id: Some("@test".to_string()),
        xiaohongshu_url: None,
        other_contacts: Default::default(),
    }
}

/// Empty tables plus one admin account.
pub fn empty_backend() -> MemoryBackend {
    MemoryBackend::new().with_account(ADMIN_EMAIL, ADMIN_PASSWORD)
}

pub fn seeded_backend() -> MemoryBackend {
    empty_backend()
        .with_profile(get_seed_profile())
        .with_contact(get_seed_contact())
        .with_show_types(get_seed_show_types())
        .with_shows(get_seed_shows())
        .with_photos(get_seed_photos())
        .with_events(get_seed_events())
}

pub fn test_config() -> SiteConfig {
    SiteConfig::for_backend("https://memory.invalid", "anon-key")
}

pub fn test_state(backend: &Arc<MemoryBackend>) -> AppState {
    AppState::from_backend(test_config(), backend.clone())
}

pub fn body_text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).expect("response body is utf-8")
}

pub async fn sign_in_admin(backend: &MemoryBackend) -> AccessToken {
    backend
        .sign_in(&Credentials {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        })
        .await
        .expect("seeded admin can sign in")
        .access_token
}
