use chrono::{DateTime, Duration, Utc};

use std::collections::BTreeMap;

use crate::models::{Contact, Photo, Profile, Show, ShowType, SocialLinks};

const SAMPLE_PHOTO_URL: &str =
    "https://ldvgspovldhuarkgpicu.supabase.co/storage/v1/object/public/photos/1753379854486_27.JPG";

/// Records the public screens show when the service is down or a table is empty.
#[derive(Debug, Clone)]
pub struct Samples {
    pub profile: Profile,
    pub contact: Contact,
    pub show_types: Vec<ShowType>,
    pub photos: Vec<Photo>,
}

impl Default for Samples {
    fn default() -> Self {
        Self {
            profile: sample_profile(),
            contact: sample_contact(),
            show_types: sample_show_types(),
            photos: sample_photos(),
        }
    }
}

impl Samples {
    /// Sample shows dated relative to `now`: three upcoming, two past.
    pub fn shows(&self, now: DateTime<Utc>) -> Vec<Show> {
        let entries: [(i64, &str, i64, &str, &str, &str, &str, &str, &[i64]); 5] = [
            (
                1,
                "周末笑声专场",
                3,
                "20:00",
                "糖果LIVE",
                "北京",
                "轻松愉快的周末时光，让我们一起在笑声中度过美好的夜晚。",
                "120元起",
                &[2, 5],
            ),
            (
                2,
                "脱口秀小剧场",
                7,
                "19:30",
                "喜剧工厂",
                "上海",
                "小剧场的温馨氛围，近距离感受脱口秀的魅力。",
                "100元起",
                &[2],
            ),
            (
                3,
                "即兴喜剧之夜",
                14,
                "20:30",
                "麻辣小剧场",
                "成都",
                "充满惊喜的即兴表演，每一场都是独一无二的体验。",
                "售票中",
                &[1, 3, 6],
            ),
            (
                4,
                "商务演出专场",
                -7,
                "19:00",
                "五星酒店宴会厅",
                "深圳",
                "为企业客户量身定制的专业演出。",
                "邀请制",
                &[4],
            ),
            (
                5,
                "脱口秀大赛决赛",
                -14,
                "20:00",
                "大剧院",
                "广州",
                "年度脱口秀大赛的巅峰对决。",
                "已结束",
                &[3],
            ),
        ];

        entries
            .into_iter()
            .map(
                |(id, title, days, time, venue, city, description, price, types)| Show {
                    id,
                    title: title.to_string(),
                    date: (now + Duration::days(days)).date_naive(),
                    time: time.to_string(),
                    city: city.to_string(),
                    venue: venue.to_string(),
                    description: Some(description.to_string()),
                    ticket_price: Some(price.to_string()),
                    ticket_link: None,
                    type_ids: types.to_vec(),
                    created_at: None,
                },
            )
            .collect()
    }

    /// Upcoming sample shows, soonest first, as the home screen lists them.
    pub fn upcoming_shows(&self, now: DateTime<Utc>, limit: usize) -> Vec<Show> {
        let mut shows: Vec<Show> = self
            .shows(now)
            .into_iter()
            .filter(|s| s.is_upcoming(now))
            .collect();
        shows.sort_by_key(|s| s.date);
        shows.truncate(limit);
        shows
    }

    /// The newest sample photos.
    pub fn latest_photos(&self, limit: usize) -> Vec<Photo> {
        let mut photos = self.photos.clone();
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        photos.truncate(limit);
        photos
    }
}

fn sample_profile() -> Profile {
    Profile {
        id: 1,
        name: "马达".into(),
        bio: "马达，常驻北京，是一名脱口秀舞台上的新生力量。擅长观察生活中的细节与荒谬，将日常生活的幽默与观众产生共鸣。我的风格以诙谐风趣为特色，常常以自嘲的方式呈现出生活的真实面貌，与观众一起分享我的创作和思想。".into(),
        avatar_url: Some("https://images.unsplash.com/photo-1500648767791-00dcc994a43e?q=80&w=1374&auto=format&fit=crop&ixlib=rb-4.0.3".into()),
        hero_image: Some("https://images.unsplash.com/photo-1505373877841-8d25f7d46678?q=80&w=1412&auto=format&fit=crop&ixlib=rb-4.0.3".into()),
        tagline: Some("用幽默连接世界，让笑声传递温暖".into()),
        achievements: vec![
            "2022年全国脱口秀新人大赛冠军".into(),
            "2021年笑果脱口秀节目最受欢迎演员".into(),
            "2020年北京喜剧节最佳表演奖".into(),
        ],
        contact_email: Some("1120490088@qq.com".into()),
        contact_phone: Some("+86 138 8888 8888".into()),
        social_links: SocialLinks::default(),
    }
}

fn sample_contact() -> Contact {
    Contact {
        id: 1,
        email: "1120490088@qq.com".into(),
        phone: Some("+86 138 8888 8888".into()),
        xiaohongshu_id: Some("@脱口秀马达".into()),
        xiaohongshu_url: Some(
            "https://www.xiaohongshu.com/user/profile/54840dc82e1d934b1aa88842".into(),
        ),
        other_contacts: BTreeMap::new(),
    }
}

fn sample_show_types() -> Vec<ShowType> {
    [
        (1, "主持"),
        (2, "单口"),
        (3, "比赛"),
        (4, "商务演出"),
        (5, "其他"),
        (6, "即兴"),
    ]
    .into_iter()
    .map(|(id, name)| ShowType::new(id, name))
    .collect()
}

fn sample_photos() -> Vec<Photo> {
    let unsplash = |path: &str| {
        format!("https://images.unsplash.com/{path}?q=80&w=1470&auto=format&fit=crop&ixlib=rb-4.0.3")
    };
    let photo = |id: i64, url: String, title: &str, description: Option<&str>, event: Option<(i64, &str)>, created_at: &str| Photo {
        id,
        url,
        title: title.to_string(),
        description: description.map(str::to_string),
        event_id: event.map(|(id, _)| id),
        event_name: event.map(|(_, name)| name.to_string()),
        created_at: timestamp(created_at),
    };

    vec![
        photo(
            1,
            unsplash("photo-1516450360452-9312f5e86fc7"),
            "舞台表演",
            Some("北京喜剧节开幕式演出"),
            Some((1, "北京喜剧节")),
            "2025-01-20T10:57:06Z",
        ),
        photo(
            2,
            unsplash("photo-1493225457124-a3eb161ffa5f"),
            "观众互动",
            Some("与观众的精彩互动瞬间"),
            Some((1, "北京喜剧节")),
            "2025-01-19T10:57:06Z",
        ),
        photo(
            3,
            unsplash("photo-1560518883-ce09059eeffa"),
            "舞台表演",
            Some("上海喜剧节开幕式演出"),
            Some((3, "上海喜剧节")),
            "2025-01-14T10:57:06Z",
        ),
        photo(
            4,
            unsplash("photo-1603190287605-e6ade32fa852"),
            "幕后准备",
            Some("演出前的准备工作"),
            Some((2, "深圳脱口秀专场")),
            "2025-01-19T10:57:06Z",
        ),
        photo(
            5,
            SAMPLE_PHOTO_URL.to_string(),
            "IMG_3178",
            None,
            None,
            "2025-01-24T17:57:36Z",
        ),
        photo(
            6,
            unsplash("photo-1507003211169-0a1dd7228f2d"),
            "台下交流",
            Some("演出结束后与观众的交流"),
            Some((2, "深圳脱口秀专场")),
            "2025-01-18T10:57:06Z",
        ),
    ]
}

fn timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
