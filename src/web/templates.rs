use askama::Template;
use chrono::{DateTime, Utc};

use crate::models::{type_color, type_name, Contact, Photo, Profile, Show, ShowType};
use crate::web::notice::Notice;

/// A show together with the badges of its types.
#[derive(Debug, Clone)]
pub struct ShowCard {
    pub show: Show,
    pub badges: Vec<TypeBadge>,
}

#[derive(Debug, Clone)]
pub struct TypeBadge {
    pub name: String,
    pub color: &'static str,
}

impl ShowCard {
    pub fn build(show: Show, types: &[ShowType]) -> Self {
        let badges = show
            .type_ids
            .iter()
            .map(|&id| TypeBadge {
                name: type_name(types, id),
                color: type_color(id),
            })
            .collect();
        Self { show, badges }
    }

    pub fn build_all(shows: Vec<Show>, types: &[ShowType]) -> Vec<Self> {
        shows.into_iter().map(|s| Self::build(s, types)).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NoticeView {
    pub message: &'static str,
    pub class: &'static str,
}

impl NoticeView {
    pub fn from_code(code: Option<&str>) -> Option<Self> {
        Notice::parse(code).map(|n| Self {
            message: n.message(),
            class: n.severity().css_class(),
        })
    }
}

/// One line of the dashboard's recent activity list.
#[derive(Debug, Clone)]
pub struct Activity {
    pub kind: &'static str,
    pub title: String,
    pub at: DateTime<Utc>,
}

impl Activity {
    pub fn when(&self) -> String {
        self.at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Human-readable upload cap: whole MB, or KB below one MiB. Rounds up.
pub fn size_label(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;

    if bytes >= MIB {
        format!("{} MB", bytes.div_ceil(MIB))
    } else {
        format!("{} KB", bytes.div_ceil(KIB))
    }
}

/// Values the show editor is pre-filled with.
#[derive(Debug, Clone, Default)]
pub struct ShowFormView {
    pub id: Option<i64>,
    pub title: String,
    pub venue: String,
    pub city: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub ticket_price: String,
    pub ticket_link: String,
    pub type_ids: Vec<i64>,
}

impl ShowFormView {
    pub fn from_show(show: &Show) -> Self {
        Self {
            id: Some(show.id),
            title: show.title.clone(),
            venue: show.venue.clone(),
            city: show.city.clone(),
            date: show.date.format("%Y-%m-%d").to_string(),
            time: show.time.clone(),
            description: show.description.clone().unwrap_or_default(),
            ticket_price: show.ticket_price.clone().unwrap_or_default(),
            ticket_link: show.ticket_link.clone().unwrap_or_default(),
            type_ids: show.type_ids.clone(),
        }
    }

    /// Checkbox list for the editor, checked where the show already has the type.
    pub fn type_choices(&self, types: &[ShowType]) -> Vec<TypeChoice> {
        types
            .iter()
            .map(|t| TypeChoice {
                field: format!("type_{}", t.id),
                name: t.name.clone(),
                color: t.color(),
                checked: self.type_ids.contains(&t.id),
            })
            .collect()
    }

    pub fn action(&self) -> String {
        match self.id {
            Some(id) => format!("/admin/schedule/{id}"),
            None => "/admin/schedule".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeChoice {
    pub field: String,
    pub name: String,
    pub color: &'static str,
    pub checked: bool,
}

/// A filter chip: label, link and whether it is the active one.
#[derive(Debug, Clone)]
pub struct FilterLink {
    pub label: String,
    pub href: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct EventOption {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

// Public site

#[derive(Template)]
#[template(path = "public/home.html")]
pub struct HomeTemplate {
    pub active: &'static str,
    pub profile: Profile,
    pub shows_delay_ms: u128,
    pub photos_delay_ms: u128,
}

#[derive(Template)]
#[template(path = "public/home_shows.html")]
pub struct HomeShowsFragment {
    pub shows: Vec<ShowCard>,
}

#[derive(Template)]
#[template(path = "public/home_photos.html")]
pub struct HomePhotosFragment {
    pub photos: Vec<Photo>,
}

#[derive(Template)]
#[template(path = "public/schedule.html")]
pub struct ScheduleTemplate {
    pub active: &'static str,
    pub upcoming: FilterLink,
    pub past: FilterLink,
    pub type_links: Vec<FilterLink>,
    pub shows: Vec<ShowCard>,
    pub upcoming_count: usize,
    pub past_count: usize,
    pub is_past: bool,
}

#[derive(Template)]
#[template(path = "public/gallery.html")]
pub struct GalleryTemplate {
    pub active: &'static str,
    pub event_links: Vec<FilterLink>,
    pub photos: Vec<Photo>,
}

#[derive(Template)]
#[template(path = "public/photo_detail.html")]
pub struct PhotoDetailTemplate {
    pub active: &'static str,
    pub photo: Photo,
}

#[derive(Template)]
#[template(path = "public/contact.html")]
pub struct ContactTemplate {
    pub active: &'static str,
    pub contact: Contact,
    pub profile: Profile,
}

// Admin

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub error: Option<String>,
    pub email: String,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub active: &'static str,
    pub user_name: String,
    pub notice: Option<NoticeView>,
    pub total_shows: usize,
    pub upcoming_shows: usize,
    pub total_photos: usize,
    pub recent: Vec<Activity>,
}

#[derive(Template)]
#[template(path = "admin/profile.html")]
pub struct AdminProfileTemplate {
    pub active: &'static str,
    pub user_name: String,
    pub notice: Option<NoticeView>,
    pub profile: Profile,
    pub contact: Contact,
}

#[derive(Template)]
#[template(path = "admin/schedule.html")]
pub struct AdminScheduleTemplate {
    pub active: &'static str,
    pub user_name: String,
    pub notice: Option<NoticeView>,
    pub shows: Vec<ShowCard>,
    pub form: ShowFormView,
    pub type_choices: Vec<TypeChoice>,
}

#[derive(Template)]
#[template(path = "admin/schedule_delete.html")]
pub struct AdminScheduleDeleteTemplate {
    pub active: &'static str,
    pub user_name: String,
    pub notice: Option<NoticeView>,
    pub card: ShowCard,
}

#[derive(Template)]
#[template(path = "admin/media.html")]
pub struct AdminMediaTemplate {
    pub active: &'static str,
    pub user_name: String,
    pub notice: Option<NoticeView>,
    pub photos: Vec<Photo>,
    pub upload_events: Vec<EventOption>,
    pub editing: Option<Photo>,
    pub editing_events: Vec<EventOption>,
    pub max_upload: String,
}

#[derive(Template)]
#[template(path = "admin/media_delete.html")]
pub struct AdminMediaDeleteTemplate {
    pub active: &'static str,
    pub user_name: String,
    pub notice: Option<NoticeView>,
    pub photos: Vec<Photo>,
    pub ids: String,
}
