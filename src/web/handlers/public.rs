use actix_web::{get, web, Responder};
use chrono::Utc;

use crate::db::ShowQuery;
use crate::models::{
    count_by_view, distinct_event_names, filter_photos, filter_shows, EventFilter, ScheduleView,
    TypeFilter,
};
use crate::web::forms::{GalleryQuery, ScheduleQuery};
use crate::web::helpers::{redirect, render, row_or_sample, rows_or_samples};
use crate::web::state::AppState;
use crate::web::templates::{
    ContactTemplate, FilterLink, GalleryTemplate, HomePhotosFragment, HomeShowsFragment,
    HomeTemplate, PhotoDetailTemplate, ScheduleTemplate, ShowCard,
};

pub const HOME_SHOW_LIMIT: usize = 10;
pub const HOME_PHOTO_LIMIT: usize = 3;

#[get("/")]
pub async fn home(state: web::Data<AppState>) -> impl Responder {
    let profile = row_or_sample("profiles", state.store.get_profile().await, || {
        state.samples.profile.clone()
    });

    render(HomeTemplate {
        active: "home",
        profile,
        shows_delay_ms: state.config.home.shows_delay.as_millis(),
        photos_delay_ms: state.config.home.photos_delay.as_millis(),
    })
}

/// Upcoming shows section of the home screen, loaded after the profile.
#[get("/home/shows")]
pub async fn home_shows(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now();
    let types = rows_or_samples("show_types", state.store.list_show_types().await, || {
        state.samples.show_types.clone()
    });
    let shows = rows_or_samples(
        "shows",
        state
            .store
            .list_shows(&ShowQuery::upcoming(now, HOME_SHOW_LIMIT))
            .await,
        || state.samples.upcoming_shows(now, HOME_SHOW_LIMIT),
    );

    render(HomeShowsFragment {
        shows: ShowCard::build_all(shows, &types),
    })
}

/// Latest photos section of the home screen, loaded last.
#[get("/home/photos")]
pub async fn home_photos(state: web::Data<AppState>) -> impl Responder {
    let photos = rows_or_samples(
        "photos",
        state.store.list_photos(Some(HOME_PHOTO_LIMIT)).await,
        || state.samples.latest_photos(HOME_PHOTO_LIMIT),
    );

    render(HomePhotosFragment { photos })
}

#[get("/schedule")]
pub async fn schedule(
    state: web::Data<AppState>,
    query: web::Query<ScheduleQuery>,
) -> impl Responder {
    let now = Utc::now();
    let view = ScheduleView::parse(query.view.as_deref());
    let filter = TypeFilter::parse(query.show_type.as_deref());

    let types = rows_or_samples("show_types", state.store.list_show_types().await, || {
        state.samples.show_types.clone()
    });
    let shows = rows_or_samples("shows", state.store.list_shows(&ShowQuery::all()).await, || {
        state.samples.shows(now)
    });

    let (upcoming_count, past_count) = count_by_view(&shows, now);
    let visible: Vec<_> = filter_shows(&shows, view, filter, now)
        .into_iter()
        .cloned()
        .collect();

    let view_link = |target: ScheduleView, label: &str| FilterLink {
        label: label.to_string(),
        href: match filter.selected_id() {
            Some(id) => format!("/schedule?view={}&type={}", target.as_str(), id),
            None => format!("/schedule?view={}", target.as_str()),
        },
        selected: view == target,
    };

    let mut type_links = vec![FilterLink {
        label: "全部".to_string(),
        href: format!("/schedule?view={}&type=all", view.as_str()),
        selected: filter == TypeFilter::All,
    }];
    type_links.extend(types.iter().map(|t| FilterLink {
        label: t.name.clone(),
        href: format!("/schedule?view={}&type={}", view.as_str(), t.id),
        selected: filter == TypeFilter::Type(t.id),
    }));

    render(ScheduleTemplate {
        active: "schedule",
        upcoming: view_link(ScheduleView::Upcoming, "即将到来"),
        past: view_link(ScheduleView::Past, "往期演出"),
        type_links,
        shows: ShowCard::build_all(visible, &types),
        upcoming_count,
        past_count,
        is_past: view == ScheduleView::Past,
    })
}

#[get("/gallery")]
pub async fn gallery(
    state: web::Data<AppState>,
    query: web::Query<GalleryQuery>,
) -> impl Responder {
    let filter = EventFilter::parse(query.event.as_deref());
    let photos = rows_or_samples("photos", state.store.list_photos(None).await, || {
        state.samples.photos.clone()
    });

    let mut event_links = vec![FilterLink {
        label: "全部".to_string(),
        href: "/gallery?event=all".to_string(),
        selected: filter == EventFilter::All,
    }];
    event_links.extend(distinct_event_names(&photos).into_iter().map(|name| FilterLink {
        href: format!("/gallery?event={}", urlencoding::encode(&name)),
        selected: filter.as_str() == name && filter != EventFilter::All,
        label: name,
    }));

    let photos = filter_photos(&photos, &filter).into_iter().cloned().collect();

    render(GalleryTemplate {
        active: "gallery",
        event_links,
        photos,
    })
}

/// Full-size view of one photo, reached from a gallery tile.
#[get("/gallery/{id:\\d+}")]
pub async fn gallery_photo(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    let photos = rows_or_samples("photos", state.store.list_photos(None).await, || {
        state.samples.photos.clone()
    });

    match photos.into_iter().find(|p| p.id == id) {
        Some(photo) => render(PhotoDetailTemplate {
            active: "gallery",
            photo,
        }),
        None => redirect("/gallery"),
    }
}

#[get("/contact")]
pub async fn contact(state: web::Data<AppState>) -> impl Responder {
    let contact = row_or_sample("contacts", state.store.get_contact().await, || {
        state.samples.contact.clone()
    });
    let profile = row_or_sample("profiles", state.store.get_profile().await, || {
        state.samples.profile.clone()
    });

    render(ContactTemplate {
        active: "contact",
        contact,
        profile,
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(home_shows)
        .service(home_photos)
        .service(schedule)
        .service(gallery)
        .service(gallery_photo)
        .service(contact);
}
