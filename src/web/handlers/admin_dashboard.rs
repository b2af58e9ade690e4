use actix_web::{get, web, HttpRequest, Responder};
use chrono::Utc;

use crate::db::ShowQuery;
use crate::web::forms::NoticeQuery;
use crate::web::helpers::{render, require_session, rows_or_empty};
use crate::web::state::AppState;
use crate::web::templates::{Activity, AdminDashboardTemplate, NoticeView};

const RECENT_ACTIVITY: usize = 5;

#[get("/admin")]
pub async fn dashboard(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let now = Utc::now();
    let shows = rows_or_empty("shows", state.store.list_shows(&ShowQuery::all()).await);
    let photos = rows_or_empty("photos", state.store.list_photos(None).await);

    let mut recent: Vec<Activity> = shows
        .iter()
        .filter_map(|s| {
            s.created_at.map(|at| Activity {
                kind: "演出",
                title: s.title.clone(),
                at,
            })
        })
        .chain(photos.iter().map(|p| Activity {
            kind: "照片",
            title: p.title.clone(),
            at: p.created_at,
        }))
        .collect();
    recent.sort_by(|a, b| b.at.cmp(&a.at));
    recent.truncate(RECENT_ACTIVITY);

    render(AdminDashboardTemplate {
        active: "dashboard",
        user_name: session.display_name(),
        notice: NoticeView::from_code(query.notice.as_deref()),
        total_shows: shows.len(),
        upcoming_shows: shows.iter().filter(|s| s.is_upcoming(now)).count(),
        total_photos: photos.len(),
        recent,
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard);
}
