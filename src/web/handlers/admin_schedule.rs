use actix_web::{get, post, web, HttpRequest, Responder};

use std::collections::HashMap;

use crate::db::ShowQuery;
use crate::web::forms::{parse_show_form, AdminListQuery, NoticeQuery};
use crate::web::helpers::{redirect_with_notice, render, require_session, rows_or_empty};
use crate::web::notice::Notice;
use crate::web::state::AppState;
use crate::web::templates::{
    AdminScheduleDeleteTemplate, AdminScheduleTemplate, NoticeView, ShowCard, ShowFormView,
};

const SCHEDULE_PATH: &str = "/admin/schedule";

#[get("/admin/schedule")]
pub async fn schedule_list(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<AdminListQuery>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let types = rows_or_empty("show_types", state.store.list_show_types().await);
    let shows = rows_or_empty("shows", state.store.list_shows(&ShowQuery::all()).await);

    let form = query
        .edit_id()
        .and_then(|id| shows.iter().find(|s| s.id == id))
        .map(ShowFormView::from_show)
        .unwrap_or_default();
    let type_choices = form.type_choices(&types);

    render(AdminScheduleTemplate {
        active: "schedule",
        user_name: session.display_name(),
        notice: NoticeView::from_code(query.notice.as_deref()),
        shows: ShowCard::build_all(shows, &types),
        form,
        type_choices,
    })
}

#[post("/admin/schedule")]
pub async fn schedule_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<HashMap<String, String>>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let input = match parse_show_form(&form) {
        Ok(input) => input,
        Err(e) => return redirect_with_notice(SCHEDULE_PATH, Notice::for_form_error(&e)),
    };

    match state.store.create_show(&session.token, &input).await {
        Ok(id) => {
            log::info!("Created show {} ({})", id, input.title);
            redirect_with_notice(SCHEDULE_PATH, Notice::ShowCreated)
        }
        Err(e) => {
            log::error!("Failed to create show: {}", e);
            redirect_with_notice(SCHEDULE_PATH, Notice::SaveFailed)
        }
    }
}

#[post("/admin/schedule/{id}")]
pub async fn schedule_update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Form<HashMap<String, String>>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    let input = match parse_show_form(&form) {
        Ok(input) => input,
        Err(e) => {
            return redirect_with_notice(
                &format!("{SCHEDULE_PATH}?edit={id}"),
                Notice::for_form_error(&e),
            )
        }
    };

    match state.store.update_show(&session.token, id, &input).await {
        Ok(()) => redirect_with_notice(SCHEDULE_PATH, Notice::ShowUpdated),
        Err(e) => {
            log::error!("Failed to update show {}: {}", id, e);
            redirect_with_notice(&format!("{SCHEDULE_PATH}?edit={id}"), Notice::SaveFailed)
        }
    }
}

#[get("/admin/schedule/{id}/delete")]
pub async fn schedule_delete_confirm(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    let shows = match state.store.list_shows(&ShowQuery::all()).await {
        Ok(shows) => shows,
        Err(e) => {
            log::error!("Failed to fetch shows: {}", e);
            return redirect_with_notice(SCHEDULE_PATH, Notice::DeleteFailed);
        }
    };
    let Some(show) = shows.into_iter().find(|s| s.id == id) else {
        return redirect_with_notice(SCHEDULE_PATH, Notice::DeleteFailed);
    };
    let types = rows_or_empty("show_types", state.store.list_show_types().await);

    render(AdminScheduleDeleteTemplate {
        active: "schedule",
        user_name: session.display_name(),
        notice: NoticeView::from_code(query.notice.as_deref()),
        card: ShowCard::build(show, &types),
    })
}

#[post("/admin/schedule/{id}/delete")]
pub async fn schedule_delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    match state.store.delete_show(&session.token, id).await {
        Ok(()) => {
            log::info!("Deleted show {}", id);
            redirect_with_notice(SCHEDULE_PATH, Notice::ShowDeleted)
        }
        Err(e) => {
            log::error!("Failed to delete show {}: {}", id, e);
            redirect_with_notice(SCHEDULE_PATH, Notice::DeleteFailed)
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(schedule_list)
        .service(schedule_create)
        .service(schedule_update)
        .service(schedule_delete_confirm)
        .service(schedule_delete);
}
