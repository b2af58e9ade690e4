use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpRequest, Responder};
use chrono::Utc;

use std::collections::HashMap;

use crate::models::{non_blank, Event, PhotoInput};
use crate::services::{content_type_for, photo_object_name, PHOTOS_BUCKET};
use crate::web::forms::{
    checked_ids, join_ids, parse_id_list, parse_optional_id, AdminListQuery, ConfirmDeleteForm,
    PhotoUpdateForm, PHOTO_FIELD_PREFIX,
};
use crate::web::helpers::{redirect_with_notice, render, require_session, rows_or_empty};
use crate::web::notice::Notice;
use crate::web::state::AppState;
use crate::web::templates::{
    size_label, AdminMediaDeleteTemplate, AdminMediaTemplate, EventOption, NoticeView,
};
use crate::web::uploads::read_upload_form;

const MEDIA_PATH: &str = "/admin/media";
const PHOTO_FIELD: &str = "photo";

fn event_options(events: &[Event], selected: Option<i64>) -> Vec<EventOption> {
    events
        .iter()
        .map(|e| EventOption {
            id: e.id,
            name: e.name.clone(),
            selected: selected == Some(e.id),
        })
        .collect()
}

#[get("/admin/media")]
pub async fn media_list(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<AdminListQuery>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let photos = rows_or_empty("photos", state.store.list_photos(None).await);
    let events = rows_or_empty("events", state.store.list_events().await);

    let editing = query
        .edit_id()
        .and_then(|id| photos.iter().find(|p| p.id == id))
        .cloned();
    let editing_events = event_options(&events, editing.as_ref().and_then(|p| p.event_id));

    render(AdminMediaTemplate {
        active: "media",
        user_name: session.display_name(),
        notice: NoticeView::from_code(query.notice.as_deref()),
        photos,
        upload_events: event_options(&events, None),
        editing,
        editing_events,
        max_upload: size_label(state.config.max_upload_bytes),
    })
}

#[post("/admin/media/upload")]
pub async fn media_upload(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let upload = match read_upload_form(payload, PHOTO_FIELD, state.config.max_upload_bytes).await
    {
        Ok(upload) => upload,
        Err(e) => {
            log::warn!("Rejected photo upload: {}", e);
            return redirect_with_notice(MEDIA_PATH, Notice::for_form_error(&e));
        }
    };

    let Some(title) = non_blank(upload.text("title")) else {
        return redirect_with_notice(MEDIA_PATH, Notice::MissingFields);
    };
    let event_id = match parse_optional_id(upload.text("event_id")) {
        Ok(id) => id,
        Err(e) => return redirect_with_notice(MEDIA_PATH, Notice::for_form_error(&e)),
    };
    let description = non_blank(upload.text("description"));
    let Some(file) = upload.file else {
        return redirect_with_notice(MEDIA_PATH, Notice::NoFile);
    };

    let name = photo_object_name(&file.filename, Utc::now());
    let content_type = content_type_for(&file.filename, file.content_type.as_deref());
    if let Err(e) = state
        .storage
        .upload(&session.token, PHOTOS_BUCKET, &name, file.bytes, &content_type)
        .await
    {
        log::error!("Failed to upload photo {}: {}", name, e);
        return redirect_with_notice(MEDIA_PATH, Notice::UploadFailed);
    }

    let input = PhotoInput {
        url: state.storage.public_url(PHOTOS_BUCKET, &name),
        title,
        description,
        event_id,
    };

    match state.store.create_photo(&session.token, &input).await {
        Ok(()) => redirect_with_notice(MEDIA_PATH, Notice::PhotoUploaded),
        Err(e) => {
            // The object stays in the bucket; storage and rows are not transactional.
            log::error!("Uploaded {} but failed to record it: {}", name, e);
            redirect_with_notice(MEDIA_PATH, Notice::UploadFailed)
        }
    }
}

#[post("/admin/media/{id:\\d+}")]
pub async fn media_update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Form<PhotoUpdateForm>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    let data = match form.into_inner().into_update() {
        Ok(data) => data,
        Err(e) => {
            return redirect_with_notice(
                &format!("{MEDIA_PATH}?edit={id}"),
                Notice::for_form_error(&e),
            )
        }
    };

    match state.store.update_photo(&session.token, id, &data).await {
        Ok(()) => redirect_with_notice(MEDIA_PATH, Notice::PhotoUpdated),
        Err(e) => {
            log::error!("Failed to update photo {}: {}", id, e);
            redirect_with_notice(&format!("{MEDIA_PATH}?edit={id}"), Notice::SaveFailed)
        }
    }
}

/// First step of a bulk delete: show the selected photos and ask for confirmation.
#[post("/admin/media/delete")]
pub async fn media_delete_confirm(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<HashMap<String, String>>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let ids = checked_ids(&form, PHOTO_FIELD_PREFIX);
    if ids.is_empty() {
        return redirect_with_notice(MEDIA_PATH, Notice::NoSelection);
    }

    let photos = match state.store.list_photos(None).await {
        Ok(photos) => photos,
        Err(e) => {
            log::error!("Failed to fetch photos: {}", e);
            return redirect_with_notice(MEDIA_PATH, Notice::DeleteFailed);
        }
    };
    let selected: Vec<_> = photos.into_iter().filter(|p| ids.contains(&p.id)).collect();
    if selected.is_empty() {
        return redirect_with_notice(MEDIA_PATH, Notice::NoSelection);
    }
    let ids: Vec<i64> = selected.iter().map(|p| p.id).collect();

    render(AdminMediaDeleteTemplate {
        active: "media",
        user_name: session.display_name(),
        notice: None,
        ids: join_ids(&ids),
        photos: selected,
    })
}

#[post("/admin/media/delete/confirm")]
pub async fn media_delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ConfirmDeleteForm>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let ids = match parse_id_list(&form.ids) {
        Ok(ids) if !ids.is_empty() => ids,
        Ok(_) => return redirect_with_notice(MEDIA_PATH, Notice::NoSelection),
        Err(e) => return redirect_with_notice(MEDIA_PATH, Notice::for_form_error(&e)),
    };

    match state.store.delete_photos(&session.token, &ids).await {
        Ok(()) => {
            log::info!("Deleted {} photo(s)", ids.len());
            redirect_with_notice(MEDIA_PATH, Notice::PhotosDeleted)
        }
        Err(e) => {
            log::error!("Failed to delete photos {:?}: {}", ids, e);
            redirect_with_notice(MEDIA_PATH, Notice::DeleteFailed)
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(media_list)
        .service(media_upload)
        .service(media_delete_confirm)
        .service(media_delete)
        .service(media_update);
}
