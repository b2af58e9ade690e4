use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpRequest, Responder};
use chrono::Utc;

use crate::models::{Contact, Profile, ProfileUpsert};
use crate::services::{avatar_object_name, content_type_for, AVATARS_BUCKET};
use crate::web::forms::{ContactForm, NoticeQuery, ProfileForm};
use crate::web::helpers::{redirect_with_notice, render, require_session};
use crate::web::notice::Notice;
use crate::web::state::AppState;
use crate::web::templates::{AdminProfileTemplate, NoticeView};
use crate::web::uploads::read_upload_form;

const PROFILE_PATH: &str = "/admin/profile";
/// Id used for the singleton rows when none exist yet.
const SINGLETON_ID: i64 = 1;

#[get("/admin/profile")]
pub async fn profile_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let profile = state
        .store
        .get_profile()
        .await
        .unwrap_or_else(|e| {
            log::error!("Failed to fetch profiles: {}", e);
            None
        })
        .unwrap_or_else(|| Profile {
            id: SINGLETON_ID,
            ..Profile::default()
        });
    let contact = state
        .store
        .get_contact()
        .await
        .unwrap_or_else(|e| {
            log::error!("Failed to fetch contacts: {}", e);
            None
        })
        .unwrap_or_else(|| Contact {
            id: SINGLETON_ID,
            ..Contact::default()
        });

    render(AdminProfileTemplate {
        active: "profile",
        user_name: session.display_name(),
        notice: NoticeView::from_code(query.notice.as_deref()),
        profile,
        contact,
    })
}

/// Loads the current profile for a write; `Err` carries the notice to show.
async fn current_profile(state: &AppState) -> Result<Profile, Notice> {
    match state.store.get_profile().await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Ok(Profile {
            id: SINGLETON_ID,
            ..Profile::default()
        }),
        Err(e) => {
            log::error!("Failed to fetch profiles: {}", e);
            Err(Notice::SaveFailed)
        }
    }
}

#[post("/admin/profile")]
pub async fn profile_save(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ProfileForm>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let current = match current_profile(&state).await {
        Ok(profile) => profile,
        Err(notice) => return redirect_with_notice(PROFILE_PATH, notice),
    };

    let data = match form
        .into_inner()
        .into_upsert(current.id, current.avatar_url.clone())
    {
        Ok(data) => data,
        Err(e) => return redirect_with_notice(PROFILE_PATH, Notice::for_form_error(&e)),
    };

    match state.store.upsert_profile(&session.token, &data).await {
        Ok(()) => redirect_with_notice(PROFILE_PATH, Notice::ProfileSaved),
        Err(e) => {
            log::error!("Failed to save profile: {}", e);
            redirect_with_notice(PROFILE_PATH, Notice::SaveFailed)
        }
    }
}

#[post("/admin/profile/avatar")]
pub async fn avatar_upload(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let upload = match read_upload_form(payload, "avatar", state.config.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(e) => {
            log::warn!("Rejected avatar upload: {}", e);
            return redirect_with_notice(PROFILE_PATH, Notice::for_form_error(&e));
        }
    };
    let Some(file) = upload.file else {
        return redirect_with_notice(PROFILE_PATH, Notice::NoFile);
    };

    let current = match current_profile(&state).await {
        Ok(profile) => profile,
        Err(_) => return redirect_with_notice(PROFILE_PATH, Notice::UploadFailed),
    };

    let name = avatar_object_name(&file.filename, Utc::now());
    let content_type = content_type_for(&file.filename, file.content_type.as_deref());
    if let Err(e) = state
        .storage
        .upload(&session.token, AVATARS_BUCKET, &name, file.bytes, &content_type)
        .await
    {
        log::error!("Failed to upload avatar {}: {}", name, e);
        return redirect_with_notice(PROFILE_PATH, Notice::UploadFailed);
    }

    let mut data = ProfileUpsert::from_profile(&current);
    data.avatar_url = Some(state.storage.public_url(AVATARS_BUCKET, &name));

    match state.store.upsert_profile(&session.token, &data).await {
        Ok(()) => redirect_with_notice(PROFILE_PATH, Notice::AvatarUploaded),
        Err(e) => {
            log::error!("Failed to save avatar url: {}", e);
            redirect_with_notice(PROFILE_PATH, Notice::UploadFailed)
        }
    }
}

#[post("/admin/profile/contact")]
pub async fn contact_save(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ContactForm>,
) -> impl Responder {
    let session = match require_session(&state, &req).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let id = match state.store.get_contact().await {
        Ok(contact) => contact.map_or(SINGLETON_ID, |c| c.id),
        Err(e) => {
            log::error!("Failed to fetch contacts: {}", e);
            return redirect_with_notice(PROFILE_PATH, Notice::SaveFailed);
        }
    };

    let data = match form.into_inner().into_upsert(id) {
        Ok(data) => data,
        Err(e) => return redirect_with_notice(PROFILE_PATH, Notice::for_form_error(&e)),
    };

    match state.store.upsert_contact(&session.token, &data).await {
        Ok(()) => redirect_with_notice(PROFILE_PATH, Notice::ContactSaved),
        Err(e) => {
            log::error!("Failed to save contact: {}", e);
            redirect_with_notice(PROFILE_PATH, Notice::SaveFailed)
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(profile_form)
        .service(profile_save)
        .service(avatar_upload)
        .service(contact_save);
}
