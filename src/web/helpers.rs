use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse};
use askama::Template;

use crate::common::BackendError;
use crate::models::{AccessToken, AuthUser};
use crate::web::notice::Notice;
use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "sp_session";
pub const LOGIN_PATH: &str = "/admin/login";

/// A validated admin session: the bearer token for writes plus its user.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: AccessToken,
    pub user: AuthUser,
}

impl AdminSession {
    pub fn display_name(&self) -> String {
        self.user.email.clone().unwrap_or_else(|| "管理员".to_string())
    }
}

pub fn is_htmx(req: &HttpRequest) -> bool {
    req.headers()
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|s| s.eq_ignore_ascii_case("true"))
}

pub fn session_token(req: &HttpRequest) -> Option<AccessToken> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().trim().to_string())
        .filter(|s| !s.is_empty())
        .map(AccessToken::new)
}

pub fn login_redirect(req: &HttpRequest) -> HttpResponse {
    if is_htmx(req) {
        HttpResponse::Unauthorized()
            .insert_header(("HX-Redirect", LOGIN_PATH))
            .finish()
    } else {
        redirect(LOGIN_PATH)
    }
}

/// Resolves the session cookie through the auth service.
///
/// No cookie, an unknown token and an unreachable auth service all end on
/// the login screen.
pub async fn require_session(
    state: &AppState,
    req: &HttpRequest,
) -> Result<AdminSession, HttpResponse> {
    let Some(token) = session_token(req) else {
        return Err(login_redirect(req));
    };

    match state.auth.current_user(&token).await {
        Ok(Some(user)) => Ok(AdminSession { token, user }),
        Ok(None) => Err(login_redirect(req)),
        Err(e) => {
            log::error!("Failed to validate admin session: {}", e);
            Err(login_redirect(req))
        }
    }
}

pub fn session_cookie(token: &AccessToken, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.as_str().to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(7))
        .finish()
}

pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

pub fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location.to_string()))
        .finish()
}

/// Redirects to `path` with a notice code appended to its query string.
pub fn redirect_with_notice(path: &str, notice: Notice) -> HttpResponse {
    let sep = if path.contains('?') { '&' } else { '?' };
    redirect(&format!("{path}{sep}notice={}", notice.code()))
}

pub fn render<T: Template>(t: T) -> HttpResponse {
    match t.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Template error: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(format!("Template error: {e}"))
        }
    }
}

/// Rows from a public read, or the samples when the read fails or comes back empty.
pub fn rows_or_samples<T>(
    table: &str,
    result: Result<Vec<T>, BackendError>,
    samples: impl FnOnce() -> Vec<T>,
) -> Vec<T> {
    match result {
        Ok(rows) if !rows.is_empty() => rows,
        Ok(_) => {
            log::warn!("No rows in {}, showing sample data", table);
            samples()
        }
        Err(e) => {
            log::error!("Failed to fetch {}: {}", table, e);
            samples()
        }
    }
}

/// Singleton variant of [`rows_or_samples`].
pub fn row_or_sample<T>(
    table: &str,
    result: Result<Option<T>, BackendError>,
    sample: impl FnOnce() -> T,
) -> T {
    match result {
        Ok(Some(row)) => row,
        Ok(None) => {
            log::warn!("No {} row, showing sample data", table);
            sample()
        }
        Err(e) => {
            log::error!("Failed to fetch {}: {}", table, e);
            sample()
        }
    }
}

/// Admin reads do not fall back to samples; a failed read shows an empty list.
pub fn rows_or_empty<T>(table: &str, result: Result<Vec<T>, BackendError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        log::error!("Failed to fetch {}: {}", table, e);
        Vec::new()
    })
}
