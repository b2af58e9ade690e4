use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

use crate::common::BackendError;
use crate::models::Credentials;
use crate::web::forms::{LoginForm, LoginQuery};
use crate::web::helpers::{
    client_ip, is_htmx, redirect, removal_cookie, render, session_cookie, session_token,
    LOGIN_PATH,
};
use crate::web::security::{LOGIN_ATTEMPTS, LOGIN_WINDOW};
use crate::web::state::AppState;
use crate::web::templates::AdminLoginTemplate;

fn login_error_message(code: &str) -> String {
    match code {
        "missing" => "请输入邮箱和密码".to_string(),
        "invalid" => "邮箱或密码错误".to_string(),
        "rate_limit" => "登录尝试过于频繁，请稍后再试".to_string(),
        "internal" => "登录服务暂时不可用，请稍后再试".to_string(),
        other => other.to_string(),
    }
}

#[get("/admin/login")]
pub async fn login_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<LoginQuery>,
) -> impl Responder {
    // Already signed in: straight to the dashboard.
    if let Some(token) = session_token(&req) {
        if let Ok(Some(_)) = state.auth.current_user(&token).await {
            return redirect("/admin");
        }
    }

    render(AdminLoginTemplate {
        error: query.error.as_deref().map(login_error_message),
        email: String::new(),
    })
}

#[post("/admin/login")]
pub async fn login_submit(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<LoginForm>,
) -> impl Responder {
    let limiter_key = format!("login:{}", client_ip(&req));
    if !state
        .rate_limiter
        .check_rate_limit(&limiter_key, LOGIN_ATTEMPTS, LOGIN_WINDOW)
    {
        log::warn!("Login rate limit hit for {}", limiter_key);
        return HttpResponse::TooManyRequests()
            .content_type("text/html; charset=utf-8")
            .body(login_page_body("rate_limit", &form.email));
    }

    let credentials = Credentials {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    };
    if credentials.email.is_empty() || credentials.password.is_empty() {
        return render(AdminLoginTemplate {
            error: Some(login_error_message("missing")),
            email: credentials.email,
        });
    }

    match state.auth.sign_in(&credentials).await {
        Ok(session) => {
            state.rate_limiter.reset(&limiter_key);
            log::info!("Admin signed in: {}", credentials.email);

            HttpResponse::SeeOther()
                .cookie(session_cookie(
                    &session.access_token,
                    state.config.secure_cookies,
                ))
                .insert_header(("Location", "/admin"))
                .finish()
        }
        Err(BackendError::Auth(reason)) => {
            log::warn!("Failed login for {}: {}", credentials.email, reason);
            render(AdminLoginTemplate {
                error: Some(login_error_message("invalid")),
                email: credentials.email,
            })
        }
        Err(e) => {
            log::error!("Auth service error during login: {}", e);
            render(AdminLoginTemplate {
                error: Some(login_error_message("internal")),
                email: credentials.email,
            })
        }
    }
}

fn login_page_body(code: &str, email: &str) -> String {
    use askama::Template;

    AdminLoginTemplate {
        error: Some(login_error_message(code)),
        email: email.trim().to_string(),
    }
    .render()
    .unwrap_or_else(|e| {
        log::error!("Template error: {}", e);
        login_error_message(code)
    })
}

#[post("/admin/logout")]
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(token) = session_token(&req) {
        if let Err(e) = state.auth.sign_out(&token).await {
            log::error!("Failed to sign out: {}", e);
        }
    }

    let cookie = removal_cookie(state.config.secure_cookies);

    if is_htmx(&req) {
        HttpResponse::Ok()
            .cookie(cookie)
            .insert_header(("HX-Redirect", LOGIN_PATH))
            .finish()
    } else {
        HttpResponse::SeeOther()
            .cookie(cookie)
            .insert_header(("Location", LOGIN_PATH))
            .finish()
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login_form)
        .service(login_submit)
        .service(logout);
}
