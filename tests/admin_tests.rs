mod common;

#[cfg(test)]
pub mod admin_tests {
    use actix_web::cookie::Cookie;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, web::Data, App};

    use std::sync::Arc;

    use super::common::*;

    use stagepress::models::AccessToken;
    use stagepress::web::helpers::SESSION_COOKIE;
    use stagepress::web::templates::size_label;
    use stagepress::web::AppState;

    const BOUNDARY: &str = "----stagepress-test-boundary";

    macro_rules! admin_app {
        ($backend:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new(test_state(&$backend)))
                    .configure(stagepress::web::configure),
            )
            .await
        };
    }

    fn session(token: &AccessToken) -> Cookie<'static> {
        Cookie::new(SESSION_COOKIE, token.as_str().to_string())
    }

    fn location<B>(resp: &ServiceResponse<B>) -> String {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, token: &AccessToken, parts: &[Part]) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .cookie(session(token))
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(parts))
    }

    fn show_form(title: &str, days: i64, types: &[&'static str]) -> Vec<(String, String)> {
        let mut form = vec![
            ("title".to_string(), title.to_string()),
            ("venue".to_string(), "糖果LIVE".to_string()),
            ("city".to_string(), "北京".to_string()),
            (
                "date".to_string(),
                days_from_now(days).format("%Y-%m-%d").to_string(),
            ),
            ("time".to_string(), "20:00".to_string()),
            ("ticket_price".to_string(), "120元起".to_string()),
        ];
        form.extend(types.iter().map(|t| (t.to_string(), "on".to_string())));
        form
    }

    #[actix_web::test]
    async fn test_admin_requires_session() {
        let backend = Arc::new(seeded_backend());
        let app = admin_app!(backend);

        for uri in ["/admin", "/admin/profile", "/admin/schedule", "/admin/media"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(location(&resp), "/admin/login");
        }

        let req = test::TestRequest::get()
            .uri("/admin")
            .cookie(Cookie::new(SESSION_COOKIE, "not-a-session"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/login");
    }

    #[actix_web::test]
    async fn test_htmx_requests_get_hx_redirect() {
        let backend = Arc::new(seeded_backend());
        let app = admin_app!(backend);

        let req = test::TestRequest::get()
            .uri("/admin/schedule")
            .insert_header(("HX-Request", "true"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get("HX-Redirect").and_then(|v| v.to_str().ok()),
            Some("/admin/login")
        );
    }

    #[actix_web::test]
    async fn test_writes_without_session_change_nothing() {
        let backend = Arc::new(seeded_backend());
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/schedule/101/delete")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(location(&resp), "/admin/login");
        assert_eq!(backend.shows().len(), 3);
    }

    #[actix_web::test]
    async fn test_login_sets_session_cookie() {
        let backend = Arc::new(seeded_backend());
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/login")
            .set_form([("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/admin");
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie is set");
        assert!(!cookie.value().is_empty());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(backend.active_sessions(), 1);

        let req = test::TestRequest::get()
            .uri("/admin")
            .cookie(Cookie::new(SESSION_COOKIE, cookie.value().to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(&test::read_body(resp).await);
        assert!(body.contains("仪表盘"));
        assert!(body.contains(ADMIN_EMAIL));
    }

    #[actix_web::test]
    async fn test_login_with_wrong_password_shows_error() {
        let backend = Arc::new(seeded_backend());
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/login")
            .set_form([("email", ADMIN_EMAIL), ("password", "wrong")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(&test::read_body(resp).await);
        assert!(body.contains("邮箱或密码错误"));
        assert_eq!(backend.active_sessions(), 0);

        let req = test::TestRequest::post()
            .uri("/admin/login")
            .set_form([("email", ""), ("password", "")])
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("请输入邮箱和密码"));
    }

    #[actix_web::test]
    async fn test_login_is_rate_limited() {
        let backend = Arc::new(seeded_backend());
        let app = admin_app!(backend);

        for _ in 0..5 {
            let req = test::TestRequest::post()
                .uri("/admin/login")
                .set_form([("email", ADMIN_EMAIL), ("password", "wrong")])
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::post()
            .uri("/admin/login")
            .set_form([("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(backend.active_sessions(), 0);
    }

    #[actix_web::test]
    async fn test_login_page_redirects_signed_in_admin() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::get()
            .uri("/admin/login")
            .cookie(session(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin");
    }

    #[actix_web::test]
    async fn test_logout_ends_session() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/logout")
            .cookie(session(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/admin/login");
        assert_eq!(backend.active_sessions(), 0);

        let req = test::TestRequest::get()
            .uri("/admin")
            .cookie(session(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/login");
    }

    #[actix_web::test]
    async fn test_dashboard_counts() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::get()
            .uri("/admin")
            .cookie(session(&token))
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);

        assert!(body.contains("谢幕"));
        assert!(body.contains("开放麦之夜"));
    }

    #[actix_web::test]
    async fn test_created_show_appears_in_admin_and_public_schedule() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/schedule")
            .cookie(session(&token))
            .set_form(show_form("周五夜场", 10, &["type_2"]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/schedule?notice=show_created");

        let created = backend
            .shows()
            .into_iter()
            .find(|s| s.title == "周五夜场")
            .expect("show is stored");
        assert_eq!(created.type_ids, vec![2]);
        assert_eq!(created.venue, "糖果LIVE");

        let req = test::TestRequest::get()
            .uri("/admin/schedule?notice=show_created")
            .cookie(session(&token))
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("周五夜场"));
        assert!(body.contains("notice-success"));

        let req = test::TestRequest::get().uri("/schedule").to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("周五夜场"));
    }

    #[actix_web::test]
    async fn test_show_without_type_is_rejected() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/schedule")
            .cookie(session(&token))
            .set_form(show_form("周五夜场", 10, &[]))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(location(&resp), "/admin/schedule?notice=missing");
        assert_eq!(backend.shows().len(), 3);
    }

    #[actix_web::test]
    async fn test_failed_write_reports_save_failed() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        backend.set_fail_writes(true);
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/schedule")
            .cookie(session(&token))
            .set_form(show_form("周五夜场", 10, &["type_2"]))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(location(&resp), "/admin/schedule?notice=save_failed");
        assert_eq!(backend.shows().len(), 3);
    }

    #[actix_web::test]
    async fn test_update_show() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::get()
            .uri("/admin/schedule?edit=102")
            .cookie(session(&token))
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains(r#"value="即兴对决""#));

        let req = test::TestRequest::post()
            .uri("/admin/schedule/102")
            .cookie(session(&token))
            .set_form(show_form("即兴对决加场", 20, &["type_6"]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/schedule?notice=show_updated");

        let show = backend
            .shows()
            .into_iter()
            .find(|s| s.id == 102)
            .expect("show still exists");
        assert_eq!(show.title, "即兴对决加场");
        assert_eq!(show.type_ids, vec![6]);
    }

    #[actix_web::test]
    async fn test_delete_show_after_confirmation() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::get()
            .uri("/admin/schedule/101/delete")
            .cookie(session(&token))
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("开放麦之夜"));
        assert!(body.contains("确认删除"));
        assert_eq!(backend.shows().len(), 3);

        let req = test::TestRequest::post()
            .uri("/admin/schedule/101/delete")
            .cookie(session(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(location(&resp), "/admin/schedule?notice=show_deleted");
        assert!(backend.shows().iter().all(|s| s.id != 101));
    }

    #[actix_web::test]
    async fn test_uploaded_photo_appears_in_gallery() {
        let backend = Arc::new(empty_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = multipart_request(
            "/admin/media/upload",
            &token,
            &[
                Part::Text("title", "IMG_3178"),
                Part::Text("description", ""),
                Part::Text("event_id", ""),
                Part::File("photo", "IMG_3178.JPG", "image/jpeg", b"\xff\xd8\xff\xe0fake"),
            ],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/media?notice=photo_uploaded");

        let photos = backend.photos();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].description, None);
        assert!(photos[0].url.starts_with("https://memory.invalid/"));

        let names = backend.object_names();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("photos/"));
        assert!(names[0].ends_with(".jpg"));

        let req = test::TestRequest::get().uri("/gallery").to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("IMG_3178"));
        assert!(body.contains("memory.invalid"));
        assert!(!body.contains("photo-description"));
    }

    #[actix_web::test]
    async fn test_upload_requires_title_and_file() {
        let backend = Arc::new(empty_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = multipart_request(
            "/admin/media/upload",
            &token,
            &[
                Part::Text("title", " "),
                Part::File("photo", "a.jpg", "image/jpeg", b"jpeg"),
            ],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/media?notice=missing");

        let req = multipart_request(
            "/admin/media/upload",
            &token,
            &[
                Part::Text("title", "IMG_3178"),
                Part::File("photo", "", "application/octet-stream", b""),
            ],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/media?notice=no_file");

        assert!(backend.photos().is_empty());
        assert!(backend.object_names().is_empty());
    }

    #[actix_web::test]
    async fn test_media_page_shows_upload_cap_below_one_megabyte() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let mut config = test_config();
        config.max_upload_bytes = 512 * 1024;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(AppState::from_backend(config, backend.clone())))
                .configure(stagepress::web::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/admin/media")
            .cookie(session(&token))
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);

        assert!(body.contains("不超过 512 KB"));
        assert!(!body.contains("不超过 0 MB"));
    }

    #[actix_web::test]
    async fn test_upload_cap_labels_round_up() {
        assert_eq!(size_label(10 * 1024 * 1024), "10 MB");
        assert_eq!(size_label(1024 * 1024 + 1), "2 MB");
        assert_eq!(size_label(1000), "1 KB");
    }

    #[actix_web::test]
    async fn test_bulk_photo_delete_confirm_flow() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/media/delete")
            .cookie(session(&token))
            .set_form([("photo_201", "on"), ("photo_203", "on")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(&test::read_body(resp).await);
        assert!(body.contains("后台合影"));
        assert!(body.contains("彩排"));
        assert!(!body.contains("谢幕"));
        assert!(body.contains(r#"value="201,203""#));
        assert_eq!(backend.photos().len(), 3);

        let req = test::TestRequest::post()
            .uri("/admin/media/delete/confirm")
            .cookie(session(&token))
            .set_form([("ids", "201,203")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/media?notice=photos_deleted");

        let remaining: Vec<i64> = backend.photos().iter().map(|p| p.id).collect();
        assert_eq!(remaining, vec![202]);
    }

    #[actix_web::test]
    async fn test_bulk_delete_without_selection() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/media/delete")
            .cookie(session(&token))
            .set_form([("confirm", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/media?notice=no_selection");
    }

    #[actix_web::test]
    async fn test_update_photo_metadata() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/media/203")
            .cookie(session(&token))
            .set_form([
                ("title", "彩排现场"),
                ("description", "上台前"),
                ("event_id", "2"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/media?notice=photo_updated");

        let photo = backend
            .photos()
            .into_iter()
            .find(|p| p.id == 203)
            .expect("photo still exists");
        assert_eq!(photo.title, "彩排现场");
        assert_eq!(photo.description.as_deref(), Some("上台前"));
        assert_eq!(photo.event_name.as_deref(), Some("深圳脱口秀专场"));
    }

    #[actix_web::test]
    async fn test_profile_save_keeps_avatar_and_id() {
        let backend = Arc::new(seeded_backend().with_profile(stagepress::models::Profile {
            avatar_url: Some("https://cdn.test/avatar.png".to_string()),
            ..get_seed_profile()
        }));
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/profile")
            .cookie(session(&token))
            .set_form([
                ("name", "新名字"),
                ("bio", "新的简介"),
                ("tagline", ""),
                ("achievements", "第一\n第二"),
                ("weibo", "https://weibo.com/new"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/profile?notice=profile_saved");

        let profile = backend.profile().expect("profile is stored");
        assert_eq!(profile.id, 7);
        assert_eq!(profile.name, "新名字");
        assert_eq!(profile.tagline, None);
        assert_eq!(profile.achievements, vec!["第一", "第二"]);
        assert_eq!(profile.avatar_url.as_deref(), Some("https://cdn.test/avatar.png"));

        let req = test::TestRequest::get().uri("/").to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("新名字"));
    }

    #[actix_web::test]
    async fn test_avatar_upload_updates_profile() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = multipart_request(
            "/admin/profile/avatar",
            &token,
            &[Part::File("avatar", "me.png", "image/png", b"\x89PNGfake")],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/profile?notice=avatar_uploaded");

        let profile = backend.profile().expect("profile is stored");
        assert_eq!(profile.name, "测试演员");
        let avatar = profile.avatar_url.expect("avatar url is set");
        assert!(avatar.contains("/avatars/"));
    }

    #[actix_web::test]
    async fn test_contact_save_requires_only_non_blank_email() {
        let backend = Arc::new(seeded_backend());
        let token = sign_in_admin(&backend).await;
        let app = admin_app!(backend);

        let req = test::TestRequest::post()
            .uri("/admin/profile/contact")
            .cookie(session(&token))
            .set_form([("email", " "), ("phone", "123")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/profile?notice=missing");
        assert_eq!(backend.contact().map(|c| c.email), Some("booking@test.com".to_string()));

        let req = test::TestRequest::post()
            .uri("/admin/profile/contact")
            .cookie(session(&token))
            .set_form([("email", "booking@localhost"), ("xiaohongshu_id", "@new")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/admin/profile?notice=contact_saved");

        let contact = backend.contact().expect("contact is stored");
        assert_eq!(contact.id, 3);
        assert_eq!(contact.email, "booking@localhost");
        assert_eq!(contact.phone, None);
        assert_eq!(contact.xiaohongshu_id.as_deref(), Some("@new"));
    }
}
