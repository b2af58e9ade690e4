pub mod admin_dashboard;
pub mod admin_media;
pub mod admin_profile;
pub mod admin_schedule;
pub mod auth;
pub mod public;

use actix_web::web;

/// Registers every screen of the public site and the admin panel.
pub fn configure(cfg: &mut web::ServiceConfig) {
    public::configure(cfg);
    auth::configure(cfg);
    admin_dashboard::configure(cfg);
    admin_profile::configure(cfg);
    admin_schedule::configure(cfg);
    admin_media::configure(cfg);
}
