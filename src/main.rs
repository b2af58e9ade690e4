use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::web::{Data, FormConfig};
use actix_web::{App, HttpServer};

use std::io;
use std::sync::Arc;

use stagepress::config::SiteConfig;
use stagepress::db::Backend;
use stagepress::web::middleware::SecurityHeaders;
use stagepress::web::{self, AppState};

const FORM_LIMIT_BYTES: usize = 256 * 1024;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SiteConfig::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let backend = Backend::new(&config.backend).map_err(|e| {
        log::error!("Failed to build backend client: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;

    let bind_addr = config.bind_addr.clone();
    let static_dir = config.static_dir.clone();
    let hsts = config.secure_cookies;
    let state = Data::new(AppState::from_backend(config, Arc::new(backend)));

    log::info!("Listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(SecurityHeaders::new(hsts))
            .app_data(state.clone())
            .app_data(FormConfig::default().limit(FORM_LIMIT_BYTES))
            .configure(web::configure)
            .service(Files::new("/static", &static_dir).prefer_utf8(true))
    })
    .bind(bind_addr)?
    .run()
    .await
}
