use std::sync::Arc;

use crate::config::SiteConfig;
use crate::db::SiteStore;
use crate::samples::Samples;
use crate::services::{AuthProvider, ObjectStore};
use crate::web::security::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SiteStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub storage: Arc<dyn ObjectStore>,
    pub samples: Arc<Samples>,
    pub config: Arc<SiteConfig>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wires all three seams to one backend, which is how both the hosted
    /// service and the in-memory fake are used.
    pub fn from_backend<B>(config: SiteConfig, backend: Arc<B>) -> Self
    where
        B: SiteStore + AuthProvider + ObjectStore + 'static,
    {
        Self {
            store: backend.clone(),
            auth: backend.clone(),
            storage: backend,
            samples: Arc::new(Samples::default()),
            config: Arc::new(config),
            rate_limiter: Arc::new(RateLimiter::new()),
        }
    }
}
