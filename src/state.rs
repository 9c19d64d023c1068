//! Shared application state injected into handlers.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::UrlService;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::{PgLinkRepository, PgVisitRepository};

/// State shared by all request handlers.
///
/// Everything here is cheaply cloneable; the services own their
/// repositories and the geolocation resolver.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub url_service: Arc<UrlService<PgLinkRepository, PgVisitRepository>>,
    pub cache: Arc<dyn CacheService>,
}
