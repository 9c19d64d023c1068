//! Application services orchestrating domain operations.

pub mod geolocation_service;
pub mod url_service;

pub use geolocation_service::{GeolocationService, aggregate};
pub use url_service::{AnalyticsSnapshot, CreatedLink, UrlService, VisitWithGeolocation};
