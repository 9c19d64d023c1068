//! API route configuration.

use crate::api::handlers::{
    analytics_handler, delete_link_handler, info_handler, shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `POST   /shorten`           - Create a short URL
/// - `GET    /info/{code}`       - Link metadata (no visit logged)
/// - `GET    /analytics/{code}`  - Computed analytics snapshot
/// - `DELETE /links/{code}`      - Delete a link and its visit log
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/info/{code}", get(info_handler))
        .route("/analytics/{code}", get(analytics_handler))
        .route("/links/{code}", delete(delete_link_handler))
}
