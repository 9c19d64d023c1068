//! Handler for link analytics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the computed analytics snapshot for a link.
///
/// # Endpoint
///
/// `GET /api/analytics/{code}`
///
/// # Response
///
/// Total click count, the five most recent visits enriched with their
/// resolved locations, unique country/city counts, heat-map points,
/// country/city rollups, and the seven-day time series. Everything is
/// recomputed from the visit log on each request.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let snapshot = state.url_service.get_analytics(&code).await?;

    Ok(Json(snapshot.into()))
}
