//! Handler for link metadata lookup.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::link_info::LinkInfoResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns link metadata without logging a visit.
///
/// # Endpoint
///
/// `GET /api/info/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn info_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkInfoResponse>, AppError> {
    let link = state.url_service.get_info(&code).await?;

    Ok(Json(link.into()))
}
