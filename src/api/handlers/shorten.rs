//! Handler for the shorten endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/long/path",
///   "alias": "my-link",                    // optional
///   "expires_at": "2027-01-01T00:00:00Z"   // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request on validation failure (bad URL, bad alias,
/// expiration in the past) and 409 Conflict when the code or alias is
/// already taken.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let created = state
        .url_service
        .create_short_url(payload.url, payload.alias, payload.expires_at)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            code: created.link.short_code,
            short_url: created.short_url,
        }),
    ))
}
