//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look the code up; expired links are reaped inline and answered like
///    missing ones
/// 2. Record the visit (IP from the socket peer address)
/// 3. Best-effort click counter increment
/// 4. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist or has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let visitor_ip = addr.ip().to_string();
    debug!("Redirecting {} for {}", code, visitor_ip);

    let link = state.url_service.resolve_and_log(&code, &visitor_ip).await?;

    Ok(Redirect::temporary(&link.original_url))
}
