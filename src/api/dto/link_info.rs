//! DTO for link metadata.

use crate::domain::entities::Link;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Link metadata returned by the info endpoint.
#[derive(Debug, Serialize)]
pub struct LinkInfoResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub alias: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
}

impl From<Link> for LinkInfoResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            alias: link.alias,
            created_at: link.created_at,
            expires_at: link.expires_at,
            click_count: link.click_count,
        }
    }
}
