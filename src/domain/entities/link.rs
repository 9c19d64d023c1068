//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its metadata and denormalized click counter.
///
/// The short code is globally unique and immutable once created. The click
/// counter is best-effort: visit rows are the source of truth and the two
/// may drift when an increment fails mid-redirect.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub alias: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        alias: Option<String>,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        click_count: i64,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            alias,
            created_at,
            expires_at,
            click_count,
        }
    }

    /// Returns true if the link has passed its expiry time.
    ///
    /// Links without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: String,
    pub alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
