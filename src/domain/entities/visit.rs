//! Visit entity representing a single recorded redirect.

use chrono::{DateTime, Utc};

/// One access event for a link.
///
/// Visits are append-only: they are written on each successful redirect,
/// never mutated, and removed only by the cascade when their link is
/// deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Visit {
    pub id: i64,
    pub link_id: i64,
    pub visitor_ip: String,
    pub visited_at: DateTime<Utc>,
}

impl Visit {
    /// Creates a new Visit instance.
    pub fn new(id: i64, link_id: i64, visitor_ip: String, visited_at: DateTime<Utc>) -> Self {
        Self {
            id,
            link_id,
            visitor_ip,
            visited_at,
        }
    }
}

/// Input data for recording a new visit.
///
/// The `link_id` must reference an existing link; the timestamp is set by
/// the database.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub link_id: i64,
    pub visitor_ip: String,
}
