//! Repository trait for visit log data access.

use crate::domain::entities::{NewVisit, Visit};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// Visit total for one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Repository interface for the append-only visit log.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVisitRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Records a new visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a
    /// `link_id` that no longer references an existing link.
    async fn create(&self, new_visit: NewVisit) -> Result<Visit, AppError>;

    /// Returns the most recent visits for a link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_recent(&self, link_id: i64, limit: i64) -> Result<Vec<Visit>, AppError>;

    /// Returns visits within `[start, end]`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_in_range(
        &self,
        link_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Visit>, AppError>;

    /// Builds the daily visit histogram for the trailing `days`-day window
    /// ending today (inclusive).
    ///
    /// Exactly `days` entries, dates ascending, gaps filled with zero. Day
    /// boundaries are UTC midnight.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_per_day(&self, link_id: i64, days: u32) -> Result<Vec<DailyCount>, AppError>;
}

/// Folds raw visit timestamps into the zero-filled trailing histogram.
///
/// Timestamps outside the window are ignored rather than clamped.
pub fn zero_filled_daily_counts(
    visited_at: &[DateTime<Utc>],
    days: u32,
    today: NaiveDate,
) -> Vec<DailyCount> {
    if days == 0 {
        return Vec::new();
    }

    let start = today - Duration::days(i64::from(days - 1));

    let mut buckets: Vec<DailyCount> = (0..days)
        .map(|offset| DailyCount {
            date: start + Duration::days(i64::from(offset)),
            count: 0,
        })
        .collect();

    for ts in visited_at {
        let date = ts.date_naive();
        if date < start || date > today {
            continue;
        }
        let idx = (date - start).num_days() as usize;
        buckets[idx].count += 1;
    }

    buckets
}
