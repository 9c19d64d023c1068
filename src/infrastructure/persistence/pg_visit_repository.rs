//! PostgreSQL implementation of the visit repository.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::{DailyCount, VisitRepository, zero_filled_daily_counts};
use crate::error::AppError;

/// PostgreSQL repository for the append-only visit log.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn create(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let visit = sqlx::query_as::<_, Visit>(
            r#"
            INSERT INTO visit_logs (link_id, visitor_ip)
            VALUES ($1, $2)
            RETURNING id, link_id, visitor_ip, visited_at
            "#,
        )
        .bind(new_visit.link_id)
        .bind(&new_visit.visitor_ip)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(visit)
    }

    async fn find_recent(&self, link_id: i64, limit: i64) -> Result<Vec<Visit>, AppError> {
        let visits = sqlx::query_as::<_, Visit>(
            r#"
            SELECT id, link_id, visitor_ip, visited_at
            FROM visit_logs
            WHERE link_id = $1
            ORDER BY visited_at DESC
            LIMIT $2
            "#,
        )
        .bind(link_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(visits)
    }

    async fn find_in_range(
        &self,
        link_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Visit>, AppError> {
        let visits = sqlx::query_as::<_, Visit>(
            r#"
            SELECT id, link_id, visitor_ip, visited_at
            FROM visit_logs
            WHERE link_id = $1 AND visited_at >= $2 AND visited_at <= $3
            ORDER BY visited_at DESC
            "#,
        )
        .bind(link_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(visits)
    }

    async fn count_per_day(&self, link_id: i64, days: u32) -> Result<Vec<DailyCount>, AppError> {
        let now = Utc::now();
        let today = now.date_naive();

        // Window opens at UTC midnight `days - 1` days back and closes now.
        let start_date = today - Duration::days(i64::from(days.saturating_sub(1)));
        let start = start_date.and_time(NaiveTime::MIN).and_utc();

        let visits = self.find_in_range(link_id, start, now).await?;
        let timestamps: Vec<DateTime<Utc>> = visits.into_iter().map(|v| v.visited_at).collect();

        Ok(zero_filled_daily_counts(&timestamps, days, today))
    }
}
