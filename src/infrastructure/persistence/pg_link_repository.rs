//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. Short code
/// and alias uniqueness are enforced by the table's unique constraints; a
/// violation surfaces as [`AppError::Conflict`] via the error translation.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO url_links (original_url, short_code, alias, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, original_url, short_code, alias, created_at, expires_at, click_count
            "#,
        )
        .bind(&new_link.original_url)
        .bind(&new_link.short_code)
        .bind(&new_link.alias)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, original_url, short_code, alias, created_at, expires_at, click_count
            FROM url_links
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM url_links WHERE short_code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_click_count(&self, code: &str) -> Result<(), AppError> {
        // Atomic increment; a read-then-write would lose updates under
        // concurrent redirects.
        sqlx::query("UPDATE url_links SET click_count = click_count + 1 WHERE short_code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let result =
            sqlx::query("DELETE FROM url_links WHERE expires_at IS NOT NULL AND expires_at < NOW()")
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected())
    }
}
