//! Link lifecycle orchestration: create, resolve, delete, analytics.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde_json::json;
use tracing::{error, info, warn};

use crate::application::services::geolocation_service::{GeolocationService, aggregate};
use crate::domain::entities::{GeoAnalytics, Geolocation, Link, NewLink, NewVisit};
use crate::domain::repositories::{DailyCount, LinkRepository, VisitRepository};
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_alias};

/// Visits fetched to compute the aggregate stats.
const ANALYTICS_VISIT_WINDOW: i64 = 20;

/// Enriched visits surfaced in the response.
const RECENT_VISITS_SHOWN: usize = 5;

/// Trailing window of the daily time series.
const TIME_SERIES_DAYS: u32 = 7;

/// A freshly created link with its public short URL.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: Link,
    pub short_url: String,
}

/// One recent visit enriched with its resolved location.
#[derive(Debug, Clone)]
pub struct VisitWithGeolocation {
    pub ip: String,
    pub visited_at: DateTime<Utc>,
    pub geolocation: Geolocation,
}

/// Computed analytics for one link. Never stored; rebuilt on every request
/// from the visit log.
#[derive(Debug, Clone)]
pub struct AnalyticsSnapshot {
    /// Total clicks from the link row, not from the sampled window.
    pub visit_count: i64,
    pub recent_visits: Vec<VisitWithGeolocation>,
    pub unique_countries: usize,
    pub unique_cities: usize,
    pub geo: GeoAnalytics,
    pub time_series: Vec<DailyCount>,
}

/// Service orchestrating the link stores and the geolocation resolver.
pub struct UrlService<L: LinkRepository, V: VisitRepository> {
    link_repository: Arc<L>,
    visit_repository: Arc<V>,
    geolocation: Arc<GeolocationService>,
    base_url: String,
}

impl<L: LinkRepository, V: VisitRepository> UrlService<L, V> {
    /// Creates a new service.
    pub fn new(
        link_repository: Arc<L>,
        visit_repository: Arc<V>,
        geolocation: Arc<GeolocationService>,
        base_url: String,
    ) -> Self {
        Self {
            link_repository,
            visit_repository,
            geolocation,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link.
    ///
    /// The short code is the alias when one is given, otherwise a generated
    /// random code. Validation happens before any persistence attempt.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed alias or an
    /// expiration already in the past, [`AppError::Conflict`] when the code
    /// or alias is taken, [`AppError::Internal`] on other storage failures.
    pub async fn create_short_url(
        &self,
        original_url: String,
        alias: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<CreatedLink, AppError> {
        if let Some(ref alias) = alias {
            validate_alias(alias)?;
        }

        if let Some(expires_at) = expires_at
            && expires_at < Utc::now()
        {
            return Err(AppError::bad_request(
                "Expiration date cannot be in the past",
                json!({ "expires_at": expires_at }),
            ));
        }

        let short_code = alias.clone().unwrap_or_else(generate_code);

        let new_link = NewLink {
            original_url,
            short_code: short_code.clone(),
            alias,
            expires_at,
        };

        let link = self.link_repository.create(new_link).await.map_err(|e| {
            match e {
                // The store's unique constraint is the single collision
                // arbiter; generated codes and aliases both land here.
                AppError::Conflict { .. } => AppError::conflict(
                    "Short code is already in use",
                    json!({ "code": short_code }),
                ),
                other => other,
            }
        })?;

        metrics::counter!("geoshort_links_created_total").increment(1);

        let short_url = format!("{}/{}", self.base_url, link.short_code);

        Ok(CreatedLink { link, short_url })
    }

    /// Resolves a short code for a redirect and logs the visit.
    ///
    /// An expired link is reaped inline (best-effort) and reported exactly
    /// like a missing one. The visit row is the primary write; the click
    /// counter increment that follows is best-effort and a failure there is
    /// logged, never surfaced.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for missing or expired codes,
    /// [`AppError::Internal`] when the visit row cannot be written.
    pub async fn resolve_and_log(
        &self,
        short_code: &str,
        visitor_ip: &str,
    ) -> Result<Link, AppError> {
        let link = self.find_link(short_code).await?;

        if link.is_expired() {
            info!("Short link {} has expired, deleting it", short_code);
            if let Err(e) = self.link_repository.delete_by_code(short_code).await {
                error!("Failed to delete expired link {}: {}", short_code, e);
            }
            return Err(not_found(short_code));
        }

        self.visit_repository
            .create(NewVisit {
                link_id: link.id,
                visitor_ip: visitor_ip.to_string(),
            })
            .await?;

        if let Err(e) = self.link_repository.increment_click_count(short_code).await {
            warn!("Failed to increment click count for {}: {}", short_code, e);
        }

        metrics::counter!("geoshort_redirects_total").increment(1);

        Ok(link)
    }

    /// Returns link metadata without logging a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn get_info(&self, short_code: &str) -> Result<Link, AppError> {
        self.find_link(short_code).await
    }

    /// Deletes a link; the store cascade removes its visits.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn delete_url(&self, short_code: &str) -> Result<(), AppError> {
        if !self.link_repository.delete_by_code(short_code).await? {
            return Err(not_found(short_code));
        }
        Ok(())
    }

    /// Computes the analytics snapshot for a link.
    ///
    /// The recent-visit window and the daily time series are independent
    /// reads issued concurrently; the per-visit geolocation lookups then fan
    /// out together. Resolution is fail-open, so one slow or failed lookup
    /// degrades that visit to the Unknown sentinel instead of aborting the
    /// join.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code,
    /// [`AppError::Internal`] on storage failures.
    pub async fn get_analytics(&self, short_code: &str) -> Result<AnalyticsSnapshot, AppError> {
        let link = self.find_link(short_code).await?;

        let (recent, time_series) = tokio::join!(
            self.visit_repository
                .find_recent(link.id, ANALYTICS_VISIT_WINDOW),
            self.visit_repository.count_per_day(link.id, TIME_SERIES_DAYS),
        );
        let recent = recent?;
        let time_series = time_series?;

        let locations =
            join_all(recent.iter().map(|v| self.geolocation.resolve(&v.visitor_ip))).await;

        let enriched: Vec<VisitWithGeolocation> = recent
            .into_iter()
            .zip(locations)
            .map(|(visit, geolocation)| VisitWithGeolocation {
                ip: visit.visitor_ip,
                visited_at: visit.visited_at,
                geolocation,
            })
            .collect();

        let unique_countries = enriched
            .iter()
            .map(|v| v.geolocation.country.as_str())
            .filter(|c| *c != "Unknown")
            .collect::<HashSet<_>>()
            .len();

        let unique_cities = enriched
            .iter()
            .map(|v| v.geolocation.city.as_str())
            .filter(|c| !c.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let all_locations: Vec<Geolocation> =
            enriched.iter().map(|v| v.geolocation.clone()).collect();
        let geo = aggregate(&all_locations);

        // The full window only feeds the aggregates; the payload surfaces
        // the newest few.
        let mut recent_visits = enriched;
        recent_visits.truncate(RECENT_VISITS_SHOWN);

        Ok(AnalyticsSnapshot {
            visit_count: link.click_count,
            recent_visits,
            unique_countries,
            unique_cities,
            geo,
            time_series,
        })
    }

    async fn find_link(&self, short_code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| not_found(short_code))
    }
}

fn not_found(short_code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": short_code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Visit;
    use crate::domain::repositories::{MockLinkRepository, MockVisitRepository};
    use crate::infrastructure::cache::NullCache;
    use crate::infrastructure::geolocation::MockGeolocationProvider;
    use chrono::Duration;

    fn test_geolocation_service() -> Arc<GeolocationService> {
        // A provider that must never be called; tests use private IPs so
        // resolution short-circuits to the sentinel.
        let mut provider = MockGeolocationProvider::new();
        provider.expect_fetch().times(0);
        Arc::new(GeolocationService::new(
            Arc::new(provider),
            Arc::new(NullCache),
            60,
        ))
    }

    fn test_link(id: i64, code: &str, expires_at: Option<DateTime<Utc>>) -> Link {
        Link::new(
            id,
            "https://example.com/target".to_string(),
            code.to_string(),
            None,
            Utc::now(),
            expires_at,
            7,
        )
    }

    fn test_visit(id: i64, link_id: i64, ip: &str) -> Visit {
        Visit::new(id, link_id, ip.to_string(), Utc::now())
    }

    fn service(
        link_repo: MockLinkRepository,
        visit_repo: MockVisitRepository,
    ) -> UrlService<MockLinkRepository, MockVisitRepository> {
        UrlService::new(
            Arc::new(link_repo),
            Arc::new(visit_repo),
            test_geolocation_service(),
            "https://sho.rt".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_generates_hex_code_without_alias() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_create()
            .withf(|new_link| {
                new_link.short_code.len() == 6
                    && new_link.short_code.chars().all(|c| c.is_ascii_hexdigit())
                    && new_link.alias.is_none()
            })
            .times(1)
            .returning(|new_link| {
                Ok(Link::new(
                    1,
                    new_link.original_url,
                    new_link.short_code,
                    None,
                    Utc::now(),
                    None,
                    0,
                ))
            });

        let service = service(link_repo, MockVisitRepository::new());

        let created = service
            .create_short_url("https://example.com".to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(
            created.short_url,
            format!("https://sho.rt/{}", created.link.short_code)
        );
    }

    #[tokio::test]
    async fn test_create_uses_alias_as_code() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_create()
            .withf(|new_link| {
                new_link.short_code == "my-promo" && new_link.alias.as_deref() == Some("my-promo")
            })
            .times(1)
            .returning(|new_link| {
                Ok(Link::new(
                    1,
                    new_link.original_url,
                    new_link.short_code,
                    new_link.alias,
                    Utc::now(),
                    None,
                    0,
                ))
            });

        let service = service(link_repo, MockVisitRepository::new());

        let created = service
            .create_short_url(
                "https://example.com".to_string(),
                Some("my-promo".to_string()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(created.short_url, "https://sho.rt/my-promo");
    }

    #[tokio::test]
    async fn test_create_rejects_past_expiration_before_persisting() {
        let mut link_repo = MockLinkRepository::new();
        link_repo.expect_create().times(0);

        let service = service(link_repo, MockVisitRepository::new());

        let result = service
            .create_short_url(
                "https://example.com".to_string(),
                None,
                Some(Utc::now() - Duration::hours(1)),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_alias_before_persisting() {
        let mut link_repo = MockLinkRepository::new();
        link_repo.expect_create().times(0);

        let service = service(link_repo, MockVisitRepository::new());

        let result = service
            .create_short_url(
                "https://example.com".to_string(),
                Some("not valid!".to_string()),
                None,
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_translates_unique_violation_to_conflict() {
        let mut link_repo = MockLinkRepository::new();
        link_repo.expect_create().times(1).returning(|_| {
            Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "url_links_short_code_key" }),
            ))
        });

        let service = service(link_repo, MockVisitRepository::new());

        let result = service
            .create_short_url(
                "https://example.com".to_string(),
                Some("taken".to_string()),
                None,
            )
            .await;

        match result.unwrap_err() {
            AppError::Conflict { details, .. } => {
                assert_eq!(details, json!({ "code": "taken" }));
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_logs_visit_then_increments() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(Some(test_link(42, "abc123", None))));
        link_repo
            .expect_increment_click_count()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(()));

        let mut visit_repo = MockVisitRepository::new();
        visit_repo
            .expect_create()
            .withf(|v| v.link_id == 42 && v.visitor_ip == "203.0.113.7")
            .times(1)
            .returning(|v| Ok(test_visit(1, v.link_id, &v.visitor_ip)));

        let service = service(link_repo, visit_repo);

        let link = service.resolve_and_log("abc123", "203.0.113.7").await.unwrap();
        assert_eq!(link.original_url, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_resolve_survives_increment_failure() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(test_link(42, "abc123", None))));
        link_repo
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let mut visit_repo = MockVisitRepository::new();
        visit_repo
            .expect_create()
            .times(1)
            .returning(|v| Ok(test_visit(1, v.link_id, &v.visitor_ip)));

        let service = service(link_repo, visit_repo);

        // The redirect is the primary contract; the counter is best-effort.
        let result = service.resolve_and_log("abc123", "203.0.113.7").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_missing_code_is_not_found() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let mut visit_repo = MockVisitRepository::new();
        visit_repo.expect_create().times(0);

        let service = service(link_repo, visit_repo);

        let result = service.resolve_and_log("missing", "203.0.113.7").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_expired_deletes_and_reports_not_found() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| {
                Ok(Some(test_link(
                    42,
                    "old123",
                    Some(Utc::now() - Duration::hours(1)),
                )))
            });
        link_repo
            .expect_delete_by_code()
            .withf(|code| code == "old123")
            .times(1)
            .returning(|_| Ok(true));
        link_repo.expect_increment_click_count().times(0);

        let mut visit_repo = MockVisitRepository::new();
        visit_repo.expect_create().times(0);

        let service = service(link_repo, visit_repo);

        let result = service.resolve_and_log("old123", "203.0.113.7").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_expired_swallows_delete_failure() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| {
                Ok(Some(test_link(
                    42,
                    "old123",
                    Some(Utc::now() - Duration::hours(1)),
                )))
            });
        link_repo
            .expect_delete_by_code()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = service(link_repo, MockVisitRepository::new());

        // Still NotFound: the reap failure only gets logged.
        let result = service.resolve_and_log("old123", "203.0.113.7").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_url_not_found() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_delete_by_code()
            .times(1)
            .returning(|_| Ok(false));

        let service = service(link_repo, MockVisitRepository::new());

        let result = service.delete_url("missing").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_analytics_composes_snapshot() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(test_link(42, "abc123", None))));

        let mut visit_repo = MockVisitRepository::new();
        visit_repo
            .expect_find_recent()
            .withf(|link_id, limit| *link_id == 42 && *limit == 20)
            .times(1)
            .returning(|link_id, _| {
                // Six private-IP visits: all resolve to the sentinel without
                // touching the provider.
                Ok((0..6)
                    .map(|i| test_visit(i, link_id, "192.168.0.1"))
                    .collect())
            });
        visit_repo
            .expect_count_per_day()
            .withf(|link_id, days| *link_id == 42 && *days == 7)
            .times(1)
            .returning(|_, days| {
                let today = Utc::now().date_naive();
                Ok((0..days)
                    .map(|offset| DailyCount {
                        date: today - Duration::days(i64::from(days - 1 - offset)),
                        count: 0,
                    })
                    .collect())
            });

        let service = service(link_repo, visit_repo);

        let snapshot = service.get_analytics("abc123").await.unwrap();

        // Click count comes from the link row, not the sampled window.
        assert_eq!(snapshot.visit_count, 7);
        assert_eq!(snapshot.recent_visits.len(), 5);
        assert_eq!(snapshot.unique_countries, 0);
        assert_eq!(snapshot.unique_cities, 0);
        assert!(snapshot.geo.map_points.is_empty());
        assert_eq!(snapshot.time_series.len(), 7);
    }

    #[tokio::test]
    async fn test_analytics_missing_code_is_not_found() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let mut visit_repo = MockVisitRepository::new();
        visit_repo.expect_find_recent().times(0);
        visit_repo.expect_count_per_day().times(0);

        let service = service(link_repo, visit_repo);

        let result = service.get_analytics("missing").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
