#![allow(dead_code)]

//! In-memory doubles for the storage, cache, and provider contracts.
//!
//! Link and visit repositories share one store so the delete cascade
//! behaves like the real schema's `ON DELETE CASCADE`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use geoshort::domain::entities::{Geolocation, Link, NewLink, NewVisit, Visit};
use geoshort::domain::repositories::{
    DailyCount, LinkRepository, VisitRepository, zero_filled_daily_counts,
};
use geoshort::error::AppError;
use geoshort::infrastructure::cache::{CacheResult, CacheService};
use geoshort::infrastructure::geolocation::{GeolocationProvider, ProviderError};

/// Backing store shared by the two repositories.
#[derive(Default)]
pub struct Store {
    pub links: Vec<Link>,
    pub visits: Vec<Visit>,
    next_link_id: i64,
    next_visit_id: i64,
}

impl Store {
    pub fn shared() -> Arc<Mutex<Store>> {
        Arc::new(Mutex::new(Store::default()))
    }
}

pub struct InMemoryLinkRepository {
    store: Arc<Mutex<Store>>,
    /// When set, `increment_click_count` fails, modelling a flaky counter.
    pub fail_increments: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn new(store: Arc<Mutex<Store>>) -> Self {
        Self {
            store,
            fail_increments: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut store = self.store.lock().unwrap();

        let taken = store.links.iter().any(|l| {
            l.short_code == new_link.short_code
                || (new_link.alias.is_some() && l.alias == new_link.alias)
        });
        if taken {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "url_links_short_code_key" }),
            ));
        }

        store.next_link_id += 1;
        let link = Link::new(
            store.next_link_id,
            new_link.original_url,
            new_link.short_code,
            new_link.alias,
            Utc::now(),
            new_link.expires_at,
            0,
        );
        store.links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let store = self.store.lock().unwrap();
        Ok(store.links.iter().find(|l| l.short_code == code).cloned())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        let mut store = self.store.lock().unwrap();

        let Some(link) = store.links.iter().find(|l| l.short_code == code).cloned() else {
            return Ok(false);
        };

        store.links.retain(|l| l.id != link.id);
        // Cascade, as the real schema does.
        store.visits.retain(|v| v.link_id != link.id);
        Ok(true)
    }

    async fn increment_click_count(&self, code: &str) -> Result<(), AppError> {
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", json!({})));
        }

        let mut store = self.store.lock().unwrap();
        if let Some(link) = store.links.iter_mut().find(|l| l.short_code == code) {
            link.click_count += 1;
        }
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let mut store = self.store.lock().unwrap();

        let expired_ids: Vec<i64> = store
            .links
            .iter()
            .filter(|l| l.is_expired())
            .map(|l| l.id)
            .collect();

        store.links.retain(|l| !expired_ids.contains(&l.id));
        store.visits.retain(|v| !expired_ids.contains(&v.link_id));
        Ok(expired_ids.len() as u64)
    }
}

pub struct InMemoryVisitRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryVisitRepository {
    pub fn new(store: Arc<Mutex<Store>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VisitRepository for InMemoryVisitRepository {
    async fn create(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let mut store = self.store.lock().unwrap();

        if !store.links.iter().any(|l| l.id == new_visit.link_id) {
            return Err(AppError::internal(
                "Database error",
                json!({ "constraint": "visit_logs_link_id_fkey" }),
            ));
        }

        store.next_visit_id += 1;
        let visit = Visit::new(
            store.next_visit_id,
            new_visit.link_id,
            new_visit.visitor_ip,
            Utc::now(),
        );
        store.visits.push(visit.clone());
        Ok(visit)
    }

    async fn find_recent(&self, link_id: i64, limit: i64) -> Result<Vec<Visit>, AppError> {
        let store = self.store.lock().unwrap();
        let mut visits: Vec<Visit> = store
            .visits
            .iter()
            .filter(|v| v.link_id == link_id)
            .cloned()
            .collect();
        visits.sort_by(|a, b| b.visited_at.cmp(&a.visited_at).then(b.id.cmp(&a.id)));
        visits.truncate(limit as usize);
        Ok(visits)
    }

    async fn find_in_range(
        &self,
        link_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Visit>, AppError> {
        let store = self.store.lock().unwrap();
        let mut visits: Vec<Visit> = store
            .visits
            .iter()
            .filter(|v| v.link_id == link_id && v.visited_at >= start && v.visited_at <= end)
            .cloned()
            .collect();
        visits.sort_by(|a, b| b.visited_at.cmp(&a.visited_at).then(b.id.cmp(&a.id)));
        Ok(visits)
    }

    async fn count_per_day(&self, link_id: i64, days: u32) -> Result<Vec<DailyCount>, AppError> {
        let store = self.store.lock().unwrap();
        let timestamps: Vec<DateTime<Utc>> = store
            .visits
            .iter()
            .filter(|v| v.link_id == link_id)
            .map(|v| v.visited_at)
            .collect();
        Ok(zero_filled_daily_counts(
            &timestamps,
            days,
            Utc::now().date_naive(),
        ))
    }
}

/// Provider double that counts calls and serves a canned response.
pub struct StubProvider {
    pub calls: AtomicUsize,
    response: Option<Geolocation>,
}

impl StubProvider {
    /// Always answers with `response`.
    pub fn answering(response: Geolocation) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: Some(response),
        }
    }

    /// Fails every lookup.
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: None,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeolocationProvider for StubProvider {
    async fn fetch(&self, _ip: &str) -> Result<Geolocation, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Some(geo) => Ok(geo.clone()),
            None => Err(serde_json::from_str::<Geolocation>("not json")
                .unwrap_err()
                .into()),
        }
    }
}

/// Map-backed cache double.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl_seconds: u64) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// A resolvable location for test fixtures.
pub fn sample_geolocation(country: &str, code: &str, city: &str, lat: f64, lon: f64) -> Geolocation {
    Geolocation {
        country: country.to_string(),
        country_code: code.to_string(),
        city: city.to_string(),
        lat,
        lon,
        ..Geolocation::default()
    }
}
