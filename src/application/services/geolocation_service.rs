//! IP geolocation resolution and visit aggregation.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{CityStats, CountryStats, GeoAnalytics, GeoPoint, Geolocation};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::geolocation::GeolocationProvider;
use tracing::{debug, warn};

/// Upper bound on one provider call.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// How long a resolved location stays cached.
pub const CACHE_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Cities kept in the per-link rollup.
const TOP_CITIES: usize = 10;

/// Resolves visitor IPs to coarse locations, fail-open.
///
/// Resolution never returns an error: private addresses and every provider
/// failure mode degrade to the `Unknown` sentinel so that analytics stay
/// available while the third-party endpoint is down.
pub struct GeolocationService {
    provider: Arc<dyn GeolocationProvider>,
    cache: Arc<dyn CacheService>,
    cache_ttl_seconds: u64,
}

impl GeolocationService {
    /// Creates a new resolver over a provider and a shared cache.
    pub fn new(
        provider: Arc<dyn GeolocationProvider>,
        cache: Arc<dyn CacheService>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            provider,
            cache,
            cache_ttl_seconds,
        }
    }

    /// Looks up the location for a visitor IP.
    ///
    /// Private and loopback addresses short-circuit to the sentinel without
    /// touching the cache or the provider. Public addresses hit the cache
    /// first; on a miss the provider is called once and a success is cached
    /// for [`CACHE_TTL_SECONDS`].
    pub async fn resolve(&self, ip: &str) -> Geolocation {
        if is_private_ip(ip) {
            return Geolocation::unknown(ip);
        }

        let cache_key = format!("ip_geo:{}", ip);

        if let Ok(Some(cached)) = self.cache.get(&cache_key).await {
            match serde_json::from_str::<Geolocation>(&cached) {
                Ok(geo) => return geo,
                Err(e) => debug!("Discarding unreadable cache entry for {}: {}", ip, e),
            }
        }

        match self.provider.fetch(ip).await {
            Ok(geo) => {
                if let Ok(json) = serde_json::to_string(&geo) {
                    let _ = self.cache.set(&cache_key, &json, self.cache_ttl_seconds).await;
                }
                geo
            }
            Err(e) => {
                warn!("Geolocation lookup failed for {}: {}", ip, e);
                Geolocation::unknown(ip)
            }
        }
    }
}

/// Private, loopback, and unspecified addresses that are never sent to the
/// external provider.
fn is_private_ip(ip: &str) -> bool {
    ip == "127.0.0.1"
        || ip == "::1"
        || ip == "localhost"
        || ip == "0.0.0.0"
        || ip.starts_with("192.168.")
        || ip.starts_with("10.")
        || ip.starts_with("172.16.")
}

/// Derives map points and country/city rollups from resolved visits.
///
/// Sentinel records and records without coordinates are dropped before
/// grouping; all percentages are computed over the remaining total.
pub fn aggregate(records: &[Geolocation]) -> GeoAnalytics {
    let valid: Vec<&Geolocation> = records.iter().filter(|g| g.is_resolvable()).collect();

    GeoAnalytics {
        map_points: map_points(&valid),
        countries_stats: country_stats(&valid),
        cities_stats: city_stats(&valid),
    }
}

/// Groups visits by exact coordinate pair; weight is the occurrence count.
fn map_points(records: &[&Geolocation]) -> Vec<GeoPoint> {
    let mut points: Vec<GeoPoint> = Vec::new();

    for geo in records {
        match points
            .iter_mut()
            .find(|p| p.lat == geo.lat && p.lon == geo.lon)
        {
            Some(point) => point.weight += 1,
            None => points.push(GeoPoint {
                lat: geo.lat,
                lon: geo.lon,
                weight: 1,
            }),
        }
    }

    points
}

/// Country rollup with integer-rounded percentages, sorted by count
/// descending. Ties keep first-seen order.
fn country_stats(records: &[&Geolocation]) -> Vec<CountryStats> {
    let mut stats: Vec<CountryStats> = Vec::new();

    for geo in records {
        match stats.iter_mut().find(|s| s.country_code == geo.country_code) {
            Some(entry) => entry.count += 1,
            None => stats.push(CountryStats {
                country_code: geo.country_code.clone(),
                country: geo.country.clone(),
                count: 1,
                percentage: 0,
            }),
        }
    }

    let total = records.len() as f64;
    for entry in &mut stats {
        entry.percentage = ((entry.count as f64 / total) * 100.0).round() as u32;
    }

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// City rollup keyed by (city, country code), sorted by count descending,
/// truncated to the top 10. Records without a city name are dropped.
fn city_stats(records: &[&Geolocation]) -> Vec<CityStats> {
    let mut stats: Vec<CityStats> = Vec::new();

    for geo in records {
        if geo.city.is_empty() {
            continue;
        }

        match stats
            .iter_mut()
            .find(|s| s.city == geo.city && s.country_code == geo.country_code)
        {
            Some(entry) => entry.count += 1,
            None => stats.push(CityStats {
                city: geo.city.clone(),
                country: geo.country.clone(),
                country_code: geo.country_code.clone(),
                count: 1,
                lat: geo.lat,
                lon: geo.lon,
            }),
        }
    }

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats.truncate(TOP_CITIES);
    stats
}
