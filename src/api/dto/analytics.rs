//! DTOs for the analytics endpoint.

use crate::application::services::{AnalyticsSnapshot, VisitWithGeolocation};
use crate::domain::entities::{CityStats, CountryStats, GeoPoint};
use crate::domain::repositories::DailyCount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Trimmed location view attached to each surfaced visit.
#[derive(Debug, Serialize)]
pub struct VisitGeolocation {
    pub country: String,
    pub country_code: String,
    pub city: String,
    pub region_name: String,
    pub lat: f64,
    pub lon: f64,
}

/// One recent visit with its resolved location.
#[derive(Debug, Serialize)]
pub struct RecentVisit {
    pub ip: String,
    pub visited_at: DateTime<Utc>,
    pub geolocation: VisitGeolocation,
}

/// Visit total for one day of the trailing window.
#[derive(Debug, Serialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub count: i64,
}

/// Full analytics snapshot for a link.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub visit_count: i64,
    pub recent_visits: Vec<RecentVisit>,
    pub unique_countries: usize,
    pub unique_cities: usize,
    pub map_points: Vec<GeoPoint>,
    pub countries_stats: Vec<CountryStats>,
    pub cities_stats: Vec<CityStats>,
    pub time_series: Vec<TimeSeriesPoint>,
}

impl From<VisitWithGeolocation> for RecentVisit {
    fn from(visit: VisitWithGeolocation) -> Self {
        Self {
            ip: visit.ip,
            visited_at: visit.visited_at,
            geolocation: VisitGeolocation {
                country: visit.geolocation.country,
                country_code: visit.geolocation.country_code,
                city: visit.geolocation.city,
                region_name: visit.geolocation.region_name,
                lat: visit.geolocation.lat,
                lon: visit.geolocation.lon,
            },
        }
    }
}

impl From<DailyCount> for TimeSeriesPoint {
    fn from(count: DailyCount) -> Self {
        Self {
            date: count.date,
            count: count.count,
        }
    }
}

impl From<AnalyticsSnapshot> for AnalyticsResponse {
    fn from(snapshot: AnalyticsSnapshot) -> Self {
        Self {
            visit_count: snapshot.visit_count,
            recent_visits: snapshot.recent_visits.into_iter().map(Into::into).collect(),
            unique_countries: snapshot.unique_countries,
            unique_cities: snapshot.unique_cities,
            map_points: snapshot.geo.map_points,
            countries_stats: snapshot.geo.countries_stats,
            cities_stats: snapshot.geo.cities_stats,
            time_series: snapshot.time_series.into_iter().map(Into::into).collect(),
        }
    }
}
