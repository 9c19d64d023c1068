//! Geolocation record and the aggregate types derived from it.

use serde::{Deserialize, Serialize};

/// Coarse location for a visitor IP, in the provider's wire shape.
///
/// Deserialized straight from the external geolocation endpoint and cached
/// as-is. The same shape is used for the `Unknown` sentinel substituted when
/// resolution is skipped (private IPs) or fails (provider timeout or error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Geolocation {
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub region_name: String,
    pub city: String,
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub isp: String,
    pub org: String,
    #[serde(rename = "as")]
    pub asn: String,
    pub query: String,
}

impl Default for Geolocation {
    fn default() -> Self {
        Self {
            country: String::new(),
            country_code: String::new(),
            region: String::new(),
            region_name: String::new(),
            city: String::new(),
            zip: String::new(),
            lat: 0.0,
            lon: 0.0,
            timezone: String::new(),
            isp: String::new(),
            org: String::new(),
            asn: String::new(),
            query: String::new(),
        }
    }
}

impl Geolocation {
    /// The sentinel returned for private IPs and failed lookups.
    pub fn unknown(ip: &str) -> Self {
        Self {
            country: "Unknown".to_string(),
            country_code: "UN".to_string(),
            query: ip.to_string(),
            ..Self::default()
        }
    }

    /// Whether this record carries a usable location.
    ///
    /// Sentinel records and records without coordinates are excluded from
    /// map points and country/city rollups.
    pub fn is_resolvable(&self) -> bool {
        self.country != "Unknown" && self.lat != 0.0 && self.lon != 0.0
    }
}

/// A heat-map point: one distinct coordinate pair and its visit weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: u64,
}

/// Visit rollup for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryStats {
    pub country_code: String,
    pub country: String,
    pub count: u64,
    /// Integer-rounded share of resolvable visits.
    pub percentage: u32,
}

/// Visit rollup for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStats {
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub count: u64,
    pub lat: f64,
    pub lon: f64,
}

/// Derived visualization data for a set of resolved visits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GeoAnalytics {
    pub map_points: Vec<GeoPoint>,
    pub countries_stats: Vec<CountryStats>,
    pub cities_stats: Vec<CityStats>,
}
