//! ip-api.com geolocation provider.

use super::{GeolocationProvider, ProviderError};
use crate::domain::entities::Geolocation;
use async_trait::async_trait;
use std::time::Duration;

/// The response fields requested from the provider.
///
/// Matches the wire shape of [`Geolocation`] exactly.
const FIELDS: &str = "country,countryCode,region,regionName,city,zip,lat,lon,timezone,isp,org,as,query";

/// Client for the ip-api.com JSON endpoint.
pub struct IpApiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl IpApiProvider {
    /// Builds a provider client with a per-request timeout.
    ///
    /// `base_url` is the endpoint prefix without a trailing slash, e.g.
    /// `http://ip-api.com/json`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeolocationProvider for IpApiProvider {
    async fn fetch(&self, ip: &str) -> Result<Geolocation, ProviderError> {
        let url = format!("{}/{}?fields={}", self.base_url, ip, FIELDS);

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let geo: Geolocation = serde_json::from_str(&body)?;

        Ok(geo)
    }
}
