//! Outbound geolocation provider integration.
//!
//! The provider is the only fallible dependency of the resolver; its errors
//! are typed here but never escape the resolver, which degrades to the
//! Unknown sentinel instead.

mod ip_api;

pub use ip_api::IpApiProvider;

use crate::domain::entities::Geolocation;
use async_trait::async_trait;

/// Errors from the external geolocation endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("geolocation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geolocation response malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A client for a third-party IP geolocation endpoint.
///
/// One GET per lookup, bounded by the client's request timeout.
///
/// # Implementations
///
/// - [`IpApiProvider`] - ip-api.com JSON endpoint
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Looks up the location for a public IP address.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on timeout, connection failure, non-success
    /// status, or a malformed response body.
    async fn fetch(&self, ip: &str) -> Result<Geolocation, ProviderError>;
}
