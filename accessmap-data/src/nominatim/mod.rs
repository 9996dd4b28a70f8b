//! Place search through a Nominatim instance.

mod wire;

use std::time::Duration;

use accessmap_core::{Geocoder, Place, SourceError};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::backend::DEFAULT_USER_AGENT;
use crate::http::{ClientBuildError, DEFAULT_TIMEOUT_SECS, build_client, convert_reqwest_error, endpoint};

pub use wire::{SearchHit, parse_search};

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

const SEARCH_PATH: &str = "/search";

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim instance.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string; the public instance refuses anonymous clients.
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration for the instance at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// [`Geocoder`] backed by the Nominatim search API.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    config: NominatimConfig,
}

impl NominatimGeocoder {
    /// Create a geocoder for the public instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(NominatimConfig::default())
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, ClientBuildError> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    fn search_url(&self) -> String {
        endpoint(&self.config.base_url, SEARCH_PATH)
    }
}

#[async_trait(?Send)]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Place>, SourceError> {
        let url = self.search_url();
        debug!("geocoding {query:?} via {url}");
        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.timeout))?;
        parse_search(&url, status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_to_public_instance() {
        let geocoder = NominatimGeocoder::new().expect("geocoder should build");
        assert_eq!(
            geocoder.search_url(),
            "https://nominatim.openstreetmap.org/search"
        );
    }

    #[rstest]
    fn honours_custom_instance() {
        let config = NominatimConfig::new("http://geocoder.internal:8080/")
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("accessmap-test/0.1");
        let geocoder = NominatimGeocoder::with_config(config).expect("geocoder should build");

        assert_eq!(geocoder.search_url(), "http://geocoder.internal:8080/search");
    }
}
