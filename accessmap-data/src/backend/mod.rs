//! HTTP adapter for the amenity and report backend.
//!
//! [`HttpBackend`] implements both [`AmenitySource`] and [`ReportStore`]
//! against the widget's own server:
//!
//! - `GET {base}/api/amenities?lat=..&lon=..&radius=..`
//! - `GET {base}/api/reports`
//! - `POST {base}/api/reports`
//!
//! # Example
//!
//! ```no_run
//! use accessmap_core::{AmenityQuery, AmenitySource, location::from_lat_lon};
//! use accessmap_data::backend::{BackendConfig, HttpBackend};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackendConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10));
//! let backend = HttpBackend::with_config(config)?;
//! let query = AmenityQuery { center: from_lat_lon(-1.9434, 30.1288), radius_m: 1000 };
//! let amenities = backend.amenities_near(&query).await?;
//! # Ok(())
//! # }
//! ```

mod wire;

use std::time::Duration;

use accessmap_core::{Amenity, AmenityQuery, AmenitySource, Report, ReportStore, SourceError};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};

use crate::http::{ClientBuildError, DEFAULT_TIMEOUT_SECS, build_client, convert_reqwest_error, endpoint};

pub use wire::{
    AmenityRecord, INVALID_RESPONSE_MESSAGE, LatLon, ReportRecord, SubmitResponse,
    UNKNOWN_ERROR_MESSAGE, parse_amenities, parse_reports, parse_submission,
};

/// Default user agent for backend requests.
pub const DEFAULT_USER_AGENT: &str = "accessmap/0.1";

/// Base URL used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

const AMENITIES_PATH: &str = "/api/amenities";
const REPORTS_PATH: &str = "/api/reports";

/// Configuration for [`HttpBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl BackendConfig {
    /// Create a configuration for the backend at `base_url`.
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

/// Amenity source and report store backed by the widget's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Create a backend client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(BackendConfig::new(base_url))
    }

    /// Create a backend client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: BackendConfig) -> Result<Self, ClientBuildError> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    /// The configuration in force.
    #[must_use]
    pub const fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn amenities_url(&self) -> String {
        endpoint(&self.config.base_url, AMENITIES_PATH)
    }

    fn reports_url(&self) -> String {
        endpoint(&self.config.base_url, REPORTS_PATH)
    }

    /// Read status and body, mapping transport failures.
    async fn read(&self, response: Response, url: &str) -> Result<(u16, String), SourceError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, url, self.config.timeout))?;
        Ok((status, body))
    }
}

#[async_trait(?Send)]
impl AmenitySource for HttpBackend {
    async fn amenities_near(&self, query: &AmenityQuery) -> Result<Vec<Amenity>, SourceError> {
        let url = self.amenities_url();
        debug!(
            "fetching amenities from {url} at ({}, {}) within {} m",
            query.center.y, query.center.x, query.radius_m
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", query.center.y.to_string()),
                ("lon", query.center.x.to_string()),
                ("radius", query.radius_m.to_string()),
            ])
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.timeout))?;
        let (status, body) = self.read(response, &url).await?;
        parse_amenities(&url, status, &body)
    }
}

#[async_trait(?Send)]
impl ReportStore for HttpBackend {
    async fn list_reports(&self) -> Result<Vec<Report>, SourceError> {
        let url = self.reports_url();
        debug!("fetching reports from {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.timeout))?;
        let (status, body) = self.read(response, &url).await?;
        parse_reports(&url, status, &body)
    }

    async fn submit_report(&self, report: &Report) -> Result<(), SourceError> {
        let url = self.reports_url();
        debug!("submitting {} report to {url}", report.issue_type);
        let response = self
            .client
            .post(&url)
            .json(&ReportRecord::from(report))
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.timeout))?;
        let (_, body) = self.read(response, &url).await?;
        parse_submission(&body)
    }
}
