//! Client construction and transport error mapping shared by the adapters.

use std::time::Duration;

use accessmap_core::SourceError;
use reqwest::Client;
use thiserror::Error;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error raised when an adapter cannot build its HTTP client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The reqwest client rejected the configuration.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ClientBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ClientBuildError::HttpClient)
}

/// Convert a reqwest error to a `SourceError`.
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> SourceError {
    if error.is_timeout() {
        return SourceError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return SourceError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    SourceError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Join `base` and `path` without doubling the separator.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}
