use thiserror::Error;

/// Errors raised by backend collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The request could not be delivered.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport description.
        message: String,
    },
    /// The request exceeded the client timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or a generic one.
        message: String,
    },
    /// The server answered successfully but reported an error payload.
    #[error("service reported an error: {message}")]
    Service {
        /// Server-supplied message.
        message: String,
    },
    /// The response body had an unexpected shape.
    #[error("failed to parse response: {message}")]
    Parse {
        /// Parser description.
        message: String,
    },
    /// A submission was refused by the backend.
    #[error("submission rejected: {message}")]
    Rejected {
        /// Server-supplied reason.
        message: String,
    },
}

/// Errors raised by a [`Geolocator`](super::Geolocator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The user refused the permission prompt.
    #[error("geolocation permission denied")]
    Denied,
    /// The platform could not determine a position.
    #[error("geolocation unavailable")]
    Unavailable,
}
