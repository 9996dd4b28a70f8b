//! Failures of the widget operations.
//!
//! Every variant is returned only after the controller has restored a usable
//! idle state and raised the matching notice. Callers may log or ignore them.

use thiserror::Error;

use crate::report::ReportError;
use crate::source::{GeolocationError, SourceError};

/// Errors returned by [`MapController`](crate::MapController) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AtlasError {
    /// Coordinates were rejected before any network call.
    #[error("invalid location ({lat}, {lon})")]
    InvalidLocation {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },
    /// The amenity fetch failed; the display fell back to empty.
    #[error("failed to fetch amenities: {source}")]
    FetchFailure {
        /// Underlying transport or payload error.
        #[source]
        source: SourceError,
    },
    /// The report was invalid or refused; the form stays open.
    #[error("failed to submit report: {reason}")]
    SubmissionFailure {
        /// Why the submission failed.
        #[source]
        reason: SubmissionError,
    },
    /// Stored reports could not be loaded.
    #[error("failed to load reports: {source}")]
    ReportListFailure {
        /// Underlying transport or payload error.
        #[source]
        source: SourceError,
    },
    /// Geocoding found no match.
    #[error("no location found for {query:?}")]
    SearchNotFound {
        /// Trimmed query text.
        query: String,
    },
    /// Geocoding failed in transport.
    #[error("location search failed: {source}")]
    SearchFailure {
        /// Underlying transport or payload error.
        #[source]
        source: SourceError,
    },
    /// The device position is unavailable.
    #[error("geolocation failed: {source}")]
    GeolocationDenied {
        /// Platform-reported reason.
        #[source]
        source: GeolocationError,
    },
}

/// Why a report submission failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    /// The form did not describe a valid report.
    #[error(transparent)]
    Invalid(#[from] ReportError),
    /// The backend refused or could not be reached.
    #[error(transparent)]
    Backend(#[from] SourceError),
}
