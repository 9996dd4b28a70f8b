//! HTTP and platform adapters for the AccessMap widget.
//!
//! Responsibilities:
//! - Implement the backend collaborator traits of `accessmap-core` over HTTP.
//! - Own the wire formats of the amenity, report and geocoding services.
//!
//! Boundaries:
//! - No widget state or UI rules; those live in `accessmap-core`.
//! - Transport failures are mapped to `SourceError`, never panics.

#![forbid(unsafe_code)]

pub mod backend;
mod http;
pub mod locate;
pub mod nominatim;

pub use backend::{BackendConfig, DEFAULT_BACKEND_URL, DEFAULT_USER_AGENT, HttpBackend};
pub use http::{ClientBuildError, DEFAULT_TIMEOUT_SECS};
pub use locate::FixedGeolocator;
pub use nominatim::{DEFAULT_NOMINATIM_URL, NominatimConfig, NominatimGeocoder};
