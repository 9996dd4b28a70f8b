//! Backend collaborators of the widget.
//!
//! The amenity and report endpoints, geocoding and geolocation are external
//! services. Each is abstracted behind a trait so the controller can be driven
//! by HTTP adapters in production and by in-memory stubs in tests.
//!
//! The traits are `?Send`: the widget runs on a single cooperative event loop
//! and never moves collaborator futures across threads.

mod error;

use async_trait::async_trait;
use geo::Coord;

use crate::amenity::Amenity;
use crate::report::Report;

pub use error::{GeolocationError, SourceError};

/// Amenity search radius in metres when none is configured.
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 1000;

/// Parameters of a single amenity request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmenityQuery {
    /// Viewport center.
    pub center: Coord<f64>,
    /// Search radius in metres.
    pub radius_m: u32,
}

/// A geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Matched position.
    pub position: Coord<f64>,
    /// Human-readable label shown in the search box.
    pub display_name: String,
}

/// Fetch amenities around a point.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use accessmap_core::{Amenity, AmenityQuery, AmenitySource, SourceError};
///
/// struct Empty;
///
/// #[async_trait(?Send)]
/// impl AmenitySource for Empty {
///     async fn amenities_near(&self, _query: &AmenityQuery) -> Result<Vec<Amenity>, SourceError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait AmenitySource {
    /// Return every amenity within `query.radius_m` of `query.center`.
    ///
    /// Implementations must map error payloads and non-sequence bodies to
    /// `Err`; an `Ok` value is always the complete result set.
    async fn amenities_near(&self, query: &AmenityQuery) -> Result<Vec<Amenity>, SourceError>;
}

/// Read and append accessibility reports.
#[async_trait(?Send)]
pub trait ReportStore {
    /// Return every stored report.
    async fn list_reports(&self) -> Result<Vec<Report>, SourceError>;

    /// Persist `report`.
    ///
    /// Returns `Ok(())` only when the backend confirms success; refusals are
    /// reported as [`SourceError::Rejected`].
    async fn submit_report(&self, report: &Report) -> Result<(), SourceError>;
}

/// Resolve free-text place queries.
#[async_trait(?Send)]
pub trait Geocoder {
    /// Return the first match for `query`, or `None`.
    async fn geocode(&self, query: &str) -> Result<Option<Place>, SourceError>;
}

/// Report the device position.
#[async_trait(?Send)]
pub trait Geolocator {
    /// Return the current position.
    async fn current_position(&self) -> Result<Coord<f64>, GeolocationError>;
}
