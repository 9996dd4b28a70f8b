//! Core of the AccessMap accessibility widget.
//!
//! The crate owns the amenity data lifecycle: fetching amenities for the
//! current viewport, filtering them client-side, and keeping the map markers,
//! the amenity list and the filter controls consistent while loads complete
//! asynchronously. It also carries the report submission flow.
//!
//! Everything outside that lifecycle is a collaborator behind a trait:
//! [`MapSurface`], [`ListSink`] and [`ControlPanel`] for the host UI, and
//! [`AmenitySource`], [`ReportStore`], [`Geocoder`] and [`Geolocator`] for
//! the backends. HTTP implementations live in `accessmap-data`.

#![forbid(unsafe_code)]

pub mod amenity;
pub mod controller;
pub mod error;
pub mod filter;
pub mod list;
pub mod location;
pub mod marker;
pub mod panel;
pub mod report;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use amenity::{Accessibility, Amenity, Tags};
pub use controller::{FetchTicket, LoadOutcome, MapController, MapSettings, PanDirection};
pub use error::{AtlasError, SubmissionError};
pub use filter::{FilterCriteria, TagFilter};
pub use list::{ListEntry, ListSink, ListView};
pub use marker::{MapSurface, MarkerLayer, MarkerSpec, MarkerStyle, Popup};
pub use panel::{ControlPanel, Notice, NoticeLevel};
pub use report::{Report, ReportDraft, ReportError};
pub use source::{
    AmenityQuery, AmenitySource, GeolocationError, Geolocator, Geocoder, Place, ReportStore,
    SourceError,
};
