//! Facade crate for the AccessMap widget.
//!
//! This crate re-exports the widget core and, behind the `http` feature, the
//! HTTP adapters for the amenity backend and the Nominatim geocoder.

#![forbid(unsafe_code)]

pub use accessmap_core::{
    Accessibility, Amenity, AmenityQuery, AmenitySource, AtlasError, ControlPanel, FetchTicket,
    FilterCriteria, GeolocationError, Geolocator, Geocoder, ListEntry, ListSink, LoadOutcome,
    MapController, MapSettings, MapSurface, MarkerSpec, MarkerStyle, Notice, NoticeLevel,
    PanDirection, Place, Popup, Report, ReportDraft, ReportError, ReportStore, SourceError,
    SubmissionError, TagFilter, filter, location,
};

#[cfg(feature = "test-support")]
pub use accessmap_core::test_support;

#[cfg(feature = "http")]
pub use accessmap_data::{
    BackendConfig, ClientBuildError, FixedGeolocator, HttpBackend, NominatimConfig,
    NominatimGeocoder,
};
