//! Test doubles and runners shared by the CLI unit and behaviour tests.

use std::future::Future;

use accessmap_core::test_support::{
    StubAmenitySource, StubGeocoder, StubGeolocator, StubReportStore,
};
use accessmap_core::{
    Amenity, AmenityQuery, AmenitySource, GeolocationError, MapSettings, Report, ReportStore,
    SourceError,
};
use async_trait::async_trait;

use super::*;

/// Amenity source and report store in one value, as the HTTP backend is.
#[derive(Debug)]
pub(super) struct StubBackend {
    pub(super) amenities: StubAmenitySource,
    pub(super) reports: StubReportStore,
}

impl StubBackend {
    pub(super) fn new(amenities: Vec<Amenity>) -> Self {
        Self {
            amenities: StubAmenitySource::with_amenities(amenities),
            reports: StubReportStore::default(),
        }
    }
}

#[async_trait(?Send)]
impl AmenitySource for StubBackend {
    async fn amenities_near(&self, query: &AmenityQuery) -> Result<Vec<Amenity>, SourceError> {
        self.amenities.amenities_near(query).await
    }
}

#[async_trait(?Send)]
impl ReportStore for StubBackend {
    async fn list_reports(&self) -> Result<Vec<Report>, SourceError> {
        self.reports.list_reports().await
    }

    async fn submit_report(&self, report: &Report) -> Result<(), SourceError> {
        self.reports.submit_report(report).await
    }
}

pub(super) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime should build")
        .block_on(future)
}

pub(super) fn denied() -> StubGeolocator {
    StubGeolocator(Err(GeolocationError::Denied))
}

/// Run `script` through a fresh session and return everything it printed.
pub(super) fn run_script(
    backend: &StubBackend,
    geocoder: &StubGeocoder,
    geolocator: &StubGeolocator,
    script: &str,
) -> String {
    let mut session = Session::new(MapSettings::default(), backend, geocoder, geolocator);
    let mut out = Vec::new();
    block_on(session.run(script.as_bytes(), &mut out)).expect("in-memory I/O succeeds");
    String::from_utf8(out).expect("transcript is UTF-8")
}
