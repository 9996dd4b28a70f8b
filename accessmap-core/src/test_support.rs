//! Test-only, in-memory host collaborators and backend stubs used by unit
//! and behaviour tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use async_trait::async_trait;
use geo::Coord;

use crate::{
    Amenity, AmenityQuery, AmenitySource, ControlPanel, GeolocationError, Geolocator, Geocoder,
    ListEntry, ListSink, MapController, MapSettings, MapSurface, MarkerSpec, MarkerStyle, Notice,
    Place, Report, ReportStore, SourceError,
};

/// Controller wired to the recording collaborators.
pub type RecordingController = MapController<RecordingSurface, RecordingList, RecordingPanel>;

/// Build a [`RecordingController`] with default settings.
#[must_use]
pub fn recording_controller() -> RecordingController {
    MapController::new(
        MapSettings::default(),
        RecordingSurface::default(),
        RecordingList::default(),
        RecordingPanel::default(),
    )
}

/// Handle issued by [`RecordingSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceMarker(u64);

/// `MapSurface` that keeps drawn markers in memory.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    live: BTreeMap<u64, MarkerSpec>,
    added: usize,
    unknown_removals: usize,
    view: Option<(Coord<f64>, u8)>,
    pans: Vec<(i32, i32)>,
}

impl RecordingSurface {
    /// Live markers in drawing order.
    #[must_use]
    pub fn live_markers(&self) -> Vec<&MarkerSpec> {
        self.live.values().collect()
    }

    /// Live markers with exactly `style`.
    #[must_use]
    pub fn markers_with_style(&self, style: MarkerStyle) -> Vec<&MarkerSpec> {
        self.live.values().filter(|spec| spec.style == style).collect()
    }

    /// Live amenity markers of any accessibility.
    #[must_use]
    pub fn amenity_markers(&self) -> Vec<&MarkerSpec> {
        self.live
            .values()
            .filter(|spec| matches!(spec.style, MarkerStyle::Amenity(_)))
            .collect()
    }

    /// Live report markers.
    #[must_use]
    pub fn report_markers(&self) -> Vec<&MarkerSpec> {
        self.markers_with_style(MarkerStyle::Report)
    }

    /// Total markers ever drawn.
    #[must_use]
    pub const fn total_added(&self) -> usize {
        self.added
    }

    /// Removals of handles that were not live.
    #[must_use]
    pub const fn unknown_removals(&self) -> usize {
        self.unknown_removals
    }

    /// Last requested view.
    #[must_use]
    pub const fn view(&self) -> Option<(Coord<f64>, u8)> {
        self.view
    }

    /// Every pan offset in request order.
    #[must_use]
    pub fn pans(&self) -> &[(i32, i32)] {
        &self.pans
    }
}

impl MapSurface for RecordingSurface {
    type Marker = SurfaceMarker;

    fn add_marker(&mut self, marker: MarkerSpec) -> Self::Marker {
        self.next_id += 1;
        self.added += 1;
        self.live.insert(self.next_id, marker);
        SurfaceMarker(self.next_id)
    }

    fn remove_marker(&mut self, marker: Self::Marker) {
        if self.live.remove(&marker.0).is_none() {
            self.unknown_removals += 1;
        }
    }

    fn set_view(&mut self, center: Coord<f64>, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn pan_by(&mut self, dx: i32, dy: i32) {
        self.pans.push((dx, dy));
    }
}

/// `ListSink` that keeps the rendered rows as text.
#[derive(Debug, Default)]
pub struct RecordingList {
    rows: Vec<String>,
    empty_message: Option<String>,
    renders: usize,
}

impl RecordingList {
    /// Rows currently shown.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        self.rows.clone()
    }

    /// The empty-state message, when shown.
    #[must_use]
    pub fn empty_message(&self) -> Option<&str> {
        self.empty_message.as_deref()
    }

    /// Number of times the list was redrawn.
    #[must_use]
    pub const fn renders(&self) -> usize {
        self.renders
    }
}

impl ListSink for RecordingList {
    fn render(&mut self, entries: &[ListEntry]) {
        self.renders += 1;
        self.empty_message = None;
        self.rows = entries.iter().map(ToString::to_string).collect();
    }

    fn clear(&mut self, message: &str) {
        self.renders += 1;
        self.rows.clear();
        self.empty_message = Some(message.to_owned());
    }
}

/// `ControlPanel` that records every change.
#[derive(Debug, Default)]
pub struct RecordingPanel {
    loading: bool,
    loading_changes: usize,
    categories: Vec<String>,
    notices: Vec<Notice>,
}

impl RecordingPanel {
    /// Current loading state.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of loading-state changes requested.
    #[must_use]
    pub const fn loading_changes(&self) -> usize {
        self.loading_changes
    }

    /// Current category options.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Every notice in order.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Message of the most recent notice.
    #[must_use]
    pub fn last_notice(&self) -> Option<&str> {
        self.notices.last().map(|notice| notice.message.as_str())
    }
}

impl ControlPanel for RecordingPanel {
    fn set_loading(&mut self, loading: bool) {
        self.loading_changes += 1;
        self.loading = loading;
    }

    fn set_category_options(&mut self, categories: &[String]) {
        self.categories = categories.to_vec();
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// `AmenitySource` returning a configurable response.
#[derive(Debug)]
pub struct StubAmenitySource {
    response: RefCell<Result<Vec<Amenity>, SourceError>>,
    queries: RefCell<Vec<AmenityQuery>>,
}

impl StubAmenitySource {
    /// Respond with `amenities` to every query.
    #[must_use]
    pub const fn with_amenities(amenities: Vec<Amenity>) -> Self {
        Self::with_response(Ok(amenities))
    }

    /// Respond with `error` to every query.
    #[must_use]
    pub const fn with_error(error: SourceError) -> Self {
        Self::with_response(Err(error))
    }

    const fn with_response(response: Result<Vec<Amenity>, SourceError>) -> Self {
        Self {
            response: RefCell::new(response),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Replace the response for subsequent queries.
    pub fn respond_with(&self, response: Result<Vec<Amenity>, SourceError>) {
        *self.response.borrow_mut() = response;
    }

    /// Every query received, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<AmenityQuery> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl AmenitySource for StubAmenitySource {
    async fn amenities_near(&self, query: &AmenityQuery) -> Result<Vec<Amenity>, SourceError> {
        self.queries.borrow_mut().push(*query);
        self.response.borrow().clone()
    }
}

/// `ReportStore` backed by a vector.
#[derive(Debug, Default)]
pub struct StubReportStore {
    stored: RefCell<Vec<Report>>,
    list_error: Option<SourceError>,
    submit_error: Option<SourceError>,
}

impl StubReportStore {
    /// A store holding `reports` and accepting submissions.
    #[must_use]
    pub fn with_reports(reports: Vec<Report>) -> Self {
        Self {
            stored: RefCell::new(reports),
            ..Self::default()
        }
    }

    /// A store refusing every submission with `error`.
    #[must_use]
    pub fn rejecting(error: SourceError) -> Self {
        Self {
            submit_error: Some(error),
            ..Self::default()
        }
    }

    /// A store failing every listing with `error`.
    #[must_use]
    pub fn unavailable(error: SourceError) -> Self {
        Self {
            list_error: Some(error),
            ..Self::default()
        }
    }

    /// Reports currently stored.
    #[must_use]
    pub fn stored(&self) -> Vec<Report> {
        self.stored.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ReportStore for StubReportStore {
    async fn list_reports(&self) -> Result<Vec<Report>, SourceError> {
        match &self.list_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.stored.borrow().clone()),
        }
    }

    async fn submit_report(&self, report: &Report) -> Result<(), SourceError> {
        if let Some(error) = &self.submit_error {
            return Err(error.clone());
        }
        self.stored.borrow_mut().push(report.clone());
        Ok(())
    }
}

/// `Geocoder` returning a fixed answer.
#[derive(Debug, Clone)]
pub struct StubGeocoder {
    response: Result<Option<Place>, SourceError>,
}

impl StubGeocoder {
    /// Resolve every query to `place`.
    #[must_use]
    pub const fn found(place: Place) -> Self {
        Self {
            response: Ok(Some(place)),
        }
    }

    /// Resolve every query to nothing.
    #[must_use]
    pub const fn not_found() -> Self {
        Self { response: Ok(None) }
    }

    /// Fail every query with `error`.
    #[must_use]
    pub const fn failing(error: SourceError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[async_trait(?Send)]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Option<Place>, SourceError> {
        self.response.clone()
    }
}

/// `Geolocator` returning a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct StubGeolocator(pub Result<Coord<f64>, GeolocationError>);

#[async_trait(?Send)]
impl Geolocator for StubGeolocator {
    async fn current_position(&self) -> Result<Coord<f64>, GeolocationError> {
        self.0
    }
}
