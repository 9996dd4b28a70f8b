//! The amenity sync controller and the widget's produced UI surface.
//!
//! [`MapController`] is the single owner of all mutable widget state: the
//! canonical amenity set, the active filter criteria, the marker sets, the
//! "amenities loaded" flag, the report form and the request token. The host
//! calls one method per UI event and awaits it on its event loop.
//!
//! Amenity loads are split into [`MapController::begin_amenity_load`] and
//! [`MapController::complete_amenity_load`] so a host may keep several
//! fetches in flight. Only the most recently issued ticket is applied;
//! completions of older tickets are discarded.

mod settings;

use std::fmt;

use geo::Coord;
use log::{debug, info, warn};

use crate::amenity::Amenity;
use crate::error::{AtlasError, SubmissionError};
use crate::filter::{self, FilterCriteria, TagFilter};
use crate::list::{ListSink, ListView};
use crate::location;
use crate::marker::{MapSurface, MarkerLayer};
use crate::panel::{
    ControlPanel, FETCH_FAILED_NOTICE, GEOLOCATION_DENIED_NOTICE, INVALID_LOCATION_NOTICE,
    NOT_FOUND_NOTICE, Notice, REPORT_SUBMITTED_NOTICE, REPORTS_UNAVAILABLE_NOTICE,
    SEARCH_FAILED_NOTICE,
};
use crate::report::{Report, ReportDraft};
use crate::source::{
    AmenityQuery, AmenitySource, Geocoder, Geolocator, Place, ReportStore, SourceError,
};

pub use settings::{MapSettings, PanDirection, ParsePanDirectionError};

/// Notice shown when a submission failed without a backend message.
pub const SUBMIT_FAILED_NOTICE: &str = "Error submitting report";

/// Proof that an amenity load was started.
///
/// Pass it back to [`MapController::complete_amenity_load`] together with
/// the result of running [`FetchTicket::query`] against an
/// [`AmenitySource`].
#[derive(Debug, PartialEq)]
pub struct FetchTicket {
    token: u64,
    query: AmenityQuery,
}

impl FetchTicket {
    /// The request to issue.
    #[must_use]
    pub const fn query(&self) -> &AmenityQuery {
        &self.query
    }

    /// Sequence number of this load.
    #[must_use]
    pub const fn token(&self) -> u64 {
        self.token
    }
}

/// How a completed amenity load affected the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result replaced the canonical set.
    Applied {
        /// Size of the new canonical set.
        total: usize,
        /// Rows shown after filtering.
        shown: usize,
    },
    /// A newer load was issued; the result was discarded.
    Stale,
}

/// Single owner of the widget state.
pub struct MapController<S: MapSurface, L, P> {
    settings: MapSettings,
    viewport: Coord<f64>,
    canonical: Vec<Amenity>,
    criteria: FilterCriteria,
    loaded: bool,
    loading: bool,
    latest_token: u64,
    markers: MarkerLayer<S>,
    list: ListView<L>,
    panel: P,
    reports: Vec<Report>,
    report_form: Option<ReportDraft>,
}

impl<S, L, P> fmt::Debug for MapController<S, L, P>
where
    S: MapSurface + fmt::Debug,
    L: fmt::Debug,
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapController")
            .field("settings", &self.settings)
            .field("viewport", &self.viewport)
            .field("canonical", &self.canonical.len())
            .field("criteria", &self.criteria)
            .field("loaded", &self.loaded)
            .field("loading", &self.loading)
            .field("latest_token", &self.latest_token)
            .field("markers", &self.markers)
            .field("list", &self.list)
            .field("panel", &self.panel)
            .field("reports", &self.reports.len())
            .field("report_form", &self.report_form)
            .finish()
    }
}

impl<S, L, P> MapController<S, L, P>
where
    S: MapSurface,
    L: ListSink,
    P: ControlPanel,
{
    /// Bind the widget to its host collaborators and show the initial view.
    pub fn new(settings: MapSettings, mut surface: S, list: L, panel: P) -> Self {
        surface.set_view(settings.initial_center, settings.initial_zoom);
        Self {
            settings,
            viewport: settings.initial_center,
            canonical: Vec::new(),
            criteria: FilterCriteria::default(),
            loaded: false,
            loading: false,
            latest_token: 0,
            markers: MarkerLayer::new(surface, settings.focus_zoom),
            list: ListView::new(list),
            panel,
            reports: Vec::new(),
            report_form: None,
        }
    }

    // --- amenity sync ---

    /// Start loading amenities around `center`.
    ///
    /// Enters the loading state and returns the ticket describing the request
    /// to issue. Any earlier ticket still in flight becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidLocation`] for a non-finite or
    /// out-of-range center; no request should be issued in that case.
    pub fn begin_amenity_load(&mut self, center: Coord<f64>) -> Result<FetchTicket, AtlasError> {
        if !location::is_valid_center(center) {
            warn!("rejecting amenity load for invalid center {center:?}");
            self.panel.notify(Notice::error(INVALID_LOCATION_NOTICE));
            return Err(AtlasError::InvalidLocation {
                lat: center.y,
                lon: center.x,
            });
        }
        self.latest_token = self.latest_token.wrapping_add(1);
        self.set_loading(true);
        Ok(FetchTicket {
            token: self.latest_token,
            query: AmenityQuery {
                center,
                radius_m: self.settings.search_radius_m,
            },
        })
    }

    /// Apply the result of the request described by `ticket`.
    ///
    /// A failed request clears the canonical set and renders an empty
    /// display, so markers from an earlier load never outlive a failed
    /// refresh.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::FetchFailure`] after falling back to the empty
    /// display.
    pub fn complete_amenity_load(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Amenity>, SourceError>,
    ) -> Result<LoadOutcome, AtlasError> {
        if ticket.token != self.latest_token {
            debug!(
                "discarding amenity response {} superseded by {}",
                ticket.token, self.latest_token
            );
            return Ok(LoadOutcome::Stale);
        }
        self.set_loading(false);
        match result {
            Ok(amenities) => {
                self.canonical = amenities;
                self.loaded = true;
                self.panel
                    .set_category_options(&filter::category_options(&self.canonical));
                let shown = self.render();
                info!(
                    "loaded {} amenities near {:?}, showing {shown}",
                    self.canonical.len(),
                    ticket.query.center
                );
                Ok(LoadOutcome::Applied {
                    total: self.canonical.len(),
                    shown,
                })
            }
            Err(source) => {
                warn!("amenity fetch failed, showing empty results: {source}");
                self.canonical.clear();
                self.render();
                self.panel.notify(Notice::error(FETCH_FAILED_NOTICE));
                Err(AtlasError::FetchFailure { source })
            }
        }
    }

    /// Load amenities around `center` and return the canonical count.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidLocation`] without contacting `source`,
    /// or [`AtlasError::FetchFailure`] after the empty fallback.
    pub async fn load_amenities<A>(
        &mut self,
        source: &A,
        center: Coord<f64>,
    ) -> Result<usize, AtlasError>
    where
        A: AmenitySource + ?Sized,
    {
        let ticket = self.begin_amenity_load(center)?;
        let result = source.amenities_near(ticket.query()).await;
        match self.complete_amenity_load(ticket, result)? {
            LoadOutcome::Applied { total, .. } => Ok(total),
            LoadOutcome::Stale => Ok(self.canonical.len()),
        }
    }

    /// The load trigger: load amenities around the current viewport center.
    ///
    /// # Errors
    ///
    /// See [`MapController::load_amenities`].
    pub async fn refresh_current_view<A>(&mut self, source: &A) -> Result<usize, AtlasError>
    where
        A: AmenitySource + ?Sized,
    {
        self.load_amenities(source, self.viewport).await
    }

    /// Record a viewport-settle event.
    ///
    /// Once amenities have loaded successfully, every settle starts a new
    /// load for the new center and returns its ticket. Before that, viewport
    /// moves only update the recorded center.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidLocation`] when an auto-refresh was due
    /// but the center is unusable.
    pub fn viewport_settled(
        &mut self,
        center: Coord<f64>,
    ) -> Result<Option<FetchTicket>, AtlasError> {
        self.viewport = center;
        if !self.loaded {
            return Ok(None);
        }
        self.begin_amenity_load(center).map(Some)
    }

    /// Record a viewport-settle event and run any auto-refresh it triggers.
    ///
    /// Returns the canonical count when a refresh ran.
    ///
    /// # Errors
    ///
    /// See [`MapController::load_amenities`].
    pub async fn follow_viewport<A>(
        &mut self,
        source: &A,
        center: Coord<f64>,
    ) -> Result<Option<usize>, AtlasError>
    where
        A: AmenitySource + ?Sized,
    {
        let Some(ticket) = self.viewport_settled(center)? else {
            return Ok(None);
        };
        let result = source.amenities_near(ticket.query()).await;
        match self.complete_amenity_load(ticket, result)? {
            LoadOutcome::Applied { total, .. } => Ok(Some(total)),
            LoadOutcome::Stale => Ok(None),
        }
    }

    // --- filters ---

    /// Replace all filter criteria and re-render; returns the rows shown.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> usize {
        self.criteria = criteria;
        self.render()
    }

    /// Change the accessibility control; returns the rows shown.
    pub fn set_wheelchair_filter(&mut self, wheelchair: TagFilter) -> usize {
        self.criteria.wheelchair = wheelchair;
        self.render()
    }

    /// Change the category control; returns the rows shown.
    pub fn set_category_filter(&mut self, category: TagFilter) -> usize {
        self.criteria.category = category;
        self.render()
    }

    /// Change the free-text control; returns the rows shown.
    pub fn set_name_query(&mut self, query: impl Into<String>) -> usize {
        self.criteria.name_query = query.into();
        self.render()
    }

    /// The filtered amenities, derived from the canonical set.
    #[must_use]
    pub fn filtered_amenities(&self) -> Vec<Amenity> {
        filter::apply(&self.canonical, &self.criteria)
    }

    /// Re-center on the amenity shown in list row `index`.
    ///
    /// Returns `false` when the row does not exist or cannot be placed.
    pub fn select_amenity(&mut self, index: usize) -> bool {
        let Some(position) = self.list.entries().get(index).and_then(|entry| entry.position)
        else {
            return false;
        };
        if !self.markers.focus(position) {
            return false;
        }
        self.viewport = position;
        true
    }

    /// Re-center on the `index`-th drawn amenity marker, for hosts that
    /// report marker clicks.
    ///
    /// Returns `false` when no such marker exists.
    pub fn select_marker(&mut self, index: usize) -> bool {
        let Some(position) = self.markers.focus_amenity_marker(index) else {
            return false;
        };
        self.viewport = position;
        true
    }

    // --- map controls ---

    /// Pan the map by one step.
    pub fn pan(&mut self, direction: PanDirection) {
        let (dx, dy) = direction.offset(self.settings.pan_step_px);
        self.markers.surface_mut().pan_by(dx, dy);
    }

    /// Geocode `query` and re-center on the first match.
    ///
    /// Blank queries are ignored and return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::SearchNotFound`] when nothing matched and
    /// [`AtlasError::SearchFailure`] when the geocoder failed; both leave the
    /// view unchanged.
    pub async fn search<G>(&mut self, geocoder: &G, query: &str) -> Result<Option<Place>, AtlasError>
    where
        G: Geocoder + ?Sized,
    {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        self.set_loading(true);
        let result = geocoder.geocode(trimmed).await;
        self.set_loading(false);
        match result {
            Ok(Some(place)) => {
                self.markers
                    .surface_mut()
                    .set_view(place.position, self.settings.search_zoom);
                self.viewport = place.position;
                Ok(Some(place))
            }
            Ok(None) => {
                self.panel.notify(Notice::error(NOT_FOUND_NOTICE));
                Err(AtlasError::SearchNotFound {
                    query: trimmed.to_owned(),
                })
            }
            Err(source) => {
                warn!("geocoding {trimmed:?} failed: {source}");
                self.panel.notify(Notice::error(SEARCH_FAILED_NOTICE));
                Err(AtlasError::SearchFailure { source })
            }
        }
    }

    /// Mark the user's position and re-center on it.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GeolocationDenied`] when the position is
    /// unavailable; nothing else changes.
    pub async fn locate<G>(&mut self, geolocator: &G) -> Result<Coord<f64>, AtlasError>
    where
        G: Geolocator + ?Sized,
    {
        match geolocator.current_position().await {
            Ok(position) => {
                self.markers.place_user(position);
                self.markers
                    .surface_mut()
                    .set_view(position, self.settings.locate_zoom);
                self.viewport = position;
                Ok(position)
            }
            Err(source) => {
                self.panel.notify(Notice::error(GEOLOCATION_DENIED_NOTICE));
                Err(AtlasError::GeolocationDenied { source })
            }
        }
    }

    // --- reports ---

    /// Draw a marker for every stored report; returns how many were added.
    ///
    /// Runs independently of the amenity-loaded flag.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::ReportListFailure`] when the store failed.
    pub async fn load_reports<R>(&mut self, store: &R) -> Result<usize, AtlasError>
    where
        R: ReportStore + ?Sized,
    {
        match store.list_reports().await {
            Ok(reports) => {
                let count = reports.len();
                for report in reports {
                    self.markers.add_report(&report);
                    self.reports.push(report);
                }
                Ok(count)
            }
            Err(source) => {
                warn!("failed to load existing reports: {source}");
                self.panel.notify(Notice::error(REPORTS_UNAVAILABLE_NOTICE));
                Err(AtlasError::ReportListFailure { source })
            }
        }
    }

    /// Open the report form at the current viewport center.
    pub fn open_report_form(&mut self) -> &mut ReportDraft {
        self.report_form.insert(ReportDraft::at(self.viewport))
    }

    /// Close and reset the report form.
    pub fn cancel_report_form(&mut self) {
        self.report_form = None;
    }

    /// The open report form, if any.
    #[must_use]
    pub const fn report_form(&self) -> Option<&ReportDraft> {
        self.report_form.as_ref()
    }

    /// Submit `draft` to `store`.
    ///
    /// On confirmed success a report marker is drawn immediately and the form
    /// closes. On failure the form stays open holding `draft`.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::SubmissionFailure`] when the draft is invalid or
    /// the backend did not confirm success.
    pub async fn submit_report<R>(&mut self, store: &R, draft: ReportDraft) -> Result<(), AtlasError>
    where
        R: ReportStore + ?Sized,
    {
        let report = match draft.to_report() {
            Ok(report) => report,
            Err(err) => {
                self.panel.notify(Notice::error(format!("Error: {err}")));
                self.report_form = Some(draft);
                return Err(AtlasError::SubmissionFailure { reason: err.into() });
            }
        };
        match store.submit_report(&report).await {
            Ok(()) => {
                self.panel.notify(Notice::info(REPORT_SUBMITTED_NOTICE));
                self.report_form = None;
                self.markers.add_report(&report);
                self.reports.push(report);
                Ok(())
            }
            Err(source) => {
                warn!("report submission failed: {source}");
                self.panel
                    .notify(Notice::error(submission_notice(&source)));
                self.report_form = Some(draft);
                Err(AtlasError::SubmissionFailure {
                    reason: SubmissionError::Backend(source),
                })
            }
        }
    }

    // --- state ---

    /// The canonical, unfiltered amenity set.
    #[must_use]
    pub fn canonical_amenities(&self) -> &[Amenity] {
        &self.canonical
    }

    /// The active filter criteria.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Return `true` once a load has succeeded; gates auto-refresh.
    #[must_use]
    pub const fn amenities_loaded(&self) -> bool {
        self.loaded
    }

    /// Return `true` while a load or search is pending.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Most recently recorded viewport center.
    #[must_use]
    pub const fn viewport(&self) -> Coord<f64> {
        self.viewport
    }

    /// Reports confirmed or loaded this session.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// The marker layer.
    #[must_use]
    pub const fn markers(&self) -> &MarkerLayer<S> {
        &self.markers
    }

    /// The list view.
    #[must_use]
    pub const fn list(&self) -> &ListView<L> {
        &self.list
    }

    /// The control panel.
    #[must_use]
    pub const fn panel(&self) -> &P {
        &self.panel
    }

    /// The settings in force.
    #[must_use]
    pub const fn settings(&self) -> &MapSettings {
        &self.settings
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.panel.set_loading(loading);
    }

    fn render(&mut self) -> usize {
        let filtered = filter::apply(&self.canonical, &self.criteria);
        self.markers.render_amenities(&filtered);
        self.list.render(&filtered)
    }
}

fn submission_notice(error: &SourceError) -> String {
    match error {
        SourceError::Rejected { message } | SourceError::Service { message } => {
            format!("Error: {message}")
        }
        _ => SUBMIT_FAILED_NOTICE.to_owned(),
    }
}
