//! Marker lifecycle on the host map.
//!
//! [`MarkerLayer`] is the only owner of marker handles. Amenity markers are
//! replaced wholesale on every render; report markers only ever grow; the
//! user-location marker occupies a single slot.

use std::fmt;

use geo::Coord;
use log::debug;

use crate::amenity::Amenity;
use crate::location;
use crate::report::Report;

/// Title used for amenities without a `name` tag.
pub const UNNAMED_VENUE: &str = "Unnamed Venue";
/// Title of report popups.
pub const REPORT_TITLE: &str = "Accessibility Issue";
/// Title of the user-location popup.
pub const USER_TITLE: &str = "You are here";

/// Visual indicator of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Amenity dot coloured by accessibility.
    Amenity(crate::Accessibility),
    /// Warning sign for a reported issue.
    Report,
    /// The user's own position.
    User,
}

/// Details revealed when the user interacts with a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Bold first line.
    pub title: String,
    /// Remaining lines in display order.
    pub lines: Vec<String>,
}

/// Everything the host needs to draw one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Marker position.
    pub position: Coord<f64>,
    /// Visual indicator.
    pub style: MarkerStyle,
    /// Interaction details.
    pub popup: Popup,
}

impl MarkerSpec {
    /// Describe the marker for an amenity placed at `position`.
    #[must_use]
    pub fn for_amenity(amenity: &Amenity, position: Coord<f64>) -> Self {
        Self {
            position,
            style: MarkerStyle::Amenity(amenity.accessibility()),
            popup: Popup {
                title: amenity.name().unwrap_or(UNNAMED_VENUE).to_owned(),
                lines: vec![
                    format!("Type: {}", amenity.category()),
                    format!("Wheelchair: {}", amenity.wheelchair()),
                ],
            },
        }
    }

    /// Describe the marker for a submitted or stored report.
    #[must_use]
    pub fn for_report(report: &Report) -> Self {
        let mut lines = vec![format!("Type: {}", report.issue_type)];
        if let Some(description) = report.description.as_deref() {
            lines.push(format!("Details: {description}"));
        }
        Self {
            position: report.position,
            style: MarkerStyle::Report,
            popup: Popup {
                title: REPORT_TITLE.to_owned(),
                lines,
            },
        }
    }

    /// Describe the user-location marker.
    #[must_use]
    pub fn for_user(position: Coord<f64>) -> Self {
        Self {
            position,
            style: MarkerStyle::User,
            popup: Popup {
                title: USER_TITLE.to_owned(),
                lines: Vec::new(),
            },
        }
    }
}

/// Drawing primitives of the host map widget.
///
/// Implementations return an opaque handle for every marker they draw and
/// receive it back exactly once for removal.
pub trait MapSurface {
    /// Handle identifying a drawn marker.
    type Marker;

    /// Draw a marker and return its handle.
    fn add_marker(&mut self, marker: MarkerSpec) -> Self::Marker;

    /// Erase a previously drawn marker.
    fn remove_marker(&mut self, marker: Self::Marker);

    /// Re-center the viewport at the given zoom level.
    fn set_view(&mut self, center: Coord<f64>, zoom: u8);

    /// Shift the viewport by a screen offset in pixels.
    fn pan_by(&mut self, dx: i32, dy: i32);
}

struct PlacedMarker<M> {
    handle: M,
    position: Coord<f64>,
}

/// Owner of every marker currently drawn on a [`MapSurface`].
pub struct MarkerLayer<S: MapSurface> {
    surface: S,
    amenities: Vec<PlacedMarker<S::Marker>>,
    reports: Vec<S::Marker>,
    user: Option<S::Marker>,
    focus_zoom: u8,
}

impl<S: MapSurface + fmt::Debug> fmt::Debug for MarkerLayer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerLayer")
            .field("surface", &self.surface)
            .field("amenities", &self.amenities.len())
            .field("reports", &self.reports.len())
            .field("user", &self.user.is_some())
            .field("focus_zoom", &self.focus_zoom)
            .finish()
    }
}

impl<S: MapSurface> MarkerLayer<S> {
    /// Wrap a surface; selecting a marker zooms to `focus_zoom`.
    pub const fn new(surface: S, focus_zoom: u8) -> Self {
        Self {
            surface,
            amenities: Vec::new(),
            reports: Vec::new(),
            user: None,
            focus_zoom,
        }
    }

    /// Replace every amenity marker with one per placeable amenity.
    ///
    /// Amenities without a finite direct or aggregate position are skipped.
    /// Returns the number of markers drawn.
    pub fn render_amenities(&mut self, amenities: &[Amenity]) -> usize {
        self.clear_amenities();
        for amenity in amenities {
            let Some(position) = amenity.position() else {
                debug!(
                    "skipping amenity {:?} without a usable position",
                    amenity.name().unwrap_or(UNNAMED_VENUE)
                );
                continue;
            };
            let handle = self
                .surface
                .add_marker(MarkerSpec::for_amenity(amenity, position));
            self.amenities.push(PlacedMarker { handle, position });
        }
        self.amenities.len()
    }

    /// Remove every amenity marker, leaving reports and the user marker.
    pub fn clear_amenities(&mut self) {
        for placed in self.amenities.drain(..) {
            self.surface.remove_marker(placed.handle);
        }
    }

    /// Draw a marker for `report`; existing report markers are kept.
    pub fn add_report(&mut self, report: &Report) {
        let handle = self.surface.add_marker(MarkerSpec::for_report(report));
        self.reports.push(handle);
    }

    /// Move the user-location marker, replacing any previous one.
    pub fn place_user(&mut self, position: Coord<f64>) {
        if let Some(previous) = self.user.take() {
            self.surface.remove_marker(previous);
        }
        self.user = Some(self.surface.add_marker(MarkerSpec::for_user(position)));
    }

    /// Re-center on the `index`-th drawn amenity marker and return its
    /// position, or `None` when no such marker exists.
    pub fn focus_amenity_marker(&mut self, index: usize) -> Option<Coord<f64>> {
        let position = self.amenities.get(index).map(|placed| placed.position)?;
        self.focus(position).then_some(position)
    }

    /// Re-center on `position` at the focus zoom level.
    ///
    /// Non-finite positions are ignored.
    pub fn focus(&mut self, position: Coord<f64>) -> bool {
        if !location::is_finite(position) {
            return false;
        }
        self.surface.set_view(position, self.focus_zoom);
        true
    }

    /// Number of live amenity markers.
    #[must_use]
    pub fn amenity_marker_count(&self) -> usize {
        self.amenities.len()
    }

    /// Number of live report markers.
    #[must_use]
    pub fn report_marker_count(&self) -> usize {
        self.reports.len()
    }

    /// Return `true` when the user marker is drawn.
    #[must_use]
    pub const fn has_user_marker(&self) -> bool {
        self.user.is_some()
    }

    /// Borrow the surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the surface for view changes.
    ///
    /// Markers must still be created and removed through the layer.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Accessibility;
    use crate::amenity::{NAME_TAG, WHEELCHAIR_TAG};
    use crate::location::from_lat_lon;
    use crate::test_support::RecordingSurface;
    use rstest::{fixture, rstest};

    #[fixture]
    fn layer() -> MarkerLayer<RecordingSurface> {
        MarkerLayer::new(RecordingSurface::default(), 16)
    }

    fn cafe(name: &str, wheelchair: &str) -> Amenity {
        Amenity::at(from_lat_lon(-1.95, 30.06))
            .with_tag(NAME_TAG, name)
            .with_tag(WHEELCHAIR_TAG, wheelchair)
    }

    fn report() -> Report {
        Report::new(from_lat_lon(-1.94, 30.12), "ramp", None).unwrap_or_else(|err| panic!("{err}"))
    }

    #[rstest]
    fn draws_one_marker_per_placeable_amenity(mut layer: MarkerLayer<RecordingSurface>) {
        let amenities = vec![
            cafe("A", "yes"),
            Amenity::default().with_tag(NAME_TAG, "Lost"),
            Amenity::centered(from_lat_lon(-1.96, 30.07)),
            Amenity::at(from_lat_lon(f64::NAN, 30.0)),
        ];
        assert_eq!(layer.render_amenities(&amenities), 2);
        assert_eq!(layer.amenity_marker_count(), 2);
        assert_eq!(layer.surface().amenity_markers().len(), 2);
    }

    #[rstest]
    fn second_render_replaces_first(mut layer: MarkerLayer<RecordingSurface>) {
        layer.render_amenities(&[cafe("First", "yes"), cafe("Second", "no")]);
        layer.render_amenities(&[cafe("Third", "limited")]);

        let titles: Vec<_> = layer
            .surface()
            .amenity_markers()
            .into_iter()
            .map(|spec| spec.popup.title.clone())
            .collect();
        assert_eq!(titles, vec!["Third".to_owned()]);
        assert_eq!(layer.surface().unknown_removals(), 0);
    }

    #[rstest]
    fn marker_style_follows_accessibility(mut layer: MarkerLayer<RecordingSurface>) {
        layer.render_amenities(&[cafe("A", "yes"), cafe("B", "no"), cafe("C", "limited")]);
        let styles: Vec<_> = layer
            .surface()
            .amenity_markers()
            .into_iter()
            .map(|spec| spec.style)
            .collect();
        assert_eq!(
            styles,
            vec![
                MarkerStyle::Amenity(Accessibility::Accessible),
                MarkerStyle::Amenity(Accessibility::NotAccessible),
                MarkerStyle::Amenity(Accessibility::Unknown),
            ]
        );
    }

    #[rstest]
    fn amenity_popup_lists_details() {
        let spec = MarkerSpec::for_amenity(
            &Amenity::at(from_lat_lon(0.0, 0.0)).with_tag("amenity", "cafe"),
            from_lat_lon(0.0, 0.0),
        );
        assert_eq!(spec.popup.title, UNNAMED_VENUE);
        assert_eq!(spec.popup.lines, vec!["Type: cafe", "Wheelchair: unknown"]);
    }

    #[rstest]
    fn empty_wheelchair_tag_reads_unknown_in_popup() {
        let spec = MarkerSpec::for_amenity(
            &Amenity::at(from_lat_lon(0.0, 0.0)).with_tag(WHEELCHAIR_TAG, ""),
            from_lat_lon(0.0, 0.0),
        );
        assert_eq!(spec.popup.lines, vec!["Type: unknown", "Wheelchair: unknown"]);
    }

    #[rstest]
    fn report_popup_omits_missing_details() {
        let spec = MarkerSpec::for_report(&report());
        assert_eq!(spec.popup.title, REPORT_TITLE);
        assert_eq!(spec.popup.lines, vec!["Type: ramp"]);
    }

    #[rstest]
    fn amenity_refresh_keeps_report_markers(mut layer: MarkerLayer<RecordingSurface>) {
        layer.add_report(&report());
        layer.render_amenities(&[cafe("A", "yes")]);
        layer.render_amenities(&[]);
        layer.add_report(&report());

        assert_eq!(layer.report_marker_count(), 2);
        assert_eq!(layer.surface().report_markers().len(), 2);
        assert!(layer.surface().amenity_markers().is_empty());
    }

    #[rstest]
    fn user_marker_is_replaced(mut layer: MarkerLayer<RecordingSurface>) {
        layer.place_user(from_lat_lon(1.0, 1.0));
        layer.place_user(from_lat_lon(2.0, 2.0));

        let users = layer.surface().markers_with_style(MarkerStyle::User);
        assert_eq!(users.len(), 1);
        assert!(layer.has_user_marker());
        assert_eq!(users.first().map(|spec| spec.position), Some(from_lat_lon(2.0, 2.0)));
    }

    #[rstest]
    fn focusing_a_marker_recenters_the_view(mut layer: MarkerLayer<RecordingSurface>) {
        layer.render_amenities(&[cafe("A", "yes")]);
        assert_eq!(layer.focus_amenity_marker(0), Some(from_lat_lon(-1.95, 30.06)));
        assert_eq!(layer.surface().view(), Some((from_lat_lon(-1.95, 30.06), 16)));
        assert_eq!(layer.focus_amenity_marker(1), None);
    }
}
