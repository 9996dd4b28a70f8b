//! Text rendering of the widget for terminal sessions.
//!
//! The three host collaborators share one [`Console`]: they append lines to
//! it and the command loop flushes them to the output after every command.
//! The console also tracks the map view so panning and dragging can be
//! translated back into viewport centers.

use std::cell::RefCell;
use std::f64::consts::PI;
use std::io::{self, Write};
use std::rc::Rc;

use accessmap_core::{
    ControlPanel, ListEntry, ListSink, MapController, MapSettings, MapSurface, MarkerSpec,
    MarkerStyle, Notice, NoticeLevel,
};
use geo::Coord;

/// Controller rendered to a [`Console`].
pub type TextController = MapController<TextSurface, TextList, TextPanel>;

/// Pixel width of one Web Mercator tile.
const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Default)]
struct ConsoleState {
    lines: Vec<String>,
    view: Option<(Coord<f64>, u8)>,
}

/// Shared output buffer and map view.
#[derive(Debug, Clone, Default)]
pub struct Console(Rc<RefCell<ConsoleState>>);

impl Console {
    /// Build a controller whose collaborators all render to this console.
    #[must_use]
    pub fn controller(&self, settings: MapSettings) -> TextController {
        MapController::new(
            settings,
            TextSurface {
                console: self.clone(),
                next_id: 0,
            },
            TextList {
                console: self.clone(),
            },
            TextPanel {
                console: self.clone(),
            },
        )
    }

    /// Append one line.
    pub fn println(&self, line: impl Into<String>) {
        self.0.borrow_mut().lines.push(line.into());
    }

    /// Take the pending lines.
    #[must_use]
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut self.0.borrow_mut().lines)
    }

    /// Drop the pending lines unread.
    pub fn discard(&self) {
        self.0.borrow_mut().lines.clear();
    }

    /// Write and discard the pending lines.
    pub fn flush_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.drain() {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }

    /// Current map center, once a view was set.
    #[must_use]
    pub fn center(&self) -> Option<Coord<f64>> {
        self.0.borrow().view.map(|(center, _)| center)
    }

    /// Current zoom level, once a view was set.
    #[must_use]
    pub fn zoom(&self) -> Option<u8> {
        self.0.borrow().view.map(|(_, zoom)| zoom)
    }

    /// Move the map to `center` as a user drag would, keeping the zoom.
    pub fn drag_to(&self, center: Coord<f64>) {
        let mut state = self.0.borrow_mut();
        let zoom = state.view.map_or(0, |(_, zoom)| zoom);
        state.view = Some((center, zoom));
    }

    fn set_view(&self, center: Coord<f64>, zoom: u8) {
        self.0.borrow_mut().view = Some((center, zoom));
    }
}

/// [`MapSurface`] printing marker and view changes.
#[derive(Debug)]
pub struct TextSurface {
    console: Console,
    next_id: u64,
}

fn style_label(style: MarkerStyle) -> String {
    match style {
        MarkerStyle::Amenity(accessibility) => format!("amenity/{}", accessibility.colour()),
        MarkerStyle::Report => "report".to_owned(),
        MarkerStyle::User => "user".to_owned(),
    }
}

impl MapSurface for TextSurface {
    type Marker = u64;

    fn add_marker(&mut self, marker: MarkerSpec) -> Self::Marker {
        self.next_id += 1;
        let mut line = format!(
            "+ #{} {} at {:.5}, {:.5}: {}",
            self.next_id,
            style_label(marker.style),
            marker.position.y,
            marker.position.x,
            marker.popup.title
        );
        for detail in &marker.popup.lines {
            line.push_str(" | ");
            line.push_str(detail);
        }
        self.console.println(line);
        self.next_id
    }

    fn remove_marker(&mut self, marker: Self::Marker) {
        self.console.println(format!("- #{marker}"));
    }

    fn set_view(&mut self, center: Coord<f64>, zoom: u8) {
        self.console.set_view(center, zoom);
        self.console
            .println(format!("view {:.5}, {:.5} zoom {zoom}", center.y, center.x));
    }

    fn pan_by(&mut self, dx: i32, dy: i32) {
        let Some((center, zoom)) = self.console.0.borrow().view else {
            return;
        };
        let moved = pan_center(center, zoom, dx, dy);
        self.console.set_view(moved, zoom);
        self.console
            .println(format!("view {:.5}, {:.5} zoom {zoom}", moved.y, moved.x));
    }
}

/// Shift `center` by a screen offset in Web Mercator pixels at `zoom`.
#[must_use]
pub fn pan_center(center: Coord<f64>, zoom: u8, dx: i32, dy: i32) -> Coord<f64> {
    let size = TILE_SIZE * 2_f64.powi(i32::from(zoom));
    let x = (center.x + 180.0) / 360.0 * size + f64::from(dx);
    let lat = center.y.to_radians();
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size + f64::from(dy);

    let lon = (x / size).rem_euclid(1.0) * 360.0 - 180.0;
    let y = y.clamp(0.0, size);
    let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
    Coord { x: lon, y: lat }
}

/// [`ListSink`] printing a numbered amenity list.
#[derive(Debug)]
pub struct TextList {
    console: Console,
}

impl ListSink for TextList {
    fn render(&mut self, entries: &[ListEntry]) {
        self.console.println(format!("amenities ({})", entries.len()));
        for (index, entry) in entries.iter().enumerate() {
            self.console.println(format!("  {}. {entry}", index + 1));
        }
    }

    fn clear(&mut self, message: &str) {
        self.console.println(format!("amenities (0): {message}"));
    }
}

/// [`ControlPanel`] printing loading changes, categories and notices.
#[derive(Debug)]
pub struct TextPanel {
    console: Console,
}

impl ControlPanel for TextPanel {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.console.println("loading...");
        }
    }

    fn set_category_options(&mut self, categories: &[String]) {
        let listed = if categories.is_empty() {
            "none".to_owned()
        } else {
            categories.join(", ")
        };
        self.console.println(format!("categories: {listed}"));
    }

    fn notify(&mut self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        self.console.println(format!("[{tag}] {}", notice.message));
    }
}
