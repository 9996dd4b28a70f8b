use std::fmt;
use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

use crate::location::from_lat_lon;
use crate::source::DEFAULT_SEARCH_RADIUS_M;

/// Tunables of the widget.
///
/// Defaults center the map on Kigali with a 1000 m amenity radius and the
/// zoom levels used by marker selection, search and geolocation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapSettings {
    /// Viewport center before any interaction.
    pub initial_center: Coord<f64>,
    /// Zoom level before any interaction.
    pub initial_zoom: u8,
    /// Amenity search radius in metres.
    pub search_radius_m: u32,
    /// Zoom used when a marker or list row is selected.
    pub focus_zoom: u8,
    /// Zoom used after a successful geocoding search.
    pub search_zoom: u8,
    /// Zoom used after locating the user.
    pub locate_zoom: u8,
    /// Pixels moved by one directional pan.
    pub pan_step_px: i32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            initial_center: from_lat_lon(-1.9434, 30.1288),
            initial_zoom: 13,
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            focus_zoom: 16,
            search_zoom: 14,
            locate_zoom: 16,
            pan_step_px: 100,
        }
    }
}

impl MapSettings {
    /// Override the initial viewport center.
    #[must_use]
    pub const fn with_initial_center(mut self, center: Coord<f64>) -> Self {
        self.initial_center = center;
        self
    }

    /// Override the amenity search radius.
    #[must_use]
    pub const fn with_search_radius(mut self, radius_m: u32) -> Self {
        self.search_radius_m = radius_m;
        self
    }

    /// Override the pan step.
    #[must_use]
    pub const fn with_pan_step(mut self, pixels: i32) -> Self {
        self.pan_step_px = pixels;
        self
    }
}

/// One of the four directional pan controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    /// Towards the top of the screen.
    Up,
    /// Towards the bottom of the screen.
    Down,
    /// Towards the left edge.
    Left,
    /// Towards the right edge.
    Right,
}

impl PanDirection {
    /// Screen offset `(dx, dy)` for a pan of `step` pixels.
    #[must_use]
    pub const fn offset(self, step: i32) -> (i32, i32) {
        match self {
            Self::Up => (0, -step),
            Self::Down => (0, step),
            Self::Left => (-step, 0),
            Self::Right => (step, 0),
        }
    }
}

/// Error returned when parsing an unknown pan direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pan direction {0:?}; expected up, down, left or right")]
pub struct ParsePanDirectionError(pub String);

impl FromStr for PanDirection {
    type Err = ParsePanDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Ok(Self::Up),
            "down" | "arrowdown" => Ok(Self::Down),
            "left" | "arrowleft" => Ok(Self::Left),
            "right" | "arrowright" => Ok(Self::Right),
            _ => Err(ParsePanDirectionError(s.to_owned())),
        }
    }
}

impl fmt::Display for PanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PanDirection::Up, (0, -100))]
    #[case(PanDirection::Down, (0, 100))]
    #[case(PanDirection::Left, (-100, 0))]
    #[case(PanDirection::Right, (100, 0))]
    fn pan_offsets(#[case] direction: PanDirection, #[case] expected: (i32, i32)) {
        assert_eq!(direction.offset(100), expected);
    }

    #[rstest]
    #[case("up", PanDirection::Up)]
    #[case("ArrowLeft", PanDirection::Left)]
    #[case(" RIGHT ", PanDirection::Right)]
    fn parses_directions(#[case] raw: &str, #[case] expected: PanDirection) {
        assert_eq!(raw.parse::<PanDirection>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_direction() {
        assert!("sideways".parse::<PanDirection>().is_err());
    }
}
