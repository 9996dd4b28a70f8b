//! Coordinate helpers shared by the controller, markers and reports.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`, matching
//! [`geo::Coord`]'s axis order.

use geo::Coord;

/// Build a coordinate from latitude and longitude, in that order.
///
/// # Examples
/// ```
/// use accessmap_core::location::from_lat_lon;
///
/// let kigali = from_lat_lon(-1.9434, 30.1288);
/// assert_eq!(kigali.x, 30.1288);
/// assert_eq!(kigali.y, -1.9434);
/// ```
#[must_use]
pub const fn from_lat_lon(lat: f64, lon: f64) -> Coord<f64> {
    Coord { x: lon, y: lat }
}

/// Return `true` when both components are finite.
///
/// Markers only need a drawable position, so this is the weaker check.
#[must_use]
pub fn is_finite(coord: Coord<f64>) -> bool {
    coord.x.is_finite() && coord.y.is_finite()
}

/// Return `true` when the coordinate is finite and inside WGS84 ranges.
///
/// Boundary values are accepted, so the poles and the antimeridian are valid.
///
/// # Examples
/// ```
/// use accessmap_core::location::{from_lat_lon, is_valid_center};
///
/// assert!(is_valid_center(from_lat_lon(0.0, 0.0)));
/// assert!(!is_valid_center(from_lat_lon(f64::NAN, 0.0)));
/// assert!(!is_valid_center(from_lat_lon(91.0, 0.0)));
/// ```
#[must_use]
pub fn is_valid_center(coord: Coord<f64>) -> bool {
    is_finite(coord) && (-90.0..=90.0).contains(&coord.y) && (-180.0..=180.0).contains(&coord.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(-1.9434, 30.1288)]
    fn accepts_in_range_centers(#[case] lat: f64, #[case] lon: f64) {
        assert!(is_valid_center(from_lat_lon(lat, lon)));
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    #[case(90.5, 0.0)]
    #[case(0.0, -180.5)]
    fn rejects_invalid_centers(#[case] lat: f64, #[case] lon: f64) {
        assert!(!is_valid_center(from_lat_lon(lat, lon)));
    }

    #[rstest]
    fn finite_check_ignores_range() {
        assert!(is_finite(from_lat_lon(200.0, 400.0)));
        assert!(!is_finite(from_lat_lon(f64::NEG_INFINITY, 0.0)));
    }
}
