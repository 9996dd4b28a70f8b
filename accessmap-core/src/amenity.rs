//! Amenities returned by the geodata backend.

use std::collections::HashMap;

use geo::Coord;

use crate::location;

/// OpenStreetMap-style key/value tags.
pub type Tags = HashMap<String, String>;

/// Tag holding the amenity category, e.g. `cafe` or `toilets`.
pub const CATEGORY_TAG: &str = "amenity";
/// Tag holding the display name.
pub const NAME_TAG: &str = "name";
/// Tag holding the wheelchair classification.
pub const WHEELCHAIR_TAG: &str = "wheelchair";
/// Value substituted for absent category and wheelchair tags.
pub const UNKNOWN_VALUE: &str = "unknown";

/// A point or area of interest near the viewport.
///
/// Node results carry a direct position. Way and relation results carry an
/// aggregate `center` instead; either may be absent or malformed, in which
/// case the amenity is listed but cannot be placed on the map.
///
/// # Examples
/// ```
/// use accessmap_core::{Accessibility, Amenity, location::from_lat_lon};
///
/// let cafe = Amenity::at(from_lat_lon(-1.95, 30.06))
///     .with_tag("amenity", "cafe")
///     .with_tag("wheelchair", "yes");
///
/// assert_eq!(cafe.category(), "cafe");
/// assert_eq!(cafe.accessibility(), Accessibility::Accessible);
/// assert!(cafe.position().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Amenity {
    /// Direct position of node results.
    pub point: Option<Coord<f64>>,
    /// Aggregate position of way and relation results.
    pub center: Option<Coord<f64>>,
    /// Free-form tags.
    pub tags: Tags,
}

impl Amenity {
    /// Construct an amenity from its raw parts.
    #[must_use]
    pub const fn new(point: Option<Coord<f64>>, center: Option<Coord<f64>>, tags: Tags) -> Self {
        Self {
            point,
            center,
            tags,
        }
    }

    /// Construct an untagged amenity with a direct position.
    #[must_use]
    pub fn at(point: Coord<f64>) -> Self {
        Self::new(Some(point), None, Tags::new())
    }

    /// Construct an untagged amenity positioned by an aggregate center.
    #[must_use]
    pub fn centered(center: Coord<f64>) -> Self {
        Self::new(None, Some(center), Tags::new())
    }

    /// Add or replace a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Resolve the drawable position, preferring the direct one.
    ///
    /// Returns `None` when neither position has two finite components.
    #[must_use]
    pub fn position(&self) -> Option<Coord<f64>> {
        self.point
            .filter(|coord| location::is_finite(*coord))
            .or_else(|| self.center.filter(|coord| location::is_finite(*coord)))
    }

    /// Look up a tag value.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Display name, if tagged.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tag(NAME_TAG)
    }

    /// Category tag, or [`UNKNOWN_VALUE`] when absent or empty.
    #[must_use]
    pub fn category(&self) -> &str {
        self.filled_tag(CATEGORY_TAG).unwrap_or(UNKNOWN_VALUE)
    }

    /// Raw wheelchair tag, or [`UNKNOWN_VALUE`] when absent or empty.
    ///
    /// Filtering compares against this value so that `limited` stays
    /// selectable even though it maps to [`Accessibility::Unknown`].
    #[must_use]
    pub fn wheelchair(&self) -> &str {
        self.filled_tag(WHEELCHAIR_TAG).unwrap_or(UNKNOWN_VALUE)
    }

    fn filled_tag(&self, key: &str) -> Option<&str> {
        self.tag(key).filter(|value| !value.is_empty())
    }

    /// Three-way accessibility classification of the wheelchair tag.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        Accessibility::from_tag(self.tag(WHEELCHAIR_TAG))
    }
}

/// Wheelchair accessibility as shown by markers and list entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Accessibility {
    /// Tagged `wheelchair=yes`.
    Accessible,
    /// Tagged `wheelchair=no`.
    NotAccessible,
    /// Any other value, including `limited` and an absent tag.
    #[default]
    Unknown,
}

impl Accessibility {
    /// Classify a raw wheelchair tag value.
    #[must_use]
    pub fn from_tag(value: Option<&str>) -> Self {
        match value {
            Some("yes") => Self::Accessible,
            Some("no") => Self::NotAccessible,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label used by the list view.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accessible => "Accessible",
            Self::NotAccessible => "Not Accessible",
            Self::Unknown => "Unknown",
        }
    }

    /// Marker colour keyed by status.
    #[must_use]
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Accessible => "green",
            Self::NotAccessible => "red",
            Self::Unknown => "gray",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::from_lat_lon;
    use rstest::rstest;

    #[rstest]
    #[case(Some("yes"), Accessibility::Accessible)]
    #[case(Some("no"), Accessibility::NotAccessible)]
    #[case(Some("limited"), Accessibility::Unknown)]
    #[case(Some("unknown"), Accessibility::Unknown)]
    #[case(None, Accessibility::Unknown)]
    fn classifies_wheelchair_tag(#[case] tag: Option<&str>, #[case] expected: Accessibility) {
        assert_eq!(Accessibility::from_tag(tag), expected);
    }

    #[rstest]
    fn prefers_direct_position() {
        let amenity = Amenity::new(
            Some(from_lat_lon(1.0, 2.0)),
            Some(from_lat_lon(3.0, 4.0)),
            Tags::new(),
        );
        assert_eq!(amenity.position(), Some(from_lat_lon(1.0, 2.0)));
    }

    #[rstest]
    fn falls_back_to_center() {
        let amenity = Amenity::centered(from_lat_lon(3.0, 4.0));
        assert_eq!(amenity.position(), Some(from_lat_lon(3.0, 4.0)));
    }

    #[rstest]
    fn falls_back_when_direct_position_is_not_finite() {
        let amenity = Amenity::new(
            Some(from_lat_lon(f64::NAN, 2.0)),
            Some(from_lat_lon(3.0, 4.0)),
            Tags::new(),
        );
        assert_eq!(amenity.position(), Some(from_lat_lon(3.0, 4.0)));
    }

    #[rstest]
    fn unpositioned_amenity_has_no_position() {
        let amenity = Amenity::default().with_tag(NAME_TAG, "Nowhere");
        assert_eq!(amenity.position(), None);
    }

    #[rstest]
    fn absent_tags_read_as_unknown() {
        let amenity = Amenity::at(from_lat_lon(0.0, 0.0));
        assert_eq!(amenity.category(), UNKNOWN_VALUE);
        assert_eq!(amenity.wheelchair(), UNKNOWN_VALUE);
        assert_eq!(amenity.name(), None);
    }

    #[rstest]
    fn empty_tags_read_as_unknown() {
        let amenity = Amenity::at(from_lat_lon(0.0, 0.0))
            .with_tag(CATEGORY_TAG, "")
            .with_tag(WHEELCHAIR_TAG, "");
        assert_eq!(amenity.category(), UNKNOWN_VALUE);
        assert_eq!(amenity.wheelchair(), UNKNOWN_VALUE);
    }
}
