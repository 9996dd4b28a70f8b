//! Client-side filtering of the canonical amenity set.
//!
//! Filtering is pure and order-preserving. The displayed set is always
//! re-derived from scratch; nothing here caches or diffs.

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::amenity::{Amenity, CATEGORY_TAG};

/// Control value meaning "do not filter on this tag".
pub const ANY_VALUE: &str = "all";

/// Selection made on a tag-valued filter control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagFilter {
    /// Accept every value.
    #[default]
    Any,
    /// Accept only this exact value.
    Equals(String),
}

impl TagFilter {
    /// Return `true` when `value` passes the filter.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Equals(expected) => expected == value,
        }
    }
}

impl From<&str> for TagFilter {
    /// Read a control value; `all` (any case, surrounding blanks ignored)
    /// selects [`TagFilter::Any`].
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ANY_VALUE) {
            Self::Any
        } else {
            Self::Equals(trimmed.to_owned())
        }
    }
}

impl FromStr for TagFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ANY_VALUE),
            Self::Equals(value) => f.write_str(value),
        }
    }
}

/// The three filter controls.
///
/// # Examples
/// ```
/// use accessmap_core::{Amenity, FilterCriteria, TagFilter, filter, location::from_lat_lon};
///
/// let amenities = vec![
///     Amenity::at(from_lat_lon(0.0, 0.0)).with_tag("name", "Cafe A").with_tag("wheelchair", "yes"),
///     Amenity::at(from_lat_lon(0.0, 0.0)).with_tag("name", "Cafe B").with_tag("wheelchair", "no"),
/// ];
/// let criteria = FilterCriteria::default().with_wheelchair(TagFilter::Equals("yes".into()));
///
/// let shown = filter::apply(&amenities, &criteria);
/// assert_eq!(shown.len(), 1);
/// assert_eq!(shown[0].name(), Some("Cafe A"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterCriteria {
    /// Wheelchair tag selection; absent tags compare as `unknown`.
    pub wheelchair: TagFilter,
    /// Category tag selection; absent tags compare as `unknown`.
    pub category: TagFilter,
    /// Case-insensitive name substring; empty disables the check.
    pub name_query: String,
}

impl FilterCriteria {
    /// Replace the wheelchair selection.
    #[must_use]
    pub fn with_wheelchair(mut self, wheelchair: TagFilter) -> Self {
        self.wheelchair = wheelchair;
        self
    }

    /// Replace the category selection.
    #[must_use]
    pub fn with_category(mut self, category: TagFilter) -> Self {
        self.category = category;
        self
    }

    /// Replace the name query.
    #[must_use]
    pub fn with_name_query(mut self, query: impl Into<String>) -> Self {
        self.name_query = query.into();
        self
    }

    /// Return `true` when no control narrows the result.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.wheelchair == TagFilter::Any
            && self.category == TagFilter::Any
            && self.name_query.is_empty()
    }

    /// Return `true` when `amenity` passes all three predicates.
    #[must_use]
    pub fn matches(&self, amenity: &Amenity) -> bool {
        self.wheelchair.accepts(amenity.wheelchair())
            && self.category.accepts(amenity.category())
            && name_contains(amenity.name().unwrap_or_default(), &self.name_query)
    }
}

fn name_contains(name: &str, query: &str) -> bool {
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase())
}

/// Return the amenities that pass `criteria`, in input order.
#[must_use]
pub fn apply(amenities: &[Amenity], criteria: &FilterCriteria) -> Vec<Amenity> {
    if criteria.is_unfiltered() {
        return amenities.to_vec();
    }
    amenities
        .iter()
        .filter(|amenity| criteria.matches(amenity))
        .cloned()
        .collect()
}

/// Distinct category tags in first-seen order.
///
/// Amenities without a category tag (or with an empty one) contribute
/// nothing, so `unknown` only appears when it is tagged literally.
#[must_use]
pub fn category_options(amenities: &[Amenity]) -> Vec<String> {
    let mut seen = HashSet::new();
    amenities
        .iter()
        .filter_map(|amenity| amenity.tag(CATEGORY_TAG))
        .filter(|category| !category.is_empty())
        .filter(|category| seen.insert(*category))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amenity::{NAME_TAG, WHEELCHAIR_TAG};
    use crate::location::from_lat_lon;
    use rstest::{fixture, rstest};

    fn amenity(name: &str, category: Option<&str>, wheelchair: Option<&str>) -> Amenity {
        let mut amenity = Amenity::at(from_lat_lon(-1.95, 30.06)).with_tag(NAME_TAG, name);
        if let Some(value) = category {
            amenity = amenity.with_tag(CATEGORY_TAG, value);
        }
        if let Some(value) = wheelchair {
            amenity = amenity.with_tag(WHEELCHAIR_TAG, value);
        }
        amenity
    }

    #[fixture]
    fn amenities() -> Vec<Amenity> {
        vec![
            amenity("Cafe A", Some("cafe"), Some("yes")),
            amenity("Cafe B", Some("cafe"), Some("no")),
            amenity("City Pharmacy", Some("pharmacy"), None),
            amenity("Library", Some("library"), Some("unknown")),
            amenity("Town Toilets", None, Some("limited")),
        ]
    }

    fn names(amenities: &[Amenity]) -> Vec<&str> {
        amenities
            .iter()
            .map(|a| a.name().unwrap_or_default())
            .collect()
    }

    #[rstest]
    fn default_criteria_return_input(amenities: Vec<Amenity>) {
        assert_eq!(apply(&amenities, &FilterCriteria::default()), amenities);
    }

    #[rstest]
    #[case(FilterCriteria::default(), true)]
    #[case(FilterCriteria::default().with_wheelchair(TagFilter::from("all")), true)]
    #[case(FilterCriteria::default().with_wheelchair(TagFilter::from("no")), false)]
    #[case(FilterCriteria::default().with_category(TagFilter::from("cafe")), false)]
    #[case(FilterCriteria::default().with_name_query("a"), false)]
    fn detects_unfiltered_criteria(#[case] criteria: FilterCriteria, #[case] expected: bool) {
        assert_eq!(criteria.is_unfiltered(), expected);
    }

    #[rstest]
    fn empty_input_returns_empty() {
        let criteria = FilterCriteria::default().with_name_query("cafe");
        assert!(apply(&[], &criteria).is_empty());
    }

    #[rstest]
    fn wheelchair_yes_keeps_accessible_only(amenities: Vec<Amenity>) {
        let criteria = FilterCriteria::default().with_wheelchair(TagFilter::from("yes"));
        assert_eq!(names(&apply(&amenities, &criteria)), vec!["Cafe A"]);
    }

    #[rstest]
    fn missing_wheelchair_tag_matches_unknown(amenities: Vec<Amenity>) {
        let criteria = FilterCriteria::default().with_wheelchair(TagFilter::Equals("unknown".into()));
        assert_eq!(
            names(&apply(&amenities, &criteria)),
            vec!["City Pharmacy", "Library"]
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(None, Some(""))]
    #[case(Some(""), Some(""))]
    fn absent_or_empty_tags_match_unknown(
        #[case] category: Option<&str>,
        #[case] wheelchair: Option<&str>,
    ) {
        let untagged = [amenity("Kiosk", category, wheelchair)];
        let unknown = TagFilter::Equals("unknown".into());
        let by_wheelchair = FilterCriteria::default().with_wheelchair(unknown.clone());
        let by_category = FilterCriteria::default().with_category(unknown);
        assert_eq!(names(&apply(&untagged, &by_wheelchair)), vec!["Kiosk"]);
        assert_eq!(names(&apply(&untagged, &by_category)), vec!["Kiosk"]);
    }

    #[rstest]
    fn limited_is_selectable(amenities: Vec<Amenity>) {
        let criteria = FilterCriteria::default().with_wheelchair(TagFilter::Equals("limited".into()));
        assert_eq!(names(&apply(&amenities, &criteria)), vec!["Town Toilets"]);
    }

    #[rstest]
    fn missing_category_matches_unknown(amenities: Vec<Amenity>) {
        let criteria = FilterCriteria::default().with_category(TagFilter::Equals("unknown".into()));
        assert_eq!(names(&apply(&amenities, &criteria)), vec!["Town Toilets"]);
    }

    #[rstest]
    #[case("CAFE", vec!["Cafe A", "Cafe B"])]
    #[case("pharm", vec!["City Pharmacy"])]
    #[case("zzz", vec![])]
    fn name_query_is_case_insensitive(
        amenities: Vec<Amenity>,
        #[case] query: &str,
        #[case] expected: Vec<&str>,
    ) {
        let criteria = FilterCriteria::default().with_name_query(query);
        assert_eq!(names(&apply(&amenities, &criteria)), expected);
    }

    #[rstest]
    fn unnamed_amenity_fails_non_empty_query() {
        let unnamed = Amenity::at(from_lat_lon(0.0, 0.0)).with_tag(CATEGORY_TAG, "bench");
        let criteria = FilterCriteria::default().with_name_query("a");
        assert!(apply(&[unnamed], &criteria).is_empty());
    }

    #[rstest]
    fn predicates_combine(amenities: Vec<Amenity>) {
        let criteria = FilterCriteria::default()
            .with_category(TagFilter::Equals("cafe".into()))
            .with_wheelchair(TagFilter::Equals("no".into()))
            .with_name_query("b");
        assert_eq!(names(&apply(&amenities, &criteria)), vec!["Cafe B"]);
    }

    #[rstest]
    #[case("all", TagFilter::Any)]
    #[case(" ALL ", TagFilter::Any)]
    #[case("", TagFilter::Any)]
    #[case("cafe", TagFilter::Equals("cafe".into()))]
    fn parses_control_values(#[case] raw: &str, #[case] expected: TagFilter) {
        assert_eq!(raw.parse::<TagFilter>(), Ok(expected));
    }

    #[rstest]
    fn category_options_are_distinct_in_first_seen_order() {
        let amenities = vec![
            amenity("a", Some("toilets"), None),
            amenity("b", Some("cafe"), None),
            amenity("c", None, None),
            amenity("d", Some("toilets"), None),
            amenity("e", Some(""), None),
            amenity("f", Some("bank"), None),
        ];
        assert_eq!(
            category_options(&amenities),
            vec!["toilets".to_owned(), "cafe".to_owned(), "bank".to_owned()]
        );
    }
}
