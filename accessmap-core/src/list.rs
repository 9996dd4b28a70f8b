//! Textual counterpart of the amenity markers.

use std::fmt;

use geo::Coord;

use crate::amenity::{Accessibility, Amenity, CATEGORY_TAG};
use crate::marker::UNNAMED_VENUE;

/// Placeholder shown when the filtered set is empty.
pub const EMPTY_LIST_MESSAGE: &str = "No amenities found in this area";
/// Type shown for amenities without a category tag.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// One row of the amenity list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    /// Display name.
    pub name: String,
    /// Category tag.
    pub category: String,
    /// Accessibility classification.
    pub accessibility: Accessibility,
    /// Where clicking the row re-centers the map, if placeable.
    pub position: Option<Coord<f64>>,
}

impl ListEntry {
    /// Build the row for `amenity`.
    #[must_use]
    pub fn from_amenity(amenity: &Amenity) -> Self {
        Self {
            name: amenity.name().unwrap_or(UNNAMED_VENUE).to_owned(),
            category: amenity.tag(CATEGORY_TAG).unwrap_or(UNKNOWN_TYPE).to_owned(),
            accessibility: amenity.accessibility(),
            position: amenity.position(),
        }
    }
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} • {})",
            self.name,
            self.category,
            self.accessibility.label()
        )
    }
}

/// Host-side rendering of the list.
pub trait ListSink {
    /// Show `entries` under a `(count)` header.
    fn render(&mut self, entries: &[ListEntry]);

    /// Show the empty-state `message` under a `(0)` header.
    fn clear(&mut self, message: &str);
}

/// Keeps the list in step with the filtered amenities.
#[derive(Debug)]
pub struct ListView<L> {
    sink: L,
    entries: Vec<ListEntry>,
}

impl<L: ListSink> ListView<L> {
    /// Wrap a sink.
    pub const fn new(sink: L) -> Self {
        Self {
            sink,
            entries: Vec::new(),
        }
    }

    /// Re-render from `amenities`; returns the row count.
    ///
    /// Every filtered amenity gets a row, including those the map cannot
    /// place.
    pub fn render(&mut self, amenities: &[Amenity]) -> usize {
        self.entries = amenities.iter().map(ListEntry::from_amenity).collect();
        if self.entries.is_empty() {
            self.sink.clear(EMPTY_LIST_MESSAGE);
        } else {
            self.sink.render(&self.entries);
        }
        self.entries.len()
    }

    /// Rows currently shown.
    #[must_use]
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// Number of rows currently shown.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when the empty state is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the sink.
    #[must_use]
    pub const fn sink(&self) -> &L {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amenity::{NAME_TAG, WHEELCHAIR_TAG};
    use crate::location::from_lat_lon;
    use crate::test_support::RecordingList;
    use rstest::rstest;

    #[rstest]
    fn empty_input_shows_placeholder() {
        let mut view = ListView::new(RecordingList::default());
        assert_eq!(view.render(&[]), 0);
        assert!(view.is_empty());
        assert_eq!(view.sink().empty_message(), Some(EMPTY_LIST_MESSAGE));
    }

    #[rstest]
    fn rows_follow_input_order_and_include_unplaceable() {
        let mut view = ListView::new(RecordingList::default());
        let amenities = vec![
            Amenity::at(from_lat_lon(0.0, 0.0))
                .with_tag(NAME_TAG, "Cafe A")
                .with_tag(WHEELCHAIR_TAG, "yes"),
            Amenity::default().with_tag(CATEGORY_TAG, "toilets"),
        ];

        assert_eq!(view.render(&amenities), 2);
        let rendered = view.sink().rows();
        assert_eq!(
            rendered,
            vec![
                "Cafe A (Unknown • Accessible)".to_owned(),
                "Unnamed Venue (toilets • Unknown)".to_owned(),
            ]
        );
        assert_eq!(view.entries().get(1).and_then(|e| e.position), None);
    }

    #[rstest]
    fn rerender_after_empty_replaces_placeholder() {
        let mut view = ListView::new(RecordingList::default());
        view.render(&[]);
        view.render(&[Amenity::at(from_lat_lon(0.0, 0.0))]);
        assert_eq!(view.sink().empty_message(), None);
        assert_eq!(view.len(), 1);
    }
}
