//! Property-based tests for client-side amenity filtering.
//!
//! # Invariants tested
//!
//! - **Subset:** every filtered amenity satisfies the criteria and comes from
//!   the canonical set.
//! - **Order:** filtering preserves canonical order.
//! - **Identity:** default criteria keep the canonical set unchanged.
//! - **Missing tags:** an absent or empty `wheelchair` tag filters as
//!   `unknown`.
//! - **Category options:** distinct and non-empty.

use std::collections::HashSet;

use accessmap_core::amenity::{CATEGORY_TAG, NAME_TAG, WHEELCHAIR_TAG};
use accessmap_core::filter::{apply, category_options};
use accessmap_core::location::from_lat_lon;
use accessmap_core::{Amenity, FilterCriteria, TagFilter};
use proptest::prelude::*;

const WHEELCHAIR_VALUES: [&str; 4] = ["yes", "no", "limited", "unknown"];
const CATEGORIES: [&str; 4] = ["cafe", "bank", "pharmacy", ""];

fn amenity_strategy() -> impl Strategy<Value = Amenity> {
    (
        prop::option::of(prop::sample::select(WHEELCHAIR_VALUES.to_vec())),
        prop::option::of(prop::sample::select(CATEGORIES.to_vec())),
        prop::option::of("[A-Za-z ]{0,12}"),
        -80.0_f64..80.0,
        -170.0_f64..170.0,
    )
        .prop_map(|(wheelchair, category, name, lat, lon)| {
            let mut amenity = Amenity::at(from_lat_lon(lat, lon));
            if let Some(value) = wheelchair {
                amenity = amenity.with_tag(WHEELCHAIR_TAG, value);
            }
            if let Some(value) = category {
                amenity = amenity.with_tag(CATEGORY_TAG, value);
            }
            if let Some(value) = name {
                amenity = amenity.with_tag(NAME_TAG, value);
            }
            amenity
        })
}

fn tag_filter_strategy(values: &'static [&'static str]) -> impl Strategy<Value = TagFilter> {
    prop_oneof![
        Just(TagFilter::Any),
        prop::sample::select(values.to_vec()).prop_map(|value| TagFilter::Equals(value.to_owned())),
    ]
}

fn criteria_strategy() -> impl Strategy<Value = FilterCriteria> {
    (
        tag_filter_strategy(&WHEELCHAIR_VALUES),
        tag_filter_strategy(&CATEGORIES),
        prop_oneof![Just(String::new()), "[a-z]{1,3}"],
    )
        .prop_map(|(wheelchair, category, query)| {
            FilterCriteria::default()
                .with_wheelchair(wheelchair)
                .with_category(category)
                .with_name_query(query)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: filtering yields an order-preserving subsequence of matches.
    #[test]
    fn filtered_is_matching_subsequence(
        amenities in prop::collection::vec(amenity_strategy(), 0..24),
        criteria in criteria_strategy(),
    ) {
        let filtered = apply(&amenities, &criteria);

        prop_assert!(filtered.iter().all(|amenity| criteria.matches(amenity)));
        let mut remaining = amenities.iter();
        for kept in &filtered {
            prop_assert!(
                remaining.any(|candidate| candidate == kept),
                "filtered amenity {kept:?} is out of canonical order"
            );
        }
        let expected = amenities.iter().filter(|amenity| criteria.matches(amenity)).count();
        prop_assert_eq!(filtered.len(), expected);
    }

    /// Property: default criteria are the identity.
    #[test]
    fn default_criteria_keep_everything(
        amenities in prop::collection::vec(amenity_strategy(), 0..24),
    ) {
        prop_assert_eq!(apply(&amenities, &FilterCriteria::default()), amenities);
    }

    /// Property: an absent or empty wheelchair tag behaves exactly like
    /// `unknown`.
    #[test]
    fn missing_wheelchair_tag_is_unknown(amenity in amenity_strategy()) {
        let mut untagged = amenity;
        untagged.tags.remove(WHEELCHAIR_TAG);
        let empty = untagged.clone().with_tag(WHEELCHAIR_TAG, "");
        let explicit = untagged.clone().with_tag(WHEELCHAIR_TAG, "unknown");

        for value in WHEELCHAIR_VALUES {
            let criteria = FilterCriteria::default()
                .with_wheelchair(TagFilter::Equals(value.to_owned()));
            prop_assert_eq!(criteria.matches(&untagged), criteria.matches(&explicit));
            prop_assert_eq!(criteria.matches(&empty), criteria.matches(&explicit));
        }
    }

    /// Property: category options are distinct, non-empty and observed.
    #[test]
    fn category_options_are_distinct(
        amenities in prop::collection::vec(amenity_strategy(), 0..24),
    ) {
        let options = category_options(&amenities);
        let unique: HashSet<_> = options.iter().collect();

        prop_assert_eq!(unique.len(), options.len());
        prop_assert!(options.iter().all(|option| !option.is_empty()));
        prop_assert!(options
            .iter()
            .all(|option| amenities.iter().any(|amenity| amenity.category() == option)));
    }
}
