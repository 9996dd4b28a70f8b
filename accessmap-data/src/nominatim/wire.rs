//! Nominatim search response types.
//!
//! Nominatim encodes coordinates as decimal strings.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use accessmap_core::location::from_lat_lon;
use accessmap_core::{Place, SourceError};
use serde::Deserialize;

/// One entry of a `format=json` search reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Full human-readable label.
    #[serde(default)]
    pub display_name: String,
}

impl SearchHit {
    /// Convert the hit into a [`Place`].
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Parse`] when a coordinate is not a number.
    pub fn to_place(&self) -> Result<Place, SourceError> {
        let lat = parse_degrees("lat", &self.lat)?;
        let lon = parse_degrees("lon", &self.lon)?;
        Ok(Place {
            position: from_lat_lon(lat, lon),
            display_name: self.display_name.clone(),
        })
    }
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, SourceError> {
    raw.trim().parse().map_err(|err| SourceError::Parse {
        message: format!("invalid {field} {raw:?}: {err}"),
    })
}

/// Parse a search reply into its first match.
///
/// # Errors
///
/// Returns [`SourceError::Http`] for a non-success status and
/// [`SourceError::Parse`] for a body that is not a list of hits.
pub fn parse_search(url: &str, status: u16, body: &str) -> Result<Option<Place>, SourceError> {
    if !(200..300).contains(&status) {
        return Err(SourceError::Http {
            url: url.to_owned(),
            status,
            message: format!("Server error: {status}"),
        });
    }
    let hits: Vec<SearchHit> = serde_json::from_str(body).map_err(|err| SourceError::Parse {
        message: err.to_string(),
    })?;
    hits.first().map(SearchHit::to_place).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const URL: &str = "https://nominatim.openstreetmap.org/search";

    #[rstest]
    fn takes_first_hit() {
        let body = r#"[
            {"lat": "-1.9536", "lon": "30.0606", "display_name": "Kigali, Rwanda"},
            {"lat": "-1.5", "lon": "29.6", "display_name": "Kigali Road, Musanze"}
        ]"#;

        let place = parse_search(URL, 200, body)
            .expect("valid body")
            .expect("one match");

        assert_eq!(place.position, from_lat_lon(-1.9536, 30.0606));
        assert_eq!(place.display_name, "Kigali, Rwanda");
    }

    #[rstest]
    fn empty_list_is_not_found() {
        assert_eq!(parse_search(URL, 200, "[]"), Ok(None));
    }

    #[rstest]
    #[case(r#"[{"lat": "north", "lon": "30.0"}]"#)]
    #[case(r#"{"error": "Unable to geocode"}"#)]
    #[case("")]
    fn malformed_replies_are_parse_errors(#[case] body: &str) {
        assert!(matches!(
            parse_search(URL, 200, body),
            Err(SourceError::Parse { .. })
        ));
    }

    #[rstest]
    fn throttled_reply_is_an_http_error() {
        let err = parse_search(URL, 429, "").expect_err("throttled");
        assert!(matches!(err, SourceError::Http { status: 429, .. }));
    }
}
