//! JSON shapes exchanged with the amenity and report backend.
//!
//! Parsing works on the raw status code and body so the rules can be tested
//! without a network:
//!
//! - a non-success status is a failure whose message comes from the body's
//!   `error` field, else `Server error: <status>`;
//! - an object carrying `error` is a failure even with a success status;
//! - any other non-array body is rejected as an invalid response.

use accessmap_core::location::from_lat_lon;
use accessmap_core::{Amenity, Report, SourceError, Tags};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when a body is neither an array nor an error object.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server";

/// Fallback reason for a refused submission without an `error` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

const SUCCESS_STATUS: &str = "success";

/// A latitude/longitude pair as sent by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// One amenity as returned by `GET /api/amenities`.
///
/// Nodes carry `lat`/`lon`; ways and relations carry a `center`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AmenityRecord {
    /// Direct latitude.
    pub lat: Option<f64>,
    /// Direct longitude.
    pub lon: Option<f64>,
    /// Centroid for area features.
    pub center: Option<LatLon>,
    /// OSM tags.
    #[serde(default)]
    pub tags: Tags,
}

impl From<AmenityRecord> for Amenity {
    fn from(record: AmenityRecord) -> Self {
        let point = record.lat.zip(record.lon).map(|(lat, lon)| from_lat_lon(lat, lon));
        let center = record.center.map(|c| from_lat_lon(c.lat, c.lon));
        Self::new(point, center, record.tags)
    }
}

/// A report as listed by `GET /api/reports` and sent by `POST /api/reports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Issue category.
    pub issue_type: String,
    /// Free-text details.
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Report> for ReportRecord {
    fn from(report: &Report) -> Self {
        Self {
            lat: report.position.y,
            lon: report.position.x,
            issue_type: report.issue_type.clone(),
            description: Some(report.description.clone().unwrap_or_default()),
        }
    }
}

/// Reply to `POST /api/reports`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SubmitResponse {
    /// `"success"` on acceptance.
    #[serde(default)]
    pub status: Option<String>,
    /// Reason for a refusal.
    #[serde(default)]
    pub error: Option<String>,
}

impl SubmitResponse {
    /// Return `true` when the backend accepted the report.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }
}

fn parse_json(body: &str) -> Result<Value, SourceError> {
    serde_json::from_str(body).map_err(|err| SourceError::Parse {
        message: err.to_string(),
    })
}

fn error_field(value: &Value) -> Option<String> {
    value.get("error").and_then(Value::as_str).map(str::to_owned)
}

fn check_status(url: &str, status: u16, body: &str) -> Result<(), SourceError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_field)
        .unwrap_or_else(|| format!("Server error: {status}"));
    Err(SourceError::Http {
        url: url.to_owned(),
        status,
        message,
    })
}

fn expect_array(value: Value) -> Result<Vec<Value>, SourceError> {
    if let Some(message) = error_field(&value) {
        return Err(SourceError::Service { message });
    }
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(SourceError::Parse {
            message: INVALID_RESPONSE_MESSAGE.to_owned(),
        }),
    }
}

/// Parse an amenity query response.
///
/// Array elements that do not look like amenities are skipped with a
/// warning.
///
/// # Errors
///
/// Returns [`SourceError::Http`], [`SourceError::Service`] or
/// [`SourceError::Parse`] per the module rules.
pub fn parse_amenities(url: &str, status: u16, body: &str) -> Result<Vec<Amenity>, SourceError> {
    check_status(url, status, body)?;
    let items = expect_array(parse_json(body)?)?;
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<AmenityRecord>(item) {
            Ok(record) => Some(Amenity::from(record)),
            Err(err) => {
                warn!("skipping malformed amenity record: {err}");
                None
            }
        })
        .collect())
}

/// Parse a report listing.
///
/// Records that fail validation are skipped with a warning.
///
/// # Errors
///
/// Same rules as [`parse_amenities`].
pub fn parse_reports(url: &str, status: u16, body: &str) -> Result<Vec<Report>, SourceError> {
    check_status(url, status, body)?;
    let items = expect_array(parse_json(body)?)?;
    Ok(items
        .into_iter()
        .filter_map(|item| {
            let record = serde_json::from_value::<ReportRecord>(item)
                .map_err(|err| warn!("skipping malformed report record: {err}"))
                .ok()?;
            Report::new(
                from_lat_lon(record.lat, record.lon),
                record.issue_type,
                record.description,
            )
            .map_err(|err| warn!("skipping invalid report: {err}"))
            .ok()
        })
        .collect())
}

/// Interpret the reply to a submission.
///
/// The reply body decides the outcome regardless of the status code.
///
/// # Errors
///
/// Returns [`SourceError::Rejected`] when the body does not confirm success,
/// or [`SourceError::Parse`] when it is not JSON.
pub fn parse_submission(body: &str) -> Result<(), SourceError> {
    let response: SubmitResponse = serde_json::from_str(body).map_err(|err| SourceError::Parse {
        message: err.to_string(),
    })?;
    if response.is_success() {
        return Ok(());
    }
    Err(SourceError::Rejected {
        message: response
            .error
            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessmap_core::Accessibility;
    use rstest::rstest;

    const URL: &str = "http://localhost:5000/api/amenities";

    #[rstest]
    fn parses_nodes_and_areas() {
        let body = r#"[
            {"lat": -1.95, "lon": 30.06, "tags": {"name": "Cafe A", "amenity": "cafe", "wheelchair": "yes"}},
            {"center": {"lat": -1.96, "lon": 30.07}, "tags": {"amenity": "hospital"}}
        ]"#;

        let amenities = parse_amenities(URL, 200, body).expect("valid body");

        assert_eq!(amenities.len(), 2);
        assert_eq!(amenities[0].position(), Some(from_lat_lon(-1.95, 30.06)));
        assert_eq!(amenities[0].accessibility(), Accessibility::Accessible);
        assert_eq!(amenities[1].position(), Some(from_lat_lon(-1.96, 30.07)));
        assert_eq!(amenities[1].category(), "hospital");
    }

    #[rstest]
    fn skips_malformed_elements() {
        let body = r#"[{"lat": "north", "tags": {}}, {"lat": 1.0, "lon": 2.0}]"#;

        let amenities = parse_amenities(URL, 200, body).expect("valid body");

        assert_eq!(amenities.len(), 1);
        assert!(amenities[0].tags.is_empty());
    }

    #[rstest]
    fn error_object_is_a_service_error() {
        let err = parse_amenities(URL, 200, r#"{"error": "Overpass timed out"}"#)
            .expect_err("error payload");
        assert_eq!(
            err,
            SourceError::Service {
                message: "Overpass timed out".to_owned()
            }
        );
    }

    #[rstest]
    #[case(r#"{"elements": []}"#)]
    #[case("42")]
    #[case("null")]
    fn non_array_body_is_invalid(#[case] body: &str) {
        let err = parse_amenities(URL, 200, body).expect_err("non-array body");
        assert_eq!(
            err,
            SourceError::Parse {
                message: INVALID_RESPONSE_MESSAGE.to_owned()
            }
        );
    }

    #[rstest]
    #[case(r#"{"error": "Missing parameters"}"#, "Missing parameters")]
    #[case("<html>Internal Server Error</html>", "Server error: 500")]
    #[case("{}", "Server error: 500")]
    fn failed_status_uses_body_error(#[case] body: &str, #[case] expected: &str) {
        let err = parse_amenities(URL, 500, body).expect_err("server error");
        assert_eq!(
            err,
            SourceError::Http {
                url: URL.to_owned(),
                status: 500,
                message: expected.to_owned(),
            }
        );
    }

    #[rstest]
    fn unparsable_success_body_is_a_parse_error() {
        let err = parse_amenities(URL, 200, "not json").expect_err("garbage");
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[rstest]
    fn parses_reports_and_drops_invalid_ones() {
        let body = r#"[
            {"lat": -1.94, "lon": 30.12, "issue_type": "curb", "description": ""},
            {"lat": -1.95, "lon": 30.13, "issue_type": "ramp", "description": "Too steep"},
            {"lat": 95.0, "lon": 30.13, "issue_type": "ramp"},
            {"lat": -1.95, "lon": 30.13, "issue_type": "  "}
        ]"#;

        let reports = parse_reports("http://localhost:5000/api/reports", 200, body)
            .expect("valid body");

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].description, None);
        assert_eq!(reports[1].description.as_deref(), Some("Too steep"));
    }

    #[rstest]
    fn report_record_always_carries_a_description() {
        let report = Report::new(from_lat_lon(-1.94, 30.12), "curb", None).expect("valid report");

        let json = serde_json::to_value(ReportRecord::from(&report)).expect("serialisable");

        assert_eq!(
            json,
            serde_json::json!({
                "lat": -1.94,
                "lon": 30.12,
                "issue_type": "curb",
                "description": ""
            })
        );
    }

    #[rstest]
    #[case(r#"{"status": "success"}"#, Ok(()))]
    #[case(
        r#"{"error": "Invalid coordinates"}"#,
        Err(SourceError::Rejected { message: "Invalid coordinates".to_owned() })
    )]
    #[case(
        r#"{"status": "queued"}"#,
        Err(SourceError::Rejected { message: UNKNOWN_ERROR_MESSAGE.to_owned() })
    )]
    fn interprets_submission_replies(#[case] body: &str, #[case] expected: Result<(), SourceError>) {
        assert_eq!(parse_submission(body), expected);
    }

    #[rstest]
    fn non_json_submission_reply_is_a_parse_error() {
        assert!(matches!(
            parse_submission("<html>502 Bad Gateway</html>"),
            Err(SourceError::Parse { .. })
        ));
    }
}
