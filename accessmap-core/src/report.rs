//! Crowd-sourced accessibility issue reports.

use geo::Coord;
use thiserror::Error;

use crate::location;

/// A user-submitted note flagging an accessibility issue at a location.
///
/// # Examples
/// ```
/// use accessmap_core::{Report, location::from_lat_lon};
///
/// # fn main() -> Result<(), accessmap_core::ReportError> {
/// let report = Report::new(from_lat_lon(-1.94, 30.12), "blocked_ramp", Some("Ramp chained off".into()))?;
/// assert_eq!(report.issue_type, "blocked_ramp");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Where the issue was observed.
    pub position: Coord<f64>,
    /// Issue category chosen by the reporter.
    pub issue_type: String,
    /// Optional free-text details.
    pub description: Option<String>,
}

/// Errors returned by [`Report::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// The position had a non-finite or out-of-range component.
    #[error("report location ({lat}, {lon}) is not a valid coordinate")]
    InvalidLocation {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },
    /// No issue type was chosen.
    #[error("report must name an issue type")]
    MissingIssueType,
}

impl Report {
    /// Validate and construct a [`Report`].
    ///
    /// Blank descriptions are normalised to `None`; the issue type is
    /// trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidLocation`] for unusable coordinates and
    /// [`ReportError::MissingIssueType`] for a blank issue type.
    pub fn new(
        position: Coord<f64>,
        issue_type: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ReportError> {
        if !location::is_valid_center(position) {
            return Err(ReportError::InvalidLocation {
                lat: position.y,
                lon: position.x,
            });
        }
        let raw_issue: String = issue_type.into();
        let trimmed_issue = raw_issue.trim();
        if trimmed_issue.is_empty() {
            return Err(ReportError::MissingIssueType);
        }
        let description = description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Ok(Self {
            position,
            issue_type: trimmed_issue.to_owned(),
            description,
        })
    }
}

/// The open report form.
///
/// The location defaults to the viewport center captured when the form was
/// opened; the reporter may edit every field before submitting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportDraft {
    /// Latitude field.
    pub lat: f64,
    /// Longitude field.
    pub lon: f64,
    /// Issue type field.
    pub issue_type: String,
    /// Description field.
    pub description: String,
}

impl ReportDraft {
    /// Start a blank draft at `position`.
    #[must_use]
    pub fn at(position: Coord<f64>) -> Self {
        Self {
            lat: position.y,
            lon: position.x,
            ..Self::default()
        }
    }

    /// Fill in the issue type.
    #[must_use]
    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    /// Fill in the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate the form into a [`Report`].
    ///
    /// # Errors
    ///
    /// Propagates [`Report::new`] validation failures.
    pub fn to_report(&self) -> Result<Report, ReportError> {
        Report::new(
            location::from_lat_lon(self.lat, self.lon),
            self.issue_type.as_str(),
            Some(self.description.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::from_lat_lon;
    use rstest::rstest;

    #[rstest]
    fn blank_description_becomes_none() {
        let report = Report::new(from_lat_lon(0.0, 0.0), "curb", Some("   ".into()));
        assert_eq!(report.map(|r| r.description), Ok(None));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_issue_type(#[case] issue_type: &str) {
        let result = Report::new(from_lat_lon(0.0, 0.0), issue_type, None);
        assert_eq!(result, Err(ReportError::MissingIssueType));
    }

    #[rstest]
    fn rejects_non_finite_location() {
        let result = Report::new(from_lat_lon(f64::NAN, 0.0), "curb", None);
        assert!(matches!(result, Err(ReportError::InvalidLocation { .. })));
    }

    #[rstest]
    fn draft_keeps_captured_location() {
        let draft = ReportDraft::at(from_lat_lon(-1.9434, 30.1288))
            .with_issue_type("stairs_only")
            .with_description("No lift at the entrance");
        let report = draft.to_report().unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(report.position, from_lat_lon(-1.9434, 30.1288));
        assert_eq!(report.description.as_deref(), Some("No lift at the entrance"));
    }
}
