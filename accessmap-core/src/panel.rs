//! Widget chrome outside the map and the list: the load trigger, the
//! category control and user-visible notices.

use std::fmt;

/// Notice shown after a failed refresh.
pub const FETCH_FAILED_NOTICE: &str = "Temporary server issue - showing empty results";
/// Notice shown when a load is requested for an unusable center.
pub const INVALID_LOCATION_NOTICE: &str = "Invalid location";
/// Notice shown when geocoding found nothing.
pub const NOT_FOUND_NOTICE: &str = "Location not found";
/// Notice shown when geocoding failed in transport.
pub const SEARCH_FAILED_NOTICE: &str = "Error searching for location";
/// Notice shown when geolocation is unavailable.
pub const GEOLOCATION_DENIED_NOTICE: &str = "Location access denied or unavailable";
/// Notice shown after a confirmed report submission.
pub const REPORT_SUBMITTED_NOTICE: &str = "Report submitted successfully!";
/// Notice shown when stored reports could not be loaded.
pub const REPORTS_UNAVAILABLE_NOTICE: &str = "Could not load existing reports";

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// A recovered failure.
    Error,
}

/// A blocking, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Construct an informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Construct an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Controls the host renders around the map.
pub trait ControlPanel {
    /// Toggle the loading state of the load trigger.
    ///
    /// While loading the trigger is disabled and reads "Loading...".
    fn set_loading(&mut self, loading: bool);

    /// Replace the options of the category control.
    ///
    /// The host keeps its own "All Types" entry ahead of `categories`.
    fn set_category_options(&mut self, categories: &[String]);

    /// Surface a notice to the user.
    fn notify(&mut self, notice: Notice);
}
