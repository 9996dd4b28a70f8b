//! Layered arguments and resolved configuration for every subcommand.
//!
//! Each subcommand owns an `OrthoConfig` argument struct so values can come
//! from CLI flags, `ACCESSMAP_CMDS_<COMMAND>_<FIELD>` environment variables
//! or a configuration file. Conversion into the resolved config fills in
//! defaults and rejects unusable values before any network client exists.

use std::time::Duration;

use accessmap_core::location::{from_lat_lon, is_valid_center};
use accessmap_core::{FilterCriteria, MapSettings, TagFilter};
use accessmap_data::{
    BackendConfig, DEFAULT_BACKEND_URL, DEFAULT_NOMINATIM_URL, DEFAULT_TIMEOUT_SECS,
    FixedGeolocator, HttpBackend, NominatimConfig, NominatimGeocoder,
};
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::CliError;

pub(crate) const ARG_BACKEND_URL: &str = "backend-url";
pub(crate) const ARG_GEOCODER_URL: &str = "geocoder-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_RADIUS: &str = "radius";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_USER_LAT: &str = "user-lat";
pub(crate) const ARG_USER_LON: &str = "user-lon";
pub(crate) const ARG_WHEELCHAIR: &str = "wheelchair";
pub(crate) const ARG_CATEGORY: &str = "category";
pub(crate) const ARG_NAME: &str = "name";
pub(crate) const ARG_ISSUE_TYPE: &str = "issue-type";
pub(crate) const ARG_DESCRIPTION: &str = "description";
pub(crate) const ARG_QUERY: &str = "query";
pub(crate) const ENV_REPORT_ISSUE_TYPE: &str = "ACCESSMAP_CMDS_REPORT_ISSUE_TYPE";
pub(crate) const ENV_SEARCH_QUERY: &str = "ACCESSMAP_CMDS_SEARCH_QUERY";

/// Where the adapters connect and how long they wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoints {
    pub(crate) backend_url: String,
    pub(crate) geocoder_url: String,
    pub(crate) timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
            geocoder_url: DEFAULT_NOMINATIM_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Endpoints {
    fn resolve(
        backend_url: Option<String>,
        geocoder_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, CliError> {
        let defaults = Self::default();
        let timeout = match timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIMEOUT_SECS,
                    reason: "must be at least one second".to_owned(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };
        Ok(Self {
            backend_url: non_blank(backend_url, ARG_BACKEND_URL)?.unwrap_or(defaults.backend_url),
            geocoder_url: non_blank(geocoder_url, ARG_GEOCODER_URL)?
                .unwrap_or(defaults.geocoder_url),
            timeout,
        })
    }

    pub(crate) fn backend(&self) -> Result<HttpBackend, CliError> {
        let config = BackendConfig::new(self.backend_url.clone()).with_timeout(self.timeout);
        Ok(HttpBackend::with_config(config)?)
    }

    pub(crate) fn geocoder(&self) -> Result<NominatimGeocoder, CliError> {
        let config = NominatimConfig::new(self.geocoder_url.clone()).with_timeout(self.timeout);
        Ok(NominatimGeocoder::with_config(config)?)
    }
}

fn non_blank(value: Option<String>, field: &'static str) -> Result<Option<String>, CliError> {
    match value {
        Some(text) if text.trim().is_empty() => Err(CliError::InvalidArgument {
            field,
            reason: "must not be blank".to_owned(),
        }),
        other => Ok(other),
    }
}

/// Resolve an optional latitude/longitude pair; both or neither must be set.
fn coordinate(
    lat: Option<f64>,
    lon: Option<f64>,
    fields: (&'static str, &'static str),
) -> Result<Option<Coord<f64>>, CliError> {
    match (lat, lon) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => {
            let position = from_lat_lon(lat, lon);
            if is_valid_center(position) {
                Ok(Some(position))
            } else {
                Err(CliError::InvalidArgument {
                    field: fields.0,
                    reason: format!("({lat}, {lon}) is not a valid WGS84 position"),
                })
            }
        }
        (Some(_), None) => Err(CliError::InvalidArgument {
            field: fields.1,
            reason: format!("required when --{} is set", fields.0),
        }),
        (None, Some(_)) => Err(CliError::InvalidArgument {
            field: fields.0,
            reason: format!("required when --{} is set", fields.1),
        }),
    }
}

fn settings(center: Option<Coord<f64>>, radius: Option<u32>) -> Result<MapSettings, CliError> {
    let mut settings = MapSettings::default();
    if let Some(center) = center {
        settings = settings.with_initial_center(center);
    }
    match radius {
        Some(0) => Err(CliError::InvalidArgument {
            field: ARG_RADIUS,
            reason: "must be at least one metre".to_owned(),
        }),
        Some(radius) => Ok(settings.with_search_radius(radius)),
        None => Ok(settings),
    }
}

/// CLI arguments for the `amenities` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch amenities around a point from the backend and print \
                 the filtered list with its markers. Filters take the same \
                 values as the widget's controls; `all` disables one.",
    about = "List amenities around a point"
)]
#[ortho_config(prefix = "ACCESSMAP")]
pub(crate) struct AmenitiesArgs {
    /// Latitude of the search center.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the search center.
    #[arg(long = ARG_LON, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Search radius in metres.
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<u32>,
    /// Wheelchair filter (yes, no, limited, unknown or all).
    #[arg(long = ARG_WHEELCHAIR, value_name = "value")]
    #[serde(default)]
    pub(crate) wheelchair: Option<String>,
    /// Category filter (an amenity type or all).
    #[arg(long = ARG_CATEGORY, value_name = "value")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Case-insensitive name substring.
    #[arg(long = ARG_NAME, value_name = "text")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Base URL of the amenity backend.
    #[arg(long = ARG_BACKEND_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) backend_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl AmenitiesArgs {
    pub(crate) fn into_config(self) -> Result<AmenitiesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AmenitiesConfig::try_from(merged)
    }
}

/// Resolved `amenities` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AmenitiesConfig {
    pub(crate) settings: MapSettings,
    pub(crate) criteria: FilterCriteria,
    pub(crate) endpoints: Endpoints,
}

impl TryFrom<AmenitiesArgs> for AmenitiesConfig {
    type Error = CliError;

    fn try_from(args: AmenitiesArgs) -> Result<Self, Self::Error> {
        let center = coordinate(args.lat, args.lon, (ARG_LAT, ARG_LON))?;
        let settings = settings(center, args.radius)?;
        let mut criteria = FilterCriteria::default();
        if let Some(wheelchair) = args.wheelchair {
            criteria = criteria.with_wheelchair(TagFilter::from(wheelchair.as_str()));
        }
        if let Some(category) = args.category {
            criteria = criteria.with_category(TagFilter::from(category.as_str()));
        }
        if let Some(name) = args.name {
            criteria = criteria.with_name_query(name);
        }
        let endpoints = Endpoints::resolve(args.backend_url, None, args.timeout_secs)?;
        Ok(Self {
            settings,
            criteria,
            endpoints,
        })
    }
}

/// CLI arguments for the `reports` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List the accessibility reports stored by the backend")]
#[ortho_config(prefix = "ACCESSMAP")]
pub(crate) struct ReportsArgs {
    /// Base URL of the report backend.
    #[arg(long = ARG_BACKEND_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) backend_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ReportsArgs {
    pub(crate) fn into_config(self) -> Result<Endpoints, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Endpoints::try_from(merged)
    }
}

impl TryFrom<ReportsArgs> for Endpoints {
    type Error = CliError;

    fn try_from(args: ReportsArgs) -> Result<Self, Self::Error> {
        Self::resolve(args.backend_url, None, args.timeout_secs)
    }
}

/// CLI arguments for the `report` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Submit an accessibility issue at a point. The report is \
                 placed where the map is centered, which defaults to the \
                 widget's initial view.",
    about = "Report an accessibility issue"
)]
#[ortho_config(prefix = "ACCESSMAP")]
pub(crate) struct ReportArgs {
    /// Issue category (e.g. `steps`, `no_ramp`).
    #[arg(long = ARG_ISSUE_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) issue_type: Option<String>,
    /// Free-text details.
    #[arg(long = ARG_DESCRIPTION, value_name = "text")]
    #[serde(default)]
    pub(crate) description: Option<String>,
    /// Latitude of the issue.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the issue.
    #[arg(long = ARG_LON, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Base URL of the report backend.
    #[arg(long = ARG_BACKEND_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) backend_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ReportArgs {
    pub(crate) fn into_config(self) -> Result<ReportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReportConfig::try_from(merged)
    }
}

/// Resolved `report` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReportConfig {
    pub(crate) settings: MapSettings,
    pub(crate) issue_type: String,
    pub(crate) description: Option<String>,
    pub(crate) endpoints: Endpoints,
}

impl TryFrom<ReportArgs> for ReportConfig {
    type Error = CliError;

    fn try_from(args: ReportArgs) -> Result<Self, Self::Error> {
        let issue_type = args.issue_type.ok_or(CliError::MissingArgument {
            field: ARG_ISSUE_TYPE,
            env: ENV_REPORT_ISSUE_TYPE,
        })?;
        let center = coordinate(args.lat, args.lon, (ARG_LAT, ARG_LON))?;
        Ok(Self {
            settings: settings(center, None)?,
            issue_type,
            description: args.description,
            endpoints: Endpoints::resolve(args.backend_url, None, args.timeout_secs)?,
        })
    }
}

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Geocode a place name")]
#[ortho_config(prefix = "ACCESSMAP")]
pub(crate) struct SearchArgs {
    /// Place to look up.
    #[arg(value_name = ARG_QUERY)]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Base URL of the Nominatim instance.
    #[arg(long = ARG_GEOCODER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) query: String,
    pub(crate) endpoints: Endpoints,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let query = args
            .query
            .filter(|query| !query.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_QUERY,
                env: ENV_SEARCH_QUERY,
            })?;
        Ok(Self {
            query,
            endpoints: Endpoints::resolve(None, args.geocoder_url, args.timeout_secs)?,
        })
    }
}

/// CLI arguments for the `session` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run the widget interactively: commands read from stdin \
                 stand in for map drags, filter changes, list clicks, \
                 searches and report submissions. Type `help` for the \
                 command list.",
    about = "Drive the map widget from text commands"
)]
#[ortho_config(prefix = "ACCESSMAP")]
pub(crate) struct SessionArgs {
    /// Latitude of the initial view.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the initial view.
    #[arg(long = ARG_LON, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Search radius in metres.
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<u32>,
    /// Latitude reported by `locate`.
    #[arg(long = ARG_USER_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) user_lat: Option<f64>,
    /// Longitude reported by `locate`.
    #[arg(long = ARG_USER_LON, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) user_lon: Option<f64>,
    /// Base URL of the amenity and report backend.
    #[arg(long = ARG_BACKEND_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) backend_url: Option<String>,
    /// Base URL of the Nominatim instance.
    #[arg(long = ARG_GEOCODER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl SessionArgs {
    pub(crate) fn into_config(self) -> Result<SessionConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SessionConfig::try_from(merged)
    }
}

/// Resolved `session` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SessionConfig {
    pub(crate) settings: MapSettings,
    pub(crate) user_position: Option<Coord<f64>>,
    pub(crate) endpoints: Endpoints,
}

impl SessionConfig {
    /// Geolocator answering `locate`; without a configured position it
    /// behaves like a device that refuses access.
    pub(crate) const fn geolocator(&self) -> FixedGeolocator {
        match self.user_position {
            Some(position) => FixedGeolocator::at(position),
            None => FixedGeolocator::unavailable(),
        }
    }
}

impl TryFrom<SessionArgs> for SessionConfig {
    type Error = CliError;

    fn try_from(args: SessionArgs) -> Result<Self, Self::Error> {
        let center = coordinate(args.lat, args.lon, (ARG_LAT, ARG_LON))?;
        let user_position = coordinate(args.user_lat, args.user_lon, (ARG_USER_LAT, ARG_USER_LON))?;
        Ok(Self {
            settings: settings(center, args.radius)?,
            user_position,
            endpoints: Endpoints::resolve(args.backend_url, args.geocoder_url, args.timeout_secs)?,
        })
    }
}

#[cfg(test)]
pub(crate) fn session_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SessionConfig, CliError> {
    let merged = SessionArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SessionConfig::try_from(merged)
}
