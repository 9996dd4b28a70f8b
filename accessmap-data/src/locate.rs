//! Geolocation for hosts without a positioning service.

use accessmap_core::location::is_valid_center;
use accessmap_core::{GeolocationError, Geolocator};
use async_trait::async_trait;
use geo::Coord;

/// [`Geolocator`] reporting a position supplied up front.
///
/// Without a position it behaves like a platform that cannot locate the
/// user.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedGeolocator {
    position: Option<Coord<f64>>,
}

impl FixedGeolocator {
    /// Report `position` on every request.
    #[must_use]
    pub const fn at(position: Coord<f64>) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Report no position.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { position: None }
    }
}

#[async_trait(?Send)]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coord<f64>, GeolocationError> {
        self.position
            .filter(|position| is_valid_center(*position))
            .ok_or(GeolocationError::Unavailable)
    }
}
