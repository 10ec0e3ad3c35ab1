//! Geographic coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A WGS84 latitude/longitude pair
///
/// Shared by the geocoding, routing and geospatial surfaces. The pair is
/// validated on construction and on deserialization, so a `Coordinate`
/// held anywhere in the workspace is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    lat: f64,
    /// Longitude in degrees (-180 to 180)
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = DomainError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in
    /// [-90, 90] or longitude is not in [-180, 180] (NaN is rejected too).
    pub fn new(lat: f64, lon: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::InvalidCoordinates { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Create a coordinate without validation (for compile-time constants)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Get the latitude
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Get the longitude
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}
