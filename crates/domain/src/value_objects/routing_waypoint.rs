//! Routing waypoint value object

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// How the routing engine may treat a waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointType {
    /// Stop here; legs are split and U-turns are allowed
    Break,
    /// Pass through without splitting the leg
    Through,
    /// Pass through, allowing a U-turn
    Via,
    /// Split the leg but forbid U-turns
    BreakThrough,
}

/// Which side of the street the waypoint should be reached from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredSide {
    /// Same side as the waypoint
    Same,
    /// Opposite side of the waypoint
    Opposite,
    /// Either side
    Either,
}

/// A location plus the optional routing hints accepted by the route endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingWaypoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Waypoint type (engine default is `break`)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub waypoint_type: Option<WaypointType>,
    /// Preferred direction of travel in degrees from north
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<u16>,
    /// Tolerance for `heading` in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_tolerance: Option<u16>,
    /// Minimum number of nodes reachable from the snapped edge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_reachability: Option<u32>,
    /// Search radius in meters around the location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    /// Side of street preference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_side: Option<PreferredSide>,
    /// Display name echoed back in the trip locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RoutingWaypoint {
    /// Create a waypoint at a coordinate with no extra hints
    #[must_use]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self {
            lat: coordinate.lat(),
            lon: coordinate.lon(),
            waypoint_type: None,
            heading: None,
            heading_tolerance: None,
            minimum_reachability: None,
            radius: None,
            preferred_side: None,
            name: None,
        }
    }

    /// The waypoint location
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new_unchecked(self.lat, self.lon)
    }

    /// Set the waypoint type
    #[must_use]
    pub const fn with_type(mut self, waypoint_type: WaypointType) -> Self {
        self.waypoint_type = Some(waypoint_type);
        self
    }

    /// Set the preferred heading and its tolerance
    #[must_use]
    pub const fn with_heading(mut self, heading: u16, tolerance: Option<u16>) -> Self {
        self.heading = Some(heading);
        self.heading_tolerance = tolerance;
        self
    }

    /// Set the snapping radius in meters
    #[must_use]
    pub const fn with_radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set the preferred side of street
    #[must_use]
    pub const fn with_preferred_side(mut self, side: PreferredSide) -> Self {
        self.preferred_side = Some(side);
        self
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<Coordinate> for RoutingWaypoint {
    fn from(coordinate: Coordinate) -> Self {
        Self::new(coordinate)
    }
}
