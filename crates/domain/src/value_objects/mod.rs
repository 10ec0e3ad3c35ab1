//! Value Objects - Immutable, identity-less geographic primitives

mod coordinate;
mod routing_waypoint;
mod units;

pub use coordinate::Coordinate;
pub use routing_waypoint::{PreferredSide, RoutingWaypoint, WaypointType};
pub use units::{DistanceUnit, ValhallaLanguage, ValhallaLongUnits};
