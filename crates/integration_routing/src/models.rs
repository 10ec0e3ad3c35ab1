//! Routing response models
//!
//! Turn-by-turn legs, maneuvers and edge attributes are large and change
//! often, so they are kept as raw JSON. Summaries and statuses are typed.

use domain::{Coordinate, ValhallaLongUnits};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Totals for a trip or a leg
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSummary {
    /// Travel time in seconds
    pub time: f64,
    /// Distance in the requested units
    pub length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_toll: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_highway: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_ferry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lon: Option<f64>,
}

/// One leg between two break locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub summary: RouteSummary,
    /// Encoded polyline of the leg (6 digits of precision)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maneuvers: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTrip {
    /// 0 on success
    #[serde(default)]
    pub status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<ValhallaLongUnits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub locations: Vec<Value>,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
    #[serde(default)]
    pub summary: RouteSummary,
}

/// Native route response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub trip: RouteTrip,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternates: Option<Vec<RouteResponse>>,
}

/// OSRM-compatible route response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsrmRouteResponse {
    /// `Ok` on success
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Value>,
    #[serde(default)]
    pub waypoints: Vec<Value>,
}

/// Either response flavour, depending on the requested `format`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteResponseFormat {
    Osrm(OsrmRouteResponse),
    Valhalla(RouteResponse),
}

impl RouteResponseFormat {
    /// The native response, if that is what the service sent
    #[must_use]
    pub const fn as_valhalla(&self) -> Option<&RouteResponse> {
        match self {
            Self::Valhalla(response) => Some(response),
            Self::Osrm(_) => None,
        }
    }

    #[must_use]
    pub const fn as_osrm(&self) -> Option<&OsrmRouteResponse> {
        match self {
            Self::Osrm(response) => Some(response),
            Self::Valhalla(_) => None,
        }
    }
}

/// One cell of a time/distance matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixDistance {
    pub from_index: usize,
    pub to_index: usize,
    /// Seconds; absent when the pair is unreachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub sources: Vec<Coordinate>,
    #[serde(default)]
    pub targets: Vec<Coordinate>,
    pub units: ValhallaLongUnits,
    /// One row per source, one column per target
    pub sources_to_targets: Vec<Vec<MatrixDistance>>,
}

impl MatrixResponse {
    /// Cell for a source/target pair
    #[must_use]
    pub fn get(&self, source: usize, target: usize) -> Option<&MatrixDistance> {
        self.sources_to_targets.get(source)?.get(target)
    }
}

/// Road edges near one input location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_lon: Option<f64>,
    /// `null` when nothing usable is nearby
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Value>>,
}

/// One object per requested location, in request order
pub type NearestRoadsResponse = Vec<LocateObject>;

/// GeoJSON feature collection of reachability contours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<IsochroneFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneFeature {
    #[serde(rename = "type", default)]
    pub feature_type: String,
    pub geometry: Value,
    /// Contour value, fill colors and opacity
    #[serde(default)]
    pub properties: Value,
}

/// Per-point result of a trace match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPoint {
    pub lat: f64,
    pub lon: f64,
    /// `matched`, `interpolated` or `unmatched`
    #[serde(rename = "type")]
    pub match_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_trace_point: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceAttributesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<ValhallaLongUnits>,
    #[serde(default)]
    pub admins: Vec<Value>,
    #[serde(default)]
    pub edges: Vec<Value>,
    #[serde(default)]
    pub matched_points: Vec<MatchedPoint>,
    /// Encoded polyline of the matched path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}
