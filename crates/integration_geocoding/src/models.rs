//! Geocoding response models
//!
//! Only the fields callers commonly read are typed. The service returns a
//! GeoJSON `FeatureCollection`; anything not modeled here is ignored on
//! decode, and open-ended sections are kept as raw JSON.

use domain::Coordinate;
use serde::{Deserialize, Serialize};

/// GeoJSON point geometry (`coordinates` are `[lon, lat]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: Vec<f64>,
}

impl PointGeometry {
    /// The point as a validated coordinate
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self.coordinates.as_slice() {
            [lon, lat, ..] => Coordinate::new(*lat, *lon).ok(),
            _ => None,
        }
    }
}

/// Result of a v1 geocoding operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<PeliasFeature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    /// Query echo and engine metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoding: Option<serde_json::Value>,
}

impl GeocodeResponse {
    /// Properties of the best-ranked feature
    #[must_use]
    pub fn first_properties(&self) -> Option<&PeliasProperties> {
        self.features.first().and_then(|f| f.properties.as_ref())
    }
}

/// One v1 result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeliasFeature {
    #[serde(rename = "type", default)]
    pub feature_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PointGeometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PeliasProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

/// v1 feature properties
///
/// `layer` and `source` stay strings: the service may answer with layers
/// that cannot be requested as filters (for example `marinearea` from
/// reverse lookups at sea).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeliasProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub housenumber: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postalcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Distance from the query point in kilometers (reverse only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addendum: Option<serde_json::Value>,
}

/// Result of a v2 geocoding operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponseV2 {
    #[serde(default)]
    pub features: Vec<FeatureV2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

/// One v2 result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureV2 {
    #[serde(rename = "type", default)]
    pub feature_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PointGeometry>,
    pub properties: FeaturePropertiesV2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

/// v2 feature properties
///
/// `context` is only filled in by operations that resolve the full
/// administrative hierarchy (autocomplete leaves it out).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturePropertiesV2 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    pub layer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address_lines: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coarse_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addendum: Option<serde_json::Value>,
}

/// Administrative hierarchy of a v2 result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    #[serde(rename = "iso_3166_a2", skip_serializing_if = "Option::is_none")]
    pub iso_3166_a2: Option<String>,
    #[serde(rename = "iso_3166_a3", skip_serializing_if = "Option::is_none")]
    pub iso_3166_a3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whosonfirst: Option<WofContext>,
}

/// Who's On First hierarchy levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WofContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<WofContextComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<WofContextComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<WofContextComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<WofContextComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<WofContextComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WofContextComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}
