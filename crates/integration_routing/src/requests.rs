//! Routing request bodies
//!
//! Each constructor enforces the field-presence rules of its operation, so
//! a request that exists is one the service can at least parse.

use domain::{Coordinate, DistanceUnit, DomainError, RoutingWaypoint, ValhallaLanguage};
use serde::{Deserialize, Serialize};

use crate::costing::Costing;

/// How much narrative the service returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionsType {
    None,
    Maneuvers,
    Instructions,
}

/// Response flavour for route-like operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteFormat {
    /// Native trip format
    Json,
    /// OSRM-compatible format
    Osrm,
}

/// Point-to-point route through two or more waypoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    locations: Vec<RoutingWaypoint>,
    #[serde(flatten)]
    pub costing: Costing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<DistanceUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<ValhallaLanguage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions_type: Option<DirectionsType>,
    /// Number of alternate routes wanted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternates: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<RouteFormat>,
}

impl RouteRequest {
    /// # Errors
    ///
    /// Returns `DomainError::TooFewElements` for fewer than two locations.
    pub fn new(
        locations: impl IntoIterator<Item = impl Into<RoutingWaypoint>>,
        costing: Costing,
    ) -> Result<Self, DomainError> {
        let locations: Vec<RoutingWaypoint> = locations.into_iter().map(Into::into).collect();
        DomainError::require_len("locations", &locations, 2)?;
        Ok(Self {
            id: None,
            locations,
            costing,
            units: None,
            language: None,
            directions_type: None,
            alternates: None,
            format: None,
        })
    }

    #[must_use]
    pub fn locations(&self) -> &[RoutingWaypoint] {
        &self.locations
    }

    /// Echoed back in the response
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_units(mut self, units: DistanceUnit) -> Self {
        self.units = Some(units);
        self
    }

    #[must_use]
    pub const fn with_language(mut self, language: ValhallaLanguage) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub const fn with_directions_type(mut self, directions_type: DirectionsType) -> Self {
        self.directions_type = Some(directions_type);
        self
    }

    #[must_use]
    pub const fn with_alternates(mut self, alternates: u32) -> Self {
        self.alternates = Some(alternates);
        self
    }

    #[must_use]
    pub const fn with_format(mut self, format: RouteFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Best visiting order for a set of stops
///
/// The first and last locations are fixed; the ones in between are reordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedRouteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    locations: Vec<Coordinate>,
    #[serde(flatten)]
    pub costing: Costing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<DistanceUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<ValhallaLanguage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions_type: Option<DirectionsType>,
}

impl OptimizedRouteRequest {
    /// # Errors
    ///
    /// Returns `DomainError::TooFewElements` for fewer than two locations.
    pub fn new(locations: Vec<Coordinate>, costing: Costing) -> Result<Self, DomainError> {
        DomainError::require_len("locations", &locations, 2)?;
        Ok(Self {
            id: None,
            locations,
            costing,
            units: None,
            language: None,
            directions_type: None,
        })
    }

    #[must_use]
    pub fn locations(&self) -> &[Coordinate] {
        &self.locations
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_units(mut self, units: DistanceUnit) -> Self {
        self.units = Some(units);
        self
    }

    #[must_use]
    pub const fn with_language(mut self, language: ValhallaLanguage) -> Self {
        self.language = Some(language);
        self
    }
}

/// Travel time and distance between every source and every target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    sources: Vec<Coordinate>,
    targets: Vec<Coordinate>,
    #[serde(flatten)]
    pub costing: Costing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<DistanceUnit>,
}

impl MatrixRequest {
    /// # Errors
    ///
    /// Returns `DomainError::TooFewElements` if either list is empty.
    pub fn new(
        sources: Vec<Coordinate>,
        targets: Vec<Coordinate>,
        costing: Costing,
    ) -> Result<Self, DomainError> {
        DomainError::require_len("sources", &sources, 1)?;
        DomainError::require_len("targets", &targets, 1)?;
        Ok(Self {
            id: None,
            sources,
            targets,
            costing,
            units: None,
        })
    }

    #[must_use]
    pub fn sources(&self) -> &[Coordinate] {
        &self.sources
    }

    #[must_use]
    pub fn targets(&self) -> &[Coordinate] {
        &self.targets
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_units(mut self, units: DistanceUnit) -> Self {
        self.units = Some(units);
        self
    }
}

/// Road segments closest to each location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestRoadsRequest {
    locations: Vec<Coordinate>,
    #[serde(flatten)]
    pub costing: Option<Costing>,
    /// Include full edge details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl NearestRoadsRequest {
    /// # Errors
    ///
    /// Returns `DomainError::TooFewElements` if no locations are given.
    pub fn new(locations: Vec<Coordinate>) -> Result<Self, DomainError> {
        DomainError::require_len("locations", &locations, 1)?;
        Ok(Self {
            locations,
            costing: None,
            verbose: None,
        })
    }

    #[must_use]
    pub fn locations(&self) -> &[Coordinate] {
        &self.locations
    }

    /// Only consider roads usable by this costing model
    #[must_use]
    pub fn with_costing(mut self, costing: Costing) -> Self {
        self.costing = Some(costing);
        self
    }

    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }
}

/// One reachability threshold of an isochrone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    /// Minutes of travel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    /// Kilometers of travel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Hex RGB without the leading `#`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Contour {
    /// Contour reached within `minutes`
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive value.
    pub fn time(minutes: f64) -> Result<Self, DomainError> {
        positive("contour time", minutes)?;
        Ok(Self {
            time: Some(minutes),
            distance: None,
            color: None,
        })
    }

    /// Contour reached within `km`
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive value.
    pub fn distance(km: f64) -> Result<Self, DomainError> {
        positive("contour distance", km)?;
        Ok(Self {
            time: None,
            distance: Some(km),
            color: None,
        })
    }

    /// Set the fill color (`"aabbcc"`)
    ///
    /// # Errors
    ///
    /// Returns an error unless the color is six hex digits.
    pub fn with_color(mut self, color: impl Into<String>) -> Result<Self, DomainError> {
        let color = color.into();
        if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::ValidationError(format!(
                "contour color must be six hex digits, got '{color}'"
            )));
        }
        self.color = Some(color);
        Ok(self)
    }
}

fn positive(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::ValidationError(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Areas reachable from a location within the given contours
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsochroneRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    locations: Vec<Coordinate>,
    #[serde(flatten)]
    pub costing: Costing,
    contours: Vec<Contour>,
    /// Return polygons instead of lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygons: Option<bool>,
    /// Remove smaller contours, 0 to 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denoise: Option<f64>,
    /// Generalization tolerance in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generalize: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_locations: Option<bool>,
}

impl IsochroneRequest {
    /// # Errors
    ///
    /// Returns `DomainError::TooFewElements` if no contour is given, or a
    /// conflict error if contours mix time and distance.
    pub fn new(
        location: Coordinate,
        costing: Costing,
        contours: Vec<Contour>,
    ) -> Result<Self, DomainError> {
        DomainError::require_len("contours", &contours, 1)?;
        let by_time = contours.iter().filter(|c| c.time.is_some()).count();
        if by_time != 0 && by_time != contours.len() {
            return Err(DomainError::Conflict(
                "contours must all be time based or all be distance based".to_string(),
            ));
        }
        Ok(Self {
            id: None,
            locations: vec![location],
            costing,
            contours,
            polygons: None,
            denoise: None,
            generalize: None,
            show_locations: None,
        })
    }

    #[must_use]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_polygons(mut self, polygons: bool) -> Self {
        self.polygons = Some(polygons);
        self
    }

    #[must_use]
    pub const fn with_denoise(mut self, denoise: f64) -> Self {
        self.denoise = Some(denoise);
        self
    }
}

/// GPS trace supplied either as an encoded polyline or as points, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Trace {
    /// Polyline with 6 digits of precision
    #[serde(rename = "encoded_polyline")]
    Polyline(String),
    #[serde(rename = "shape")]
    Shape(Vec<Coordinate>),
}

impl Trace {
    /// # Errors
    ///
    /// Returns an error for an empty polyline.
    pub fn polyline(polyline: impl Into<String>) -> Result<Self, DomainError> {
        let polyline = polyline.into();
        if polyline.is_empty() {
            return Err(DomainError::missing("encoded_polyline"));
        }
        Ok(Self::Polyline(polyline))
    }

    /// # Errors
    ///
    /// Returns `DomainError::TooFewElements` for fewer than two points.
    pub fn shape(points: Vec<Coordinate>) -> Result<Self, DomainError> {
        DomainError::require_len("shape", &points, 2)?;
        Ok(Self::Shape(points))
    }
}

/// How the trace is matched to the road network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeMatch {
    /// Trace is exactly on the road network
    EdgeWalk,
    /// Noisy trace, snap with a hidden Markov model
    MapSnap,
    /// Try `edge_walk`, fall back to `map_snap`
    WalkOrSnap,
}

/// Turn a GPS trace into a route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMatchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    trace: Trace,
    #[serde(flatten)]
    pub costing: Costing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_match: Option<ShapeMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<DistanceUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<ValhallaLanguage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions_type: Option<DirectionsType>,
    /// Include OpenLR linear references for each edge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear_references: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<RouteFormat>,
}

impl MapMatchRequest {
    #[must_use]
    pub const fn new(trace: Trace, costing: Costing) -> Self {
        Self {
            id: None,
            trace,
            costing,
            shape_match: None,
            units: None,
            language: None,
            directions_type: None,
            linear_references: None,
            format: None,
        }
    }

    #[must_use]
    pub const fn trace(&self) -> &Trace {
        &self.trace
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_shape_match(mut self, shape_match: ShapeMatch) -> Self {
        self.shape_match = Some(shape_match);
        self
    }

    #[must_use]
    pub const fn with_units(mut self, units: DistanceUnit) -> Self {
        self.units = Some(units);
        self
    }

    #[must_use]
    pub const fn with_language(mut self, language: ValhallaLanguage) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub const fn with_linear_references(mut self, enabled: bool) -> Self {
        self.linear_references = Some(enabled);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    Include,
    Exclude,
}

/// Which edge and point attributes to return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceAttributeFilters {
    /// Attribute keys such as `edge.names` or `matched.point`
    pub attributes: Vec<String>,
    pub action: FilterAction,
}

/// Attributes of the edges a GPS trace matches
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceAttributesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    trace: Trace,
    #[serde(flatten)]
    pub costing: Costing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_match: Option<ShapeMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<TraceAttributeFilters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<DistanceUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<ValhallaLanguage>,
}

impl TraceAttributesRequest {
    #[must_use]
    pub const fn new(trace: Trace, costing: Costing) -> Self {
        Self {
            id: None,
            trace,
            costing,
            shape_match: None,
            filters: None,
            units: None,
            language: None,
        }
    }

    #[must_use]
    pub const fn trace(&self) -> &Trace {
        &self.trace
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_filters(mut self, filters: TraceAttributeFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub const fn with_units(mut self, units: DistanceUnit) -> Self {
        self.units = Some(units);
        self
    }

    #[must_use]
    pub const fn with_language(mut self, language: ValhallaLanguage) -> Self {
        self.language = Some(language);
        self
    }
}
