//! Routing surface of the Stadia Maps API
//!
//! Every operation takes a JSON body built from a validated request type.
//! The travel mode is a [`Costing`], which carries both the model name and
//! its options so the two cannot disagree on the wire.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_routing::{Costing, RouteRequest, RoutingApi};
//!
//! let routing = client.create_service::<RoutingApi>()?;
//! let request = RouteRequest::new([start, end], Costing::pedestrian())?;
//! let route = routing.route(&request).await?.into_result()?;
//! ```

mod client;
mod costing;
mod models;
mod requests;

pub use client::RoutingApi;
pub use costing::{
    AutoCostingOptions, BicycleCostingOptions, BicycleType, Costing, MotorScooterCostingOptions,
    PedestrianCostingOptions, TruckCostingOptions,
};
pub use models::{
    IsochroneFeature, IsochroneResponse, LocateObject, MatchedPoint, MatrixDistance,
    MatrixResponse, NearestRoadsResponse, OsrmRouteResponse, RouteLeg, RouteResponse,
    RouteResponseFormat, RouteSummary, RouteTrip, TraceAttributesResponse,
};
pub use requests::{
    Contour, DirectionsType, FilterAction, IsochroneRequest, MapMatchRequest, MatrixRequest,
    NearestRoadsRequest, OptimizedRouteRequest, RouteFormat, RouteRequest, ShapeMatch, Trace,
    TraceAttributeFilters, TraceAttributesRequest,
};
