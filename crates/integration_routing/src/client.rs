//! Routing service proxy

use api_client::{ApiClient, ApiSurface, Call, OperationDescriptor, RequestParts};
use tracing::{debug, instrument};

use crate::models::{
    IsochroneResponse, MatrixResponse, NearestRoadsResponse, RouteResponse, RouteResponseFormat,
    TraceAttributesResponse,
};
use crate::requests::{
    IsochroneRequest, MapMatchRequest, MatrixRequest, NearestRoadsRequest, OptimizedRouteRequest,
    RouteRequest, TraceAttributesRequest,
};

pub const ROUTE: OperationDescriptor = OperationDescriptor::post("route", "/route/v1");
pub const OPTIMIZED_ROUTE: OperationDescriptor =
    OperationDescriptor::post("optimized_route", "/optimized_route/v1");
pub const TIME_DISTANCE_MATRIX: OperationDescriptor =
    OperationDescriptor::post("time_distance_matrix", "/matrix/v1");
pub const NEAREST_ROADS: OperationDescriptor =
    OperationDescriptor::post("nearest_roads", "/nearest_roads/v1");
pub const ISOCHRONE: OperationDescriptor = OperationDescriptor::post("isochrone", "/isochrone/v1");
pub const MAP_MATCH: OperationDescriptor = OperationDescriptor::post("map_match", "/map_match/v1");
pub const TRACE_ATTRIBUTES: OperationDescriptor =
    OperationDescriptor::post("trace_attributes", "/trace_attributes/v1");

const OPERATIONS: &[OperationDescriptor] = &[
    ROUTE,
    OPTIMIZED_ROUTE,
    TIME_DISTANCE_MATRIX,
    NEAREST_ROADS,
    ISOCHRONE,
    MAP_MATCH,
    TRACE_ATTRIBUTES,
];

/// Routes, matrices, isochrones and trace matching
#[derive(Debug, Clone)]
pub struct RoutingApi {
    client: ApiClient,
}

impl ApiSurface for RoutingApi {
    const NAME: &'static str = "RoutingApi";

    fn operations() -> &'static [OperationDescriptor] {
        OPERATIONS
    }

    fn bind(client: ApiClient) -> Self {
        Self { client }
    }
}

impl RoutingApi {
    /// Route through two or more waypoints
    #[instrument(skip(self, request), fields(costing = request.costing.model(), locations = request.locations().len()))]
    pub fn route(&self, request: &RouteRequest) -> Call<RouteResponseFormat> {
        debug!("Preparing route request");
        self.client.invoke(&ROUTE, RequestParts::new().json(request))
    }

    /// Route visiting every intermediate stop in the cheapest order
    pub fn optimized_route(&self, request: &OptimizedRouteRequest) -> Call<RouteResponse> {
        self.client
            .invoke(&OPTIMIZED_ROUTE, RequestParts::new().json(request))
    }

    #[instrument(skip(self, request), fields(sources = request.sources().len(), targets = request.targets().len()))]
    pub fn time_distance_matrix(&self, request: &MatrixRequest) -> Call<MatrixResponse> {
        debug!("Preparing matrix request");
        self.client
            .invoke(&TIME_DISTANCE_MATRIX, RequestParts::new().json(request))
    }

    pub fn nearest_roads(&self, request: &NearestRoadsRequest) -> Call<NearestRoadsResponse> {
        self.client
            .invoke(&NEAREST_ROADS, RequestParts::new().json(request))
    }

    pub fn isochrone(&self, request: &IsochroneRequest) -> Call<IsochroneResponse> {
        self.client.invoke(&ISOCHRONE, RequestParts::new().json(request))
    }

    /// Snap a GPS trace to roads and return it as a route
    pub fn map_match(&self, request: &MapMatchRequest) -> Call<RouteResponseFormat> {
        self.client.invoke(&MAP_MATCH, RequestParts::new().json(request))
    }

    pub fn trace_attributes(&self, request: &TraceAttributesRequest) -> Call<TraceAttributesResponse> {
        self.client
            .invoke(&TRACE_ATTRIBUTES, RequestParts::new().json(request))
    }
}
