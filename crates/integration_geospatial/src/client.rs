//! Geospatial service proxy

use api_client::{ApiClient, ApiSurface, Call, OperationDescriptor, RequestParts};
use domain::Coordinate;
use tracing::instrument;

use crate::models::{HeightRequest, HeightResponse, TzResponse};

pub const TZ_LOOKUP: OperationDescriptor = OperationDescriptor::get("tz_lookup", "/tz/lookup/v1");
pub const ELEVATION: OperationDescriptor = OperationDescriptor::post("elevation", "/elevation/v1");

const OPERATIONS: &[OperationDescriptor] = &[TZ_LOOKUP, ELEVATION];

/// Timezone and elevation lookups
#[derive(Debug, Clone)]
pub struct GeospatialApi {
    client: ApiClient,
}

impl ApiSurface for GeospatialApi {
    const NAME: &'static str = "GeospatialApi";

    fn operations() -> &'static [OperationDescriptor] {
        OPERATIONS
    }

    fn bind(client: ApiClient) -> Self {
        Self { client }
    }
}

impl GeospatialApi {
    /// Timezone at a point
    ///
    /// `timestamp` (Unix seconds) selects the instant used for the daylight
    /// saving offset; the service uses the current time when it is omitted.
    #[instrument(skip(self))]
    pub fn tz_lookup(&self, coordinate: Coordinate, timestamp: Option<i64>) -> Call<TzResponse> {
        let parts = RequestParts::new()
            .query("lat", coordinate.lat())
            .query("lng", coordinate.lon())
            .query_opt("timestamp", timestamp);
        self.client.invoke(&TZ_LOOKUP, parts)
    }

    /// Elevation in meters at each point of the request
    pub fn elevation(&self, request: &HeightRequest) -> Call<HeightResponse> {
        self.client.invoke(&ELEVATION, RequestParts::new().json(request))
    }
}
