//! Geocoding service proxy

use api_client::{ApiClient, ApiSurface, Call, OperationDescriptor, RequestParts};
use tracing::{debug, instrument};

use crate::bulk::{BulkQuery, BulkSearchRequest, BulkSearchResponse};
use crate::models::{GeocodeResponse, GeocodeResponseV2};
use crate::query::{PlaceIds, ReverseQuery, SearchQuery, SearchStructuredQuery};

pub const AUTOCOMPLETE: OperationDescriptor =
    OperationDescriptor::get("autocomplete", "/geocoding/v1/autocomplete");
pub const SEARCH: OperationDescriptor = OperationDescriptor::get("search", "/geocoding/v1/search");
pub const SEARCH_STRUCTURED: OperationDescriptor =
    OperationDescriptor::get("search_structured", "/geocoding/v1/search/structured");
pub const SEARCH_BULK: OperationDescriptor =
    OperationDescriptor::post("search_bulk", "/geocoding/v1/search/bulk");
pub const REVERSE: OperationDescriptor = OperationDescriptor::get("reverse", "/geocoding/v1/reverse");
pub const PLACE_DETAILS: OperationDescriptor =
    OperationDescriptor::get("place_details", "/geocoding/v1/place");
pub const AUTOCOMPLETE_V2: OperationDescriptor =
    OperationDescriptor::get("autocomplete_v2", "/geocoding/v2/autocomplete");
pub const SEARCH_V2: OperationDescriptor =
    OperationDescriptor::get("search_v2", "/geocoding/v2/search");
pub const REVERSE_V2: OperationDescriptor =
    OperationDescriptor::get("reverse_v2", "/geocoding/v2/reverse");
pub const PLACE_DETAILS_V2: OperationDescriptor =
    OperationDescriptor::get("place_details_v2", "/geocoding/v2/place_details");

const OPERATIONS: &[OperationDescriptor] = &[
    AUTOCOMPLETE,
    SEARCH,
    SEARCH_STRUCTURED,
    SEARCH_BULK,
    REVERSE,
    PLACE_DETAILS,
    AUTOCOMPLETE_V2,
    SEARCH_V2,
    REVERSE_V2,
    PLACE_DETAILS_V2,
];

/// Forward, reverse and bulk geocoding
///
/// Created with [`ApiClient::create_service`]; every method prepares one
/// [`Call`] without touching the network.
#[derive(Debug, Clone)]
pub struct GeocodingApi {
    client: ApiClient,
}

impl ApiSurface for GeocodingApi {
    const NAME: &'static str = "GeocodingApi";

    fn operations() -> &'static [OperationDescriptor] {
        OPERATIONS
    }

    fn bind(client: ApiClient) -> Self {
        Self { client }
    }
}

fn search_parts(query: &SearchQuery) -> RequestParts {
    RequestParts::new().extend_query(BulkQuery::from(query).query_pairs())
}

fn place_parts(ids: &PlaceIds, lang: Option<&str>) -> RequestParts {
    RequestParts::new()
        .query_list("ids", ids.as_slice())
        .query_opt("lang", lang)
}

impl GeocodingApi {
    /// Search-as-you-type over partial input
    pub fn autocomplete(&self, query: &SearchQuery) -> Call<GeocodeResponse> {
        self.client.invoke(&AUTOCOMPLETE, search_parts(query))
    }

    /// Free-text search
    pub fn search(&self, query: &SearchQuery) -> Call<GeocodeResponse> {
        self.client.invoke(&SEARCH, search_parts(query))
    }

    /// Search by address components
    pub fn search_structured(&self, query: &SearchStructuredQuery) -> Call<GeocodeResponse> {
        let parts = RequestParts::new().extend_query(BulkQuery::from(query).query_pairs());
        self.client.invoke(&SEARCH_STRUCTURED, parts)
    }

    /// Submit a whole batch in one POST
    ///
    /// The call succeeds as a whole or fails as a whole; individual items
    /// report their own status inside the returned array. Use
    /// [`BulkSearchRequest::correlate`] to pair results with items.
    #[instrument(skip(self, request), fields(items = request.len()))]
    pub fn search_bulk(&self, request: &BulkSearchRequest) -> Call<BulkSearchResponse> {
        debug!("Preparing bulk geocoding request");
        self.client
            .invoke(&SEARCH_BULK, RequestParts::new().json(request))
    }

    /// Places near a point
    pub fn reverse(&self, query: &ReverseQuery) -> Call<GeocodeResponse> {
        self.client
            .invoke(&REVERSE, RequestParts::new().extend_query(query.query_pairs()))
    }

    /// Look up places by global id
    pub fn place_details(&self, ids: &PlaceIds, lang: Option<&str>) -> Call<GeocodeResponse> {
        self.client.invoke(&PLACE_DETAILS, place_parts(ids, lang))
    }

    pub fn autocomplete_v2(&self, query: &SearchQuery) -> Call<GeocodeResponseV2> {
        self.client.invoke(&AUTOCOMPLETE_V2, search_parts(query))
    }

    pub fn search_v2(&self, query: &SearchQuery) -> Call<GeocodeResponseV2> {
        self.client.invoke(&SEARCH_V2, search_parts(query))
    }

    pub fn reverse_v2(&self, query: &ReverseQuery) -> Call<GeocodeResponseV2> {
        self.client
            .invoke(&REVERSE_V2, RequestParts::new().extend_query(query.query_pairs()))
    }

    pub fn place_details_v2(&self, ids: &PlaceIds, lang: Option<&str>) -> Call<GeocodeResponseV2> {
        self.client.invoke(&PLACE_DETAILS_V2, place_parts(ids, lang))
    }
}
