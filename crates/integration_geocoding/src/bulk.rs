//! Bulk geocoding
//!
//! Many forward geocoding queries travel in one POST. Each query is
//! projected onto a [`BulkRequest`] envelope: the endpoint tag says how the
//! service should read the payload, and the payload itself is a flat
//! [`BulkQuery`] holding the union of every field either query kind uses.
//! Fields a query does not use stay absent on the wire.
//!
//! The service returns one [`BulkSearchResult`] per envelope, in the same
//! order, with no correlation id. [`BulkSearchRequest::correlate`] pairs
//! them back up by position.

use domain::{Coordinate, DomainError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::BulkError;
use crate::models::GeocodeResponse;
use crate::query::{
    Boundary, BoundaryCircle, BoundaryRect, GeocodingLayer, GeocodingQuery, GeocodingSource,
    SearchOptions, SearchQuery, SearchStructuredQuery, push_list, push_opt,
};

/// Operation a bulk item is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulkEndpoint {
    /// Free-text search
    #[serde(rename = "/v1/search")]
    Search,
    /// Structured search
    #[serde(rename = "/v1/search/structured")]
    SearchStructured,
}

impl BulkEndpoint {
    /// Wire value of the `endpoint` field
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "/v1/search",
            Self::SearchStructured => "/v1/search/structured",
        }
    }
}

/// Payload of a bulk item
///
/// Field names are the service's query parameter names, so the same value
/// also drives the single-query GET operations (see [`BulkQuery::query_pairs`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borough: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "postalcode", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(rename = "focus.point.lat", default, skip_serializing_if = "Option::is_none")]
    pub focus_point_lat: Option<f64>,
    #[serde(rename = "focus.point.lon", default, skip_serializing_if = "Option::is_none")]
    pub focus_point_lon: Option<f64>,

    #[serde(rename = "boundary.rect.min_lat", default, skip_serializing_if = "Option::is_none")]
    pub boundary_rect_min_lat: Option<f64>,
    #[serde(rename = "boundary.rect.max_lat", default, skip_serializing_if = "Option::is_none")]
    pub boundary_rect_max_lat: Option<f64>,
    #[serde(rename = "boundary.rect.min_lon", default, skip_serializing_if = "Option::is_none")]
    pub boundary_rect_min_lon: Option<f64>,
    #[serde(rename = "boundary.rect.max_lon", default, skip_serializing_if = "Option::is_none")]
    pub boundary_rect_max_lon: Option<f64>,

    #[serde(rename = "boundary.circle.lat", default, skip_serializing_if = "Option::is_none")]
    pub boundary_circle_lat: Option<f64>,
    #[serde(rename = "boundary.circle.lon", default, skip_serializing_if = "Option::is_none")]
    pub boundary_circle_lon: Option<f64>,
    #[serde(rename = "boundary.circle.radius", default, skip_serializing_if = "Option::is_none")]
    pub boundary_circle_radius: Option<f64>,

    #[serde(rename = "boundary.country", default, skip_serializing_if = "Option::is_none")]
    pub boundary_country: Option<String>,
    #[serde(rename = "boundary.gid", default, skip_serializing_if = "Option::is_none")]
    pub boundary_gid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<GeocodingLayer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<GeocodingSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl BulkQuery {
    fn with_options(options: &SearchOptions) -> Self {
        let rect = options.boundary.rect;
        let circle = options.boundary.circle;
        Self {
            focus_point_lat: options.focus.map(|c| c.lat()),
            focus_point_lon: options.focus.map(|c| c.lon()),
            boundary_rect_min_lat: rect.map(|r| r.min_lat()),
            boundary_rect_max_lat: rect.map(|r| r.max_lat()),
            boundary_rect_min_lon: rect.map(|r| r.min_lon()),
            boundary_rect_max_lon: rect.map(|r| r.max_lon()),
            boundary_circle_lat: circle.map(|c| c.center().lat()),
            boundary_circle_lon: circle.map(|c| c.center().lon()),
            boundary_circle_radius: circle.map(|c| c.radius_km()),
            boundary_country: options.boundary.country.clone(),
            boundary_gid: options.boundary.gid.clone(),
            layers: (!options.layers.is_empty()).then(|| options.layers.clone()),
            sources: (!options.sources.is_empty()).then(|| options.sources.clone()),
            size: options.size,
            lang: options.lang.clone(),
            ..Self::default()
        }
    }

    fn options(&self) -> Result<SearchOptions, DomainError> {
        let focus = match (self.focus_point_lat, self.focus_point_lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)?),
            (None, None) => None,
            _ => return Err(DomainError::missing("focus.point.lat and focus.point.lon")),
        };

        let rect = match (
            self.boundary_rect_min_lat,
            self.boundary_rect_max_lat,
            self.boundary_rect_min_lon,
            self.boundary_rect_max_lon,
        ) {
            (Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon)) => Some(BoundaryRect::new(
                Coordinate::new(min_lat, min_lon)?,
                Coordinate::new(max_lat, max_lon)?,
            )?),
            (None, None, None, None) => None,
            _ => return Err(DomainError::missing("all four boundary.rect corners")),
        };

        let circle = match (
            self.boundary_circle_lat,
            self.boundary_circle_lon,
            self.boundary_circle_radius,
        ) {
            (Some(lat), Some(lon), Some(radius)) => {
                Some(BoundaryCircle::new(Coordinate::new(lat, lon)?, radius)?)
            },
            (None, None, None) => None,
            _ => {
                return Err(DomainError::missing(
                    "boundary.circle.lat, boundary.circle.lon and boundary.circle.radius",
                ));
            },
        };

        Ok(SearchOptions {
            focus,
            boundary: Boundary {
                rect,
                circle,
                country: self.boundary_country.clone(),
                gid: self.boundary_gid.clone(),
            },
            layers: self.layers.clone().unwrap_or_default(),
            sources: self.sources.clone().unwrap_or_default(),
            size: self.size,
            lang: self.lang.clone(),
        })
    }

    fn structured_fields(&self) -> impl Iterator<Item = (&'static str, bool)> {
        [
            ("address", self.address.is_some()),
            ("neighbourhood", self.neighbourhood.is_some()),
            ("borough", self.borough.is_some()),
            ("locality", self.locality.is_some()),
            ("county", self.county.is_some()),
            ("region", self.region.is_some()),
            ("postalcode", self.postal_code.is_some()),
            ("country", self.country.is_some()),
        ]
        .into_iter()
    }

    /// Populated fields as GET query parameters (lists comma-joined)
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "text", self.text.as_ref());
        push_opt(&mut pairs, "address", self.address.as_ref());
        push_opt(&mut pairs, "neighbourhood", self.neighbourhood.as_ref());
        push_opt(&mut pairs, "borough", self.borough.as_ref());
        push_opt(&mut pairs, "locality", self.locality.as_ref());
        push_opt(&mut pairs, "county", self.county.as_ref());
        push_opt(&mut pairs, "region", self.region.as_ref());
        push_opt(&mut pairs, "postalcode", self.postal_code.as_ref());
        push_opt(&mut pairs, "country", self.country.as_ref());
        push_opt(&mut pairs, "focus.point.lat", self.focus_point_lat);
        push_opt(&mut pairs, "focus.point.lon", self.focus_point_lon);
        push_opt(&mut pairs, "boundary.rect.min_lat", self.boundary_rect_min_lat);
        push_opt(&mut pairs, "boundary.rect.max_lat", self.boundary_rect_max_lat);
        push_opt(&mut pairs, "boundary.rect.min_lon", self.boundary_rect_min_lon);
        push_opt(&mut pairs, "boundary.rect.max_lon", self.boundary_rect_max_lon);
        push_opt(&mut pairs, "boundary.circle.lat", self.boundary_circle_lat);
        push_opt(&mut pairs, "boundary.circle.lon", self.boundary_circle_lon);
        push_opt(&mut pairs, "boundary.circle.radius", self.boundary_circle_radius);
        push_opt(&mut pairs, "boundary.country", self.boundary_country.as_ref());
        push_opt(&mut pairs, "boundary.gid", self.boundary_gid.as_ref());
        if let Some(layers) = &self.layers {
            push_list(&mut pairs, "layers", layers.iter().map(GeocodingLayer::as_str));
        }
        if let Some(sources) = &self.sources {
            push_list(&mut pairs, "sources", sources.iter().map(GeocodingSource::as_str));
        }
        push_opt(&mut pairs, "size", self.size);
        push_opt(&mut pairs, "lang", self.lang.as_ref());
        pairs
    }
}

impl From<&SearchQuery> for BulkQuery {
    fn from(query: &SearchQuery) -> Self {
        Self {
            text: Some(query.text().to_string()),
            ..Self::with_options(query.options())
        }
    }
}

impl From<&SearchStructuredQuery> for BulkQuery {
    fn from(query: &SearchStructuredQuery) -> Self {
        Self {
            address: query.address.clone(),
            neighbourhood: query.neighbourhood.clone(),
            borough: query.borough.clone(),
            locality: query.locality.clone(),
            county: query.county.clone(),
            region: query.region.clone(),
            postal_code: query.postal_code.clone(),
            country: query.country.clone(),
            ..Self::with_options(query.options())
        }
    }
}

/// One item of a bulk batch: endpoint tag plus payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkRequest {
    pub endpoint: BulkEndpoint,
    pub query: BulkQuery,
}

impl BulkRequest {
    /// Envelope for a free-text search
    #[must_use]
    pub fn search(query: &SearchQuery) -> Self {
        Self {
            endpoint: BulkEndpoint::Search,
            query: query.into(),
        }
    }

    /// Envelope for a structured search
    #[must_use]
    pub fn search_structured(query: &SearchStructuredQuery) -> Self {
        Self {
            endpoint: BulkEndpoint::SearchStructured,
            query: query.into(),
        }
    }
}

impl From<&GeocodingQuery> for BulkRequest {
    fn from(query: &GeocodingQuery) -> Self {
        match query {
            GeocodingQuery::Search(q) => Self::search(q),
            GeocodingQuery::Structured(q) => Self::search_structured(q),
        }
    }
}

impl From<GeocodingQuery> for BulkRequest {
    fn from(query: GeocodingQuery) -> Self {
        Self::from(&query)
    }
}

impl From<SearchQuery> for BulkRequest {
    fn from(query: SearchQuery) -> Self {
        Self::search(&query)
    }
}

impl From<SearchStructuredQuery> for BulkRequest {
    fn from(query: SearchStructuredQuery) -> Self {
        Self::search_structured(&query)
    }
}

impl TryFrom<BulkRequest> for GeocodingQuery {
    type Error = DomainError;

    /// Read the payload the way the endpoint tag says the service will
    fn try_from(request: BulkRequest) -> Result<Self, Self::Error> {
        let BulkRequest { endpoint, query } = request;
        let options = query.options()?;

        match endpoint {
            BulkEndpoint::Search => {
                if let Some((field, _)) = query.structured_fields().find(|(_, set)| *set) {
                    return Err(DomainError::Conflict(format!(
                        "'{field}' is not a free-text search field"
                    )));
                }
                let text = query.text.unwrap_or_default();
                Ok(Self::Search(SearchQuery::with_options(text, options)?))
            },
            BulkEndpoint::SearchStructured => {
                if query.text.is_some() {
                    return Err(DomainError::Conflict(
                        "'text' is not a structured search field".to_string(),
                    ));
                }
                let mut builder = SearchStructuredQuery::builder().options(options);
                if let Some(v) = query.address {
                    builder = builder.address(v);
                }
                if let Some(v) = query.neighbourhood {
                    builder = builder.neighbourhood(v);
                }
                if let Some(v) = query.borough {
                    builder = builder.borough(v);
                }
                if let Some(v) = query.locality {
                    builder = builder.locality(v);
                }
                if let Some(v) = query.county {
                    builder = builder.county(v);
                }
                if let Some(v) = query.region {
                    builder = builder.region(v);
                }
                if let Some(v) = query.postal_code {
                    builder = builder.postal_code(v);
                }
                if let Some(v) = query.country {
                    builder = builder.country(v);
                }
                Ok(Self::Structured(builder.build()?))
            },
        }
    }
}

/// Collects envelopes in submission order
#[derive(Debug, Clone, Default)]
pub struct BulkRequestBuilder {
    items: Vec<BulkRequest>,
}

impl BulkRequestBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one query or pre-built envelope
    #[must_use]
    pub fn push(mut self, item: impl Into<BulkRequest>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Append several queries, keeping their order
    #[must_use]
    pub fn extend<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<BulkRequest>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finish the batch
    ///
    /// Envelopes pushed directly are checked the same way typed queries
    /// are checked when they are built.
    ///
    /// # Errors
    ///
    /// Returns `BulkError::Empty` for an empty batch and
    /// `BulkError::InvalidItem` for the first envelope that does not
    /// describe a valid query for its endpoint.
    pub fn build(self) -> Result<BulkSearchRequest, BulkError> {
        if self.items.is_empty() {
            return Err(BulkError::Empty);
        }
        for (index, item) in self.items.iter().enumerate() {
            GeocodingQuery::try_from(item.clone())
                .map_err(|source| BulkError::InvalidItem { index, source })?;
        }
        Ok(BulkSearchRequest { items: self.items })
    }
}

/// A validated, non-empty, ordered batch ready for submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BulkSearchRequest {
    items: Vec<BulkRequest>,
}

impl BulkSearchRequest {
    #[must_use]
    pub fn builder() -> BulkRequestBuilder {
        BulkRequestBuilder::new()
    }

    /// Batch from typed queries
    ///
    /// # Errors
    ///
    /// Returns `BulkError::Empty` if no queries are given.
    pub fn from_queries<I>(queries: I) -> Result<Self, BulkError>
    where
        I: IntoIterator,
        I::Item: Into<BulkRequest>,
    {
        BulkRequestBuilder::new().extend(queries).build()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// A built batch is never empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[BulkRequest] {
        &self.items
    }

    /// Pair each result with the item at the same position
    ///
    /// # Errors
    ///
    /// Returns `BulkError::LengthMismatch` if the service returned a
    /// different number of results than items were sent.
    pub fn correlate(
        &self,
        results: Vec<BulkSearchResult>,
    ) -> Result<Vec<BulkItemOutcome<'_>>, BulkError> {
        if results.len() != self.items.len() {
            warn!(
                requested = self.items.len(),
                returned = results.len(),
                "Bulk result count does not match request count"
            );
            return Err(BulkError::LengthMismatch {
                requested: self.items.len(),
                returned: results.len(),
            });
        }

        Ok(self
            .items
            .iter()
            .zip(results)
            .enumerate()
            .map(|(index, (request, result))| {
                if !result.is_success() {
                    warn!(
                        index,
                        status = result.status,
                        endpoint = request.endpoint.as_str(),
                        "Bulk item failed"
                    );
                }
                BulkItemOutcome {
                    index,
                    request,
                    result,
                }
            })
            .collect())
    }

    /// Positions whose result did not succeed
    ///
    /// # Errors
    ///
    /// Returns `BulkError::LengthMismatch` on a length mismatch.
    pub fn failed_indices(&self, results: &[BulkSearchResult]) -> Result<Vec<usize>, BulkError> {
        if results.len() != self.items.len() {
            return Err(BulkError::LengthMismatch {
                requested: self.items.len(),
                returned: results.len(),
            });
        }
        Ok(results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.outcome().is_err())
            .map(|(i, _)| i)
            .collect())
    }

    /// New batch holding only the items whose result failed
    ///
    /// Returns `Ok(None)` when every item succeeded. The new batch is
    /// independent: its results correlate with its own items, not with
    /// positions in this batch.
    ///
    /// # Errors
    ///
    /// Returns `BulkError::LengthMismatch` on a length mismatch.
    pub fn resubmission(
        &self,
        results: &[BulkSearchResult],
    ) -> Result<Option<Self>, BulkError> {
        let failed = self.failed_indices(results)?;
        if failed.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            items: failed.into_iter().map(|i| self.items[i].clone()).collect(),
        }))
    }
}

/// Per-item result of a bulk submission
///
/// A result only carries a response when its status is a success; any
/// response attached to a failed status is discarded during decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBulkSearchResult")]
pub struct BulkSearchResult {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<GeocodeResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

/// Body of a successful bulk call, one result per submitted item
pub type BulkSearchResponse = Vec<BulkSearchResult>;

#[derive(Deserialize)]
struct RawBulkSearchResult {
    status: u16,
    #[serde(default)]
    response: Option<GeocodeResponse>,
    #[serde(default)]
    msg: Option<String>,
}

impl From<RawBulkSearchResult> for BulkSearchResult {
    fn from(raw: RawBulkSearchResult) -> Self {
        let success = (200..300).contains(&raw.status);
        Self {
            status: raw.status,
            response: raw.response.filter(|_| success),
            msg: raw.msg,
        }
    }
}

/// Why a single bulk item produced no response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemFailure {
    pub status: u16,
    pub msg: Option<String>,
}

impl BulkSearchResult {
    /// True when the item succeeded and carries a response
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome().is_ok()
    }

    /// The response, or the status and message of a failed item
    ///
    /// A success status without a response body counts as a failure.
    ///
    /// # Errors
    ///
    /// Returns the item's status and message when it failed.
    pub fn outcome(&self) -> Result<&GeocodeResponse, BulkItemFailure> {
        match &self.response {
            Some(response) if (200..300).contains(&self.status) => Ok(response),
            _ => Err(BulkItemFailure {
                status: self.status,
                msg: self.msg.clone(),
            }),
        }
    }
}

/// A bulk item paired with its result
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemOutcome<'a> {
    /// Position in the submitted batch
    pub index: usize,
    pub request: &'a BulkRequest,
    pub result: BulkSearchResult,
}

impl BulkItemOutcome<'_> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }

    /// Rebuild the typed query this item was created from
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope was pushed by hand and is invalid.
    pub fn query(&self) -> Result<GeocodingQuery, DomainError> {
        GeocodingQuery::try_from(self.request.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn wall_street_search() -> SearchQuery {
        SearchQuery::new("11 Wall St, New York, NY").unwrap()
    }

    fn wall_street_structured() -> SearchStructuredQuery {
        SearchStructuredQuery::builder()
            .address("11 Wall St")
            .locality("New York")
            .region("New York")
            .build()
            .unwrap()
    }

    fn result(status: u16, response: Option<serde_json::Value>) -> BulkSearchResult {
        let mut value = json!({ "status": status });
        if let Some(response) = response {
            value["response"] = response;
        }
        serde_json::from_value(value).unwrap()
    }

    fn feature_collection() -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-74.0112, 40.7069]},
                "properties": {"layer": "address", "country": "United States"}
            }]
        })
    }

    #[test]
    fn test_envelope_wire_shape() {
        let search = BulkRequest::search(
            &wall_street_search()
                .with_focus(Coordinate::new(40.7, -74.0).unwrap())
                .with_layers([GeocodingLayer::Address]),
        );
        let structured = BulkRequest::search_structured(&wall_street_structured());

        let json = serde_json::to_value([&search, &structured]).unwrap();
        assert_eq!(
            json,
            json!([
                {
                    "endpoint": "/v1/search",
                    "query": {
                        "text": "11 Wall St, New York, NY",
                        "focus.point.lat": 40.7,
                        "focus.point.lon": -74.0,
                        "layers": ["address"]
                    }
                },
                {
                    "endpoint": "/v1/search/structured",
                    "query": {
                        "address": "11 Wall St",
                        "locality": "New York",
                        "region": "New York"
                    }
                }
            ])
        );
    }

    #[test]
    fn test_query_pairs_use_wire_names() {
        let query = SearchStructuredQuery::builder()
            .postal_code("10005")
            .country("USA")
            .sources([GeocodingSource::Openaddresses, GeocodingSource::Openstreetmap])
            .size(3)
            .build()
            .unwrap();

        assert_eq!(
            BulkQuery::from(&query).query_pairs(),
            vec![
                ("postalcode", "10005".to_string()),
                ("country", "USA".to_string()),
                ("sources", "openaddresses,openstreetmap".to_string()),
                ("size", "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_builder_preserves_order() {
        let batch = BulkRequestBuilder::new()
            .push(wall_street_structured())
            .push(wall_street_search())
            .push(GeocodingQuery::from(wall_street_search()))
            .build()
            .unwrap();

        let endpoints: Vec<_> = batch.items().iter().map(|i| i.endpoint).collect();
        assert_eq!(
            endpoints,
            vec![
                BulkEndpoint::SearchStructured,
                BulkEndpoint::Search,
                BulkEndpoint::Search
            ]
        );
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        assert_eq!(BulkRequestBuilder::new().build(), Err(BulkError::Empty));
        assert_eq!(
            BulkSearchRequest::from_queries(Vec::<SearchQuery>::new()),
            Err(BulkError::Empty)
        );
    }

    #[test]
    fn test_hand_built_envelope_is_validated() {
        let bad = BulkRequest {
            endpoint: BulkEndpoint::SearchStructured,
            query: BulkQuery {
                country: Some("Estonia".to_string()),
                ..Default::default()
            },
        };

        let err = BulkRequestBuilder::new()
            .push(wall_street_search())
            .push(bad)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            BulkError::InvalidItem {
                index: 1,
                source: DomainError::MissingField(_)
            }
        ));
    }

    #[test]
    fn test_tag_selects_interpretation() {
        let mut envelope = BulkRequest::search(&wall_street_search());
        envelope.query.address = Some("11 Wall St".to_string());
        assert!(matches!(
            GeocodingQuery::try_from(envelope),
            Err(DomainError::Conflict(_))
        ));

        let mut envelope = BulkRequest::search_structured(&wall_street_structured());
        envelope.query.text = Some("11 Wall St".to_string());
        assert!(GeocodingQuery::try_from(envelope).is_err());
    }

    #[test]
    fn test_partial_focus_is_rejected() {
        let mut envelope = BulkRequest::search(&wall_street_search());
        envelope.query.focus_point_lat = Some(40.0);
        assert!(matches!(
            GeocodingQuery::try_from(envelope),
            Err(DomainError::MissingField(_))
        ));
    }

    #[test]
    fn test_failed_result_never_carries_response() {
        let failed = result(404, Some(feature_collection()));
        assert!(failed.response.is_none());
        assert!(!failed.is_success());
        assert_eq!(
            failed.outcome().unwrap_err(),
            BulkItemFailure {
                status: 404,
                msg: None
            }
        );

        let ok = result(200, Some(feature_collection()));
        assert!(ok.is_success());
        assert_eq!(ok.outcome().unwrap().features.len(), 1);

        let empty_ok = result(200, None);
        assert!(!empty_ok.is_success());
    }

    #[test]
    fn test_correlate_pairs_by_position() {
        let batch = BulkSearchRequest::from_queries([
            GeocodingQuery::from(wall_street_search()),
            GeocodingQuery::from(wall_street_structured()),
        ])
        .unwrap();

        let outcomes = batch
            .correlate(vec![
                result(200, Some(feature_collection())),
                result(400, None),
            ])
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].index, 0);
        assert_eq!(outcomes[0].request.endpoint, BulkEndpoint::Search);
        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[1].request.endpoint, BulkEndpoint::SearchStructured);
        assert!(!outcomes[1].is_success());
        assert_eq!(
            outcomes[1].query().unwrap(),
            GeocodingQuery::from(wall_street_structured())
        );
    }

    #[test]
    fn test_correlate_detects_length_mismatch() {
        let batch = BulkSearchRequest::from_queries([wall_street_search()]).unwrap();
        let err = batch
            .correlate(vec![result(200, None), result(200, None)])
            .unwrap_err();
        assert_eq!(
            err,
            BulkError::LengthMismatch {
                requested: 1,
                returned: 2
            }
        );
    }

    #[test]
    fn test_resubmission_holds_only_failed_items() {
        let batch = BulkSearchRequest::from_queries([
            GeocodingQuery::from(wall_street_search()),
            GeocodingQuery::from(wall_street_structured()),
            GeocodingQuery::from(SearchQuery::new("Põhja pst 27").unwrap()),
        ])
        .unwrap();
        let results = vec![
            result(200, Some(feature_collection())),
            result(500, None),
            result(429, None),
        ];

        assert_eq!(batch.failed_indices(&results).unwrap(), vec![1, 2]);

        let retry = batch.resubmission(&results).unwrap().unwrap();
        assert_eq!(retry.len(), 2);
        assert_eq!(retry.items()[0], batch.items()[1]);
        assert_eq!(retry.items()[1], batch.items()[2]);

        let all_ok = vec![
            result(200, Some(feature_collection())),
            result(200, Some(feature_collection())),
            result(200, Some(feature_collection())),
        ];
        assert!(batch.resubmission(&all_ok).unwrap().is_none());
    }

    #[test]
    fn test_rect_corners_keep_their_sides() {
        let rect = BoundaryRect::new(
            Coordinate::new(40.70, -74.02).unwrap(),
            Coordinate::new(40.72, -73.99).unwrap(),
        )
        .unwrap();
        let structured = SearchStructuredQuery::builder()
            .address("11 Wall St")
            .neighbourhood("Financial District")
            .borough("Manhattan")
            .county("New York County")
            .boundary(Boundary {
                rect: Some(rect),
                gid: Some("whosonfirst:locality:85977539".to_string()),
                ..Boundary::default()
            })
            .build()
            .unwrap();

        let envelope = BulkRequest::search_structured(&structured);
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(wire["query"]["boundary.rect.min_lat"], json!(40.70));
        assert_eq!(wire["query"]["boundary.rect.max_lat"], json!(40.72));
        assert_eq!(wire["query"]["boundary.rect.min_lon"], json!(-74.02));
        assert_eq!(wire["query"]["boundary.rect.max_lon"], json!(-73.99));
        assert_eq!(wire["query"]["boundary.gid"], "whosonfirst:locality:85977539");
        assert_eq!(wire["query"]["borough"], "Manhattan");

        let back = GeocodingQuery::try_from(envelope).unwrap();
        assert_eq!(back, GeocodingQuery::Structured(structured));
    }

    #[test]
    fn test_partial_rect_is_rejected() {
        let mut envelope = BulkRequest::search(&wall_street_search());
        envelope.query.boundary_rect_min_lat = Some(40.70);
        envelope.query.boundary_rect_max_lat = Some(40.72);
        assert!(GeocodingQuery::try_from(envelope).is_err());
    }

    fn arb_coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon).unwrap())
    }

    fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 ,.]{0,8}[A-Za-z0-9][A-Za-z0-9 ,.]{0,8}"
    }

    fn arb_rect() -> impl Strategy<Value = BoundaryRect> {
        (
            (-90.0f64..=90.0, -90.0f64..=90.0),
            (-180.0f64..=180.0, -180.0f64..=180.0),
        )
            .prop_map(|((lat_a, lat_b), (lon_a, lon_b))| {
                let min = Coordinate::new(lat_a.min(lat_b), lon_a.min(lon_b)).unwrap();
                let max = Coordinate::new(lat_a.max(lat_b), lon_a.max(lon_b)).unwrap();
                BoundaryRect::new(min, max).unwrap()
            })
    }

    fn arb_options() -> impl Strategy<Value = SearchOptions> {
        (
            proptest::option::of(arb_coordinate()),
            proptest::option::of(arb_rect()),
            proptest::option::of((arb_coordinate(), 0.1f64..500.0)),
            proptest::option::of("[A-Z]{3}"),
            proptest::option::of("whosonfirst:(locality|region|country):[0-9]{6,9}"),
            proptest::sample::subsequence(
                vec![
                    GeocodingLayer::Address,
                    GeocodingLayer::Venue,
                    GeocodingLayer::Locality,
                    GeocodingLayer::Coarse,
                ],
                0..=4,
            ),
            proptest::sample::subsequence(
                vec![GeocodingSource::Openstreetmap, GeocodingSource::Whosonfirst],
                0..=2,
            ),
            proptest::option::of(1u32..=40),
            proptest::option::of("[a-z]{2}"),
        )
            .prop_map(
                |(focus, rect, circle, country, gid, layers, sources, size, lang)| SearchOptions {
                    focus,
                    boundary: Boundary {
                        rect,
                        circle: circle.map(|(c, r)| BoundaryCircle::new(c, r).unwrap()),
                        country,
                        gid,
                    },
                    layers,
                    sources,
                    size,
                    lang,
                },
            )
    }

    fn arb_query() -> impl Strategy<Value = GeocodingQuery> {
        prop_oneof![
            (arb_text(), arb_options()).prop_map(|(text, options)| {
                GeocodingQuery::Search(SearchQuery::with_options(text, options).unwrap())
            }),
            (
                arb_text(),
                (
                    proptest::option::of(arb_text()),
                    proptest::option::of(arb_text()),
                    proptest::option::of(arb_text()),
                    proptest::option::of(arb_text()),
                    proptest::option::of(arb_text()),
                    proptest::option::of(arb_text()),
                ),
                proptest::option::of("[0-9]{5}"),
                arb_options()
            )
                .prop_map(|(address, secondary, postal_code, options)| {
                    let (neighbourhood, borough, locality, county, region, country) = secondary;
                    let mut builder = SearchStructuredQuery::builder().address(address).options(options);
                    if let Some(v) = neighbourhood {
                        builder = builder.neighbourhood(v);
                    }
                    if let Some(v) = borough {
                        builder = builder.borough(v);
                    }
                    if let Some(v) = locality {
                        builder = builder.locality(v);
                    }
                    if let Some(v) = county {
                        builder = builder.county(v);
                    }
                    if let Some(v) = region {
                        builder = builder.region(v);
                    }
                    if let Some(v) = postal_code {
                        builder = builder.postal_code(v);
                    }
                    if let Some(v) = country {
                        builder = builder.country(v);
                    }
                    GeocodingQuery::Structured(builder.build().unwrap())
                }),
        ]
    }

    proptest! {
        #[test]
        fn envelope_round_trip_preserves_query(query in arb_query()) {
            let envelope = BulkRequest::from(&query);
            let expected_endpoint = match &query {
                GeocodingQuery::Search(_) => BulkEndpoint::Search,
                GeocodingQuery::Structured(_) => BulkEndpoint::SearchStructured,
            };
            prop_assert_eq!(envelope.endpoint, expected_endpoint);

            let json = serde_json::to_string(&envelope).unwrap();
            let decoded: BulkRequest = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(&decoded, &envelope);

            let rebuilt = GeocodingQuery::try_from(decoded).unwrap();
            prop_assert_eq!(rebuilt, query);
        }

        #[test]
        fn correlate_length_matches_batch(n in 1usize..20) {
            let queries: Vec<SearchQuery> = (0..n)
                .map(|i| SearchQuery::new(format!("query {i}")).unwrap())
                .collect();
            let batch = BulkSearchRequest::from_queries(queries).unwrap();
            let results = (0..n).map(|_| result(200, None)).collect();
            let outcomes = batch.correlate(results).unwrap();
            prop_assert_eq!(outcomes.len(), n);
            for (i, outcome) in outcomes.iter().enumerate() {
                prop_assert_eq!(outcome.index, i);
                prop_assert_eq!(outcome.request, &batch.items()[i]);
            }
        }
    }
}
