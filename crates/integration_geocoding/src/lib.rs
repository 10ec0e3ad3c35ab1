//! Geocoding surface of the Stadia Maps API
//!
//! Forward search (free-text and structured), autocomplete, reverse lookup
//! and place details, in both the v1 and v2 response shapes, plus bulk
//! search: many forward queries sent in one request and correlated back by
//! position.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{BulkSearchRequest, GeocodingApi, SearchQuery, SearchStructuredQuery};
//!
//! let geocoding = client.create_service::<GeocodingApi>()?;
//!
//! let batch = BulkSearchRequest::builder()
//!     .push(SearchQuery::new("Põhja pst 27")?)
//!     .push(SearchStructuredQuery::builder().address("Põhja pst 27").country("Estonia").build()?)
//!     .build()?;
//!
//! let response = geocoding.search_bulk(&batch).await?;
//! if let Some(results) = response.into_body() {
//!     for item in batch.correlate(results)? {
//!         match item.result.outcome() {
//!             Ok(found) => println!("{}: {} feature(s)", item.index, found.features.len()),
//!             Err(failure) => println!("{} failed with {}", item.index, failure.status),
//!         }
//!     }
//! }
//! ```

mod bulk;
mod client;
mod error;
mod models;
mod query;

pub use bulk::{
    BulkEndpoint, BulkItemFailure, BulkItemOutcome, BulkQuery, BulkRequest, BulkRequestBuilder,
    BulkSearchRequest, BulkSearchResponse, BulkSearchResult,
};
pub use client::GeocodingApi;
pub use error::BulkError;
pub use models::{
    Context, FeaturePropertiesV2, FeatureV2, GeocodeResponse, GeocodeResponseV2, PeliasFeature,
    PeliasProperties, PointGeometry, WofContext, WofContextComponent,
};
pub use query::{
    Boundary, BoundaryCircle, BoundaryRect, GeocodingLayer, GeocodingQuery, GeocodingSource,
    PlaceIds, ReverseQuery, SearchOptions, SearchQuery, SearchStructuredQuery,
    SearchStructuredQueryBuilder,
};
