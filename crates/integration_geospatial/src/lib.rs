//! Geospatial surface of the Stadia Maps API
//!
//! Timezone lookup for a point and elevation sampling along a shape.

mod client;
mod models;

pub use client::GeospatialApi;
pub use models::{HeightRequest, HeightResponse, RangeHeight, TzResponse};
