//! Domain layer for the geospatial API client
//!
//! Contains the value types shared by the geocoding, routing and geospatial
//! surfaces, plus the construction-time error type. This layer performs no
//! I/O and knows nothing about HTTP.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
