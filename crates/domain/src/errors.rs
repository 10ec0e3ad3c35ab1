//! Domain-level errors

use thiserror::Error;

/// Errors raised while constructing value types and queries
///
/// All of these are construction errors: they are reported before any
/// request is built, so no network activity has happened when one is seen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Latitude or longitude out of range
    #[error(
        "Invalid coordinates ({lat}, {lon}): latitude must be -90 to 90, longitude must be -180 to 180"
    )]
    InvalidCoordinates { lat: f64, lon: f64 },

    /// A required field (or one of a set of alternatives) was not supplied
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A collection that must hold at least `min` elements held fewer
    #[error("{field} requires at least {min} element(s), got {actual}")]
    TooFewElements {
        field: &'static str,
        min: usize,
        actual: usize,
    },

    /// Two fields were supplied that exclude each other
    #[error("Fields are mutually exclusive: {0}")]
    Conflict(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Check that `items` holds at least `min` elements
    ///
    /// # Errors
    ///
    /// Returns `TooFewElements` when the slice is shorter than `min`.
    pub fn require_len<T>(
        field: &'static str,
        items: &[T],
        min: usize,
    ) -> Result<(), Self> {
        if items.len() < min {
            return Err(Self::TooFewElements {
                field,
                min,
                actual: items.len(),
            });
        }
        Ok(())
    }
}
