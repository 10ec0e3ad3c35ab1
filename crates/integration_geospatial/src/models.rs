//! Timezone and elevation models

use domain::{Coordinate, DomainError};
use serde::{Deserialize, Serialize};

/// Timezone in effect at a point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TzResponse {
    /// IANA zone name such as `Asia/Seoul`
    pub tz_id: String,
    /// Standard offset from UTC in seconds
    pub base_utc_offset: i64,
    /// Extra daylight saving offset in seconds at the requested time
    pub dst_offset: i64,
}

impl TzResponse {
    /// Total offset from UTC in seconds
    #[must_use]
    pub const fn utc_offset(&self) -> i64 {
        self.base_utc_offset + self.dst_offset
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
enum HeightInput {
    #[serde(rename = "shape")]
    Shape(Vec<Coordinate>),
    #[serde(rename = "encoded_polyline")]
    Polyline(String),
}

/// Points to sample elevation at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeightRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(flatten)]
    input: HeightInput,
    /// Also return the cumulative distance of each point
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height_precision: Option<u8>,
}

impl HeightRequest {
    /// Sample at each point of `shape`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TooFewElements` for an empty shape.
    pub fn from_shape(shape: Vec<Coordinate>) -> Result<Self, DomainError> {
        DomainError::require_len("shape", &shape, 1)?;
        Ok(Self::with_input(HeightInput::Shape(shape)))
    }

    /// Sample along an encoded polyline (6 digits of precision)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` for an empty polyline.
    pub fn from_polyline(polyline: impl Into<String>) -> Result<Self, DomainError> {
        let polyline = polyline.into();
        if polyline.is_empty() {
            return Err(DomainError::missing("encoded_polyline"));
        }
        Ok(Self::with_input(HeightInput::Polyline(polyline)))
    }

    const fn with_input(input: HeightInput) -> Self {
        Self {
            id: None,
            input,
            range: None,
            height_precision: None,
        }
    }

    /// Echoed back in the response
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Request `range_height` (distance, height) pairs instead of bare heights
    #[must_use]
    pub const fn with_range(mut self, range: bool) -> Self {
        self.range = Some(range);
        self
    }

    /// Decimal places in returned heights
    ///
    /// # Errors
    ///
    /// Returns an error for a precision above 2.
    pub fn with_height_precision(mut self, precision: u8) -> Result<Self, DomainError> {
        if precision > 2 {
            return Err(DomainError::ValidationError(format!(
                "height_precision must be 0, 1 or 2, got {precision}"
            )));
        }
        self.height_precision = Some(precision);
        Ok(self)
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Cumulative distance along the shape and the height there, both in meters
///
/// Decodes from the two-element arrays the service sends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeHeight(pub f64, pub f64);

impl RangeHeight {
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.0
    }

    #[must_use]
    pub const fn height(&self) -> f64 {
        self.1
    }
}

/// Elevation samples, one per input point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Present when `range` was not requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Vec<f64>>,
    /// Present when `range` was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_height: Option<Vec<RangeHeight>>,
    /// Echo of a polyline input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded_polyline: Option<String>,
}

impl HeightResponse {
    /// Whether the first range sample sits at distance 0
    ///
    /// False when no range samples were returned.
    #[must_use]
    pub fn range_starts_at_origin(&self) -> bool {
        self.range_height
            .as_deref()
            .and_then(<[RangeHeight]>::first)
            .is_some_and(|first| first.distance() == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seoul() -> Coordinate {
        Coordinate::new(37.56, 126.99).unwrap()
    }

    #[test]
    fn test_shape_request_wire_shape() {
        let request = HeightRequest::from_shape(vec![seoul()])
            .unwrap()
            .with_id("Seoul")
            .with_range(true);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"id": "Seoul", "shape": [{"lat": 37.56, "lon": 126.99}], "range": true})
        );
    }

    #[test]
    fn test_polyline_request_wire_shape() {
        let request = HeightRequest::from_polyline("_grbgAh~{nhF")
            .unwrap()
            .with_height_precision(1)
            .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"encoded_polyline": "_grbgAh~{nhF", "height_precision": 1})
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            HeightRequest::from_shape(vec![]),
            Err(DomainError::TooFewElements { field: "shape", .. })
        ));
        assert!(HeightRequest::from_polyline("").is_err());
        assert!(
            HeightRequest::from_shape(vec![seoul()])
                .unwrap()
                .with_height_precision(3)
                .is_err()
        );
    }

    #[test]
    fn test_parse_range_height() {
        let json = r#"{"id": "Seoul", "range_height": [[0, 38], [120.5, 41]]}"#;
        let response: HeightResponse = serde_json::from_str(json).unwrap();
        let range = response.range_height.as_ref().unwrap();
        assert_eq!(range[1], RangeHeight(120.5, 41.0));
        assert!(response.range_starts_at_origin());
        assert!(response.height.is_none());
    }

    #[test]
    fn test_range_origin_without_range() {
        let response: HeightResponse = serde_json::from_str(r#"{"height": [38]}"#).unwrap();
        assert!(!response.range_starts_at_origin());

        let shifted: HeightResponse =
            serde_json::from_str(r#"{"range_height": [[5, 38]]}"#).unwrap();
        assert!(!shifted.range_starts_at_origin());
    }

    #[test]
    fn test_tz_offset() {
        let tz: TzResponse = serde_json::from_str(
            r#"{"tz_id": "Asia/Seoul", "base_utc_offset": 32400, "dst_offset": 0}"#,
        )
        .unwrap();
        assert_eq!(tz.utc_offset(), 32_400);
    }
}
