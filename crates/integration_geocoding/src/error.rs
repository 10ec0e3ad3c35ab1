//! Error types for bulk geocoding

use domain::DomainError;
use thiserror::Error;

/// Errors raised while assembling a bulk batch or correlating its results
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BulkError {
    /// A batch must carry at least one item
    #[error("Bulk request must contain at least one item")]
    Empty,

    /// An envelope does not describe a valid query for its endpoint
    #[error("Bulk item {index} is invalid: {source}")]
    InvalidItem {
        /// Position of the item in the batch
        index: usize,
        /// Why the item was rejected
        #[source]
        source: DomainError,
    },

    /// The service answered with a different number of results than items sent
    ///
    /// Results are matched to items by position only, so no pairing is
    /// attempted when the lengths disagree.
    #[error("Bulk response has {returned} result(s) for {requested} request(s)")]
    LengthMismatch {
        /// Items sent
        requested: usize,
        /// Results received
        returned: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BulkError::Empty.to_string(),
            "Bulk request must contain at least one item"
        );

        let err = BulkError::InvalidItem {
            index: 3,
            source: DomainError::missing("text"),
        };
        assert_eq!(
            err.to_string(),
            "Bulk item 3 is invalid: Missing required field: text"
        );

        let err = BulkError::LengthMismatch {
            requested: 2,
            returned: 1,
        };
        assert!(err.to_string().contains("1 result(s) for 2 request(s)"));
    }

    #[test]
    fn test_invalid_item_exposes_source() {
        use std::error::Error as _;

        let err = BulkError::InvalidItem {
            index: 0,
            source: DomainError::missing("text"),
        };
        assert!(err.source().is_some());
    }
}
