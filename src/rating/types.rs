//! Rating domain types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A product's rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rating {
    /// Product this rating belongs to.
    pub product_id: i64,
    /// Rating value.
    pub value: i64,
}

impl Rating {
    pub const fn new(product_id: i64, value: i64) -> Self {
        Self { product_id, value }
    }
}

/// Errors surfaced by rating lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    /// No rating is stored for the product.
    #[error("there is no rating for product {0}")]
    NotFound(i64),

    /// The backing store failed for a reason other than absence.
    #[error("rating backend error: {0}")]
    Backend(String),
}

/// Result type for rating operations.
pub type RatingResult<T> = Result<T, RatingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_json_shape() {
        let json = serde_json::to_value(Rating::new(1, 4)).unwrap();
        assert_eq!(json, serde_json::json!({ "product_id": 1, "value": 4 }));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RatingError::NotFound(7).to_string(),
            "there is no rating for product 7"
        );
        assert_eq!(
            RatingError::Backend("down".into()).to_string(),
            "rating backend error: down"
        );
    }
}
