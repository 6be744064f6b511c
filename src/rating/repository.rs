//! Rating storage.
//!
//! # Responsibilities
//! - Resolve a product identifier to its rating
//! - Emit one span per lookup, tagged with the product identifier
//!
//! The in-memory store is seeded once and never written afterwards, so
//! concurrent lookups need no locking.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use opentelemetry::trace::Tracer;
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;

use crate::rating::types::{Rating, RatingError, RatingResult};
use crate::rating::PRODUCT_ID_ATTRIBUTE;

const SPAN_NAME: &str = "repository.RatingByProductID";

/// Ratings served when no other dataset is supplied.
pub const SEED_RATINGS: [Rating; 3] = [Rating::new(1, 4), Rating::new(2, 3), Rating::new(3, 5)];

/// Lookup capability over a rating store.
#[async_trait]
pub trait RatingRepository: Send + Sync + 'static {
    /// Fetch the rating for `product_id`, or `RatingError::NotFound`.
    async fn rating_by_product_id(&self, cx: &Context, product_id: i64) -> RatingResult<Rating>;
}

#[async_trait]
impl<T: RatingRepository + ?Sized> RatingRepository for Arc<T> {
    async fn rating_by_product_id(&self, cx: &Context, product_id: i64) -> RatingResult<Rating> {
        (**self).rating_by_product_id(cx, product_id).await
    }
}

/// Read-only rating store held in process memory.
#[derive(Clone)]
pub struct InMemoryRatingRepository {
    ratings: HashMap<i64, Rating>,
    tracer: SdkTracer,
}

impl InMemoryRatingRepository {
    /// Create a repository holding the seed dataset.
    pub fn new(tracer: SdkTracer) -> Self {
        Self::with_ratings(tracer, SEED_RATINGS)
    }

    /// Create a repository over an arbitrary dataset.
    ///
    /// Entries are keyed by their own `product_id`; a later entry for the
    /// same product replaces an earlier one.
    pub fn with_ratings<I>(tracer: SdkTracer, ratings: I) -> Self
    where
        I: IntoIterator<Item = Rating>,
    {
        let ratings = ratings
            .into_iter()
            .map(|rating| (rating.product_id, rating))
            .collect();
        Self { ratings, tracer }
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn rating_by_product_id(&self, cx: &Context, product_id: i64) -> RatingResult<Rating> {
        // Ends on drop, on both the hit and the miss path.
        let _span = self
            .tracer
            .span_builder(SPAN_NAME)
            .with_attributes([KeyValue::new(PRODUCT_ID_ATTRIBUTE, product_id.to_string())])
            .start_with_context(&self.tracer, cx);

        self.ratings
            .get(&product_id)
            .copied()
            .ok_or(RatingError::NotFound(product_id))
    }
}
