//! Rating service layer.
//!
//! A pass-through over the repository. It is the seam where
//! cross-cutting concerns attach; today that is only its own span.

use std::sync::Arc;

use async_trait::async_trait;
use opentelemetry::trace::{TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;

use crate::rating::repository::RatingRepository;
use crate::rating::types::{Rating, RatingResult};
use crate::rating::PRODUCT_ID_ATTRIBUTE;

const SPAN_NAME: &str = "service.RatingByProductID";

/// Rating lookup capability exposed to the transport layer.
#[async_trait]
pub trait RatingService: Send + Sync + 'static {
    /// Fetch the rating for `product_id`. Repository errors are returned unchanged.
    async fn rating_by_product_id(&self, cx: &Context, product_id: i64) -> RatingResult<Rating>;
}

#[async_trait]
impl<T: RatingService + ?Sized> RatingService for Arc<T> {
    async fn rating_by_product_id(&self, cx: &Context, product_id: i64) -> RatingResult<Rating> {
        (**self).rating_by_product_id(cx, product_id).await
    }
}

/// Service delegating to a single repository.
#[derive(Clone)]
pub struct DefaultRatingService<R> {
    repository: R,
    tracer: SdkTracer,
}

impl<R: RatingRepository> DefaultRatingService<R> {
    pub fn new(repository: R, tracer: SdkTracer) -> Self {
        Self { repository, tracer }
    }
}

#[async_trait]
impl<R: RatingRepository> RatingService for DefaultRatingService<R> {
    async fn rating_by_product_id(&self, cx: &Context, product_id: i64) -> RatingResult<Rating> {
        let span = self
            .tracer
            .span_builder(SPAN_NAME)
            .with_attributes([KeyValue::new(PRODUCT_ID_ATTRIBUTE, product_id.to_string())])
            .start_with_context(&self.tracer, cx);

        // The span lives in `cx` and ends when it drops after the lookup.
        let cx = cx.with_span(span);
        self.repository.rating_by_product_id(&cx, product_id).await
    }
}
