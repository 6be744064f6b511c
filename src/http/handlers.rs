//! Rating lookup endpoint.
//!
//! `GET /product/{id}` has four outcomes:
//! - 400 `invalid parameter` when `id` is not a decimal integer
//! - 404 `rating not found` when no rating exists
//! - 400 `error search rating` for any other service failure
//! - 200 with the rating as JSON

use axum::{
    extract::{rejection::PathRejection, Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use opentelemetry::Context;
use thiserror::Error;

use crate::http::server::AppState;
use crate::rating::RatingError;

pub const INVALID_PARAMETER: &str = "invalid parameter";
pub const RATING_NOT_FOUND: &str = "rating not found";
pub const SEARCH_ERROR: &str = "error search rating";

/// The product identifier in the path is not a decimal integer.
#[derive(Debug, Error)]
#[error("invalid product id {raw:?}: {source}")]
pub struct InvalidProductId {
    pub raw: String,
    #[source]
    pub source: std::num::ParseIntError,
}

/// Parse a path segment as a product identifier.
pub fn parse_product_id(raw: &str) -> Result<i64, InvalidProductId> {
    raw.parse::<i64>().map_err(|source| InvalidProductId {
        raw: raw.to_string(),
        source,
    })
}

pub async fn get_rating(
    State(state): State<AppState>,
    cx: Option<Extension<Context>>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let product_id = match id.map_err(|e| e.body_text()).and_then(|Path(raw)| {
        parse_product_id(&raw).map_err(|e| e.to_string())
    }) {
        Ok(id) => id,
        Err(reason) => {
            tracing::debug!(reason = %reason, "Rejected product id");
            return invalid_parameter().into_response();
        }
    };

    let cx = cx.map(|Extension(cx)| cx).unwrap_or_else(Context::current);

    match state.service.rating_by_product_id(&cx, product_id).await {
        Ok(rating) => (StatusCode::OK, Json(rating)).into_response(),
        Err(RatingError::NotFound(_)) => (StatusCode::NOT_FOUND, RATING_NOT_FOUND).into_response(),
        // TODO: a backend failure is a server fault; move to 500 once clients stop relying on 400.
        Err(e) => {
            tracing::error!(product_id, error = %e, "Rating lookup failed");
            (StatusCode::BAD_REQUEST, SEARCH_ERROR).into_response()
        }
    }
}

/// `GET /product/` with an empty identifier.
pub async fn missing_product_id() -> impl IntoResponse {
    invalid_parameter()
}

fn invalid_parameter() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, INVALID_PARAMETER)
}
