use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limit exceeded on {tier} tier")]
    RateLimited {
        /// Tier label used in the `X-RateLimit-{tier}-*` response headers
        tier: &'static str,
        limit: u32,
        reset_time: DateTime<Utc>,
    },

    /// Primary notification dispatch failed. Carries the user-facing copy;
    /// the underlying transport error is logged where the failure occurred.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
            AppError::RateLimited {
                tier,
                limit,
                reset_time,
            } => {
                let retry_after = (reset_time - Utc::now()).num_seconds().max(0);
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorResponse::with_reset_time(
                        "Too many requests. Please try again later.",
                        reset_time,
                    )),
                )
                    .into_response();

                let headers = response.headers_mut();
                if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                    headers.insert(axum::http::header::RETRY_AFTER, value);
                }
                insert_rate_limit_header(headers, tier, "Limit", limit);
                insert_rate_limit_header(headers, tier, "Remaining", 0);

                response
            }
            AppError::Dispatch(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(msg)),
            )
                .into_response(),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

/// Insert an `X-RateLimit-{tier}-{suffix}` header, e.g. `X-RateLimit-Rapid-Remaining`
pub fn insert_rate_limit_header(
    headers: &mut axum::http::HeaderMap,
    tier: &str,
    suffix: &str,
    value: u32,
) {
    let name = format!("x-ratelimit-{}-{}", tier.to_lowercase(), suffix.to_lowercase());
    if let (Ok(name), Ok(value)) = (
        HeaderName::try_from(name),
        HeaderValue::from_str(&value.to_string()),
    ) {
        headers.insert(name, value);
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
