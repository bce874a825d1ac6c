use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use glimpse_common::observability::panic_message;
use glimpse_feed::FeedError;
use serde::{Deserialize, Serialize};

/// Body of every fault response: `{"Error": "<detail>"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct FaultBody {
    #[serde(rename = "Error")]
    pub error: String,
}

pub struct ApiError(StatusCode, FaultBody);

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError(
            StatusCode::INTERNAL_SERVER_ERROR,
            FaultBody {
                error: detail.into(),
            },
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

impl From<FeedError> for ApiError {
    fn from(value: FeedError) -> Self {
        tracing::error!(error = %value, "feed.fault");
        ApiError::internal(value.to_string())
    }
}

/// Response for a request whose handler panicked.
///
/// The location and backtrace are logged by the process panic hook; this only
/// shapes the client-facing body.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic_message(payload.as_ref());
    tracing::error!(detail = %detail, "request.panicked");
    ApiError::internal(detail).into_response()
}
