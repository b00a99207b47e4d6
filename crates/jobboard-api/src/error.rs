//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("job posting not found")]
  NotFound,

  /// Detail is already logged where the failure happened; the response
  /// carries only a generic message.
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<jobboard_core::Error> for ApiError {
  fn from(e: jobboard_core::Error) -> Self {
    use jobboard_core::Error as Core;
    match e {
      Core::InvalidInput(msg) => ApiError::BadRequest(msg),
      Core::Unauthorized => ApiError::Unauthorized,
      Core::NotFound(_) => ApiError::NotFound,
      Core::StoreUnavailable(source) => ApiError::Internal(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::BadRequest(msg) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
      }
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "Unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Bearer realm=\"jobboard\""),
        );
        res
      }
      ApiError::NotFound => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "Job not found" })))
          .into_response()
      }
      ApiError::Internal(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
      )
        .into_response(),
    }
  }
}
