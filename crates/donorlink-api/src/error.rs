//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use donorlink_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("method not allowed: {0}")]
  MethodNotAllowed(String),

  #[error("invalid request body: {0}")]
  Body(#[from] JsonRejection),

  #[error(transparent)]
  Core(#[from] donorlink_core::Error),
}

impl ApiError {
  fn status_and_kind(&self) -> (StatusCode, &'static str) {
    match self {
      ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
      ApiError::MethodNotAllowed(_) => {
        (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed")
      }
      ApiError::Body(rejection) => (rejection.status(), "invalid_body"),
      ApiError::Core(e) => {
        let kind = e.kind();
        let status = match kind {
          ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
          ErrorKind::NotFound => StatusCode::NOT_FOUND,
          ErrorKind::RoleMismatch | ErrorKind::InvalidTransition => {
            StatusCode::CONFLICT
          }
          ErrorKind::InternalInconsistency => {
            StatusCode::INTERNAL_SERVER_ERROR
          }
        };
        (status, kind.as_str())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, kind) = self.status_and_kind();
    (status, Json(json!({ "error": self.to_string(), "kind": kind })))
      .into_response()
  }
}
