//! Error types: client-side API failures and server-side handler errors.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure talking to the highlight API.
#[derive(Error, Debug)]
pub enum ApiError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("decode error: {0}")]
  Decode(String),
}

/// Handler result type.
pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Bad request: {0}")]
  BadRequest(String),
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
  pub error: String,
  pub message: String,
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let (status, kind, message) = match &self {
      AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
      AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
    };
    (status, Json(ErrorBody { error: kind.to_string(), message })).into_response()
  }
}
