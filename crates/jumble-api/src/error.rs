//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::{NaiveDate, ParseError};
use serde_json::json;
use thiserror::Error;

/// An error returned by a puzzle handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("no puzzle for {0}")]
  NoPuzzle(NaiveDate),

  /// The `{date}` path segment is not `YYYY-MM-DD`.
  #[error("invalid date {input:?}, expected YYYY-MM-DD")]
  InvalidDate {
    input:  String,
    #[source]
    source: ParseError,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::NoPuzzle(_) => StatusCode::NOT_FOUND,
      Self::InvalidDate { .. } => StatusCode::BAD_REQUEST,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}
