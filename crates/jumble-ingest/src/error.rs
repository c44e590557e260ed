//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::locator::FetchExhausted;

#[derive(Debug, Error)]
pub enum IngestError {
  /// No candidate feed URL answered successfully.
  #[error(transparent)]
  FetchExhausted(#[from] FetchExhausted),
  /// The feed could not be decoded or normalised.
  #[error(transparent)]
  Feed(#[from] jumble_core::Error),
  /// The store rejected a read or write.
  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
  /// The trigger request body was unusable.
  #[error("bad request: {0}")]
  BadRequest(String),
}

impl IngestError {
  pub fn persistence(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Persistence(Box::new(e))
  }

  /// Stable name of the failure class, for logs.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::FetchExhausted(_) => "FetchExhausted",
      Self::Feed(jumble_core::Error::MalformedPayload(_)) => "MalformedPayload",
      Self::Feed(jumble_core::Error::InvalidPosition { .. }) => "InvalidPosition",
      Self::Persistence(_) => "PersistenceError",
      Self::BadRequest(_) => "BadRequest",
    }
  }
}

impl IntoResponse for IngestError {
  fn into_response(self) -> Response {
    let status = match self {
      IngestError::BadRequest(_) => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
