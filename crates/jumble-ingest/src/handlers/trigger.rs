//! POST handler that runs one ingestion.
//!
//! The body is optional. When present it is `{"date":"YYYY-MM-DD","jsonUrl":"…"}`
//! with both fields optional; a missing date means today (UTC).

use axum::{
  Json,
  body::Bytes,
  extract::State,
  response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use jumble_core::store::PuzzleStore;
use serde::Deserialize;
use serde_json::json;

use crate::{
  AppState,
  error::IngestError,
  ingest::{IngestOutcome, IngestRequest, ingest, today},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerBody {
  pub date:     Option<NaiveDate>,
  pub json_url: Option<String>,
}

/// An empty or whitespace-only body means "today, configured feed".
pub fn parse_body(body: &[u8]) -> Result<TriggerBody, IngestError> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(TriggerBody::default());
  }
  serde_json::from_slice(body).map_err(|e| IngestError::BadRequest(e.to_string()))
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<Response, IngestError>
where
  S: PuzzleStore + Clone + 'static,
{
  let body = parse_body(&body)?;
  let request = IngestRequest {
    date:     body.date.unwrap_or_else(today),
    json_url: body.json_url,
  };

  let outcome = ingest(state.store.as_ref(), &state.locator, request)
    .await
    .inspect_err(|e| tracing::error!(kind = e.kind(), error = %e, "ingestion failed"))?;

  let response = match outcome {
    IngestOutcome::AlreadyExists { date } => {
      Json(json!({ "message": format!("Puzzle for {date} already exists") }))
    }
    IngestOutcome::Inserted(view) => Json(json!({
      "success": true,
      "message": "Puzzle added successfully",
      "puzzle":  view,
    })),
  };
  Ok(response.into_response())
}
