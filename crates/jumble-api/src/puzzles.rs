//! Handlers for `/puzzles` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/puzzles` | Newest first; optional `?limit` (default 30, max 365) and `?offset` |
//! | `GET`  | `/puzzles/:date` | `YYYY-MM-DD`; puzzle plus its words, 404 if absent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::NaiveDate;
use jumble_core::{
  puzzle::{Puzzle, PuzzleView},
  store::PuzzleStore,
};
use serde::Deserialize;

use crate::error::ApiError;

const DEFAULT_LIMIT: usize = 30;
const MAX_LIMIT: usize = 365;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /puzzles[?limit=<n>][&offset=<n>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Puzzle>>, ApiError>
where
  S: PuzzleStore,
{
  let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
  let puzzles = store
    .list_puzzles(limit, params.offset.unwrap_or(0))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(puzzles))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /puzzles/:date`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(input): Path<String>,
) -> Result<Json<PuzzleView>, ApiError>
where
  S: PuzzleStore,
{
  let date = NaiveDate::parse_from_str(&input, "%Y-%m-%d")
    .map_err(|source| ApiError::InvalidDate { input, source })?;

  let view = store
    .materialize(date)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NoPuzzle(date))?;
  Ok(Json(view))
}
