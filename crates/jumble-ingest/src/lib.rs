//! Daily jumble ingestion service.
//!
//! Exposes an axum [`Router`] with the ingestion trigger endpoint and the
//! read-only puzzle API, backed by any [`PuzzleStore`].

pub mod error;
pub mod handlers;
pub mod ingest;
pub mod locator;

pub use error::IngestError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderName, Method, header},
  routing::post,
};
use jumble_core::store::PuzzleStore;
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use handlers::trigger;
use locator::{FeedConfig, FeedLocator};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `JUMBLE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub feed:       FeedConfig,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PuzzleStore> {
  pub store:   Arc<S>,
  pub locator: Arc<FeedLocator>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the service [`Router`]: `/fetch-daily-jumble` plus `/api/*`.
///
/// Every `OPTIONS` request is answered by the CORS layer, preflight or not.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PuzzleStore + Clone + 'static,
{
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([
      header::AUTHORIZATION,
      HeaderName::from_static("x-client-info"),
      HeaderName::from_static("apikey"),
      header::CONTENT_TYPE,
    ]);

  let api = jumble_api::api_router(state.store.clone());

  Router::new()
    .route("/fetch-daily-jumble", post(trigger::handler::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(cors)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
