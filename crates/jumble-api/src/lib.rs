//! Read-only JSON API over the daily jumble store.
//!
//! Exposes an axum [`Router`] backed by any [`jumble_core::store::PuzzleStore`].
//! This is what the front end reads; writes only happen through ingestion.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", jumble_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod puzzles;

use std::sync::Arc;

use axum::{Router, routing::get};
use jumble_core::store::PuzzleStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PuzzleStore + 'static,
{
  Router::new()
    .route("/puzzles", get(puzzles::list::<S>))
    .route("/puzzles/{date}", get(puzzles::get_one::<S>))
    .with_state(store)
}
