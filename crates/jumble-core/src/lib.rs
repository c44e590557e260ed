//! Core types and pure logic for the daily jumble ingester.
//!
//! This crate has no HTTP or database dependencies. It owns
//! the feed parser, the final-jumble deriver and the [`store::PuzzleStore`]
//! trait that storage backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod derive;
pub mod error;
pub mod feed;
pub mod puzzle;
pub mod store;

pub use error::{Error, Result};
