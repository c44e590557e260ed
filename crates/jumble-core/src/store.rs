//! The `PuzzleStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `jumble-store-sqlite`).
//! Higher layers (`jumble-api`, `jumble-ingest`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::puzzle::{JumbleWord, NewPuzzle, Puzzle, PuzzleView};

/// Abstraction over the relational store holding puzzles and their words.
///
/// Puzzles are write-once: there is no update or delete. Backends must
/// enforce date uniqueness themselves so that two racing ingestions cannot
/// both succeed for the same day.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PuzzleStore: Send + Sync {
  type Error: std::error::Error + DateConflict + Send + Sync + 'static;

  /// Look up the puzzle for `date`. Returns `None` if there is none yet.
  fn find_by_date(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<Puzzle>, Self::Error>> + Send + '_;

  /// Persist a puzzle and all of its words atomically.
  ///
  /// Implementations must reject a second puzzle for the same date; callers
  /// can tell that case apart via [`DateConflict::is_date_conflict`].
  fn insert_puzzle(
    &self,
    input: NewPuzzle,
  ) -> impl Future<Output = Result<PuzzleView, Self::Error>> + Send + '_;

  /// Words belonging to `puzzle_id`, in clue order.
  fn get_words(
    &self,
    puzzle_id: Uuid,
  ) -> impl Future<Output = Result<Vec<JumbleWord>, Self::Error>> + Send + '_;

  /// Assemble the [`PuzzleView`] for `date`, or `None` if there is no puzzle.
  fn materialize(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<PuzzleView>, Self::Error>> + Send + '_;

  /// List puzzles newest-first.
  fn list_puzzles(
    &self,
    limit: usize,
    offset: usize,
  ) -> impl Future<Output = Result<Vec<Puzzle>, Self::Error>> + Send + '_;
}

/// Lets callers recognise a uniqueness violation on the puzzle date without
/// knowing the backend's concrete error type.
pub trait DateConflict {
  fn is_date_conflict(&self) -> bool;
}
