//! Puzzle and jumble-word records.
//!
//! A puzzle is created once per calendar date and never mutated. Its words
//! are written in the same batch and only ever read back alongside it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Stored records ──────────────────────────────────────────────────────────

/// One day's puzzle as persisted by a [`PuzzleStore`](crate::store::PuzzleStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
  pub puzzle_id:           Uuid,
  /// Unique key: at most one puzzle per date.
  pub date:                NaiveDate,
  pub caption:             String,
  pub image_url:           String,
  /// Cartoon solution with bracket markers removed.
  pub solution:            String,
  /// Circled letters gathered from the clue answers, in clue order.
  pub final_jumble:        String,
  pub final_jumble_answer: String,
  pub created_at:          DateTime<Utc>,
}

/// A single scrambled clue belonging to a [`Puzzle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumbleWord {
  pub word_id:      Uuid,
  pub puzzle_id:    Uuid,
  /// 0-based clue order within the puzzle.
  pub position:     u32,
  pub jumbled_word: String,
  pub answer:       String,
}

// ─── Insertion inputs ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJumbleWord {
  pub jumbled_word: String,
  pub answer:       String,
}

/// Everything needed to persist a puzzle and its words in one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPuzzle {
  pub date:                NaiveDate,
  pub caption:             String,
  pub image_url:           String,
  pub solution:            String,
  pub final_jumble:        String,
  pub final_jumble_answer: String,
  pub words:               Vec<NewJumbleWord>,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A puzzle together with its words in clue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleView {
  pub puzzle: Puzzle,
  pub words:  Vec<JumbleWord>,
}
