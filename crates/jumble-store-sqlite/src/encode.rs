//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, puzzle dates as `YYYY-MM-DD`,
//! and UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use jumble_core::puzzle::{JumbleWord, Puzzle};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate
// ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPuzzle::from_row`].
pub const PUZZLE_COLUMNS: &str = "puzzle_id, date, caption, image_url, solution,
   final_jumble, final_jumble_answer, created_at";

/// Raw strings read directly from a `puzzles` row.
pub struct RawPuzzle {
  pub puzzle_id:           String,
  pub date:                String,
  pub caption:             String,
  pub image_url:           String,
  pub solution:            String,
  pub final_jumble:        String,
  pub final_jumble_answer: String,
  pub created_at:          String,
}

impl RawPuzzle {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      puzzle_id:           row.get(0)?,
      date:                row.get(1)?,
      caption:             row.get(2)?,
      image_url:           row.get(3)?,
      solution:            row.get(4)?,
      final_jumble:        row.get(5)?,
      final_jumble_answer: row.get(6)?,
      created_at:          row.get(7)?,
    })
  }

  pub fn into_puzzle(self) -> Result<Puzzle> {
    Ok(Puzzle {
      puzzle_id:           decode_uuid(&self.puzzle_id)?,
      date:                decode_date(&self.date)?,
      caption:             self.caption,
      image_url:           self.image_url,
      solution:            self.solution,
      final_jumble:        self.final_jumble,
      final_jumble_answer: self.final_jumble_answer,
      created_at:          decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `jumble_words` row.
pub struct RawWord {
  pub word_id:      String,
  pub puzzle_id:    String,
  pub position:     u32,
  pub jumbled_word: String,
  pub answer:       String,
}

impl RawWord {
  pub fn into_word(self) -> Result<JumbleWord> {
    Ok(JumbleWord {
      word_id:      decode_uuid(&self.word_id)?,
      puzzle_id:    decode_uuid(&self.puzzle_id)?,
      position:     self.position,
      jumbled_word: self.jumbled_word,
      answer:       self.answer,
    })
  }
}
