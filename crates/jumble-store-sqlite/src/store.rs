//! [`SqliteStore`]: the SQLite implementation of [`PuzzleStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use jumble_core::{
  puzzle::{JumbleWord, NewPuzzle, Puzzle, PuzzleView},
  store::PuzzleStore,
};

use crate::{
  encode::{encode_date, encode_dt, encode_uuid, RawPuzzle, RawWord, PUZZLE_COLUMNS},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A jumble store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the connection.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Total number of word rows across all puzzles.
  pub async fn count_words(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM jumble_words", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }
}

// ─── PuzzleStore impl ────────────────────────────────────────────────────────

impl PuzzleStore for SqliteStore {
  type Error = Error;

  async fn find_by_date(&self, date: NaiveDate) -> Result<Option<Puzzle>> {
    let date_str = encode_date(date);

    let raw: Option<RawPuzzle> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PUZZLE_COLUMNS} FROM puzzles WHERE date = ?1"),
            rusqlite::params![date_str],
            RawPuzzle::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPuzzle::into_puzzle).transpose()
  }

  async fn insert_puzzle(&self, input: NewPuzzle) -> Result<PuzzleView> {
    let puzzle = Puzzle {
      puzzle_id:           Uuid::new_v4(),
      date:                input.date,
      caption:             input.caption,
      image_url:           input.image_url,
      solution:            input.solution,
      final_jumble:        input.final_jumble,
      final_jumble_answer: input.final_jumble_answer,
      created_at:          Utc::now(),
    };

    let words: Vec<JumbleWord> = input
      .words
      .into_iter()
      .enumerate()
      .map(|(i, w)| JumbleWord {
        word_id:      Uuid::new_v4(),
        puzzle_id:    puzzle.puzzle_id,
        position:     i as u32,
        jumbled_word: w.jumbled_word,
        answer:       w.answer,
      })
      .collect();

    let puzzle_id_str = encode_uuid(puzzle.puzzle_id);
    let date_str      = encode_date(puzzle.date);
    let created_str   = encode_dt(puzzle.created_at);
    let caption       = puzzle.caption.clone();
    let image_url     = puzzle.image_url.clone();
    let solution      = puzzle.solution.clone();
    let final_jumble  = puzzle.final_jumble.clone();
    let final_answer  = puzzle.final_jumble_answer.clone();
    let word_rows: Vec<(String, u32, String, String)> = words
      .iter()
      .map(|w| {
        (encode_uuid(w.word_id), w.position, w.jumbled_word.clone(), w.answer.clone())
      })
      .collect();

    // Puzzle row and word batch commit together or not at all.
    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let result = tx.execute(
          "INSERT INTO puzzles (
             puzzle_id, date, caption, image_url, solution,
             final_jumble, final_jumble_answer, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            puzzle_id_str,
            date_str,
            caption,
            image_url,
            solution,
            final_jumble,
            final_answer,
            created_str,
          ],
        );
        match result {
          Ok(_) => {}
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
          {
            return Ok(false);
          }
          Err(e) => return Err(e.into()),
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO jumble_words (word_id, puzzle_id, position, jumbled_word, answer)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for (word_id, position, jumbled_word, answer) in &word_rows {
            stmt.execute(rusqlite::params![
              word_id,
              puzzle_id_str,
              position,
              jumbled_word,
              answer,
            ])?;
          }
        }

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateDate(puzzle.date));
    }

    Ok(PuzzleView { puzzle, words })
  }

  async fn get_words(&self, puzzle_id: Uuid) -> Result<Vec<JumbleWord>> {
    let id_str = encode_uuid(puzzle_id);

    let raws: Vec<RawWord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT word_id, puzzle_id, position, jumbled_word, answer
           FROM jumble_words
           WHERE puzzle_id = ?1
           ORDER BY position",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawWord {
              word_id:      row.get(0)?,
              puzzle_id:    row.get(1)?,
              position:     row.get(2)?,
              jumbled_word: row.get(3)?,
              answer:       row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWord::into_word).collect()
  }

  async fn materialize(&self, date: NaiveDate) -> Result<Option<PuzzleView>> {
    let puzzle = match self.find_by_date(date).await? {
      Some(p) => p,
      None    => return Ok(None),
    };
    let words = self.get_words(puzzle.puzzle_id).await?;
    Ok(Some(PuzzleView { puzzle, words }))
  }

  async fn list_puzzles(&self, limit: usize, offset: usize) -> Result<Vec<Puzzle>> {
    // Saturate; a wrapped negative OFFSET reads as zero.
    let limit_val  = i64::try_from(limit).unwrap_or(i64::MAX);
    let offset_val = i64::try_from(offset).unwrap_or(i64::MAX);

    let raws: Vec<RawPuzzle> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PUZZLE_COLUMNS} FROM puzzles
           ORDER BY date DESC
           LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val, offset_val], RawPuzzle::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPuzzle::into_puzzle).collect()
  }
}
