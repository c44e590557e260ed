//! SQL schema for the jumble SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per calendar date. Rows are never updated or deleted.
CREATE TABLE IF NOT EXISTS puzzles (
    puzzle_id           TEXT PRIMARY KEY,
    date                TEXT NOT NULL UNIQUE,  -- YYYY-MM-DD
    caption             TEXT NOT NULL,
    image_url           TEXT NOT NULL,
    solution            TEXT NOT NULL,
    final_jumble        TEXT NOT NULL,
    final_jumble_answer TEXT NOT NULL,
    created_at          TEXT NOT NULL          -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS jumble_words (
    word_id      TEXT PRIMARY KEY,
    puzzle_id    TEXT NOT NULL REFERENCES puzzles(puzzle_id),
    position     INTEGER NOT NULL,             -- 0-based clue order
    jumbled_word TEXT NOT NULL,
    answer       TEXT NOT NULL,
    UNIQUE (puzzle_id, position)
);

CREATE INDEX IF NOT EXISTS jumble_words_puzzle_idx ON jumble_words(puzzle_id);

PRAGMA user_version = 1;
";
