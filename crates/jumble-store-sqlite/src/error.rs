//! Error type for `jumble-store-sqlite`.

use chrono::NaiveDate;
use jumble_core::store::DateConflict;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A puzzle already exists for this date (UNIQUE constraint on `date`).
  #[error("puzzle for {0} already exists")]
  DuplicateDate(NaiveDate),
}

impl DateConflict for Error {
  fn is_date_conflict(&self) -> bool { matches!(self, Error::DuplicateDate(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
