//! Error types for `jumble-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The feed body was not valid JSON after unwrapping, or lacked a
  /// required field.
  #[error("malformed payload: {0}")]
  MalformedPayload(#[from] serde_json::Error),

  /// A circled-letter position could not be resolved against its answer.
  #[error("clue {clue}: invalid position {position:?} for answer {answer:?}")]
  InvalidPosition {
    /// 1-based clue slot, matching the feed's `c1..c6` numbering.
    clue:     usize,
    position: String,
    answer:   String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
