//! Final-jumble derivation.
//!
//! Each clue may mark some letters of its answer as "circled" via a
//! comma-separated list of 1-based positions. The final jumble is those
//! letters, taken in list order within a clue and in clue order across clues.

use crate::{
  error::{Error, Result},
  feed::Clue,
};

/// Extract the circled letters of `answer` named by `positions`.
///
/// `clue` is the 1-based slot number, used only for error reporting.
pub fn circled_letters(clue: usize, answer: &str, positions: &str) -> Result<String> {
  let letters: Vec<char> = answer.chars().collect();
  let invalid = |position: &str| Error::InvalidPosition {
    clue,
    position: position.to_owned(),
    answer: answer.to_owned(),
  };

  positions
    .split(',')
    .map(str::trim)
    .filter(|token| !token.is_empty())
    .map(|token| {
      let index = token.parse::<usize>().map_err(|_| invalid(token))?;
      index
        .checked_sub(1)
        .and_then(|i| letters.get(i))
        .copied()
        .ok_or_else(|| invalid(token))
    })
    .collect()
}

/// Build the final jumble from an ordered list of clue slots.
///
/// Only clues carrying both an answer and a position list contribute;
/// everything else is skipped. Returns the empty string when nothing
/// contributes.
pub fn derive_final_jumble(clues: &[Clue]) -> Result<String> {
  let mut out = String::new();

  for (i, clue) in clues.iter().enumerate() {
    let (answer, positions) = match clue {
      Clue::Complete { answer, positions, .. }
      | Clue::Partial { answer: Some(answer), positions: Some(positions), .. } => {
        (answer, positions)
      }
      Clue::Partial { .. } | Clue::Missing => continue,
    };
    out.push_str(&circled_letters(i + 1, answer, positions)?);
  }

  Ok(out)
}
