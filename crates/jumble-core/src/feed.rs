//! Provider feed parser.
//!
//! Pipeline:
//!   raw response text
//!     └─ unwrap_callback()   → bare JSON text
//!          └─ parse_feed()   → FeedRecord (clue slots as `Clue` variants)
//!               └─ into_new_puzzle() → NewPuzzle ready for the store
//!
//! The provider serves either bare JSON or JSON wrapped in a JSONP callback,
//! e.g. `/**/jsonCallback({...})`. Both shapes decode identically.

use std::{collections::HashMap, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::{
  derive::derive_final_jumble,
  error::Result,
  puzzle::{NewJumbleWord, NewPuzzle},
};

/// The provider numbers clues `1..=MAX_CLUES` (`c1`/`a1`/`o1` … `c6`/`a6`/`o6`).
pub const MAX_CLUES: usize = 6;

static CALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*(?:/\*\*/)?\s*[A-Za-z_$][\w$.]*\s*\(((?s:.*))\)\s*;?\s*$")
    .expect("callback regex is valid")
});

static MARKER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[\[\]{}]").expect("marker regex is valid"));

// ─── Clue slots ──────────────────────────────────────────────────────────────

/// One numbered clue slot from the feed.
///
/// Empty or whitespace-only fields are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clue {
  /// Scrambled word, answer and circled-letter positions are all present.
  Complete {
    jumbled:   String,
    answer:    String,
    /// Comma-separated 1-based indices into `answer`.
    positions: String,
  },
  /// Some, but not all, of the fields are present.
  Partial {
    jumbled:   Option<String>,
    answer:    Option<String>,
    positions: Option<String>,
  },
  /// The slot is absent from the feed.
  Missing,
}

impl Clue {
  pub fn from_parts(
    jumbled: Option<String>,
    answer: Option<String>,
    positions: Option<String>,
  ) -> Self {
    match (jumbled, answer, positions) {
      (None, None, None) => Self::Missing,
      (Some(jumbled), Some(answer), Some(positions)) => {
        Self::Complete { jumbled, answer, positions }
      }
      (jumbled, answer, positions) => Self::Partial { jumbled, answer, positions },
    }
  }

  /// The stored word for this clue, if it has both a scrambled form and an
  /// answer.
  pub fn word(&self) -> Option<NewJumbleWord> {
    match self {
      Self::Complete { jumbled, answer, .. }
      | Self::Partial { jumbled: Some(jumbled), answer: Some(answer), .. } => {
        Some(NewJumbleWord {
          jumbled_word: jumbled.clone(),
          answer:       answer.clone(),
        })
      }
      Self::Partial { .. } | Self::Missing => None,
    }
  }
}

// ─── Decoded record ──────────────────────────────────────────────────────────

/// The structured content of one feed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord {
  /// The provider's own date stamp, kept verbatim; informational only.
  pub date:         Option<String>,
  pub caption:      String,
  pub image_url:    String,
  /// Solution text as served, including bracket markers around circled
  /// letters.
  pub raw_solution: String,
  /// Clue slots `1..=MAX_CLUES` in order.
  pub clues:        Vec<Clue>,
}

impl FeedRecord {
  /// Normalise this record into an insertable puzzle for `date`.
  ///
  /// Fails with [`Error::InvalidPosition`](crate::Error::InvalidPosition) if a
  /// circled-letter position does not index into its answer.
  pub fn into_new_puzzle(self, date: NaiveDate) -> Result<NewPuzzle> {
    let final_jumble = derive_final_jumble(&self.clues)?;
    let solution     = clean_solution(&self.raw_solution);
    let words        = self.clues.iter().filter_map(Clue::word).collect();

    Ok(NewPuzzle {
      date,
      caption: self.caption,
      image_url: self.image_url,
      final_jumble_answer: solution.clone(),
      solution,
      final_jumble,
      words,
    })
  }
}

// ─── Wire shape ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawFeed {
  #[serde(default)]
  date:     Option<Value>,
  #[serde(default)]
  clues:    HashMap<String, Value>,
  caption:  RawCaption,
  solution: RawSolution,
  image:    String,
}

#[derive(Deserialize)]
struct RawCaption {
  v1: String,
}

#[derive(Deserialize)]
struct RawSolution {
  s1: String,
}

/// Read a clue field as trimmed text. Numbers are accepted because position
/// lists with a single entry sometimes arrive unquoted.
fn clue_field(clues: &HashMap<String, Value>, key: &str) -> Option<String> {
  let text = match clues.get(key)? {
    Value::String(s) => s.trim().to_owned(),
    Value::Number(n) => n.to_string(),
    _ => return None,
  };
  (!text.is_empty()).then_some(text)
}

// ─── Public entry points ─────────────────────────────────────────────────────

/// Strip a JSONP callback envelope, if any, returning the inner payload.
pub fn unwrap_callback(text: &str) -> &str {
  match CALLBACK_RE.captures(text).and_then(|c| c.get(1)) {
    Some(inner) => inner.as_str(),
    None => text.trim(),
  }
}

/// Decode a raw feed response body, with or without a callback wrapper.
pub fn parse_feed(text: &str) -> Result<FeedRecord> {
  let raw: RawFeed = serde_json::from_str(unwrap_callback(text))?;

  let clues = (1..=MAX_CLUES)
    .map(|i| {
      Clue::from_parts(
        clue_field(&raw.clues, &format!("c{i}")),
        clue_field(&raw.clues, &format!("a{i}")),
        clue_field(&raw.clues, &format!("o{i}")),
      )
    })
    .collect();

  let date = raw.date.and_then(|d| match d {
    Value::String(s) => Some(s),
    Value::Null => None,
    other => Some(other.to_string()),
  });

  Ok(FeedRecord {
    date,
    caption: raw.caption.v1,
    image_url: raw.image,
    raw_solution: raw.solution.s1,
    clues,
  })
}

/// Remove `[`/`]`/`{`/`}` markers and collapse runs of whitespace.
pub fn clean_solution(raw: &str) -> String {
  MARKER_RE
    .replace_all(raw, "")
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  const PAYLOAD: &str = r#"{
    "Date": "20240315",
    "Clues": {
      "c1": "NEDRAG", "a1": "GARDEN", "o1": "2,5",
      "c2": "TLNAP",  "a2": "PLANT",  "o2": "1,3",
      "c3": "KOBO",   "a3": "BOOK",
      "c4": "",       "a4": "",       "o4": ""
    },
    "Caption": { "v1": "What the gardener read" },
    "Solution": { "s1": "A {PLANT}  [BOOK]" },
    "Image": "https://example.com/cartoon.gif"
  }"#;

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, 15).unwrap() }

  // ── Unwrapping
  // ───────────────────────────────────────────────────────────────

  #[test]
  fn unwrap_strips_legacy_callback() {
    let wrapped = r#"/**/jsonCallback({"a":1})"#;
    assert_eq!(unwrap_callback(wrapped), r#"{"a":1}"#);
  }

  #[test]
  fn unwrap_strips_named_callback_with_semicolon() {
    let wrapped = "cb_123 ( {\"a\":(1)} );\n";
    assert_eq!(unwrap_callback(wrapped), " {\"a\":(1)} ");
  }

  #[test]
  fn unwrap_leaves_bare_json_alone() {
    assert_eq!(unwrap_callback("  {\"a\":1}\n"), "{\"a\":1}");
  }

  #[test]
  fn wrapped_and_bare_payloads_decode_identically() {
    let bare     = parse_feed(PAYLOAD).unwrap();
    let wrapped  = parse_feed(&format!("/**/jsonCallback({PAYLOAD})")).unwrap();
    let multiline = parse_feed(&format!("jsonCallback(\n{PAYLOAD}\n);")).unwrap();
    assert_eq!(bare, wrapped);
    assert_eq!(bare, multiline);
  }

  // ── Decoding
  // ─────────────────────────────────────────────────────────────────

  #[test]
  fn parse_reads_top_level_fields() {
    let record = parse_feed(PAYLOAD).unwrap();
    assert_eq!(record.date.as_deref(), Some("20240315"));
    assert_eq!(record.caption, "What the gardener read");
    assert_eq!(record.image_url, "https://example.com/cartoon.gif");
    assert_eq!(record.raw_solution, "A {PLANT}  [BOOK]");
    assert_eq!(record.clues.len(), MAX_CLUES);
  }

  #[test]
  fn parse_classifies_clue_slots() {
    let record = parse_feed(PAYLOAD).unwrap();
    assert_eq!(record.clues[0], Clue::Complete {
      jumbled:   "NEDRAG".into(),
      answer:    "GARDEN".into(),
      positions: "2,5".into(),
    });
    assert_eq!(record.clues[2], Clue::Partial {
      jumbled:   Some("KOBO".into()),
      answer:    Some("BOOK".into()),
      positions: None,
    });
    // Empty strings count as absent.
    assert_eq!(record.clues[3], Clue::Missing);
    assert_eq!(record.clues[5], Clue::Missing);
  }

  #[test]
  fn numeric_position_is_accepted() {
    let text = r#"{"Clues":{"c1":"ATC","a1":"CAT","o1":2},
      "Caption":{"v1":""},"Solution":{"s1":""},"Image":""}"#;
    let record = parse_feed(text).unwrap();
    assert!(matches!(
      &record.clues[0],
      Clue::Complete { positions, .. } if positions == "2"
    ));
  }

  #[test]
  fn invalid_json_is_malformed_payload() {
    let r = parse_feed("/**/jsonCallback({not json})");
    assert!(matches!(r, Err(Error::MalformedPayload(_))));
  }

  #[test]
  fn missing_caption_is_malformed_payload() {
    let r = parse_feed(r#"{"Clues":{},"Solution":{"s1":"X"},"Image":"i"}"#);
    assert!(matches!(r, Err(Error::MalformedPayload(_))));
  }

  // ── Normalisation
  // ────────────────────────────────────────────────────────────

  #[test]
  fn clean_solution_strips_markers_and_collapses_whitespace() {
    assert_eq!(clean_solution("  A {PLANT}  [BOOK] "), "A PLANT BOOK");
    assert_eq!(clean_solution("NO-MARKERS"), "NO-MARKERS");
    assert_eq!(clean_solution("{ }"), "");
  }

  #[test]
  fn into_new_puzzle_builds_words_and_final_jumble() {
    let puzzle = parse_feed(PAYLOAD).unwrap().into_new_puzzle(date()).unwrap();
    assert_eq!(puzzle.date, date());
    assert_eq!(puzzle.solution, "A PLANT BOOK");
    assert_eq!(puzzle.final_jumble_answer, puzzle.solution);
    assert_eq!(puzzle.final_jumble, "AEPA");

    let answers: Vec<_> = puzzle.words.iter().map(|w| w.answer.as_str()).collect();
    assert_eq!(answers, ["GARDEN", "PLANT", "BOOK"]);
    assert_eq!(puzzle.words[2].jumbled_word, "KOBO");
  }

  #[test]
  fn into_new_puzzle_rejects_out_of_range_position() {
    let text = r#"{"Clues":{"c1":"ATC","a1":"CAT","o1":"4"},
      "Caption":{"v1":""},"Solution":{"s1":""},"Image":""}"#;
    let r = parse_feed(text).unwrap().into_new_puzzle(date());
    assert!(matches!(r, Err(Error::InvalidPosition { clue: 1, .. })));
  }
}
