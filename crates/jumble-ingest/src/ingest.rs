//! One ingestion run: existence check, fetch, parse, derive, insert.

use chrono::{NaiveDate, Utc};
use jumble_core::{
  feed::parse_feed,
  puzzle::PuzzleView,
  store::{DateConflict as _, PuzzleStore},
};

use crate::{error::IngestError, locator::FeedLocator};

/// What to ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
  pub date:     NaiveDate,
  /// Explicit feed URL; bypasses the configured templates.
  pub json_url: Option<String>,
}

#[derive(Debug, Clone)]
pub enum IngestOutcome {
  /// A puzzle for the date was already stored; nothing was written.
  AlreadyExists { date: NaiveDate },
  Inserted(PuzzleView),
}

/// The calendar date ingestion treats as "today" (UTC).
pub fn today() -> NaiveDate { Utc::now().date_naive() }

/// Run a single ingestion for `request.date`.
///
/// The existence check happens before any network traffic. The store's
/// uniqueness constraint still decides the race between two concurrent runs;
/// losing it is reported as [`IngestOutcome::AlreadyExists`].
pub async fn ingest<S>(
  store: &S,
  locator: &FeedLocator,
  request: IngestRequest,
) -> Result<IngestOutcome, IngestError>
where
  S: PuzzleStore,
{
  let IngestRequest { date, json_url } = request;

  let existing = store.find_by_date(date).await.map_err(IngestError::persistence)?;
  if existing.is_some() {
    tracing::info!(%date, "puzzle already exists");
    return Ok(IngestOutcome::AlreadyExists { date });
  }

  let fetched = locator.fetch(date, json_url.as_deref()).await?;
  tracing::info!(url = %fetched.url, bytes = fetched.body.len(), "fetched feed");

  let new_puzzle = parse_feed(&fetched.body)?.into_new_puzzle(date)?;
  tracing::info!(%date, words = new_puzzle.words.len(), "inserting new puzzle");

  match store.insert_puzzle(new_puzzle).await {
    Ok(view) => {
      tracing::info!(%date, puzzle_id = %view.puzzle.puzzle_id, "puzzle added");
      Ok(IngestOutcome::Inserted(view))
    }
    Err(e) if e.is_date_conflict() => {
      tracing::warn!(%date, "puzzle inserted concurrently by another run");
      Ok(IngestOutcome::AlreadyExists { date })
    }
    Err(e) => Err(IngestError::persistence(e)),
  }
}

#[cfg(test)]
mod tests {
  use jumble_core::{
    puzzle::{JumbleWord, NewJumbleWord, NewPuzzle, Puzzle},
    store::{DateConflict, PuzzleStore},
  };
  use jumble_store_sqlite::SqliteStore;
  use uuid::Uuid;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;
  use crate::locator::FeedConfig;

  const FEED: &str = r#"/**/jsonCallback({
    "Date": "20240315",
    "Clues": {
      "c1": "NEDRAG", "a1": "GARDEN", "o1": "2,5",
      "c2": "TLNAP",  "a2": "PLANT",  "o2": "1,3",
      "c3": "KOBO",   "a3": "BOOK",   "o3": "",
      "c4": "NEFR",   "a4": "FERN"
    },
    "Caption": { "v1": "What the gardener read" },
    "Solution": { "s1": "A {PLANT} [BOOK]" },
    "Image": "https://example.com/cartoon.gif"
  })"#;

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, 15).unwrap() }

  fn request() -> IngestRequest { IngestRequest { date: date(), json_url: None } }

  fn locator(server: &MockServer) -> FeedLocator {
    FeedLocator::new(FeedConfig {
      url_templates: vec![format!("{}/tmjmf{{date}}-data.json", server.uri())],
      cache_bust:    false,
      timeout_secs:  Some(5),
    })
    .unwrap()
  }

  // ── Store that never has the date and always fails the insert ────────────

  #[derive(Debug, thiserror::Error)]
  #[error("insert refused (date conflict: {conflict})")]
  struct RefusedInsert {
    conflict: bool,
  }

  impl DateConflict for RefusedInsert {
    fn is_date_conflict(&self) -> bool { self.conflict }
  }

  struct RefusingStore {
    conflict: bool,
  }

  impl PuzzleStore for RefusingStore {
    type Error = RefusedInsert;

    async fn find_by_date(&self, _date: NaiveDate) -> Result<Option<Puzzle>, RefusedInsert> {
      Ok(None)
    }

    async fn insert_puzzle(&self, _input: NewPuzzle) -> Result<PuzzleView, RefusedInsert> {
      Err(RefusedInsert { conflict: self.conflict })
    }

    async fn get_words(&self, _puzzle_id: Uuid) -> Result<Vec<JumbleWord>, RefusedInsert> {
      Ok(Vec::new())
    }

    async fn materialize(&self, _date: NaiveDate) -> Result<Option<PuzzleView>, RefusedInsert> {
      Ok(None)
    }

    async fn list_puzzles(
      &self,
      _limit: usize,
      _offset: usize,
    ) -> Result<Vec<Puzzle>, RefusedInsert> {
      Ok(Vec::new())
    }
  }

  async fn serve(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
      .and(path("/tmjmf20240315-data.json"))
      .respond_with(ResponseTemplate::new(status).set_body_string(body))
      .mount(server)
      .await;
  }

  #[tokio::test]
  async fn inserts_puzzle_and_words() {
    let server = MockServer::start().await;
    serve(&server, 200, FEED).await;
    let store = SqliteStore::open_in_memory().await.unwrap();

    let outcome = ingest(&store, &locator(&server), request()).await.unwrap();
    let view = match outcome {
      IngestOutcome::Inserted(view) => view,
      other => panic!("expected insert, got {other:?}"),
    };
    assert_eq!(view.puzzle.solution, "A PLANT BOOK");
    assert_eq!(view.puzzle.final_jumble_answer, "A PLANT BOOK");
    assert_eq!(view.puzzle.final_jumble, "AEPA");
    assert_eq!(view.words.len(), 4);

    let stored = store.materialize(date()).await.unwrap().unwrap();
    assert_eq!(stored, view);
  }

  #[tokio::test]
  async fn existing_date_performs_no_fetch_and_no_insert() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
      .expect(0)
      .mount(&server)
      .await;

    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .insert_puzzle(NewPuzzle {
        date:                date(),
        caption:             "earlier".into(),
        image_url:           String::new(),
        solution:            "X".into(),
        final_jumble:        String::new(),
        final_jumble_answer: "X".into(),
        words:               vec![NewJumbleWord {
          jumbled_word: "ATC".into(),
          answer:       "CAT".into(),
        }],
      })
      .await
      .unwrap();

    let outcome = ingest(&store, &locator(&server), request()).await.unwrap();
    assert!(matches!(outcome, IngestOutcome::AlreadyExists { date: d } if d == date()));
    assert_eq!(store.count_words().await.unwrap(), 1);
    assert_eq!(store.find_by_date(date()).await.unwrap().unwrap().caption, "earlier");
  }

  #[tokio::test]
  async fn second_run_reports_existence() {
    let server = MockServer::start().await;
    serve(&server, 200, FEED).await;
    let store   = SqliteStore::open_in_memory().await.unwrap();
    let locator = locator(&server);

    ingest(&store, &locator, request()).await.unwrap();
    let again = ingest(&store, &locator, request()).await.unwrap();
    assert!(matches!(again, IngestOutcome::AlreadyExists { .. }));
    assert_eq!(store.count_words().await.unwrap(), 4);
  }

  #[tokio::test]
  async fn malformed_payload_inserts_nothing() {
    let server = MockServer::start().await;
    serve(&server, 200, "/**/jsonCallback(<html>oops</html>)").await;
    let store = SqliteStore::open_in_memory().await.unwrap();

    let err = ingest(&store, &locator(&server), request()).await.unwrap_err();
    assert_eq!(err.kind(), "MalformedPayload");
    assert!(store.find_by_date(date()).await.unwrap().is_none());
    assert_eq!(store.count_words().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn invalid_position_inserts_nothing() {
    let server = MockServer::start().await;
    let feed = FEED.replace(r#""o1": "2,5""#, r#""o1": "2,9""#);
    serve(&server, 200, &feed).await;
    let store = SqliteStore::open_in_memory().await.unwrap();

    let err = ingest(&store, &locator(&server), request()).await.unwrap_err();
    assert_eq!(err.kind(), "InvalidPosition");
    assert!(store.find_by_date(date()).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn exhausted_fetch_inserts_nothing() {
    let server = MockServer::start().await;
    serve(&server, 503, "").await;
    let store = SqliteStore::open_in_memory().await.unwrap();

    let err = ingest(&store, &locator(&server), request()).await.unwrap_err();
    assert_eq!(err.kind(), "FetchExhausted");
    assert!(err.to_string().contains("503"), "{err}");
    assert!(store.list_puzzles(10, 0).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn losing_the_insert_race_reports_existence() {
    let server = MockServer::start().await;
    serve(&server, 200, FEED).await;
    let store = RefusingStore { conflict: true };

    let outcome = ingest(&store, &locator(&server), request()).await.unwrap();
    assert!(matches!(outcome, IngestOutcome::AlreadyExists { date: d } if d == date()));
  }

  #[tokio::test]
  async fn other_insert_failure_is_persistence_error() {
    let server = MockServer::start().await;
    serve(&server, 200, FEED).await;
    let store = RefusingStore { conflict: false };

    let err = ingest(&store, &locator(&server), request()).await.unwrap_err();
    assert_eq!(err.kind(), "PersistenceError");
    assert!(err.to_string().contains("insert refused"), "{err}");
  }

  #[tokio::test]
  async fn supplied_url_is_used_instead_of_templates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/custom/today.json"))
      .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
      .expect(1)
      .mount(&server)
      .await;
    let store = SqliteStore::open_in_memory().await.unwrap();

    let req = IngestRequest {
      date:     date(),
      json_url: Some(format!("{}/custom/today.json", server.uri())),
    };
    let outcome = ingest(&store, &locator(&server), req).await.unwrap();
    assert!(matches!(outcome, IngestOutcome::Inserted(_)));
  }
}
