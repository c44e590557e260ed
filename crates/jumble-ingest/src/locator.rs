//! Feed locator: turns a date into candidate URLs and fetches the first one
//! that answers with a success status.
//!
//! The provider's URL scheme is unofficial and has moved around, so the
//! locator walks an ordered list of templates once, serially, with no retry.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Historical provider paths, tried in this order when no URL is supplied.
pub const LEGACY_TEMPLATES: [&str; 4] = [
  "https://www.uclick.com/puzzles/tmjmf/data/tmjmf{date}-data.json",
  "https://www.uclick.com/puzzles/tmjmf/data/tmjmf{date}.json",
  "https://www.uclick.com/puzzles/tmjmf/data/tmjmf{date}-data.php",
  "https://www.uclick.com/puzzles/tmjmf/data/tmjmf{date}.php",
];

// ─── Configuration ────────────────────────────────────────────────────────────

/// Feed settings, deserialised from the `[feed]` table of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
  /// Candidate URL templates; `{date}` expands to `yyyyMMdd`.
  pub url_templates: Vec<String>,
  /// Append `_=<unix millis>` to templated URLs.
  pub cache_bust:    bool,
  /// Per-request timeout. `None` keeps the HTTP client default.
  pub timeout_secs:  Option<u64>,
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      url_templates: LEGACY_TEMPLATES.iter().map(|t| (*t).to_owned()).collect(),
      cache_bust:    true,
      timeout_secs:  None,
    }
  }
}

// ─── Results ──────────────────────────────────────────────────────────────────

/// The body of the first candidate that answered with a 2xx status.
#[derive(Debug, Clone)]
pub struct FetchedFeed {
  pub url:  String,
  pub body: String,
}

/// Why a single candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
  pub url:    String,
  pub reason: String,
}

/// Every candidate failed. Failures are kept in attempt order.
#[derive(Debug, Error)]
#[error("no feed candidate succeeded: {}", last_reason(.failures))]
pub struct FetchExhausted {
  pub failures: Vec<CandidateFailure>,
}

impl FetchExhausted {
  pub fn last(&self) -> Option<&CandidateFailure> { self.failures.last() }
}

fn last_reason(failures: &[CandidateFailure]) -> String {
  match failures.last() {
    Some(f) => format!("{} ({})", f.reason, f.url),
    None => "no candidate URLs".to_owned(),
  }
}

// ─── Candidate construction ───────────────────────────────────────────────────

/// Build the ordered candidate list for `date`.
///
/// A caller-supplied `json_url` replaces the templates entirely and is used
/// verbatim.
pub fn build_candidates(
  templates: &[String],
  date: NaiveDate,
  json_url: Option<&str>,
  cache_buster: Option<i64>,
) -> Vec<String> {
  if let Some(url) = json_url.map(str::trim).filter(|u| !u.is_empty()) {
    return vec![url.to_owned()];
  }

  let stamp = date.format("%Y%m%d").to_string();
  templates
    .iter()
    .map(|template| {
      let url = template.replace("{date}", &stamp);
      match cache_buster {
        Some(ts) => {
          let sep = if url.contains('?') { '&' } else { '?' };
          format!("{url}{sep}_={ts}")
        }
        None => url,
      }
    })
    .collect()
}

// ─── Locator ──────────────────────────────────────────────────────────────────

/// HTTP fetcher for the provider feed.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FeedLocator {
  client: Client,
  config: FeedConfig,
}

impl FeedLocator {
  pub fn new(config: FeedConfig) -> reqwest::Result<Self> {
    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(Self { client: builder.build()?, config })
  }

  pub fn candidates(&self, date: NaiveDate, json_url: Option<&str>) -> Vec<String> {
    let buster = self.config.cache_bust.then(|| Utc::now().timestamp_millis());
    build_candidates(&self.config.url_templates, date, json_url, buster)
  }

  /// Try each candidate in order; the first 2xx response wins.
  pub async fn fetch(
    &self,
    date: NaiveDate,
    json_url: Option<&str>,
  ) -> Result<FetchedFeed, FetchExhausted> {
    let mut failures = Vec::new();

    for url in self.candidates(date, json_url) {
      tracing::info!(%url, "trying feed candidate");

      let reason = match self.client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => match resp.text().await {
          Ok(body) => return Ok(FetchedFeed { url, body }),
          Err(e) => format!("failed to read body: {e}"),
        },
        Ok(resp) => format!("HTTP {}", resp.status()),
        Err(e) => e.to_string(),
      };

      tracing::warn!(%url, %reason, "feed candidate failed");
      failures.push(CandidateFailure { url, reason });
    }

    Err(FetchExhausted { failures })
  }
}
