//! jumble-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the ingestion trigger and read API over HTTP.
//!
//! # One-shot ingestion
//!
//! For cron or a systemd timer, run a single ingestion and exit:
//!
//! ```
//! cargo run -p jumble-ingest --bin jumble-server -- --ingest-once
//! cargo run -p jumble-ingest --bin jumble-server -- --ingest-once --date 2024-03-15
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Parser;
use jumble_ingest::{
  AppState, ServerConfig,
  ingest::{IngestOutcome, IngestRequest, ingest, today},
  locator::FeedLocator,
};
use jumble_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Daily jumble ingestion server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Run one ingestion and exit instead of serving HTTP.
  #[arg(long)]
  ingest_once: bool,

  /// Date to ingest (YYYY-MM-DD). Defaults to today, UTC.
  #[arg(long, requires = "ingest_once")]
  date: Option<NaiveDate>,

  /// Fetch this feed URL instead of the configured templates.
  #[arg(long, requires = "ingest_once")]
  json_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("store_path", "jumble.sqlite3")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("JUMBLE")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("feed.url_templates")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let locator = FeedLocator::new(server_cfg.feed.clone())
    .context("failed to build HTTP client")?;

  // Helper mode: ingest once and exit.
  if cli.ingest_once {
    let request = IngestRequest {
      date:     cli.date.unwrap_or_else(today),
      json_url: cli.json_url,
    };
    match ingest(&store, &locator, request).await {
      Ok(IngestOutcome::AlreadyExists { date }) => {
        tracing::info!(%date, "nothing to do; puzzle already stored");
      }
      Ok(IngestOutcome::Inserted(view)) => {
        tracing::info!(
          date = %view.puzzle.date,
          words = view.words.len(),
          final_jumble = %view.puzzle.final_jumble,
          "puzzle ingested",
        );
      }
      Err(e) => {
        tracing::error!(kind = e.kind(), error = %e, "ingestion failed");
        return Err(e.into());
      }
    }
    return Ok(());
  }

  let state = AppState {
    store:   Arc::new(store),
    locator: Arc::new(locator),
  };

  let app = jumble_ingest::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
