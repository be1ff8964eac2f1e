//! rehearse server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `REHEARSE_*` environment variables, opens the SQLite store, builds the
//! Gemini client and serves the JSON API under `/api`.
//!
//! Nested keys use a double underscore, e.g. `REHEARSE_GEMINI__API_KEY`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use rehearse_core::lifecycle::InterviewService;
use rehearse_gemini::GeminiClient;
use rehearse_server::ServerConfig;
use rehearse_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rehearse interview practice server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("REHEARSE")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if server_cfg.gemini.api_key.is_empty() {
    tracing::warn!("gemini.api_key is not set; question generation and evaluation will fail");
  }
  let gemini = GeminiClient::new(server_cfg.gemini.clone())
    .context("failed to build Gemini client")?;

  let service = InterviewService::new(Arc::new(store), Arc::new(gemini))
    .with_default_question_count(server_cfg.default_question_count);

  let app = rehearse_server::app(service);
  let address = server_cfg.address();

  tracing::info!(model = %server_cfg.gemini.model, "Listening on http://{address}");
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
