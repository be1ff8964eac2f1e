//! Server wiring for Rehearse: configuration and the top-level router.

use std::path::PathBuf;

use axum::Router;
use rehearse_core::{
  ai::{AnswerEvaluator, QuestionProvider},
  lifecycle::{DEFAULT_QUESTION_COUNT, InterviewService},
  store::InterviewStore,
};
use rehearse_gemini::GeminiConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `REHEARSE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                   String,
  pub port:                   u16,
  pub store_path:             PathBuf,
  pub default_question_count: usize,
  pub gemini:                 GeminiConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                   "127.0.0.1".into(),
      port:                   8080,
      store_path:             PathBuf::from("~/.local/share/rehearse/rehearse.db"),
      default_question_count: DEFAULT_QUESTION_COUNT,
      gemini:                 GeminiConfig::default(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with request tracing.
pub fn app<S, A>(service: InterviewService<S, A>) -> Router
where
  S: InterviewStore + 'static,
  A: QuestionProvider + AnswerEvaluator + 'static,
{
  Router::new()
    .nest("/api", rehearse_api::api_router(service))
    .layer(TraceLayer::new_for_http())
}
