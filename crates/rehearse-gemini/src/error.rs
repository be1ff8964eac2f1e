//! Error type for `rehearse-gemini`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no Gemini API key configured")]
  MissingApiKey,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Gemini returned {status}: {body}")]
  Status { status: u16, body: String },

  /// The reply could not be decoded as a `generateContent` response.
  #[error("unexpected response body: {0}")]
  Decode(#[from] serde_json::Error),

  /// The prompt or every candidate was withheld by the safety filters.
  #[error("response blocked: {0}")]
  Blocked(String),

  #[error("response contained no text")]
  EmptyResponse,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
