//! Error types for `rehearse-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A required input field is missing or malformed.
  #[error("invalid {field}: {reason}")]
  Validation {
    field:  &'static str,
    reason: String,
  },

  #[error("interview not found: {0}")]
  InterviewNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("interview {interview_id} has no question at index {index}")]
  QuestionNotFound {
    interview_id: Uuid,
    index:        usize,
  },

  /// The Question Provider answered with something other than the expected
  /// `{"questions": [...]}` payload.
  #[error("malformed question provider response: {reason}")]
  MalformedProviderResponse { reason: String, raw: String },

  /// The Answer Evaluator answered with something other than the expected
  /// evaluation payload.
  #[error("could not parse answer evaluation: {reason}")]
  EvaluationParse { reason: String, raw: String },

  /// The interview was modified by someone else between read and write.
  #[error("interview {0} was modified concurrently; reload and retry")]
  RevisionConflict(Uuid),

  #[error("an account with this email already exists")]
  EmailTaken,

  #[error("invalid email or password")]
  InvalidCredentials,

  /// Transport-level failure talking to an AI collaborator.
  #[error("upstream service error: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
    Self::Validation { field, reason: reason.into() }
  }

  pub(crate) fn persistence<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Persistence(Box::new(e))
  }

  pub(crate) fn upstream<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Upstream(Box::new(e))
  }

  /// Whether retrying the same call may succeed.
  pub fn is_retryable(&self) -> bool {
    matches!(
      self,
      Self::MalformedProviderResponse { .. }
        | Self::EvaluationParse { .. }
        | Self::RevisionConflict(_)
        | Self::Upstream(_)
        | Self::Persistence(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
