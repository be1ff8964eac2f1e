//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rehearse_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Core(e) => match e {
        CoreError::Validation { .. } => StatusCode::BAD_REQUEST,
        CoreError::InterviewNotFound(_)
        | CoreError::UserNotFound(_)
        | CoreError::QuestionNotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::RevisionConflict(_) | CoreError::EmailTaken => StatusCode::CONFLICT,
        CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CoreError::MalformedProviderResponse { .. }
        | CoreError::EvaluationParse { .. }
        | CoreError::Upstream(_) => StatusCode::BAD_GATEWAY,
        CoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(%status, error = %self, "request failed");
    }
    let mut body = json!({ "error": self.to_string() });
    if let ApiError::Core(e) = &self
      && e.is_retryable()
    {
      body["retryable"] = json!(true);
    }
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[test]
  fn core_errors_map_to_http_statuses() {
    let cases = [
      (CoreError::InterviewNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
      (CoreError::QuestionNotFound { interview_id: Uuid::nil(), index: 9 }, StatusCode::NOT_FOUND),
      (CoreError::RevisionConflict(Uuid::nil()), StatusCode::CONFLICT),
      (CoreError::EmailTaken, StatusCode::CONFLICT),
      (CoreError::InvalidCredentials, StatusCode::UNAUTHORIZED),
      (
        CoreError::EvaluationParse { reason: "x".into(), raw: "y".into() },
        StatusCode::BAD_GATEWAY,
      ),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).status(), status);
    }
  }
}
