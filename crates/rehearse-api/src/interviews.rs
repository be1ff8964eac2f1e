//! Handlers for `/interviews` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/interviews` | `?userId=&category=&difficulty=&page=&limit=` |
//! | `POST` | `/interviews` | Body: interview metadata plus `questions` |
//! | `POST` | `/interviews/generate` | Body: metadata plus optional `questionCount` |
//! | `GET`  | `/interviews/{id}` | Adds `improvementSuggestions` |
//! | `PUT`  | `/interviews/{id}/questions/{index}/answer` | Caller-graded answer |
//! | `POST` | `/interviews/{id}/questions/{index}/evaluate` | AI-graded answer |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use rehearse_core::{
  ai::{AnswerEvaluator, QuestionProvider},
  interview::{AnswerUpdate, FeedbackPayload, Interview, NewInterview},
  lifecycle::{
    AnswerOutcome, EvaluationOutcome, GenerateInterview, InterviewPage, InterviewService,
    ListParams,
  },
  store::InterviewStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{self, Path, Query},
};

/// An interview plus coaching hints derived from it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewView {
  #[serde(flatten)]
  pub interview:               Interview,
  pub improvement_suggestions: Vec<String>,
}

impl From<Interview> for InterviewView {
  fn from(interview: Interview) -> Self {
    let improvement_suggestions = interview.improvement_suggestions();
    Self { interview, improvement_suggestions }
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /interviews`
pub async fn list<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<InterviewPage>, ApiError>
where
  S: InterviewStore,
  A: Send + Sync,
{
  Ok(Json(service.list_interviews(params).await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /interviews`
pub async fn create<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  extract::Json(body): extract::Json<NewInterview>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InterviewStore,
  A: Send + Sync,
{
  let interview = service.create(body).await?;
  Ok((StatusCode::CREATED, Json(InterviewView::from(interview))))
}

/// `POST /interviews/generate`
pub async fn generate<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  extract::Json(body): extract::Json<GenerateInterview>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InterviewStore,
  A: QuestionProvider,
{
  let interview = service.create_with_generated_questions(body).await?;
  Ok((StatusCode::CREATED, Json(InterviewView::from(interview))))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /interviews/{id}`
pub async fn get_one<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<InterviewView>, ApiError>
where
  S: InterviewStore,
  A: Send + Sync,
{
  Ok(Json(service.get_interview(id).await?.into()))
}

// ─── Answers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBody {
  #[serde(default)]
  pub user_response: String,
  /// A string or `{"feedback", "rating", ...}`.
  pub feedback:      Option<FeedbackPayload>,
  #[serde(default)]
  pub time_spent:    u32,
}

/// `PUT /interviews/{id}/questions/{index}/answer`
pub async fn record_answer<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  Path((id, index)): Path<(Uuid, usize)>,
  extract::Json(body): extract::Json<AnswerBody>,
) -> Result<Json<AnswerOutcome>, ApiError>
where
  S: InterviewStore,
  A: Send + Sync,
{
  let update = AnswerUpdate {
    user_response: body.user_response,
    feedback:      body.feedback.unwrap_or(FeedbackPayload::Text(String::new())),
    time_spent:    body.time_spent,
  };
  Ok(Json(service.record_answer(id, index, update).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateBody {
  #[serde(default)]
  pub user_response: String,
  #[serde(default)]
  pub time_spent:    u32,
}

/// `POST /interviews/{id}/questions/{index}/evaluate`
pub async fn evaluate_answer<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  Path((id, index)): Path<(Uuid, usize)>,
  extract::Json(body): extract::Json<EvaluateBody>,
) -> Result<Json<EvaluationOutcome>, ApiError>
where
  S: InterviewStore,
  A: AnswerEvaluator,
{
  let outcome = service
    .evaluate_and_record_answer(id, index, body.user_response, body.time_spent)
    .await?;
  Ok(Json(outcome))
}
