//! Question generation preview and the template catalogue.

use std::sync::Arc;

use axum::{Json, extract::State};
use rehearse_core::{
  ai::QuestionProvider,
  interview::{InterviewTemplate, QuestionSeed, templates},
  lifecycle::{GenerateQuestions, InterviewService},
  store::InterviewStore,
};
use serde::Serialize;

use crate::{error::ApiError, extract};

#[derive(Debug, Serialize)]
pub struct GeneratedQuestions {
  pub questions: Vec<QuestionSeed>,
}

/// `POST /questions/generate`. Nothing is persisted.
pub async fn generate<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  extract::Json(body): extract::Json<GenerateQuestions>,
) -> Result<Json<GeneratedQuestions>, ApiError>
where
  S: InterviewStore,
  A: QuestionProvider,
{
  let questions = service.generate_questions(body).await?;
  Ok(Json(GeneratedQuestions { questions }))
}

/// `GET /templates`
pub async fn list_templates() -> Json<Vec<InterviewTemplate>> { Json(templates()) }
