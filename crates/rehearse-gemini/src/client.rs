//! Async HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use rehearse_core::ai::{
  AnswerEvaluator, EvaluationRequest, QuestionProvider, QuestionRequest,
};

use crate::{
  Error, Result,
  config::{GeminiConfig, HARM_CATEGORIES, SafetyThreshold},
  prompt,
};

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
  contents:          [Content<'a>; 1],
  generation_config: GenerationConfig<'a>,
  safety_settings:   Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
  role:  &'static str,
  parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
  text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
  temperature:        f32,
  top_p:              f32,
  top_k:              u32,
  max_output_tokens:  u32,
  response_mime_type: &'a str,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
  category:  &'static str,
  threshold: SafetyThreshold,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GenerateContentResponse {
  candidates:      Vec<Candidate>,
  prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Candidate {
  content:       Option<CandidateContent>,
  finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
  parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponsePart {
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
  block_reason: Option<String>,
}

impl GenerateContentResponse {
  /// Concatenated text of the first candidate.
  fn into_text(self) -> Result<String> {
    if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
      return Err(Error::Blocked(reason));
    }
    let candidate = self.candidates.into_iter().next().ok_or(Error::EmptyResponse)?;
    if candidate.finish_reason.as_deref() == Some("SAFETY") {
      return Err(Error::Blocked("SAFETY".into()));
    }
    let text: String = candidate
      .content
      .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
      .unwrap_or_default();
    if text.trim().is_empty() {
      return Err(Error::EmptyResponse);
    }
    Ok(text)
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Gemini client implementing both AI collaborator traits.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GeminiClient {
  client: Client,
  config: GeminiConfig,
}

impl GeminiClient {
  pub fn new(config: GeminiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &GeminiConfig { &self.config }

  fn url(&self) -> String {
    format!(
      "{}/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model
    )
  }

  fn request_body<'a>(&'a self, prompt: &'a str) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
      contents:          [Content { role: "user", parts: [Part { text: prompt }] }],
      generation_config: GenerationConfig {
        temperature:        self.config.temperature,
        top_p:              self.config.top_p,
        top_k:              self.config.top_k,
        max_output_tokens:  self.config.max_output_tokens,
        response_mime_type: &self.config.response_mime_type,
      },
      safety_settings:   HARM_CATEGORIES
        .iter()
        .map(|&category| SafetySetting {
          category,
          threshold: self.config.safety_threshold,
        })
        .collect(),
    }
  }

  /// Send one single-turn prompt and return the model's text.
  pub async fn generate(&self, prompt: &str) -> Result<String> {
    if self.config.api_key.is_empty() {
      return Err(Error::MissingApiKey);
    }

    let resp = self
      .client
      .post(self.url())
      .header("x-goog-api-key", &self.config.api_key)
      .json(&self.request_body(prompt))
      .send()
      .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
      tracing::warn!(status = status.as_u16(), %body, "Gemini request failed");
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
    let text = parsed.into_text()?;
    tracing::debug!(model = %self.config.model, chars = text.len(), "Gemini replied");
    Ok(text)
  }
}

impl QuestionProvider for GeminiClient {
  type Error = Error;

  async fn generate_questions(&self, request: &QuestionRequest) -> Result<String> {
    self.generate(&prompt::questions(request)).await
  }
}

impl AnswerEvaluator for GeminiClient {
  type Error = Error;

  async fn evaluate_answer(&self, request: &EvaluationRequest) -> Result<String> {
    self.generate(&prompt::evaluation(request)).await
  }
}
