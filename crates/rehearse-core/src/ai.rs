//! Contracts for the AI collaborators and parsing of their replies.
//!
//! Both collaborators return the model's raw text. Parsing lives here so that
//! every backend gets the same fence stripping, shape checks and error kinds.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  interview::{
    InterviewCategory, InterviewDifficulty, QuestionSeed, ScoreBreakdown,
  },
};

// ─── Requests ────────────────────────────────────────────────────────────────

/// What the Question Provider is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
  pub job_role:         String,
  pub job_description:  String,
  pub experience_years: u32,
  pub category:         InterviewCategory,
  pub difficulty:       InterviewDifficulty,
  pub question_count:   usize,
}

/// What the Answer Evaluator is asked to grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
  pub question:         String,
  pub user_response:    String,
  pub job_role:         String,
  pub experience_years: u32,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Generates question/model-answer pairs for a job.
pub trait QuestionProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the provider's raw reply; expected to contain
  /// `{"questions": [{"question": ..., "answer": ...}]}`.
  fn generate_questions<'a>(
    &'a self,
    request: &'a QuestionRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

/// Grades a user's response to a question.
pub trait AnswerEvaluator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the evaluator's raw reply; expected to contain an [`Evaluation`].
  fn evaluate_answer<'a>(
    &'a self,
    request: &'a EvaluationRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

// ─── Replies ─────────────────────────────────────────────────────────────────

/// A structured grade for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
  /// 1..=5.
  pub rating:          u8,
  pub feedback:        String,
  #[serde(default)]
  pub strengths:       Vec<String>,
  #[serde(default)]
  pub weaknesses:      Vec<String>,
  #[serde(default)]
  pub suggestions:     Vec<String>,
  #[serde(default)]
  pub score_breakdown: ScoreBreakdown,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestions {
  questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
  question: String,
  answer:   String,
}

/// Strip Markdown code fences and return the outermost `{...}` span.
///
/// Falls back to the trimmed text when no braces are present so the JSON
/// parser reports the failure.
pub fn extract_json_object(raw: &str) -> &str {
  let mut text = raw.trim();
  if let Some(rest) = text.strip_prefix("```") {
    // Drop the info string (`json`, `js`, ...) up to the end of the line.
    text = rest.split_once('\n').map_or(rest, |(_, body)| body);
  }
  if let Some(body) = text.trim_end().strip_suffix("```") {
    text = body;
  }
  match (text.find('{'), text.rfind('}')) {
    (Some(start), Some(end)) if start < end => &text[start..=end],
    _ => text.trim(),
  }
}

/// Parse a Question Provider reply into normalisable seeds for `request`.
///
/// Each seed inherits the category and difficulty implied by the request.
pub fn parse_generated_questions(
  raw: &str,
  request: &QuestionRequest,
) -> Result<Vec<QuestionSeed>> {
  let malformed = |reason: String| {
    tracing::warn!(%reason, raw, "question provider returned a malformed payload");
    Error::MalformedProviderResponse { reason, raw: raw.to_owned() }
  };

  let parsed: GeneratedQuestions = serde_json::from_str(extract_json_object(raw))
    .map_err(|e| malformed(e.to_string()))?;

  if parsed.questions.len() != request.question_count {
    return Err(malformed(format!(
      "expected {} questions, got {}",
      request.question_count,
      parsed.questions.len()
    )));
  }
  if let Some(i) = parsed
    .questions
    .iter()
    .position(|q| q.question.trim().is_empty() || q.answer.trim().is_empty())
  {
    return Err(malformed(format!("question {i} is missing its text or answer")));
  }

  let category = request.category.question_category();
  let difficulty = request.difficulty.question_difficulty();
  Ok(
    parsed
      .questions
      .into_iter()
      .map(|q| QuestionSeed {
        category: Some(category),
        difficulty: Some(difficulty),
        ..QuestionSeed::new(q.question, q.answer)
      })
      .collect(),
  )
}

/// Parse an Answer Evaluator reply, enforcing a 1..=5 rating and non-empty
/// feedback.
pub fn parse_evaluation(raw: &str) -> Result<Evaluation> {
  let invalid = |reason: String| {
    tracing::warn!(%reason, raw, "answer evaluator returned a malformed payload");
    Error::EvaluationParse { reason, raw: raw.to_owned() }
  };

  let evaluation: Evaluation = serde_json::from_str(extract_json_object(raw))
    .map_err(|e| invalid(e.to_string()))?;

  if !(1..=5).contains(&evaluation.rating) {
    return Err(invalid(format!("rating {} is outside 1..=5", evaluation.rating)));
  }
  if evaluation.feedback.trim().is_empty() {
    return Err(invalid("feedback is empty".to_owned()));
  }
  Ok(evaluation)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::interview::{QuestionCategory, QuestionDifficulty};

  fn request(count: usize) -> QuestionRequest {
    QuestionRequest {
      job_role:         "SRE".into(),
      job_description:  "Keep things up".into(),
      experience_years: 4,
      category:         InterviewCategory::SystemDesign,
      difficulty:       InterviewDifficulty::Advanced,
      question_count:   count,
    }
  }

  #[test]
  fn strips_json_fences() {
    let raw = "```json\n{\"a\": 1}\n```";
    assert_eq!(extract_json_object(raw), "{\"a\": 1}");
  }

  #[test]
  fn finds_object_inside_prose() {
    let raw = "Sure! Here you go: {\"a\": {\"b\": 2}} Hope it helps.";
    assert_eq!(extract_json_object(raw), "{\"a\": {\"b\": 2}}");
  }

  #[test]
  fn generated_questions_inherit_classification() {
    let raw = r#"```json
{"questions":[{"question":"Design a cache","answer":"LRU with TTL"},
              {"question":"Shard a DB","answer":"Consistent hashing"}]}
```"#;
    let seeds = parse_generated_questions(raw, &request(2)).unwrap();
    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].category, Some(QuestionCategory::Technical));
    assert_eq!(seeds[1].difficulty, Some(QuestionDifficulty::Hard));
  }

  #[test]
  fn wrong_question_count_is_malformed() {
    let raw = r#"{"questions":[{"question":"Q","answer":"A"}]}"#;
    let err = parse_generated_questions(raw, &request(3)).unwrap_err();
    assert!(matches!(err, Error::MalformedProviderResponse { .. }));
  }

  #[test]
  fn non_json_provider_reply_keeps_raw_text() {
    let err = parse_generated_questions("I cannot help with that", &request(1)).unwrap_err();
    match err {
      Error::MalformedProviderResponse { raw, .. } => assert_eq!(raw, "I cannot help with that"),
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn evaluation_defaults_optional_lists() {
    let e = parse_evaluation(r#"{"rating": 4, "feedback": "Clear answer"}"#).unwrap();
    assert_eq!(e.rating, 4);
    assert!(e.strengths.is_empty());
    assert_eq!(e.score_breakdown, ScoreBreakdown::default());
  }

  #[test]
  fn evaluation_reads_full_payload() {
    let raw = r#"```json
{"rating":3,"feedback":"Okay","strengths":["clear"],"weaknesses":["vague"],
 "suggestions":["add metrics"],
 "scoreBreakdown":{"technicalAccuracy":3,"communication":4,"problemSolving":3,"confidence":2,"relevance":5}}
```"#;
    let e = parse_evaluation(raw).unwrap();
    assert_eq!(e.score_breakdown.relevance, 5);
    assert_eq!(e.suggestions, vec!["add metrics".to_string()]);
  }

  #[test]
  fn evaluation_rejects_out_of_range_rating() {
    let err = parse_evaluation(r#"{"rating": 0, "feedback": "?"}"#).unwrap_err();
    assert!(matches!(err, Error::EvaluationParse { .. }));
    let err = parse_evaluation(r#"{"rating": 9, "feedback": "?"}"#).unwrap_err();
    assert!(matches!(err, Error::EvaluationParse { .. }));
  }

  #[test]
  fn evaluation_rejects_plain_text() {
    let err = parse_evaluation("Great answer, 5 stars").unwrap_err();
    assert!(matches!(err, Error::EvaluationParse { .. }));
  }
}
