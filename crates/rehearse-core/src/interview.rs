//! Interview documents and their embedded question attempts.
//!
//! An [`Interview`] owns an ordered list of [`QuestionAttempt`]s. Its `score`,
//! `detailed_scores` and `analytics` are derived from that list and are only
//! ever written by [`Interview::recompute`], which every mutator calls before
//! returning. They are private for that reason.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

use crate::{
  Error, Result,
  ai::Evaluation,
  scoring::{self, DetailedScores, InterviewAnalytics},
};

/// Seconds a question is expected to take when the provider gives no hint.
pub const DEFAULT_EXPECTED_DURATION: u32 = 180;

/// Planned length of an interview session, in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

// ─── Classification ──────────────────────────────────────────────────────────

/// What kind of interview is being practised.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewCategory {
  Technical,
  Behavioral,
  Leadership,
  CaseStudy,
  SystemDesign,
  Coding,
  #[default]
  General,
}

impl InterviewCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Technical => "technical",
      Self::Behavioral => "behavioral",
      Self::Leadership => "leadership",
      Self::CaseStudy => "case-study",
      Self::SystemDesign => "system-design",
      Self::Coding => "coding",
      Self::General => "general",
    }
  }

  /// The category generated questions inherit from an interview of this
  /// category.
  pub fn question_category(&self) -> QuestionCategory {
    match self {
      Self::Technical | Self::SystemDesign | Self::Coding => {
        QuestionCategory::Technical
      }
      Self::Behavioral => QuestionCategory::Behavioral,
      Self::Leadership => QuestionCategory::Leadership,
      Self::CaseStudy => QuestionCategory::ProblemSolving,
      Self::General => QuestionCategory::General,
    }
  }
}

/// Seniority the interview targets.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InterviewDifficulty {
  Beginner,
  #[default]
  Intermediate,
  Advanced,
}

impl InterviewDifficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Beginner => "beginner",
      Self::Intermediate => "intermediate",
      Self::Advanced => "advanced",
    }
  }

  pub fn question_difficulty(&self) -> QuestionDifficulty {
    match self {
      Self::Beginner => QuestionDifficulty::Easy,
      Self::Intermediate => QuestionDifficulty::Medium,
      Self::Advanced => QuestionDifficulty::Hard,
    }
  }
}

/// Topic of a single question; drives detailed scores and strengths.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionCategory {
  Technical,
  Behavioral,
  Leadership,
  ProblemSolving,
  Communication,
  #[default]
  General,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QuestionDifficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

// ─── Question attempts ───────────────────────────────────────────────────────

/// Per-dimension sub-scores reported by the Answer Evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreBreakdown {
  pub technical_accuracy: u8,
  pub communication:      u8,
  pub problem_solving:    u8,
  pub confidence:         u8,
  pub relevance:          u8,
}

/// One question within an interview, the user's response, and its evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAttempt {
  pub question:          String,
  /// Model answer supplied by the Question Provider.
  pub answer:            String,
  #[serde(default)]
  pub user_response:     String,
  #[serde(default)]
  pub feedback:          String,
  /// 0 until evaluated, then 1..=5.
  #[serde(default)]
  pub rating:            u8,
  #[serde(default)]
  pub strengths:         Vec<String>,
  #[serde(default)]
  pub weaknesses:        Vec<String>,
  #[serde(default)]
  pub suggestions:       Vec<String>,
  #[serde(default)]
  pub score_breakdown:   ScoreBreakdown,
  #[serde(default)]
  pub category:          QuestionCategory,
  #[serde(default)]
  pub difficulty:        QuestionDifficulty,
  #[serde(default)]
  pub hints:             Vec<String>,
  #[serde(default)]
  pub keywords:          Vec<String>,
  /// Seconds.
  #[serde(default = "default_expected_duration")]
  pub expected_duration: u32,
  /// Seconds the user actually spent.
  #[serde(default)]
  pub time_spent:        u32,
}

fn default_expected_duration() -> u32 { DEFAULT_EXPECTED_DURATION }

impl QuestionAttempt {
  pub fn is_answered(&self) -> bool { !self.user_response.is_empty() }
}

/// A question as supplied at creation time, before normalisation.
///
/// Missing metadata is filled in exactly once, by [`QuestionSeed::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSeed {
  #[serde(default)]
  pub question:          String,
  #[serde(default)]
  pub answer:            String,
  pub category:          Option<QuestionCategory>,
  pub difficulty:        Option<QuestionDifficulty>,
  #[serde(default)]
  pub hints:             Vec<String>,
  #[serde(default)]
  pub keywords:          Vec<String>,
  pub expected_duration: Option<u32>,
}

impl QuestionSeed {
  pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
    Self {
      question: question.into(),
      answer: answer.into(),
      ..Self::default()
    }
  }

  /// Turn the seed into an unanswered attempt with every schema field set.
  pub fn normalize(self) -> QuestionAttempt {
    QuestionAttempt {
      question:          self.question,
      answer:            self.answer,
      user_response:     String::new(),
      feedback:          String::new(),
      rating:            0,
      strengths:         Vec::new(),
      weaknesses:        Vec::new(),
      suggestions:       Vec::new(),
      score_breakdown:   ScoreBreakdown::default(),
      category:          self.category.unwrap_or_default(),
      difficulty:        self.difficulty.unwrap_or_default(),
      hints:             self.hints,
      keywords:          self.keywords,
      expected_duration: self
        .expected_duration
        .filter(|d| *d > 0)
        .unwrap_or(DEFAULT_EXPECTED_DURATION),
      time_spent:        0,
    }
  }
}

// ─── Answers ─────────────────────────────────────────────────────────────────

/// Feedback supplied by the caller of `record_answer`: either bare text or a
/// structured payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedbackPayload {
  Text(String),
  Detailed(DetailedFeedback),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedFeedback {
  #[serde(default)]
  pub feedback:        String,
  pub rating:          Option<u8>,
  pub strengths:       Option<Vec<String>>,
  pub weaknesses:      Option<Vec<String>>,
  pub suggestions:     Option<Vec<String>>,
  pub score_breakdown: Option<ScoreBreakdown>,
}

impl FeedbackPayload {
  pub fn text(&self) -> &str {
    match self {
      Self::Text(t) => t,
      Self::Detailed(d) => &d.feedback,
    }
  }

  pub fn rating(&self) -> u8 {
    match self {
      Self::Text(_) => 0,
      Self::Detailed(d) => d.rating.unwrap_or(0),
    }
  }
}

impl From<Evaluation> for FeedbackPayload {
  fn from(e: Evaluation) -> Self {
    Self::Detailed(DetailedFeedback {
      feedback:        e.feedback,
      rating:          Some(e.rating),
      strengths:       Some(e.strengths),
      weaknesses:      Some(e.weaknesses),
      suggestions:     Some(e.suggestions),
      score_breakdown: Some(e.score_breakdown),
    })
  }
}

/// Everything written into a question slot when the user answers it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerUpdate {
  pub user_response: String,
  pub feedback:      FeedbackPayload,
  pub time_spent:    u32,
}

impl AnswerUpdate {
  /// Reject empty responses, empty feedback and ratings above 5.
  pub fn validate(&self) -> Result<()> {
    if self.user_response.trim().is_empty() {
      return Err(Error::validation("userResponse", "must not be empty"));
    }
    if self.feedback.text().trim().is_empty() {
      return Err(Error::validation("feedback", "must not be empty"));
    }
    let rating = self.feedback.rating();
    if rating > 5 {
      return Err(Error::validation(
        "feedback.rating",
        format!("must be between 0 and 5, got {rating}"),
      ));
    }
    Ok(())
  }
}

/// Accept `4` or `"4"`; HTML forms post numbers as strings. A blank string is
/// treated as absent.
pub(crate) fn number_or_string<'de, D, T>(
  deserializer: D,
) -> std::result::Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + FromStr,
  T::Err: Display,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw<T> {
    Number(T),
    Text(String),
  }

  match Option::<Raw<T>>::deserialize(deserializer)? {
    None => Ok(None),
    Some(Raw::Number(n)) => Ok(Some(n)),
    Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
    Some(Raw::Text(s)) => s
      .trim()
      .parse()
      .map(Some)
      .map_err(|e| de::Error::custom(format!("expected a number, got {s:?}: {e}"))),
  }
}

// ─── Interview ───────────────────────────────────────────────────────────────

/// Input to [`crate::lifecycle::InterviewService::create`].
///
/// Required fields are optional here so that their absence surfaces as a
/// [`Error::Validation`] rather than a deserialisation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterview {
  pub user_id:          Option<Uuid>,
  #[serde(default)]
  pub job_role:         String,
  #[serde(default, alias = "jobDesc")]
  pub job_description:  String,
  #[serde(default, alias = "jobExp", deserialize_with = "number_or_string")]
  pub experience:       Option<u32>,
  pub category:         Option<InterviewCategory>,
  pub difficulty:       Option<InterviewDifficulty>,
  pub duration_minutes: Option<u32>,
  #[serde(default)]
  pub questions:        Vec<QuestionSeed>,
  #[serde(default)]
  pub tags:             Vec<String>,
}

impl NewInterview {
  /// Check every field except `questions`, returning the owner and the
  /// required years of experience.
  pub fn validate_metadata(&self) -> Result<(Uuid, u32)> {
    let user_id = self
      .user_id
      .ok_or_else(|| Error::validation("userId", "is required"))?;
    if self.job_role.trim().is_empty() {
      return Err(Error::validation("jobRole", "is required"));
    }
    if self.job_description.trim().is_empty() {
      return Err(Error::validation("jobDescription", "is required"));
    }
    let experience = self
      .experience
      .ok_or_else(|| Error::validation("experience", "is required"))?;
    Ok((user_id, experience))
  }

  /// Full validation, including a non-empty question list.
  pub fn validate(&self) -> Result<(Uuid, u32)> {
    let owner = self.validate_metadata()?;
    if self.questions.is_empty() {
      return Err(Error::validation("questions", "at least one question is required"));
    }
    if let Some(i) = self
      .questions
      .iter()
      .position(|q| q.question.trim().is_empty() || q.answer.trim().is_empty())
    {
      return Err(Error::validation(
        "questions",
        format!("question {i} needs both question and answer text"),
      ));
    }
    Ok(owner)
  }
}

/// A persisted practice session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
  pub id:               Uuid,
  pub user_id:          Uuid,
  pub job_role:         String,
  pub job_description:  String,
  /// Years of experience the role asks for.
  pub experience:       u32,
  pub category:         InterviewCategory,
  pub difficulty:       InterviewDifficulty,
  pub duration_minutes: u32,
  #[serde(default)]
  pub tags:             Vec<String>,
  #[serde(default)]
  pub notes:            String,
  questions:            Vec<QuestionAttempt>,
  score:                i32,
  detailed_scores:      DetailedScores,
  analytics:            InterviewAnalytics,
  /// Bumped by the store on every successful update.
  pub revision:         u64,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl Interview {
  /// Build a fresh interview from validated input. Every question seed is
  /// normalised and the derived fields are computed.
  pub fn new(input: NewInterview, user_id: Uuid, experience: u32, now: DateTime<Utc>) -> Self {
    let mut interview = Self {
      id: Uuid::new_v4(),
      user_id,
      job_role: input.job_role.trim().to_owned(),
      job_description: input.job_description.trim().to_owned(),
      experience,
      category: input.category.unwrap_or_default(),
      difficulty: input.difficulty.unwrap_or_default(),
      duration_minutes: input
        .duration_minutes
        .filter(|d| *d > 0)
        .unwrap_or(DEFAULT_DURATION_MINUTES),
      tags: input.tags,
      notes: String::new(),
      questions: input.questions.into_iter().map(QuestionSeed::normalize).collect(),
      score: -1,
      detailed_scores: DetailedScores::default(),
      analytics: InterviewAnalytics::default(),
      revision: 0,
      created_at: now,
      updated_at: now,
    };
    interview.recompute();
    interview
  }

  pub fn questions(&self) -> &[QuestionAttempt] { &self.questions }

  pub fn question(&self, index: usize) -> Option<&QuestionAttempt> {
    self.questions.get(index)
  }

  /// `-1` when there are no questions, otherwise the rounded mean rating.
  pub fn score(&self) -> i32 { self.score }

  pub fn detailed_scores(&self) -> &DetailedScores { &self.detailed_scores }

  pub fn analytics(&self) -> &InterviewAnalytics { &self.analytics }

  /// Completed means at least one rated answer lifted the score above zero.
  pub fn is_completed(&self) -> bool { self.score > 0 }

  /// Write the user's response and its feedback into slot `index`, then
  /// recompute the derived fields.
  pub fn answer_question(
    &mut self,
    index: usize,
    update: AnswerUpdate,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let id = self.id;
    let attempt = self
      .questions
      .get_mut(index)
      .ok_or(Error::QuestionNotFound { interview_id: id, index })?;
    update.validate()?;

    attempt.user_response = update.user_response;
    attempt.time_spent = update.time_spent;
    attempt.rating = update.feedback.rating();
    match update.feedback {
      FeedbackPayload::Text(text) => attempt.feedback = text,
      FeedbackPayload::Detailed(d) => {
        attempt.feedback = d.feedback;
        if let Some(s) = d.strengths {
          attempt.strengths = s;
        }
        if let Some(w) = d.weaknesses {
          attempt.weaknesses = w;
        }
        if let Some(s) = d.suggestions {
          attempt.suggestions = s;
        }
        if let Some(b) = d.score_breakdown {
          attempt.score_breakdown = b;
        }
      }
    }

    self.updated_at = now;
    self.recompute();
    Ok(())
  }

  /// Re-derive `score`, `detailed_scores` and `analytics` from `questions`.
  pub fn recompute(&mut self) {
    let card = scoring::score_questions(&self.questions);
    self.score = card.score;
    self.detailed_scores = card.detailed_scores;
    self.analytics = card.analytics;
  }

  /// Rule-based coaching hints derived from this interview's analytics.
  pub fn improvement_suggestions(&self) -> Vec<String> {
    let weak = &self.analytics.weaknesses;
    let mut out = Vec::new();
    if weak.contains(&QuestionCategory::Technical) {
      out.push("Focus on technical concepts and problem-solving skills".to_owned());
    }
    if weak.contains(&QuestionCategory::Communication) {
      out.push("Practice clear and concise communication".to_owned());
    }
    if weak.contains(&QuestionCategory::Behavioral) {
      out.push("Prepare STAR method responses for behavioral questions".to_owned());
    }
    if self.analytics.average_time_per_question > 300 {
      out.push("Work on answering questions more efficiently".to_owned());
    }
    if self.analytics.confidence_level < 60 {
      out.push("Build confidence through more practice sessions".to_owned());
    }
    out
  }
}

// ─── Templates ───────────────────────────────────────────────────────────────

/// A preset interview configuration offered to users.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewTemplate {
  pub name:             &'static str,
  pub category:         InterviewCategory,
  pub difficulty:       InterviewDifficulty,
  pub question_count:   u8,
  pub duration_minutes: u32,
}

pub fn templates() -> Vec<InterviewTemplate> {
  use InterviewCategory as C;
  use InterviewDifficulty as D;
  let t = |name, category, difficulty, question_count, duration_minutes| {
    InterviewTemplate { name, category, difficulty, question_count, duration_minutes }
  };
  vec![
    t("Technical Interview", C::Technical, D::Intermediate, 5, 30),
    t("Behavioral Interview", C::Behavioral, D::Intermediate, 5, 25),
    t("Leadership Interview", C::Leadership, D::Advanced, 5, 35),
    t("System Design Interview", C::SystemDesign, D::Advanced, 3, 45),
    t("Coding Interview", C::Coding, D::Intermediate, 4, 40),
  ]
}
