//! The interview lifecycle manager.
//!
//! [`InterviewService`] ties the record store to the AI collaborators. It owns
//! every write path for interviews so the derived scores are always recomputed
//! before a document reaches the store.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  ai::{
    AnswerEvaluator, Evaluation, EvaluationRequest, QuestionProvider, QuestionRequest,
    parse_evaluation, parse_generated_questions,
  },
  analytics::{AnalyticsSummary, summarize},
  interview::{
    AnswerUpdate, Interview, InterviewCategory, InterviewDifficulty, NewInterview,
    QuestionSeed, number_or_string,
  },
  scoring::{DetailedScores, InterviewAnalytics},
  store::{InterviewQuery, InterviewStore},
  user::{NewUser, User},
};

pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const MAX_QUESTION_COUNT: usize = 20;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

// ─── Inputs and outputs ──────────────────────────────────────────────────────

/// Input to [`InterviewService::generate_questions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestions {
  #[serde(default)]
  pub job_role:         String,
  #[serde(default, alias = "jobDesc")]
  pub job_description:  String,
  #[serde(
    default,
    alias = "jobExp",
    alias = "experience",
    deserialize_with = "number_or_string"
  )]
  pub experience_years: Option<u32>,
  #[serde(alias = "selectedCategory")]
  pub category:         Option<InterviewCategory>,
  #[serde(alias = "selectedDifficulty")]
  pub difficulty:       Option<InterviewDifficulty>,
  #[serde(default, deserialize_with = "number_or_string")]
  pub question_count:   Option<usize>,
}

/// Input to [`InterviewService::create_with_generated_questions`]: interview
/// metadata without questions, plus how many to generate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInterview {
  #[serde(flatten)]
  pub interview:      NewInterview,
  #[serde(default, deserialize_with = "number_or_string")]
  pub question_count: Option<usize>,
}

/// Filters and paging for [`InterviewService::list_interviews`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub user_id:    Option<Uuid>,
  pub category:   Option<InterviewCategory>,
  pub difficulty: Option<InterviewDifficulty>,
  /// 1-based.
  pub page:       Option<usize>,
  pub limit:      Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
  pub page:  usize,
  pub limit: usize,
  pub total: usize,
  pub pages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewPage {
  pub interviews: Vec<Interview>,
  pub pagination: Pagination,
}

/// The derived fields after an answer has been recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
  pub score:           i32,
  pub detailed_scores: DetailedScores,
  pub analytics:       InterviewAnalytics,
  pub revision:        u64,
}

impl AnswerOutcome {
  fn of(interview: &Interview) -> Self {
    Self {
      score:           interview.score(),
      detailed_scores: *interview.detailed_scores(),
      analytics:       interview.analytics().clone(),
      revision:        interview.revision,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
  pub evaluation: Evaluation,
  #[serde(flatten)]
  pub outcome:    AnswerOutcome,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Creates interviews, records answers and aggregates analytics.
///
/// `A` is the AI assistant; operations that need it are only available when
/// it implements the matching collaborator trait.
pub struct InterviewService<S, A> {
  store:                  Arc<S>,
  assistant:              Arc<A>,
  default_question_count: usize,
}

impl<S, A> Clone for InterviewService<S, A> {
  fn clone(&self) -> Self {
    Self {
      store:                  Arc::clone(&self.store),
      assistant:              Arc::clone(&self.assistant),
      default_question_count: self.default_question_count,
    }
  }
}

impl<S, A> InterviewService<S, A> {
  pub fn new(store: Arc<S>, assistant: Arc<A>) -> Self {
    Self { store, assistant, default_question_count: DEFAULT_QUESTION_COUNT }
  }

  /// Number of questions generated when a request does not say.
  pub fn with_default_question_count(mut self, count: usize) -> Self {
    self.default_question_count = count.clamp(1, MAX_QUESTION_COUNT);
    self
  }

  pub fn store(&self) -> &S { &self.store }
}

// ── Store-only operations ─────────────────────────────────────────────────

impl<S, A> InterviewService<S, A>
where
  S: InterviewStore,
  A: Send + Sync,
{
  /// Register an account. `input.password_hash` must already be hashed.
  pub async fn register_user(&self, mut input: NewUser) -> Result<User> {
    input.name = input.name.trim().to_owned();
    input.email = input.email.trim().to_lowercase();
    if input.name.is_empty() {
      return Err(Error::validation("name", "is required"));
    }
    if !input.email.contains('@') {
      return Err(Error::validation("email", "must be an email address"));
    }
    if input.password_hash.is_empty() {
      return Err(Error::validation("password", "is required"));
    }
    if self.find_user_by_email(&input.email).await?.is_some() {
      return Err(Error::EmailTaken);
    }

    // A concurrent signup can still win the race between the check above and
    // this insert; the store's uniqueness check settles it.
    let user = self
      .store
      .create_user(input)
      .await
      .map_err(Error::persistence)?
      .ok_or(Error::EmailTaken)?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok(user)
  }

  pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.trim().to_lowercase();
    self.store.find_user_by_email(&email).await.map_err(Error::persistence)
  }

  pub async fn get_user(&self, id: Uuid) -> Result<User> {
    self
      .store
      .get_user(id)
      .await
      .map_err(Error::persistence)?
      .ok_or(Error::UserNotFound(id))
  }

  /// Persist a new interview and link it to its owner.
  ///
  /// The insert and the link are two separate writes. If the link fails the
  /// interview stays in the store unreferenced by the user.
  pub async fn create(&self, input: NewInterview) -> Result<Interview> {
    let (user_id, experience) = input.validate()?;
    self.get_user(user_id).await?;

    let interview = Interview::new(input, user_id, experience, Utc::now());
    self
      .store
      .insert_interview(&interview)
      .await
      .map_err(Error::persistence)?;

    if let Err(e) = self.store.append_user_interview(user_id, interview.id).await {
      tracing::warn!(
        interview_id = %interview.id,
        %user_id,
        error = %e,
        "interview stored but not linked to its user"
      );
      return Err(Error::persistence(e));
    }

    tracing::info!(
      interview_id = %interview.id,
      %user_id,
      questions = interview.questions().len(),
      "interview created"
    );
    Ok(interview)
  }

  pub async fn get_interview(&self, id: Uuid) -> Result<Interview> {
    self
      .store
      .get_interview(id)
      .await
      .map_err(Error::persistence)?
      .ok_or(Error::InterviewNotFound(id))
  }

  pub async fn list_interviews(&self, params: ListParams) -> Result<InterviewPage> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let query = InterviewQuery {
      user_id:    params.user_id,
      category:   params.category,
      difficulty: params.difficulty,
      limit:      Some(limit),
      offset:     Some((page - 1) * limit),
    };

    let interviews = self
      .store
      .list_interviews(&query)
      .await
      .map_err(Error::persistence)?;
    let total = self
      .store
      .count_interviews(&query)
      .await
      .map_err(Error::persistence)?;

    Ok(InterviewPage {
      interviews,
      pagination: Pagination { page, limit, total, pages: total.div_ceil(limit) },
    })
  }

  /// Every interview the user owns, newest first.
  pub async fn list_user_interviews(&self, user_id: Uuid) -> Result<Vec<Interview>> {
    self.get_user(user_id).await?;
    let query = InterviewQuery { user_id: Some(user_id), ..InterviewQuery::default() };
    self.store.list_interviews(&query).await.map_err(Error::persistence)
  }

  /// Write a caller-graded answer into question `index`.
  ///
  /// Submitting the same answer twice leaves the same derived fields as
  /// submitting it once.
  pub async fn record_answer(
    &self,
    interview_id: Uuid,
    index: usize,
    update: AnswerUpdate,
  ) -> Result<AnswerOutcome> {
    let mut interview = self.get_interview(interview_id).await?;
    interview.answer_question(index, update, Utc::now())?;
    self.persist(&mut interview).await?;

    tracing::debug!(%interview_id, index, score = interview.score(), "answer recorded");
    Ok(AnswerOutcome::of(&interview))
  }

  /// Aggregate the user's history and cache the condensed form on the user.
  pub async fn compute_user_analytics(&self, user_id: Uuid) -> Result<AnalyticsSummary> {
    let interviews = self.list_user_interviews(user_id).await?;
    let summary = summarize(&interviews);

    let saved = self
      .store
      .save_user_analytics(user_id, &summary.to_user_analytics())
      .await
      .map_err(Error::persistence)?;
    if !saved {
      return Err(Error::UserNotFound(user_id));
    }

    tracing::info!(
      %user_id,
      total = summary.overview.total_interviews,
      completed = summary.overview.completed_interviews,
      "user analytics refreshed"
    );
    Ok(summary)
  }

  /// Compare-and-swap `interview` into the store and advance its revision.
  async fn persist(&self, interview: &mut Interview) -> Result<()> {
    let written = self
      .store
      .update_interview(interview)
      .await
      .map_err(Error::persistence)?;
    if !written {
      tracing::warn!(
        interview_id = %interview.id,
        revision = interview.revision,
        "lost update race"
      );
      return Err(Error::RevisionConflict(interview.id));
    }
    interview.revision += 1;
    Ok(())
  }
}

// ── Operations needing the Answer Evaluator ───────────────────────────────

impl<S, A> InterviewService<S, A>
where
  S: InterviewStore,
  A: AnswerEvaluator,
{
  /// Grade `user_response` with the evaluator and record it into question
  /// `index`. Nothing is written if the evaluator's reply does not parse.
  pub async fn evaluate_and_record_answer(
    &self,
    interview_id: Uuid,
    index: usize,
    user_response: String,
    time_spent: u32,
  ) -> Result<EvaluationOutcome> {
    let mut interview = self.get_interview(interview_id).await?;
    let question = interview
      .question(index)
      .ok_or(Error::QuestionNotFound { interview_id, index })?;
    if user_response.trim().is_empty() {
      return Err(Error::validation("userResponse", "must not be empty"));
    }

    let request = EvaluationRequest {
      question:         question.question.clone(),
      user_response:    user_response.clone(),
      job_role:         interview.job_role.clone(),
      experience_years: interview.experience,
    };
    let raw = self
      .assistant
      .evaluate_answer(&request)
      .await
      .map_err(Error::upstream)?;
    let evaluation = parse_evaluation(&raw)?;

    let update = AnswerUpdate {
      user_response,
      feedback: evaluation.clone().into(),
      time_spent,
    };
    interview.answer_question(index, update, Utc::now())?;
    self.persist(&mut interview).await?;

    tracing::info!(
      %interview_id,
      index,
      rating = evaluation.rating,
      score = interview.score(),
      "answer evaluated"
    );
    Ok(EvaluationOutcome { evaluation, outcome: AnswerOutcome::of(&interview) })
  }
}

// ── Operations needing the Question Provider ──────────────────────────────

impl<S, A> InterviewService<S, A>
where
  S: InterviewStore,
  A: QuestionProvider,
{
  /// Ask the provider for questions without persisting anything.
  pub async fn generate_questions(&self, input: GenerateQuestions) -> Result<Vec<QuestionSeed>> {
    if input.job_role.trim().is_empty() {
      return Err(Error::validation("jobRole", "is required"));
    }
    if input.job_description.trim().is_empty() {
      return Err(Error::validation("jobDescription", "is required"));
    }
    let experience_years = input
      .experience_years
      .ok_or_else(|| Error::validation("experience", "is required"))?;
    let question_count = input.question_count.unwrap_or(self.default_question_count);
    if !(1..=MAX_QUESTION_COUNT).contains(&question_count) {
      return Err(Error::validation(
        "questionCount",
        format!("must be between 1 and {MAX_QUESTION_COUNT}"),
      ));
    }

    let request = QuestionRequest {
      job_role: input.job_role.trim().to_owned(),
      job_description: input.job_description.trim().to_owned(),
      experience_years,
      category: input.category.unwrap_or_default(),
      difficulty: input.difficulty.unwrap_or_default(),
      question_count,
    };
    let raw = self
      .assistant
      .generate_questions(&request)
      .await
      .map_err(Error::upstream)?;
    let seeds = parse_generated_questions(&raw, &request)?;

    tracing::debug!(job_role = %request.job_role, count = seeds.len(), "questions generated");
    Ok(seeds)
  }

  /// Generate questions for the given metadata, then [`Self::create`].
  pub async fn create_with_generated_questions(
    &self,
    input: GenerateInterview,
  ) -> Result<Interview> {
    let GenerateInterview { mut interview, question_count } = input;
    let (_, experience) = interview.validate_metadata()?;

    interview.questions = self
      .generate_questions(GenerateQuestions {
        job_role: interview.job_role.clone(),
        job_description: interview.job_description.clone(),
        experience_years: Some(experience),
        category: interview.category,
        difficulty: interview.difficulty,
        question_count,
      })
      .await?;
    self.create(interview).await
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{
      Mutex,
      atomic::{AtomicBool, Ordering},
    },
  };

  use super::*;
  use crate::{
    interview::{DetailedFeedback, FeedbackPayload, QuestionCategory},
    interview::tests::{detailed, new_interview, seed},
    user::UserAnalytics,
  };

  // ─── Fakes ─────────────────────────────────────────────────────────────

  #[derive(Default)]
  struct MemoryStore {
    users:        Mutex<HashMap<Uuid, User>>,
    interviews:   Mutex<HashMap<Uuid, Interview>>,
    /// When set, every compare-and-swap fails as if another writer won.
    stale_writes: AtomicBool,
    /// When set, email lookups miss as if a concurrent signup had not yet
    /// committed.
    lagging_reads: AtomicBool,
  }

  impl MemoryStore {
    fn matching(&self, query: &InterviewQuery) -> Vec<Interview> {
      let mut out: Vec<Interview> = self
        .interviews
        .lock()
        .unwrap()
        .values()
        .filter(|i| query.user_id.is_none_or(|u| i.user_id == u))
        .filter(|i| query.category.is_none_or(|c| i.category == c))
        .filter(|i| query.difficulty.is_none_or(|d| i.difficulty == d))
        .cloned()
        .collect();
      out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
      out
    }
  }

  impl InterviewStore for MemoryStore {
    type Error = Infallible;

    async fn create_user(&self, input: NewUser) -> Result<Option<User>, Infallible> {
      let mut users = self.users.lock().unwrap();
      if users.values().any(|u| u.email.eq_ignore_ascii_case(&input.email)) {
        return Ok(None);
      }
      let user = User::new(input, Utc::now());
      users.insert(user.id, user.clone());
      Ok(Some(user))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, Infallible> {
      Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Infallible> {
      if self.lagging_reads.load(Ordering::SeqCst) {
        return Ok(None);
      }
      let users = self.users.lock().unwrap();
      Ok(users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn save_user_analytics(
      &self,
      id: Uuid,
      analytics: &UserAnalytics,
    ) -> Result<bool, Infallible> {
      let mut users = self.users.lock().unwrap();
      Ok(users.get_mut(&id).map(|u| u.analytics = analytics.clone()).is_some())
    }

    async fn append_user_interview(
      &self,
      user_id: Uuid,
      interview_id: Uuid,
    ) -> Result<(), Infallible> {
      if let Some(u) = self.users.lock().unwrap().get_mut(&user_id) {
        u.interviews.push(interview_id);
      }
      Ok(())
    }

    async fn insert_interview(&self, interview: &Interview) -> Result<(), Infallible> {
      self.interviews.lock().unwrap().insert(interview.id, interview.clone());
      Ok(())
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>, Infallible> {
      Ok(self.interviews.lock().unwrap().get(&id).cloned())
    }

    async fn update_interview(&self, interview: &Interview) -> Result<bool, Infallible> {
      if self.stale_writes.load(Ordering::SeqCst) {
        return Ok(false);
      }
      let mut interviews = self.interviews.lock().unwrap();
      match interviews.get_mut(&interview.id) {
        Some(stored) if stored.revision == interview.revision => {
          *stored = interview.clone();
          stored.revision += 1;
          Ok(true)
        }
        _ => Ok(false),
      }
    }

    async fn list_interviews(&self, query: &InterviewQuery) -> Result<Vec<Interview>, Infallible> {
      let all = self.matching(query);
      Ok(
        all
          .into_iter()
          .skip(query.offset.unwrap_or(0))
          .take(query.limit.unwrap_or(usize::MAX))
          .collect(),
      )
    }

    async fn count_interviews(&self, query: &InterviewQuery) -> Result<usize, Infallible> {
      Ok(self.matching(query).len())
    }
  }

  /// Replies with canned text.
  struct CannedAssistant {
    questions:  String,
    evaluation: String,
  }

  impl CannedAssistant {
    fn evaluating(evaluation: &str) -> Self {
      Self { questions: String::new(), evaluation: evaluation.to_owned() }
    }

    fn generating(questions: &str) -> Self {
      Self { questions: questions.to_owned(), evaluation: String::new() }
    }
  }

  impl QuestionProvider for CannedAssistant {
    type Error = Infallible;

    async fn generate_questions(&self, _: &QuestionRequest) -> Result<String, Infallible> {
      Ok(self.questions.clone())
    }
  }

  impl AnswerEvaluator for CannedAssistant {
    type Error = Infallible;

    async fn evaluate_answer(&self, _: &EvaluationRequest) -> Result<String, Infallible> {
      Ok(self.evaluation.clone())
    }
  }

  type Service = InterviewService<MemoryStore, CannedAssistant>;

  fn service(assistant: CannedAssistant) -> Service {
    InterviewService::new(Arc::new(MemoryStore::default()), Arc::new(assistant))
  }

  async fn user(svc: &Service) -> User {
    svc
      .register_user(NewUser {
        name:          "Ada".into(),
        email:         "Ada@Example.com".into(),
        password_hash: "$argon2id$stub".into(),
      })
      .await
      .unwrap()
  }

  async fn interview(svc: &Service, owner: Uuid, seeds: Vec<QuestionSeed>) -> Interview {
    let mut input = new_interview(seeds);
    input.user_id = Some(owner);
    svc.create(input).await.unwrap()
  }

  // ─── Tests ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_links_interview_and_starts_at_zero() {
    let svc = service(CannedAssistant::evaluating(""));
    let owner = user(&svc).await;
    let created = interview(&svc, owner.id, vec![seed(QuestionCategory::Technical); 3]).await;

    assert_eq!(created.score(), 0);
    assert_eq!(created.analytics().total_questions, 3);
    assert_eq!(created.analytics().answered_questions, 0);
    assert_eq!(created.analytics().average_time_per_question, 0);
    assert_eq!(svc.get_user(owner.id).await.unwrap().interviews, vec![created.id]);
  }

  #[tokio::test]
  async fn create_for_unknown_user_is_not_found() {
    let svc = service(CannedAssistant::evaluating(""));
    let err = svc
      .create(new_interview(vec![seed(QuestionCategory::General)]))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::UserNotFound(_)));
    assert!(svc.store().interviews.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn duplicate_email_is_rejected() {
    let svc = service(CannedAssistant::evaluating(""));
    let first = user(&svc).await;
    assert_eq!(first.email, "ada@example.com");
    let err = svc
      .register_user(NewUser {
        name:          "Other".into(),
        email:         "ADA@example.com".into(),
        password_hash: "x".into(),
      })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::EmailTaken));
  }

  #[tokio::test]
  async fn signup_losing_insert_race_is_email_taken() {
    let svc = service(CannedAssistant::evaluating(""));
    user(&svc).await;
    svc.store().lagging_reads.store(true, Ordering::SeqCst);
    let err = svc
      .register_user(NewUser {
        name:          "Other".into(),
        email:         "ada@example.com".into(),
        password_hash: "x".into(),
      })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::EmailTaken));
    assert_eq!(svc.store().users.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn recording_the_same_answer_twice_is_idempotent() {
    let svc = service(CannedAssistant::evaluating(""));
    let owner = user(&svc).await;
    let created = interview(
      &svc,
      owner.id,
      vec![seed(QuestionCategory::Technical), seed(QuestionCategory::Communication)],
    )
    .await;

    let once = svc.record_answer(created.id, 1, detailed("I would ask.", 4)).await.unwrap();
    let twice = svc.record_answer(created.id, 1, detailed("I would ask.", 4)).await.unwrap();

    assert_eq!(once.score, twice.score);
    assert_eq!(once.analytics, twice.analytics);
    assert_eq!(once.detailed_scores, twice.detailed_scores);
    assert_eq!(twice.revision, 2);
    // (0 + 4) / 2
    assert_eq!(twice.score, 2);
  }

  #[tokio::test]
  async fn record_answer_reports_missing_targets() {
    let svc = service(CannedAssistant::evaluating(""));
    let owner = user(&svc).await;
    let created = interview(&svc, owner.id, vec![seed(QuestionCategory::General)]).await;

    let err = svc
      .record_answer(Uuid::new_v4(), 0, detailed("x", 3))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InterviewNotFound(_)));

    let err = svc.record_answer(created.id, 7, detailed("x", 3)).await.unwrap_err();
    assert!(matches!(err, Error::QuestionNotFound { index: 7, .. }));

    let blank = AnswerUpdate {
      user_response: "x".into(),
      feedback:      FeedbackPayload::Detailed(DetailedFeedback::default()),
      time_spent:    0,
    };
    let err = svc.record_answer(created.id, 0, blank).await.unwrap_err();
    assert!(matches!(err, Error::Validation { field: "feedback", .. }));
  }

  #[tokio::test]
  async fn lost_race_is_a_revision_conflict() {
    let svc = service(CannedAssistant::evaluating(""));
    let owner = user(&svc).await;
    let created = interview(&svc, owner.id, vec![seed(QuestionCategory::General)]).await;

    svc.store().stale_writes.store(true, Ordering::SeqCst);
    let err = svc.record_answer(created.id, 0, detailed("x", 3)).await.unwrap_err();
    assert!(matches!(err, Error::RevisionConflict(id) if id == created.id));
    assert!(err.is_retryable());
  }

  #[tokio::test]
  async fn malformed_evaluation_persists_nothing() {
    let svc = service(CannedAssistant::evaluating("Great answer! 5/5"));
    let owner = user(&svc).await;
    let created = interview(&svc, owner.id, vec![seed(QuestionCategory::General)]).await;

    let err = svc
      .evaluate_and_record_answer(created.id, 0, "My answer".into(), 30)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::EvaluationParse { .. }));

    let stored = svc.get_interview(created.id).await.unwrap();
    assert_eq!(stored, created);
    assert!(stored.questions()[0].user_response.is_empty());
  }

  #[tokio::test]
  async fn evaluation_stores_rich_feedback() {
    let reply = r#"```json
{"rating": 4, "feedback": "Solid", "strengths": ["structure"], "weaknesses": [],
 "suggestions": ["quantify impact"],
 "scoreBreakdown": {"technicalAccuracy": 4, "communication": 5, "problemSolving": 4,
                    "confidence": 3, "relevance": 4}}
```"#;
    let svc = service(CannedAssistant::evaluating(reply));
    let owner = user(&svc).await;
    let created = interview(&svc, owner.id, vec![seed(QuestionCategory::Behavioral)]).await;

    let out = svc
      .evaluate_and_record_answer(created.id, 0, "Situation, task, action.".into(), 120)
      .await
      .unwrap();
    assert_eq!(out.evaluation.rating, 4);
    assert_eq!(out.outcome.score, 4);

    let stored = svc.get_interview(created.id).await.unwrap();
    let q = &stored.questions()[0];
    assert_eq!(q.feedback, "Solid");
    assert_eq!(q.suggestions, vec!["quantify impact".to_string()]);
    assert_eq!(q.score_breakdown.communication, 5);
    assert_eq!(q.time_spent, 120);
    assert_eq!(stored.analytics().strengths, vec![QuestionCategory::Behavioral]);
  }

  #[tokio::test]
  async fn generated_interview_uses_provider_questions() {
    let reply = r#"{"questions":[{"question":"Q1","answer":"A1"},{"question":"Q2","answer":"A2"}]}"#;
    let svc = service(CannedAssistant::generating(reply));
    let owner = user(&svc).await;

    let mut metadata = new_interview(vec![]);
    metadata.user_id = Some(owner.id);
    metadata.category = Some(InterviewCategory::Coding);
    let created = svc
      .create_with_generated_questions(GenerateInterview {
        interview:      metadata,
        question_count: Some(2),
      })
      .await
      .unwrap();

    assert_eq!(created.questions().len(), 2);
    assert_eq!(created.questions()[1].question, "Q2");
    assert_eq!(created.questions()[0].category, QuestionCategory::Technical);
  }

  #[tokio::test]
  async fn short_provider_reply_creates_nothing() {
    let reply = r#"{"questions":[{"question":"Q1","answer":"A1"}]}"#;
    let svc = service(CannedAssistant::generating(reply));
    let owner = user(&svc).await;

    let mut metadata = new_interview(vec![]);
    metadata.user_id = Some(owner.id);
    let err = svc
      .create_with_generated_questions(GenerateInterview {
        interview:      metadata,
        question_count: None,
      })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::MalformedProviderResponse { .. }));
    assert!(svc.store().interviews.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn question_count_is_bounded() {
    let svc = service(CannedAssistant::generating(""));
    let err = svc
      .generate_questions(GenerateQuestions {
        job_role: "Dev".into(),
        job_description: "Code".into(),
        experience_years: Some(2),
        question_count: Some(0),
        ..GenerateQuestions::default()
      })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "questionCount", .. }));
  }

  #[tokio::test]
  async fn question_generation_requires_experience() {
    let svc = service(CannedAssistant::generating(""));
    let input: GenerateQuestions = serde_json::from_str(
      r#"{"jobRole": "Dev", "jobDesc": "Code", "selectedCategory": "coding", "questionCount": "3"}"#,
    )
    .unwrap();
    assert_eq!(input.category, Some(InterviewCategory::Coding));
    assert_eq!(input.question_count, Some(3));

    let err = svc.generate_questions(input).await.unwrap_err();
    assert!(matches!(err, Error::Validation { field: "experience", .. }));
  }

  #[tokio::test]
  async fn listing_paginates_newest_first() {
    let svc = service(CannedAssistant::evaluating(""));
    let owner = user(&svc).await;
    let mut ids = Vec::new();
    for _ in 0..3 {
      ids.push(interview(&svc, owner.id, vec![seed(QuestionCategory::General)]).await.id);
    }

    let page = svc
      .list_interviews(ListParams { page: Some(2), limit: Some(2), ..ListParams::default() })
      .await
      .unwrap();
    assert_eq!(page.pagination, Pagination { page: 2, limit: 2, total: 3, pages: 2 });
    assert_eq!(page.interviews.len(), 1);

    let all = svc.list_user_interviews(owner.id).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
  }

  #[tokio::test]
  async fn analytics_are_cached_on_the_user() {
    let svc = service(CannedAssistant::evaluating(""));
    let owner = user(&svc).await;
    let a = interview(&svc, owner.id, vec![seed(QuestionCategory::General)]).await;
    interview(&svc, owner.id, vec![seed(QuestionCategory::General)]).await;
    svc.record_answer(a.id, 0, detailed("done", 4)).await.unwrap();

    let summary = svc.compute_user_analytics(owner.id).await.unwrap();
    assert_eq!(summary.overview.total_interviews, 2);
    assert_eq!(summary.overview.completed_interviews, 1);
    assert_eq!(summary.overview.best_score, 4);

    let cached = svc.get_user(owner.id).await.unwrap().analytics;
    assert_eq!(cached.completed_interviews, 1);
    assert_eq!(cached.streak_days, 1);
    assert_eq!(cached.preferred_categories, vec![InterviewCategory::General]);

    let err = svc.compute_user_analytics(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::UserNotFound(_)));
  }
}
