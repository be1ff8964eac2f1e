//! The `InterviewStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `rehearse-store-sqlite`).
//! [`crate::lifecycle::InterviewService`] depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  interview::{Interview, InterviewCategory, InterviewDifficulty},
  user::{NewUser, User, UserAnalytics},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`InterviewStore::list_interviews`] and
/// [`InterviewStore::count_interviews`]. Results are newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewQuery {
  pub user_id:    Option<Uuid>,
  pub category:   Option<InterviewCategory>,
  pub difficulty: Option<InterviewDifficulty>,
  /// Ignored by `count_interviews`.
  pub limit:      Option<usize>,
  /// Ignored by `count_interviews`.
  pub offset:     Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the record store holding users and interviews.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait InterviewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user with default preferences and empty analytics.
  /// Returns `None` if the email is already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Emails are compared case-insensitively.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Overwrite the cached analytics. Returns `false` if the user is unknown.
  fn save_user_analytics<'a>(
    &'a self,
    id: Uuid,
    analytics: &'a UserAnalytics,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Append `interview_id` to the end of the user's interview list.
  fn append_user_interview(
    &self,
    user_id: Uuid,
    interview_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Interviews ────────────────────────────────────────────────────────

  fn insert_interview<'a>(
    &'a self,
    interview: &'a Interview,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_interview(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Interview>, Self::Error>> + Send + '_;

  /// Replace the stored interview if its revision still equals
  /// `interview.revision`, storing it with the revision incremented.
  ///
  /// Returns `false` without writing when the revision has moved on or the
  /// interview does not exist.
  fn update_interview<'a>(
    &'a self,
    interview: &'a Interview,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn list_interviews<'a>(
    &'a self,
    query: &'a InterviewQuery,
  ) -> impl Future<Output = Result<Vec<Interview>, Self::Error>> + Send + 'a;

  fn count_interviews<'a>(
    &'a self,
    query: &'a InterviewQuery,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;
}
