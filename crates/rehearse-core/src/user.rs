//! User accounts and the per-user state carried alongside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interview::{InterviewCategory, InterviewDifficulty};

/// A registered user.
///
/// `password_hash` never leaves the process: it is skipped by serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:            Uuid,
  pub name:          String,
  pub email:         String,
  #[serde(skip)]
  pub password_hash: String,
  /// Owned interviews in creation order.
  pub interviews:    Vec<Uuid>,
  /// Cached cross-interview summary; refreshed on demand and therefore only
  /// eventually consistent with the interviews themselves.
  pub analytics:     UserAnalytics,
  pub preferences:   Preferences,
  pub learning_path: LearningPath,
  pub subscription:  Subscription,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl User {
  /// A freshly registered user with schema defaults everywhere else.
  pub fn new(input: NewUser, now: DateTime<Utc>) -> Self {
    Self {
      id:            Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      interviews:    Vec::new(),
      analytics:     UserAnalytics::default(),
      preferences:   Preferences::default(),
      learning_path: LearningPath::default(),
      subscription:  Subscription::default(),
      created_at:    now,
      updated_at:    now,
    }
  }
}

/// Input to [`crate::store::InterviewStore::create_user`]. The password must
/// already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
}

// ─── Cached analytics ────────────────────────────────────────────────────────

/// Condensed form of [`crate::analytics::AnalyticsSummary`] stored on the
/// user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
  pub total_interviews:     usize,
  pub completed_interviews: usize,
  pub average_score:        f64,
  /// Minutes.
  pub total_practice_time:  u32,
  pub streak_days:          u32,
  pub last_practice_date:   Option<DateTime<Utc>>,
  pub best_score:           i32,
  pub improvement_rate:     f64,
  pub strengths:            Vec<InterviewCategory>,
  pub weaknesses:           Vec<InterviewCategory>,
  pub preferred_categories: Vec<InterviewCategory>,
}

// ─── Pass-through settings ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  Light,
  Dark,
  #[default]
  Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
  /// Minutes.
  pub interview_duration: u32,
  pub question_count:     u32,
  pub difficulty_level:   InterviewDifficulty,
  pub enable_video:       bool,
  pub enable_audio:       bool,
  pub auto_save:          bool,
  pub notifications:      bool,
  pub theme:              Theme,
}

impl Default for Preferences {
  fn default() -> Self {
    Self {
      interview_duration: 30,
      question_count:     5,
      difficulty_level:   InterviewDifficulty::Intermediate,
      enable_video:       true,
      enable_audio:       true,
      auto_save:          true,
      notifications:      true,
      theme:              Theme::Auto,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningGoal {
  pub title:        String,
  pub target_score: Option<i32>,
  pub target_date:  Option<DateTime<Utc>>,
  #[serde(default)]
  pub completed:    bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningPath {
  pub current_level:     InterviewDifficulty,
  pub completed_modules: Vec<String>,
  pub current_module:    Option<String>,
  /// Percentage.
  pub progress:          u8,
  pub goals:             Vec<LearningGoal>,
}

impl Default for LearningPath {
  fn default() -> Self {
    Self {
      current_level:     InterviewDifficulty::Beginner,
      completed_modules: Vec::new(),
      current_module:    None,
      progress:          0,
      goals:             Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
  #[default]
  Free,
  Pro,
  Enterprise,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subscription {
  pub plan:                 Plan,
  pub start_date:           Option<DateTime<Utc>>,
  pub end_date:             Option<DateTime<Utc>>,
  pub interviews_remaining: u32,
  pub features:             Vec<String>,
}

impl Default for Subscription {
  fn default() -> Self {
    Self {
      plan:                 Plan::Free,
      start_date:           None,
      end_date:             None,
      interviews_remaining: 3,
      features:             Vec::new(),
    }
  }
}
