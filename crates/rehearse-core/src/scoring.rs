//! Per-interview score and analytics derivation.
//!
//! Everything here is a pure function of the question list.

use serde::{Deserialize, Serialize};

use crate::interview::{QuestionAttempt, QuestionCategory};

/// Responses longer than this many characters earn the larger length bonus.
const LONG_RESPONSE_CHARS: usize = 50;

// ─── Derived types ───────────────────────────────────────────────────────────

/// Rounded mean ratings restricted to a question category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedScores {
  pub technical:       i32,
  pub communication:   i32,
  pub problem_solving: i32,
  pub overall:         i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewAnalytics {
  pub total_questions:           usize,
  pub answered_questions:        usize,
  /// Seconds, over answered questions only.
  pub average_time_per_question: u32,
  pub strengths:                 Vec<QuestionCategory>,
  pub weaknesses:                Vec<QuestionCategory>,
  /// 0..=100.
  pub confidence_level:          u32,
}

/// The three derived fields of an interview, computed together.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
  pub score:           i32,
  pub detailed_scores: DetailedScores,
  pub analytics:       InterviewAnalytics,
}

// ─── Rounding ────────────────────────────────────────────────────────────────

/// Round half up, so `-2.5` becomes `-2` and `2.5` becomes `3`.
pub fn round_half_up(x: f64) -> f64 { (x + 0.5).floor() }

/// Round half up to one decimal place.
pub fn round1(x: f64) -> f64 { round_half_up(x * 10.0) / 10.0 }

// ─── Computation ─────────────────────────────────────────────────────────────

/// Derive score, detailed scores and analytics from `questions`.
///
/// Unanswered questions (rating 0) count towards the denominator of the
/// overall score and are bucketed as weaknesses.
pub fn score_questions(questions: &[QuestionAttempt]) -> Scorecard {
  if questions.is_empty() {
    return Scorecard {
      score:           -1,
      detailed_scores: DetailedScores::default(),
      analytics:       InterviewAnalytics::default(),
    };
  }

  let total = questions.len();
  let score = mean_rating(questions.iter()).unwrap_or(0);

  let detailed_scores = DetailedScores {
    technical:       category_score(questions, QuestionCategory::Technical),
    communication:   category_score(questions, QuestionCategory::Communication),
    problem_solving: category_score(questions, QuestionCategory::ProblemSolving),
    overall:         score,
  };

  let answered = questions.iter().filter(|q| q.is_answered()).count();
  let total_time: u64 = questions.iter().map(|q| u64::from(q.time_spent)).sum();
  let average_time_per_question = if answered > 0 {
    round_half_up(total_time as f64 / answered as f64) as u32
  } else {
    0
  };

  let strengths = distinct_categories(questions.iter().filter(|q| q.rating >= 4));
  let weaknesses = distinct_categories(questions.iter().filter(|q| q.rating <= 2));

  let confidence_sum: f64 = questions.iter().map(confidence_factor).sum();
  let confidence_level = round_half_up(confidence_sum / total as f64) as u32;

  Scorecard {
    score,
    detailed_scores,
    analytics: InterviewAnalytics {
      total_questions: total,
      answered_questions: answered,
      average_time_per_question,
      strengths,
      weaknesses,
      confidence_level,
    },
  }
}

fn mean_rating<'a>(questions: impl Iterator<Item = &'a QuestionAttempt>) -> Option<i32> {
  let (sum, count) = questions.fold((0u32, 0u32), |(s, c), q| (s + u32::from(q.rating), c + 1));
  (count > 0).then(|| round_half_up(f64::from(sum) / f64::from(count)) as i32)
}

fn category_score(questions: &[QuestionAttempt], category: QuestionCategory) -> i32 {
  mean_rating(questions.iter().filter(|q| q.category == category)).unwrap_or(0)
}

fn distinct_categories<'a>(
  questions: impl Iterator<Item = &'a QuestionAttempt>,
) -> Vec<QuestionCategory> {
  let mut out = Vec::new();
  for q in questions {
    if !out.contains(&q.category) {
      out.push(q.category);
    }
  }
  out
}

/// Weighted composite of response length, time efficiency and rating.
/// Unanswered questions contribute nothing.
fn confidence_factor(q: &QuestionAttempt) -> f64 {
  if !q.is_answered() {
    return 0.0;
  }
  let length_bonus = if q.user_response.chars().count() > LONG_RESPONSE_CHARS {
    20.0
  } else {
    10.0
  };
  let time_efficiency = if q.time_spent > 0 {
    (f64::from(q.expected_duration) / f64::from(q.time_spent) * 100.0).min(100.0)
  } else {
    50.0
  };
  let rating_factor = f64::from(q.rating) / 5.0 * 100.0;
  length_bonus + time_efficiency * 0.3 + rating_factor * 0.5
}
