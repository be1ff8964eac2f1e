//! Cross-interview statistics for one user.
//!
//! [`summarize`] is pure; [`crate::lifecycle::InterviewService::compute_user_analytics`]
//! fetches the interviews and writes the condensed form back onto the user.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  interview::{Interview, InterviewCategory, InterviewDifficulty},
  scoring::round1,
  user::UserAnalytics,
};

/// Interviews scoring at least this much extend a streak.
const SUCCESS_SCORE: i32 = 3;
const STRENGTH_AVERAGE: f64 = 4.0;
const WEAKNESS_AVERAGE: f64 = 2.5;
const PREFERRED_CATEGORY_COUNT: usize = 3;

// ─── Summary types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
  pub overview:    Overview,
  pub performance: Performance,
  pub insights:    Insights,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
  pub total_interviews:     usize,
  pub completed_interviews: usize,
  /// Mean over completed interviews, one decimal.
  pub average_score:        f64,
  pub best_score:           i32,
  /// Minutes, summed over every interview.
  pub total_practice_time:  u32,
  /// Second-half mean minus first-half mean, one decimal.
  pub improvement_rate:     f64,
  pub current_streak:       u32,
  pub longest_streak:       u32,
  pub last_practice_date:   Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
  pub count:         usize,
  pub average_score: f64,
  pub best_score:    i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
  pub by_category:        BTreeMap<InterviewCategory, GroupStats>,
  pub by_difficulty:      BTreeMap<InterviewDifficulty, GroupStats>,
  /// Keyed by `YYYY-MM` of creation.
  pub by_month:           BTreeMap<String, GroupStats>,
  /// Buckets `1..=5`, one increment per completed interview.
  pub score_distribution: BTreeMap<u8, usize>,
}

impl Default for Performance {
  fn default() -> Self {
    Self {
      by_category:        BTreeMap::new(),
      by_difficulty:      BTreeMap::new(),
      by_month:           BTreeMap::new(),
      score_distribution: (1..=5).map(|b| (b, 0)).collect(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
  pub strengths:       Vec<InterviewCategory>,
  pub weaknesses:      Vec<InterviewCategory>,
  pub recommendations: Vec<String>,
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Summarise every interview a user owns. Order of `interviews` is irrelevant.
pub fn summarize(interviews: &[Interview]) -> AnalyticsSummary {
  let mut summary = AnalyticsSummary::default();
  summary.overview.total_interviews = interviews.len();
  summary.overview.total_practice_time =
    interviews.iter().map(|i| i.duration_minutes).sum();

  // Oldest first; `sort_by_key` is stable so equal timestamps keep input order.
  let mut completed: Vec<&Interview> =
    interviews.iter().filter(|i| i.is_completed()).collect();
  completed.sort_by_key(|i| i.created_at);
  summary.overview.completed_interviews = completed.len();

  if completed.is_empty() {
    return summary;
  }

  let scores: Vec<i32> = completed.iter().map(|i| i.score()).collect();
  summary.overview.average_score = round1(mean(&scores));
  summary.overview.best_score = scores.iter().copied().max().unwrap_or(0);
  summary.overview.improvement_rate = improvement_rate(&scores);
  summary.overview.last_practice_date = completed.last().map(|i| i.created_at);

  let newest_first: Vec<i32> = scores.iter().rev().copied().collect();
  let (current, longest) = streaks(&newest_first);
  summary.overview.current_streak = current;
  summary.overview.longest_streak = longest;

  let perf = &mut summary.performance;
  perf.by_category = group_by(&completed, |i| i.category);
  perf.by_difficulty = group_by(&completed, |i| i.difficulty);
  perf.by_month = group_by(&completed, |i| i.created_at.format("%Y-%m").to_string());
  for interview in &completed {
    let score = interview.score();
    if score > 5 {
      tracing::warn!(interview_id = %interview.id, score, "score above 5; counted in bucket 5");
    }
    *perf.score_distribution.entry(score.clamp(1, 5) as u8).or_insert(0) += 1;
  }

  for (category, stats) in &perf.by_category {
    if stats.average_score >= STRENGTH_AVERAGE {
      summary.insights.strengths.push(*category);
    } else if stats.average_score <= WEAKNESS_AVERAGE {
      summary.insights.weaknesses.push(*category);
    }
  }
  summary.insights.recommendations = recommendations(&summary.overview, &summary.insights);

  summary
}

impl AnalyticsSummary {
  /// The condensed form cached on the user document.
  pub fn to_user_analytics(&self) -> UserAnalytics {
    let mut by_count: Vec<(&InterviewCategory, &GroupStats)> =
      self.performance.by_category.iter().collect();
    by_count.sort_by(|a, b| b.1.count.cmp(&a.1.count));

    UserAnalytics {
      total_interviews:     self.overview.total_interviews,
      completed_interviews: self.overview.completed_interviews,
      average_score:        self.overview.average_score,
      total_practice_time:  self.overview.total_practice_time,
      streak_days:          self.overview.current_streak,
      last_practice_date:   self.overview.last_practice_date,
      best_score:           self.overview.best_score,
      improvement_rate:     self.overview.improvement_rate,
      strengths:            self.insights.strengths.clone(),
      weaknesses:           self.insights.weaknesses.clone(),
      preferred_categories: by_count
        .into_iter()
        .take(PREFERRED_CATEGORY_COUNT)
        .map(|(c, _)| *c)
        .collect(),
    }
  }
}

fn mean(scores: &[i32]) -> f64 {
  if scores.is_empty() {
    return 0.0;
  }
  f64::from(scores.iter().sum::<i32>()) / scores.len() as f64
}

/// `scores` is oldest first. The first half takes the extra element when the
/// count is odd.
fn improvement_rate(scores: &[i32]) -> f64 {
  if scores.len() < 2 {
    return 0.0;
  }
  let (first, second) = scores.split_at(scores.len().div_ceil(2));
  round1(mean(second) - mean(first))
}

/// `scores` is newest first. Returns `(current, longest)`.
fn streaks(scores: &[i32]) -> (u32, u32) {
  let mut current = 0;
  let mut longest = 0;
  let mut run = 0;
  let mut unbroken = true;
  for &score in scores {
    if score >= SUCCESS_SCORE {
      run += 1;
      if unbroken {
        current = run;
      }
    } else {
      unbroken = false;
      longest = longest.max(run);
      run = 0;
    }
  }
  (current, longest.max(run))
}

fn group_by<K, F>(interviews: &[&Interview], key: F) -> BTreeMap<K, GroupStats>
where
  K: Ord,
  F: Fn(&Interview) -> K,
{
  let mut groups: BTreeMap<K, Vec<i32>> = BTreeMap::new();
  for interview in interviews {
    groups.entry(key(interview)).or_default().push(interview.score());
  }
  groups
    .into_iter()
    .map(|(k, scores)| {
      let stats = GroupStats {
        count:         scores.len(),
        average_score: round1(mean(&scores)),
        best_score:    scores.iter().copied().max().unwrap_or(0),
      };
      (k, stats)
    })
    .collect()
}

fn join(categories: &[InterviewCategory]) -> String {
  categories.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
}

fn recommendations(overview: &Overview, insights: &Insights) -> Vec<String> {
  let mut out = Vec::new();
  if !insights.weaknesses.is_empty() {
    out.push(format!("Focus on improving your {} skills", join(&insights.weaknesses)));
  }
  if overview.average_score < 3.0 {
    out.push(
      "Consider practicing more frequently to improve your overall performance".to_owned(),
    );
  }
  if overview.improvement_rate < 0.0 {
    out.push("Review your recent interviews to identify areas for improvement".to_owned());
  }
  if !insights.strengths.is_empty() {
    out.push(format!(
      "Leverage your strengths in {} during interviews",
      join(&insights.strengths)
    ));
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::interview::tests::{at, scored};

  const DAY: i64 = 86_400;

  /// Interviews created one day apart, oldest first.
  fn history(scores: &[u8], category: InterviewCategory) -> Vec<Interview> {
    scores
      .iter()
      .enumerate()
      .map(|(n, s)| scored(*s, category, at(n as i64 * DAY)))
      .collect()
  }

  #[test]
  fn empty_history_is_all_zero() {
    let s = summarize(&[]);
    assert_eq!(s.overview, Overview::default());
    assert_eq!(s.performance.score_distribution.values().sum::<usize>(), 0);
    assert!(s.insights.recommendations.is_empty());
  }

  #[test]
  fn streaks_scan_newest_to_oldest() {
    // Newest first: [5, 4, 2, 5, 5]
    assert_eq!(streaks(&[5, 4, 2, 5, 5]), (2, 2));
    assert_eq!(streaks(&[2, 5, 5, 5]), (0, 3));
    assert_eq!(streaks(&[3, 3, 3]), (3, 3));
  }

  #[test]
  fn streaks_follow_creation_order() {
    // Oldest first, so newest first reads [5, 4, 2, 5, 5].
    let s = summarize(&history(&[5, 5, 2, 4, 5], InterviewCategory::General));
    assert_eq!(s.overview.current_streak, 2);
    assert_eq!(s.overview.longest_streak, 2);
  }

  #[test]
  fn category_grouping_reports_count_average_best() {
    let s = summarize(&history(&[4, 2], InterviewCategory::Technical));
    let tech = &s.performance.by_category[&InterviewCategory::Technical];
    assert_eq!(tech.count, 2);
    assert_eq!(tech.average_score, 3.0);
    assert_eq!(tech.best_score, 4);
  }

  #[test]
  fn unscored_interviews_count_in_total_only() {
    let mut interviews = history(&[4], InterviewCategory::Coding);
    interviews.push(scored(0, InterviewCategory::Coding, at(5 * DAY)));
    let s = summarize(&interviews);
    assert_eq!(s.overview.total_interviews, 2);
    assert_eq!(s.overview.completed_interviews, 1);
    assert_eq!(s.overview.total_practice_time, 60);
    assert_eq!(s.overview.last_practice_date, Some(at(0)));
  }

  #[test]
  fn improvement_rate_compares_halves() {
    // First half [1, 2] -> 1.5, second half [4] -> 4.0
    let s = summarize(&history(&[1, 2, 4], InterviewCategory::General));
    assert_eq!(s.overview.improvement_rate, 2.5);

    let s = summarize(&history(&[5, 5, 1, 2], InterviewCategory::General));
    assert_eq!(s.overview.improvement_rate, -3.5);
    assert!(s.insights.recommendations.iter().any(|r| r.starts_with("Review")));
  }

  #[test]
  fn single_completed_interview_has_no_improvement_rate() {
    let s = summarize(&history(&[3], InterviewCategory::General));
    assert_eq!(s.overview.improvement_rate, 0.0);
  }

  #[test]
  fn distribution_and_averages() {
    let s = summarize(&history(&[1, 3, 3, 5], InterviewCategory::Behavioral));
    assert_eq!(s.performance.score_distribution[&1], 1);
    assert_eq!(s.performance.score_distribution[&3], 2);
    assert_eq!(s.performance.score_distribution[&5], 1);
    assert_eq!(s.performance.score_distribution[&2], 0);
    assert_eq!(s.overview.average_score, 3.0);
    assert_eq!(s.overview.best_score, 5);
  }

  #[test]
  fn insights_classify_categories() {
    let mut interviews = history(&[5, 4], InterviewCategory::Technical);
    interviews.extend(history(&[2, 2], InterviewCategory::Behavioral));
    interviews.extend(history(&[3], InterviewCategory::Leadership));
    let s = summarize(&interviews);
    assert_eq!(s.insights.strengths, vec![InterviewCategory::Technical]);
    assert_eq!(s.insights.weaknesses, vec![InterviewCategory::Behavioral]);
    let recs = &s.insights.recommendations;
    assert!(recs.contains(&"Focus on improving your behavioral skills".to_string()));
    assert!(recs.contains(&"Leverage your strengths in technical during interviews".to_string()));
  }

  #[test]
  fn months_group_by_creation() {
    let jan = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
    let feb = Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap();
    let interviews = vec![
      scored(4, InterviewCategory::General, jan),
      scored(2, InterviewCategory::General, jan),
      scored(5, InterviewCategory::General, feb),
    ];
    let s = summarize(&interviews);
    assert_eq!(s.performance.by_month["2025-01"].count, 2);
    assert_eq!(s.performance.by_month["2025-02"].best_score, 5);
  }

  #[test]
  fn condensed_form_ranks_preferred_categories() {
    let mut interviews = history(&[3], InterviewCategory::Coding);
    interviews.extend(history(&[4, 4, 4], InterviewCategory::Technical));
    interviews.extend(history(&[2, 3], InterviewCategory::Behavioral));
    interviews.extend(history(&[5], InterviewCategory::Leadership));
    let cached = summarize(&interviews).to_user_analytics();
    assert_eq!(cached.preferred_categories[0], InterviewCategory::Technical);
    assert_eq!(cached.preferred_categories[1], InterviewCategory::Behavioral);
    assert_eq!(cached.preferred_categories.len(), 3);
    assert_eq!(cached.completed_interviews, 7);
  }
}
