//! Generation parameters and connection settings.

use serde::{Deserialize, Serialize};

/// Harm categories every request carries a safety setting for.
pub const HARM_CATEGORIES: [&str; 4] = [
  "HARM_CATEGORY_HARASSMENT",
  "HARM_CATEGORY_HATE_SPEECH",
  "HARM_CATEGORY_SEXUALLY_EXPLICIT",
  "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// How aggressively Gemini withholds content in the harm categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyThreshold {
  BlockNone,
  BlockOnlyHigh,
  #[default]
  BlockMediumAndAbove,
  BlockLowAndAbove,
}

/// Settings for [`crate::GeminiClient`].
///
/// Every field has a default, so an empty config section is valid; only
/// `api_key` must be supplied before the first request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
  pub api_key:            String,
  pub base_url:           String,
  pub model:              String,
  pub temperature:        f32,
  pub top_p:              f32,
  pub top_k:              u32,
  pub max_output_tokens:  u32,
  pub response_mime_type: String,
  pub safety_threshold:   SafetyThreshold,
  pub timeout_secs:       u64,
}

impl Default for GeminiConfig {
  fn default() -> Self {
    Self {
      api_key:            String::new(),
      base_url:           "https://generativelanguage.googleapis.com/v1beta".into(),
      model:              "gemini-2.0-flash".into(),
      temperature:        0.7,
      top_p:              0.95,
      top_k:              40,
      max_output_tokens:  8192,
      response_mime_type: "text/plain".into(),
      safety_threshold:   SafetyThreshold::BlockMediumAndAbove,
      timeout_secs:       30,
    }
  }
}
