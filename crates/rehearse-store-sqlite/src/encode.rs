//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings so that text order
//! matches time order. Embedded structures are stored as compact JSON. UUIDs
//! are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use rehearse_core::{interview::Interview, user::User};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_json<T: Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from a `users` row plus its `user_interviews` entries.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub analytics:     String,
  pub preferences:   String,
  pub learning_path: String,
  pub subscription:  String,
  pub created_at:    String,
  pub updated_at:    String,
  /// Ordered by `position`.
  pub interviews:    Vec<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_uuid(&self.user_id)?,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      interviews:    self
        .interviews
        .iter()
        .map(|s| decode_uuid(s))
        .collect::<Result<_>>()?,
      analytics:     decode_json(&self.analytics)?,
      preferences:   decode_json(&self.preferences)?,
      learning_path: decode_json(&self.learning_path)?,
      subscription:  decode_json(&self.subscription)?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw `interviews` row: the document and its authoritative revision.
pub struct RawInterview {
  pub document: String,
  pub revision: i64,
}

impl RawInterview {
  pub fn into_interview(self) -> Result<Interview> {
    let mut interview: Interview = decode_json(&self.document)?;
    interview.revision = u64::try_from(self.revision).unwrap_or_default();
    Ok(interview)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_as_text() {
    let early = Utc.timestamp_opt(1_700_000_000, 5_000).unwrap();
    let late = Utc.timestamp_opt(1_700_000_000, 120_000_000).unwrap();
    assert!(encode_dt(early) < encode_dt(late));
    assert_eq!(encode_dt(early).len(), encode_dt(late).len());
    assert_eq!(decode_dt(&encode_dt(late)).unwrap(), late);
  }
}
