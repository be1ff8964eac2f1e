//! [`SqliteStore`], the SQLite implementation of [`InterviewStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rehearse_core::{
  interview::Interview,
  store::{InterviewQuery, InterviewStore},
  user::{NewUser, User, UserAnalytics},
};

use crate::{
  Error, Result,
  encode::{RawInterview, RawUser, encode_dt, encode_json, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rehearse record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Look a user up by `user_id` or by `email`.
  async fn load_user(&self, by: UserKey) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let (column, value) = match by {
          UserKey::Id(id) => ("user_id", id),
          UserKey::Email(email) => ("email", email),
        };
        let sql = format!(
          "SELECT user_id, name, email, password_hash, analytics, preferences,
                  learning_path, subscription, created_at, updated_at
           FROM users WHERE {column} = ?1"
        );
        let raw = conn
          .query_row(&sql, rusqlite::params![value], |row| {
            Ok(RawUser {
              user_id:       row.get(0)?,
              name:          row.get(1)?,
              email:         row.get(2)?,
              password_hash: row.get(3)?,
              analytics:     row.get(4)?,
              preferences:   row.get(5)?,
              learning_path: row.get(6)?,
              subscription:  row.get(7)?,
              created_at:    row.get(8)?,
              updated_at:    row.get(9)?,
              interviews:    Vec::new(),
            })
          })
          .optional()?;

        let Some(mut raw) = raw else {
          return Ok(None);
        };
        let mut stmt = conn.prepare(
          "SELECT interview_id FROM user_interviews
           WHERE user_id = ?1 ORDER BY position",
        )?;
        raw.interviews = stmt
          .query_map(rusqlite::params![raw.user_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

enum UserKey {
  Id(String),
  Email(String),
}

/// Bound parameters shared by the list and count queries.
struct QueryParams {
  user_id:    Option<String>,
  category:   Option<&'static str>,
  difficulty: Option<&'static str>,
}

impl QueryParams {
  const WHERE: &'static str = "WHERE (?1 IS NULL OR user_id = ?1)
       AND (?2 IS NULL OR category = ?2)
       AND (?3 IS NULL OR difficulty = ?3)";

  fn from_query(query: &InterviewQuery) -> Self {
    Self {
      user_id:    query.user_id.map(encode_uuid),
      category:   query.category.map(|c| c.as_str()),
      difficulty: query.difficulty.map(|d| d.as_str()),
    }
  }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── InterviewStore impl ─────────────────────────────────────────────────────

impl InterviewStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let user = User::new(input, Utc::now());

    let id_str            = encode_uuid(user.id);
    let name              = user.name.clone();
    let email             = user.email.clone();
    let password_hash     = user.password_hash.clone();
    let analytics_str     = encode_json(&user.analytics)?;
    let preferences_str   = encode_json(&user.preferences)?;
    let learning_path_str = encode_json(&user.learning_path)?;
    let subscription_str  = encode_json(&user.subscription)?;
    let created_str       = encode_dt(user.created_at);
    let updated_str       = encode_dt(user.updated_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO users (
             user_id, name, email, password_hash, analytics, preferences,
             learning_path, subscription, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            name,
            email,
            password_hash,
            analytics_str,
            preferences_str,
            learning_path_str,
            subscription_str,
            created_str,
            updated_str,
          ],
        );
        match result {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(inserted.then_some(user))
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.load_user(UserKey::Id(encode_uuid(id))).await
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    self.load_user(UserKey::Email(email.to_owned())).await
  }

  async fn save_user_analytics(&self, id: Uuid, analytics: &UserAnalytics) -> Result<bool> {
    let id_str        = encode_uuid(id);
    let analytics_str = encode_json(analytics)?;
    let now_str       = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET analytics = ?1, updated_at = ?2 WHERE user_id = ?3",
          rusqlite::params![analytics_str, now_str, id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn append_user_interview(&self, user_id: Uuid, interview_id: Uuid) -> Result<()> {
    let user_str      = encode_uuid(user_id);
    let interview_str = encode_uuid(interview_id);
    let now_str       = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO user_interviews (user_id, interview_id, position)
           SELECT ?1, ?2, COALESCE(MAX(position), -1) + 1
           FROM user_interviews WHERE user_id = ?1",
          rusqlite::params![user_str, interview_str],
        )?;
        tx.execute(
          "UPDATE users SET updated_at = ?1 WHERE user_id = ?2",
          rusqlite::params![now_str, user_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Interviews ────────────────────────────────────────────────────────────

  async fn insert_interview(&self, interview: &Interview) -> Result<()> {
    let id_str         = encode_uuid(interview.id);
    let user_str       = encode_uuid(interview.user_id);
    let category       = interview.category.as_str();
    let difficulty     = interview.difficulty.as_str();
    let score          = interview.score();
    let revision       = interview.revision as i64;
    let created_str    = encode_dt(interview.created_at);
    let updated_str    = encode_dt(interview.updated_at);
    let document_str   = encode_json(interview)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO interviews (
             interview_id, user_id, category, difficulty, score, revision,
             created_at, updated_at, document
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            user_str,
            category,
            difficulty,
            score,
            revision,
            created_str,
            updated_str,
            document_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawInterview> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT document, revision FROM interviews WHERE interview_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawInterview {
                document: row.get(0)?,
                revision: row.get(1)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawInterview::into_interview).transpose()
  }

  async fn update_interview(&self, interview: &Interview) -> Result<bool> {
    let mut next = interview.clone();
    next.revision += 1;

    let id_str        = encode_uuid(interview.id);
    let expected      = interview.revision as i64;
    let score         = next.score();
    let updated_str   = encode_dt(next.updated_at);
    let document_str  = encode_json(&next)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE interviews
           SET document = ?1, score = ?2, updated_at = ?3, revision = revision + 1
           WHERE interview_id = ?4 AND revision = ?5",
          rusqlite::params![document_str, score, updated_str, id_str, expected],
        )?)
      })
      .await?;
    Ok(changed == 1)
  }

  async fn list_interviews(&self, query: &InterviewQuery) -> Result<Vec<Interview>> {
    let params = QueryParams::from_query(query);
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val  = query.limit.map_or(-1, |l| l as i64);
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawInterview> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT document, revision FROM interviews
           {}
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?4 OFFSET ?5",
          QueryParams::WHERE
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              params.user_id,
              params.category,
              params.difficulty,
              limit_val,
              offset_val,
            ],
            |row| {
              Ok(RawInterview {
                document: row.get(0)?,
                revision: row.get(1)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInterview::into_interview).collect()
  }

  async fn count_interviews(&self, query: &InterviewQuery) -> Result<usize> {
    let params = QueryParams::from_query(query);

    let count: i64 = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT COUNT(*) FROM interviews {}", QueryParams::WHERE);
        Ok(conn.query_row(
          &sql,
          rusqlite::params![params.user_id, params.category, params.difficulty],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(usize::try_from(count).unwrap_or_default())
  }
}
