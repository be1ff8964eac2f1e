//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signup` | Body: `{"name","email","password"}`; 201 with the user |
//! | `POST` | `/auth/login`  | Body: `{"email","password"}`; 401 on any mismatch |
//!
//! No session or token is issued.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rand_core::OsRng;
use rehearse_core::{
  Error as CoreError, lifecycle::InterviewService, store::InterviewStore,
  user::{NewUser, User},
};
use serde::Deserialize;

use crate::{error::ApiError, extract};

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// Check `password` against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

// ─── Signup ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  #[serde(default)]
  pub name:     String,
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

/// `POST /auth/signup`
pub async fn signup<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  extract::Json(body): extract::Json<SignupBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InterviewStore,
  A: Send + Sync,
{
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password is required".into()));
  }
  let user = service
    .register_user(NewUser {
      name:          body.name,
      email:         body.email,
      password_hash: hash_password(&body.password)?,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

/// `POST /auth/login`
pub async fn login<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  extract::Json(body): extract::Json<LoginBody>,
) -> Result<Json<User>, ApiError>
where
  S: InterviewStore,
  A: Send + Sync,
{
  if body.email.trim().is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest("email and password are required".into()));
  }
  let user = service
    .find_user_by_email(&body.email)
    .await?
    .filter(|u| verify_password(&body.password, &u.password_hash))
    .ok_or(CoreError::InvalidCredentials)?;

  tracing::info!(user_id = %user.id, "user logged in");
  Ok(Json(user))
}
