//! JSON REST API for Rehearse.
//!
//! Exposes an axum [`Router`] backed by an [`InterviewService`] over any
//! [`InterviewStore`] and AI assistant. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rehearse_api::api_router(service))
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod interviews;
pub mod questions;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post, put},
};
use rehearse_core::{
  ai::{AnswerEvaluator, QuestionProvider},
  lifecycle::InterviewService,
  store::InterviewStore,
};
use serde_json::{Value, json};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, A>(service: InterviewService<S, A>) -> Router<()>
where
  S: InterviewStore + 'static,
  A: QuestionProvider + AnswerEvaluator + 'static,
{
  Router::new()
    // Accounts
    .route("/auth/signup", post(auth::signup::<S, A>))
    .route("/auth/login", post(auth::login::<S, A>))
    // Users
    .route("/users/{id}", get(users::get_one::<S, A>))
    .route("/users/{id}/interviews", get(users::interviews::<S, A>))
    .route("/users/{id}/analytics", get(users::analytics::<S, A>))
    // Interviews
    .route("/interviews", get(interviews::list::<S, A>).post(interviews::create::<S, A>))
    .route("/interviews/generate", post(interviews::generate::<S, A>))
    .route("/interviews/{id}", get(interviews::get_one::<S, A>))
    .route(
      "/interviews/{id}/questions/{index}/answer",
      put(interviews::record_answer::<S, A>),
    )
    .route(
      "/interviews/{id}/questions/{index}/evaluate",
      post(interviews::evaluate_answer::<S, A>),
    )
    // Questions
    .route("/questions/generate", post(questions::generate::<S, A>))
    .route("/templates", get(questions::list_templates))
    .route("/health", get(health))
    .with_state(Arc::new(service))
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ───────────────────────────────────────────────────────
