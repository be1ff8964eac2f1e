//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/{id}` | Public view; never includes the password hash |
//! | `GET`  | `/users/{id}/interviews` | Newest first |
//! | `GET`  | `/users/{id}/analytics` | Recomputes and caches the summary |

use std::sync::Arc;

use axum::{Json, extract::State};
use rehearse_core::{
  analytics::AnalyticsSummary, interview::Interview, lifecycle::InterviewService,
  store::InterviewStore, user::User,
};
use uuid::Uuid;

use crate::{error::ApiError, extract::Path};

/// `GET /users/{id}`
pub async fn get_one<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: InterviewStore,
  A: Send + Sync,
{
  Ok(Json(service.get_user(id).await?))
}

/// `GET /users/{id}/interviews`
pub async fn interviews<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Interview>>, ApiError>
where
  S: InterviewStore,
  A: Send + Sync,
{
  Ok(Json(service.list_user_interviews(id).await?))
}

/// `GET /users/{id}/analytics`
pub async fn analytics<S, A>(
  State(service): State<Arc<InterviewService<S, A>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AnalyticsSummary>, ApiError>
where
  S: InterviewStore,
  A: Send + Sync,
{
  Ok(Json(service.compute_user_analytics(id).await?))
}
