//! Handlers for `/user/:id`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/user/:id` | 404 if not found |
//! | `PUT`    | `/user/:id` | Body: `{"address":"…","phone_no":"…"}`, both optional |
//! | `DELETE` | `/user/:id` | 204 on success |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use donorlink_core::{
  member::{Member, MemberId, ProfilePatch},
  store::MatchStore,
};

use crate::{error::ApiError, extract::ApiJson};

/// Parse a member identity from a path segment.
pub(crate) fn parse_id(raw: &str) -> Result<MemberId, ApiError> {
  raw
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("invalid member id: {raw:?}")))
}

/// `GET /user/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Member>, ApiError>
where
  S: MatchStore,
  ApiError: From<S::Error>,
{
  let member = store.get_by_id(parse_id(&id)?).await?;
  Ok(Json(member))
}

/// `PUT /user/:id`: only `address` and `phone_no` can change.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  ApiJson(patch): ApiJson<ProfilePatch>,
) -> Result<Json<Member>, ApiError>
where
  S: MatchStore,
  ApiError: From<S::Error>,
{
  let member = store.update_profile(parse_id(&id)?, patch).await?;
  Ok(Json(member))
}

/// `DELETE /user/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: MatchStore,
  ApiError: From<S::Error>,
{
  store.delete_by_id(parse_id(&id)?).await?;
  Ok(StatusCode::NO_CONTENT)
}
