//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users/signup` | Body: [`SignupBody`]; returns 201 + member and secret code |
//! | `GET`  | `/users/login/:code` | 404 if the code is unknown |
//! | `GET`  | `/users/patients` | All patients |
//! | `GET`  | `/users/donors` | All donors |
//! | `GET`  | `/users/totals` | Member counts |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use donorlink_core::{
  Error,
  identity::SecretCode,
  member::{Member, NewMember, Profile, Role},
  roster::Totals,
  store::MatchStore,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{error::ApiError, extract::ApiJson};

// ─── Signup ───────────────────────────────────────────────────────────────────

/// A role as sent by clients: a name (`"patient"`, `"donor"`) or the legacy
/// numeric code (`0`, `1`). Any other JSON value lands in `Other` so it is
/// reported as a `role` validation error rather than a parse failure.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RoleInput {
  Code(i64),
  Name(String),
  Other(Value),
}

impl RoleInput {
  fn to_role(&self) -> Result<Role, Error> {
    match self {
      RoleInput::Code(0) => Ok(Role::Patient),
      RoleInput::Code(1) => Ok(Role::Donor),
      RoleInput::Code(_) => Err(Error::Validation { field: "role" }),
      RoleInput::Name(name) => name.parse(),
      RoleInput::Other(_) => Err(Error::Validation { field: "role" }),
    }
  }
}

/// JSON body accepted by `POST /users/signup`.
///
/// Missing text fields deserialise as empty and are rejected by validation,
/// so the error names the field instead of failing to parse.
#[derive(Debug, Deserialize)]
pub struct SignupBody {
  #[serde(default)]
  pub name:         String,
  #[serde(default)]
  pub address:      String,
  #[serde(default)]
  pub phone_no:     String,
  #[serde(default, alias = "type")]
  pub role:         Option<RoleInput>,
  #[serde(default)]
  pub disease_desc: Option<String>,
}

impl TryFrom<SignupBody> for NewMember {
  type Error = Error;

  fn try_from(b: SignupBody) -> Result<Self, Self::Error> {
    let role = b
      .role
      .as_ref()
      .ok_or(Error::Validation { field: "role" })?
      .to_role()?;
    Ok(NewMember::new(role, Profile {
      name:         b.name,
      address:      b.address,
      phone_no:     b.phone_no,
      disease_desc: b.disease_desc,
    }))
  }
}

/// `POST /users/signup`: returns 201 + `{"user_data": …, "user_secret_code": …}`.
pub async fn signup<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<SignupBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MatchStore,
  ApiError: From<S::Error>,
{
  let new = NewMember::try_from(body).map_err(ApiError::Core)?;
  let registration = store.register(new).await?;
  Ok((StatusCode::CREATED, Json(registration)))
}

// ─── Login ────────────────────────────────────────────────────────────────────

/// `GET /users/login/:code`
pub async fn login<S>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<Member>, ApiError>
where
  S: MatchStore,
  ApiError: From<S::Error>,
{
  let member = store.login(SecretCode::from(code)).await?;
  Ok(Json(member))
}

// ─── Rosters ──────────────────────────────────────────────────────────────────

/// `GET /users/patients`
pub async fn list_patients<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Member>>, ApiError>
where
  S: MatchStore,
  ApiError: From<S::Error>,
{
  Ok(Json(store.list_all(Role::Patient).await?))
}

/// `GET /users/donors`
pub async fn list_donors<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Member>>, ApiError>
where
  S: MatchStore,
  ApiError: From<S::Error>,
{
  Ok(Json(store.list_all(Role::Donor).await?))
}

/// `GET /users/totals`
pub async fn totals<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Totals>, ApiError>
where
  S: MatchStore,
  ApiError: From<S::Error>,
{
  Ok(Json(store.totals().await?))
}
