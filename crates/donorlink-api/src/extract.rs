//! JSON body extractor that reports failures through [`ApiError`].

use axum::{
  Json,
  extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Drop-in for [`axum::Json`] in request position. A missing content type or
/// an unparseable body is rejected with the usual `{"error","kind"}` body
/// instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request(
    req: Request,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state).await?;
    Ok(ApiJson(value))
  }
}
