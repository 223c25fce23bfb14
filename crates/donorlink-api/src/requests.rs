//! Handler for `/user/:id/request/:other`.
//!
//! The relationship transition is chosen by the HTTP method, so the route is
//! mounted with `any` and dispatched here.
//!
//! | Method | Transition |
//! |--------|------------|
//! | `SEND` or `POST` | `:id` requests `:other` |
//! | `ACCEPT` | `:id` accepts the request from `:other` |
//! | `DELETE` | `:id` withdraws its request to `:other` |
//! | `PURGE`  | `:id` drops its connection with `:other` |

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::{Method, StatusCode},
};
use donorlink_core::{lifecycle::Action, store::MatchStore};

use crate::{error::ApiError, members::parse_id};

/// Map a request method to the transition it triggers.
pub fn action_for(method: &Method) -> Option<Action> {
  match method.as_str() {
    "SEND" | "POST" => Some(Action::Request),
    "ACCEPT" => Some(Action::Accept),
    "DELETE" => Some(Action::CancelRequest),
    "PURGE" => Some(Action::CancelConnection),
    _ => None,
  }
}

/// `<METHOD> /user/:id/request/:other`: 204 on success, including no-ops.
pub async fn dispatch<S>(
  State(store): State<Arc<S>>,
  method: Method,
  Path((actor, counterpart)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
  S: MatchStore,
  ApiError: From<S::Error>,
{
  let action = action_for(&method)
    .ok_or_else(|| ApiError::MethodNotAllowed(method.to_string()))?;
  let actor = parse_id(&actor)?;
  let counterpart = parse_id(&counterpart)?;

  let transition = match action {
    Action::Request => store.request(actor, counterpart).await?,
    Action::Accept => store.accept_request(actor, counterpart).await?,
    Action::CancelRequest => store.cancel_request(actor, counterpart).await?,
    Action::CancelConnection => {
      store.cancel_connection(actor, counterpart).await?
    }
  };
  tracing::debug!(%actor, %counterpart, %action, ?transition, "handled");
  Ok(StatusCode::NO_CONTENT)
}
