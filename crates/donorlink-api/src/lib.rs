//! JSON REST API for donorlink.
//!
//! Exposes an axum [`Router`] backed by any [`donorlink_core::store::MatchStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = donorlink_api::api_router(Arc::new(MemoryStore::new()));
//! ```

pub mod error;
pub mod extract;
pub mod members;
pub mod requests;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{any, get, post},
};
use donorlink_core::store::MatchStore;

pub use error::ApiError;
pub use extract::ApiJson;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MatchStore + 'static,
  ApiError: From<S::Error>,
{
  Router::new()
    // Registration and rosters
    .route("/users/signup", post(users::signup::<S>))
    .route("/users/login/{code}", get(users::login::<S>))
    .route("/users/patients", get(users::list_patients::<S>))
    .route("/users/donors", get(users::list_donors::<S>))
    .route("/users/totals", get(users::totals::<S>))
    // Single member
    .route(
      "/user/{id}",
      get(members::get_one::<S>)
        .put(members::update::<S>)
        .delete(members::delete_one::<S>),
    )
    // Relationships; the method selects the transition
    .route("/user/{id}/request/{other}", any(requests::dispatch::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
