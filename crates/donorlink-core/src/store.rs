//! The `MatchStore` trait.
//!
//! The trait is implemented by registry backends (e.g.
//! `donorlink-store-memory`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  identity::SecretCode,
  lifecycle::Transition,
  member::{Member, MemberId, NewMember, ProfilePatch, Role},
  registry::Registration,
  roster::Totals,
};

/// Abstraction over a shared patient/donor registry.
///
/// Every method is one atomic step against the registry: a call either
/// applies completely or fails without side effects, and no caller can
/// observe a member without its secret code or one side of a relationship
/// edge without the other.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MatchStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Registration and lookup ───────────────────────────────────────────

  /// Validate and store a new member, returning it with its secret code.
  fn register(
    &self,
    new: NewMember,
  ) -> impl Future<Output = Result<Registration, Self::Error>> + Send + '_;

  /// Resolve a secret code to its member.
  fn login(
    &self,
    code: SecretCode,
  ) -> impl Future<Output = Result<Member, Self::Error>> + Send + '_;

  /// Retrieve a member by identity, round-tripping through its secret code.
  fn get_by_id(
    &self,
    id: MemberId,
  ) -> impl Future<Output = Result<Member, Self::Error>> + Send + '_;

  /// Update the mutable contact fields and return the resulting member.
  fn update_profile(
    &self,
    id: MemberId,
    patch: ProfilePatch,
  ) -> impl Future<Output = Result<Member, Self::Error>> + Send + '_;

  /// Remove a member together with its secret code.
  fn delete_by_id(
    &self,
    id: MemberId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All members with the given role. Order is unspecified.
  fn list_all(
    &self,
    role: Role,
  ) -> impl Future<Output = Result<Vec<Member>, Self::Error>> + Send + '_;

  fn totals(
    &self,
  ) -> impl Future<Output = Result<Totals, Self::Error>> + Send + '_;

  // ── Relationships ─────────────────────────────────────────────────────

  /// `actor` sends a request to `counterpart`. Idempotent.
  fn request(
    &self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> impl Future<Output = Result<Transition, Self::Error>> + Send + '_;

  /// `actor` accepts the request `counterpart` sent it.
  fn accept_request(
    &self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> impl Future<Output = Result<Transition, Self::Error>> + Send + '_;

  /// `actor` withdraws its outstanding request to `counterpart`.
  fn cancel_request(
    &self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> impl Future<Output = Result<Transition, Self::Error>> + Send + '_;

  /// `actor` drops its connection with `counterpart`.
  fn cancel_connection(
    &self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> impl Future<Output = Result<Transition, Self::Error>> + Send + '_;
}
