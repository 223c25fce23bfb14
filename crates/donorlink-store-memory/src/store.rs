//! [`MemoryStore`]: the in-process implementation of [`MatchStore`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use donorlink_core::{
  Error, ErrorKind, Result,
  identity::SecretCode,
  lifecycle::{Action, Transition},
  member::{Member, MemberId, NewMember, ProfilePatch, Role},
  registry::{Registration, Registry},
  roster::Totals,
  store::MatchStore,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A donorlink registry held in process memory behind one lock.
///
/// Every operation takes the lock once, does its lookups, checks and
/// mutations, and releases it before returning. The lock is never held
/// across an `.await`.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct MemoryStore {
  registry: Arc<Mutex<Registry>>,
}

impl MemoryStore {
  /// Create an empty store.
  pub fn new() -> Self { Self::default() }

  /// Run `f` with exclusive access to the registry.
  fn with_registry<T>(&self, f: impl FnOnce(&mut Registry) -> T) -> T {
    let mut guard = self.registry.lock();
    f(&mut guard)
  }

  fn relate(
    &self,
    action: Action,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    let outcome =
      self.with_registry(|reg| reg.relate(action, actor, counterpart));
    match &outcome {
      Ok(Transition::Applied) => {
        debug!(%actor, %counterpart, %action, "relationship updated");
      }
      Ok(Transition::Unchanged) => {
        debug!(%actor, %counterpart, %action, "relationship already in place");
      }
      Err(e) => log_rejection(action.as_str(), e),
    }
    outcome
  }
}

fn log_rejection(operation: &str, e: &Error) {
  match e.kind() {
    ErrorKind::InternalInconsistency => {
      error!(operation, error = %e, "registry inconsistency");
    }
    kind => warn!(operation, kind = kind.as_str(), error = %e, "rejected"),
  }
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for MemoryStore {
  type Error = Error;

  // ── Registration and lookup ───────────────────────────────────────────────

  async fn register(&self, new: NewMember) -> Result<Registration> {
    let registration = self
      .with_registry(|reg| reg.register(new))
      .inspect_err(|e| log_rejection("register", e))?;
    info!(
      id = %registration.member.id,
      role = %registration.member.role,
      "member registered"
    );
    Ok(registration)
  }

  async fn login(&self, code: SecretCode) -> Result<Member> {
    self
      .with_registry(|reg| reg.login(&code))
      .inspect_err(|e| log_rejection("login", e))
  }

  async fn get_by_id(&self, id: MemberId) -> Result<Member> {
    self
      .with_registry(|reg| reg.get_by_id(id))
      .inspect_err(|e| log_rejection("get_by_id", e))
  }

  async fn update_profile(
    &self,
    id: MemberId,
    patch: ProfilePatch,
  ) -> Result<Member> {
    let member = self
      .with_registry(|reg| reg.update_profile(id, &patch))
      .inspect_err(|e| log_rejection("update_profile", e))?;
    debug!(%id, "profile updated");
    Ok(member)
  }

  async fn delete_by_id(&self, id: MemberId) -> Result<()> {
    let removed = self
      .with_registry(|reg| reg.delete_by_id(id))
      .inspect_err(|e| log_rejection("delete_by_id", e))?;
    info!(%id, role = %removed.role, "member deleted");
    Ok(())
  }

  async fn list_all(&self, role: Role) -> Result<Vec<Member>> {
    Ok(self.with_registry(|reg| reg.list_all(role)))
  }

  async fn totals(&self) -> Result<Totals> {
    Ok(self.with_registry(|reg| reg.totals()))
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn request(
    &self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    self.relate(Action::Request, actor, counterpart)
  }

  async fn accept_request(
    &self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    self.relate(Action::Accept, actor, counterpart)
  }

  async fn cancel_request(
    &self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    self.relate(Action::CancelRequest, actor, counterpart)
  }

  async fn cancel_connection(
    &self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    self.relate(Action::CancelConnection, actor, counterpart)
  }
}
