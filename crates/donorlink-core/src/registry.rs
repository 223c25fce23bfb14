//! [`Registry`]: registration, lookup, and relationship operations over the
//! identity registry and member store together.
//!
//! The registry owns both halves and never hands out its maps. It performs no
//! locking of its own; backends wrap it in whatever exclusivity discipline
//! they need (see `donorlink-store-memory`).

use serde::Serialize;

use crate::{
  Error, Result,
  identity::{Credential, IdentityRegistry, SecretCode},
  lifecycle::{Action, Transition},
  member::{Member, MemberId, NewMember, ProfilePatch, Role},
  roster::{Roster, Totals},
};

/// The result of a successful registration: the new member and the only copy
/// of its secret code the caller will ever be given.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
  #[serde(rename = "user_data")]
  pub member:      Member,
  #[serde(rename = "user_secret_code")]
  pub secret_code: SecretCode,
}

#[derive(Debug, Default)]
pub struct Registry {
  identities: IdentityRegistry,
  roster:     Roster,
}

impl Registry {
  pub fn new() -> Self { Self::default() }

  // ── Registration and lookup ─────────────────────────────────────────────

  /// Validate `new`, store it under a fresh identity, and issue its code.
  pub fn register(&mut self, new: NewMember) -> Result<Registration> {
    new.validate()?;
    let NewMember { role, profile } = new;

    let id = self.roster.create(role, profile);
    let secret_code = self.identities.issue(id, role);
    let member = self.roster.get(id)?.clone();
    Ok(Registration {
      member,
      secret_code,
    })
  }

  /// The member holding `code`.
  pub fn login(&self, code: &SecretCode) -> Result<Member> {
    let credential = self.identities.resolve_by_code(code)?;
    self.member(credential).cloned()
  }

  /// The member with identity `id`, after checking that its secret code
  /// resolves back to the same identity.
  pub fn get_by_id(&self, id: MemberId) -> Result<Member> {
    let credential = self.resolve(id)?;
    self.member(credential).cloned()
  }

  pub fn update_profile(
    &mut self,
    id: MemberId,
    patch: &ProfilePatch,
  ) -> Result<Member> {
    self.resolve(id)?;
    self.roster.update(id, patch).cloned()
  }

  /// Remove a member, its secret code, and every edge pointing at it.
  pub fn delete_by_id(&mut self, id: MemberId) -> Result<Member> {
    self.resolve(id)?;
    let removed = self.roster.delete(id)?;
    self.identities.revoke(id);
    Ok(removed)
  }

  pub fn list_all(&self, role: Role) -> Vec<Member> {
    self.roster.list_by_role(role)
  }

  pub fn totals(&self) -> Totals { self.roster.totals() }

  // ── Relationships ───────────────────────────────────────────────────────

  /// Resolve both parties and run `action` with `actor` acting on
  /// `counterpart`. Nothing is mutated unless every check passes.
  pub fn relate(
    &mut self,
    action: Action,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    let a = self.resolve(actor)?;
    if actor == counterpart {
      return Err(Error::RoleMismatch {
        actor,
        counterpart,
        role: a.role,
      });
    }
    self.resolve(counterpart)?;

    let (actor_member, counterpart_member) =
      self.roster.pair_mut(actor, counterpart).ok_or_else(|| {
        Error::inconsistency(actor, "resolved pair is missing from the roster")
      })?;
    action.apply(actor_member, counterpart_member)
  }

  pub fn request(
    &mut self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    self.relate(Action::Request, actor, counterpart)
  }

  pub fn accept_request(
    &mut self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    self.relate(Action::Accept, actor, counterpart)
  }

  pub fn cancel_request(
    &mut self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    self.relate(Action::CancelRequest, actor, counterpart)
  }

  pub fn cancel_connection(
    &mut self,
    actor: MemberId,
    counterpart: MemberId,
  ) -> Result<Transition> {
    self.relate(Action::CancelConnection, actor, counterpart)
  }

  // ── Internals ───────────────────────────────────────────────────────────

  /// Close the loop identity → code → identity.
  fn resolve(&self, id: MemberId) -> Result<Credential> {
    let code = self.identities.resolve_by_identity(id)?;
    let credential = self
      .identities
      .resolve_by_code(code)
      .map_err(|_| Error::inconsistency(id, "secret code has no binding"))?;
    if credential.id != id {
      return Err(Error::inconsistency(
        id,
        format!("secret code resolves to member {}", credential.id),
      ));
    }
    Ok(credential)
  }

  fn member(&self, credential: Credential) -> Result<&Member> {
    let member = self.roster.get(credential.id).map_err(|_| {
      Error::inconsistency(credential.id, "identity has no member record")
    })?;
    if member.role != credential.role {
      return Err(Error::inconsistency(
        credential.id,
        format!(
          "code issued for a {} but member is a {}",
          credential.role, member.role
        ),
      ));
    }
    Ok(member)
  }

  #[cfg(test)]
  pub(crate) fn identities_mut(&mut self) -> &mut IdentityRegistry {
    &mut self.identities
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::member::Profile;

  fn new_member(role: Role, name: &str) -> NewMember {
    NewMember::new(role, Profile {
      name:         name.into(),
      address:      format!("{name}'s house"),
      phone_no:     "555-0100".into(),
      disease_desc: None,
    })
  }

  fn asha_and_ravi() -> (Registry, Registration, Registration) {
    let mut reg = Registry::new();
    let asha = reg.register(new_member(Role::Patient, "Asha")).unwrap();
    let ravi = reg.register(new_member(Role::Donor, "Ravi")).unwrap();
    (reg, asha, ravi)
  }

  #[test]
  fn register_assigns_identity_and_code() {
    let (reg, asha, ravi) = asha_and_ravi();
    assert_eq!(asha.member.id, MemberId(1));
    assert_eq!(ravi.member.id, MemberId(2));
    assert_ne!(asha.secret_code, ravi.secret_code);
    assert_eq!(reg.login(&asha.secret_code).unwrap(), asha.member);
    assert_eq!(reg.get_by_id(MemberId(2)).unwrap(), ravi.member);
  }

  #[test]
  fn register_rejects_blank_fields_without_side_effects() {
    let mut reg = Registry::new();
    let mut bad = new_member(Role::Donor, "Ravi");
    bad.profile.phone_no.clear();

    assert!(matches!(
      reg.register(bad),
      Err(Error::Validation { field: "phone_no" })
    ));
    assert_eq!(reg.totals(), Totals::default());
    assert!(reg.identities.is_empty());
  }

  #[test]
  fn login_with_unknown_code_fails() {
    let (reg, ..) = asha_and_ravi();
    assert!(matches!(
      reg.login(&SecretCode::from("not-a-code")),
      Err(Error::CodeNotFound)
    ));
  }

  #[test]
  fn full_scenario() {
    let (mut reg, asha, ravi) = asha_and_ravi();
    let (a, r) = (asha.member.id, ravi.member.id);

    reg.request(a, r).unwrap();
    let ravi_now = reg.get_by_id(r).unwrap();
    let asha_now = reg.get_by_id(a).unwrap();
    assert_eq!(ravi_now.pending().as_slice(), &[a]);
    assert_eq!(asha_now.requested().as_slice(), &[r]);

    reg.accept_request(r, a).unwrap();
    let ravi_now = reg.get_by_id(r).unwrap();
    let asha_now = reg.get_by_id(a).unwrap();
    assert!(asha_now.requested().is_empty() && ravi_now.pending().is_empty());
    assert_eq!(asha_now.connected().as_slice(), &[r]);
    assert_eq!(ravi_now.connected().as_slice(), &[a]);

    reg.cancel_connection(a, r).unwrap();
    assert!(reg.get_by_id(a).unwrap().connected().is_empty());
    assert!(reg.get_by_id(r).unwrap().connected().is_empty());
  }

  #[test]
  fn delete_removes_member_and_code() {
    let (mut reg, asha, _) = asha_and_ravi();
    let before = reg.totals();

    reg.delete_by_id(MemberId(1)).unwrap();
    assert!(matches!(
      reg.get_by_id(MemberId(1)),
      Err(Error::MemberNotFound(_))
    ));
    assert!(matches!(
      reg.login(&asha.secret_code),
      Err(Error::CodeNotFound)
    ));
    let after = reg.totals();
    assert_eq!(after.total, before.total - 1);
    assert_eq!(after.total_patients, before.total_patients - 1);
    assert_eq!(after.total_donors, before.total_donors);
  }

  #[test]
  fn relate_with_missing_counterpart_fails_not_found() {
    let (mut reg, ..) = asha_and_ravi();
    for action in Action::ALL {
      assert!(matches!(
        reg.relate(action, MemberId(1), MemberId(99)),
        Err(Error::MemberNotFound(MemberId(99)))
      ));
      assert!(matches!(
        reg.relate(action, MemberId(99), MemberId(1)),
        Err(Error::MemberNotFound(MemberId(99)))
      ));
    }
  }

  #[test]
  fn relating_to_self_is_a_role_mismatch() {
    let (mut reg, ..) = asha_and_ravi();
    assert!(matches!(
      reg.request(MemberId(1), MemberId(1)),
      Err(Error::RoleMismatch { .. })
    ));
  }

  #[test]
  fn same_role_request_is_rejected() {
    let (mut reg, ..) = asha_and_ravi();
    let other = reg.register(new_member(Role::Patient, "Meera")).unwrap();
    assert!(matches!(
      reg.request(MemberId(1), other.member.id),
      Err(Error::RoleMismatch {
        role: Role::Patient,
        ..
      })
    ));
  }

  #[test]
  fn mismatched_code_binding_is_an_internal_inconsistency() {
    let (mut reg, asha, _) = asha_and_ravi();
    // Re-point Asha's code at Ravi; identity 1 now round-trips to 2.
    reg.identities_mut().bind(asha.secret_code, Credential {
      id:   MemberId(2),
      role: Role::Donor,
    });

    let err = reg.get_by_id(MemberId(1)).unwrap_err();
    assert!(
      matches!(err, Error::InternalInconsistency { id: MemberId(1), .. }),
      "unexpected error: {err}"
    );
    assert!(matches!(
      reg.request(MemberId(1), MemberId(2)),
      Err(Error::InternalInconsistency { .. })
    ));
  }

  #[test]
  fn update_profile_returns_updated_member() {
    let (mut reg, ..) = asha_and_ravi();
    let updated = reg
      .update_profile(MemberId(2), &ProfilePatch {
        address:  None,
        phone_no: Some("555-0199".into()),
      })
      .unwrap();
    assert_eq!(updated.phone_no, "555-0199");
    assert_eq!(reg.get_by_id(MemberId(2)).unwrap().phone_no, "555-0199");

    assert!(matches!(
      reg.update_profile(MemberId(7), &ProfilePatch::default()),
      Err(Error::MemberNotFound(_))
    ));
  }

  #[test]
  fn blank_update_leaves_required_fields_intact() {
    let (mut reg, ..) = asha_and_ravi();
    let updated = reg
      .update_profile(MemberId(1), &ProfilePatch {
        address:  Some("   ".into()),
        phone_no: Some(" ".into()),
      })
      .unwrap();
    assert_eq!(updated.address, "Asha's house");
    assert_eq!(updated.phone_no, "555-0100");
    assert_eq!(reg.get_by_id(MemberId(1)).unwrap(), updated);
  }
}
