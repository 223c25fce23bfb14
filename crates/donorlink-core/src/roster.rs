//! Member store: every patient and donor, keyed by identity, plus totals.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
  Error, Result,
  member::{Member, MemberId, Profile, ProfilePatch, Role},
};

/// Running member counts. Always equal to the live cardinality of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
  pub total:          usize,
  pub total_patients: usize,
  pub total_donors:   usize,
}

impl Totals {
  fn adjust(&mut self, role: Role, added: bool) {
    let bucket = match role {
      Role::Patient => &mut self.total_patients,
      Role::Donor => &mut self.total_donors,
    };
    if added {
      self.total += 1;
      *bucket += 1;
    } else {
      self.total -= 1;
      *bucket -= 1;
    }
  }
}

#[derive(Debug, Default)]
pub struct Roster {
  members: BTreeMap<MemberId, Member>,
  /// Last identity handed out; never decremented.
  last_id: u64,
  totals:  Totals,
}

impl Roster {
  pub fn new() -> Self { Self::default() }

  /// Store a new member under the next sequential identity.
  pub fn create(&mut self, role: Role, profile: Profile) -> MemberId {
    self.last_id += 1;
    let id = MemberId(self.last_id);
    self.members.insert(id, Member::new(id, role, profile));
    self.totals.adjust(role, true);
    id
  }

  pub fn get(&self, id: MemberId) -> Result<&Member> {
    self.members.get(&id).ok_or(Error::MemberNotFound(id))
  }

  /// Apply the mutable profile fields present in `patch`.
  pub fn update(&mut self, id: MemberId, patch: &ProfilePatch) -> Result<&Member> {
    let member = self
      .members
      .get_mut(&id)
      .ok_or(Error::MemberNotFound(id))?;
    member.apply_patch(patch);
    Ok(&*member)
  }

  /// Remove a member and scrub every edge that pointed at it.
  pub fn delete(&mut self, id: MemberId) -> Result<Member> {
    let removed = self.members.remove(&id).ok_or(Error::MemberNotFound(id))?;
    let counterparts = removed
      .requested
      .iter()
      .chain(removed.pending.iter())
      .chain(removed.connected.iter());
    for other in counterparts {
      if let Some(member) = self.members.get_mut(&other) {
        member.forget(id);
      }
    }
    self.totals.adjust(removed.role, false);
    Ok(removed)
  }

  /// Members with the given role, in ascending identity order.
  pub fn list_by_role(&self, role: Role) -> Vec<Member> {
    self
      .members
      .values()
      .filter(|m| m.role == role)
      .cloned()
      .collect()
  }

  pub fn totals(&self) -> Totals { self.totals }

  pub fn len(&self) -> usize { self.members.len() }

  pub fn is_empty(&self) -> bool { self.members.is_empty() }

  /// Borrow two distinct members mutably, in argument order.
  ///
  /// Returns `None` if `a == b` or either is missing.
  pub fn pair_mut(
    &mut self,
    a: MemberId,
    b: MemberId,
  ) -> Option<(&mut Member, &mut Member)> {
    if a == b {
      return None;
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let mut range = self.members.range_mut(lo..=hi);
    let (_, lo_member) = range.next().filter(|(id, _)| **id == lo)?;
    let (_, hi_member) = range.next_back().filter(|(id, _)| **id == hi)?;
    Some(if a < b {
      (lo_member, hi_member)
    } else {
      (hi_member, lo_member)
    })
  }
}
