//! Member: one patient or one donor, with its profile and relationship lists.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Durable identity of a member. Patients and donors share one identity
/// space; identities are assigned sequentially and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl fmt::Display for MemberId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for MemberId {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { s.parse().map(Self) }
}

// ─── Role ────────────────────────────────────────────────────────────────────

/// Which side of the match a member is on. Immutable after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Patient,
  Donor,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Patient => "patient",
      Self::Donor => "donor",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Accepts the role names as well as the legacy numeric codes
/// (`0` = patient, `1` = donor).
impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "patient" | "0" => Ok(Self::Patient),
      "donor" | "1" => Ok(Self::Donor),
      _ => Err(Error::Validation { field: "role" }),
    }
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// Profile fields supplied at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
  pub name:         String,
  pub address:      String,
  pub phone_no:     String,
  /// Free-text condition description. Only meaningful for patients.
  pub disease_desc: Option<String>,
}

/// Changes to the mutable profile fields. Absent or empty fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfilePatch {
  pub address:  Option<String>,
  pub phone_no: Option<String>,
}

/// Input to registration.
#[derive(Debug, Clone)]
pub struct NewMember {
  pub role:    Role,
  pub profile: Profile,
}

impl NewMember {
  pub fn new(role: Role, profile: Profile) -> Self { Self { role, profile } }

  /// Reject the first required profile field that is blank.
  pub fn validate(&self) -> Result<()> {
    let required = [
      ("name", &self.profile.name),
      ("address", &self.profile.address),
      ("phone_no", &self.profile.phone_no),
    ];
    match required.iter().find(|(_, value)| is_blank(value)) {
      Some((field, _)) => Err(Error::Validation { field: *field }),
      None => Ok(()),
    }
  }
}

// ─── Links ───────────────────────────────────────────────────────────────────

/// An insertion-ordered set of counterpart identities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(Vec<MemberId>);

impl Links {
  pub fn contains(&self, id: MemberId) -> bool { self.0.contains(&id) }

  /// Add `id` unless already present. Returns `true` if it was added.
  pub(crate) fn insert(&mut self, id: MemberId) -> bool {
    if self.contains(id) {
      return false;
    }
    self.0.push(id);
    true
  }

  /// Remove `id` if present. Returns `true` if it was removed.
  pub(crate) fn remove(&mut self, id: MemberId) -> bool {
    let before = self.0.len();
    self.0.retain(|&other| other != id);
    self.0.len() != before
  }

  pub fn iter(&self) -> impl Iterator<Item = MemberId> + '_ {
    self.0.iter().copied()
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn as_slice(&self) -> &[MemberId] { &self.0 }
}

// ─── Member ──────────────────────────────────────────────────────────────────

/// A registered patient or donor.
///
/// The relationship lists are only mutated by the transitions in
/// [`crate::lifecycle`] and by deletion in [`crate::roster`]. The secret code
/// is never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
  pub id:           MemberId,
  pub role:         Role,
  pub name:         String,
  pub address:      String,
  pub phone_no:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub disease_desc: Option<String>,
  #[serde(rename = "requested_user_ids")]
  pub(crate) requested: Links,
  #[serde(rename = "pending_user_ids")]
  pub(crate) pending: Links,
  #[serde(rename = "connected_user_ids")]
  pub(crate) connected: Links,
}

impl Member {
  pub(crate) fn new(id: MemberId, role: Role, profile: Profile) -> Self {
    let disease_desc = match role {
      Role::Patient => profile.disease_desc.filter(|d| !d.trim().is_empty()),
      Role::Donor => None,
    };
    Self {
      id,
      role,
      name: profile.name,
      address: profile.address,
      phone_no: profile.phone_no,
      disease_desc,
      requested: Links::default(),
      pending: Links::default(),
      connected: Links::default(),
    }
  }

  /// Counterparts this member has sent an outstanding request to.
  pub fn requested(&self) -> &Links { &self.requested }

  /// Counterparts with an outstanding request to this member.
  pub fn pending(&self) -> &Links { &self.pending }

  /// Counterparts with a confirmed connection to this member.
  pub fn connected(&self) -> &Links { &self.connected }

  /// Apply the non-blank fields of `patch`.
  pub(crate) fn apply_patch(&mut self, patch: &ProfilePatch) {
    if let Some(address) = patch.address.as_deref().filter(|a| !is_blank(a)) {
      self.address = address.to_owned();
    }
    if let Some(phone) = patch.phone_no.as_deref().filter(|p| !is_blank(p)) {
      self.phone_no = phone.to_owned();
    }
  }

  /// Drop every edge pointing at `id`.
  pub(crate) fn forget(&mut self, id: MemberId) {
    self.requested.remove(id);
    self.pending.remove(id);
    self.connected.remove(id);
  }
}

/// Empty or whitespace-only values count as missing.
fn is_blank(value: &str) -> bool {
  value.trim().is_empty()
}
