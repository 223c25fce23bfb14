//! Identity registry: secret codes and the identities they stand for.
//!
//! A secret code is the only credential a member holds. The registry binds
//! each code to exactly one `(identity, role)` pair and keeps the reverse map
//! so a caller who supplies only an identity can be resolved back through its
//! code.

use std::{collections::HashMap, fmt};

use rand_core::{OsRng, RngCore};
use serde::Serialize;

use crate::{
  Error, Result,
  member::{MemberId, Role},
};

/// Number of random bytes behind each secret code.
const CODE_BYTES: usize = 16;

// ─── SecretCode ──────────────────────────────────────────────────────────────

/// An opaque, unpredictable credential, hex-encoded.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SecretCode(String);

impl SecretCode {
  /// Draw a fresh code from the operating system's CSPRNG.
  pub fn generate() -> Self {
    let mut bytes = [0u8; CODE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Self(hex::encode(bytes))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for SecretCode {
  fn from(value: String) -> Self { Self(value) }
}

impl From<&str> for SecretCode {
  fn from(value: &str) -> Self { Self(value.to_owned()) }
}

impl fmt::Display for SecretCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// Codes must not leak through `{:?}` in logs.
impl fmt::Debug for SecretCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SecretCode(..)")
  }
}

// ─── Credential ──────────────────────────────────────────────────────────────

/// What a secret code resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credential {
  pub id:   MemberId,
  pub role: Role,
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Bidirectional, one-to-one map between secret codes and identities.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
  by_code: HashMap<SecretCode, Credential>,
  by_id:   HashMap<MemberId, SecretCode>,
}

impl IdentityRegistry {
  pub fn new() -> Self { Self::default() }

  /// Issue a code for `id` and bind it in both directions.
  ///
  /// Draws again if the code is already live, so codes stay unique.
  pub fn issue(&mut self, id: MemberId, role: Role) -> SecretCode {
    let code = loop {
      let candidate = SecretCode::generate();
      if !self.by_code.contains_key(&candidate) {
        break candidate;
      }
    };
    self.bind(code.clone(), Credential { id, role });
    code
  }

  pub fn resolve_by_code(&self, code: &SecretCode) -> Result<Credential> {
    self.by_code.get(code).copied().ok_or(Error::CodeNotFound)
  }

  pub fn resolve_by_identity(&self, id: MemberId) -> Result<&SecretCode> {
    self.by_id.get(&id).ok_or(Error::MemberNotFound(id))
  }

  /// Remove both directions of the binding for `id`.
  pub fn revoke(&mut self, id: MemberId) -> Option<SecretCode> {
    let code = self.by_id.remove(&id)?;
    self.by_code.remove(&code);
    Some(code)
  }

  pub fn len(&self) -> usize { self.by_id.len() }

  pub fn is_empty(&self) -> bool { self.by_id.is_empty() }

  pub(crate) fn bind(&mut self, code: SecretCode, credential: Credential) {
    self.by_id.insert(credential.id, code.clone());
    self.by_code.insert(code, credential);
  }
}
