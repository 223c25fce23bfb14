//! Error types for `donorlink-core`.

use thiserror::Error;

use crate::{
  lifecycle::Action,
  member::{MemberId, Role},
};

#[derive(Debug, Error)]
pub enum Error {
  /// A required input was missing or malformed.
  #[error("invalid or missing field: {field}")]
  Validation { field: &'static str },

  #[error("member not found: {0}")]
  MemberNotFound(MemberId),

  #[error("no member holds the given secret code")]
  CodeNotFound,

  #[error("members {actor} and {counterpart} are both {role}s")]
  RoleMismatch {
    actor:       MemberId,
    counterpart: MemberId,
    role:        Role,
  },

  #[error("cannot {action} from {actor} to {counterpart}: {reason}")]
  InvalidTransition {
    action:      Action,
    actor:       MemberId,
    counterpart: MemberId,
    reason:      &'static str,
  },

  /// The identity and member maps disagree. Never expected; signals a
  /// storage bug.
  #[error("registry inconsistency for member {id}: {detail}")]
  InternalInconsistency { id: MemberId, detail: String },
}

/// Coarse classification of [`Error`], stable enough for callers to branch
/// on without matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Validation,
  NotFound,
  RoleMismatch,
  InvalidTransition,
  InternalInconsistency,
}

impl ErrorKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Validation => "validation",
      Self::NotFound => "not_found",
      Self::RoleMismatch => "role_mismatch",
      Self::InvalidTransition => "invalid_transition",
      Self::InternalInconsistency => "internal_inconsistency",
    }
  }
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation { .. } => ErrorKind::Validation,
      Self::MemberNotFound(_) | Self::CodeNotFound => ErrorKind::NotFound,
      Self::RoleMismatch { .. } => ErrorKind::RoleMismatch,
      Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
      Self::InternalInconsistency { .. } => ErrorKind::InternalInconsistency,
    }
  }

  pub(crate) fn inconsistency(id: MemberId, detail: impl Into<String>) -> Self {
    Self::InternalInconsistency {
      id,
      detail: detail.into(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
