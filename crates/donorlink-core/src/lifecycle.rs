//! Relationship lifecycle: the transitions between a patient and a donor.
//!
//! Seen from member `A` towards member `B`, a pair moves through:
//!
//! ```text
//! NONE ──request(A,B)──▶ REQUESTED ──accept_request(B,A)──▶ CONNECTED
//!   ▲                        │                                  │
//!   └──cancel_request(A,B)───┘                                  │
//!   └──────────────cancel_connection(A,B) or (B,A)──────────────┘
//! ```
//!
//! Every transition takes both records by exclusive reference, checks all of
//! its preconditions, and only then mutates. A rejected transition leaves both
//! records untouched; a successful one updates both sides together.

use std::fmt;

use crate::{Error, Result, member::Member};

// ─── Actions ─────────────────────────────────────────────────────────────────

/// A relationship transition requested by an actor against a counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
  /// The actor asks the counterpart to connect.
  Request,
  /// The actor accepts the counterpart's incoming request.
  Accept,
  /// The actor withdraws its own outstanding request.
  CancelRequest,
  /// Either side drops a confirmed connection.
  CancelConnection,
}

impl Action {
  pub const ALL: [Action; 4] = [
    Self::Request,
    Self::Accept,
    Self::CancelRequest,
    Self::CancelConnection,
  ];

  /// Run this transition with `actor` acting on `counterpart`.
  pub fn apply(
    self,
    actor: &mut Member,
    counterpart: &mut Member,
  ) -> Result<Transition> {
    match self {
      Self::Request => request(actor, counterpart),
      Self::Accept => accept_request(actor, counterpart),
      Self::CancelRequest => cancel_request(actor, counterpart),
      Self::CancelConnection => cancel_connection(actor, counterpart),
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Request => "request",
      Self::Accept => "accept request",
      Self::CancelRequest => "cancel request",
      Self::CancelConnection => "cancel connection",
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Outcome of a transition that passed its preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  /// Both records were updated.
  Applied,
  /// The pair was already in the target state; nothing changed.
  Unchanged,
}

// ─── Pair state ──────────────────────────────────────────────────────────────

/// The relationship between two members, seen from the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
  None,
  /// The first member has an outstanding request to the second.
  Requested,
  /// The second member has an outstanding request to the first.
  Pending,
  Connected,
}

/// Classify the pair `(a, b)` from `a`'s side, reading `a`'s lists only.
pub fn state_between(a: &Member, b: &Member) -> PairState {
  if a.connected.contains(b.id) {
    PairState::Connected
  } else if a.requested.contains(b.id) {
    PairState::Requested
  } else if a.pending.contains(b.id) {
    PairState::Pending
  } else {
    PairState::None
  }
}

// ─── Transitions ─────────────────────────────────────────────────────────────

/// `actor` sends a request to `counterpart`.
///
/// Idempotent: re-sending an outstanding request changes nothing. A pair that
/// is already connected is also left alone, so a request edge never coexists
/// with a connection.
pub fn request(actor: &mut Member, counterpart: &mut Member) -> Result<Transition> {
  ensure_counterparts(actor, counterpart)?;

  match state_between(actor, counterpart) {
    PairState::Requested | PairState::Connected => {
      return Ok(Transition::Unchanged);
    }
    PairState::None | PairState::Pending => {}
  }

  actor.requested.insert(counterpart.id);
  counterpart.pending.insert(actor.id);
  Ok(Transition::Applied)
}

/// `actor` accepts the request `counterpart` previously sent it.
///
/// Only the recipient of a request can accept it. If both members had
/// requested each other, both request edges are cleared.
pub fn accept_request(
  actor: &mut Member,
  counterpart: &mut Member,
) -> Result<Transition> {
  ensure_counterparts(actor, counterpart)?;

  if !(counterpart.requested.contains(actor.id)
    && actor.pending.contains(counterpart.id))
  {
    let reason = match state_between(actor, counterpart) {
      PairState::Connected => "already connected",
      PairState::Requested => "only the recipient can accept a request",
      PairState::Pending | PairState::None => {
        "no matching request/pending pair"
      }
    };
    return Err(invalid(Action::Accept, actor, counterpart, reason));
  }
  if actor.connected.contains(counterpart.id) {
    return Ok(Transition::Unchanged);
  }

  counterpart.requested.remove(actor.id);
  actor.pending.remove(counterpart.id);
  actor.requested.remove(counterpart.id);
  counterpart.pending.remove(actor.id);
  actor.connected.insert(counterpart.id);
  counterpart.connected.insert(actor.id);
  Ok(Transition::Applied)
}

/// `actor` withdraws its outstanding request to `counterpart`.
pub fn cancel_request(
  actor: &mut Member,
  counterpart: &mut Member,
) -> Result<Transition> {
  ensure_counterparts(actor, counterpart)?;

  if !actor.requested.contains(counterpart.id) {
    let reason = match state_between(actor, counterpart) {
      PairState::Connected => "already connected",
      PairState::Pending => "the request was sent by the counterpart",
      PairState::Requested | PairState::None => "no outstanding request",
    };
    return Err(invalid(Action::CancelRequest, actor, counterpart, reason));
  }

  actor.requested.remove(counterpart.id);
  counterpart.pending.remove(actor.id);
  Ok(Transition::Applied)
}

/// `actor` drops its connection with `counterpart`. Either side may do this.
pub fn cancel_connection(
  actor: &mut Member,
  counterpart: &mut Member,
) -> Result<Transition> {
  ensure_counterparts(actor, counterpart)?;

  if state_between(actor, counterpart) != PairState::Connected {
    return Err(invalid(
      Action::CancelConnection,
      actor,
      counterpart,
      "not connected",
    ));
  }

  actor.connected.remove(counterpart.id);
  counterpart.connected.remove(actor.id);
  Ok(Transition::Applied)
}

fn ensure_counterparts(actor: &Member, counterpart: &Member) -> Result<()> {
  if actor.role == counterpart.role {
    return Err(Error::RoleMismatch {
      actor:       actor.id,
      counterpart: counterpart.id,
      role:        actor.role,
    });
  }
  Ok(())
}

fn invalid(
  action: Action,
  actor: &Member,
  counterpart: &Member,
  reason: &'static str,
) -> Error {
  Error::InvalidTransition {
    action,
    actor: actor.id,
    counterpart: counterpart.id,
    reason,
  }
}
