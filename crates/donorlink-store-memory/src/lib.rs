//! In-memory backend for the donorlink registry.
//!
//! Holds a single [`donorlink_core::registry::Registry`] behind one
//! `parking_lot` mutex. Nothing survives a restart.

mod store;

pub use donorlink_core::{Error, Result};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
