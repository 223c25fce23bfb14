//! Core types for donorlink: members, secret codes, the relationship
//! lifecycle, and the registry that ties them together.
//!
//! This crate is free of HTTP and runtime dependencies. Backends implement
//! [`store::MatchStore`] on top of [`registry::Registry`]; the HTTP layer
//! depends only on the trait.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod member;
pub mod registry;
pub mod roster;
pub mod store;

pub use error::{Error, ErrorKind, Result};
