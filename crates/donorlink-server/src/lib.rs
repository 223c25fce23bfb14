//! HTTP server assembly for donorlink.
//!
//! Loads [`ServerConfig`] and wraps the API router in request tracing. The
//! `donorlink` binary in `main.rs` is a thin shell over these pieces.

use std::{path::Path, sync::Arc};

use axum::Router;
use donorlink_api::{ApiError, api_router};
use donorlink_core::store::MatchStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `donorlink.toml` and
/// `DONORLINK_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
    }
  }
}

impl ServerConfig {
  /// Read the optional TOML file at `path`, then apply environment overrides.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("DONORLINK"))
      .build()?
      .try_deserialize()
  }

  /// `host:port`, suitable for [`tokio::net::TcpListener::bind`].
  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application: the API routes plus HTTP tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: MatchStore + 'static,
  ApiError: From<S::Error>,
{
  api_router(store).layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
