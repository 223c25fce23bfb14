//! donorlink server binary.
//!
//! Reads `donorlink.toml` (or the path given with `--config`), applies
//! `DONORLINK_*` environment overrides, and serves the matching API over HTTP
//! from an in-process registry.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use donorlink_server::{ServerConfig, app};
use donorlink_store_memory::MemoryStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Patient and donor matching server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "donorlink.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).with_context(|| {
    format!("failed to load configuration from {:?}", cli.config)
  })?;

  let app = app(Arc::new(MemoryStore::new()));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
