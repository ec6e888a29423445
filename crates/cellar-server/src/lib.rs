//! Cellar server assembly: configuration and the top-level router.
//!
//! The binary in `main.rs` reads [`ServerConfig`], opens the store, builds
//! the enricher and serves [`app`].

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use axum::Router;
use cellar_api::{ApiState, api_router};
use cellar_core::{enrich::Enrichment, store::BarStore};
use cellar_enrich::EnrichmentConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` overlaid with
/// `CELLAR_*` environment variables (`__` separates nested keys).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// Root for uploaded bottle and user photos.
  pub upload_dir:   PathBuf,
  /// JSON file holding `OPENAI_KEY` and `SERP_KEY`.
  pub secrets_path: PathBuf,
  pub enrichment:   EnrichmentConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:         "127.0.0.1".into(),
      port:         5000,
      store_path:   PathBuf::from("cellar.db"),
      upload_dir:   PathBuf::from("static"),
      secrets_path: PathBuf::from("secrets.json"),
      enrichment:   EnrichmentConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Load from an optional TOML file plus the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("CELLAR")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// The full application: the JSON API under `/api`, with request tracing.
pub fn app<S, E>(state: ApiState<S, E>) -> Router
where
  S: BarStore + 'static,
  E: Enrichment + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
