//! Cellar server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), loads API
//! credentials, opens the SQLite store and serves the JSON API.
//!
//! One-off enrichment runs print JSON and exit:
//!
//! ```text
//! cellar --expert-notes "Ardbeg Ten Scotch"
//! cellar --describe "Ardbeg Ten Scotch"
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use cellar_api::{ApiState, PhotoStore};
use cellar_core::{enrich::Enrichment, store::BarStore};
use cellar_enrich::{HttpEnricher, Secrets};
use cellar_server::{ServerConfig, expand_tilde};
use cellar_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Cellar tasting-bar server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Infer expert tasting notes for a bottle query, print the report and exit.
  #[arg(long, value_name = "QUERY", conflicts_with = "describe")]
  expert_notes: Option<String>,

  /// Generate a description for a bottle query, print it and exit.
  #[arg(long, value_name = "QUERY")]
  describe: Option<String>,
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
  let cfg = ServerConfig::load(&cli.config)?;

  // Credentials are read once; a bad secrets file is fatal.
  let secrets = Secrets::load(expand_tilde(&cfg.secrets_path))
    .context("failed to load API credentials")?;
  let enricher = HttpEnricher::from_config(&cfg.enrichment, &secrets)
    .context("failed to build enrichment clients")?;

  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(query) = cli.describe.as_deref() {
    let text = enricher.describe(query).await?;
    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "description": text }))?);
    return Ok(());
  }
  if let Some(query) = cli.expert_notes.as_deref() {
    let vocabulary = store.tasting_note_names().await?;
    let report = enricher.expert_notes(query, &vocabulary).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  let photos = PhotoStore::new(expand_tilde(&cfg.upload_dir));
  let app = cellar_server::app(ApiState::new(Arc::new(store), Arc::new(enricher), photos));
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
