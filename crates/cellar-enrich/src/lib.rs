//! LLM-assisted enrichment for Cellar bottles.
//!
//! Two operations are exposed through [`Enricher`], which implements
//! [`cellar_core::enrich::Enrichment`]:
//!
//! - **Expert notes**: web search, official-source selection, page fetch and
//!   allowlist-constrained tasting-note classification, retried across
//!   candidates.
//! - **Descriptions**: a single chat call for the brand's official copy.
//!
//! The three network seams ([`WebSearch`], [`ChatModel`], [`PageFetcher`])
//! are traits so the pipeline can run against in-process fakes.

#![allow(async_fn_in_trait)]

pub mod chat;
pub mod classify;
pub mod config;
pub mod describe;
pub mod error;
pub mod fetch;
pub mod html;
pub mod json;
pub mod pipeline;
pub mod search;
pub mod secrets;
pub mod select;

pub use chat::{ChatMessage, ChatModel, OpenAiClient};
pub use config::EnrichmentConfig;
pub use error::{Error, Result};
pub use fetch::{HttpFetcher, PageFetcher};
pub use pipeline::PipelineConfig;
pub use search::{SearchResult, SerpApiClient, WebSearch};
pub use secrets::Secrets;

use cellar_core::enrich::{Enrichment, ExpertNotesReport};

/// The production enricher: SerpApi search, an OpenAI-compatible chat
/// endpoint and a plain HTTP page fetcher.
pub type HttpEnricher = Enricher<SerpApiClient, OpenAiClient, HttpFetcher>;

/// Wires a search client, chat model and page fetcher into the enrichment
/// pipeline.
#[derive(Debug, Clone)]
pub struct Enricher<W, M, F> {
  search:   W,
  model:    M,
  fetcher:  F,
  pipeline: PipelineConfig,
}

impl<W, M, F> Enricher<W, M, F> {
  pub fn new(search: W, model: M, fetcher: F, pipeline: PipelineConfig) -> Self {
    Self { search, model, fetcher, pipeline }
  }
}

impl HttpEnricher {
  /// Build the HTTP clients from configuration and loaded credentials.
  pub fn from_config(config: &EnrichmentConfig, secrets: &Secrets) -> Result<Self> {
    let search = SerpApiClient::new(
      &config.search_endpoint,
      &secrets.serp_key,
      config.fetch_timeout(),
    )?;
    let model = OpenAiClient::new(
      &config.chat_endpoint,
      &secrets.openai_key,
      &config.model,
      config.chat_timeout(),
    )?;
    let fetcher = HttpFetcher::new(config.fetch_timeout())?;
    Ok(Self::new(search, model, fetcher, config.pipeline()))
  }
}

impl<W, M, F> Enrichment for Enricher<W, M, F>
where
  W: WebSearch,
  M: ChatModel,
  F: PageFetcher,
{
  type Error = Error;

  async fn describe(&self, bottle_query: &str) -> Result<String> {
    describe::describe(&self.model, bottle_query).await
  }

  async fn expert_notes(
    &self,
    bottle_query: &str,
    vocabulary: &[String],
  ) -> Result<ExpertNotesReport> {
    pipeline::generate_expert_notes(
      &self.search,
      &self.model,
      &self.fetcher,
      &self.pipeline,
      bottle_query,
      vocabulary,
    )
    .await
  }
}
