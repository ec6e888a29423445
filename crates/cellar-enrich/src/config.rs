//! Enrichment settings, deserialised as the `[enrichment]` config section.

use std::time::Duration;

use serde::Deserialize;

use crate::pipeline::PipelineConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
  pub model:              String,
  pub chat_endpoint:      String,
  pub search_endpoint:    String,
  pub max_results:        usize,
  pub max_notes:          usize,
  pub max_attempts:       usize,
  pub page_char_budget:   usize,
  pub fetch_timeout_secs: u64,
  pub chat_timeout_secs:  u64,
}

impl Default for EnrichmentConfig {
  fn default() -> Self {
    let pipeline = PipelineConfig::default();
    Self {
      model:              "gpt-5".into(),
      chat_endpoint:      "https://api.openai.com/v1".into(),
      search_endpoint:    "https://serpapi.com/search.json".into(),
      max_results:        pipeline.max_results,
      max_notes:          pipeline.max_notes,
      max_attempts:       pipeline.max_attempts,
      page_char_budget:   pipeline.page_char_budget,
      fetch_timeout_secs: 10,
      chat_timeout_secs:  120,
    }
  }
}

impl EnrichmentConfig {
  pub fn pipeline(&self) -> PipelineConfig {
    PipelineConfig {
      max_results:      self.max_results,
      max_notes:        self.max_notes,
      max_attempts:     self.max_attempts,
      page_char_budget: self.page_char_budget,
    }
  }

  pub fn fetch_timeout(&self) -> Duration { Duration::from_secs(self.fetch_timeout_secs) }

  pub fn chat_timeout(&self) -> Duration { Duration::from_secs(self.chat_timeout_secs) }
}
