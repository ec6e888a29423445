//! The expert-notes pipeline: search once, then select, fetch and classify
//! candidates until one yields notes or the attempt budget runs out.

use cellar_core::enrich::{ExpertNotesReport, Selection};

use crate::{
  ChatModel, PageFetcher, Result, SearchResult, WebSearch,
  classify::{Classification, classify_notes},
  select::{choose_official_url, valid_url},
};

/// Bounds on a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
  pub max_results:      usize,
  pub max_notes:        usize,
  pub max_attempts:     usize,
  pub page_char_budget: usize,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      max_results:      10,
      max_notes:        8,
      max_attempts:     5,
      page_char_budget: 6000,
    }
  }
}

/// Run the pipeline for `bottle_query`, choosing notes from `vocabulary`.
///
/// Search failures and selection-call failures propagate. A candidate that
/// yields no page text, no notes or a failed classification call is marked
/// failed and the next one is tried. An invalid selection counts as an
/// attempt without marking any URL.
pub async fn generate_expert_notes<W, M, F>(
  search: &W,
  model: &M,
  fetcher: &F,
  config: &PipelineConfig,
  bottle_query: &str,
  vocabulary: &[String],
) -> Result<ExpertNotesReport>
where
  W: WebSearch,
  M: ChatModel,
  F: PageFetcher,
{
  tracing::info!(bottle = bottle_query, "generating expert notes");
  let results = search.search(bottle_query, config.max_results).await?;

  let mut failed_urls: Vec<String> = Vec::new();
  let mut selection = Selection::default();
  let mut attempts = 0;

  while attempts < config.max_attempts {
    let candidates: Vec<SearchResult> = results
      .iter()
      .filter(|r| !failed_urls.contains(&r.url))
      .cloned()
      .collect();
    if candidates.is_empty() {
      tracing::debug!(bottle = bottle_query, "no candidates left");
      break;
    }

    selection = choose_official_url(model, bottle_query, &candidates).await?;
    attempts += 1;

    let Some(url) = valid_url(&selection, &candidates).map(str::to_owned) else {
      tracing::warn!(
        bottle = bottle_query,
        selected = ?selection.selected_url,
        attempts,
        "selection did not name an offered candidate"
      );
      continue;
    };
    tracing::info!(url = %url, confidence = selection.confidence, attempts, "selected source");

    let text = fetcher.fetch_text(&url).await;
    if text.is_empty() {
      tracing::debug!(url = %url, "no page text");
    } else {
      let classified = classify_notes(
        model,
        bottle_query,
        &text,
        vocabulary,
        config.max_notes,
        config.page_char_budget,
      )
      .await
      .unwrap_or_else(|e| {
        tracing::warn!(url = %url, error = %e, "classification failed");
        Classification::default()
      });

      if !classified.notes.is_empty() {
        tracing::info!(
          url = %url,
          notes = classified.notes.len(),
          failed = failed_urls.len(),
          "expert notes found"
        );
        return Ok(ExpertNotesReport {
          bottle: bottle_query.to_string(),
          source_url: Some(url),
          selection,
          notes: classified.notes,
          evidence: classified.evidence,
          failed_urls,
        });
      }
      tracing::debug!(url = %url, "page yielded no notes");
    }

    failed_urls.push(url);
  }

  tracing::info!(
    bottle = bottle_query,
    attempts,
    failed = failed_urls.len(),
    "no expert notes found"
  );
  Ok(ExpertNotesReport {
    bottle: bottle_query.to_string(),
    source_url: selection.selected_url.clone(),
    selection,
    notes: Vec::new(),
    evidence: Default::default(),
    failed_urls,
  })
}

#[cfg(test)]
mod tests {
  use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
  };

  use super::*;
  use crate::{ChatMessage, Error};

  // ── Fakes ─────────────────────────────────────────────────────────────────

  struct FakeSearch(Vec<SearchResult>);

  impl WebSearch for FakeSearch {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
      Ok(self.0.iter().take(max_results).cloned().collect())
    }
  }

  /// Replies are scripted per prompt kind; every call is recorded.
  #[derive(Default)]
  struct FakeModel {
    selections:      Mutex<VecDeque<String>>,
    classifications: Mutex<VecDeque<Result<String>>>,
    calls:           Mutex<Vec<String>>,
  }

  impl FakeModel {
    fn select(self, reply: &str) -> Self {
      self.selections.lock().unwrap().push_back(reply.to_string());
      self
    }

    fn classify(self, reply: Result<String>) -> Self {
      self.classifications.lock().unwrap().push_back(reply);
      self
    }

    fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }
  }

  impl ChatModel for FakeModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
      let user = messages.last().map(|m| m.content.clone()).unwrap_or_default();
      self.calls.lock().unwrap().push(user.clone());
      if user.contains("Candidates:") {
        Ok(self.selections.lock().unwrap().pop_front().unwrap_or_default())
      } else {
        self
          .classifications
          .lock()
          .unwrap()
          .pop_front()
          .unwrap_or_else(|| Ok(String::new()))
      }
    }
  }

  struct FakeFetcher(HashMap<String, String>);

  impl PageFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> String {
      self.0.get(url).cloned().unwrap_or_default()
    }
  }

  fn results(urls: &[&str]) -> FakeSearch {
    FakeSearch(
      urls
        .iter()
        .map(|u| SearchResult {
          url:     u.to_string(),
          title:   format!("title of {u}"),
          snippet: String::new(),
        })
        .collect(),
    )
  }

  fn pages(pairs: &[(&str, &str)]) -> FakeFetcher {
    FakeFetcher(
      pairs
        .iter()
        .map(|(u, t)| (u.to_string(), t.to_string()))
        .collect(),
    )
  }

  fn pick(url: &str) -> String {
    format!(r#"{{"selected_url": "{url}", "confidence": 0.9, "reason": "brand site"}}"#)
  }

  fn vocab() -> Vec<String> {
    ["peat", "smoke", "vanilla"].into_iter().map(String::from).collect()
  }

  // ── Behaviour ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn third_candidate_succeeds_after_two_failures() {
    let search = results(&["https://a", "https://b", "https://c"]);
    let fetcher = pages(&[("https://b", "some text"), ("https://c", "peat and smoke")]);
    let model = FakeModel::default()
      .select(&pick("https://a"))
      .select(&pick("https://b"))
      .select(&pick("https://c"))
      .classify(Ok(r#"{"notes": []}"#.into()))
      .classify(Ok(r#"{"notes": ["peat", "smoke"], "evidence": {"peat": "peaty"}}"#.into()));

    let report = generate_expert_notes(
      &search,
      &model,
      &fetcher,
      &PipelineConfig::default(),
      "Ardbeg Ten Scotch",
      &vocab(),
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert_eq!(report.source_url.as_deref(), Some("https://c"));
    assert_eq!(report.notes, ["peat", "smoke"]);
    assert_eq!(report.evidence["smoke"], "");
    assert_eq!(report.failed_urls, ["https://a", "https://b"]);

    // Failed URLs are withheld from later selections.
    let calls = model.calls();
    let last_selection = calls.iter().filter(|c| c.contains("Candidates:")).last().unwrap();
    assert!(!last_selection.contains("https://a\n"));
    assert!(last_selection.contains("1. https://c"));
  }

  #[tokio::test]
  async fn zero_results_make_no_model_calls() {
    let model = FakeModel::default();
    let report = generate_expert_notes(
      &results(&[]),
      &model,
      &pages(&[]),
      &PipelineConfig::default(),
      "Nothing",
      &vocab(),
    )
    .await
    .unwrap();

    assert!(report.notes.is_empty());
    assert_eq!(report.source_url, None);
    assert_eq!(report.selection.reason, "no results");
    assert!(model.calls().is_empty());
  }

  #[tokio::test]
  async fn invalid_selections_consume_attempts() {
    let model = FakeModel::default()
      .select(&pick("https://invented"))
      .select("no json at all")
      .select(&pick("https://invented"));
    let config = PipelineConfig { max_attempts: 3, ..Default::default() };

    let report = generate_expert_notes(
      &results(&["https://a"]),
      &model,
      &pages(&[("https://a", "peat")]),
      &config,
      "Ardbeg",
      &vocab(),
    )
    .await
    .unwrap();

    assert!(report.notes.is_empty());
    assert!(report.failed_urls.is_empty());
    assert_eq!(report.source_url.as_deref(), Some("https://invented"));
    assert_eq!(model.calls().len(), 3);
  }

  #[tokio::test]
  async fn hallucinated_notes_never_escape() {
    let model = FakeModel::default()
      .select(&pick("https://a"))
      .classify(Ok(r#"{"notes": ["dragonfruit", "vanilla", "unicorn"]}"#.into()));

    let report = generate_expert_notes(
      &results(&["https://a"]),
      &model,
      &pages(&[("https://a", "creamy vanilla")]),
      &PipelineConfig::default(),
      "Ardbeg",
      &vocab(),
    )
    .await
    .unwrap();

    assert_eq!(report.notes, ["vanilla"]);
    assert!(report.notes.iter().all(|n| vocab().contains(n)));
  }

  #[tokio::test]
  async fn failed_classification_moves_on() {
    let model = FakeModel::default()
      .select(&pick("https://a"))
      .select(&pick("https://b"))
      .classify(Err(Error::Malformed { service: "chat", reason: "boom".into() }))
      .classify(Ok(r#"{"notes": ["smoke"]}"#.into()));

    let report = generate_expert_notes(
      &results(&["https://a", "https://b"]),
      &model,
      &pages(&[("https://a", "x"), ("https://b", "y")]),
      &PipelineConfig::default(),
      "Ardbeg",
      &vocab(),
    )
    .await
    .unwrap();

    assert_eq!(report.notes, ["smoke"]);
    assert_eq!(report.failed_urls, ["https://a"]);
  }

  #[tokio::test]
  async fn exhaustion_reports_last_selection() {
    let model = FakeModel::default()
      .select(&pick("https://a"))
      .select(&pick("https://b"));

    let report = generate_expert_notes(
      &results(&["https://a", "https://b"]),
      &model,
      &pages(&[]),
      &PipelineConfig::default(),
      "Ardbeg",
      &vocab(),
    )
    .await
    .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.source_url.as_deref(), Some("https://b"));
    assert_eq!(report.failed_urls, ["https://a", "https://b"]);
    // Every candidate failed; the loop stops before using the whole budget.
    assert_eq!(model.calls().len(), 2);
  }
}
