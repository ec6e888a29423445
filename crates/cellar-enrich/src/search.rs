//! Candidate discovery through a web search API.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::Deserialize;

use crate::{Error, Result};

/// Domains never worth offering to the selector.
pub const DENY_LIST: &[&str] = &["reddit.com", "archierose.com.au"];

/// SerpApi returns at most this many organic results per page.
const MAX_PAGE_SIZE: usize = 10;

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
  pub url:     String,
  pub title:   String,
  pub snippet: String,
}

/// A web search backend returning ranked candidates for a query.
pub trait WebSearch: Send + Sync {
  fn search<'a>(
    &'a self,
    query: &'a str,
    max_results: usize,
  ) -> impl Future<Output = Result<Vec<SearchResult>>> + Send + 'a;
}

/// Append a `-site:` exclusion for every deny-listed domain.
pub fn with_exclusions(query: &str) -> String {
  DENY_LIST
    .iter()
    .fold(query.trim().to_string(), |q, domain| format!("{q} -site:{domain}"))
}

// ─── SerpApi ─────────────────────────────────────────────────────────────────

/// Google search through SerpApi.
#[derive(Clone)]
pub struct SerpApiClient {
  client:   Client,
  endpoint: String,
  api_key:  String,
}

impl SerpApiClient {
  pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      endpoint: endpoint.to_string(),
      api_key: api_key.to_string(),
    })
  }
}

#[derive(Deserialize)]
struct SerpResponse {
  #[serde(default)]
  organic_results: Vec<OrganicResult>,
  error:           Option<String>,
}

#[derive(Deserialize)]
struct OrganicResult {
  link:    Option<String>,
  #[serde(default)]
  title:   String,
  #[serde(default)]
  snippet: String,
}

impl WebSearch for SerpApiClient {
  async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
    let q = with_exclusions(query);
    let num = max_results.min(MAX_PAGE_SIZE).to_string();

    let resp = self
      .client
      .get(&self.endpoint)
      .query(&[
        ("engine", "google"),
        ("q", q.as_str()),
        ("api_key", self.api_key.as_str()),
        ("num", num.as_str()),
      ])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status { service: "search", status: resp.status() });
    }
    let body: SerpResponse = resp.json().await?;
    if let Some(message) = body.error {
      tracing::warn!(query = %q, %message, "search service reported an error");
    }

    let results: Vec<SearchResult> = body
      .organic_results
      .into_iter()
      .filter_map(|r| {
        let url = r.link.filter(|l| !l.is_empty())?;
        Some(SearchResult { url, title: r.title, snippet: r.snippet })
      })
      .take(max_results)
      .collect();

    tracing::debug!(query = %q, results = results.len(), "search complete");
    Ok(results)
  }
}
