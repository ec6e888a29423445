//! The `Enrichment` trait and the report shapes it produces.
//!
//! Implemented by `cellar-enrich`; the API layer depends only on this
//! abstraction so handlers can be exercised without network access.

use std::{collections::BTreeMap, future::Future};

use serde::{Deserialize, Serialize};

/// The model's pick of the most authoritative source for a bottle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
  pub selected_url: Option<String>,
  pub confidence:   f64,
  pub reason:       String,
}

impl Selection {
  pub fn none(reason: impl Into<String>) -> Self {
    Self {
      selected_url: None,
      confidence:   0.0,
      reason:       reason.into(),
    }
  }
}

impl Default for Selection {
  fn default() -> Self { Self::none("no results") }
}

/// Outcome of an expert-notes run. The shape is the same on success and on
/// exhaustion; failure is an empty `notes` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertNotesReport {
  pub bottle:      String,
  pub source_url:  Option<String>,
  pub selection:   Selection,
  pub notes:       Vec<String>,
  /// Supporting quote per note, empty when the model gave none.
  pub evidence:    BTreeMap<String, String>,
  /// Candidates tried and discarded, in the order they failed.
  pub failed_urls: Vec<String>,
}

impl ExpertNotesReport {
  pub fn is_success(&self) -> bool { !self.notes.is_empty() }
}

/// LLM-assisted bottle enrichment.
pub trait Enrichment: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Generate a brand-style description. An empty string means nothing
  /// usable came back.
  fn describe<'a>(
    &'a self,
    bottle_query: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Infer expert tasting notes, choosing only from `vocabulary`.
  fn expert_notes<'a>(
    &'a self,
    bottle_query: &'a str,
    vocabulary: &'a [String],
  ) -> impl Future<Output = Result<ExpertNotesReport, Self::Error>> + Send + 'a;
}
