//! Enrichment endpoints: per-bottle expert notes and descriptions, and the
//! bulk refresh jobs that fill in whatever is missing.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/bottles/{id}/expert_notes` | Runs the pipeline, stores notes, returns the report |
//! | `POST` | `/bottles/{id}/description` | Generates and stores a description |
//! | `POST` | `/refresh/descriptions` | Every bottle without a description |
//! | `POST` | `/refresh/expert_notes` | Every bottle without expert notes |

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use cellar_core::{
  bottle::{BottleDetail, BottleQuery},
  enrich::{Enrichment, ExpertNotesReport},
  store::BarStore,
};
use serde::Serialize;

use crate::{ApiState, bottles::find, error::ApiError};

// ─── Single bottle ───────────────────────────────────────────────────────────

/// Outcome of a description request.
#[derive(Debug, Serialize)]
pub struct DescriptionResult {
  pub id:          i64,
  pub description: String,
  /// `false` when the model returned nothing and the bottle was left as is.
  pub updated:     bool,
}

/// Run the pipeline for one bottle and store any notes found.
async fn enrich_notes<S, E>(
  state: &ApiState<S, E>,
  bottle: &BottleDetail,
  vocabulary: &[String],
) -> Result<ExpertNotesReport, ApiError>
where
  S: BarStore,
  E: Enrichment,
{
  let query = bottle.bottle.search_query();
  let report = state
    .enricher
    .expert_notes(&query, vocabulary)
    .await
    .map_err(ApiError::enrichment)?;

  if report.is_success() {
    state
      .store
      .set_expert_notes(bottle.bottle.id, report.notes.clone())
      .await
      .map_err(ApiError::store)?;
  }
  Ok(report)
}

async fn enrich_description<S, E>(
  state: &ApiState<S, E>,
  bottle: &BottleDetail,
) -> Result<DescriptionResult, ApiError>
where
  S: BarStore,
  E: Enrichment,
{
  let id = bottle.bottle.id;
  let description = state
    .enricher
    .describe(&bottle.bottle.search_query())
    .await
    .map_err(ApiError::enrichment)?;

  let updated = !description.is_empty()
    && state
      .store
      .set_description(id, description.clone())
      .await
      .map_err(ApiError::store)?;
  Ok(DescriptionResult { id, description, updated })
}

/// `POST /bottles/{id}/expert_notes`
pub async fn expert_notes<S, E>(
  State(state): State<ApiState<S, E>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ExpertNotesReport>, ApiError>
where
  S: BarStore,
  E: Enrichment,
{
  let Path(id) = path?;
  let bottle = find(state.store.as_ref(), id).await?;
  let vocabulary = state.store.tasting_note_names().await.map_err(ApiError::store)?;
  Ok(Json(enrich_notes(&state, &bottle, &vocabulary).await?))
}

/// `POST /bottles/{id}/description`
pub async fn description<S, E>(
  State(state): State<ApiState<S, E>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DescriptionResult>, ApiError>
where
  S: BarStore,
  E: Enrichment,
{
  let Path(id) = path?;
  let bottle = find(state.store.as_ref(), id).await?;
  Ok(Json(enrich_description(&state, &bottle).await?))
}

// ─── Refresh ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RefreshFailure {
  pub id:    i64,
  pub error: String,
}

/// Per-bottle outcome of a refresh run. One bottle failing never stops the
/// run.
#[derive(Debug, Default, Serialize)]
pub struct RefreshReport {
  pub updated: Vec<i64>,
  pub skipped: Vec<i64>,
  pub errors:  Vec<RefreshFailure>,
}

impl RefreshReport {
  fn record(&mut self, id: i64, outcome: Result<bool, ApiError>) {
    match outcome {
      Ok(true) => self.updated.push(id),
      Ok(false) => self.skipped.push(id),
      Err(e) => {
        tracing::warn!(id, error = %e, "refresh failed for bottle");
        self.errors.push(RefreshFailure { id, error: e.to_string() });
      }
    }
  }
}

/// `POST /refresh/descriptions`
pub async fn refresh_descriptions<S, E>(
  State(state): State<ApiState<S, E>>,
) -> Result<Json<RefreshReport>, ApiError>
where
  S: BarStore,
  E: Enrichment,
{
  let bottles = state
    .store
    .list_bottles(BottleQuery::default())
    .await
    .map_err(ApiError::store)?;

  let mut report = RefreshReport::default();
  for bottle in bottles.iter().filter(|b| !b.bottle.has_description()) {
    let outcome = enrich_description(&state, bottle).await.map(|r| r.updated);
    report.record(bottle.bottle.id, outcome);
  }

  tracing::info!(
    updated = report.updated.len(),
    skipped = report.skipped.len(),
    errors = report.errors.len(),
    "description refresh complete"
  );
  Ok(Json(report))
}

/// `POST /refresh/expert_notes`
pub async fn refresh_expert_notes<S, E>(
  State(state): State<ApiState<S, E>>,
) -> Result<Json<RefreshReport>, ApiError>
where
  S: BarStore,
  E: Enrichment,
{
  let bottles = state
    .store
    .list_bottles(BottleQuery::default())
    .await
    .map_err(ApiError::store)?;
  let vocabulary = state.store.tasting_note_names().await.map_err(ApiError::store)?;

  let mut report = RefreshReport::default();
  for bottle in bottles.iter().filter(|b| b.expert_notes.is_empty()) {
    let outcome = enrich_notes(&state, bottle, &vocabulary)
      .await
      .map(|r| r.is_success());
    report.record(bottle.bottle.id, outcome);
  }

  tracing::info!(
    updated = report.updated.len(),
    skipped = report.skipped.len(),
    errors = report.errors.len(),
    "expert-note refresh complete"
  );
  Ok(Json(report))
}
