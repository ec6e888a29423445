//! Handlers for `/tasting_notes`: the three-tier taxonomy.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  response::IntoResponse,
};
use cellar_core::{
  note::{NewTastingNote, NoteTree},
  store::BarStore,
};

use crate::{created, error::ApiError};

/// `GET /tasting_notes` — generic notes with their subnotes and subsubnotes.
pub async fn tree<S: BarStore>(State(store): State<Arc<S>>) -> Result<Json<NoteTree>, ApiError> {
  let tree = store.note_tree().await.map_err(ApiError::store)?;
  Ok(Json(tree))
}

/// `POST /tasting_notes` — body: `{"name", "parent"?, "tier": 1|2|3}`
pub async fn create<S: BarStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewTastingNote>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(note) = body?;
  let id = store.add_tasting_note(note).await.map_err(ApiError::store)?;
  Ok(created("Tasting note added", id))
}
