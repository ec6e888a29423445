//! `POST /remove_entry`: delete one record (and what depends on it).

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  response::IntoResponse,
};
use cellar_core::store::{BarStore, RecordTable};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RemoveBody {
  /// `bottles`, `users`, `reviews`, `events` or `tasting_notes`.
  pub table: String,
  pub id:    i64,
}

pub async fn remove_entry<S: BarStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<RemoveBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(RemoveBody { table, id }) = body?;
  let table = RecordTable::parse(&table)?;

  let removed = store.remove_record(table, id).await.map_err(ApiError::store)?;
  if removed == 0 {
    return Err(ApiError::NotFound(format!("no {} entry with id {id}", table.name())));
  }

  tracing::info!(table = table.name(), id, "entry removed");
  Ok(Json(json!({ "message": format!("Removed {} entry {id}", table.name()) })))
}
