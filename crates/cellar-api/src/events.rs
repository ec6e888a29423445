//! Handlers for `/events` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/events` | Every event with its bottles and participants |
//! | `POST` | `/events` | Body: `{"name", "code", "event_date"?, "folder_path"?}`; 201 |
//! | `GET`  | `/events/{id}` | 404 if not found |
//! | `POST` | `/events/{id}/bottles` | Body: `{"ids": [...]}` |
//! | `POST` | `/events/{id}/users` | Body: `{"ids": [...]}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::{JsonRejection, PathRejection}},
  response::IntoResponse,
};
use cellar_core::{
  event::{EventDetail, NewEvent},
  store::BarStore,
};
use serde::Deserialize;
use serde_json::json;

use crate::{created, error::ApiError};

/// `GET /events`
pub async fn list<S: BarStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<EventDetail>>, ApiError> {
  let events = store.list_events().await.map_err(ApiError::store)?;
  Ok(Json(events))
}

/// `POST /events`
pub async fn create<S: BarStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewEvent>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(event) = body?;
  let id = store.add_event(event).await.map_err(ApiError::store)?;
  tracing::info!(id, "event added");
  Ok(created("Event added", id))
}

/// `GET /events/{id}`
pub async fn get_one<S: BarStore>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<EventDetail>, ApiError> {
  let Path(id) = path?;
  let event = store
    .get_event(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))?;
  Ok(Json(event))
}

#[derive(Debug, Deserialize)]
pub struct IdsBody {
  pub ids: Vec<i64>,
}

/// `POST /events/{id}/bottles`
pub async fn add_bottles<S: BarStore>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<IdsBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Path(id) = path?;
  let Json(IdsBody { ids }) = body?;
  let count = ids.len();
  store
    .add_bottles_to_event(id, ids)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "message": format!("Added {count} bottles to event") })))
}

/// `POST /events/{id}/users`
pub async fn add_users<S: BarStore>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<IdsBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Path(id) = path?;
  let Json(IdsBody { ids }) = body?;
  let count = ids.len();
  store
    .add_users_to_event(id, ids)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "message": format!("Added {count} users to event") })))
}
