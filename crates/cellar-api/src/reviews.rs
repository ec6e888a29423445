//! Handler for `POST /reviews`.
//!
//! Reviews are submitted by reviewer name; the name is resolved to a user
//! (case-insensitively) and an unknown name is a 404.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use cellar_core::{review::NewReview, store::BarStore};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  /// Reviewer's user name.
  pub name:          String,
  pub bottle_id:     i64,
  #[serde(default)]
  pub notes:         String,
  pub score:         i64,
  pub event_id:      Option<i64>,
  pub review_date:   Option<NaiveDate>,
  /// Community tasting notes, by name.
  #[serde(default)]
  pub tasting_notes: Vec<String>,
}

/// `POST /reviews`
pub async fn create<S: BarStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;

  let user_id = store
    .user_id_by_name(&body.name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {:?} not found", body.name)))?;

  let review_id = store
    .add_review(NewReview {
      user_id,
      bottle_id: body.bottle_id,
      event_id: body.event_id,
      review_text: body.notes,
      score: body.score,
      review_date: body.review_date,
      tasting_notes: body.tasting_notes,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(review_id, user_id, bottle_id = body.bottle_id, "review added");
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "Review added", "review_id": review_id })),
  ))
}
