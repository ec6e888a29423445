//! Handlers for `/bottles` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/bottles` | Optional `?brand`, `type`, `subtype`, `sort_by`, `order` |
//! | `POST`  | `/bottles` | Body: [`CreateBody`]; returns 201 |
//! | `GET`   | `/bottles/random` | `{"id"}` of an available bottle; 404 if none |
//! | `GET`   | `/bottles/{id}` | 404 if not found |
//! | `PATCH` | `/bottles/{id}` | Body: [`UpdateBody`]; returns the updated bottle |
//! | `GET`   | `/bottles/{id}/expert_notes` | Stored expert note names |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::{JsonRejection, PathRejection, QueryRejection}},
  response::IntoResponse,
};
use cellar_core::{
  bottle::{BottleDetail, BottlePatch, BottleQuery, NewBottle, SortColumn, SortOrder},
  store::BarStore,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
  created,
  error::ApiError,
  photo::{PhotoKind, PhotoStore},
};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub brand:   Option<String>,
  #[serde(rename = "type")]
  pub kind:    Option<String>,
  pub subtype: Option<String>,
  /// One of `id`, `name`, `brand`, `abv`, `spirit_type`, `subtype`.
  pub sort_by: Option<String>,
  /// `asc` or `desc`, any case.
  pub order:   Option<String>,
}

impl ListParams {
  fn into_query(self) -> Result<BottleQuery, ApiError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    Ok(BottleQuery {
      brand:       non_empty(self.brand),
      spirit_type: non_empty(self.kind),
      subtype:     non_empty(self.subtype),
      sort_by:     self.sort_by.as_deref().map(SortColumn::parse).transpose()?.unwrap_or_default(),
      order:       self.order.as_deref().map(SortOrder::parse).transpose()?.unwrap_or_default(),
    })
  }
}

/// `GET /bottles[?brand=..][&type=..][&subtype=..][&sort_by=..][&order=..]`
pub async fn list<S: BarStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<BottleDetail>>, ApiError> {
  let Query(params) = params?;
  let bottles = store
    .list_bottles(params.into_query()?)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(bottles))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub brand:       String,
  pub name:        String,
  pub abv:         String,
  pub spirit_type: String,
  pub subtype:     Option<String>,
  pub description: Option<String>,
  /// Base64 image, optionally as a `data:` URL.
  pub photo:       Option<String>,
}

/// `POST /bottles`
pub async fn create<S: BarStore>(
  State(store): State<Arc<S>>,
  State(photos): State<PhotoStore>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let bottle = NewBottle {
    brand:       body.brand,
    name:        body.name,
    abv:         body.abv,
    spirit_type: body.spirit_type,
    subtype:     body.subtype,
    description: body.description,
    image_path:  None,
  };
  bottle.validate()?;

  let image_path = match body.photo.as_deref() {
    Some(data) => Some(photos.save(PhotoKind::Bottle, data).await?),
    None => None,
  };
  let id = store
    .add_bottle(NewBottle { image_path, ..bottle })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(id, "bottle added");
  Ok(created("Bottle added", id))
}

// ─── Random ──────────────────────────────────────────────────────────────────

/// `GET /bottles/random`
pub async fn random<S: BarStore>(
  State(store): State<Arc<S>>,
) -> Result<impl IntoResponse, ApiError> {
  let id = store
    .random_available_bottle_id()
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("no available bottles".into()))?;
  Ok(Json(json!({ "id": id })))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

pub(crate) async fn find<S: BarStore>(store: &S, id: i64) -> Result<BottleDetail, ApiError> {
  store
    .get_bottle(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("bottle {id} not found")))
}

/// `GET /bottles/{id}`
pub async fn get_one<S: BarStore>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<BottleDetail>, ApiError> {
  let Path(id) = path?;
  Ok(Json(find(store.as_ref(), id).await?))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  #[serde(flatten)]
  pub patch: BottlePatch,
  /// Replaces the bottle's image.
  pub photo: Option<String>,
}

/// `PATCH /bottles/{id}`
pub async fn update<S: BarStore>(
  State(store): State<Arc<S>>,
  State(photos): State<PhotoStore>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<BottleDetail>, ApiError> {
  let Path(id) = path?;
  let Json(UpdateBody { mut patch, photo }) = body?;

  if let Some(data) = photo.as_deref() {
    find(store.as_ref(), id).await?;
    patch.image_path = Some(photos.save(PhotoKind::Bottle, data).await?);
  }
  if !store.update_bottle(id, patch).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("bottle {id} not found")));
  }
  Ok(Json(find(store.as_ref(), id).await?))
}

// ─── Expert notes ────────────────────────────────────────────────────────────

/// `GET /bottles/{id}/expert_notes`
pub async fn expert_notes<S: BarStore>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
  let Path(id) = path?;
  let bottle = find(store.as_ref(), id).await?;
  Ok(Json(bottle.expert_notes))
}
