//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users` | Every user with their reviews |
//! | `POST` | `/users` | Body: `{"name": "...", "photo": "<base64>"?}`; returns 201 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  response::IntoResponse,
};
use cellar_core::{
  store::BarStore,
  user::{NewUser, UserDetail},
};
use serde::Deserialize;

use crate::{
  created,
  error::ApiError,
  photo::{PhotoKind, PhotoStore},
};

/// `GET /users`
pub async fn list<S: BarStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<UserDetail>>, ApiError> {
  let users = store.list_users().await.map_err(ApiError::store)?;
  Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:  String,
  pub photo: Option<String>,
}

/// `POST /users`
pub async fn create<S: BarStore>(
  State(store): State<Arc<S>>,
  State(photos): State<PhotoStore>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let mut user = NewUser { name: body.name, image_path: None };
  user.normalized_name()?;

  if let Some(data) = body.photo.as_deref() {
    user.image_path = Some(photos.save(PhotoKind::User, data).await?);
  }
  let id = store.add_user(user).await.map_err(ApiError::store)?;

  tracing::info!(id, "user added");
  Ok(created("User added", id))
}
