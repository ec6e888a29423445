//! JSON REST API for Cellar.
//!
//! Exposes an axum [`Router`] backed by any [`cellar_core::store::BarStore`]
//! and [`cellar_core::enrich::Enrichment`]. Auth, TLS and static file serving
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cellar_api::api_router(state))
//! ```

pub mod admin;
pub mod bottles;
pub mod enrich;
pub mod error;
pub mod events;
pub mod notes;
pub mod photo;
pub mod reviews;
pub mod users;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::FromRef,
  http::StatusCode,
  routing::{get, post},
};
use cellar_core::{enrich::Enrichment, store::BarStore};
use serde_json::{Value, json};

pub use error::ApiError;
pub use photo::{PhotoKind, PhotoStore};

/// Shared handler state.
pub struct ApiState<S, E> {
  pub store:    Arc<S>,
  pub enricher: Arc<E>,
  pub photos:   PhotoStore,
}

impl<S, E> ApiState<S, E> {
  pub fn new(store: Arc<S>, enricher: Arc<E>, photos: PhotoStore) -> Self {
    Self { store, enricher, photos }
  }
}

impl<S, E> Clone for ApiState<S, E> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      enricher: self.enricher.clone(),
      photos:   self.photos.clone(),
    }
  }
}

impl<S, E> FromRef<ApiState<S, E>> for Arc<S> {
  fn from_ref(state: &ApiState<S, E>) -> Self { state.store.clone() }
}

impl<S, E> FromRef<ApiState<S, E>> for PhotoStore {
  fn from_ref(state: &ApiState<S, E>) -> Self { state.photos.clone() }
}

/// `201 Created` with `{"message", "id"}`.
pub(crate) fn created(message: impl Into<String>, id: i64) -> (StatusCode, Json<Value>) {
  (
    StatusCode::CREATED,
    Json(json!({ "message": message.into(), "id": id })),
  )
}

/// Build a fully-materialised API router over `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, E>(state: ApiState<S, E>) -> Router<()>
where
  S: BarStore + 'static,
  E: Enrichment + 'static,
{
  Router::new()
    // Bottles
    .route("/bottles", get(bottles::list::<S>).post(bottles::create::<S>))
    .route("/bottles/random", get(bottles::random::<S>))
    .route("/bottles/{id}", get(bottles::get_one::<S>).patch(bottles::update::<S>))
    .route(
      "/bottles/{id}/expert_notes",
      get(bottles::expert_notes::<S>).post(enrich::expert_notes::<S, E>),
    )
    .route("/bottles/{id}/description", post(enrich::description::<S, E>))
    // Users & reviews
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/reviews", post(reviews::create::<S>))
    // Events
    .route("/events", get(events::list::<S>).post(events::create::<S>))
    .route("/events/{id}", get(events::get_one::<S>))
    .route("/events/{id}/bottles", post(events::add_bottles::<S>))
    .route("/events/{id}/users", post(events::add_users::<S>))
    // Tasting notes
    .route("/tasting_notes", get(notes::tree::<S>).post(notes::create::<S>))
    // Admin
    .route("/remove_entry", post(admin::remove_entry::<S>))
    .route("/refresh/descriptions", post(enrich::refresh_descriptions::<S, E>))
    .route("/refresh/expert_notes", post(enrich::refresh_expert_notes::<S, E>))
    .with_state(state)
}
