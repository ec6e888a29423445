//! The `BarStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `cellar-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use strum::{EnumString, IntoStaticStr};

use crate::{
  Error, Result,
  bottle::{BottleDetail, BottlePatch, BottleQuery, NewBottle},
  event::{EventDetail, NewEvent},
  note::{NewTastingNote, NoteTree, TastingNote},
  review::NewReview,
  user::{NewUser, UserDetail},
};

// ─── Admin ───────────────────────────────────────────────────────────────────

/// Tables a record may be removed from through the admin endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RecordTable {
  Bottles,
  Users,
  Reviews,
  Events,
  TastingNotes,
}

impl RecordTable {
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownTable(s.to_owned()))
  }

  pub fn name(self) -> &'static str { self.into() }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Backend errors, classified so callers can tell bad input and missing
/// records apart from storage failures.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The referenced record does not exist.
  fn is_not_found(&self) -> bool;

  /// The request was rejected by validation.
  fn is_invalid_input(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Cellar storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BarStore: Send + Sync {
  type Error: StoreError;

  // ── Bottles ───────────────────────────────────────────────────────────

  /// Filtered, sorted inventory with reviews and notes attached.
  fn list_bottles(
    &self,
    query: BottleQuery,
  ) -> impl Future<Output = Result<Vec<BottleDetail>, Self::Error>> + Send + '_;

  /// Retrieve one bottle. Returns `None` if not found.
  fn get_bottle(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<BottleDetail>, Self::Error>> + Send + '_;

  fn add_bottle(
    &self,
    bottle: NewBottle,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Apply a partial update. Returns `false` if the bottle does not exist.
  fn update_bottle(
    &self,
    id: i64,
    patch: BottlePatch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn set_description(
    &self,
    id: i64,
    description: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// A uniformly random bottle among those marked available.
  fn random_available_bottle_id(
    &self,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserDetail>, Self::Error>> + Send + '_;

  fn add_user(
    &self,
    user: NewUser,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Look a user up by name; the name is capitalised first.
  fn user_id_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Record a review and its community notes.
  ///
  /// Returns an error if the score is outside `0..=10`, if the user, bottle
  /// or event does not exist, or if a tasting note is unknown.
  fn add_review(
    &self,
    review: NewReview,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Events ────────────────────────────────────────────────────────────

  fn list_events(
    &self,
  ) -> impl Future<Output = Result<Vec<EventDetail>, Self::Error>> + Send + '_;

  fn get_event(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<EventDetail>, Self::Error>> + Send + '_;

  fn add_event(
    &self,
    event: NewEvent,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn add_bottles_to_event(
    &self,
    event_id: i64,
    bottle_ids: Vec<i64>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn add_users_to_event(
    &self,
    event_id: i64,
    user_ids: Vec<i64>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Tasting notes ─────────────────────────────────────────────────────

  fn tasting_notes(
    &self,
  ) -> impl Future<Output = Result<Vec<TastingNote>, Self::Error>> + Send + '_;

  fn note_tree(
    &self,
  ) -> impl Future<Output = Result<NoteTree, Self::Error>> + Send + '_;

  /// Flattened vocabulary across all tiers; see [`crate::note::vocabulary`].
  fn tasting_note_names(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  fn add_tasting_note(
    &self,
    note: NewTastingNote,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn expert_notes(
    &self,
    bottle_id: i64,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Replace a bottle's expert notes. Unknown names are skipped; returns how
  /// many notes were stored.
  fn set_expert_notes(
    &self,
    bottle_id: i64,
    names: Vec<String>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Admin ─────────────────────────────────────────────────────────────

  /// Remove a record and everything that depends on it. Returns the number of
  /// rows removed from `table` itself (0 if the id was unknown).
  fn remove_record(
    &self,
    table: RecordTable,
    id: i64,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn record_table_names() {
    assert_eq!(RecordTable::parse("tasting_notes").unwrap(), RecordTable::TastingNotes);
    assert_eq!(RecordTable::Bottles.name(), "bottles");
    assert!(matches!(
      RecordTable::parse("sqlite_master"),
      Err(Error::UnknownTable(_))
    ));
  }
}
