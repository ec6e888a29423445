//! Error type for `cellar-store-sqlite`.

use cellar_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Core(#[from] cellar_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("bottle not found: {0}")]
  BottleNotFound(i64),

  #[error("user not found: {0}")]
  UserNotFound(i64),

  #[error("event not found: {0}")]
  EventNotFound(i64),

  /// Removing the note would orphan notes on the tier below.
  #[error("tasting note {0:?} still has child notes")]
  NoteHasChildren(String),
}

impl StoreError for Error {
  fn is_not_found(&self) -> bool {
    matches!(
      self,
      Error::BottleNotFound(_) | Error::UserNotFound(_) | Error::EventNotFound(_)
    )
  }

  fn is_invalid_input(&self) -> bool {
    matches!(self, Error::Core(_) | Error::NoteHasChildren(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
