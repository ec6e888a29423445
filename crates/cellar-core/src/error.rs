//! Error types for `cellar-core`.

use thiserror::Error;

/// Validation failures raised before anything reaches the store.
#[derive(Debug, Error)]
pub enum Error {
  #[error("score {0} is outside 0..=10")]
  ScoreOutOfRange(i64),

  #[error("invalid tasting-note tier: {0}")]
  InvalidTier(i64),

  #[error("tier-3 note {0:?} cannot have a parent")]
  UnexpectedParent(String),

  #[error("tier-{tier} note {name:?} requires a parent")]
  MissingParent { name: String, tier: u8 },

  #[error("parent {parent:?} of {name:?} is not a tier-{expected} note")]
  InvalidParent {
    name:     String,
    parent:   String,
    expected: u8,
  },

  #[error("tier-{tier} tasting note {name:?} already exists")]
  DuplicateTastingNote { name: String, tier: u8 },

  #[error("unknown tasting note: {0:?}")]
  UnknownTastingNote(String),

  #[error("unknown sort column: {0:?}")]
  UnknownSortColumn(String),

  #[error("unknown sort order: {0:?}")]
  UnknownSortOrder(String),

  #[error("unknown table: {0:?}")]
  UnknownTable(String),

  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("nothing to update")]
  EmptyPatch,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
