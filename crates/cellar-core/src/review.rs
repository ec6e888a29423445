//! Reviews and the bounded score they carry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A review score, guaranteed to lie in `0..=10`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
  pub const MAX: u8 = 10;

  pub fn new(value: i64) -> Result<Self> {
    if (0..=i64::from(Self::MAX)).contains(&value) {
      Ok(Self(value as u8))
    } else {
      Err(Error::ScoreOutOfRange(value))
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<i64> for Score {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> { Self::new(value) }
}

impl From<Score> for i64 {
  fn from(score: Score) -> Self { i64::from(score.0) }
}

/// Input to [`BarStore::add_review`](crate::store::BarStore::add_review).
///
/// The score is a raw integer; the store validates it before any write.
#[derive(Debug, Clone)]
pub struct NewReview {
  pub user_id:       i64,
  pub bottle_id:     i64,
  pub event_id:      Option<i64>,
  pub review_text:   String,
  pub score:         i64,
  /// Defaults to today when `None`.
  pub review_date:   Option<NaiveDate>,
  /// Community tasting notes, by name.
  pub tasting_notes: Vec<String>,
}
