//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text (what `CURRENT_DATE` produces).
//! Rows are first read into `Raw*` structs inside the connection thread and
//! decoded into domain types afterwards.

use chrono::NaiveDate;
use cellar_core::{
  bottle::{Bottle, BottleDetail, BottleReview, NoteCount},
  event::{Event, EventDetail},
  note::{TastingNote, Tier},
  review::Score,
  user::{User, UserDetail, UserReview},
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_score(score: i64) -> Result<u8> { Ok(Score::new(score)?.get()) }

// ─── Bottles ─────────────────────────────────────────────────────────────────

/// Column list matching [`bottle_from_row`].
pub const BOTTLE_COLUMNS: &str =
  "id, brand, name, abv, spirit_type, subtype, description, available, image_path";

pub fn bottle_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Bottle> {
  Ok(Bottle {
    id:          row.get(0)?,
    brand:       row.get(1)?,
    name:        row.get(2)?,
    abv:         row.get(3)?,
    spirit_type: row.get(4)?,
    subtype:     row.get(5)?,
    description: row.get(6)?,
    available:   row.get(7)?,
    image_path:  row.get(8)?,
  })
}

pub struct RawBottleReview {
  pub review_id:     i64,
  pub reviewer_name: String,
  pub score:         i64,
  pub notes:         String,
  pub review_date:   String,
  pub tasting_notes: Vec<String>,
}

impl RawBottleReview {
  pub fn into_review(self) -> Result<BottleReview> {
    Ok(BottleReview {
      review_id:     self.review_id,
      reviewer_name: self.reviewer_name,
      score:         decode_score(self.score)?,
      notes:         self.notes,
      review_date:   decode_date(&self.review_date)?,
      tasting_notes: self.tasting_notes,
    })
  }
}

pub struct RawBottleDetail {
  pub bottle:          Bottle,
  pub reviews:         Vec<RawBottleReview>,
  pub community_notes: Vec<NoteCount>,
  pub expert_notes:    Vec<String>,
}

impl RawBottleDetail {
  pub fn into_detail(self) -> Result<BottleDetail> {
    Ok(BottleDetail {
      bottle:          self.bottle,
      reviews:         self
        .reviews
        .into_iter()
        .map(RawBottleReview::into_review)
        .collect::<Result<_>>()?,
      community_notes: self.community_notes,
      expert_notes:    self.expert_notes,
    })
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
  Ok(User {
    id:         row.get(0)?,
    name:       row.get(1)?,
    image_path: row.get(2)?,
  })
}

pub struct RawUserReview {
  pub review_id:         i64,
  pub bottle_id:         i64,
  pub event_id:          Option<i64>,
  pub score:             i64,
  pub review_text:       String,
  pub review_date:       String,
  pub bottle_name:       String,
  pub bottle_brand:      String,
  pub bottle_image_path: Option<String>,
  pub tasting_notes:     Vec<String>,
}

impl RawUserReview {
  pub fn into_review(self) -> Result<UserReview> {
    Ok(UserReview {
      review_id:         self.review_id,
      bottle_id:         self.bottle_id,
      event_id:          self.event_id,
      score:             decode_score(self.score)?,
      review_text:       self.review_text,
      review_date:       decode_date(&self.review_date)?,
      bottle_name:       self.bottle_name,
      bottle_brand:      self.bottle_brand,
      bottle_image_path: self.bottle_image_path,
      tasting_notes:     self.tasting_notes,
    })
  }
}

pub struct RawUserDetail {
  pub user:    User,
  pub reviews: Vec<RawUserReview>,
}

impl RawUserDetail {
  pub fn into_detail(self) -> Result<UserDetail> {
    Ok(UserDetail {
      user:    self.user,
      reviews: self
        .reviews
        .into_iter()
        .map(RawUserReview::into_review)
        .collect::<Result<_>>()?,
    })
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

pub struct RawEvent {
  pub id:          i64,
  pub name:        String,
  pub code:        String,
  pub event_date:  String,
  pub folder_path: Option<String>,
}

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      code:        row.get(2)?,
      event_date:  row.get(3)?,
      folder_path: row.get(4)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:          self.id,
      name:        self.name,
      code:        self.code,
      event_date:  decode_date(&self.event_date)?,
      folder_path: self.folder_path,
    })
  }
}

pub struct RawEventDetail {
  pub event:   RawEvent,
  pub bottles: Vec<Bottle>,
  pub users:   Vec<User>,
}

impl RawEventDetail {
  pub fn into_detail(self) -> Result<EventDetail> {
    Ok(EventDetail {
      event:   self.event.into_event()?,
      bottles: self.bottles,
      users:   self.users,
    })
  }
}

// ─── Tasting notes ───────────────────────────────────────────────────────────

pub struct RawTastingNote {
  pub id:     i64,
  pub name:   String,
  pub parent: Option<String>,
  pub tier:   i64,
}

impl RawTastingNote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:     row.get(0)?,
      name:   row.get(1)?,
      parent: row.get(2)?,
      tier:   row.get(3)?,
    })
  }

  pub fn into_note(self) -> Result<TastingNote> {
    Ok(TastingNote {
      id:     self.id,
      name:   self.name,
      parent: self.parent,
      tier:   Tier::try_from(self.tier)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_use_sqlite_current_date_format() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(encode_date(d), "2024-03-09");
    assert_eq!(decode_date("2024-03-09").unwrap(), d);
    assert!(matches!(decode_date("09/03/2024"), Err(Error::DateParse(_))));
  }
}
