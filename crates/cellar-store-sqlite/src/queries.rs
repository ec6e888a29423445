//! Synchronous query helpers run inside `tokio_rusqlite::Connection::call`.
//!
//! Each helper takes a plain `&rusqlite::Connection`, so it works both on the
//! connection itself and inside a transaction.

use cellar_core::{
  bottle::{Bottle, NoteCount},
  store::RecordTable,
  user::User,
};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::encode::{
  BOTTLE_COLUMNS, RawBottleDetail, RawBottleReview, RawEvent, RawEventDetail,
  RawUserDetail, RawUserReview, bottle_from_row, user_from_row,
};

// ─── Existence ───────────────────────────────────────────────────────────────

pub fn exists(conn: &Connection, table: RecordTable, id: i64) -> rusqlite::Result<bool> {
  // `table` is an enum with fixed names, never caller text.
  let sql = format!("SELECT 1 FROM {} WHERE id = ?1", table.name());
  Ok(conn.query_row(&sql, params![id], |_| Ok(())).optional()?.is_some())
}

/// Resolve a tasting note by name. When the name exists on several tiers the
/// most specific row wins.
pub fn note_id_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row(
      "SELECT id FROM tasting_notes WHERE name = ?1 ORDER BY tier ASC, id ASC LIMIT 1",
      params![name],
      |r| r.get(0),
    )
    .optional()
}

// ─── Bottles ─────────────────────────────────────────────────────────────────

pub fn bottle_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Bottle>> {
  conn
    .query_row(
      &format!("SELECT {BOTTLE_COLUMNS} FROM bottles WHERE id = ?1"),
      params![id],
      bottle_from_row,
    )
    .optional()
}

pub fn review_note_names(conn: &Connection, review_id: i64) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare_cached(
    "SELECT tn.name
     FROM community_notes cn
     JOIN tasting_notes tn ON cn.tasting_note_id = tn.id
     WHERE cn.review_id = ?1
     ORDER BY cn.id",
  )?;
  stmt
    .query_map(params![review_id], |r| r.get(0))?
    .collect()
}

fn bottle_reviews(conn: &Connection, bottle_id: i64) -> rusqlite::Result<Vec<RawBottleReview>> {
  let mut stmt = conn.prepare_cached(
    "SELECT r.id, u.name, r.score, r.review_text, r.review_date
     FROM reviews r
     JOIN users u ON r.user_id = u.id
     WHERE r.bottle_id = ?1
     ORDER BY r.id",
  )?;
  let mut reviews = stmt
    .query_map(params![bottle_id], |row| {
      Ok(RawBottleReview {
        review_id:     row.get(0)?,
        reviewer_name: row.get(1)?,
        score:         row.get(2)?,
        notes:         row.get(3)?,
        review_date:   row.get(4)?,
        tasting_notes: Vec::new(),
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  for review in &mut reviews {
    review.tasting_notes = review_note_names(conn, review.review_id)?;
  }
  Ok(reviews)
}

fn community_note_counts(conn: &Connection, bottle_id: i64) -> rusqlite::Result<Vec<NoteCount>> {
  let mut stmt = conn.prepare_cached(
    "SELECT tn.name, COUNT(*) AS note_count
     FROM reviews r
     JOIN community_notes cn ON r.id = cn.review_id
     JOIN tasting_notes tn   ON cn.tasting_note_id = tn.id
     WHERE r.bottle_id = ?1
     GROUP BY tn.name
     ORDER BY note_count DESC, tn.name ASC",
  )?;
  stmt
    .query_map(params![bottle_id], |row| {
      Ok(NoteCount { name: row.get(0)?, count: row.get(1)? })
    })?
    .collect()
}

pub fn expert_note_names(conn: &Connection, bottle_id: i64) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare_cached(
    "SELECT tn.name
     FROM expert_notes en
     JOIN tasting_notes tn ON en.tasting_note_id = tn.id
     WHERE en.bottle_id = ?1
     ORDER BY en.id",
  )?;
  stmt
    .query_map(params![bottle_id], |r| r.get(0))?
    .collect()
}

pub fn bottle_detail(conn: &Connection, bottle: Bottle) -> rusqlite::Result<RawBottleDetail> {
  Ok(RawBottleDetail {
    reviews:         bottle_reviews(conn, bottle.id)?,
    community_notes: community_note_counts(conn, bottle.id)?,
    expert_notes:    expert_note_names(conn, bottle.id)?,
    bottle,
  })
}

// ─── Users ───────────────────────────────────────────────────────────────────

fn user_reviews(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<RawUserReview>> {
  let mut stmt = conn.prepare_cached(
    "SELECT r.id, r.bottle_id, r.event_id, r.score, r.review_text, r.review_date,
            b.name, b.brand, b.image_path
     FROM reviews r
     JOIN bottles b ON r.bottle_id = b.id
     WHERE r.user_id = ?1
     ORDER BY r.id",
  )?;
  let mut reviews = stmt
    .query_map(params![user_id], |row| {
      Ok(RawUserReview {
        review_id:         row.get(0)?,
        bottle_id:         row.get(1)?,
        event_id:          row.get(2)?,
        score:             row.get(3)?,
        review_text:       row.get(4)?,
        review_date:       row.get(5)?,
        bottle_name:       row.get(6)?,
        bottle_brand:      row.get(7)?,
        bottle_image_path: row.get(8)?,
        tasting_notes:     Vec::new(),
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  for review in &mut reviews {
    review.tasting_notes = review_note_names(conn, review.review_id)?;
  }
  Ok(reviews)
}

pub fn user_detail(conn: &Connection, user: User) -> rusqlite::Result<RawUserDetail> {
  Ok(RawUserDetail { reviews: user_reviews(conn, user.id)?, user })
}

// ─── Events ──────────────────────────────────────────────────────────────────

pub const EVENT_COLUMNS: &str = "id, name, code, event_date, folder_path";

pub fn event_detail(conn: &Connection, event: RawEvent) -> rusqlite::Result<RawEventDetail> {
  let bottles = {
    let mut stmt = conn.prepare_cached(
      "SELECT b.id, b.brand, b.name, b.abv, b.spirit_type, b.subtype,
              b.description, b.available, b.image_path
       FROM event_drinks ed
       JOIN bottles b ON ed.bottle_id = b.id
       WHERE ed.event_id = ?1
       ORDER BY ed.id",
    )?;
    stmt
      .query_map(params![event.id], bottle_from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  let users = {
    let mut stmt = conn.prepare_cached(
      "SELECT u.id, u.name, u.image_path
       FROM event_participants ep
       JOIN users u ON ep.user_id = u.id
       WHERE ep.event_id = ?1
       ORDER BY ep.id",
    )?;
    stmt
      .query_map(params![event.id], user_from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  Ok(RawEventDetail { event, bottles, users })
}
