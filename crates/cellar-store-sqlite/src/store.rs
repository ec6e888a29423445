//! [`SqliteStore`] — the SQLite implementation of [`BarStore`].

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use cellar_core::{
  bottle::{BottleDetail, BottlePatch, BottleQuery, NewBottle},
  event::{EventDetail, NewEvent},
  note::{self, NewTastingNote, NoteTree, TastingNote},
  review::{NewReview, Score},
  store::{BarStore, RecordTable},
  user::{NewUser, UserDetail, capitalize_name},
};
use rusqlite::{OptionalExtension as _, params, types::Value};

use crate::{
  Error, Result,
  encode::{
    BOTTLE_COLUMNS, RawBottleDetail, RawEvent, RawEventDetail, RawTastingNote,
    RawUserDetail, bottle_from_row, encode_date, user_from_row,
  },
  queries::{self, EVENT_COLUMNS},
  schema::SCHEMA,
  seed::SEED_NOTES,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cellar store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation, and seed
  /// the tasting-note taxonomy if it is empty.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let seeded = self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;

        let count: i64 =
          conn.query_row("SELECT COUNT(*) FROM tasting_notes", [], |r| r.get(0))?;
        if count > 0 {
          return Ok(0);
        }

        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO tasting_notes (name, parent, tier) VALUES (?1, ?2, ?3)",
          )?;
          for (name, parent, tier) in SEED_NOTES {
            stmt.execute(params![name, parent, i64::from(*tier)])?;
          }
        }
        tx.commit()?;
        Ok(SEED_NOTES.len())
      })
      .await?;

    if seeded > 0 {
      tracing::info!(notes = seeded, "seeded tasting-note taxonomy");
    }
    Ok(())
  }
}

// ─── BarStore impl ───────────────────────────────────────────────────────────

impl BarStore for SqliteStore {
  type Error = Error;

  // ── Bottles ───────────────────────────────────────────────────────────────

  async fn list_bottles(&self, query: BottleQuery) -> Result<Vec<BottleDetail>> {
    let raws: Vec<RawBottleDetail> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically; only placeholders carry caller text.
        let mut sql = format!("SELECT {BOTTLE_COLUMNS} FROM bottles WHERE 1=1");
        let mut values: Vec<String> = vec![];
        for (column, value) in [
          ("brand", query.brand),
          ("spirit_type", query.spirit_type),
          ("subtype", query.subtype),
        ] {
          if let Some(v) = value {
            values.push(v);
            sql.push_str(&format!(" AND {column} = ?{}", values.len()));
          }
        }
        sql.push_str(&format!(
          " ORDER BY {} {}, id ASC",
          query.sort_by.column(),
          query.order.keyword()
        ));

        let bottles = {
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params_from_iter(values.iter()), bottle_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let details = bottles
          .into_iter()
          .map(|b| queries::bottle_detail(conn, b))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(details)
      })
      .await?;

    raws.into_iter().map(RawBottleDetail::into_detail).collect()
  }

  async fn get_bottle(&self, id: i64) -> Result<Option<BottleDetail>> {
    let raw: Option<RawBottleDetail> = self
      .conn
      .call(move |conn| {
        Ok(
          queries::bottle_by_id(conn, id)?
            .map(|b| queries::bottle_detail(conn, b))
            .transpose()?,
        )
      })
      .await?;

    raw.map(RawBottleDetail::into_detail).transpose()
  }

  async fn add_bottle(&self, bottle: NewBottle) -> Result<i64> {
    bottle.validate()?;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO bottles (brand, name, abv, spirit_type, subtype, description, image_path)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            bottle.brand,
            bottle.name,
            bottle.abv,
            bottle.spirit_type,
            bottle.subtype,
            bottle.description,
            bottle.image_path,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn update_bottle(&self, id: i64, patch: BottlePatch) -> Result<bool> {
    if patch.is_empty() {
      return Err(cellar_core::Error::EmptyPatch.into());
    }

    let text = |v: Option<String>| v.map(Value::Text);
    let columns: Vec<(&'static str, Value)> = [
      ("brand", text(patch.brand)),
      ("name", text(patch.name)),
      ("abv", text(patch.abv)),
      ("spirit_type", text(patch.spirit_type)),
      ("subtype", text(patch.subtype)),
      ("description", text(patch.description)),
      ("available", patch.available.map(|a| Value::Integer(i64::from(a)))),
      ("image_path", text(patch.image_path)),
    ]
    .into_iter()
    .filter_map(|(column, value)| value.map(|v| (column, v)))
    .collect();

    let updated = self
      .conn
      .call(move |conn| {
        let assignments = columns
          .iter()
          .enumerate()
          .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
          .collect::<Vec<_>>()
          .join(", ");
        let sql = format!(
          "UPDATE bottles SET {assignments} WHERE id = ?{}",
          columns.len() + 1
        );

        let mut values: Vec<Value> = columns.into_iter().map(|(_, v)| v).collect();
        values.push(Value::Integer(id));
        Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?)
      })
      .await?;
    Ok(updated > 0)
  }

  async fn set_description(&self, id: i64, description: String) -> Result<bool> {
    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE bottles SET description = ?1 WHERE id = ?2",
          params![description, id],
        )?)
      })
      .await?;
    Ok(updated > 0)
  }

  async fn random_available_bottle_id(&self) -> Result<Option<i64>> {
    let id = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT id FROM bottles WHERE available = 1 ORDER BY RANDOM() LIMIT 1",
              [],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(id)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn list_users(&self) -> Result<Vec<UserDetail>> {
    let raws: Vec<RawUserDetail> = self
      .conn
      .call(|conn| {
        let users = {
          let mut stmt = conn.prepare("SELECT id, name, image_path FROM users ORDER BY id")?;
          stmt
            .query_map([], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        let details = users
          .into_iter()
          .map(|u| queries::user_detail(conn, u))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(details)
      })
      .await?;

    raws.into_iter().map(RawUserDetail::into_detail).collect()
  }

  async fn add_user(&self, user: NewUser) -> Result<i64> {
    let name = user.normalized_name()?;
    let image_path = user.image_path;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (name, image_path) VALUES (?1, ?2)",
          params![name, image_path],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn user_id_by_name(&self, name: &str) -> Result<Option<i64>> {
    let name = capitalize_name(name);

    let id = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id FROM users WHERE name = ?1 ORDER BY id LIMIT 1",
              params![name],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(id)
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn add_review(&self, review: NewReview) -> Result<i64> {
    let score = Score::new(review.score)?;
    let date = encode_date(
      review
        .review_date
        .unwrap_or_else(|| Utc::now().date_naive()),
    );

    self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<i64>> {
        let tx = conn.transaction()?;

        if !queries::exists(&tx, RecordTable::Users, review.user_id)? {
          return Ok(Err(Error::UserNotFound(review.user_id)));
        }
        if !queries::exists(&tx, RecordTable::Bottles, review.bottle_id)? {
          return Ok(Err(Error::BottleNotFound(review.bottle_id)));
        }
        if let Some(event_id) = review.event_id
          && !queries::exists(&tx, RecordTable::Events, event_id)?
        {
          return Ok(Err(Error::EventNotFound(event_id)));
        }

        let mut note_ids = Vec::with_capacity(review.tasting_notes.len());
        for name in &review.tasting_notes {
          match queries::note_id_by_name(&tx, name)? {
            Some(id) => note_ids.push(id),
            None => {
              return Ok(Err(
                cellar_core::Error::UnknownTastingNote(name.clone()).into(),
              ));
            }
          }
        }

        tx.execute(
          "INSERT INTO reviews (user_id, bottle_id, event_id, review_text, score, review_date)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![
            review.user_id,
            review.bottle_id,
            review.event_id,
            review.review_text,
            i64::from(score),
            date,
          ],
        )?;
        let review_id = tx.last_insert_rowid();

        for note_id in note_ids {
          tx.execute(
            "INSERT INTO community_notes (review_id, tasting_note_id) VALUES (?1, ?2)",
            params![review_id, note_id],
          )?;
        }

        tx.commit()?;
        Ok(Ok(review_id))
      })
      .await?
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn list_events(&self) -> Result<Vec<EventDetail>> {
    let raws: Vec<RawEventDetail> = self
      .conn
      .call(|conn| {
        let events = {
          let mut stmt =
            conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY event_date, id"))?;
          stmt
            .query_map([], RawEvent::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        let details = events
          .into_iter()
          .map(|e| queries::event_detail(conn, e))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(details)
      })
      .await?;

    raws.into_iter().map(RawEventDetail::into_detail).collect()
  }

  async fn get_event(&self, id: i64) -> Result<Option<EventDetail>> {
    let raw: Option<RawEventDetail> = self
      .conn
      .call(move |conn| {
        let event = conn
          .query_row(
            &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
            params![id],
            RawEvent::from_row,
          )
          .optional()?;
        Ok(event.map(|e| queries::event_detail(conn, e)).transpose()?)
      })
      .await?;

    raw.map(RawEventDetail::into_detail).transpose()
  }

  async fn add_event(&self, event: NewEvent) -> Result<i64> {
    event.validate()?;
    let date = encode_date(event.event_date.unwrap_or_else(|| Utc::now().date_naive()));

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (name, code, event_date, folder_path) VALUES (?1, ?2, ?3, ?4)",
          params![event.name, event.code, date, event.folder_path],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn add_bottles_to_event(&self, event_id: i64, bottle_ids: Vec<i64>) -> Result<()> {
    self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<()>> {
        let tx = conn.transaction()?;
        if !queries::exists(&tx, RecordTable::Events, event_id)? {
          return Ok(Err(Error::EventNotFound(event_id)));
        }
        for bottle_id in bottle_ids {
          if !queries::exists(&tx, RecordTable::Bottles, bottle_id)? {
            return Ok(Err(Error::BottleNotFound(bottle_id)));
          }
          tx.execute(
            "INSERT INTO event_drinks (event_id, bottle_id) VALUES (?1, ?2)",
            params![event_id, bottle_id],
          )?;
        }
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?
  }

  async fn add_users_to_event(&self, event_id: i64, user_ids: Vec<i64>) -> Result<()> {
    self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<()>> {
        let tx = conn.transaction()?;
        if !queries::exists(&tx, RecordTable::Events, event_id)? {
          return Ok(Err(Error::EventNotFound(event_id)));
        }
        for user_id in user_ids {
          if !queries::exists(&tx, RecordTable::Users, user_id)? {
            return Ok(Err(Error::UserNotFound(user_id)));
          }
          tx.execute(
            "INSERT INTO event_participants (event_id, user_id) VALUES (?1, ?2)",
            params![event_id, user_id],
          )?;
        }
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?
  }

  // ── Tasting notes ─────────────────────────────────────────────────────────

  async fn tasting_notes(&self) -> Result<Vec<TastingNote>> {
    let raws: Vec<RawTastingNote> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, name, parent, tier FROM tasting_notes ORDER BY id")?;
        let rows = stmt
          .query_map([], RawTastingNote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTastingNote::into_note).collect()
  }

  async fn note_tree(&self) -> Result<NoteTree> {
    Ok(NoteTree::build(&self.tasting_notes().await?))
  }

  async fn tasting_note_names(&self) -> Result<Vec<String>> {
    Ok(note::vocabulary(&self.tasting_notes().await?))
  }

  async fn add_tasting_note(&self, new: NewTastingNote) -> Result<i64> {
    let existing = self.tasting_notes().await?;
    new.validate(&existing)?;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tasting_notes (name, parent, tier) VALUES (?1, ?2, ?3)",
          params![new.name.trim(), new.parent, i64::from(new.tier)],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn expert_notes(&self, bottle_id: i64) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(move |conn| Ok(queries::expert_note_names(conn, bottle_id)?))
      .await?;
    Ok(names)
  }

  async fn set_expert_notes(&self, bottle_id: i64, names: Vec<String>) -> Result<usize> {
    self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<usize>> {
        let tx = conn.transaction()?;
        if !queries::exists(&tx, RecordTable::Bottles, bottle_id)? {
          return Ok(Err(Error::BottleNotFound(bottle_id)));
        }

        tx.execute("DELETE FROM expert_notes WHERE bottle_id = ?1", params![bottle_id])?;

        let mut stored = 0;
        let mut seen = HashSet::new();
        for name in names.iter().filter(|n| seen.insert(n.as_str())) {
          if let Some(note_id) = queries::note_id_by_name(&tx, name)? {
            tx.execute(
              "INSERT INTO expert_notes (bottle_id, tasting_note_id) VALUES (?1, ?2)",
              params![bottle_id, note_id],
            )?;
            stored += 1;
          }
        }

        tx.commit()?;
        Ok(Ok(stored))
      })
      .await?
  }

  // ── Admin ─────────────────────────────────────────────────────────────────

  async fn remove_record(&self, table: RecordTable, id: i64) -> Result<usize> {
    let (removed, dependents) = self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<(usize, usize)>> {
        let tx = conn.transaction()?;

        // Reviews owned by the record, and their community notes.
        let review_filter = match table {
          RecordTable::Users => Some("user_id"),
          RecordTable::Bottles => Some("bottle_id"),
          _ => None,
        };

        let mut dependents = 0;
        if let Some(column) = review_filter {
          tx.execute(
            &format!(
              "DELETE FROM community_notes
               WHERE review_id IN (SELECT id FROM reviews WHERE {column} = ?1)"
            ),
            params![id],
          )?;
          dependents +=
            tx.execute(&format!("DELETE FROM reviews WHERE {column} = ?1"), params![id])?;
        }

        match table {
          RecordTable::Users => {
            tx.execute("DELETE FROM event_participants WHERE user_id = ?1", params![id])?;
          }
          RecordTable::Bottles => {
            tx.execute("DELETE FROM expert_notes WHERE bottle_id = ?1", params![id])?;
            tx.execute("DELETE FROM event_drinks WHERE bottle_id = ?1", params![id])?;
          }
          RecordTable::Reviews => {
            tx.execute("DELETE FROM community_notes WHERE review_id = ?1", params![id])?;
          }
          RecordTable::Events => {
            tx.execute("DELETE FROM event_participants WHERE event_id = ?1", params![id])?;
            tx.execute("DELETE FROM event_drinks WHERE event_id = ?1", params![id])?;
            tx.execute("UPDATE reviews SET event_id = NULL WHERE event_id = ?1", params![id])?;
          }
          RecordTable::TastingNotes => {
            let note: Option<(String, i64)> = tx
              .query_row(
                "SELECT name, tier FROM tasting_notes WHERE id = ?1",
                params![id],
                |r| Ok((r.get(0)?, r.get(1)?)),
              )
              .optional()?;
            if let Some((name, tier)) = note {
              let children: i64 = tx.query_row(
                "SELECT COUNT(*) FROM tasting_notes WHERE parent = ?1 AND tier = ?2",
                params![name, tier - 1],
                |r| r.get(0),
              )?;
              if children > 0 {
                return Ok(Err(Error::NoteHasChildren(name)));
              }
            }
            tx.execute("DELETE FROM community_notes WHERE tasting_note_id = ?1", params![id])?;
            tx.execute("DELETE FROM expert_notes WHERE tasting_note_id = ?1", params![id])?;
          }
        }

        let removed = tx.execute(
          &format!("DELETE FROM {} WHERE id = ?1", table.name()),
          params![id],
        )?;
        tx.commit()?;
        Ok(Ok((removed, dependents)))
      })
      .await??;

    tracing::debug!(table = table.name(), id, removed, reviews = dependents, "removed record");
    Ok(removed)
  }
}
