//! SQL schema for the Cellar SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS bottles (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    brand       TEXT NOT NULL,
    name        TEXT NOT NULL,
    abv         TEXT NOT NULL,
    spirit_type TEXT NOT NULL,
    subtype     TEXT,
    description TEXT,
    available   INTEGER NOT NULL DEFAULT 1 CHECK (available IN (0, 1)),
    image_path  TEXT
);

CREATE TABLE IF NOT EXISTS users (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    image_path TEXT
);

CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    code        TEXT NOT NULL,
    event_date  TEXT NOT NULL DEFAULT CURRENT_DATE,   -- YYYY-MM-DD
    folder_path TEXT
);

CREATE TABLE IF NOT EXISTS reviews (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    event_id    INTEGER REFERENCES events(id),
    bottle_id   INTEGER NOT NULL REFERENCES bottles(id),
    review_text TEXT NOT NULL DEFAULT '',
    score       INTEGER NOT NULL CHECK (score BETWEEN 0 AND 10),
    review_date TEXT NOT NULL DEFAULT CURRENT_DATE    -- YYYY-MM-DD
);

CREATE TABLE IF NOT EXISTS event_participants (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id INTEGER NOT NULL REFERENCES events(id),
    user_id  INTEGER NOT NULL REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS event_drinks (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id  INTEGER NOT NULL REFERENCES events(id),
    bottle_id INTEGER NOT NULL REFERENCES bottles(id)
);

-- Self-referential by name: tier-1 parents are tier-2 names, tier-2 parents
-- are tier-3 names, tier-3 rows have no parent.
CREATE TABLE IF NOT EXISTS tasting_notes (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    name   TEXT NOT NULL,
    icon   TEXT,
    parent TEXT,
    tier   INTEGER NOT NULL CHECK (tier IN (1, 2, 3))
);

-- Notes a reviewer picked for a review.
CREATE TABLE IF NOT EXISTS community_notes (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    review_id       INTEGER NOT NULL REFERENCES reviews(id),
    tasting_note_id INTEGER NOT NULL REFERENCES tasting_notes(id)
);

-- Notes inferred for a bottle by the enrichment pipeline.
CREATE TABLE IF NOT EXISTS expert_notes (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    bottle_id       INTEGER NOT NULL REFERENCES bottles(id),
    tasting_note_id INTEGER NOT NULL REFERENCES tasting_notes(id)
);

CREATE INDEX IF NOT EXISTS reviews_bottle_idx         ON reviews(bottle_id);
CREATE INDEX IF NOT EXISTS reviews_user_idx           ON reviews(user_id);
CREATE INDEX IF NOT EXISTS community_notes_review_idx ON community_notes(review_id);
CREATE INDEX IF NOT EXISTS expert_notes_bottle_idx    ON expert_notes(bottle_id);
CREATE INDEX IF NOT EXISTS tasting_notes_name_idx     ON tasting_notes(name);

PRAGMA user_version = 1;
";
