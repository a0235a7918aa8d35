//! SQL schema for the famtree SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per person. `rowid` order is the record order the tree builder
-- sees, so updates never re-insert.
-- No foreign key on parent_id: dangling parents are allowed.
CREATE TABLE IF NOT EXISTS people (
    person_id       TEXT PRIMARY KEY,  -- JSON-encoded PersonId (1 or \"abc\")
    name            TEXT NOT NULL,
    nickname        TEXT,
    birth_year      INTEGER,
    death_year      INTEGER,
    location        TEXT,
    gender          TEXT NOT NULL,     -- 'female' | 'male'
    parent_id       TEXT,              -- JSON-encoded PersonId or NULL
    is_main_lineage INTEGER NOT NULL DEFAULT 0,
    spouse          TEXT,
    sibling_order   INTEGER,
    photo_url       TEXT,
    CHECK (death_year IS NULL OR birth_year IS NULL OR death_year > birth_year)
);

CREATE INDEX IF NOT EXISTS people_parent_idx ON people(parent_id);

PRAGMA user_version = 1;
";
