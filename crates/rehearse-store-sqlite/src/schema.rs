//! SQL schema for the Rehearse SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,       -- argon2 PHC string
    analytics     TEXT NOT NULL,       -- JSON; cached cross-interview summary
    preferences   TEXT NOT NULL,       -- JSON
    learning_path TEXT NOT NULL,       -- JSON
    subscription  TEXT NOT NULL,       -- JSON
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

-- Interview ids owned by each user, in creation order.
CREATE TABLE IF NOT EXISTS user_interviews (
    user_id      TEXT    NOT NULL REFERENCES users(user_id),
    interview_id TEXT    NOT NULL,
    position     INTEGER NOT NULL,
    PRIMARY KEY (user_id, position)
);

-- The full document lives in `document`; the other columns are copies used
-- for filtering, ordering and the revision check.
CREATE TABLE IF NOT EXISTS interviews (
    interview_id TEXT PRIMARY KEY,
    user_id      TEXT    NOT NULL,
    category     TEXT    NOT NULL,
    difficulty   TEXT    NOT NULL,
    score        INTEGER NOT NULL,
    revision     INTEGER NOT NULL,
    created_at   TEXT    NOT NULL,     -- fixed-width RFC 3339, sorts lexically
    updated_at   TEXT    NOT NULL,
    document     TEXT    NOT NULL      -- JSON-encoded Interview
);

CREATE INDEX IF NOT EXISTS interviews_user_idx     ON interviews(user_id, created_at);
CREATE INDEX IF NOT EXISTS interviews_category_idx ON interviews(category);
CREATE INDEX IF NOT EXISTS interviews_created_idx  ON interviews(created_at);

PRAGMA user_version = 1;
";
