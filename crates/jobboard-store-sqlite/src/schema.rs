//! SQL schema for the job board SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps SQLite from handing out the id of a deleted row
/// again, which plain `INTEGER PRIMARY KEY` would do for the max rowid.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS job_postings (
    job_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id    TEXT NOT NULL,
    title         TEXT NOT NULL,
    description   TEXT NOT NULL,
    location      TEXT,
    requirements  TEXT,
    posted_date   TEXT NOT NULL,   -- YYYY-MM-DD or RFC 3339
    start_date    TEXT,
    end_date      TEXT,
    salary_range  TEXT,
    company_logo  TEXT,
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, fixed microsecond width
    updated_at    TEXT NOT NULL
);

PRAGMA user_version = 1;
";
