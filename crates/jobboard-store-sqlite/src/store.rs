//! [`SqliteStore`], the SQLite implementation of [`PostingStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use jobboard_core::{
  posting::{JobPosting, PostingFields, PostingId},
  store::PostingStore,
};

use crate::{
  Result,
  encode::{COLUMNS, EncodedFields, RawPosting, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A job posting store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every call
/// runs on the connection's single worker thread, so writes are serialised.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn select_one(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawPosting>> {
  conn
    .query_row(
      &format!("SELECT {COLUMNS} FROM job_postings WHERE job_id = ?1"),
      rusqlite::params![id],
      RawPosting::from_row,
    )
    .optional()
}

// ─── PostingStore impl ───────────────────────────────────────────────────────

impl PostingStore for SqliteStore {
  type Error = crate::Error;

  async fn scan_recent(&self, limit: usize) -> Result<Vec<JobPosting>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawPosting> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM job_postings ORDER BY job_id DESC LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], RawPosting::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPosting::into_posting).collect()
  }

  async fn get(&self, id: PostingId) -> Result<Option<JobPosting>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_one(conn, id.0)?))
      .await?;

    raw.map(RawPosting::into_posting).transpose()
  }

  async fn insert(&self, fields: PostingFields) -> Result<JobPosting> {
    let f = EncodedFields::from(fields);
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO job_postings (
             company_id, title, description, location, requirements,
             posted_date, start_date, end_date, salary_range, company_logo,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            f.company_id,
            f.title,
            f.description,
            f.location,
            f.requirements,
            f.posted_date,
            f.start_date,
            f.end_date,
            f.salary_range,
            f.company_logo,
            now,
          ],
        )?;
        let id = conn.last_insert_rowid();
        // Read back so the returned record matches later reads exactly.
        let row = conn.query_row(
          &format!("SELECT {COLUMNS} FROM job_postings WHERE job_id = ?1"),
          rusqlite::params![id],
          RawPosting::from_row,
        )?;
        Ok(row)
      })
      .await?;

    raw.into_posting()
  }

  async fn replace(
    &self,
    id: PostingId,
    fields: PostingFields,
  ) -> Result<Option<JobPosting>> {
    let f = EncodedFields::from(fields);
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE job_postings SET
             company_id   = ?2,
             title        = ?3,
             description  = ?4,
             location     = ?5,
             requirements = ?6,
             posted_date  = ?7,
             start_date   = ?8,
             end_date     = ?9,
             salary_range = ?10,
             company_logo = ?11,
             updated_at   = MAX(?12, updated_at)
           WHERE job_id = ?1",
          rusqlite::params![
            id.0,
            f.company_id,
            f.title,
            f.description,
            f.location,
            f.requirements,
            f.posted_date,
            f.start_date,
            f.end_date,
            f.salary_range,
            f.company_logo,
            now,
          ],
        )?;
        let row = if changed == 0 { None } else { select_one(&tx, id.0)? };
        tx.commit()?;
        Ok(row)
      })
      .await?;

    raw.map(RawPosting::into_posting).transpose()
  }

  async fn delete(&self, id: PostingId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM job_postings WHERE job_id = ?1",
          rusqlite::params![id.0],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}
