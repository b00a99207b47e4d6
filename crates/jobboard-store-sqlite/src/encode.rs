//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 UTC strings with a fixed microsecond width so that
//! text comparison in SQL agrees with chronological order. Posting dates keep
//! the shape they were supplied in.

use chrono::{DateTime, SecondsFormat, Utc};
use jobboard_core::posting::{JobPosting, PostingDate, PostingFields, PostingId};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── PostingDate ─────────────────────────────────────────────────────────────

pub fn encode_date(d: &PostingDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<PostingDate> {
  s.parse().map_err(|e: jobboard_core::posting::DateParseError| {
    Error::DateParse(e.to_string())
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawPosting::from_row`].
pub const COLUMNS: &str = "job_id, company_id, title, description, location, \
                           requirements, posted_date, start_date, end_date, \
                           salary_range, company_logo, created_at, updated_at";

/// Mutable fields encoded for binding, in `INSERT`/`UPDATE` column order.
pub struct EncodedFields {
  pub company_id:   String,
  pub title:        String,
  pub description:  String,
  pub location:     Option<String>,
  pub requirements: Option<String>,
  pub posted_date:  String,
  pub start_date:   Option<String>,
  pub end_date:     Option<String>,
  pub salary_range: Option<String>,
  pub company_logo: Option<String>,
}

impl From<PostingFields> for EncodedFields {
  fn from(f: PostingFields) -> Self {
    Self {
      company_id:   f.company_id,
      title:        f.title,
      description:  f.description,
      location:     f.location,
      requirements: f.requirements,
      posted_date:  encode_date(&f.posted_date),
      start_date:   f.start_date.as_ref().map(encode_date),
      end_date:     f.end_date.as_ref().map(encode_date),
      salary_range: f.salary_range,
      company_logo: f.company_logo,
    }
  }
}

/// Raw values read directly from a `job_postings` row.
pub struct RawPosting {
  pub job_id:       i64,
  pub company_id:   String,
  pub title:        String,
  pub description:  String,
  pub location:     Option<String>,
  pub requirements: Option<String>,
  pub posted_date:  String,
  pub start_date:   Option<String>,
  pub end_date:     Option<String>,
  pub salary_range: Option<String>,
  pub company_logo: Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawPosting {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      job_id:       row.get(0)?,
      company_id:   row.get(1)?,
      title:        row.get(2)?,
      description:  row.get(3)?,
      location:     row.get(4)?,
      requirements: row.get(5)?,
      posted_date:  row.get(6)?,
      start_date:   row.get(7)?,
      end_date:     row.get(8)?,
      salary_range: row.get(9)?,
      company_logo: row.get(10)?,
      created_at:   row.get(11)?,
      updated_at:   row.get(12)?,
    })
  }

  pub fn into_posting(self) -> Result<JobPosting> {
    let fields = PostingFields {
      company_id:   self.company_id,
      title:        self.title,
      description:  self.description,
      location:     self.location,
      requirements: self.requirements,
      posted_date:  decode_date(&self.posted_date)?,
      start_date:   self.start_date.as_deref().map(decode_date).transpose()?,
      end_date:     self.end_date.as_deref().map(decode_date).transpose()?,
      salary_range: self.salary_range,
      company_logo: self.company_logo,
    };

    Ok(JobPosting::from_parts(
      PostingId(self.job_id),
      fields,
      decode_dt(&self.created_at)?,
      decode_dt(&self.updated_at)?,
    ))
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_have_fixed_width() {
    let a = encode_dt(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let b = encode_dt(
      Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        + chrono::Duration::microseconds(1),
    );
    assert_eq!(a, "2024-01-01T00:00:00.000000Z");
    assert_eq!(a.len(), b.len());
    assert!(a < b);
  }

  #[test]
  fn timestamp_round_trip() {
    let dt = Utc.with_ymd_and_hms(2023, 6, 30, 12, 34, 56).unwrap();
    assert_eq!(decode_dt(&encode_dt(dt)).unwrap(), dt);
  }

  #[test]
  fn bad_stored_date_is_an_error() {
    assert!(matches!(decode_date("31/12/2024"), Err(Error::DateParse(_))));
  }
}
