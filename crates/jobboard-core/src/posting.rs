//! Job posting types: the stored record, its mutable field set, and the
//! loosely-typed input schema accepted from callers.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned posting identifier. Monotonically increasing and never
/// reused, so ordering by id is ordering by creation.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct PostingId(pub i64);

impl fmt::Display for PostingId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for PostingId {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { s.trim().parse().map(Self) }
}

/// Accepts both `7` and `"7"`; clients built against the old endpoint send
/// either.
impl<'de> Deserialize<'de> for PostingId {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Int(i64),
      Text(String),
    }

    match Raw::deserialize(d)? {
      Raw::Int(n) => Ok(Self(n)),
      Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
  }
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// A posting date: either a full instant or a bare calendar date. Written
/// back in the same shape it was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingDate {
  Instant(DateTime<Utc>),
  DateOnly(NaiveDate),
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognised date {0:?}; expected YYYY-MM-DD or an RFC 3339 timestamp")]
pub struct DateParseError(pub String);

impl FromStr for PostingDate {
  type Err = DateParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
      return Ok(Self::Instant(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .map(Self::DateOnly)
      .map_err(|_| DateParseError(s.to_owned()))
  }
}

impl fmt::Display for PostingDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Instant(dt) => {
        f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
      }
      Self::DateOnly(d) => write!(f, "{}", d.format("%Y-%m-%d")),
    }
  }
}

impl Serialize for PostingDate {
  fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for PostingDate {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(d)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A persisted job posting. This is also the full read projection: every
/// field here is exposed, nothing else is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
  pub id:           PostingId,
  pub company_id:   String,
  pub title:        String,
  pub description:  String,
  pub location:     Option<String>,
  pub requirements: Option<String>,
  pub posted_date:  PostingDate,
  pub start_date:   Option<PostingDate>,
  pub end_date:     Option<PostingDate>,
  pub salary_range: Option<String>,
  pub company_logo: Option<String>,
  /// Store-assigned; never changes after creation.
  pub created_at:   DateTime<Utc>,
  /// Store-assigned; bumped on every replace.
  pub updated_at:   DateTime<Utc>,
}

impl JobPosting {
  /// Assemble a record from its store-assigned metadata and field set.
  pub fn from_parts(
    id: PostingId,
    fields: PostingFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      company_id: fields.company_id,
      title: fields.title,
      description: fields.description,
      location: fields.location,
      requirements: fields.requirements,
      posted_date: fields.posted_date,
      start_date: fields.start_date,
      end_date: fields.end_date,
      salary_range: fields.salary_range,
      company_logo: fields.company_logo,
      created_at,
      updated_at,
    }
  }

  /// The caller-controlled part of the record.
  pub fn fields(&self) -> PostingFields {
    PostingFields {
      company_id:   self.company_id.clone(),
      title:        self.title.clone(),
      description:  self.description.clone(),
      location:     self.location.clone(),
      requirements: self.requirements.clone(),
      posted_date:  self.posted_date,
      start_date:   self.start_date,
      end_date:     self.end_date,
      salary_range: self.salary_range.clone(),
      company_logo: self.company_logo.clone(),
    }
  }
}

// ─── Validated fields ────────────────────────────────────────────────────────

/// Every mutable field of a posting, already validated. Input to
/// [`crate::store::PostingStore::insert`] and
/// [`crate::store::PostingStore::replace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingFields {
  pub company_id:   String,
  pub title:        String,
  pub description:  String,
  pub location:     Option<String>,
  pub requirements: Option<String>,
  pub posted_date:  PostingDate,
  pub start_date:   Option<PostingDate>,
  pub end_date:     Option<PostingDate>,
  pub salary_range: Option<String>,
  pub company_logo: Option<String>,
}

impl PostingFields {
  /// Fields with only the required values set.
  pub fn new(
    company_id: impl Into<String>,
    title: impl Into<String>,
    description: impl Into<String>,
    posted_date: PostingDate,
  ) -> Self {
    Self {
      company_id: company_id.into(),
      title: title.into(),
      description: description.into(),
      location: None,
      requirements: None,
      posted_date,
      start_date: None,
      end_date: None,
      salary_range: None,
      company_logo: None,
    }
  }
}

// ─── Input schema ────────────────────────────────────────────────────────────

/// Request body accepted by create and upsert. Everything is optional at
/// parse time so that missing fields surface as one `InvalidInput` listing
/// all of them. Unknown keys are ignored; `createdAt`/`updatedAt` are not
/// recognised and so cannot be set by callers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingInput {
  /// Only meaningful for upsert.
  pub id:           Option<PostingId>,
  #[serde(default, deserialize_with = "text_or_number")]
  pub company_id:   Option<String>,
  pub title:        Option<String>,
  pub description:  Option<String>,
  pub location:     Option<String>,
  pub requirements: Option<String>,
  pub posted_date:  Option<String>,
  pub start_date:   Option<String>,
  pub end_date:     Option<String>,
  pub salary_range: Option<String>,
  pub company_logo: Option<String>,
}

impl PostingInput {
  /// Check required fields and parse dates.
  ///
  /// `companyId`, `title`, `description` and `postedDate` must be present and
  /// not blank. Optional dates that are blank are treated as absent.
  pub fn into_fields(self) -> Result<PostingFields> {
    let mut missing = Vec::new();
    let company_id = required(self.company_id, "companyId", &mut missing);
    let title = required(self.title, "title", &mut missing);
    let description = required(self.description, "description", &mut missing);
    let posted_date = required(self.posted_date, "postedDate", &mut missing);

    let (Some(company_id), Some(title), Some(description), Some(posted_date)) =
      (company_id, title, description, posted_date)
    else {
      return Err(Error::InvalidInput(format!(
        "missing required fields: {}",
        missing.join(", ")
      )));
    };

    Ok(PostingFields {
      company_id,
      title,
      description,
      location: self.location,
      requirements: self.requirements,
      posted_date: parse_date(&posted_date, "postedDate")?,
      start_date: optional_date(self.start_date, "startDate")?,
      end_date: optional_date(self.end_date, "endDate")?,
      salary_range: self.salary_range,
      company_logo: self.company_logo,
    })
  }
}

fn required(
  value: Option<String>,
  name: &'static str,
  missing: &mut Vec<&'static str>,
) -> Option<String> {
  match value {
    Some(v) if !v.trim().is_empty() => Some(v),
    _ => {
      missing.push(name);
      None
    }
  }
}

fn parse_date(raw: &str, name: &str) -> Result<PostingDate> {
  raw
    .parse()
    .map_err(|e: DateParseError| Error::InvalidInput(format!("{name}: {e}")))
}

fn optional_date(raw: Option<String>, name: &str) -> Result<Option<PostingDate>> {
  raw
    .filter(|s| !s.trim().is_empty())
    .map(|s| parse_date(&s, name))
    .transpose()
}

/// Company ids are opaque; accept them as JSON strings or numbers.
fn text_or_number<'de, D: Deserializer<'de>>(
  d: D,
) -> Result<Option<String>, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Text(String),
    Int(i64),
    Float(f64),
  }

  Ok(Option::<Raw>::deserialize(d)?.map(|raw| match raw {
    Raw::Text(s) => s,
    Raw::Int(n) => n.to_string(),
    Raw::Float(n) => n.to_string(),
  }))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  fn input(value: serde_json::Value) -> PostingInput {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn date_only_round_trips_in_its_own_shape() {
    let d: PostingDate = "2024-01-01".parse().unwrap();
    assert_eq!(
      d,
      PostingDate::DateOnly(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    );
    assert_eq!(d.to_string(), "2024-01-01");
  }

  #[test]
  fn instant_is_normalised_to_utc() {
    let d: PostingDate = "2024-03-05T10:00:00+02:00".parse().unwrap();
    assert_eq!(
      d,
      PostingDate::Instant(Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap())
    );
    assert_eq!(d.to_string(), "2024-03-05T08:00:00Z");
  }

  #[test]
  fn garbage_date_is_rejected() {
    assert!("next tuesday".parse::<PostingDate>().is_err());
    assert!("2024-13-01".parse::<PostingDate>().is_err());
  }

  #[test]
  fn posting_id_accepts_number_or_string() {
    let a: PostingId = serde_json::from_value(json!(12)).unwrap();
    let b: PostingId = serde_json::from_value(json!("12")).unwrap();
    assert_eq!(a, b);
    assert!(serde_json::from_value::<PostingId>(json!("twelve")).is_err());
  }

  #[test]
  fn complete_input_validates() {
    let fields = input(json!({
      "companyId":   "C1",
      "title":       "Engineer",
      "description": "Build things",
      "postedDate":  "2024-01-01",
      "location":    "Remote",
      "startDate":   "2024-02-01T09:00:00Z",
      "salaryRange": "competitive",
    }))
    .into_fields()
    .unwrap();

    assert_eq!(fields.company_id, "C1");
    assert_eq!(fields.location.as_deref(), Some("Remote"));
    assert_eq!(fields.salary_range.as_deref(), Some("competitive"));
    assert!(matches!(fields.start_date, Some(PostingDate::Instant(_))));
    assert_eq!(fields.end_date, None);
    assert_eq!(fields.requirements, None);
  }

  #[test]
  fn numeric_company_id_is_accepted() {
    let fields = input(json!({
      "companyId":   42,
      "title":       "Engineer",
      "description": "Build things",
      "postedDate":  "2024-01-01",
    }))
    .into_fields()
    .unwrap();
    assert_eq!(fields.company_id, "42");
  }

  #[test]
  fn every_missing_required_field_is_reported() {
    let err = input(json!({ "title": "Engineer" })).into_fields().unwrap_err();
    let Error::InvalidInput(msg) = err else {
      panic!("expected InvalidInput, got {err:?}");
    };
    assert!(msg.contains("companyId"), "{msg}");
    assert!(msg.contains("description"), "{msg}");
    assert!(msg.contains("postedDate"), "{msg}");
    assert!(!msg.contains("title"), "{msg}");
  }

  #[test]
  fn blank_required_field_counts_as_missing() {
    let err = input(json!({
      "companyId":   "C1",
      "title":       "   ",
      "description": "Build things",
      "postedDate":  "2024-01-01",
    }))
    .into_fields()
    .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(m) if m.contains("title")));
  }

  #[test]
  fn malformed_optional_date_is_invalid_input() {
    let err = input(json!({
      "companyId":   "C1",
      "title":       "Engineer",
      "description": "Build things",
      "postedDate":  "2024-01-01",
      "endDate":     "soon",
    }))
    .into_fields()
    .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(m) if m.starts_with("endDate")));
  }

  #[test]
  fn blank_optional_date_is_absent() {
    let fields = input(json!({
      "companyId":   "C1",
      "title":       "Engineer",
      "description": "Build things",
      "postedDate":  "2024-01-01",
      "startDate":   "",
    }))
    .into_fields()
    .unwrap();
    assert_eq!(fields.start_date, None);
  }

  #[test]
  fn store_metadata_in_body_is_ignored() {
    let parsed = input(json!({
      "companyId":   "C1",
      "title":       "Engineer",
      "description": "Build things",
      "postedDate":  "2024-01-01",
      "createdAt":   "1999-01-01T00:00:00Z",
    }));
    assert!(parsed.into_fields().is_ok());
  }

  #[test]
  fn posting_serialises_camel_case() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let posting = JobPosting::from_parts(
      PostingId(3),
      PostingFields::new("C1", "Engineer", "Build", "2024-01-01".parse().unwrap()),
      now,
      now,
    );
    let v = serde_json::to_value(&posting).unwrap();
    assert_eq!(v["id"], json!(3));
    assert_eq!(v["companyId"], json!("C1"));
    assert_eq!(v["postedDate"], json!("2024-01-01"));
    assert_eq!(v["salaryRange"], json!(null));
    assert!(v.get("createdAt").is_some());
    assert_eq!(v.as_object().unwrap().len(), 13);
  }
}
