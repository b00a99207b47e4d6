//! [`MemoryStore`], a process-local [`PostingStore`] for tests and demos.

use std::{
  collections::BTreeMap,
  convert::Infallible,
  sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;

use crate::{
  posting::{JobPosting, PostingFields, PostingId},
  store::PostingStore,
};

#[derive(Default)]
struct Inner {
  last_id: i64,
  rows:    BTreeMap<PostingId, JobPosting>,
}

/// Postings held in a `BTreeMap` keyed by id. Ids start at 1 and are never
/// reused, even after deletes.
#[derive(Default)]
pub struct MemoryStore {
  inner: Mutex<Inner>,
}

impl MemoryStore {
  pub fn len(&self) -> usize { self.lock().rows.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl PostingStore for MemoryStore {
  type Error = Infallible;

  async fn scan_recent(&self, limit: usize) -> Result<Vec<JobPosting>, Infallible> {
    Ok(self.lock().rows.values().rev().take(limit).cloned().collect())
  }

  async fn get(&self, id: PostingId) -> Result<Option<JobPosting>, Infallible> {
    Ok(self.lock().rows.get(&id).cloned())
  }

  async fn insert(&self, fields: PostingFields) -> Result<JobPosting, Infallible> {
    let mut inner = self.lock();
    inner.last_id += 1;
    let id = PostingId(inner.last_id);
    let now = Utc::now();
    let posting = JobPosting::from_parts(id, fields, now, now);
    inner.rows.insert(id, posting.clone());
    Ok(posting)
  }

  async fn replace(
    &self,
    id: PostingId,
    fields: PostingFields,
  ) -> Result<Option<JobPosting>, Infallible> {
    let mut inner = self.lock();
    let Some(existing) = inner.rows.get_mut(&id) else {
      return Ok(None);
    };
    let updated_at = Utc::now().max(existing.updated_at);
    *existing = JobPosting::from_parts(id, fields, existing.created_at, updated_at);
    Ok(Some(existing.clone()))
  }

  async fn delete(&self, id: PostingId) -> Result<bool, Infallible> {
    Ok(self.lock().rows.remove(&id).is_some())
  }
}
