//! [`PostingManager`], the job posting resource manager.
//!
//! Stateless between calls: every operation is one round trip to the
//! [`PostingStore`]. Validation and authorization failures are returned
//! before the store is touched.

use serde::Deserialize;

use crate::{
  Error, Result,
  access::{AccessVerifier, CallerIdentity},
  posting::{JobPosting, PostingId, PostingInput},
  store::PostingStore,
};

/// How many postings [`PostingManager::list_recent`] returns at most.
pub const RECENT_LIMIT: usize = 5;

/// What upsert does when the request carries no posting id at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingIdPolicy {
  /// Fail with `InvalidInput`.
  #[default]
  Reject,
  /// Do nothing and return no record.
  Ignore,
}

pub struct PostingManager<S, V> {
  store:      S,
  verifier:   V,
  missing_id: MissingIdPolicy,
}

impl<S, V> PostingManager<S, V>
where
  S: PostingStore,
  V: AccessVerifier,
{
  pub fn new(store: S, verifier: V) -> Self {
    Self { store, verifier, missing_id: MissingIdPolicy::default() }
  }

  pub fn with_missing_id_policy(mut self, policy: MissingIdPolicy) -> Self {
    self.missing_id = policy;
    self
  }

  #[cfg(test)]
  fn store(&self) -> &S { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The [`RECENT_LIMIT`] most recently created postings, newest first.
  pub async fn list_recent(&self) -> Result<Vec<JobPosting>> {
    self.store.scan_recent(RECENT_LIMIT).await.map_err(store_failure)
  }

  pub async fn get_by_id(&self, id: PostingId) -> Result<JobPosting> {
    self
      .store
      .get(id)
      .await
      .map_err(store_failure)?
      .ok_or(Error::NotFound(id))
  }

  // ── Authorization gate ────────────────────────────────────────────────────

  /// Check a caller-supplied credential. Every write takes the returned
  /// identity, so a write cannot happen without passing through here first.
  pub async fn authorize(&self, credential: Option<&str>) -> Result<CallerIdentity> {
    let Some(credential) = credential.filter(|c| !c.is_empty()) else {
      tracing::warn!("write rejected: no credential presented");
      return Err(Error::Unauthorized);
    };

    self.verifier.verify(credential).await.map_err(|e| {
      tracing::warn!(reason = %e, "write rejected: credential did not verify");
      Error::Unauthorized
    })
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  pub async fn create(
    &self,
    caller: &CallerIdentity,
    input: PostingInput,
  ) -> Result<JobPosting> {
    let fields = input.into_fields()?;
    let posting = self.store.insert(fields).await.map_err(store_failure)?;
    tracing::info!(caller = %caller.id, posting = %posting.id, "job posting created");
    Ok(posting)
  }

  /// Replace every mutable field of the posting named by `input.id`.
  ///
  /// Returns `Ok(None)` only when the id is absent and the policy is
  /// [`MissingIdPolicy::Ignore`].
  pub async fn upsert_by_id(
    &self,
    caller: &CallerIdentity,
    input: PostingInput,
  ) -> Result<Option<JobPosting>> {
    let id = input.id;
    let fields = input.into_fields()?;

    let Some(id) = id else {
      return match self.missing_id {
        MissingIdPolicy::Reject => {
          Err(Error::InvalidInput("missing id for upsert".to_owned()))
        }
        MissingIdPolicy::Ignore => {
          tracing::debug!(caller = %caller.id, "upsert without id ignored");
          Ok(None)
        }
      };
    };

    let posting = self
      .store
      .replace(id, fields)
      .await
      .map_err(store_failure)?
      .ok_or(Error::NotFound(id))?;
    tracing::info!(caller = %caller.id, posting = %id, "job posting updated");
    Ok(Some(posting))
  }

  pub async fn delete_by_id(&self, caller: &CallerIdentity, id: PostingId) -> Result<()> {
    if !self.store.delete(id).await.map_err(store_failure)? {
      return Err(Error::NotFound(id));
    }
    tracing::info!(caller = %caller.id, posting = %id, "job posting deleted");
    Ok(())
  }
}

fn store_failure<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  tracing::error!(error = %e, "persistence store failure");
  Error::StoreUnavailable(Box::new(e))
}
