//! The `PostingStore` trait.
//!
//! Implemented by storage backends (e.g. `jobboard-store-sqlite`, or
//! [`crate::memory::MemoryStore`] in tests). The [`PostingManager`] depends
//! on this abstraction, never on a concrete backend.
//!
//! [`PostingManager`]: crate::manager::PostingManager

use std::future::Future;

use crate::posting::{JobPosting, PostingFields, PostingId};

/// Durable keyed storage for job postings.
///
/// The store owns identity and timestamps: it assigns `id`, `created_at` and
/// `updated_at`. Concurrent writes to the same record are isolated by the
/// backend; callers add no locking of their own.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PostingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return up to `limit` postings, highest id first.
  fn scan_recent(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<JobPosting>, Self::Error>> + Send + '_;

  /// Primary-key lookup. Returns `None` if not found.
  fn get(
    &self,
    id: PostingId,
  ) -> impl Future<Output = Result<Option<JobPosting>, Self::Error>> + Send + '_;

  /// Persist a new posting. The store assigns a fresh id and sets
  /// `created_at == updated_at`.
  fn insert(
    &self,
    fields: PostingFields,
  ) -> impl Future<Output = Result<JobPosting, Self::Error>> + Send + '_;

  /// Overwrite every mutable field of an existing posting. `id` and
  /// `created_at` are preserved; `updated_at` never moves backwards.
  /// Returns `None` if no posting has this id.
  fn replace(
    &self,
    id: PostingId,
    fields: PostingFields,
  ) -> impl Future<Output = Result<Option<JobPosting>, Self::Error>> + Send + '_;

  /// Permanently remove a posting. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: PostingId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
