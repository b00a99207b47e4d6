//! Error types for `jobboard-core`.

use thiserror::Error;

use crate::posting::PostingId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("job posting not found: {0}")]
  NotFound(PostingId),

  /// The persistence store failed. The boxed source carries the diagnostic
  /// detail; it is logged, never shown to callers.
  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
