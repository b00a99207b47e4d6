//! Credential verification seam.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who made a write request, as vouched for by an [`AccessVerifier`].
///
/// Authorization is a flat gate: any verified caller may write any posting.
/// The identity is used for audit logging only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
  pub id:   String,
  pub name: Option<String>,
}

/// The credential was malformed, expired, or signed by someone else.
#[derive(Debug, Error)]
#[error("invalid credential: {0}")]
pub struct InvalidCredential(pub String);

/// Checks a transport-supplied credential (e.g. a bearer token).
pub trait AccessVerifier: Send + Sync {
  fn verify<'a>(
    &'a self,
    credential: &'a str,
  ) -> impl Future<Output = Result<CallerIdentity, InvalidCredential>> + Send + 'a;
}
