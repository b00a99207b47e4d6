//! Bearer-token extraction and the JWT [`AccessVerifier`].

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jobboard_core::{
  access::{AccessVerifier, CallerIdentity, InvalidCredential},
  store::PostingStore,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Claims ──────────────────────────────────────────────────────────────────

/// JWT claims accepted by [`JwtVerifier`].
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// Caller id.
  pub sub:      String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  pub iat:      i64,
  pub exp:      i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub iss:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub aud:      Option<String>,
}

// ─── Settings ────────────────────────────────────────────────────────────────

/// Shared secret plus the optional issuer/audience every token must carry.
#[derive(Clone)]
pub struct JwtSettings {
  pub secret:   String,
  pub issuer:   Option<String>,
  pub audience: Option<String>,
}

impl JwtSettings {
  /// Mint an HS256 token for `subject` valid for `ttl`.
  pub fn issue(
    &self,
    subject: &str,
    username: Option<String>,
    ttl: Duration,
  ) -> Result<String, IssueError> {
    let now = Utc::now();
    let expires = now.checked_add_signed(ttl).ok_or(IssueError::TtlOutOfRange)?;
    let claims = Claims {
      sub: subject.to_owned(),
      username,
      iat: now.timestamp(),
      exp: expires.timestamp(),
      iss: self.issuer.clone(),
      aud: self.audience.clone(),
    };
    jsonwebtoken::encode(
      &Header::new(Algorithm::HS256),
      &claims,
      &EncodingKey::from_secret(self.secret.as_bytes()),
    )
    .map_err(IssueError::Sign)
  }
}

#[derive(Debug, thiserror::Error)]
pub enum IssueError {
  #[error("token lifetime is out of range")]
  TtlOutOfRange,
  #[error("failed to sign token: {0}")]
  Sign(#[source] jsonwebtoken::errors::Error),
}

// ─── Verifier ────────────────────────────────────────────────────────────────

/// Validates HS256 JWTs: signature, `exp`, and `iss`/`aud` when configured.
pub struct JwtVerifier {
  key:        DecodingKey,
  validation: Validation,
}

impl JwtVerifier {
  pub fn new(settings: &JwtSettings) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    // `set_issuer`/`set_audience` only check the claim when it is present.
    let mut required = vec!["exp"];
    match &settings.audience {
      Some(aud) => {
        validation.set_audience(&[aud]);
        required.push("aud");
      }
      None => validation.validate_aud = false,
    }
    if let Some(iss) = &settings.issuer {
      validation.set_issuer(&[iss]);
      required.push("iss");
    }
    validation.set_required_spec_claims(&required);

    Self {
      key: DecodingKey::from_secret(settings.secret.as_bytes()),
      validation,
    }
  }
}

impl AccessVerifier for JwtVerifier {
  async fn verify(&self, credential: &str) -> Result<CallerIdentity, InvalidCredential> {
    let data = jsonwebtoken::decode::<Claims>(credential, &self.key, &self.validation)
      .map_err(|e| InvalidCredential(e.to_string()))?;
    Ok(CallerIdentity { id: data.claims.sub, name: data.claims.username })
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The token from an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
}

/// A verified caller. Taking this as a handler argument gates the handler
/// behind the access check; it runs before the request body is read.
pub struct Caller(pub CallerIdentity);

impl<S, V> FromRequestParts<AppState<S, V>> for Caller
where
  S: PostingStore + 'static,
  V: AccessVerifier + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, V>,
  ) -> Result<Self, Self::Rejection> {
    let identity = state.postings.authorize(bearer_token(&parts.headers)).await?;
    Ok(Caller(identity))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn settings() -> JwtSettings {
    JwtSettings {
      secret:   "test-secret".to_string(),
      issuer:   None,
      audience: None,
    }
  }

  fn headers(value: &'static str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
    h
  }

  #[test]
  fn bearer_token_extraction() {
    assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
    assert_eq!(bearer_token(&headers("Basic abc123")), None);
    assert_eq!(bearer_token(&headers("abc123")), None);
    assert_eq!(bearer_token(&HeaderMap::new()), None);
  }

  #[tokio::test]
  async fn issued_token_verifies() {
    let s = settings();
    let token = s.issue("u-42", Some("alice".into()), Duration::hours(1)).unwrap();

    let who = JwtVerifier::new(&s).verify(&token).await.unwrap();
    assert_eq!(who.id, "u-42");
    assert_eq!(who.name.as_deref(), Some("alice"));
  }

  #[tokio::test]
  async fn wrong_secret_is_rejected() {
    let token = settings().issue("u-42", None, Duration::hours(1)).unwrap();
    let other = JwtSettings { secret: "another-secret".into(), ..settings() };
    assert!(JwtVerifier::new(&other).verify(&token).await.is_err());
  }

  #[tokio::test]
  async fn expired_token_is_rejected() {
    // Past the default 60s leeway.
    let token = settings().issue("u-42", None, Duration::hours(-1)).unwrap();
    assert!(JwtVerifier::new(&settings()).verify(&token).await.is_err());
  }

  #[tokio::test]
  async fn garbage_is_rejected() {
    assert!(JwtVerifier::new(&settings()).verify("not.a.jwt").await.is_err());
  }

  #[tokio::test]
  async fn issuer_and_audience_are_enforced_when_configured() {
    let strict = JwtSettings {
      issuer:   Some("https://auth.example.com".into()),
      audience: Some("jobboard".into()),
      ..settings()
    };
    let good = strict.issue("u", None, Duration::hours(1)).unwrap();
    assert!(JwtVerifier::new(&strict).verify(&good).await.is_ok());

    let bare = settings().issue("u", None, Duration::hours(1)).unwrap();
    assert!(JwtVerifier::new(&strict).verify(&bare).await.is_err());
  }

  #[tokio::test]
  async fn issuer_alone_is_required_when_configured() {
    let with_iss = JwtSettings { issuer: Some("https://auth.example.com".into()), ..settings() };
    let verifier = JwtVerifier::new(&with_iss);

    let bare = settings().issue("u", None, Duration::hours(1)).unwrap();
    assert!(verifier.verify(&bare).await.is_err());

    let other = JwtSettings { issuer: Some("https://evil.example.com".into()), ..settings() };
    let forged = other.issue("u", None, Duration::hours(1)).unwrap();
    assert!(verifier.verify(&forged).await.is_err());

    let good = with_iss.issue("u", None, Duration::hours(1)).unwrap();
    assert!(verifier.verify(&good).await.is_ok());
  }

  #[tokio::test]
  async fn audience_alone_is_required_when_configured() {
    let with_aud = JwtSettings { audience: Some("jobboard".into()), ..settings() };
    let verifier = JwtVerifier::new(&with_aud);

    let bare = settings().issue("u", None, Duration::hours(1)).unwrap();
    assert!(verifier.verify(&bare).await.is_err());

    let good = with_aud.issue("u", None, Duration::hours(1)).unwrap();
    assert!(verifier.verify(&good).await.is_ok());
  }

  #[test]
  fn ttl_overflow_is_an_error() {
    assert!(matches!(
      settings().issue("u", None, Duration::MAX),
      Err(IssueError::TtlOutOfRange)
    ));
  }
}
