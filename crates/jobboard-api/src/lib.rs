//! JSON REST API for the job board.
//!
//! Exposes an axum [`Router`] backed by a [`PostingManager`] over any
//! [`PostingStore`] and [`AccessVerifier`]. Reads are public; writes require
//! a bearer token the verifier accepts.

pub mod auth;
pub mod error;
pub mod postings;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use jobboard_core::{
  access::AccessVerifier,
  manager::{MissingIdPolicy, PostingManager},
  store::PostingStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::JwtSettings;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `JOBBOARD_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  pub store_path:        PathBuf,
  /// HS256 shared secret for access tokens.
  pub jwt_secret:        String,
  #[serde(default)]
  pub jwt_issuer:        Option<String>,
  #[serde(default)]
  pub jwt_audience:      Option<String>,
  /// Behaviour of upsert when the body has no `id`.
  #[serde(default)]
  pub upsert_missing_id: MissingIdPolicy,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 3001 }

impl ServerConfig {
  pub fn jwt(&self) -> JwtSettings {
    JwtSettings {
      secret:   self.jwt_secret.clone(),
      issuer:   self.jwt_issuer.clone(),
      audience: self.jwt_audience.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, V> {
  pub postings: Arc<PostingManager<S, V>>,
}

impl<S, V> AppState<S, V> {
  pub fn new(postings: PostingManager<S, V>) -> Self {
    Self { postings: Arc::new(postings) }
  }
}

impl<S, V> Clone for AppState<S, V> {
  fn clone(&self) -> Self { Self { postings: Arc::clone(&self.postings) } }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router. Posting routes live under `/jobinfos`.
pub fn router<S, V>(state: AppState<S, V>) -> Router
where
  S: PostingStore + 'static,
  V: AccessVerifier + 'static,
{
  Router::new()
    .route(
      "/jobinfos",
      get(postings::list::<S, V>).post(postings::create::<S, V>),
    )
    .route(
      "/jobinfos/",
      get(postings::list::<S, V>).post(postings::create::<S, V>),
    )
    .route(
      "/jobinfos/byId/{id}",
      get(postings::get_one::<S, V>)
        .post(postings::upsert_one::<S, V>)
        .delete(postings::delete_one::<S, V>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
