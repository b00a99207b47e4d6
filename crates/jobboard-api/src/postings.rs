//! Handlers for the `/jobinfos` endpoints.
//!
//! | Method   | Path                  | Notes |
//! |----------|-----------------------|-------|
//! | `GET`    | `/jobinfos/`          | Five most recent postings, newest first |
//! | `GET`    | `/jobinfos/byId/{id}` | 404 if not found |
//! | `POST`   | `/jobinfos/`          | Bearer token; body: [`PostingInput`]; returns 201 |
//! | `POST`   | `/jobinfos/byId/{id}` | Bearer token; body must carry `id`; replaces every field |
//! | `DELETE` | `/jobinfos/byId/{id}` | Bearer token |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use jobboard_core::{
  access::AccessVerifier,
  posting::{JobPosting, PostingId, PostingInput},
  store::PostingStore,
};
use serde_json::json;

use crate::{AppState, auth::Caller, error::ApiError};

/// An id that does not parse cannot name a stored posting.
fn parse_id(raw: &str) -> Result<PostingId, ApiError> {
  raw.parse().map_err(|_| ApiError::NotFound)
}

fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  body
    .map(|Json(v)| v)
    .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /jobinfos/`
pub async fn list<S, V>(
  State(state): State<AppState<S, V>>,
) -> Result<Json<Vec<JobPosting>>, ApiError>
where
  S: PostingStore + 'static,
  V: AccessVerifier + 'static,
{
  Ok(Json(state.postings.list_recent().await?))
}

/// `GET /jobinfos/byId/{id}`
pub async fn get_one<S, V>(
  State(state): State<AppState<S, V>>,
  Path(raw_id): Path<String>,
) -> Result<Json<JobPosting>, ApiError>
where
  S: PostingStore + 'static,
  V: AccessVerifier + 'static,
{
  let id = parse_id(&raw_id)?;
  Ok(Json(state.postings.get_by_id(id).await?))
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// `POST /jobinfos/`: returns 201 and the stored posting.
pub async fn create<S, V>(
  State(state): State<AppState<S, V>>,
  Caller(caller): Caller,
  payload: Result<Json<PostingInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PostingStore + 'static,
  V: AccessVerifier + 'static,
{
  let input = body(payload)?;
  let posting = state.postings.create(&caller, input).await?;
  Ok((StatusCode::CREATED, Json(posting)))
}

/// `POST /jobinfos/byId/{id}`
///
/// The body's `id` names the posting. If the path segment is also a valid id
/// the two must agree. With no body id the configured
/// [`MissingIdPolicy`](jobboard_core::manager::MissingIdPolicy) decides
/// between 400 and an empty 204.
pub async fn upsert_one<S, V>(
  State(state): State<AppState<S, V>>,
  Caller(caller): Caller,
  Path(raw_id): Path<String>,
  payload: Result<Json<PostingInput>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: PostingStore + 'static,
  V: AccessVerifier + 'static,
{
  let input = body(payload)?;

  if let (Some(body_id), Ok(path_id)) = (input.id, raw_id.parse::<PostingId>())
    && body_id != path_id
  {
    return Err(ApiError::BadRequest(format!(
      "id {body_id} in body does not match id {path_id} in path"
    )));
  }

  match state.postings.upsert_by_id(&caller, input).await? {
    Some(posting) => Ok(Json(posting).into_response()),
    None => Ok(StatusCode::NO_CONTENT.into_response()),
  }
}

/// `DELETE /jobinfos/byId/{id}`
pub async fn delete_one<S, V>(
  State(state): State<AppState<S, V>>,
  Caller(caller): Caller,
  Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PostingStore + 'static,
  V: AccessVerifier + 'static,
{
  let id = parse_id(&raw_id)?;
  state.postings.delete_by_id(&caller, id).await?;
  Ok(Json(json!({ "message": "Job deleted successfully" })))
}
