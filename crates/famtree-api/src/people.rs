//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | Optional `?q=` search filter |
//! | `POST`   | `/people` | Body: [`NewPerson`]; returns 201 + stored person |
//! | `GET`    | `/people/:id` | 404 if not found |
//! | `PUT`    | `/people/:id` | Body: [`Person`]; body id must match the path |
//! | `DELETE` | `/people/:id` | 204; 409 while the person has children |
//! | `POST`   | `/people/:id/children` | Body: [`NewPerson`]; parent taken from the path |
//! | `POST`   | `/people/:id/parent` | Body: [`NewPerson`]; returns 201 + `{parent, child}` |
//! | `POST`   | `/people/reorder` | Body: `{"ids":[...]}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use famtree_core::{
  NewPerson, Person, PersonId, editor, search_family_data, store::FamilyStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Free-text filter over names and locations.
  pub q: Option<String>,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people[?q=<term>]`
pub async fn list<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Person>>, ApiError> {
  let people = editor::snapshot(state.store.as_ref()).await?;
  let people = match params.q {
    Some(q) => search_family_data(&people, &q),
    None => people,
  };
  Ok(Json(people))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /people`
pub async fn create<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError> {
  let person = editor::add_person(state.store.as_ref(), body).await?;
  tracing::info!(id = %person.id, name = %person.name, "person added");
  Ok((StatusCode::CREATED, Json(person)))
}

/// `POST /people/:id/children`
pub async fn add_child<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  Path(id): Path<String>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError> {
  let person = editor::add_child(state.store.as_ref(), PersonId::parse(&id), body).await?;
  tracing::info!(id = %person.id, parent = %id, "child added");
  Ok((StatusCode::CREATED, Json(person)))
}

/// `POST /people/:id/parent`
pub async fn add_parent<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  Path(id): Path<String>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError> {
  let inserted = editor::add_parent(state.store.as_ref(), PersonId::parse(&id), body)
    .await
    .inspect_err(|e| {
      if let famtree_core::Error::ParentLinkFailed { parent, .. } = e {
        tracing::warn!(parent = %parent.id, child = %id, "parent stored but not linked");
      }
    })?;
  tracing::info!(id = %inserted.parent.id, child = %id, "parent added");
  Ok((StatusCode::CREATED, Json(inserted)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/:id`
pub async fn get_one<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
  let person = editor::get_person(state.store.as_ref(), PersonId::parse(&id)).await?;
  Ok(Json(person))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /people/:id`
pub async fn update<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  Path(id): Path<String>,
  Json(body): Json<Person>,
) -> Result<Json<Person>, ApiError> {
  let id = PersonId::parse(&id);
  if body.id != id {
    return Err(ApiError::BadRequest(format!(
      "body id {} does not match path id {id}",
      body.id
    )));
  }
  let person = editor::update_person(state.store.as_ref(), body).await?;
  tracing::info!(id = %person.id, "person updated");
  Ok(Json(person))
}

#[derive(Debug, Deserialize)]
pub struct ReorderBody {
  pub ids: Vec<PersonId>,
}

/// `POST /people/reorder`, body: `{"ids":[3, 2]}`
pub async fn reorder<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  Json(body): Json<ReorderBody>,
) -> Result<Json<Vec<Person>>, ApiError> {
  let people = editor::reorder_siblings(state.store.as_ref(), &body.ids).await?;
  tracing::info!(count = people.len(), "siblings reordered");
  Ok(Json(people))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /people/:id`
pub async fn delete<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  editor::delete_person(state.store.as_ref(), PersonId::parse(&id)).await?;
  tracing::info!(%id, "person deleted");
  Ok(StatusCode::NO_CONTENT)
}
