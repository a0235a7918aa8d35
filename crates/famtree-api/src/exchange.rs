//! Handlers for `GET /export` and `POST /import`.
//!
//! The import body is read as raw text so that a single bad record is skipped
//! with a warning instead of rejecting the whole request.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use famtree_core::{editor, exchange::ImportWarning, store::FamilyStore};
use serde::Serialize;

use crate::{ApiState, error::ApiError};

/// `GET /export`
pub async fn export<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
  let text = editor::export_people(state.store.as_ref()).await?;
  Ok(([(header::CONTENT_TYPE, "application/json")], text))
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
  pub imported: usize,
  pub warnings: Vec<ImportWarning>,
}

/// `POST /import` with a JSON array body. Replaces the whole record.
pub async fn import<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  body: String,
) -> Result<Json<ImportResponse>, ApiError> {
  let report = editor::import_people(state.store.as_ref(), &body).await?;
  for warning in &report.warnings {
    tracing::warn!(%warning, "import");
  }
  tracing::info!(
    imported = report.people.len(),
    skipped = report.warnings.iter().filter(|w| w.skipped()).count(),
    "family imported"
  );
  Ok(Json(ImportResponse {
    imported: report.people.len(),
    warnings: report.warnings,
  }))
}
