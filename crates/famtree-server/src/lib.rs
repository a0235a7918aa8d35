//! HTTP server for famtree.
//!
//! Wraps [`famtree_api::api_router`] under `/api`, adds request tracing and a
//! health probe, and knows how to seed an empty store with the sample family.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use famtree_core::{editor, sample::sample_family, store::FamilyStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FAMTREE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  pub store_path:      PathBuf,
  /// Label for the virtual root of a multi-root tree.
  #[serde(default = "default_family_name")]
  pub family_name:     String,
  #[serde(default)]
  pub seed_when_empty: bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_family_name() -> String {
  famtree_core::hierarchy::DEFAULT_FAMILY_LABEL.to_string()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: FamilyStore + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", famtree_api::api_router(store, config.family_name.clone()))
    .layer(TraceLayer::new_for_http())
}

// ─── Seeding ──────────────────────────────────────────────────────────────────

/// Load the sample family when `store` holds nobody. Returns whether it did.
pub async fn seed_if_empty<S: FamilyStore>(store: &S) -> famtree_core::Result<bool> {
  if !editor::snapshot(store).await?.is_empty() {
    return Ok(false);
  }
  store
    .replace_all(sample_family())
    .await
    .map_err(famtree_core::Error::store)?;
  Ok(true)
}
