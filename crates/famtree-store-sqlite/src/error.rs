//! Error type for `famtree-store-sqlite`.

use famtree_core::PersonId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("person not found: {0}")]
  NotFound(PersonId),

  #[error("duplicate person id: {0}")]
  DuplicateId(PersonId),

  #[error("undecodable column {column}: {value:?}")]
  Decode { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
