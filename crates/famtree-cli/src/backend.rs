//! Backend selection: the remote API when it answers, the local SQLite file
//! otherwise.

use std::path::Path;

use famtree_core::{NewPerson, Person, PersonId, store::FamilyStore};
use famtree_store_sqlite::SqliteStore;
use thiserror::Error;

use crate::client::{ApiClient, ApiConfig, ClientError};

#[derive(Debug, Error)]
pub enum BackendError {
  #[error(transparent)]
  Local(#[from] famtree_store_sqlite::Error),

  #[error(transparent)]
  Remote(#[from] ClientError),
}

pub enum Backend {
  Local(SqliteStore),
  Remote(ApiClient),
}

impl Backend {
  /// Prefer `url` when given and reachable; fall back to the file at `db`.
  pub async fn connect(url: Option<&str>, db: &Path) -> Result<Self, BackendError> {
    if let Some(url) = url {
      let client = ApiClient::new(ApiConfig {
        base_url: url.to_owned(),
      })?;
      if client.is_reachable().await {
        tracing::debug!(%url, "using remote store");
        return Ok(Self::Remote(client));
      }
      tracing::warn!(%url, db = %db.display(), "server unreachable, using local store");
    }

    if let Some(dir) = db.parent()
      && !dir.as_os_str().is_empty()
      && let Err(e) = std::fs::create_dir_all(dir)
    {
      tracing::warn!(dir = %dir.display(), error = %e, "could not create data directory");
    }
    Ok(Self::Local(SqliteStore::open(db).await?))
  }

  pub fn describe(&self) -> &'static str {
    match self {
      Self::Local(_) => "local",
      Self::Remote(_) => "remote",
    }
  }
}

impl FamilyStore for Backend {
  type Error = BackendError;

  async fn list_people(&self) -> Result<Vec<Person>, BackendError> {
    Ok(match self {
      Self::Local(s) => s.list_people().await?,
      Self::Remote(c) => c.list_people().await?,
    })
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>, BackendError> {
    Ok(match self {
      Self::Local(s) => s.get_person(id).await?,
      Self::Remote(c) => c.get_person(id).await?,
    })
  }

  async fn insert_person(
    &self,
    input: NewPerson,
    is_main_lineage: bool,
  ) -> Result<Person, BackendError> {
    Ok(match self {
      Self::Local(s) => s.insert_person(input, is_main_lineage).await?,
      Self::Remote(c) => c.insert_person(input, is_main_lineage).await?,
    })
  }

  async fn update_person(&self, person: Person) -> Result<Person, BackendError> {
    Ok(match self {
      Self::Local(s) => s.update_person(person).await?,
      Self::Remote(c) => c.update_person(person).await?,
    })
  }

  async fn delete_person(&self, id: PersonId) -> Result<(), BackendError> {
    Ok(match self {
      Self::Local(s) => s.delete_person(id).await?,
      Self::Remote(c) => c.delete_person(id).await?,
    })
  }

  async fn replace_all(&self, people: Vec<Person>) -> Result<(), BackendError> {
    Ok(match self {
      Self::Local(s) => s.replace_all(people).await?,
      Self::Remote(c) => c.replace_all(people).await?,
    })
  }
}
