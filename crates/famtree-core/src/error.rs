//! Error types for `famtree-core`.

use thiserror::Error;

use crate::person::{Person, PersonId};

/// A boxed error from a storage backend.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  #[error("parent not found: {0}")]
  ParentNotFound(PersonId),

  #[error("name must not be empty")]
  EmptyName,

  #[error("death year {death} must be after birth year {birth}")]
  InvalidLifespan { birth: i32, death: i32 },

  #[error("{parent} cannot become the parent of {id}: it is {id} or one of their descendants")]
  ParentCycle { id: PersonId, parent: PersonId },

  #[error("{0} already has a parent")]
  ParentAlreadySet(PersonId),

  #[error(
    "cannot delete {name}: they have {count} child(ren) ({list}); delete or reassign them first",
    count = .children.len(),
    list = .children.join(", ")
  )]
  HasChildren {
    id:       PersonId,
    name:     String,
    children: Vec<String>,
  },

  #[error("{0} does not share a parent with the other people being reordered")]
  NotSiblings(PersonId),

  /// The parent record was written but the child could not be re-linked.
  /// The parent is left in the store for manual cleanup.
  #[error(
    "created parent {} ({}) but failed to link child {child_id}: {source}",
    .parent.name,
    .parent.id
  )]
  ParentLinkFailed {
    parent:   Box<Person>,
    child_id: PersonId,
    #[source]
    source:   StoreError,
  },

  /// The person was saved with a new gender but some children's lineage
  /// flags could not be rewritten and are now stale.
  #[error(
    "updated {} ({}) but failed to refresh the lineage of {list}: {source}",
    .person.name,
    .person.id,
    list = .children.join(", ")
  )]
  ChildLineageStale {
    person:   Box<Person>,
    children: Vec<String>,
    #[source]
    source:   StoreError,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] StoreError),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// Whether this error was caused by bad input rather than by the store.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::EmptyName
        | Self::InvalidLifespan { .. }
        | Self::ParentCycle { .. }
        | Self::ParentNotFound(_)
        | Self::NotSiblings(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
