//! The `FamilyStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `famtree-store-sqlite`,
//! or the CLI's HTTP client). The store is a dumb record keeper: validation,
//! lineage flags and referential checks live in [`crate::editor`], which is
//! generic over this trait.

use std::future::Future;

use crate::person::{NewPerson, Person, PersonId};

/// Abstraction over a family record backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FamilyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every person, in insertion order. This is the snapshot the pure
  /// functions consume.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new person. The store assigns a fresh, unique id.
  fn insert_person(
    &self,
    input: NewPerson,
    is_main_lineage: bool,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Replace every field of an existing person. Fails if `person.id` is
  /// unknown.
  fn update_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Remove a person. Fails if the id is unknown. Does not look at children.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Atomically replace the whole record with `people`, keeping their ids
  /// and order verbatim. Used by import.
  fn replace_all(
    &self,
    people: Vec<Person>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
