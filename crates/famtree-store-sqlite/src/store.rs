//! [`SqliteStore`]: the SQLite implementation of [`FamilyStore`].

use std::path::Path;

use famtree_core::{NewPerson, Person, PersonId, store::FamilyStore};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{PERSON_COLUMNS, PersonParams, RawPerson, encode_id},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A family store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of stored people.
  pub async fn count(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM people", [], |r| r.get(0))?))
      .await?;
    Ok(usize::try_from(n).unwrap_or_default())
  }

  /// Whether a person with `id` is stored.
  pub async fn contains(&self, id: &PersonId) -> Result<bool> {
    let id_str = encode_id(id)?;
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM people WHERE person_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(found)
  }
}

// ─── FamilyStore impl ────────────────────────────────────────────────────────

impl FamilyStore for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM people ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let id_str = encode_id(&id)?;

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_id = ?1"),
              rusqlite::params![id_str],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_person(&self, input: NewPerson, is_main_lineage: bool) -> Result<Person> {
    let person = input.into_person(
      PersonId::Text(Uuid::new_v4().hyphenated().to_string()),
      is_main_lineage,
    );
    let params = PersonParams::encode(&person)?;

    self
      .conn
      .call(move |conn| {
        params.insert(conn)?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn update_person(&self, person: Person) -> Result<Person> {
    let params = PersonParams::encode(&person)?;

    let affected = self
      .conn
      .call(move |conn| Ok(params.update(conn)?))
      .await?;

    if affected == 0 {
      return Err(Error::NotFound(person.id));
    }
    Ok(person)
  }

  async fn delete_person(&self, id: PersonId) -> Result<()> {
    let id_str = encode_id(&id)?;

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM people WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::NotFound(id));
    }
    Ok(())
  }

  async fn replace_all(&self, people: Vec<Person>) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(people.len());
    for person in &people {
      if !seen.insert(&person.id) {
        return Err(Error::DuplicateId(person.id.clone()));
      }
    }

    let rows = people
      .iter()
      .map(PersonParams::encode)
      .collect::<Result<Vec<_>>>()?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM people", [])?;
        for row in &rows {
          row.insert(&tx)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
