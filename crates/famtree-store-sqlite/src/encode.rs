//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Person ids are stored as compact JSON so integer and string ids survive a
//! round trip unchanged. Genders are stored by their lowercase name.

use famtree_core::{Gender, Person, PersonId};

use crate::{Error, Result};

// ─── PersonId ────────────────────────────────────────────────────────────────

pub fn encode_id(id: &PersonId) -> Result<String> { Ok(serde_json::to_string(id)?) }

pub fn decode_id(s: &str) -> Result<PersonId> { Ok(serde_json::from_str(s)?) }

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> String { g.to_string() }

pub fn decode_gender(s: &str) -> Result<Gender> {
  s.parse().map_err(|_| Error::Decode {
    column: "gender",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` that feeds [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "person_id, name, nickname, birth_year, death_year, \
  location, gender, parent_id, is_main_lineage, spouse, sibling_order, photo_url";

/// Raw values read directly from a `people` row.
pub struct RawPerson {
  pub person_id:       String,
  pub name:            String,
  pub nickname:        Option<String>,
  pub birth_year:      Option<i32>,
  pub death_year:      Option<i32>,
  pub location:        Option<String>,
  pub gender:          String,
  pub parent_id:       Option<String>,
  pub is_main_lineage: bool,
  pub spouse:          Option<String>,
  pub sibling_order:   Option<i32>,
  pub photo_url:       Option<String>,
}

impl RawPerson {
  /// Read a row selected with [`PERSON_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:       row.get(0)?,
      name:            row.get(1)?,
      nickname:        row.get(2)?,
      birth_year:      row.get(3)?,
      death_year:      row.get(4)?,
      location:        row.get(5)?,
      gender:          row.get(6)?,
      parent_id:       row.get(7)?,
      is_main_lineage: row.get(8)?,
      spouse:          row.get(9)?,
      sibling_order:   row.get(10)?,
      photo_url:       row.get(11)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:              decode_id(&self.person_id)?,
      name:            self.name,
      nickname:        self.nickname,
      birth_year:      self.birth_year,
      death_year:      self.death_year,
      location:        self.location,
      gender:          decode_gender(&self.gender)?,
      parent_id:       self.parent_id.as_deref().map(decode_id).transpose()?,
      is_main_lineage: self.is_main_lineage,
      spouse:          self.spouse,
      sibling_order:   self.sibling_order,
      photo_url:       self.photo_url,
    })
  }
}

/// Owned, `Send` column values for one `people` row, ready to bind.
pub struct PersonParams {
  pub person_id:       String,
  pub name:            String,
  pub nickname:        Option<String>,
  pub birth_year:      Option<i32>,
  pub death_year:      Option<i32>,
  pub location:        Option<String>,
  pub gender:          String,
  pub parent_id:       Option<String>,
  pub is_main_lineage: bool,
  pub spouse:          Option<String>,
  pub sibling_order:   Option<i32>,
  pub photo_url:       Option<String>,
}

impl PersonParams {
  pub fn encode(person: &Person) -> Result<Self> {
    Ok(Self {
      person_id:       encode_id(&person.id)?,
      name:            person.name.clone(),
      nickname:        person.nickname.clone(),
      birth_year:      person.birth_year,
      death_year:      person.death_year,
      location:        person.location.clone(),
      gender:          encode_gender(person.gender),
      parent_id:       person.parent_id.as_ref().map(encode_id).transpose()?,
      is_main_lineage: person.is_main_lineage,
      spouse:          person.spouse.clone(),
      sibling_order:   person.sibling_order,
      photo_url:       person.photo_url.clone(),
    })
  }

  /// `INSERT` this row on an open connection or transaction.
  pub fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<usize> {
    conn.execute(
      "INSERT INTO people (
         person_id, name, nickname, birth_year, death_year, location,
         gender, parent_id, is_main_lineage, spouse, sibling_order, photo_url
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
      rusqlite::params![
        self.person_id,
        self.name,
        self.nickname,
        self.birth_year,
        self.death_year,
        self.location,
        self.gender,
        self.parent_id,
        self.is_main_lineage,
        self.spouse,
        self.sibling_order,
        self.photo_url,
      ],
    )
  }

  /// `UPDATE` the row keyed by `person_id`; returns the affected row count.
  pub fn update(&self, conn: &rusqlite::Connection) -> rusqlite::Result<usize> {
    conn.execute(
      "UPDATE people SET
         name = ?2, nickname = ?3, birth_year = ?4, death_year = ?5,
         location = ?6, gender = ?7, parent_id = ?8, is_main_lineage = ?9,
         spouse = ?10, sibling_order = ?11, photo_url = ?12
       WHERE person_id = ?1",
      rusqlite::params![
        self.person_id,
        self.name,
        self.nickname,
        self.birth_year,
        self.death_year,
        self.location,
        self.gender,
        self.parent_id,
        self.is_main_lineage,
        self.spouse,
        self.sibling_order,
        self.photo_url,
      ],
    )
  }
}
