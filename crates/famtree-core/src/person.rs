//! Person: the only entity in a family record.
//!
//! Records reference their parent by id; the tree is never stored, only
//! derived (see [`crate::hierarchy`]). The JSON shape of [`Person`] is the
//! import/export format.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// An opaque person identifier.
///
/// Records created locally by older exports carry integer ids, records created
/// by a store carry strings. Both forms round-trip through JSON unchanged.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(untagged)]
pub enum PersonId {
  Int(i64),
  Text(String),
}

impl PersonId {
  /// Parse an id from a path segment or command-line argument. Anything that
  /// parses as an integer becomes [`PersonId::Int`].
  pub fn parse(s: &str) -> Self {
    s.parse::<i64>()
      .map(Self::Int)
      .unwrap_or_else(|_| Self::Text(s.to_owned()))
  }
}

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Int(n) => write!(f, "{n}"),
      Self::Text(s) => f.write_str(s),
    }
  }
}

impl From<i64> for PersonId {
  fn from(n: i64) -> Self { Self::Int(n) }
}

impl From<&str> for PersonId {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for PersonId {
  fn from(s: String) -> Self { Self::Text(s) }
}

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Drives the matrilineal lineage rule.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Gender {
  #[default]
  Female,
  Male,
}

impl Gender {
  pub fn symbol(self) -> char {
    match self {
      Self::Female => '♀',
      Self::Male => '♂',
    }
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// One record in the family store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub id:              PersonId,
  pub name:            String,
  pub nickname:        Option<String>,
  pub birth_year:      Option<i32>,
  pub death_year:      Option<i32>,
  pub location:        Option<String>,
  pub gender:          Gender,
  /// Absent, or pointing at a missing record, means this person is a root.
  pub parent_id:       Option<PersonId>,
  /// Derived by [`crate::lineage`]; recomputed on every edit that touches
  /// `gender` or `parent_id`.
  #[serde(default)]
  pub is_main_lineage: bool,
  pub spouse:          Option<String>,
  /// Manual ordering among siblings; wins over birth year.
  pub sibling_order:   Option<i32>,
  #[serde(rename = "photoURL")]
  pub photo_url:       Option<String>,
}

impl Person {
  pub fn validate(&self) -> Result<()> {
    validate_details(&self.name, self.birth_year, self.death_year)
  }

  pub fn is_deceased(&self) -> bool { self.death_year.is_some() }

  /// Age in years: lifetime for the deceased, age in `current_year` for the
  /// living. `None` without a birth year.
  pub fn age(&self, current_year: i32) -> Option<i32> {
    let born = self.birth_year?;
    Some(self.death_year.unwrap_or(current_year) - born)
  }

  /// `1945-1999`, `1945-` or `?-`.
  pub fn lifespan(&self) -> String {
    let born = self
      .birth_year
      .map_or_else(|| "?".to_owned(), |y| y.to_string());
    let died = self.death_year.map(|y| y.to_string()).unwrap_or_default();
    format!("{born}-{died}")
  }
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::FamilyStore::insert_person`].
/// The store assigns `id`; the editing layer computes `is_main_lineage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
  pub name:          String,
  pub nickname:      Option<String>,
  pub birth_year:    Option<i32>,
  pub death_year:    Option<i32>,
  pub location:      Option<String>,
  #[serde(default)]
  pub gender:        Gender,
  pub parent_id:     Option<PersonId>,
  pub spouse:        Option<String>,
  pub sibling_order: Option<i32>,
  #[serde(rename = "photoURL")]
  pub photo_url:     Option<String>,
}

impl NewPerson {
  /// Convenience constructor with all optional fields unset.
  pub fn new(name: impl Into<String>, gender: Gender) -> Self {
    Self {
      name: name.into(),
      gender,
      ..Self::default()
    }
  }

  pub fn with_parent(mut self, parent_id: PersonId) -> Self {
    self.parent_id = Some(parent_id);
    self
  }

  pub fn validate(&self) -> Result<()> {
    validate_details(&self.name, self.birth_year, self.death_year)
  }

  /// Attach the store-assigned id and the computed lineage flag.
  pub fn into_person(self, id: PersonId, is_main_lineage: bool) -> Person {
    Person {
      id,
      name: self.name,
      nickname: self.nickname,
      birth_year: self.birth_year,
      death_year: self.death_year,
      location: self.location,
      gender: self.gender,
      parent_id: self.parent_id,
      is_main_lineage,
      spouse: self.spouse,
      sibling_order: self.sibling_order,
      photo_url: self.photo_url,
    }
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Field-level checks shared by creation, edit and import.
pub fn validate_details(
  name: &str,
  birth_year: Option<i32>,
  death_year: Option<i32>,
) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::EmptyName);
  }
  if let (Some(birth), Some(death)) = (birth_year, death_year)
    && death <= birth
  {
    return Err(Error::InvalidLifespan { birth, death });
  }
  Ok(())
}

// ─── Snapshot lookups ────────────────────────────────────────────────────────

pub fn find<'a>(records: &'a [Person], id: &PersonId) -> Option<&'a Person> {
  records.iter().find(|p| &p.id == id)
}

/// Direct children of `id`, in record order.
pub fn children_of<'a>(
  records: &'a [Person],
  id: &PersonId,
) -> impl Iterator<Item = &'a Person> + use<'a> {
  let id = id.clone();
  records
    .iter()
    .filter(move |p| p.parent_id.as_ref() == Some(&id))
}

/// The resolved parent of `person`, if any.
pub fn parent_of<'a>(records: &'a [Person], person: &Person) -> Option<&'a Person> {
  person.parent_id.as_ref().and_then(|pid| find(records, pid))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn person_id_parse_prefers_integers() {
    assert_eq!(PersonId::parse("42"), PersonId::Int(42));
    assert_eq!(
      PersonId::parse("9f1c-aa"),
      PersonId::Text("9f1c-aa".into())
    );
  }

  #[test]
  fn person_id_json_keeps_its_form() {
    let ids: Vec<PersonId> = serde_json::from_str(r#"[1, "abc"]"#).unwrap();
    assert_eq!(ids, vec![PersonId::Int(1), PersonId::Text("abc".into())]);
    assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[1,"abc"]"#);
  }

  #[test]
  fn gender_parses_case_insensitively() {
    assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
    assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
    assert!("other".parse::<Gender>().is_err());
    assert_eq!(Gender::Male.to_string(), "male");
  }

  #[test]
  fn validation_rejects_blank_name_and_reversed_years() {
    assert!(matches!(
      validate_details("  ", None, None),
      Err(Error::EmptyName)
    ));
    assert!(matches!(
      validate_details("Anna", Some(1950), Some(1950)),
      Err(Error::InvalidLifespan { birth: 1950, death: 1950 })
    ));
    assert!(validate_details("Anna", Some(1950), Some(2001)).is_ok());
    assert!(validate_details("Anna", None, Some(2001)).is_ok());
  }

  #[test]
  fn age_uses_death_year_when_present() {
    let mut p = NewPerson::new("Maria", Gender::Female)
      .into_person(PersonId::Int(1), true);
    assert_eq!(p.age(2024), None);
    p.birth_year = Some(1920);
    assert_eq!(p.age(2024), Some(104));
    p.death_year = Some(1995);
    assert_eq!(p.age(2024), Some(75));
    assert_eq!(p.lifespan(), "1920-1995");
  }

  #[test]
  fn json_uses_camel_case_and_explicit_nulls() {
    let p = NewPerson::new("Maria", Gender::Female)
      .into_person(PersonId::Int(1), true);
    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v["isMainLineage"], true);
    assert!(v["parentId"].is_null());
    assert!(v["photoURL"].is_null());
    assert!(v.get("siblingOrder").is_some());
  }

  #[test]
  fn missing_optional_fields_deserialize_as_none() {
    let p: Person =
      serde_json::from_str(r#"{"id": 3, "name": "John", "gender": "male"}"#)
        .unwrap();
    assert_eq!(p.parent_id, None);
    assert_eq!(p.birth_year, None);
    assert!(!p.is_main_lineage);
  }

  #[test]
  fn stored_records_require_a_gender_but_drafts_default_to_female() {
    let stored = serde_json::from_str::<Person>(r#"{"id": 3, "name": "John"}"#);
    assert!(stored.is_err());

    let draft: NewPerson = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
    assert_eq!(draft.gender, Gender::Female);
  }
}
