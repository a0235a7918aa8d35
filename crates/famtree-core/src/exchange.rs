//! JSON import and export.
//!
//! The exchange format is a bare JSON array of [`Person`] objects. Import is
//! lenient per record: a record that cannot be used is skipped with an
//! [`ImportWarning`] instead of failing the whole file. Only a document that
//! is not a JSON array at all is an error.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  lineage::refresh_lineage,
  person::{Person, PersonId},
};

// ─── Warnings ────────────────────────────────────────────────────────────────

/// Why a record was skipped or flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportIssue {
  /// Not a person object (missing `name`, wrong types, ...).
  Malformed { message: String },
  EmptyName,
  InvalidLifespan { birth: i32, death: i32 },
  /// An earlier record already used this id.
  DuplicateId,
  /// Kept, but its parent is not in the file; it will show up as a root.
  DanglingParent { parent_id: PersonId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportWarning {
  /// Position of the record in the imported array.
  pub index: usize,
  pub id:    Option<PersonId>,
  pub issue: ImportIssue,
}

impl ImportWarning {
  /// Whether the record was dropped (as opposed to kept with a caveat).
  pub fn skipped(&self) -> bool {
    !matches!(self.issue, ImportIssue::DanglingParent { .. })
  }
}

impl fmt::Display for ImportWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "record #{}", self.index)?;
    if let Some(id) = &self.id {
      write!(f, " (id {id})")?;
    }
    match &self.issue {
      ImportIssue::Malformed { message } => write!(f, " skipped: {message}"),
      ImportIssue::EmptyName => write!(f, " skipped: name is empty"),
      ImportIssue::InvalidLifespan { birth, death } => write!(
        f,
        " skipped: death year {death} is not after birth year {birth}"
      ),
      ImportIssue::DuplicateId => write!(f, " skipped: duplicate id"),
      ImportIssue::DanglingParent { parent_id } => {
        write!(f, " kept as a root: parent {parent_id} is missing")
      }
    }
  }
}

/// Result of parsing an import file.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
  /// Accepted records, in file order, lineage flags recomputed.
  pub people:   Vec<Person>,
  pub warnings: Vec<ImportWarning>,
}

// ─── Export ──────────────────────────────────────────────────────────────────

/// Pretty-printed JSON array of `records`.
pub fn export_json(records: &[Person]) -> Result<String> {
  Ok(serde_json::to_string_pretty(records)?)
}

// ─── Import ──────────────────────────────────────────────────────────────────

/// Parse and validate an exported family file.
pub fn import_json(text: &str) -> Result<ImportReport> {
  let raw: Vec<serde_json::Value> = serde_json::from_str(text)?;

  let mut seen: HashSet<PersonId> = HashSet::with_capacity(raw.len());
  let mut accepted: Vec<(usize, Person)> = Vec::with_capacity(raw.len());
  let mut warnings = Vec::new();

  for (index, value) in raw.into_iter().enumerate() {
    let id = value
      .get("id")
      .cloned()
      .and_then(|v| serde_json::from_value::<PersonId>(v).ok());

    let person: Person = match serde_json::from_value(value) {
      Ok(p) => p,
      Err(e) => {
        warnings.push(ImportWarning {
          index,
          id,
          issue: ImportIssue::Malformed { message: e.to_string() },
        });
        continue;
      }
    };

    let issue = match person.validate() {
      Ok(()) if !seen.insert(person.id.clone()) => Some(ImportIssue::DuplicateId),
      Ok(()) => None,
      Err(Error::EmptyName) => Some(ImportIssue::EmptyName),
      Err(Error::InvalidLifespan { birth, death }) => {
        Some(ImportIssue::InvalidLifespan { birth, death })
      }
      Err(e) => Some(ImportIssue::Malformed { message: e.to_string() }),
    };

    match issue {
      Some(issue) => warnings.push(ImportWarning { index, id, issue }),
      None => accepted.push((index, person)),
    }
  }

  for (index, person) in &accepted {
    if let Some(parent_id) = &person.parent_id
      && !seen.contains(parent_id)
    {
      warnings.push(ImportWarning {
        index: *index,
        id:    Some(person.id.clone()),
        issue: ImportIssue::DanglingParent { parent_id: parent_id.clone() },
      });
    }
  }
  warnings.sort_by_key(|w| w.index);

  let mut people: Vec<Person> = accepted.into_iter().map(|(_, p)| p).collect();
  refresh_lineage(&mut people);

  Ok(ImportReport { people, warnings })
}
