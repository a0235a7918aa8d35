//! A small three-generation family, used to seed empty stores and in tests.

use crate::person::{Gender, Person, PersonId};

struct Row {
  id:       i64,
  name:     &'static str,
  born:     i32,
  died:     Option<i32>,
  location: &'static str,
  gender:   Gender,
  parent:   Option<i64>,
  main:     bool,
  spouse:   Option<&'static str>,
}

const ROWS: [Row; 6] = [
  Row { id: 1, name: "Maria Salian", born: 1920, died: Some(1995), location: "Mumbai", gender: Gender::Female, parent: None, main: true, spouse: Some("Joseph D'Souza") },
  Row { id: 2, name: "Anna Salian", born: 1945, died: None, location: "Bangalore", gender: Gender::Female, parent: Some(1), main: true, spouse: Some("Robert Fernandes") },
  Row { id: 3, name: "John Salian", born: 1948, died: None, location: "Mumbai", gender: Gender::Male, parent: Some(1), main: false, spouse: Some("Mary Pereira") },
  Row { id: 4, name: "Catherine Salian", born: 1970, died: None, location: "Goa", gender: Gender::Female, parent: Some(2), main: true, spouse: Some("David Costa") },
  Row { id: 5, name: "Michael Salian", born: 1972, died: None, location: "Bangalore", gender: Gender::Male, parent: Some(2), main: false, spouse: Some("Lisa Rodrigues") },
  Row { id: 6, name: "Elena Salian", born: 1995, died: None, location: "Bangalore", gender: Gender::Female, parent: Some(4), main: true, spouse: None },
];

/// The sample family, lineage flags already consistent.
pub fn sample_family() -> Vec<Person> {
  ROWS
    .iter()
    .map(|row| Person {
      id:              PersonId::Int(row.id),
      name:            row.name.to_owned(),
      nickname:        None,
      birth_year:      Some(row.born),
      death_year:      row.died,
      location:        Some(row.location.to_owned()),
      gender:          row.gender,
      parent_id:       row.parent.map(PersonId::Int),
      is_main_lineage: row.main,
      spouse:          row.spouse.map(str::to_owned),
      sibling_order:   None,
      photo_url:       None,
    })
    .collect()
}
