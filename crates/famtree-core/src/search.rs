//! Structure-preserving search.
//!
//! A search keeps every direct match plus all of its ancestors and
//! descendants, so the filtered record still builds into a connected tree.

use std::collections::{HashMap, HashSet};

use crate::person::{Person, PersonId};

/// Whether `person` matches an already-lowercased `needle` by name or
/// location.
fn matches(person: &Person, needle: &str) -> bool {
  person.name.to_lowercase().contains(needle)
    || person
      .location
      .as_deref()
      .is_some_and(|loc| loc.to_lowercase().contains(needle))
}

/// Filter `records` by `term`.
///
/// A blank term returns the records unchanged. Otherwise the result holds
/// every record whose name or location contains the term as given
/// (case-insensitively, surrounding whitespace included), every ancestor of such a record up to the first
/// missing parent, and every descendant. Input order is preserved.
pub fn search_family_data(records: &[Person], term: &str) -> Vec<Person> {
  if term.trim().is_empty() {
    return records.to_vec();
  }
  let needle = term.to_lowercase();

  let mut by_id: HashMap<&PersonId, &Person> = HashMap::with_capacity(records.len());
  let mut children: HashMap<&PersonId, Vec<&PersonId>> = HashMap::new();
  for person in records {
    by_id.entry(&person.id).or_insert(person);
    if let Some(parent) = &person.parent_id {
      children.entry(parent).or_default().push(&person.id);
    }
  }

  let mut included: HashSet<&PersonId> = HashSet::new();
  // Walks up and down are tracked apart: a node first reached as someone's
  // ancestor still needs its own descendants expanded later.
  let mut ascended: HashSet<&PersonId> = HashSet::new();
  let mut descended: HashSet<&PersonId> = HashSet::new();

  for hit in records.iter().filter(|p| matches(p, &needle)) {
    included.insert(&hit.id);

    let mut cursor = &hit.id;
    while ascended.insert(cursor) {
      let parent = by_id
        .get(cursor)
        .copied()
        .and_then(|p| p.parent_id.as_ref())
        .filter(|pid| by_id.contains_key(pid));
      let Some(parent) = parent else { break };
      included.insert(parent);
      cursor = parent;
    }

    let mut stack = vec![&hit.id];
    while let Some(current) = stack.pop() {
      if !descended.insert(current) {
        continue;
      }
      included.insert(current);
      if let Some(kids) = children.get(current) {
        stack.extend(kids.iter().copied());
      }
    }
  }

  records
    .iter()
    .filter(|p| included.contains(&p.id))
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    hierarchy::build_hierarchy,
    person::{Gender, NewPerson},
    sample::sample_family,
  };

  fn person(id: i64, name: &str, parent: Option<i64>) -> Person {
    let mut draft = NewPerson::new(name, Gender::Female);
    draft.parent_id = parent.map(PersonId::Int);
    draft.into_person(PersonId::Int(id), false)
  }

  fn names(records: &[Person]) -> Vec<&str> {
    records.iter().map(|p| p.name.as_str()).collect()
  }

  #[test]
  fn blank_term_is_identity() {
    let records = sample_family();
    assert_eq!(search_family_data(&records, ""), records);
    assert_eq!(search_family_data(&records, "   \t"), records);
  }

  #[test]
  fn match_pulls_in_its_ancestors() {
    let records = vec![
      person(1, "Alpha", None),
      person(2, "Beta", Some(1)),
      person(3, "Gamma", Some(2)),
    ];

    let found = search_family_data(&records, "gamma");

    assert_eq!(names(&found), ["Alpha", "Beta", "Gamma"]);
  }

  #[test]
  fn match_pulls_in_descendants_but_not_siblings() {
    let records = vec![
      person(1, "Root", None),
      person(2, "Target", Some(1)),
      person(3, "Sibling", Some(1)),
      person(4, "Grandchild", Some(2)),
      person(5, "Great-grandchild", Some(4)),
    ];

    let found = search_family_data(&records, "target");

    assert_eq!(
      names(&found),
      ["Root", "Target", "Grandchild", "Great-grandchild"]
    );
  }

  #[test]
  fn matches_location_case_insensitively() {
    let records = sample_family();

    let found = search_family_data(&records, "GOA");

    // Catherine lives in Goa: her mother, grandmother and daughter come along.
    assert_eq!(
      names(&found),
      ["Maria Salian", "Anna Salian", "Catherine Salian", "Elena Salian"]
    );
  }

  #[test]
  fn whitespace_around_the_term_is_part_of_the_match() {
    let records = vec![person(1, "Maria", None), person(2, "Anna Maria", None)];

    assert_eq!(names(&search_family_data(&records, " maria")), ["Anna Maria"]);
    assert!(search_family_data(&records, "maria ").is_empty());
  }

  #[test]
  fn ancestor_of_one_match_still_expands_for_another() {
    // "Hit" matches first and walks up through Mid. "Top hit" matches later;
    // its descendant walk must still reach Mid's other child.
    let records = vec![
      person(2, "Hit", Some(3)),
      person(1, "Top hit", None),
      person(3, "Mid", Some(1)),
      person(4, "Other child", Some(3)),
    ];

    let found = search_family_data(&records, "hit");

    assert_eq!(found.len(), 4);
  }

  #[test]
  fn dangling_parent_stops_the_walk() {
    let records = vec![person(1, "Orphan", Some(77)), person(2, "Unrelated", None)];

    let found = search_family_data(&records, "orphan");

    assert_eq!(names(&found), ["Orphan"]);
  }

  #[test]
  fn no_match_yields_empty_result() {
    assert!(search_family_data(&sample_family(), "zzz").is_empty());
  }

  #[test]
  fn filtered_record_builds_a_single_connected_tree() {
    let records = sample_family();

    let found = search_family_data(&records, "elena");
    let tree = build_hierarchy(&found).unwrap();

    assert!(!tree.is_virtual());
    assert_eq!(tree.person_count(), found.len());
  }
}
