//! The matrilineal "main lineage" flag.
//!
//! The rule is local: it looks at a person's own gender and at their
//! immediate parent's gender, never further up. A granddaughter of a
//! main-lineage woman through a son is *not* main lineage, while the daughter
//! of any woman is, whatever the grandmother's flag.

use std::collections::HashMap;

use crate::person::{Gender, Person, PersonId};

/// The one-hop rule for a person of `gender` linked to `parent_id`, whose
/// parent resolves to `parent`.
///
/// - no parent link: main lineage iff female;
/// - with a parent link: main lineage iff both parent and child are female.
///   A link that does not resolve has no female parent, so it is never main
///   lineage.
pub fn main_lineage_rule(
  gender: Gender,
  parent_id: Option<&PersonId>,
  parent: Option<&Person>,
) -> bool {
  rule(gender, parent_id.map(|_| parent.map(|p| p.gender)))
}

/// `parent` is `None` without a link and `Some(None)` for a dangling one.
fn rule(gender: Gender, parent: Option<Option<Gender>>) -> bool {
  match parent {
    None => gender == Gender::Female,
    Some(parent) => parent == Some(Gender::Female) && gender == Gender::Female,
  }
}

/// Compute `is_main_lineage` for `person`.
///
/// A `parent_id` that `resolve_parent` cannot resolve still counts as a
/// parent link, one without a female parent. The hierarchy places such a
/// record as a root, but it is not main lineage unless it has no link at all.
pub fn compute_is_main_lineage<'a, F>(person: &Person, resolve_parent: F) -> bool
where
  F: Fn(&PersonId) -> Option<&'a Person>,
{
  let parent = person.parent_id.as_ref().and_then(resolve_parent);
  main_lineage_rule(person.gender, person.parent_id.as_ref(), parent)
}

/// Recompute every flag in `records` against the snapshot itself.
/// Returns the number of records whose flag changed.
pub fn refresh_lineage(records: &mut [Person]) -> usize {
  // Reversed so the first record wins on a duplicate id.
  let genders: HashMap<PersonId, Gender> = records
    .iter()
    .rev()
    .map(|p| (p.id.clone(), p.gender))
    .collect();

  let mut changed = 0;
  for person in records.iter_mut() {
    let parent = person
      .parent_id
      .as_ref()
      .map(|pid| genders.get(pid).copied());
    let flag = rule(person.gender, parent);
    if person.is_main_lineage != flag {
      person.is_main_lineage = flag;
      changed += 1;
    }
  }
  changed
}
