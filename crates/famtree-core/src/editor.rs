//! The editing layer: every mutation a frontend can make, generic over any
//! [`FamilyStore`].
//!
//! These functions own the rules the pure tree functions take for granted:
//! field validation, parents that exist, no cycles, no deleting people who
//! still have children, and lineage flags that stay in step with genders and
//! parent links.

use serde::Serialize;

use crate::{
  Error, Result,
  exchange::{ImportReport, export_json, import_json},
  hierarchy::{TreeNode, build_hierarchy_labeled},
  lineage::main_lineage_rule,
  person::{NewPerson, Person, PersonId, children_of, find, parent_of},
  search::search_family_data,
  store::FamilyStore,
};

/// A person together with their resolved relatives.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
  pub person:   Person,
  pub parent:   Option<Person>,
  pub children: Vec<Person>,
}

/// Both halves of a successful [`add_parent`].
#[derive(Debug, Clone, Serialize)]
pub struct ParentInsertion {
  pub parent: Person,
  pub child:  Person,
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// Load the full record.
pub async fn snapshot<S: FamilyStore>(store: &S) -> Result<Vec<Person>> {
  store.list_people().await.map_err(Error::store)
}

pub async fn get_person<S: FamilyStore>(store: &S, id: PersonId) -> Result<Person> {
  store
    .get_person(id.clone())
    .await
    .map_err(Error::store)?
    .ok_or(Error::PersonNotFound(id))
}

pub async fn profile<S: FamilyStore>(store: &S, id: PersonId) -> Result<Profile> {
  let records = snapshot(store).await?;
  let person = find(&records, &id)
    .ok_or_else(|| Error::PersonNotFound(id.clone()))?;
  Ok(Profile {
    person:   person.clone(),
    parent:   parent_of(&records, person).cloned(),
    children: children_of(&records, &id).cloned().collect(),
  })
}

/// Snapshot, optional search filter, hierarchy.
pub async fn load_tree<S: FamilyStore>(
  store: &S,
  term: Option<&str>,
  label: &str,
) -> Result<Option<TreeNode>> {
  let records = snapshot(store).await?;
  let visible = match term {
    Some(term) => search_family_data(&records, term),
    None => records,
  };
  Ok(build_hierarchy_labeled(&visible, label))
}

// ─── Creation ────────────────────────────────────────────────────────────────

/// Validate `draft`, check its parent exists and insert it with a computed
/// lineage flag.
pub async fn add_person<S: FamilyStore>(store: &S, draft: NewPerson) -> Result<Person> {
  draft.validate()?;

  let parent = match &draft.parent_id {
    Some(pid) => Some(
      store
        .get_person(pid.clone())
        .await
        .map_err(Error::store)?
        .ok_or_else(|| Error::ParentNotFound(pid.clone()))?,
    ),
    None => None,
  };

  let is_main_lineage =
    main_lineage_rule(draft.gender, draft.parent_id.as_ref(), parent.as_ref());
  store
    .insert_person(draft, is_main_lineage)
    .await
    .map_err(Error::store)
}

pub async fn add_child<S: FamilyStore>(
  store: &S,
  parent_id: PersonId,
  draft: NewPerson,
) -> Result<Person> {
  add_person(store, draft.with_parent(parent_id)).await
}

/// Insert a new root person and make them the parent of `child_id`.
///
/// Two writes: the parent is created, then the child is re-linked with its
/// lineage flag recomputed against the new parent. If the second write
/// fails the parent stays in the store and [`Error::ParentLinkFailed`]
/// reports both halves.
pub async fn add_parent<S: FamilyStore>(
  store: &S,
  child_id: PersonId,
  mut draft: NewPerson,
) -> Result<ParentInsertion> {
  let records = snapshot(store).await?;
  let child = find(&records, &child_id)
    .ok_or_else(|| Error::PersonNotFound(child_id.clone()))?;
  if parent_of(&records, child).is_some() {
    return Err(Error::ParentAlreadySet(child_id));
  }

  draft.parent_id = None;
  draft.validate()?;
  let parent_is_main = main_lineage_rule(draft.gender, None, None);
  let parent = store
    .insert_person(draft, parent_is_main)
    .await
    .map_err(Error::store)?;

  let mut linked = child.clone();
  linked.parent_id = Some(parent.id.clone());
  linked.is_main_lineage = main_lineage_rule(linked.gender, Some(&parent.id), Some(&parent));

  match store.update_person(linked).await {
    Ok(child) => Ok(ParentInsertion { parent, child }),
    Err(e) => Err(Error::ParentLinkFailed {
      parent: Box::new(parent),
      child_id,
      source: Box::new(e),
    }),
  }
}

// ─── Edit ────────────────────────────────────────────────────────────────────

/// Whether making `parent` the parent of `id` would close a loop.
fn creates_cycle(records: &[Person], id: &PersonId, parent: &PersonId) -> bool {
  let mut cursor = Some(parent);
  // Bounded so a pre-existing cycle elsewhere cannot spin forever.
  for _ in 0..=records.len() {
    match cursor {
      Some(current) if current == id => return true,
      Some(current) => cursor = find(records, current).and_then(|p| p.parent_id.as_ref()),
      None => return false,
    }
  }
  false
}

/// Replace a person's fields.
///
/// A changed `parent_id` must resolve and must not make the person their own
/// ancestor; an unchanged dangling one is tolerated. The person's flag is
/// recomputed, and a gender change refreshes every direct child's flag. If a
/// child write fails after the person was saved, the remaining children are
/// still tried and [`Error::ChildLineageStale`] names the ones left stale.
pub async fn update_person<S: FamilyStore>(store: &S, person: Person) -> Result<Person> {
  person.validate()?;

  let records = snapshot(store).await?;
  let previous = find(&records, &person.id)
    .ok_or_else(|| Error::PersonNotFound(person.id.clone()))?;

  let parent = match &person.parent_id {
    None => None,
    Some(pid) => {
      let changed = previous.parent_id.as_ref() != Some(pid);
      if changed && creates_cycle(&records, &person.id, pid) {
        return Err(Error::ParentCycle {
          id:     person.id.clone(),
          parent: pid.clone(),
        });
      }
      let found = find(&records, pid);
      if changed && found.is_none() {
        return Err(Error::ParentNotFound(pid.clone()));
      }
      found
    }
  };

  let gender_changed = previous.gender != person.gender;
  let mut updated = person;
  updated.is_main_lineage = main_lineage_rule(updated.gender, updated.parent_id.as_ref(), parent);

  let saved = store.update_person(updated).await.map_err(Error::store)?;

  if !gender_changed {
    return Ok(saved);
  }

  let mut stale = Vec::new();
  let mut first_error = None;
  for child in children_of(&records, &saved.id) {
    let flag = main_lineage_rule(child.gender, Some(&saved.id), Some(&saved));
    if flag == child.is_main_lineage {
      continue;
    }
    let mut child = child.clone();
    child.is_main_lineage = flag;
    let name = child.name.clone();
    if let Err(e) = store.update_person(child).await {
      stale.push(name);
      first_error.get_or_insert(e);
    }
  }

  match first_error {
    None => Ok(saved),
    Some(e) => Err(Error::ChildLineageStale {
      person:   Box::new(saved),
      children: stale,
      source:   Box::new(e),
    }),
  }
}

/// Assign `sibling_order` 0, 1, 2, ... following `ordered`. Every id must
/// share the same parent (or all be roots).
pub async fn reorder_siblings<S: FamilyStore>(
  store: &S,
  ordered: &[PersonId],
) -> Result<Vec<Person>> {
  let records = snapshot(store).await?;

  let mut siblings = Vec::with_capacity(ordered.len());
  for id in ordered {
    let person = find(&records, id).ok_or_else(|| Error::PersonNotFound(id.clone()))?;
    siblings.push(person.clone());
  }

  let Some(first) = siblings.first() else {
    return Ok(Vec::new());
  };
  let parent = first.parent_id.clone();
  if let Some(stray) = siblings.iter().find(|p| p.parent_id != parent) {
    return Err(Error::NotSiblings(stray.id.clone()));
  }

  let mut saved = Vec::with_capacity(siblings.len());
  for (position, mut person) in siblings.into_iter().enumerate() {
    person.sibling_order = Some(i32::try_from(position).unwrap_or(i32::MAX));
    saved.push(store.update_person(person).await.map_err(Error::store)?);
  }
  Ok(saved)
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// Delete a person who has no children.
pub async fn delete_person<S: FamilyStore>(store: &S, id: PersonId) -> Result<()> {
  let records = snapshot(store).await?;
  let person = find(&records, &id).ok_or_else(|| Error::PersonNotFound(id.clone()))?;

  let children: Vec<String> = children_of(&records, &id).map(|c| c.name.clone()).collect();
  if !children.is_empty() {
    return Err(Error::HasChildren {
      id,
      name: person.name.clone(),
      children,
    });
  }

  store.delete_person(id).await.map_err(Error::store)
}

// ─── Import / export ─────────────────────────────────────────────────────────

pub async fn export_people<S: FamilyStore>(store: &S) -> Result<String> {
  export_json(&snapshot(store).await?)
}

/// Parse `text` and replace the whole record with the accepted people.
pub async fn import_people<S: FamilyStore>(store: &S, text: &str) -> Result<ImportReport> {
  let report = import_json(text)?;
  store
    .replace_all(report.people.clone())
    .await
    .map_err(Error::store)?;
  Ok(report)
}
