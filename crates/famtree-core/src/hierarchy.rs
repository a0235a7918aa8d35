//! Hierarchy construction: a flat parent-pointer list becomes one rooted tree.
//!
//! Records whose `parent_id` is absent or does not resolve are roots. Several
//! roots are wrapped in a [`VirtualRoot`] that renderers must not draw.
//! Children are ordered by [`compare_siblings`] at every level; roots keep
//! the order in which they appear in the input.

use std::{cmp::Ordering, collections::HashMap};

use serde::Serialize;

use crate::person::{Person, PersonId};

/// Id carried by the synthetic root in serialised trees.
pub const VIRTUAL_ROOT_ID: &str = "virtual-root";

/// Label used for the synthetic root when the caller does not supply one.
pub const DEFAULT_FAMILY_LABEL: &str = "Family";

// ─── Tree types ──────────────────────────────────────────────────────────────

/// Marker node introduced only when the record has more than one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualRoot {
  pub id:         &'static str,
  pub name:       String,
  pub is_virtual: bool,
}

impl VirtualRoot {
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      id:         VIRTUAL_ROOT_ID,
      name:       label.into(),
      is_virtual: true,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NodeEntry {
  Person(Person),
  Virtual(VirtualRoot),
}

/// A copy of a person (or the virtual root) plus its ordered children.
///
/// Serialises flat: the person's fields with a `children` array alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
  #[serde(flatten)]
  pub entry:    NodeEntry,
  pub children: Vec<TreeNode>,
}

impl TreeNode {
  pub fn is_virtual(&self) -> bool { matches!(self.entry, NodeEntry::Virtual(_)) }

  pub fn person(&self) -> Option<&Person> {
    match &self.entry {
      NodeEntry::Person(p) => Some(p),
      NodeEntry::Virtual(_) => None,
    }
  }

  /// Number of person nodes in this subtree.
  pub fn person_count(&self) -> usize {
    let own = usize::from(!self.is_virtual());
    own + self.children.iter().map(TreeNode::person_count).sum::<usize>()
  }

  /// Pre-order walk yielding `(depth, person)`. The virtual root is skipped
  /// and its children are reported at depth 0.
  pub fn depth_first(&self) -> Vec<(usize, &Person)> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &TreeNode)> = Vec::new();
    if self.is_virtual() {
      stack.extend(self.children.iter().rev().map(|c| (0, c)));
    } else {
      stack.push((0, self));
    }
    while let Some((depth, node)) = stack.pop() {
      if let Some(p) = node.person() {
        out.push((depth, p));
      }
      stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
    }
    out
  }
}

// ─── Sibling ordering ────────────────────────────────────────────────────────

/// Pairwise sibling comparison:
///
/// 1. both have `sibling_order`: ascending by it;
/// 2. else both have `birth_year`: ascending by it;
/// 3. else a known birth year sorts before an unknown one;
/// 4. else equal (input order is kept).
pub fn compare_siblings(a: &Person, b: &Person) -> Ordering {
  if let (Some(x), Some(y)) = (a.sibling_order, b.sibling_order) {
    return x.cmp(&y);
  }
  match (a.birth_year, b.birth_year) {
    (Some(x), Some(y)) => x.cmp(&y),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// Stable insertion sort.
///
/// [`compare_siblings`] is not transitive once `sibling_order` is set on only
/// some siblings, and `slice::sort_by` may panic on such comparators.
fn sort_stable_by<T>(items: &mut [T], mut cmp: impl FnMut(&T, &T) -> Ordering) {
  for i in 1..items.len() {
    let mut j = i;
    while j > 0 && cmp(&items[j - 1], &items[j]) == Ordering::Greater {
      items.swap(j - 1, j);
      j -= 1;
    }
  }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Build the tree for `records`, labelling a synthetic root
/// [`DEFAULT_FAMILY_LABEL`]. Returns `None` for empty input.
pub fn build_hierarchy(records: &[Person]) -> Option<TreeNode> {
  build_hierarchy_labeled(records, DEFAULT_FAMILY_LABEL)
}

/// Build the tree for `records`, labelling a synthetic root `label`.
///
/// Never fails on data: dangling parent ids and self-parented records become
/// roots. Records caught in a longer parent cycle are unreachable from any
/// root and are left out.
pub fn build_hierarchy_labeled(records: &[Person], label: &str) -> Option<TreeNode> {
  let mut index: HashMap<&PersonId, usize> = HashMap::with_capacity(records.len());
  for (i, person) in records.iter().enumerate() {
    index.entry(&person.id).or_insert(i);
  }

  let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
  let mut roots = Vec::new();
  for (i, person) in records.iter().enumerate() {
    match person.parent_id.as_ref().and_then(|pid| index.get(pid)) {
      Some(&parent) if parent != i => children[parent].push(i),
      _ => roots.push(i),
    }
  }

  for siblings in &mut children {
    sort_stable_by(siblings, |a, b| compare_siblings(&records[*a], &records[*b]));
  }

  let mut nodes: Vec<TreeNode> = roots
    .into_iter()
    .map(|root| assemble(records, &children, root))
    .collect();

  match nodes.len() {
    0 => None,
    1 => nodes.pop(),
    _ => Some(TreeNode {
      entry:    NodeEntry::Virtual(VirtualRoot::new(label)),
      children: nodes,
    }),
  }
}

fn assemble(records: &[Person], children: &[Vec<usize>], at: usize) -> TreeNode {
  TreeNode {
    entry:    NodeEntry::Person(records[at].clone()),
    children: children[at]
      .iter()
      .map(|&child| assemble(records, children, child))
      .collect(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::{Gender, NewPerson};

  fn person(id: i64, name: &str, parent: Option<i64>) -> Person {
    let mut draft = NewPerson::new(name, Gender::Female);
    draft.parent_id = parent.map(PersonId::Int);
    draft.into_person(PersonId::Int(id), false)
  }

  fn child_names(node: &TreeNode) -> Vec<&str> {
    node
      .children
      .iter()
      .map(|c| c.person().unwrap().name.as_str())
      .collect()
  }

  #[test]
  fn empty_input_has_no_tree() {
    assert!(build_hierarchy(&[]).is_none());
  }

  #[test]
  fn single_root_is_returned_directly() {
    let records = vec![
      person(1, "Maria", None),
      person(2, "Anna", Some(1)),
      person(3, "John", Some(1)),
    ];

    let tree = build_hierarchy(&records).unwrap();

    assert!(!tree.is_virtual());
    assert_eq!(tree.person().unwrap().name, "Maria");
    assert_eq!(child_names(&tree), ["Anna", "John"]);
    assert_eq!(tree.person_count(), 3);
  }

  #[test]
  fn multiple_roots_are_wrapped_in_discovery_order() {
    let records = vec![
      person(10, "Zoe", None),
      person(11, "Child of Zoe", Some(10)),
      person(5, "Adam", None),
      person(7, "Beth", None),
    ];

    let tree = build_hierarchy_labeled(&records, "Salian Family").unwrap();

    assert!(tree.is_virtual());
    assert_eq!(child_names(&tree), ["Zoe", "Adam", "Beth"]);
    match &tree.entry {
      NodeEntry::Virtual(v) => assert_eq!(v.name, "Salian Family"),
      NodeEntry::Person(_) => panic!("expected a virtual root"),
    }
  }

  #[test]
  fn sibling_order_wins() {
    let mut records = vec![person(1, "Root", None)];
    for (id, order) in [(2, 2), (3, 0), (4, 1)] {
      let mut p = person(id, &format!("order {order}"), Some(1));
      p.sibling_order = Some(order);
      p.birth_year = Some(2000 - order);
      records.push(p);
    }

    let tree = build_hierarchy(&records).unwrap();

    assert_eq!(child_names(&tree), ["order 0", "order 1", "order 2"]);
  }

  #[test]
  fn birth_year_orders_siblings_and_unknown_years_go_last() {
    let mut records = vec![person(1, "Root", None)];
    let mut a = person(2, "born 1980", Some(1));
    a.birth_year = Some(1980);
    let c = person(3, "unknown", Some(1));
    let mut b = person(4, "born 1975", Some(1));
    b.birth_year = Some(1975);
    records.extend([a, c, b]);

    let tree = build_hierarchy(&records).unwrap();

    assert_eq!(child_names(&tree), ["born 1975", "born 1980", "unknown"]);
  }

  #[test]
  fn ties_keep_input_order() {
    let records = vec![
      person(1, "Root", None),
      person(2, "first", Some(1)),
      person(3, "second", Some(1)),
      person(4, "third", Some(1)),
    ];
    let tree = build_hierarchy(&records).unwrap();
    assert_eq!(child_names(&tree), ["first", "second", "third"]);
  }

  #[test]
  fn ordering_applies_below_the_top_level() {
    let mut records = vec![person(1, "Root", None), person(2, "Mid", Some(1))];
    let mut late = person(3, "late", Some(2));
    late.birth_year = Some(1990);
    let mut early = person(4, "early", Some(2));
    early.birth_year = Some(1960);
    records.extend([late, early]);

    let tree = build_hierarchy(&records).unwrap();

    assert_eq!(child_names(&tree.children[0]), ["early", "late"]);
  }

  #[test]
  fn mixed_keys_do_not_panic() {
    let mut records = vec![person(1, "Root", None)];
    let mut a = person(2, "a", Some(1));
    a.sibling_order = Some(1);
    let mut b = person(3, "b", Some(1));
    b.birth_year = Some(1980);
    let mut c = person(4, "c", Some(1));
    c.sibling_order = Some(0);
    c.birth_year = Some(2000);
    records.extend([a, b, c]);

    let first = build_hierarchy(&records).unwrap();
    let second = build_hierarchy(&records).unwrap();

    assert_eq!(first.person_count(), 4);
    assert_eq!(first, second);
  }

  #[test]
  fn dangling_parent_becomes_an_extra_root() {
    let records = vec![person(1, "Maria", None), person(2, "Lost", Some(404))];

    let tree = build_hierarchy(&records).unwrap();

    assert!(tree.is_virtual());
    assert_eq!(child_names(&tree), ["Maria", "Lost"]);
  }

  #[test]
  fn self_parent_becomes_a_root_and_cycles_terminate() {
    let records = vec![
      person(1, "Root", None),
      person(2, "Selfie", Some(2)),
      person(3, "Loop A", Some(4)),
      person(4, "Loop B", Some(3)),
    ];

    let tree = build_hierarchy(&records).unwrap();

    assert_eq!(child_names(&tree), ["Root", "Selfie"]);
    assert_eq!(tree.person_count(), 2);
  }

  #[test]
  fn input_is_not_mutated_and_output_is_repeatable() {
    let records = crate::sample::sample_family();
    let before = records.clone();

    let first = build_hierarchy(&records);
    let second = build_hierarchy(&records);

    assert_eq!(records, before);
    assert_eq!(first, second);
  }

  #[test]
  fn depth_first_skips_the_virtual_root() {
    let records = vec![
      person(1, "A", None),
      person(2, "A1", Some(1)),
      person(3, "B", None),
    ];
    let tree = build_hierarchy(&records).unwrap();

    let walk: Vec<(usize, &str)> = tree
      .depth_first()
      .into_iter()
      .map(|(d, p)| (d, p.name.as_str()))
      .collect();

    assert_eq!(walk, [(0, "A"), (1, "A1"), (0, "B")]);
  }

  #[test]
  fn virtual_root_serialises_as_marker() {
    let records = vec![person(1, "A", None), person(2, "B", None)];
    let tree = build_hierarchy(&records).unwrap();

    let v = serde_json::to_value(&tree).unwrap();

    assert_eq!(v["id"], VIRTUAL_ROOT_ID);
    assert_eq!(v["isVirtual"], true);
    assert_eq!(v["name"], DEFAULT_FAMILY_LABEL);
    assert_eq!(v["children"][0]["name"], "A");
    assert_eq!(v["children"][0]["children"], serde_json::json!([]));
  }
}
