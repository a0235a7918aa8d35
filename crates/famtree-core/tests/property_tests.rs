//! Property tests for the pure tree functions.

use std::collections::HashSet;

use famtree_core::{
  Gender, NewPerson, Person, PersonId, TreeNode, build_hierarchy, search_family_data,
};
use proptest::prelude::*;

/// A random forest: record `i` may point at any earlier record, at nothing,
/// or at an id that does not exist.
fn forest() -> impl Strategy<Value = Vec<Person>> {
  prop::collection::vec(
    (
      any::<prop::sample::Index>(),
      0u8..10,
      prop::option::of(1900i32..2020),
      prop::option::of(0i32..4),
      any::<bool>(),
      prop::sample::select(vec!["ann", "bob", "cara", "dev", "eli"]),
    ),
    1..40,
  )
  .prop_map(|rows| {
    rows
      .into_iter()
      .enumerate()
      .map(|(i, (pick, kind, born, order, female, stem))| {
        let gender = if female { Gender::Female } else { Gender::Male };
        let mut draft = NewPerson::new(format!("{stem}{i}"), gender);
        draft.parent_id = match kind {
          0..=1 => None,
          2 => Some(PersonId::Int(10_000 + i as i64)),
          _ if i == 0 => None,
          _ => Some(PersonId::Int(pick.index(i) as i64)),
        };
        draft.birth_year = born;
        draft.sibling_order = order;
        draft.into_person(PersonId::Int(i as i64), false)
      })
      .collect()
  })
}

fn visible_ids(tree: &TreeNode) -> Vec<PersonId> {
  tree.depth_first().into_iter().map(|(_, p)| p.id.clone()).collect()
}

proptest! {
  /// Same input, same tree, same order at every level.
  #[test]
  fn hierarchy_is_deterministic(records in forest()) {
    prop_assert_eq!(build_hierarchy(&records), build_hierarchy(&records));
  }

  /// Every record of an acyclic forest appears exactly once.
  #[test]
  fn hierarchy_keeps_every_record(records in forest()) {
    let tree = build_hierarchy(&records).expect("non-empty input");
    let ids = visible_ids(&tree);
    let unique: HashSet<&PersonId> = ids.iter().collect();
    prop_assert_eq!(ids.len(), records.len());
    prop_assert_eq!(unique.len(), records.len());
  }

  /// A filtered record never shows a node whose real parent was filtered out.
  #[test]
  fn search_never_orphans_a_node(records in forest(), stem in prop::sample::select(vec!["ann", "bob", "eli", "1", "2"])) {
    let all: HashSet<&PersonId> = records.iter().map(|p| &p.id).collect();
    let found = search_family_data(&records, stem);
    let kept: HashSet<&PersonId> = found.iter().map(|p| &p.id).collect();

    for person in &found {
      if let Some(parent) = &person.parent_id
        && all.contains(parent)
      {
        prop_assert!(kept.contains(parent), "{} kept without parent {}", person.id, parent);
      }
    }
  }

  /// Search results keep the input's relative order.
  #[test]
  fn search_preserves_order(records in forest()) {
    let found = search_family_data(&records, "a");
    let positions: Vec<usize> = found
      .iter()
      .map(|f| records.iter().position(|p| p.id == f.id).expect("subset"))
      .collect();
    prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
  }
}
