//! Plain-text rendering of trees and people.

use std::fmt::Write as _;

use famtree_core::{Person, TreeNode, editor::Profile};

/// One-line summary: name, gender symbol, lifespan and age, location, and a
/// `*` for main lineage.
pub fn person_line(person: &Person, current_year: i32) -> String {
  let mut line = format!("{} {}", person.name, person.gender.symbol());
  if let Some(nick) = &person.nickname {
    write!(line, " \"{nick}\"").ok();
  }
  if person.birth_year.is_some() || person.is_deceased() {
    write!(line, " ({}", person.lifespan()).ok();
    if let Some(age) = person.age(current_year) {
      write!(line, ", {age}").ok();
    }
    line.push(')');
  }
  if person.is_deceased() {
    line.push_str(" †");
  }
  if let Some(loc) = &person.location {
    write!(line, " · {loc}").ok();
  }
  if person.is_main_lineage {
    line.push_str(" *");
  }
  line
}

/// Draw `tree` with box-drawing connectors. The virtual root is not drawn;
/// its children are printed as separate top-level trees.
pub fn render_tree(tree: &TreeNode, current_year: i32) -> String {
  let mut out = String::new();
  if tree.is_virtual() {
    for child in &tree.children {
      draw(&mut out, child, "", None, current_year);
    }
  } else {
    draw(&mut out, tree, "", None, current_year);
  }
  out
}

/// `last` is `None` for a top-level node, otherwise whether this node is the
/// last of its siblings.
fn draw(out: &mut String, node: &TreeNode, indent: &str, last: Option<bool>, year: i32) {
  let Some(person) = node.person() else { return };

  let (branch, carry) = match last {
    None => ("", ""),
    Some(true) => ("└── ", "    "),
    Some(false) => ("├── ", "│   "),
  };
  writeln!(out, "{indent}{branch}{}", person_line(person, year)).ok();

  let next = format!("{indent}{carry}");
  let count = node.children.len();
  for (i, child) in node.children.iter().enumerate() {
    draw(out, child, &next, Some(i + 1 == count), year);
  }
}

/// Multi-line detail view of one person.
pub fn render_profile(profile: &Profile, current_year: i32) -> String {
  let p = &profile.person;
  let mut out = String::new();
  writeln!(out, "{}", person_line(p, current_year)).ok();
  writeln!(out, "  id:       {}", p.id).ok();
  if let Some(spouse) = &p.spouse {
    writeln!(out, "  spouse:   {spouse}").ok();
  }
  if let Some(url) = &p.photo_url {
    writeln!(out, "  photo:    {url}").ok();
  }
  match (&profile.parent, &p.parent_id) {
    (Some(parent), _) => writeln!(out, "  parent:   {} ({})", parent.name, parent.id).ok(),
    (None, Some(missing)) => writeln!(out, "  parent:   {missing} (missing)").ok(),
    (None, None) => None,
  };
  if !profile.children.is_empty() {
    writeln!(out, "  children:").ok();
    for child in &profile.children {
      writeln!(out, "    {} ({})", child.name, child.id).ok();
    }
  }
  out
}
