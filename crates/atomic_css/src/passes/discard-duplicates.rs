use std::collections::HashSet;

use crate::error::CompileResult;
use crate::pipeline::{Pass, PassContext};
use crate::rule_tree::Node;

/// Values that mean "no value" when interpolated from JavaScript.
const EMPTY_VALUES: &[&str] = &["", "undefined", "null"];

/// Removes root-level declarations that are overridden by a later declaration
/// of the same property, and declarations without a usable value.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardDuplicates;

impl Pass for DiscardDuplicates {
  fn name(&self) -> &'static str {
    "discard-duplicates"
  }

  fn run(&self, nodes: &mut Vec<Node>, _ctx: &mut PassContext<'_>) -> CompileResult<()> {
    discard_duplicates(nodes);
    Ok(())
  }
}

fn discard_duplicates(nodes: &mut Vec<Node>) {
  let mut seen = HashSet::new();
  let mut keep = vec![true; nodes.len()];

  for (index, node) in nodes.iter().enumerate().rev() {
    if let Node::Declaration(declaration) = node {
      if EMPTY_VALUES.contains(&declaration.value.trim()) || !seen.insert(declaration.property.clone()) {
        tracing::trace!(property = %declaration.property, "discarding declaration");
        keep[index] = false;
      }
    }
  }

  let mut keep = keep.into_iter();
  nodes.retain(|_| keep.next().unwrap_or(true));
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn keeps_the_last_declaration_of_a_property() {
    let mut nodes = vec![
      Node::declaration("color", "red"),
      Node::declaration("font-size", "12px"),
      Node::declaration("color", "blue"),
    ];
    discard_duplicates(&mut nodes);

    assert_eq!(
      nodes,
      vec![
        Node::declaration("font-size", "12px"),
        Node::declaration("color", "blue"),
      ]
    );
  }

  #[test]
  fn drops_empty_values() {
    let mut nodes = vec![
      Node::declaration("color", "undefined"),
      Node::declaration("margin", "null"),
      Node::declaration("padding", ""),
      Node::declaration("display", "block"),
    ];
    discard_duplicates(&mut nodes);

    assert_eq!(nodes, vec![Node::declaration("display", "block")]);
  }

  #[test]
  fn leaves_nested_rules_alone() {
    let mut nodes = vec![
      Node::rule("&:hover", vec![Node::declaration("color", "red"), Node::declaration("color", "blue")]),
      Node::declaration("color", "blue"),
    ];
    let expected = nodes.clone();
    discard_duplicates(&mut nodes);

    assert_eq!(nodes, expected);
  }
}
