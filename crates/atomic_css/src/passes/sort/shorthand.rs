use crate::properties::shorthand_sort_weight;
use crate::rule_tree::Node;

fn node_weight(node: &Node) -> u32 {
  node
    .first_declaration()
    .map(|declaration| shorthand_sort_weight(&declaration.property))
    .unwrap_or(u32::MAX)
}

/// Stable sort placing shorthands before the narrower shorthands and
/// longhands they would otherwise reset, recursing into at-rule bodies.
pub fn sort_shorthands(nodes: &mut [Node]) {
  nodes.sort_by_key(node_weight);
  for node in nodes {
    if let Node::AtRule(at_rule) = node {
      if let Some(children) = &mut at_rule.children {
        sort_shorthands(children);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn rule(class: &str, property: &str) -> Node {
    Node::rule(class, vec![Node::declaration(property, "0")])
  }

  #[test]
  fn moves_shorthands_ahead_of_longhands() {
    let mut nodes = vec![
      rule("._a", "border-top-color"),
      rule("._b", "border-top"),
      rule("._c", "border-color"),
      rule("._d", "border"),
      rule("._e", "color"),
    ];
    sort_shorthands(&mut nodes);

    assert_eq!(
      nodes,
      vec![
        rule("._d", "border"),
        rule("._c", "border-color"),
        rule("._b", "border-top"),
        rule("._a", "border-top-color"),
        rule("._e", "color"),
      ]
    );
  }

  #[test]
  fn keeps_relative_order_of_equal_weights() {
    let mut nodes = vec![rule("._a", "color"), rule("._b", "all"), rule("._c", "display")];
    sort_shorthands(&mut nodes);

    assert_eq!(
      nodes,
      vec![rule("._b", "all"), rule("._a", "color"), rule("._c", "display")]
    );
  }
}
