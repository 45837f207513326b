use crate::rule_tree::Node;

/// Link, visited, focus-within, focus, focus-visible, hover, active: later
/// entries win when several apply at once.
pub const STYLE_ORDER: [&str; 7] = [
  ":link",
  ":visited",
  ":focus-within",
  ":focus",
  ":focus-visible",
  ":hover",
  ":active",
];

fn selector_score(selector: &str) -> usize {
  STYLE_ORDER
    .iter()
    .position(|pseudo| selector.ends_with(pseudo))
    .map(|index| index + 1)
    .unwrap_or(0)
}

fn node_score(node: &Node) -> usize {
  match node {
    Node::Rule(rule) => rule
      .selectors
      .first()
      .map(|selector| selector_score(selector.trim()))
      .unwrap_or(0),
    _ => 0,
  }
}

/// Stable sort of rules into lvfha order; rules without one of those pseudo
/// classes keep their position ahead of the ones that have one.
pub fn sort_pseudo_selectors(nodes: &mut [Node]) {
  nodes.sort_by_key(node_score);
}

/// Sort the style rules directly inside `nodes` (an at-rule body), recursing
/// into nested at-rules, which stay ahead of the sorted rules.
pub fn sort_pseudo_selectors_in_at_rule(nodes: &mut Vec<Node>) {
  let mut others = Vec::new();
  let mut rules = Vec::new();

  for mut node in std::mem::take(nodes) {
    match &mut node {
      Node::Rule(_) => rules.push(node),
      Node::AtRule(at_rule) => {
        if let Some(children) = &mut at_rule.children {
          sort_pseudo_selectors_in_at_rule(children);
        }
        others.push(node);
      }
      Node::Declaration(_) => others.push(node),
    }
  }

  sort_pseudo_selectors(&mut rules);
  others.extend(rules);
  *nodes = others;
}
