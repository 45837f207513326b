use crate::error::CompileResult;
use crate::pipeline::{Pass, PassContext};
use crate::rule_tree::Node;

/// Prefixes selectors that start with a pseudo class or element with `&`, so
/// `:hover {}` nested in a declaration list applies to the parent.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParentOrphanedPseudos;

impl Pass for ParentOrphanedPseudos {
  fn name(&self) -> &'static str {
    "parent-orphaned-pseudos"
  }

  fn run(&self, nodes: &mut Vec<Node>, _ctx: &mut PassContext<'_>) -> CompileResult<()> {
    parent_pseudos(nodes);
    Ok(())
  }
}

fn parent_pseudos(nodes: &mut [Node]) {
  for node in nodes {
    match node {
      Node::Rule(rule) => {
        for selector in &mut rule.selectors {
          if selector.starts_with(':') {
            selector.insert(0, '&');
          }
        }
        parent_pseudos(&mut rule.children);
      }
      Node::AtRule(at_rule) => {
        if let Some(children) = &mut at_rule.children {
          parent_pseudos(children);
        }
      }
      Node::Declaration(_) => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::rule_tree::StyleRule;

  #[test]
  fn parents_each_orphaned_selector() {
    let mut nodes = vec![Node::Rule(StyleRule {
      selectors: vec![":hover".into(), "div".into(), "::before".into()],
      children: vec![Node::rule(":focus", vec![])],
    })];
    parent_pseudos(&mut nodes);

    assert_eq!(
      nodes,
      vec![Node::Rule(StyleRule {
        selectors: vec!["&:hover".into(), "div".into(), "&::before".into()],
        children: vec![Node::rule("&:focus", vec![])],
      })]
    );
  }

  #[test]
  fn descends_into_at_rules() {
    let mut nodes = vec![Node::at_rule(
      "media",
      "(min-width: 500px)",
      vec![Node::rule(":active", vec![])],
    )];
    parent_pseudos(&mut nodes);

    assert_eq!(
      nodes,
      vec![Node::at_rule(
        "media",
        "(min-width: 500px)",
        vec![Node::rule("&:active", vec![])],
      )]
    );
  }
}
