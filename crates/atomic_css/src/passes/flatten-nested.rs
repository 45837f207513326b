use crate::at_rules::{classify_at_rule, AtRuleClass};
use crate::error::CompileResult;
use crate::pipeline::{Pass, PassContext};
use crate::rule_tree::{AtRule, Node, StyleRule};

/// Unnests rules the way postcss-nested does: child selectors are combined
/// with their parent, declarations are split around nested rules so source
/// order survives, and conditional at-rules bubble out of the rules they are
/// written in.
///
/// The top-level node list is the body of the implicit `&` rule, so
/// declarations found there (or directly inside a top-level at-rule) stay
/// bare.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlattenNested;

impl Pass for FlattenNested {
  fn name(&self) -> &'static str {
    "flatten-nested"
  }

  fn run(&self, nodes: &mut Vec<Node>, _ctx: &mut PassContext<'_>) -> CompileResult<()> {
    let body = std::mem::take(nodes);
    *nodes = flatten_body(None, body);
    Ok(())
  }
}

fn bubbles(at_rule: &AtRule) -> bool {
  at_rule.children.is_some() && classify_at_rule(&at_rule.name) == AtRuleClass::Atomic
}

fn flatten_body(parent: Option<&[String]>, children: Vec<Node>) -> Vec<Node> {
  let mut output = Vec::new();
  let mut pending = Vec::new();

  let flush = |output: &mut Vec<Node>, pending: &mut Vec<Node>| {
    if pending.is_empty() {
      return;
    }
    match parent {
      Some(selectors) => output.push(Node::Rule(StyleRule {
        selectors: selectors.to_vec(),
        children: std::mem::take(pending),
      })),
      None => output.append(pending),
    }
  };

  for child in children {
    match child {
      Node::Declaration(_) => pending.push(child),
      Node::Rule(rule) => {
        flush(&mut output, &mut pending);
        let selectors = match parent {
          Some(parent) => combine_selectors(parent, &rule.selectors),
          None => rule.selectors,
        };
        output.extend(flatten_body(Some(&selectors), rule.children));
      }
      Node::AtRule(mut at_rule) if bubbles(&at_rule) => {
        flush(&mut output, &mut pending);
        let inner = flatten_body(parent, at_rule.children.take().unwrap_or_default());
        if !inner.is_empty() {
          at_rule.children = Some(inner);
          output.push(Node::AtRule(at_rule));
        }
      }
      Node::AtRule(at_rule) => {
        if parent.is_none() {
          flush(&mut output, &mut pending);
          output.push(Node::AtRule(at_rule));
        } else {
          pending.push(Node::AtRule(at_rule));
        }
      }
    }
  }

  flush(&mut output, &mut pending);
  output
}

/// Combine every parent selector with every child selector. `&` in the child
/// is replaced by the parent; otherwise the child becomes a descendant.
pub(crate) fn combine_selectors(parents: &[String], children: &[String]) -> Vec<String> {
  let mut combined = Vec::with_capacity(parents.len() * children.len());
  for parent in parents {
    for child in children {
      if child.contains('&') {
        combined.push(child.replace('&', parent));
      } else {
        combined.push(format!("{parent} {child}"));
      }
    }
  }
  combined
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::rule_tree::{parse_declarations, print_nodes};

  fn flatten(css: &str) -> String {
    let nodes = parse_declarations(css).unwrap();
    print_nodes(&flatten_body(None, nodes))
  }

  #[test]
  fn combines_nested_selectors() {
    assert_eq!(
      flatten("&:hover { color: red; div { color: blue; } &:focus { color: green; } }"),
      "&:hover{color:red}&:hover div{color:blue}&:hover:focus{color:green}"
    );
  }

  #[test]
  fn groups_declarations_before_nested_rules() {
    assert_eq!(
      flatten("div { color: red; span { color: blue; } margin: 0; }"),
      "div{color:red;margin:0}div span{color:blue}"
    );
  }

  #[test]
  fn splits_declarations_around_nested_rules() {
    let nodes = vec![Node::rule(
      "div",
      vec![
        Node::declaration("color", "red"),
        Node::rule("span", vec![Node::declaration("color", "blue")]),
        Node::declaration("margin", "0"),
      ],
    )];
    assert_eq!(
      print_nodes(&flatten_body(None, nodes)),
      "div{color:red}div span{color:blue}div{margin:0}"
    );
  }

  #[test]
  fn bubbles_media_out_of_rules() {
    assert_eq!(
      flatten("&:hover { @media (min-width: 500px) { color: red; } }"),
      "@media (min-width: 500px){&:hover{color:red}}"
    );
  }

  #[test]
  fn keeps_bare_declarations_in_top_level_at_rules() {
    assert_eq!(
      flatten("@media (min-width: 500px) { color: red; &:hover { color: blue; } }"),
      "@media (min-width: 500px){color:red;&:hover{color:blue}}"
    );
  }

  #[test]
  fn drops_empty_rules() {
    assert_eq!(flatten("div { } color: red;"), "color:red");
  }

  #[test]
  fn multiplies_selector_lists() {
    assert_eq!(
      combine_selectors(&["a".into(), "b".into()], &["&:hover".into(), "c".into()]),
      vec!["a:hover", "a c", "b:hover", "b c"]
    );
  }
}
