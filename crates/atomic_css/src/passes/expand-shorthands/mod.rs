#[path = "box-edges.rs"]
mod box_edges;
#[path = "decoration.rs"]
mod decoration;
#[path = "flex.rs"]
mod flex;
#[path = "values.rs"]
pub(crate) mod values;

use crate::error::CompileResult;
use crate::pipeline::{Pass, PassContext};
use crate::rule_tree::{Declaration, Node};

/// Result of expanding one shorthand declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
  Longhands(Vec<(String, String)>),
  /// Leave the shorthand as written.
  KeepOriginal,
  /// The value is invalid for the shorthand; drop the declaration.
  Discard,
}

impl Expansion {
  pub fn longhands<P, V>(pairs: impl IntoIterator<Item = (P, V)>) -> Self
  where
    P: Into<String>,
    V: Into<String>,
  {
    Expansion::Longhands(
      pairs
        .into_iter()
        .map(|(property, value)| (property.into(), value.into()))
        .collect(),
    )
  }
}

/// Expand a shorthand declaration into its longhands. `None` when the
/// property has no expansion or the value uses `var()`.
pub fn expand_shorthand(property: &str, value: &str) -> Option<Expansion> {
  if value.trim().is_empty() || values::contains_var(value) {
    return None;
  }

  let expansion = match property {
    "background" => decoration::background(value),
    "flex" => flex::flex(value),
    "flex-flow" => flex::flex_flow(value),
    "margin" | "padding" => box_edges::box_edges(property, value),
    "outline" => decoration::outline(value),
    "overflow" => box_edges::overflow(value),
    "place-content" | "place-items" | "place-self" => box_edges::place(property, value),
    "text-decoration" => decoration::text_decoration(value),
    _ => return None,
  };
  Some(expansion)
}

/// Replaces shorthand declarations with their longhands so that each
/// longhand becomes its own atomic rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpandShorthands;

impl Pass for ExpandShorthands {
  fn name(&self) -> &'static str {
    "expand-shorthands"
  }

  fn run(&self, nodes: &mut Vec<Node>, _ctx: &mut PassContext<'_>) -> CompileResult<()> {
    expand_nodes(nodes);
    Ok(())
  }
}

fn expand_nodes(nodes: &mut Vec<Node>) {
  let mut expanded = Vec::with_capacity(nodes.len());

  for mut node in std::mem::take(nodes) {
    match &mut node {
      Node::Declaration(declaration) => {
        match expand_shorthand(&declaration.property, &declaration.value) {
          Some(Expansion::Longhands(longhands)) => {
            expanded.extend(longhands.into_iter().map(|(property, value)| {
              Node::Declaration(
                Declaration::new(property, value).with_important(declaration.important),
              )
            }));
            continue;
          }
          Some(Expansion::Discard) => {
            tracing::debug!(
              property = %declaration.property,
              value = %declaration.value,
              "discarding invalid shorthand"
            );
            continue;
          }
          Some(Expansion::KeepOriginal) | None => {}
        }
      }
      Node::Rule(rule) => expand_nodes(&mut rule.children),
      Node::AtRule(at_rule) => {
        if let Some(children) = &mut at_rule.children {
          expand_nodes(children);
        }
      }
    }
    expanded.push(node);
  }

  *nodes = expanded;
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn expands_inside_rules_and_keeps_important() {
    let mut nodes = vec![Node::rule(
      "&:hover",
      vec![Node::Declaration(
        Declaration::new("overflow", "hidden").with_important(true),
      )],
    )];
    expand_nodes(&mut nodes);

    assert_eq!(
      nodes,
      vec![Node::rule(
        "&:hover",
        vec![
          Node::Declaration(Declaration::new("overflow-x", "hidden").with_important(true)),
          Node::Declaration(Declaration::new("overflow-y", "hidden").with_important(true)),
        ],
      )]
    );
  }

  #[test]
  fn never_expands_var_values() {
    assert_eq!(expand_shorthand("margin", "var(--space) 0"), None);
  }

  #[test]
  fn drops_invalid_shorthands() {
    let mut nodes = vec![
      Node::declaration("flex", "foo bar"),
      Node::declaration("color", "red"),
    ];
    expand_nodes(&mut nodes);

    assert_eq!(nodes, vec![Node::declaration("color", "red")]);
  }

  #[test]
  fn leaves_other_properties_alone() {
    assert_eq!(expand_shorthand("border", "1px solid red"), None);
  }
}
