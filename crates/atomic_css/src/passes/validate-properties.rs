use indexmap::IndexMap;

use crate::error::{CompileError, CompileResult};
use crate::pipeline::{Pass, PassContext};
use crate::properties::{is_known_property, longhands_of};
use crate::rule_tree::Node;

/// Rejects unknown properties and a shorthand declared together with one of
/// its longhands for the same selector, where the winner would depend on
/// stylesheet order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidateProperties;

impl Pass for ValidateProperties {
  fn name(&self) -> &'static str {
    "validate-properties"
  }

  fn run(&self, nodes: &mut Vec<Node>, _ctx: &mut PassContext<'_>) -> CompileResult<()> {
    let mut contexts: IndexMap<String, Vec<String>> = IndexMap::new();
    collect_properties(nodes, "", "&", &mut contexts)?;

    for properties in contexts.values() {
      for shorthand in properties {
        let longhands = longhands_of(shorthand);
        if let Some(longhand) = properties
          .iter()
          .find(|property| longhands.contains(&property.as_str()))
        {
          return Err(CompileError::ShorthandLonghandMix {
            shorthand: shorthand.clone(),
            longhand: longhand.clone(),
          });
        }
      }
    }
    Ok(())
  }
}

fn collect_properties(
  nodes: &[Node],
  at_rules: &str,
  selector: &str,
  contexts: &mut IndexMap<String, Vec<String>>,
) -> CompileResult<()> {
  for node in nodes {
    match node {
      Node::Declaration(declaration) => {
        if !is_known_property(&declaration.property) {
          return Err(CompileError::UnknownProperty {
            name: declaration.property.clone(),
          });
        }
        contexts
          .entry(format!("{at_rules}{selector}"))
          .or_default()
          .push(declaration.property.clone());
      }
      Node::Rule(rule) => {
        for rule_selector in &rule.selectors {
          collect_properties(&rule.children, at_rules, rule_selector, contexts)?;
        }
      }
      Node::AtRule(at_rule) => {
        if let Some(children) = &at_rule.children {
          let nested = format!("{at_rules}@{}", at_rule.label());
          collect_properties(children, &nested, selector, contexts)?;
        }
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::options::CompileOptions;

  fn validate(mut nodes: Vec<Node>) -> CompileResult<()> {
    let options = CompileOptions::default();
    ValidateProperties.run(&mut nodes, &mut PassContext::new(&options))
  }

  #[test]
  fn accepts_known_and_custom_properties() {
    assert_eq!(
      validate(vec![
        Node::declaration("color", "red"),
        Node::declaration("--space", "4px"),
        Node::declaration("-webkit-line-clamp", "2"),
      ]),
      Ok(())
    );
  }

  #[test]
  fn rejects_unknown_properties() {
    assert_eq!(
      validate(vec![Node::rule("&:hover", vec![Node::declaration("colr", "red")])]),
      Err(CompileError::UnknownProperty {
        name: "colr".into()
      })
    );
  }

  #[test]
  fn rejects_shorthand_and_longhand_in_one_selector() {
    assert_eq!(
      validate(vec![
        Node::declaration("padding-top", "0"),
        Node::declaration("padding", "4px"),
      ]),
      Err(CompileError::ShorthandLonghandMix {
        shorthand: "padding".into(),
        longhand: "padding-top".into(),
      })
    );
  }

  #[test]
  fn allows_the_mix_across_selectors() {
    assert_eq!(
      validate(vec![
        Node::declaration("padding", "4px"),
        Node::rule("&:hover", vec![Node::declaration("padding-top", "0")]),
        Node::at_rule(
          "media",
          "(min-width: 500px)",
          vec![Node::declaration("padding-left", "0")]
        ),
      ]),
      Ok(())
    );
  }
}
