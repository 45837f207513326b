use crate::error::CompileResult;
use crate::pipeline::{Pass, PassContext};
use crate::rule_tree::{Declaration, Node};

/// Properties that still need a `-webkit-` copy in supported browsers.
const WEBKIT_PROPERTIES: &[&str] = &[
  "appearance",
  "backdrop-filter",
  "text-size-adjust",
  "user-select",
];

/// Inserts vendor prefixed fallbacks ahead of the declarations that need
/// them, inside the same rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct VendorPrefix;

impl Pass for VendorPrefix {
  fn name(&self) -> &'static str {
    "vendor-prefix"
  }

  fn run(&self, nodes: &mut Vec<Node>, _ctx: &mut PassContext<'_>) -> CompileResult<()> {
    prefix_nodes(nodes);
    Ok(())
  }
}

fn needs_webkit_prefix(property: &str) -> bool {
  WEBKIT_PROPERTIES.contains(&property) || property == "mask" || property.starts_with("mask-")
}

fn is_width_like(property: &str) -> bool {
  matches!(property, "width" | "min-width" | "max-width")
}

fn prefixed(declaration: &Declaration) -> Option<Declaration> {
  if needs_webkit_prefix(&declaration.property) {
    return Some(Declaration {
      property: format!("-webkit-{}", declaration.property),
      ..declaration.clone()
    });
  }
  if is_width_like(&declaration.property) && declaration.value == "fit-content" {
    return Some(Declaration {
      value: "-moz-fit-content".into(),
      ..declaration.clone()
    });
  }
  None
}

fn prefix_nodes(nodes: &mut Vec<Node>) {
  let mut output = Vec::with_capacity(nodes.len());

  for mut node in std::mem::take(nodes) {
    match &mut node {
      Node::Declaration(declaration) => {
        if let Some(fallback) = prefixed(declaration) {
          output.push(Node::Declaration(fallback));
        }
      }
      Node::Rule(rule) => prefix_nodes(&mut rule.children),
      Node::AtRule(at_rule) => {
        if let Some(children) = &mut at_rule.children {
          prefix_nodes(children);
        }
      }
    }
    output.push(node);
  }

  *nodes = output;
}
