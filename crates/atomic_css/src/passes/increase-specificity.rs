use crate::error::CompileResult;
use crate::pipeline::{Pass, PassContext};
use crate::rule_tree::Node;

const SPECIFICITY_BOOST: &str = ":not(#\\#)";

/// Appends `:not(#\#)` after every generated class so atomic rules win over
/// styles of equal specificity from other stylesheets.
#[derive(Debug, Default, Clone, Copy)]
pub struct IncreaseSpecificity;

impl Pass for IncreaseSpecificity {
  fn name(&self) -> &'static str {
    "increase-specificity"
  }

  fn run(&self, nodes: &mut Vec<Node>, ctx: &mut PassContext<'_>) -> CompileResult<()> {
    boost_nodes(nodes, ctx);
    Ok(())
  }
}

fn boost_nodes(nodes: &mut [Node], ctx: &PassContext<'_>) {
  for node in nodes {
    match node {
      Node::Rule(rule) => {
        for selector in &mut rule.selectors {
          *selector = boost_selector(selector, |class| ctx.is_emitted_class(class));
        }
      }
      Node::AtRule(at_rule) => {
        if let Some(children) = &mut at_rule.children {
          boost_nodes(children, ctx);
        }
      }
      Node::Declaration(_) => {}
    }
  }
}

fn is_identifier_char(ch: char) -> bool {
  ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn boost_selector(selector: &str, is_generated: impl Fn(&str) -> bool) -> String {
  let mut output = String::with_capacity(selector.len() + SPECIFICITY_BOOST.len());
  let mut rest = selector;

  while let Some(dot) = rest.find('.') {
    output.push_str(&rest[..=dot]);
    rest = &rest[dot + 1..];

    let end = rest
      .find(|ch: char| !is_identifier_char(ch))
      .unwrap_or(rest.len());
    let class = &rest[..end];
    output.push_str(class);
    if is_generated(class) {
      output.push_str(SPECIFICITY_BOOST);
    }
    rest = &rest[end..];
  }

  output.push_str(rest);
  output
}
