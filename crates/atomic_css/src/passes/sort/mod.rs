#[path = "pseudo.rs"]
pub mod pseudo;
#[path = "shorthand.rs"]
pub mod shorthand;

use crate::at_rules::{compare_at_rules, AtRuleQuery};
use crate::error::CompileResult;
use crate::pipeline::{Pass, PassContext};
use crate::rule_tree::Node;

use pseudo::{sort_pseudo_selectors, sort_pseudo_selectors_in_at_rule};
use shorthand::sort_shorthands;

/// Orders atomic rules so the cascade resolves the way the author expects:
/// anything that is neither a rule nor an at-rule first, then plain rules in
/// lvfha order, then at-rules in mobile-first order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SortAtomicStyleSheet;

impl Pass for SortAtomicStyleSheet {
  fn name(&self) -> &'static str {
    "sort-atomic-style-sheet"
  }

  fn run(&self, nodes: &mut Vec<Node>, ctx: &mut PassContext<'_>) -> CompileResult<()> {
    let mut catch_all = Vec::new();
    let mut rules = Vec::new();
    let mut at_rules = Vec::new();

    for node in std::mem::take(nodes) {
      match node {
        Node::Rule(_) => rules.push(node),
        Node::AtRule(_) => at_rules.push(node),
        Node::Declaration(_) => catch_all.push(node),
      }
    }

    if ctx.options.sort_shorthand {
      sort_shorthands(&mut catch_all);
      sort_shorthands(&mut rules);
      sort_shorthands(&mut at_rules);
    }

    sort_pseudo_selectors(&mut rules);

    if ctx.options.sort_at_rules {
      let mut keyed: Vec<(AtRuleQuery, Node)> = at_rules
        .into_iter()
        .map(|node| {
          let query = match &node {
            Node::AtRule(at_rule) => AtRuleQuery::new(&at_rule.name, &at_rule.params),
            _ => AtRuleQuery::new("", ""),
          };
          (query, node)
        })
        .collect();
      keyed.sort_by(|(a, _), (b, _)| compare_at_rules(a, b));
      at_rules = keyed.into_iter().map(|(_, node)| node).collect();
    }

    for node in &mut at_rules {
      if let Node::AtRule(at_rule) = node {
        if let Some(children) = &mut at_rule.children {
          sort_pseudo_selectors_in_at_rule(children);
        }
      }
    }

    nodes.extend(catch_all);
    nodes.extend(rules);
    nodes.extend(at_rules);
    Ok(())
  }
}
