use crate::at_rules::{classify_at_rule, AtRuleClass};
use crate::error::{CompileError, CompileResult};
use crate::pipeline::{Pass, PassContext};
use crate::rule_tree::{AtRule, Declaration, Node, StyleRule};

/// Turns every declaration into its own rule whose selector is a generated
/// class name combined with the declaration's selector context.
#[derive(Debug, Default, Clone, Copy)]
pub struct Atomicize;

impl Pass for Atomicize {
  fn name(&self) -> &'static str {
    "atomicize"
  }

  fn run(&self, nodes: &mut Vec<Node>, ctx: &mut PassContext<'_>) -> CompileResult<()> {
    if let Some(prefix) = ctx.options.class_hash_prefix.as_deref() {
      if !is_css_identifier(prefix) {
        return Err(CompileError::InvalidClassHashPrefix {
          prefix: prefix.to_string(),
        });
      }
    }

    let body = std::mem::take(nodes);
    *nodes = atomicize_nodes(body, None, ctx)?;
    Ok(())
  }
}

fn atomicize_nodes(
  nodes: Vec<Node>,
  at_rule_label: Option<&str>,
  ctx: &mut PassContext<'_>,
) -> CompileResult<Vec<Node>> {
  let mut output = Vec::with_capacity(nodes.len());

  for node in nodes {
    match node {
      Node::Declaration(declaration) => {
        output.extend(atomic_rules(&declaration, &[], at_rule_label, ctx));
      }
      Node::Rule(rule) => {
        for child in rule.children {
          match child {
            Node::Declaration(declaration) => {
              output.extend(atomic_rules(&declaration, &rule.selectors, at_rule_label, ctx));
            }
            Node::Rule(nested) => {
              return Err(CompileError::UnflattenedRule {
                selector: nested.selectors.join(", "),
              });
            }
            Node::AtRule(at_rule) => {
              check_at_rule(&at_rule.name)?;
              tracing::debug!(name = %at_rule.name, "dropping at-rule nested in a style rule");
            }
          }
        }
      }
      Node::AtRule(at_rule) => output.push(atomicize_at_rule(at_rule, at_rule_label, ctx)?),
    }
  }

  Ok(output)
}

fn check_at_rule(name: &str) -> CompileResult<AtRuleClass> {
  match classify_at_rule(name) {
    AtRuleClass::Forbidden => Err(CompileError::ForbiddenAtRule {
      name: name.to_string(),
    }),
    AtRuleClass::Unknown => Err(CompileError::UnknownAtRule {
      name: name.to_string(),
    }),
    class => Ok(class),
  }
}

fn atomicize_at_rule(
  mut at_rule: AtRule,
  parent_label: Option<&str>,
  ctx: &mut PassContext<'_>,
) -> CompileResult<Node> {
  if check_at_rule(&at_rule.name)? == AtRuleClass::Atomic {
    if let Some(children) = at_rule.children.take() {
      let label = format!("{}{}", parent_label.unwrap_or_default(), at_rule.label());
      at_rule.children = Some(atomicize_nodes(children, Some(&label), ctx)?);
    }
  }
  Ok(Node::AtRule(at_rule))
}

fn atomic_rules(
  declaration: &Declaration,
  selectors: &[String],
  at_rule_label: Option<&str>,
  ctx: &mut PassContext<'_>,
) -> Vec<Node> {
  let implicit = [String::new()];
  let selectors = if selectors.is_empty() {
    &implicit[..]
  } else {
    selectors
  };

  let mut built = Vec::with_capacity(selectors.len());
  for selector in selectors {
    let normalized = normalize_selector(selector);
    let class_name = atomic_class_name(
      ctx.options.class_hash_prefix.as_deref(),
      at_rule_label,
      &normalized,
      declaration,
    );

    let emitted = ctx
      .options
      .compressed_alias(&class_name)
      .unwrap_or(&class_name)
      .to_string();
    ctx.push_emitted_class(&emitted);
    ctx.push_class_name(class_name);

    built.push(normalized.replace('&', &format!(".{emitted}")));
  }

  if ctx.options.flatten_multiple_selectors {
    built
      .into_iter()
      .map(|selector| Node::rule(selector, vec![Node::Declaration(declaration.clone())]))
      .collect()
  } else {
    vec![Node::Rule(StyleRule {
      selectors: built,
      children: vec![Node::Declaration(declaration.clone())],
    })]
  }
}

/// `"_" + group hash + value hash`, four characters each. The group covers
/// the at-rule chain, the selector and the property.
pub fn atomic_class_name(
  prefix: Option<&str>,
  at_rule_label: Option<&str>,
  normalized_selector: &str,
  declaration: &Declaration,
) -> String {
  let group = format!(
    "{}{}{}{}",
    prefix.unwrap_or_default(),
    at_rule_label.unwrap_or("undefined"),
    normalized_selector,
    declaration.property
  );

  let mut value = declaration.value.clone();
  if declaration.important {
    value.push_str("true");
  }

  format!(
    "_{}{}",
    atomic_hash::short_hash(&group, 4),
    atomic_hash::short_hash(&value, 4)
  )
}

/// Make `&` explicit: an empty selector is `&`, a selector without `&` is a
/// descendant of it, and runs of `&` separated by whitespace are joined.
pub fn normalize_selector(selector: &str) -> String {
  let collapsed = collapse_adjacent_nesting(selector.trim());
  let collapsed = collapsed.trim();
  if collapsed.is_empty() {
    "&".to_string()
  } else if collapsed.contains('&') {
    collapsed.to_string()
  } else {
    format!("& {collapsed}")
  }
}

fn collapse_adjacent_nesting(selector: &str) -> String {
  let mut output = String::with_capacity(selector.len());
  let mut chars = selector.chars().peekable();

  while let Some(ch) = chars.next() {
    output.push(ch);
    if ch != '&' {
      continue;
    }

    let mut saw_whitespace = false;
    while chars.next_if(|next| next.is_whitespace()).is_some() {
      saw_whitespace = true;
    }
    if saw_whitespace && chars.peek() != Some(&'&') {
      output.push(' ');
    }
  }

  output
}

fn is_css_identifier(value: &str) -> bool {
  let mut chars = value.chars();
  match chars.next() {
    Some(first) if first.is_ascii_alphabetic() || first == '-' || first == '_' => {
      chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    }
    _ => false,
  }
}
