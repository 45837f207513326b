//! The rule tree the compiler passes operate on.
//!
//! CSS text is parsed with swc's CSS parser and lowered into a small tree of
//! declarations, style rules and at-rules whose selectors, at-rule params and
//! values are kept as normalized text. The passes rewrite that tree and
//! [`print_nodes`] turns it back into minified CSS.

use std::fmt::Write as _;

use swc_core::common::{input::StringInput, sync::Lrc, FileName, SourceMap, Spanned};
use swc_core::css::ast::{self, ComponentValue, DeclarationName, QualifiedRulePrelude};
use swc_core::css::codegen::{writer::basic::BasicCssWriter, CodeGenerator, CodegenConfig, Emit};
use swc_core::css::parser::{parse_string_input, parser::ParserConfig};

use crate::error::{CompileError, CompileResult};

/// Selector used to wrap bare declaration lists so they parse as a stylesheet.
pub const DECLARATION_PLACEHOLDER: &str = ".__compiled_declaration_wrapper__";

#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
  pub property: String,
  pub value: String,
  pub important: bool,
}

impl Declaration {
  pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      property: property.into(),
      value: value.into(),
      important: false,
    }
  }

  pub fn with_important(mut self, important: bool) -> Self {
    self.important = important;
    self
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
  pub selectors: Vec<String>,
  pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
  pub name: String,
  pub params: String,
  /// `None` for statement at-rules such as `@import url(a.css);`.
  pub children: Option<Vec<Node>>,
}

impl AtRule {
  /// `name` followed by `params`, used as the at-rule part of class hashes.
  pub fn label(&self) -> String {
    format!("{}{}", self.name, self.params)
  }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
  Declaration(Declaration),
  Rule(StyleRule),
  AtRule(AtRule),
}

impl Node {
  pub fn declaration(property: impl Into<String>, value: impl Into<String>) -> Self {
    Node::Declaration(Declaration::new(property, value))
  }

  pub fn rule(selector: impl Into<String>, children: Vec<Node>) -> Self {
    Node::Rule(StyleRule {
      selectors: vec![selector.into()],
      children,
    })
  }

  pub fn at_rule(name: impl Into<String>, params: impl Into<String>, children: Vec<Node>) -> Self {
    Node::AtRule(AtRule {
      name: name.into(),
      params: params.into(),
      children: Some(children),
    })
  }

  /// First declaration found depth-first, used to classify single-declaration
  /// atomic rules.
  pub fn first_declaration(&self) -> Option<&Declaration> {
    match self {
      Node::Declaration(declaration) => Some(declaration),
      Node::Rule(rule) => rule.children.iter().find_map(Node::first_declaration),
      Node::AtRule(at_rule) => at_rule
        .children
        .as_ref()
        .and_then(|children| children.iter().find_map(Node::first_declaration)),
    }
  }
}

/// Parse a declaration list (optionally containing nested rules and at-rules)
/// as if it were the body of a single rule.
///
/// Nested rules may start with a type selector (`div { }`). Declarations of a
/// block come before its nested rules and at-rules in the returned tree.
pub fn parse_declarations(css: &str) -> CompileResult<Vec<Node>> {
  let wrapped = format!("{DECLARATION_PLACEHOLDER}{{{css}}}");
  let mut nodes = Vec::new();

  for node in lower_stylesheet(&parse_swc_stylesheet(&wrapped)?) {
    match node {
      Node::Rule(rule) if rule.selectors == [DECLARATION_PLACEHOLDER] => {
        nodes.extend(rule.children)
      }
      other => nodes.push(other),
    }
  }

  Ok(nodes)
}

/// Parse a complete stylesheet (`@keyframes`, `@font-face`, plain rules).
pub fn parse_stylesheet(css: &str) -> CompileResult<Vec<Node>> {
  Ok(lower_stylesheet(&parse_swc_stylesheet(css)?))
}

fn parse_swc_stylesheet(css: &str) -> CompileResult<ast::Stylesheet> {
  let cm: Lrc<SourceMap> = Default::default();
  let fm = cm.new_source_file(FileName::Custom("inline.css".into()).into(), css.to_string());
  let mut recovered = vec![];
  let config = ParserConfig {
    legacy_nesting: true,
    ..Default::default()
  };

  let stylesheet =
    parse_string_input::<ast::Stylesheet>(StringInput::from(&*fm), None, config, &mut recovered)
      .map_err(|err| CompileError::parse(err.message()))?;

  // Anything the parser recovered from is missing from the tree.
  if let Some(error) = recovered.first() {
    tracing::debug!(?error, css, "css parse error");
    return Err(CompileError::parse(error.message()));
  }

  Ok(stylesheet)
}

fn lower_stylesheet(stylesheet: &ast::Stylesheet) -> Vec<Node> {
  stylesheet
    .rules
    .iter()
    .filter_map(|rule| match rule {
      ast::Rule::QualifiedRule(rule) => Some(lower_qualified_rule(rule)),
      ast::Rule::AtRule(rule) => Some(lower_at_rule(rule)),
      ast::Rule::ListOfComponentValues(_) => {
        tracing::debug!("skipping unparsed top-level component values");
        None
      }
    })
    .collect()
}

fn lower_block(values: &[ComponentValue]) -> Vec<Node> {
  values
    .iter()
    .filter_map(|value| match value {
      ComponentValue::Declaration(declaration) => lower_declaration(declaration),
      ComponentValue::QualifiedRule(rule) => Some(lower_qualified_rule(rule)),
      ComponentValue::AtRule(rule) => Some(lower_at_rule(rule)),
      ComponentValue::KeyframeBlock(block) => {
        let selectors = block.prelude.iter().filter_map(to_css).collect();
        Some(Node::Rule(StyleRule {
          selectors,
          children: lower_block(&block.block.value),
        }))
      }
      _ => None,
    })
    .collect()
}

fn lower_qualified_rule(rule: &ast::QualifiedRule) -> Node {
  let prelude = match &rule.prelude {
    QualifiedRulePrelude::SelectorList(list) => to_css(list),
    QualifiedRulePrelude::RelativeSelectorList(list) => to_css(list),
    QualifiedRulePrelude::ListOfComponentValues(list) => to_css(list),
  }
  .unwrap_or_default();

  Node::Rule(StyleRule {
    selectors: split_selector_list(&prelude),
    children: lower_block(&rule.block.value),
  })
}

fn lower_at_rule(rule: &ast::AtRule) -> Node {
  let name = match &rule.name {
    ast::AtRuleName::Ident(ident) => ident.value.to_string(),
    ast::AtRuleName::DashedIdent(ident) => format!("--{}", ident.value),
  };
  let params = rule
    .prelude
    .as_deref()
    .and_then(to_css)
    .map(|params| collapse_whitespace(&params))
    .unwrap_or_default();

  Node::AtRule(AtRule {
    name: name.to_ascii_lowercase(),
    params,
    children: rule.block.as_ref().map(|block| lower_block(&block.value)),
  })
}

fn lower_declaration(declaration: &ast::Declaration) -> Option<Node> {
  let printed = to_css(declaration)?;
  let (_, value) = printed.split_once(':')?;
  let property = match &declaration.name {
    DeclarationName::Ident(ident) => ident.value.to_ascii_lowercase().to_string(),
    DeclarationName::DashedIdent(_) => printed.split(':').next()?.trim().to_string(),
  };

  let important = declaration.important.is_some();
  let mut value = value.trim();
  if important {
    if let Some(index) = value.rfind('!') {
      value = value[..index].trim_end();
    }
  }

  Some(Node::Declaration(Declaration {
    property,
    value: collapse_whitespace(value),
    important,
  }))
}

fn to_css<T>(node: &T) -> Option<String>
where
  T: Spanned,
  for<'writer> CodeGenerator<BasicCssWriter<'writer, &'writer mut String>>: Emit<T>,
{
  let mut output = String::new();
  {
    let writer = BasicCssWriter::new(&mut output, None, Default::default());
    let mut generator = CodeGenerator::new(writer, CodegenConfig { minify: false });
    generator.emit(node).ok()?;
  }
  Some(output.trim().to_string())
}

/// Collapse runs of whitespace into one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a selector list on commas that are not nested in parentheses,
/// brackets or strings.
pub fn split_selector_list(text: &str) -> Vec<String> {
  let mut selectors = Vec::new();
  let mut current = String::new();
  let mut depth = 0usize;
  let mut quote: Option<char> = None;

  for ch in text.chars() {
    match (quote, ch) {
      (Some(open), _) if ch == open => quote = None,
      (Some(_), _) => {}
      (None, '"' | '\'') => quote = Some(ch),
      (None, '(' | '[') => depth += 1,
      (None, ')' | ']') => depth = depth.saturating_sub(1),
      (None, ',') if depth == 0 => {
        selectors.push(collapse_whitespace(&current));
        current.clear();
        continue;
      }
      _ => {}
    }
    current.push(ch);
  }

  let last = collapse_whitespace(&current);
  if !last.is_empty() || !selectors.is_empty() {
    selectors.push(last);
  }
  selectors.retain(|selector| !selector.is_empty());
  selectors
}

/// Print nodes as minified CSS.
pub fn print_nodes(nodes: &[Node]) -> String {
  let mut output = String::new();
  write_nodes(&mut output, nodes);
  output
}

pub fn print_node(node: &Node) -> String {
  print_nodes(std::slice::from_ref(node))
}

fn write_nodes(output: &mut String, nodes: &[Node]) {
  for (index, node) in nodes.iter().enumerate() {
    match node {
      Node::Declaration(declaration) => {
        let _ = write!(output, "{}:{}", declaration.property, declaration.value);
        if declaration.important {
          output.push_str("!important");
        }
        if index + 1 < nodes.len() {
          output.push(';');
        }
      }
      Node::Rule(rule) => {
        output.push_str(&rule.selectors.join(","));
        output.push('{');
        write_nodes(output, &rule.children);
        output.push('}');
      }
      Node::AtRule(at_rule) => {
        output.push('@');
        output.push_str(&at_rule.name);
        if !at_rule.params.is_empty() {
          output.push(' ');
          output.push_str(&at_rule.params);
        }
        match &at_rule.children {
          Some(children) => {
            output.push('{');
            write_nodes(output, children);
            output.push('}');
          }
          None => output.push(';'),
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn parses_bare_declarations() {
    let nodes = parse_declarations("color: blue; font-size: 12px !important;").unwrap();

    assert_eq!(
      nodes,
      vec![
        Node::declaration("color", "blue"),
        Node::Declaration(Declaration::new("font-size", "12px").with_important(true)),
      ]
    );
  }

  #[test]
  fn whitespace_does_not_change_the_tree() {
    assert_eq!(
      parse_declarations("color:    blue;").unwrap(),
      parse_declarations("color: blue;").unwrap()
    );
  }

  #[test]
  fn parses_nested_rules_and_at_rules() {
    let nodes =
      parse_declarations("color: red; &:hover { color: blue; } @media (min-width: 500px) { color: green; }")
        .unwrap();

    assert_eq!(nodes.len(), 3);
    assert_eq!(
      nodes[1],
      Node::rule("&:hover", vec![Node::declaration("color", "blue")])
    );
    match &nodes[2] {
      Node::AtRule(at_rule) => {
        assert_eq!(at_rule.name, "media");
        assert_eq!(at_rule.params, "(min-width: 500px)");
        assert_eq!(
          at_rule.children,
          Some(vec![Node::declaration("color", "green")])
        );
      }
      other => panic!("expected at-rule, got {other:?}"),
    }
  }

  #[test]
  fn parses_nested_type_selectors() {
    let nodes = parse_declarations("div { color: blue; } span:hover { color: red; } margin: 0;").unwrap();

    assert_eq!(
      nodes,
      vec![
        Node::declaration("margin", "0"),
        Node::rule("div", vec![Node::declaration("color", "blue")]),
        Node::rule("span:hover", vec![Node::declaration("color", "red")]),
      ]
    );
  }

  #[test]
  fn reports_unparsable_css() {
    let error = parse_declarations("color: red; 1px { color: blue; }").unwrap_err();
    assert!(matches!(error, CompileError::Parse { .. }));
  }

  #[test]
  fn splits_selector_lists_outside_parentheses() {
    assert_eq!(
      split_selector_list("a, b:is(c, d) , [data-x='1,2']"),
      vec!["a", "b:is(c, d)", "[data-x='1,2']"]
    );
  }

  #[test]
  fn prints_minified_css() {
    let nodes = vec![
      Node::rule(
        "._syaz13q2",
        vec![
          Node::declaration("color", "blue"),
          Node::Declaration(Declaration::new("margin", "0").with_important(true)),
        ],
      ),
      Node::at_rule(
        "media",
        "(min-width: 500px)",
        vec![Node::rule("._a", vec![Node::declaration("color", "red")])],
      ),
    ];

    assert_eq!(
      print_nodes(&nodes),
      "._syaz13q2{color:blue;margin:0!important}@media (min-width: 500px){._a{color:red}}"
    );
  }
}
