//! At-rule classification and mobile-first ordering of breakpoint queries.

#[path = "compare.rs"]
mod compare;
#[path = "parse.rs"]
mod parse;

pub use compare::{compare_at_rules, AtRuleQuery};
pub use parse::{parse_at_rule_params, ComparisonOperator, ParsedAtRule, Property};

/// How the compiler treats an at-rule found in user styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtRuleClass {
  /// Conditional group rules: their declarations are atomicized and the rule
  /// bubbles out of nested selectors.
  Atomic,
  /// Kept verbatim (`@font-face`, `@keyframes`, ...).
  PassThrough,
  /// Never allowed inside atomic styles.
  Forbidden,
  Unknown,
}

pub fn classify_at_rule(name: &str) -> AtRuleClass {
  match name {
    "container" | "-moz-document" | "else" | "layer" | "media" | "starting-style" | "supports"
    | "when" => AtRuleClass::Atomic,
    "color-profile" | "counter-style" | "font-face" | "font-palette-values" | "keyframes"
    | "page" | "property" => AtRuleClass::PassThrough,
    "charset" | "import" | "namespace" => AtRuleClass::Forbidden,
    _ => AtRuleClass::Unknown,
  }
}
