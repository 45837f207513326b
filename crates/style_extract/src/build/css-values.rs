//! Text-level helpers for turning JavaScript values into CSS.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::resolve::number_to_string;

const UPPER_A_GRAVE: char = '\u{00C0}';
const UPPER_O_DIAERESIS: char = '\u{00D6}';
const UPPER_O_SLASH: char = '\u{00D8}';
const UPPER_THORN: char = '\u{00DE}';

static UNIT_REGEX: Lazy<Regex> = Lazy::new(|| {
  const UNITS: &[&str] = &[
    "em", "ex", "cap", "ch", "ic", "rem", "lh", "rlh", "vw", "vh", "vi", "vb", "vmin", "vmax",
    "cm", "mm", "Q", "in", "pc", "pt", "px", "deg", "grad", "rad", "turn", "s", "ms", "Hz", "kHz",
    "dpi", "dpcm", "dppx", "x", "fr", "%",
  ];

  let pattern = format!(
    "^(({}|\"|'))(;|,|\\n| |\\\\)?",
    UNITS
      .iter()
      .map(|unit| regex::escape(unit))
      .collect::<Vec<_>>()
      .join("|")
  );

  Regex::new(&pattern).expect("valid css unit regex")
});

/// Properties whose numeric values are written without a unit.
static UNITLESS_PROPERTIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
  HashSet::from([
    "animation-iteration-count",
    "base-palette",
    "border-image-outset",
    "border-image-slice",
    "border-image-width",
    "box-flex",
    "box-flex-group",
    "box-ordinal-group",
    "column-count",
    "columns",
    "flex",
    "flex-grow",
    "flex-positive",
    "flex-shrink",
    "flex-negative",
    "flex-order",
    "font-size-adjust",
    "font-weight",
    "grid-area",
    "grid-row",
    "grid-row-end",
    "grid-row-span",
    "grid-row-start",
    "grid-column",
    "grid-column-end",
    "grid-column-span",
    "grid-column-start",
    "line-clamp",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "tab-size",
    "-webkit-line-clamp",
    "widows",
    "z-index",
    "zoom",
    "fill-opacity",
    "flood-opacity",
    "stop-opacity",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
  ])
});

static CONTENT_VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?s)^([A-Za-z\-]+\(.+|.*-quote|inherit|initial|none|normal|revert|unset)(\s|$)")
    .expect("valid content value regex")
});

/// CSS text on either side of an interpolation, with the parts that have to
/// travel with the runtime value split off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Affixes {
  pub before: String,
  pub prefix: String,
  pub after: String,
  pub suffix: String,
}

/// Split quotes, a leading `-`, `url(...)` and units away from the text around
/// an interpolation.
pub fn css_affix_interpolation(before: &str, after: &str) -> Affixes {
  if let (Some(before), Some(after)) = (before.strip_suffix("url("), after.strip_prefix(')')) {
    return Affixes {
      before: before.to_string(),
      prefix: "url(".into(),
      after: after.to_string(),
      suffix: ")".into(),
    };
  }

  let mut css_before = before.to_string();
  let mut prefix = String::new();
  if let Some(last) = css_before.chars().last() {
    if matches!(last, '"' | '\'' | '-') {
      css_before.pop();
      prefix.push(last);
    }
  }

  let mut css_after = after.to_string();
  let mut suffix = String::new();
  if let Some(unit) = UNIT_REGEX.captures(after).and_then(|captures| captures.get(1)) {
    css_after.replace_range(unit.range(), "");
    suffix = unit.as_str().to_string();
  }

  Affixes {
    before: css_before,
    prefix,
    after: css_after,
    suffix,
  }
}

pub fn kebab_case(input: &str) -> String {
  let mut result = String::with_capacity(input.len());

  for ch in input.chars() {
    let is_upper = matches!(
      ch,
      'A'..='Z' | UPPER_A_GRAVE..=UPPER_O_DIAERESIS | UPPER_O_SLASH..=UPPER_THORN
    );

    if is_upper {
      result.push('-');
      result.extend(ch.to_lowercase());
    } else {
      result.push(ch);
    }
  }

  result
}

/// Property name as written in CSS. Custom properties keep their case.
pub fn css_property_name(key: &str) -> String {
  if key.starts_with("--") {
    key.to_string()
  } else {
    kebab_case(key)
  }
}

/// Number as a CSS value for `property`, in pixels unless the property is
/// unitless or the number is zero. Numbers print as they would inside a
/// template literal, so `{ opacity: 0.5 }` and `opacity: ${0.5}` agree.
pub fn add_unit_if_needed(property: &str, num: f64) -> String {
  if num == 0.0 || UNITLESS_PROPERTIES.contains(css_property_name(property).as_str()) {
    number_to_string(num)
  } else {
    format!("{}px", number_to_string(num))
  }
}

/// Quote a `content` value unless it is already quoted or a keyword or
/// function.
pub fn normalize_content_value(value: &str) -> String {
  if value.is_empty() {
    return String::from("\"\"");
  }

  if value.contains('"') || value.contains('\'') || CONTENT_VALUE_PATTERN.is_match(value) {
    value.to_string()
  } else {
    format!("\"{value}\"")
  }
}
