use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const OPERATOR: &str = r"(?P<operator>(?:<=?)|(?:>=?)|=)\s*";
const PROPERTY: &str = r"(?:(?P<property>((?:min|max)-)?(?:device-)?(?:width|height))\s*)";
const COLON: &str = r"(?P<colon>:\s*)";
const LENGTH: &str = r"(?P<length>-?\d*\.?\d+)(?P<lengthUnit>ch|em|ex|px|rem)?\s*";

const REM_SIZE: f64 = 16.0;

/// `(min-width: 200px)`
static MIN_MAX: Lazy<Regex> =
  Lazy::new(|| Regex::new(&format!("{PROPERTY}{COLON}{LENGTH}")).expect("invalid min/max regex"));
/// `(200px <= width)`
static REVERSED_RANGE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(&format!("{LENGTH}{OPERATOR}{PROPERTY}")).expect("invalid reversed range regex")
});
/// `(width >= 200px)`
static RANGE: Lazy<Regex> =
  Lazy::new(|| Regex::new(&format!("{PROPERTY}{OPERATOR}{LENGTH}")).expect("invalid range regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
  Width,
  Height,
  DeviceWidth,
  DeviceHeight,
}

impl Property {
  fn from_name(name: &str) -> Option<Self> {
    match name {
      "width" => Some(Property::Width),
      "height" => Some(Property::Height),
      "device-width" => Some(Property::DeviceWidth),
      "device-height" => Some(Property::DeviceHeight),
      _ => None,
    }
  }

  pub fn sort_order(self) -> u32 {
    match self {
      Property::Width => 1,
      Property::Height => 2,
      Property::DeviceWidth => 101,
      Property::DeviceHeight => 102,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
  Greater,
  GreaterEqual,
  Less,
  LessEqual,
  Equal,
}

impl ComparisonOperator {
  fn from_symbol(symbol: &str) -> Option<Self> {
    match symbol {
      ">" => Some(ComparisonOperator::Greater),
      ">=" => Some(ComparisonOperator::GreaterEqual),
      "<" => Some(ComparisonOperator::Less),
      "<=" => Some(ComparisonOperator::LessEqual),
      "=" => Some(ComparisonOperator::Equal),
      _ => None,
    }
  }

  pub fn sort_order(self) -> u32 {
    match self {
      ComparisonOperator::Greater => 10,
      ComparisonOperator::GreaterEqual => 20,
      ComparisonOperator::Less => 30,
      ComparisonOperator::LessEqual => 40,
      ComparisonOperator::Equal => 50,
    }
  }

  pub fn includes_greater(self) -> bool {
    matches!(
      self,
      ComparisonOperator::Greater | ComparisonOperator::GreaterEqual
    )
  }

  /// The operator seen from the other side, `200px < width` is `width > 200px`.
  pub fn reverse(self) -> Self {
    match self {
      ComparisonOperator::Greater => ComparisonOperator::Less,
      ComparisonOperator::GreaterEqual => ComparisonOperator::LessEqual,
      ComparisonOperator::Less => ComparisonOperator::Greater,
      ComparisonOperator::LessEqual => ComparisonOperator::GreaterEqual,
      ComparisonOperator::Equal => ComparisonOperator::Equal,
    }
  }
}

/// One `property operator length` comparison found in an at-rule prelude.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAtRule {
  pub property: Property,
  pub operator: ComparisonOperator,
  /// Length in px.
  pub length: f64,
  pub length_unit: Option<String>,
  /// Byte offset of the match inside the prelude.
  pub index: usize,
}

impl ParsedAtRule {
  pub fn sort_key(&self) -> u32 {
    self.property.sort_order() + self.operator.sort_order()
  }
}

/// Extract every width/height comparison from an at-rule prelude, in source
/// order. Anything that is not a recognizable comparison is ignored.
pub fn parse_at_rule_params(params: &str) -> Vec<ParsedAtRule> {
  let mut parsed: Vec<ParsedAtRule> = MIN_MAX
    .captures_iter(params)
    .filter_map(|captures| parse_min_max(&captures))
    .chain(
      REVERSED_RANGE
        .captures_iter(params)
        .filter_map(|captures| parse_range(&captures, true)),
    )
    .chain(
      RANGE
        .captures_iter(params)
        .filter_map(|captures| parse_range(&captures, false)),
    )
    .collect();

  parsed.sort_by_key(|rule| rule.index);
  parsed
}

fn parse_min_max(captures: &Captures<'_>) -> Option<ParsedAtRule> {
  let name = captures.name("property")?.as_str();
  let (operator, property) = if let Some(rest) = name.strip_prefix("min-") {
    (ComparisonOperator::GreaterEqual, rest)
  } else if let Some(rest) = name.strip_prefix("max-") {
    (ComparisonOperator::LessEqual, rest)
  } else {
    (ComparisonOperator::Equal, name)
  };

  assemble(captures, Property::from_name(property)?, operator)
}

fn parse_range(captures: &Captures<'_>, reversed: bool) -> Option<ParsedAtRule> {
  let property = Property::from_name(captures.name("property")?.as_str())?;
  let operator = ComparisonOperator::from_symbol(captures.name("operator")?.as_str())?;
  let operator = if reversed { operator.reverse() } else { operator };

  assemble(captures, property, operator)
}

fn assemble(
  captures: &Captures<'_>,
  property: Property,
  operator: ComparisonOperator,
) -> Option<ParsedAtRule> {
  let index = captures.get(0)?.start();
  let length = captures.name("length")?.as_str();
  let length_unit = captures.name("lengthUnit").map(|unit| unit.as_str().to_string());

  let length = if length == "0" {
    0.0
  } else {
    let value: f64 = length.parse().ok()?;
    match length_unit.as_deref()? {
      "ch" | "ex" => value * 0.5 * REM_SIZE,
      "em" | "rem" => value * REM_SIZE,
      _ => value,
    }
  };

  Some(ParsedAtRule {
    property,
    operator,
    length,
    length_unit,
    index,
  })
}
