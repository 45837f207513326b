use super::values::{is_number, is_unitless_zero, is_width, split_value, GLOBAL_VALUES};
use super::Expansion;

const FLEX_BASIS_DEFAULT: &str = "0%";

fn flex_longhands(grow: &str, shrink: &str, basis: &str) -> Expansion {
  Expansion::longhands([
    ("flex-grow", grow),
    ("flex-shrink", shrink),
    ("flex-basis", basis),
  ])
}

fn flex_basis(part: &str) -> Option<&str> {
  if is_unitless_zero(part) {
    Some(FLEX_BASIS_DEFAULT)
  } else if part == "content" || is_width(part) {
    Some(part)
  } else {
    None
  }
}

/// `flex: none | [ <grow> <shrink>? || <basis> ]`.
pub fn flex(value: &str) -> Expansion {
  let parts = match split_value(value) {
    Some(parts) if !parts.is_empty() => parts,
    _ => return Expansion::KeepOriginal,
  };

  match parts.as_slice() {
    ["auto"] => flex_longhands("1", "1", "auto"),
    ["none"] => flex_longhands("0", "0", "auto"),
    ["initial"] => flex_longhands("0", "1", "auto"),
    [keyword] if GLOBAL_VALUES.contains(keyword) => Expansion::KeepOriginal,
    [grow] if is_number(grow) => flex_longhands(grow, "1", FLEX_BASIS_DEFAULT),
    [basis] => match flex_basis(basis) {
      Some(basis) => flex_longhands("1", "1", basis),
      None => Expansion::Discard,
    },
    [grow, shrink] if is_number(grow) && is_number(shrink) => {
      flex_longhands(grow, shrink, FLEX_BASIS_DEFAULT)
    }
    [grow, basis] if is_number(grow) => match flex_basis(basis) {
      Some(basis) => flex_longhands(grow, "1", basis),
      None => Expansion::Discard,
    },
    [grow, shrink, basis] if is_number(grow) && is_number(shrink) => match flex_basis(basis) {
      Some(basis) => flex_longhands(grow, shrink, basis),
      None => Expansion::Discard,
    },
    _ => Expansion::Discard,
  }
}

/// `flex-flow: <direction> || <wrap>`.
pub fn flex_flow(value: &str) -> Expansion {
  let parts = match split_value(value) {
    Some(parts) if (1..=2).contains(&parts.len()) => parts,
    _ => return Expansion::Discard,
  };

  let mut direction = None;
  let mut wrap = None;
  for part in parts {
    let is_global = GLOBAL_VALUES.contains(&part);
    if is_global || matches!(part, "row" | "row-reverse" | "column" | "column-reverse") {
      if direction.replace(part).is_some() {
        return Expansion::Discard;
      }
    } else if matches!(part, "nowrap" | "wrap" | "wrap-reverse") {
      if wrap.replace(part).is_some() {
        return Expansion::Discard;
      }
    } else {
      return Expansion::Discard;
    }
  }

  Expansion::longhands([
    ("flex-direction", direction.unwrap_or("row")),
    ("flex-wrap", wrap.unwrap_or("nowrap")),
  ])
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn expands_single_number() {
    assert_eq!(flex("2"), flex_longhands("2", "1", "0%"));
  }

  #[test]
  fn expands_keywords() {
    assert_eq!(flex("auto"), flex_longhands("1", "1", "auto"));
    assert_eq!(flex("none"), flex_longhands("0", "0", "auto"));
    assert_eq!(flex("initial"), flex_longhands("0", "1", "auto"));
    assert_eq!(flex("unset"), Expansion::KeepOriginal);
  }

  #[test]
  fn expands_basis_forms() {
    assert_eq!(flex("30px"), flex_longhands("1", "1", "30px"));
    assert_eq!(flex("2 30%"), flex_longhands("2", "1", "30%"));
    assert_eq!(flex("2 3"), flex_longhands("2", "3", "0%"));
    assert_eq!(flex("1 0 0"), flex_longhands("1", "0", "0%"));
    assert_eq!(flex("1 0 20px"), flex_longhands("1", "0", "20px"));
  }

  #[test]
  fn discards_invalid_values() {
    assert_eq!(flex("foo bar"), Expansion::Discard);
    assert_eq!(flex("1 2 3 4"), Expansion::Discard);
  }

  #[test]
  fn expands_flex_flow_with_defaults() {
    assert_eq!(
      flex_flow("column"),
      Expansion::longhands([("flex-direction", "column"), ("flex-wrap", "nowrap")])
    );
    assert_eq!(
      flex_flow("wrap row-reverse"),
      Expansion::longhands([("flex-direction", "row-reverse"), ("flex-wrap", "wrap")])
    );
    assert_eq!(flex_flow("row column"), Expansion::Discard);
  }
}
