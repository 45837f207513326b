//! Splitting and classifying the space separated parts of a declaration value.

pub const GLOBAL_VALUES: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];

const COLOR_FUNCTIONS: &[&str] = &[
  "rgb", "rgba", "hsl", "hsla", "hwb", "lab", "lch", "color", "oklab", "oklch", "device-cmyk",
];

const WIDTH_UNITS: &[&str] = &[
  "%", "cap", "ch", "cm", "em", "ex", "fr", "ic", "in", "lh", "mm", "pc", "pt", "px", "Q", "rem",
  "rlh", "vb", "vh", "vi", "vmax", "vmin", "vw",
];

const WIDTH_KEYWORDS: &[&str] = &[
  "auto",
  "min-content",
  "max-content",
  "fit-content",
  "inherit",
  "initial",
  "unset",
  "revert",
  "revert-layer",
];

/// Split a value on whitespace that is not inside parentheses or quotes.
/// Returns `None` when the value is a comma separated list.
pub fn split_value(value: &str) -> Option<Vec<&str>> {
  let mut parts = Vec::new();
  let mut depth = 0usize;
  let mut quote: Option<char> = None;
  let mut start: Option<usize> = None;

  for (index, ch) in value.char_indices() {
    match (quote, ch) {
      (Some(open), _) if ch == open => quote = None,
      (Some(_), _) => {}
      (None, '"' | '\'') => quote = Some(ch),
      (None, '(') => depth += 1,
      (None, ')') => depth = depth.saturating_sub(1),
      (None, ',') if depth == 0 => return None,
      (None, ch) if ch.is_whitespace() && depth == 0 => {
        if let Some(begin) = start.take() {
          parts.push(&value[begin..index]);
        }
        continue;
      }
      _ => {}
    }
    if start.is_none() {
      start = Some(index);
    }
  }

  if let Some(begin) = start {
    parts.push(&value[begin..]);
  }
  Some(parts)
}

pub fn contains_var(value: &str) -> bool {
  value.to_ascii_lowercase().contains("var(")
}

fn function_name(part: &str) -> Option<&str> {
  let open = part.find('(')?;
  part.ends_with(')').then(|| &part[..open])
}

/// Split `12.5px` into its number and unit.
fn split_dimension(part: &str) -> Option<(f64, &str)> {
  let end = part
    .char_indices()
    .find(|(index, ch)| {
      !(ch.is_ascii_digit() || *ch == '.' || ((*ch == '-' || *ch == '+') && *index == 0))
    })
    .map(|(index, _)| index)
    .unwrap_or(part.len());
  let number = part[..end].parse().ok()?;
  Some((number, &part[end..]))
}

pub fn is_number(part: &str) -> bool {
  matches!(split_dimension(part), Some((_, "")))
}

pub fn is_unitless_zero(part: &str) -> bool {
  matches!(split_dimension(part), Some((number, "")) if number == 0.0)
}

pub fn is_color(part: &str) -> bool {
  if part.eq_ignore_ascii_case("transparent") || part.eq_ignore_ascii_case("currentcolor") {
    return true;
  }
  if let Some(name) = function_name(part) {
    return COLOR_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str());
  }
  csscolorparser::parse(part).is_ok()
}

pub fn is_width(part: &str) -> bool {
  if WIDTH_KEYWORDS.contains(&part) || function_name(part).is_some() {
    return true;
  }
  matches!(split_dimension(part), Some((_, unit)) if WIDTH_UNITS.contains(&unit))
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn splits_on_top_level_whitespace() {
    assert_eq!(
      split_value("1px  calc(2px + 3px) 'a b'"),
      Some(vec!["1px", "calc(2px + 3px)", "'a b'"])
    );
  }

  #[test]
  fn refuses_comma_lists() {
    assert_eq!(split_value("red, blue"), None);
    assert_eq!(split_value("rgb(0, 0, 0)"), Some(vec!["rgb(0, 0, 0)"]));
  }

  #[test]
  fn classifies_parts() {
    assert!(is_color("red"));
    assert!(is_color("#fff"));
    assert!(is_color("rgba(0, 0, 0, 0.5)"));
    assert!(!is_color("solid"));
    assert!(is_width("10px"));
    assert!(is_width("50%"));
    assert!(is_width("auto"));
    assert!(!is_width("10"));
    assert!(is_number("1.5"));
    assert!(is_unitless_zero("0"));
    assert!(!is_unitless_zero("0px"));
  }
}
