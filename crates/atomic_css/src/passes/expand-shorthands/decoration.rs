use super::values::{is_color, is_number, is_width, split_value, GLOBAL_VALUES};
use super::Expansion;

const OUTLINE_STYLES: &[&str] = &[
  "auto", "none", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];
const OUTLINE_SIZES: &[&str] = &["thin", "medium", "thick"];

const DECORATION_STYLES: &[&str] = &["solid", "double", "dotted", "dashed", "wavy"];
const DECORATION_LINES: &[&str] = &["none", "underline", "overline", "line-through", "blink"];

/// `outline: <color> || <style> || <width>`.
pub fn outline(value: &str) -> Expansion {
  let parts = match split_value(value) {
    Some(parts) if (1..=3).contains(&parts.len()) => parts,
    _ => return Expansion::Discard,
  };

  let mut color = None;
  let mut style = None;
  let mut width = None;
  for part in parts {
    let slot = if is_color(part) {
      &mut color
    } else if OUTLINE_SIZES.contains(&part) {
      &mut width
    } else if GLOBAL_VALUES.contains(&part) || OUTLINE_STYLES.contains(&part) {
      &mut style
    } else if is_number(part) || is_width(part) {
      &mut width
    } else {
      return Expansion::Discard;
    };
    if slot.replace(part).is_some() {
      return Expansion::Discard;
    }
  }

  Expansion::longhands([
    ("outline-color", color.unwrap_or("currentColor")),
    ("outline-style", style.unwrap_or("none")),
    ("outline-width", width.unwrap_or("medium")),
  ])
}

/// `text-decoration: <line> || <style> || <color>`.
pub fn text_decoration(value: &str) -> Expansion {
  let parts = match split_value(value) {
    Some(parts) if !parts.is_empty() => parts,
    _ => return Expansion::KeepOriginal,
  };

  let mut color = None;
  let mut style = None;
  let mut lines: Vec<&str> = Vec::new();
  for part in parts.into_iter().take(3) {
    if GLOBAL_VALUES.contains(&part) || DECORATION_LINES.contains(&part) {
      if lines.contains(&part) {
        return Expansion::Discard;
      }
      lines.push(part);
    } else if is_color(part) {
      color = Some(part);
    } else if DECORATION_STYLES.contains(&part) {
      style = Some(part);
    }
  }

  lines.sort_unstable();
  let line = if lines.is_empty() {
    "none".to_string()
  } else {
    lines.join(" ")
  };

  Expansion::longhands([
    ("text-decoration-color", color.unwrap_or("currentColor").to_string()),
    ("text-decoration-line", line),
    ("text-decoration-style", style.unwrap_or("solid").to_string()),
  ])
}

/// Only a lone color is expanded, to `background-color`.
pub fn background(value: &str) -> Expansion {
  match split_value(value).as_deref() {
    Some([color]) if is_color(color) => Expansion::longhands([("background-color", *color)]),
    _ => Expansion::KeepOriginal,
  }
}
