use crate::types::{CssItem, CssOutput};

/// Merge runs of unconditional items into one item, hoisting sheets to the
/// front. Other items keep their relative order.
pub fn merge_subsequent_unconditional(items: Vec<CssItem>) -> Vec<CssItem> {
  let mut sheets = Vec::new();
  let mut merged: Vec<CssItem> = Vec::new();
  let mut previous_unconditional = false;

  for item in items {
    match item {
      CssItem::Sheet { .. } => sheets.push(item),
      CssItem::Unconditional { css } => {
        if let (true, Some(CssItem::Unconditional { css: last })) =
          (previous_unconditional, merged.last_mut())
        {
          last.push_str(&css);
        } else {
          merged.push(CssItem::Unconditional { css });
        }
        previous_unconditional = true;
      }
      other => {
        merged.push(other);
        previous_unconditional = false;
      }
    }
  }

  sheets.extend(merged);
  sheets
}

/// Property set by a single declaration such as `color: red;`.
fn declared_property(css: &str) -> Option<&str> {
  if css.contains('{') {
    return None;
  }
  let declaration = css.trim().trim_end_matches(';');
  if declaration.contains(';') {
    return None;
  }
  let (property, _) = declaration.split_once(':')?;
  Some(property.trim())
}

/// Merge consecutive unconditional declarations of the same property. Used
/// where a branch has to reduce to a single item.
pub fn merge_same_property_runs(items: Vec<CssItem>) -> Vec<CssItem> {
  let mut merged: Vec<CssItem> = Vec::new();

  for item in items {
    if let (Some(CssItem::Unconditional { css: last }), CssItem::Unconditional { css }) =
      (merged.last_mut(), &item)
    {
      let same = matches!(
        (declared_property(last), declared_property(css)),
        (Some(a), Some(b)) if a == b
      );
      if same {
        last.push_str(css);
        continue;
      }
    }
    merged.push(item);
  }

  merged
}

/// Nest every item of `output` under `selector`.
pub fn to_css_rule(selector: &str, output: CssOutput) -> CssOutput {
  let wrap = |css: String| format!("{selector} {{ {css} }}");
  CssOutput {
    css: output.css.into_iter().map(|item| item.map_css(&wrap)).collect(),
    variables: output.variables,
  }
}

/// Whether an item contributes nothing: no text, or a declaration without a
/// value. Variant table lookups always count.
pub fn is_effectively_empty(item: &CssItem) -> bool {
  match item {
    CssItem::Map { .. } => false,
    CssItem::Conditional {
      consequent,
      alternate,
      ..
    } => is_effectively_empty(consequent) && is_effectively_empty(alternate),
    _ => {
      let css = item.css();
      let trimmed = css.trim();
      if trimmed.is_empty() {
        return true;
      }
      if trimmed.contains('{') {
        return false;
      }
      match trimmed.split_once(':') {
        Some((_, value)) => value.trim().trim_end_matches(';').trim().is_empty(),
        None => false,
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use swc_core::common::DUMMY_SP;
  use swc_core::ecma::ast::{Expr, Invalid};

  use super::*;

  fn sheet(css: &str) -> CssItem {
    CssItem::Sheet { css: css.into() }
  }

  #[test]
  fn merges_runs_and_hoists_sheets() {
    let merged = merge_subsequent_unconditional(vec![
      CssItem::unconditional("color: red;"),
      sheet("@keyframes k1 { }"),
      CssItem::unconditional("font-size: 12px;"),
      CssItem::Map {
        name: "styles".into(),
        expression: Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })),
      },
      CssItem::unconditional("margin: 0;"),
    ]);

    assert_eq!(merged.len(), 4);
    assert_eq!(merged[0], sheet("@keyframes k1 { }"));
    assert_eq!(merged[1], CssItem::unconditional("color: red;font-size: 12px;"));
    assert_eq!(merged[3], CssItem::unconditional("margin: 0;"));
  }

  #[test]
  fn merges_only_same_property_runs() {
    let merged = merge_same_property_runs(vec![
      CssItem::unconditional("color: red;"),
      CssItem::unconditional("color: var(--_x);"),
      CssItem::unconditional("font-size: 12px;"),
    ]);

    assert_eq!(
      merged,
      vec![
        CssItem::unconditional("color: red;color: var(--_x);"),
        CssItem::unconditional("font-size: 12px;"),
      ]
    );
  }

  #[test]
  fn wraps_items_in_rules() {
    let output = to_css_rule(
      ":hover",
      CssOutput::from_item(CssItem::unconditional("color: red;")),
    );
    assert_eq!(output.css, vec![CssItem::unconditional(":hover { color: red; }")]);
  }

  #[test]
  fn detects_empty_declarations() {
    assert!(is_effectively_empty(&CssItem::unconditional("")));
    assert!(is_effectively_empty(&CssItem::unconditional("color: ;")));
    assert!(!is_effectively_empty(&CssItem::unconditional("color: red;")));
    assert!(!is_effectively_empty(&CssItem::unconditional(":hover { color: red; }")));
  }
}
