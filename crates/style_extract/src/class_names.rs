//! Turns built CSS items into class name expressions and the sheets behind
//! them.

use indexmap::IndexSet;
use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{CondExpr, Expr, Ident, Lit, ParenExpr, Str};

use crate::error::{BuildError, BuildResult};
use crate::types::{logical, negate, CssItem, LogicalOperator};
use crate::unit::CompilationUnit;

/// Class names to apply at runtime and the sheets they need, each sheet listed
/// once in first use order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformedItems {
  pub class_names: Vec<Expr>,
  pub sheets: Vec<String>,
}

#[derive(Default)]
struct TransformedItem {
  sheets: Vec<String>,
  class_expression: Option<Expr>,
}

fn string_literal(value: String) -> Expr {
  Expr::Lit(Lit::Str(Str {
    span: DUMMY_SP,
    value: value.into(),
    raw: None,
  }))
}

fn undefined() -> Expr {
  Expr::Ident(Ident::new("undefined".into(), DUMMY_SP, Default::default()))
}

/// Class names of `css` as a single space separated literal.
fn class_literal(css: &str, unit: &CompilationUnit) -> BuildResult<TransformedItem> {
  let compiled = unit.compile(css)?;
  let class_name = compiled.class_names.join(" ");
  Ok(TransformedItem {
    sheets: compiled.sheets,
    class_expression: (!class_name.trim().is_empty()).then(|| string_literal(class_name)),
  })
}

fn transform_item(item: &CssItem, unit: &CompilationUnit) -> BuildResult<TransformedItem> {
  match item {
    CssItem::Conditional {
      test,
      consequent,
      alternate,
      guard,
    } => {
      let consequent = transform_item(consequent, unit)?;
      let alternate = transform_item(alternate, unit)?;
      let has_consequent = !consequent.sheets.is_empty();
      let has_alternate = !alternate.sheets.is_empty();

      let (sheets, class_expression) = match (has_consequent, has_alternate) {
        (false, false) => return Ok(TransformedItem::default()),
        (true, false) => (
          consequent.sheets,
          logical(
            LogicalOperator::And,
            (**test).clone(),
            consequent.class_expression.unwrap_or_else(undefined),
          ),
        ),
        (false, true) => (
          alternate.sheets,
          logical(
            LogicalOperator::And,
            negate((**test).clone()),
            alternate.class_expression.unwrap_or_else(undefined),
          ),
        ),
        (true, true) => {
          let mut sheets = consequent.sheets;
          sheets.extend(alternate.sheets);
          let ternary = Expr::Cond(CondExpr {
            span: DUMMY_SP,
            test: test.clone(),
            cons: Box::new(consequent.class_expression.unwrap_or_else(undefined)),
            alt: Box::new(alternate.class_expression.unwrap_or_else(undefined)),
          });
          (sheets, ternary)
        }
      };

      // `&&` binds tighter than `?:`, so the ternary needs its own parens.
      let class_expression = match guard {
        Some(guard) => logical(
          LogicalOperator::And,
          (**guard).clone(),
          Expr::Paren(ParenExpr {
            span: DUMMY_SP,
            expr: Box::new(class_expression),
          }),
        ),
        None => class_expression,
      };

      Ok(TransformedItem {
        sheets,
        class_expression: Some(class_expression),
      })
    }
    CssItem::Logical {
      css,
      expression,
      operator,
    } => {
      let compiled = unit.compile(css)?;
      Ok(TransformedItem {
        sheets: compiled.sheets,
        class_expression: Some(logical(
          *operator,
          (**expression).clone(),
          string_literal(compiled.class_names.join(" ")),
        )),
      })
    }
    CssItem::Map { name, expression } => {
      let Some(table) = unit.variant_table(name) else {
        return Err(BuildError::VariantTableNotDeclared {
          name: name.clone(),
          span: DUMMY_SP,
        });
      };
      Ok(TransformedItem {
        sheets: table.sheets(),
        class_expression: Some((**expression).clone()),
      })
    }
    CssItem::Sheet { css } => Ok(TransformedItem {
      sheets: unit.compile_sheet(css)?,
      class_expression: None,
    }),
    CssItem::Unconditional { css } | CssItem::Reference { css, .. } => class_literal(css, unit),
  }
}

/// Compile every item and register the sheets with `unit`.
#[tracing::instrument(level = "debug", skip_all, fields(items = items.len()))]
pub fn transform_css_items(
  items: &[CssItem],
  unit: &mut CompilationUnit,
) -> BuildResult<TransformedItems> {
  let mut class_names = Vec::new();
  let mut sheets = IndexSet::new();

  for item in items {
    let result = transform_item(item, unit)?;
    let item_sheets: Vec<String> = result
      .sheets
      .into_iter()
      .filter(|sheet| sheet.contains('{'))
      .collect();
    unit.add_sheets(&item_sheets);
    sheets.extend(item_sheets);
    if let Some(class_expression) = result.class_expression {
      class_names.push(class_expression);
    }
  }

  Ok(TransformedItems {
    class_names,
    sheets: sheets.into_iter().collect(),
  })
}
