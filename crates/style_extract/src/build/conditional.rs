use swc_core::common::Spanned;
use swc_core::ecma::ast::{BinExpr, CondExpr, Expr, Lit};

use super::items::{is_effectively_empty, merge_same_property_runs, merge_subsequent_unconditional};
use super::object::build_object;
use super::{build_expr, is_empty_value, style_call_of, BuildContext};
use crate::error::{BuildError, BuildResult};
use crate::oracle::StyleApi;
use crate::resolve::{number_to_string, resolve, strip_wrappers};
use crate::types::{logical, negate, CssItem, CssOutput, LogicalOperator};

/// Whether `expr` reads as a block of CSS rather than a single value.
pub(super) fn is_css_branch(expr: &Expr, ctx: &BuildContext<'_>) -> bool {
  let resolved = resolve(expr, &ctx.resolve);
  let branch_ctx = ctx.with_resolve(resolved.ctx.clone());

  match strip_wrappers(&resolved.value) {
    Expr::Object(_) | Expr::Array(_) => true,
    Expr::Lit(Lit::Str(text)) => text.value.contains(':'),
    Expr::Tpl(tpl) => tpl.quasis.iter().any(|quasi| quasi.raw.contains(':')),
    Expr::Cond(cond) => has_css_branches(cond, &branch_ctx),
    Expr::Bin(bin) if LogicalOperator::from_binary_op(bin.op).is_some() => {
      is_css_branch(&bin.right, &branch_ctx)
    }
    Expr::Member(member) => match (strip_wrappers(&member.obj), branch_ctx.unit) {
      (Expr::Ident(root), Some(unit)) => unit.variant_table(&root.sym).is_some(),
      _ => false,
    },
    value => style_call_of(value, &branch_ctx) == Some(StyleApi::Css),
  }
}

pub(super) fn has_css_branches(cond: &CondExpr, ctx: &BuildContext<'_>) -> bool {
  is_css_branch(&cond.cons, ctx) || is_css_branch(&cond.alt, ctx)
}

/// Put `item` behind `left <operator>`. The item applies only when the
/// right-hand side of that expression would be evaluated.
pub(super) fn gate(item: CssItem, left: &Expr, operator: LogicalOperator) -> CssItem {
  match item {
    CssItem::Unconditional { css } | CssItem::Reference { css, .. } => {
      CssItem::logical(css, left.clone(), operator)
    }
    CssItem::Logical {
      css,
      expression,
      operator: LogicalOperator::And,
    } => CssItem::logical(
      css,
      logical(LogicalOperator::And, operator.applies_when(left.clone()), *expression),
      LogicalOperator::And,
    ),
    CssItem::Logical {
      css,
      expression,
      operator: inner,
    } => CssItem::logical(css, logical(operator, left.clone(), *expression), inner),
    CssItem::Conditional {
      test,
      consequent,
      alternate,
      guard,
    } => {
      let condition = operator.applies_when(left.clone());
      let guard = match guard {
        Some(existing) => logical(LogicalOperator::And, condition, *existing),
        None => condition,
      };
      CssItem::Conditional {
        test,
        consequent,
        alternate,
        guard: Some(Box::new(guard)),
      }
    }
    CssItem::Map { name, expression } => CssItem::Map {
      name,
      expression: Box::new(logical(operator, left.clone(), *expression)),
    },
    sheet @ CssItem::Sheet { .. } => sheet,
  }
}

/// A branch reduces to at most one item. Sheets travel separately since they
/// apply either way.
fn build_branch(
  expr: &Expr,
  ctx: &BuildContext<'_>,
  output: &mut CssOutput,
) -> BuildResult<Option<CssItem>> {
  let resolved = resolve(expr, &ctx.resolve);
  let branch_ctx = ctx.with_resolve(resolved.ctx.clone());

  let items = match strip_wrappers(&resolved.value) {
    Expr::Lit(Lit::Str(text)) => vec![CssItem::unconditional(text.value.as_ref())],
    Expr::Lit(Lit::Num(number)) => vec![CssItem::unconditional(number_to_string(number.value))],
    Expr::Lit(Lit::Bool(_)) => return Ok(None),
    empty if is_empty_value(empty) => return Ok(None),
    Expr::Object(object) => {
      let built = build_object(object, &branch_ctx.fragment())?;
      output.variables.extend(built.variables);
      merge_same_property_runs(built.css)
    }
    value => {
      let built = build_expr(value, &branch_ctx.fragment())?;
      output.variables.extend(built.variables);
      merge_subsequent_unconditional(built.css)
    }
  };

  let (sheets, mut rest): (Vec<_>, Vec<_>) = items
    .into_iter()
    .partition(|item| matches!(item, CssItem::Sheet { .. }));
  output.css.extend(sheets);

  if rest.len() > 1 {
    return Err(BuildError::ConditionalArity { span: expr.span() });
  }
  Ok(rest.pop().filter(|item| !is_effectively_empty(item)))
}

/// `test ? a : b` where each side is a style block or a literal.
pub(super) fn build_conditional(cond: &CondExpr, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let mut output = CssOutput::new();
  let consequent = build_branch(&cond.cons, ctx, &mut output)?;
  let alternate = build_branch(&cond.alt, ctx, &mut output)?;
  let test = strip_wrappers(&cond.test).clone();

  match (consequent, alternate) {
    (Some(consequent), Some(alternate)) => output.css.push(CssItem::Conditional {
      test: Box::new(test),
      consequent: Box::new(consequent),
      alternate: Box::new(alternate),
      guard: None,
    }),
    (Some(consequent), None) => output.css.push(gate(consequent, &test, LogicalOperator::And)),
    (None, Some(alternate)) => {
      output
        .css
        .push(gate(alternate, &negate(test), LogicalOperator::And))
    }
    (None, None) => {}
  }

  Ok(output)
}

/// `left && styles`, `left || styles` and `left ?? styles`.
pub(super) fn build_logical(bin: &BinExpr, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let Some(operator) = LogicalOperator::from_binary_op(bin.op) else {
    return Err(BuildError::unsupported("BinaryExpression", bin.span));
  };

  let right = build_expr(&bin.right, ctx)?;
  let left = strip_wrappers(&bin.left).clone();

  Ok(CssOutput {
    css: merge_subsequent_unconditional(right.css)
      .into_iter()
      .map(|item| gate(item, &left, operator))
      .collect(),
    variables: right.variables,
  })
}
