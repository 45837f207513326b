use swc_core::common::{Spanned, DUMMY_SP};
use swc_core::ecma::ast::{CondExpr, Expr, Lit, Str, Tpl, TplElement};

use super::conditional::is_css_branch;
use super::css_values::css_affix_interpolation;
use super::items::merge_subsequent_unconditional;
use super::keyframes::{build_keyframes, is_keyframes};
use super::{build_expr, is_empty_value, style_call_of, BuildContext, BuildMode};
use crate::error::BuildResult;
use crate::oracle::StyleApi;
use crate::resolve::{number_to_string, resolve, strip_wrappers, Resolved};
use crate::types::{CssItem, CssOutput, LogicalOperator};

fn quasi(raw: &str, tail: bool) -> TplElement {
  TplElement {
    span: DUMMY_SP,
    tail,
    cooked: Some(raw.into()),
    raw: raw.into(),
  }
}

fn string_literal(value: String, span: swc_core::common::Span) -> Expr {
  Expr::Lit(Lit::Str(Str {
    span,
    value: value.into(),
    raw: None,
  }))
}

/// Prepend `prefix` to the first quasi and append `suffix` to the last.
pub(super) fn recompose_template_literal(tpl: &mut Tpl, prefix: &str, suffix: &str) {
  if let Some(first) = tpl.quasis.first_mut() {
    let raw = format!("{prefix}{}", first.raw);
    *first = TplElement {
      tail: first.tail,
      ..quasi(&raw, false)
    };
  }
  if let Some(last) = tpl.quasis.last_mut() {
    let raw = format!("{}{suffix}", last.raw);
    *last = quasi(&raw, true);
  }
}

/// Text before an interpolation is an unfinished declaration such as
/// `color: `.
fn is_mid_statement(text: &str) -> bool {
  let trimmed = text.trim();
  !trimmed.is_empty() && !trimmed.ends_with([';', '{', '}'])
}

fn distribute_branch(prefix: &str, suffix: &str, branch: &Expr) -> Expr {
  match strip_wrappers(branch) {
    Expr::Lit(Lit::Str(text)) => {
      string_literal(format!("{prefix}{}{suffix}", text.value), branch.span())
    }
    Expr::Lit(Lit::Num(number)) => string_literal(
      format!("{prefix}{}{suffix}", number_to_string(number.value)),
      branch.span(),
    ),
    Expr::Tpl(tpl) => {
      let mut tpl = tpl.clone();
      recompose_template_literal(&mut tpl, prefix, suffix);
      Expr::Tpl(tpl)
    }
    Expr::Cond(cond) => Expr::Cond(distribute_conditional(prefix, suffix, cond)),
    empty if is_empty_value(empty) => string_literal(format!("{prefix}{suffix}"), branch.span()),
    other => Expr::Tpl(Tpl {
      span: DUMMY_SP,
      exprs: vec![Box::new(other.clone())],
      quasis: vec![quasi(prefix, false), quasi(suffix, true)],
    }),
  }
}

fn distribute_conditional(prefix: &str, suffix: &str, cond: &CondExpr) -> CondExpr {
  CondExpr {
    span: cond.span,
    test: cond.test.clone(),
    cons: Box::new(distribute_branch(prefix, suffix, &cond.cons)),
    alt: Box::new(distribute_branch(prefix, suffix, &cond.alt)),
  }
}

/// Move the declaration around a conditional into its branches, so
/// `color: ${a ? 'red' : 'blue'};` becomes `${a ? 'color: red' : 'color: blue'}`.
/// Returns the shortened text on both sides and the rewritten conditional.
fn distribute_declaration(
  before: &str,
  after: &str,
  cond: &CondExpr,
) -> Option<(String, String, CondExpr)> {
  let prefix = before.rsplit([';', '{', '}']).next().unwrap_or_default();
  if prefix.trim().is_empty() {
    return None;
  }
  let end = after.find(';')?;
  let suffix = &after[..end];

  Some((
    before[..before.len() - prefix.len()].to_string(),
    after[end + 1..].to_string(),
    distribute_conditional(prefix, suffix, cond),
  ))
}

/// A value that expands to whole declarations or rules.
fn is_css_block(value: &Expr, ctx: &BuildContext<'_>) -> bool {
  match strip_wrappers(value) {
    Expr::Object(_) | Expr::Tpl(_) | Expr::Array(_) => true,
    Expr::Cond(cond) => is_css_branch(&cond.cons, ctx) || is_css_branch(&cond.alt, ctx),
    Expr::Bin(bin) if LogicalOperator::from_binary_op(bin.op).is_some() => {
      is_css_branch(&bin.right, ctx)
    }
    other => style_call_of(other, ctx) == Some(StyleApi::Css),
  }
}

/// Build a template literal of CSS. Interpolations that can be resolved are
/// inlined, nested style blocks are spliced in and everything else becomes a
/// variable.
pub(super) fn build_template(tpl: &Tpl, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let mut quasis: Vec<String> = tpl.quasis.iter().map(|quasi| quasi.raw.to_string()).collect();
  let mut values: Vec<Resolved<'_>> = tpl
    .exprs
    .iter()
    .map(|expr| resolve(expr, &ctx.resolve))
    .collect();

  for index in 0..values.len() {
    if index + 1 >= quasis.len() || !is_mid_statement(&quasis[index]) {
      continue;
    }
    let distributed = match strip_wrappers(&values[index].value) {
      Expr::Cond(cond) => distribute_declaration(&quasis[index], &quasis[index + 1], cond),
      _ => None,
    };
    if let Some((before, after, cond)) = distributed {
      quasis[index] = before;
      quasis[index + 1] = after;
      values[index].value = Expr::Cond(cond);
    }
  }

  let mut css = Vec::new();
  let mut variables = Vec::new();
  let mut text = String::new();

  for index in 0..quasis.len() {
    let raw = std::mem::take(&mut quasis[index]);
    let Some(resolved) = values.get(index) else {
      text.push_str(&raw);
      continue;
    };
    let value_ctx = ctx.with_resolve(resolved.ctx.clone());
    let value = strip_wrappers(&resolved.value);

    match value {
      Expr::Lit(Lit::Str(literal)) => {
        text.push_str(&raw);
        text.push_str(&literal.value);
        continue;
      }
      Expr::Lit(Lit::Num(number)) => {
        text.push_str(&raw);
        text.push_str(&number_to_string(number.value));
        continue;
      }
      empty if is_empty_value(empty) => {
        text.push_str(&raw);
        continue;
      }
      _ => {}
    }

    if is_css_block(value, &value_ctx) {
      let nested = build_expr(value, &value_ctx.fragment())?;
      text.push_str(&raw);
      if !text.trim().is_empty() {
        css.push(CssItem::unconditional(std::mem::take(&mut text)));
      }
      text.clear();
      css.extend(nested.css);
      variables.extend(nested.variables);
      continue;
    }

    if is_keyframes(value, &value_ctx) {
      let keyframes = build_keyframes(value, &value_ctx)?;
      css.push(CssItem::Sheet {
        css: keyframes.sheet,
      });
      text.push_str(&raw);
      text.push_str(&keyframes.name);
      continue;
    }

    let next = quasis.get(index + 1).map(String::as_str).unwrap_or_default();
    let affixes = css_affix_interpolation(&raw, next);
    if let Some(next) = quasis.get_mut(index + 1) {
      *next = affixes.after;
    }

    let non_empty = |affix: String| (!affix.is_empty()).then_some(affix);
    let variable = ctx.variable(
      &tpl.exprs[index],
      non_empty(affixes.prefix),
      non_empty(affixes.suffix),
    )?;
    text.push_str(&affixes.before);
    text.push_str(&format!("var({})", variable.name));
    variables.push(variable);
  }

  if ctx.mode == BuildMode::Root && is_mid_statement(&text) {
    text.push(';');
  }
  if !text.trim().is_empty() {
    css.push(CssItem::unconditional(text));
  }

  Ok(CssOutput {
    css: merge_subsequent_unconditional(css),
    variables,
  })
}

/// `property: value;` where the value is a conditional.
pub(super) fn build_declaration(
  property: &str,
  value: &Expr,
  ctx: &BuildContext<'_>,
) -> BuildResult<CssOutput> {
  let tpl = Tpl {
    span: value.span(),
    exprs: vec![Box::new(value.clone())],
    quasis: vec![quasi(&format!("{property}:"), false), quasi(";", true)],
  };
  build_template(&tpl, ctx)
}

/// `property: value;` where the value is a template literal.
pub(super) fn build_declaration_template(
  property: &str,
  tpl: &Tpl,
  ctx: &BuildContext<'_>,
) -> BuildResult<CssOutput> {
  let mut tpl = tpl.clone();
  recompose_template_literal(&mut tpl, &format!("{property}:"), ";");
  build_template(&tpl, ctx)
}
