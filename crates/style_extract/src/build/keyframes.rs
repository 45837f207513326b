use atomic_hash::hash;
use swc_core::common::Spanned;
use swc_core::ecma::ast::Expr;

use super::items::{merge_subsequent_unconditional, to_css_rule};
use super::{build_expr, style_call_of, template, BuildContext};
use crate::error::{BuildError, BuildResult};
use crate::oracle::StyleApi;
use crate::print::print_expression;
use crate::resolve::strip_wrappers;
use crate::types::{CssItem, CssOutput};

pub(super) struct Keyframes {
  pub name: String,
  pub sheet: String,
}

pub(super) fn is_keyframes(expr: &Expr, ctx: &BuildContext<'_>) -> bool {
  style_call_of(expr, ctx) == Some(StyleApi::Keyframes)
}

/// Build a `keyframes()` call or tagged template into an `@keyframes` sheet.
/// The name is derived from the call's source so every use of the same
/// declaration shares one sheet.
pub(super) fn build_keyframes(expr: &Expr, ctx: &BuildContext<'_>) -> BuildResult<Keyframes> {
  let expr = strip_wrappers(expr);
  let name = format!("k{}", hash(&print_expression(expr)));
  let inner_ctx = ctx.keyframes(&name);

  let inner = match expr {
    Expr::Call(call) => {
      let mut output = CssOutput::new();
      for arg in &call.args {
        if arg.spread.is_some() {
          return Err(BuildError::unsupported("SpreadElement", arg.expr.span()));
        }
        output.extend(build_expr(&arg.expr, &inner_ctx)?);
      }
      output
    }
    Expr::TaggedTpl(tagged) => template::build_template(&tagged.tpl, &inner_ctx)?,
    other => build_expr(other, &inner_ctx)?,
  };

  let wrapped = to_css_rule(
    &format!("@keyframes {name}"),
    CssOutput {
      css: merge_subsequent_unconditional(inner.css),
      variables: inner.variables,
    },
  );

  let mut sheet = String::new();
  for item in &wrapped.css {
    match item {
      CssItem::Unconditional { css } => sheet.push_str(css),
      _ => return Err(BuildError::UnexpectedKeyframes { span: expr.span() }),
    }
  }

  tracing::trace!(name = %name, "built keyframes");
  Ok(Keyframes { name, sheet })
}
