//! Turns a style expression into [`CssOutput`].
//!
//! Every expression goes through [`build_expr`], a single match on its shape.
//! Values that can be proven at build time are resolved and inlined, values
//! that can't become [`Variable`]s, and anything that changes at runtime
//! between whole style blocks becomes a conditional or logical item.

use std::rc::Rc;

use atomic_hash::hash;
use swc_core::common::Spanned;
use swc_core::ecma::ast::{
  ArrayLit, CallExpr, Callee, Expr, Ident, Lit, MemberExpr, TaggedTpl, UnaryOp,
};

use crate::error::{BuildError, BuildResult, StaticConstruct};
use crate::oracle::{ModuleBinding, StyleApi};
use crate::print::print_expression;
use crate::resolve::{resolve, strip_wrappers, ResolveContext};
use crate::types::{BindingSource, CssItem, CssOutput, LogicalOperator, Variable};
use crate::unit::CompilationUnit;

mod conditional;
#[path = "css-values.rs"]
pub mod css_values;
pub mod items;
mod keyframes;
mod object;
mod template;
mod variants;

pub use variants::build_variant_table;

use items::merge_subsequent_unconditional;

/// Where built CSS ends up. Only whole style blocks get a terminating `;`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BuildMode {
  Root,
  Fragment,
  Keyframes,
}

#[derive(Clone, Debug)]
pub struct BuildContext<'a> {
  pub resolve: ResolveContext<'a>,
  unit: Option<&'a CompilationUnit>,
  mode: BuildMode,
  keyframe: Option<Rc<str>>,
  static_only: Option<StaticConstruct>,
}

impl<'a> BuildContext<'a> {
  pub fn new(resolve: ResolveContext<'a>) -> Self {
    Self {
      resolve,
      unit: None,
      mode: BuildMode::Root,
      keyframe: None,
      static_only: None,
    }
  }

  /// Look up variant tables and `css()` declarations in `unit`.
  pub fn with_unit(mut self, unit: &'a CompilationUnit) -> Self {
    self.unit = Some(unit);
    self
  }

  /// Fail on any value that would need a runtime variable.
  pub fn static_only(mut self, construct: StaticConstruct) -> Self {
    self.static_only = Some(construct);
    self
  }

  fn with_resolve(&self, resolve: ResolveContext<'a>) -> Self {
    Self {
      resolve,
      ..self.clone()
    }
  }

  fn fragment(&self) -> Self {
    Self {
      mode: BuildMode::Fragment,
      ..self.clone()
    }
  }

  fn keyframes(&self, name: &str) -> Self {
    Self {
      mode: BuildMode::Keyframes,
      keyframe: Some(name.into()),
      static_only: Some(StaticConstruct::Keyframes),
      ..self.clone()
    }
  }

  fn style_api(&self, callee: &Expr) -> Option<StyleApi> {
    let Expr::Ident(ident) = strip_wrappers(callee) else {
      return None;
    };
    if self.resolve.scope.lookup(&ident.sym).is_some() {
      return None;
    }
    self.resolve.oracle.style_call(&self.resolve.module, &ident.sym)
  }

  /// Custom property standing in for `expr` at runtime.
  fn variable(
    &self,
    expr: &Expr,
    prefix: Option<String>,
    suffix: Option<String>,
  ) -> BuildResult<Variable> {
    if let Some(construct) = self.static_only {
      return Err(BuildError::not_static(construct, expr.span()));
    }
    if self.resolve.source == BindingSource::Import {
      return Err(BuildError::not_static(
        StaticConstruct::ImportedValue,
        expr.span(),
      ));
    }

    let base = match strip_wrappers(expr) {
      Expr::Ident(ident) => ident.sym.to_string(),
      other => print_expression(other),
    };
    let base = match &self.keyframe {
      Some(keyframe) => format!("{keyframe}:{base}"),
      None => base,
    };

    let mut name = format!("--_{}", hash(&base));
    if prefix.as_deref() == Some("-") {
      name.push('-');
    }

    Ok(Variable {
      name,
      expression: expr.clone(),
      prefix,
      suffix,
    })
  }
}

/// Style API invoked by a call or tagged template.
fn style_call_of(expr: &Expr, ctx: &BuildContext<'_>) -> Option<StyleApi> {
  match strip_wrappers(expr) {
    Expr::Call(call) => match &call.callee {
      Callee::Expr(callee) => ctx.style_api(callee),
      _ => None,
    },
    Expr::TaggedTpl(tagged) => ctx.style_api(&tagged.tag),
    _ => None,
  }
}

/// Values that produce no CSS: `null`, `undefined`, `void 0`.
pub(crate) fn is_empty_value(expr: &Expr) -> bool {
  match strip_wrappers(expr) {
    Expr::Lit(Lit::Null(_)) => true,
    Expr::Ident(ident) => &*ident.sym == "undefined",
    Expr::Unary(unary) => unary.op == UnaryOp::Void,
    _ => false,
  }
}

/// Name of the expression kind, as shown in error messages.
pub(crate) fn node_type(expr: &Expr) -> &'static str {
  match expr {
    Expr::Array(_) => "ArrayExpression",
    Expr::Arrow(_) => "ArrowFunctionExpression",
    Expr::Assign(_) => "AssignmentExpression",
    Expr::Await(_) => "AwaitExpression",
    Expr::Bin(bin) if LogicalOperator::from_binary_op(bin.op).is_some() => "LogicalExpression",
    Expr::Bin(_) => "BinaryExpression",
    Expr::Call(_) => "CallExpression",
    Expr::Class(_) => "ClassExpression",
    Expr::Cond(_) => "ConditionalExpression",
    Expr::Fn(_) => "FunctionExpression",
    Expr::Ident(_) => "Identifier",
    Expr::Lit(Lit::Str(_)) => "StringLiteral",
    Expr::Lit(Lit::Num(_)) => "NumericLiteral",
    Expr::Lit(Lit::Bool(_)) => "BooleanLiteral",
    Expr::Lit(Lit::Null(_)) => "NullLiteral",
    Expr::Lit(Lit::Regex(_)) => "RegExpLiteral",
    Expr::Lit(_) => "Literal",
    Expr::Member(_) => "MemberExpression",
    Expr::New(_) => "NewExpression",
    Expr::Object(_) => "ObjectExpression",
    Expr::OptChain(_) => "OptionalMemberExpression",
    Expr::Seq(_) => "SequenceExpression",
    Expr::TaggedTpl(_) => "TaggedTemplateExpression",
    Expr::Tpl(_) => "TemplateLiteral",
    Expr::This(_) => "ThisExpression",
    Expr::Unary(_) => "UnaryExpression",
    Expr::Update(_) => "UpdateExpression",
    Expr::JSXElement(_) | Expr::JSXFragment(_) => "JSXElement",
    _ => "Expression",
  }
}

/// Build the CSS for a style expression.
#[tracing::instrument(level = "debug", skip_all, fields(module = %ctx.resolve.module))]
pub fn build_css(expr: &Expr, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let output = build_expr(expr, ctx)?;

  let mut variables: Vec<Variable> = Vec::with_capacity(output.variables.len());
  for variable in output.variables {
    if !variables.iter().any(|existing| existing.name == variable.name) {
      variables.push(variable);
    }
  }

  let css = merge_subsequent_unconditional(output.css);
  tracing::debug!(items = css.len(), variables = variables.len(), "built css");
  Ok(CssOutput { css, variables })
}

pub(crate) fn build_expr(expr: &Expr, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  tracing::trace!(node = node_type(expr), "building expression");

  match strip_wrappers(expr) {
    Expr::Object(object) => object::build_object(object, ctx),
    Expr::Lit(Lit::Str(value)) => Ok(CssOutput::from_item(CssItem::unconditional(
      value.value.as_ref(),
    ))),
    Expr::Lit(Lit::Bool(value)) if !value.value => Ok(CssOutput::new()),
    Expr::Tpl(tpl) => template::build_template(tpl, ctx),
    Expr::TaggedTpl(tagged) => build_tagged_template(tagged, ctx),
    Expr::Array(array) => build_array(array, ctx),
    Expr::Cond(cond) => conditional::build_conditional(cond, ctx),
    Expr::Bin(bin) if LogicalOperator::from_binary_op(bin.op).is_some() => {
      conditional::build_logical(bin, ctx)
    }
    Expr::Ident(ident) => build_identifier(ident, ctx),
    Expr::Member(member) => build_member(member, ctx),
    Expr::Call(call) => build_call(call, ctx),
    other if is_empty_value(other) => Ok(CssOutput::new()),
    other => build_resolved(other, ctx),
  }
}

/// Resolve `expr` and build whatever it reduces to.
fn build_resolved(expr: &Expr, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let resolved = resolve(expr, &ctx.resolve);
  if resolved.value == *expr {
    return Err(BuildError::unsupported(node_type(expr), expr.span()));
  }
  build_expr(&resolved.value, &ctx.with_resolve(resolved.ctx))
}

fn reference(name: &str, declaration: &CssOutput) -> CssOutput {
  let static_items = declaration
    .css
    .iter()
    .all(|item| matches!(item, CssItem::Unconditional { .. } | CssItem::Sheet { .. }));
  if !static_items {
    return declaration.clone();
  }

  let mut css = Vec::new();
  let mut text = String::new();
  for item in &declaration.css {
    match item {
      CssItem::Sheet { .. } => css.push(item.clone()),
      other => text.push_str(&other.css()),
    }
  }
  css.push(CssItem::Reference {
    reference: name.to_string(),
    css: text,
  });

  CssOutput {
    css,
    variables: declaration.variables.clone(),
  }
}

fn build_identifier(ident: &Ident, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let name = ident.sym.as_ref();

  if ctx.resolve.scope.lookup(name).is_none() && ctx.resolve.source == BindingSource::Module {
    if let Some(unit) = ctx.unit {
      if unit.variant_table(name).is_some() {
        return Err(BuildError::InvalidVariantTable {
          message: format!(
            "cssMap `{name}` must be used with a variant, for example `{name}[variant]`"
          ),
          span: ident.span,
        });
      }
      if let Some(declaration) = unit.declaration(name) {
        return Ok(reference(name, declaration));
      }
    }
  }

  let expr = Expr::Ident(ident.clone());
  let resolved = resolve(&expr, &ctx.resolve);
  if resolved.value == expr {
    return Err(BuildError::UnresolvedIdentifier {
      name: name.to_string(),
      span: ident.span,
    });
  }

  build_expr(&resolved.value, &ctx.with_resolve(resolved.ctx))
}

/// `Map` item for a member read from a declared variant table.
fn variant_table_lookup(
  member: &MemberExpr,
  ctx: &BuildContext<'_>,
) -> BuildResult<Option<CssOutput>> {
  let Expr::Ident(root) = strip_wrappers(&member.obj) else {
    return Ok(None);
  };
  let name = root.sym.as_ref();
  if ctx.resolve.scope.lookup(name).is_some() {
    return Ok(None);
  }

  if ctx.unit.and_then(|unit| unit.variant_table(name)).is_some() {
    return Ok(Some(CssOutput::from_item(CssItem::Map {
      name: name.to_string(),
      expression: Box::new(Expr::Member(member.clone())),
    })));
  }

  if let Some(ModuleBinding::Constant { init, path }) = ctx
    .resolve
    .oracle
    .constant_initializer(&ctx.resolve.module, name)
  {
    if let (Expr::Call(call), true) = (strip_wrappers(&init), path.is_empty()) {
      if let Callee::Expr(callee) = &call.callee {
        if ctx.style_api(callee) == Some(StyleApi::CssMap) {
          return Err(BuildError::VariantTableNotDeclared {
            name: name.to_string(),
            span: member.span,
          });
        }
      }
    }
  }

  Ok(None)
}

fn build_member(member: &MemberExpr, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  if let Some(lookup) = variant_table_lookup(member, ctx)? {
    return Ok(lookup);
  }
  build_resolved(&Expr::Member(member.clone()), ctx)
}

fn build_call(call: &CallExpr, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let api = match &call.callee {
    Callee::Expr(callee) => ctx.style_api(callee),
    _ => None,
  };

  match api {
    Some(StyleApi::Css) => {
      let mut output = CssOutput::new();
      for arg in &call.args {
        if arg.spread.is_some() {
          return Err(BuildError::unsupported("SpreadElement", arg.expr.span()));
        }
        output.extend(build_expr(&arg.expr, ctx)?);
      }
      Ok(output)
    }
    Some(StyleApi::Keyframes) => Err(BuildError::unsupported("keyframes()", call.span)),
    Some(StyleApi::CssMap) => Err(BuildError::InvalidVariantTable {
      message: "cssMap() must be assigned to a variable at the top level of the module".into(),
      span: call.span,
    }),
    None => build_resolved(&Expr::Call(call.clone()), ctx),
  }
}

fn build_tagged_template(tagged: &TaggedTpl, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  match ctx.style_api(&tagged.tag) {
    Some(StyleApi::Css) => template::build_template(&tagged.tpl, ctx),
    _ => Err(BuildError::unsupported("TaggedTemplateExpression", tagged.span)),
  }
}

fn build_array(array: &ArrayLit, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let mut output = CssOutput::new();

  for element in &array.elems {
    let Some(element) = element else {
      return Err(BuildError::unsupported("empty array slot", array.span));
    };

    if element.spread.is_some() {
      let resolved = resolve(&element.expr, &ctx.resolve);
      let Expr::Array(spread) = strip_wrappers(&resolved.value) else {
        return Err(BuildError::unsupported("SpreadElement", element.expr.span()));
      };
      output.extend(build_array(spread, &ctx.with_resolve(resolved.ctx.clone()))?);
      continue;
    }

    output.extend(build_expr(&element.expr, ctx)?);
  }

  Ok(output)
}

#[cfg(test)]
pub(crate) mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::oracle::ModuleGraph;
  use crate::parse::parse_expression;

  pub(crate) fn graph(source: &str) -> ModuleGraph {
    let mut graph = ModuleGraph::new(vec!["@compiled/react".into()]);
    graph.add_source("app.tsx", source).unwrap();
    graph
  }

  pub(crate) fn build_in(graph: &ModuleGraph, code: &str) -> BuildResult<CssOutput> {
    let ctx = BuildContext::new(ResolveContext::new(graph, "app.tsx"));
    build_css(&parse_expression(code).unwrap(), &ctx)
  }

  pub(crate) fn build(code: &str) -> BuildResult<CssOutput> {
    build_in(&graph(""), code)
  }

  pub(crate) fn css_of(output: &CssOutput) -> Vec<String> {
    output.css.iter().map(CssItem::css).collect()
  }

  #[test]
  fn builds_strings_and_arrays_in_order() {
    let output = build("['color: red;', { fontSize: 12 }, false, null]").unwrap();
    assert_eq!(css_of(&output), vec!["color: red;font-size: 12px;"]);
  }

  #[test]
  fn spreads_resolvable_arrays() {
    let graph = graph("const base = ['color: red;'];");
    let output = build_in(&graph, "[...base, 'margin: 0;']").unwrap();
    assert_eq!(css_of(&output), vec!["color: red;margin: 0;"]);

    let error = build("[...props.styles]").unwrap_err();
    assert!(matches!(error, BuildError::UnsupportedExpression { node: "SpreadElement", .. }));
  }

  #[test]
  fn resolves_identifiers_and_css_calls() {
    let graph = graph(indoc! {"
      import { css } from '@compiled/react';
      const base = css({ color: 'red' });
      const other = { margin: 0 };
    "});

    let output = build_in(&graph, "[base, other]").unwrap();
    assert_eq!(css_of(&output), vec!["color: red;margin: 0;"]);
  }

  #[test]
  fn reports_unresolved_identifiers() {
    let error = build("styles").unwrap_err();
    assert_eq!(error.to_string(), "Variable `styles` could not be found");
  }

  #[test]
  fn reports_unsupported_shapes() {
    let error = build("new Styles()").unwrap_err();
    assert_eq!(
      error.to_string(),
      "This NewExpression was unable to have its styles extracted, try using an object or string"
    );
    assert!(matches!(
      build("[, 'color: red;']").unwrap_err(),
      BuildError::UnsupportedExpression { node: "empty array slot", .. }
    ));
  }

  #[test]
  fn refuses_variables_from_imported_styles() {
    let mut graph = graph("import { styles } from './styles';");
    graph
      .add_source("./styles", "export const styles = { color: props.color };")
      .unwrap();

    let error = build_in(&graph, "styles").unwrap_err();
    assert_eq!(
      error.to_string(),
      "Imported value contains values that can't be statically evaluated"
    );
  }

  #[test]
  fn builds_imported_static_styles() {
    let mut graph = graph("import { styles } from './styles';");
    graph
      .add_source("./styles", "const red = 'red'; export const styles = { color: red };")
      .unwrap();

    let output = build_in(&graph, "styles").unwrap();
    assert_eq!(css_of(&output), vec!["color: red;"]);
  }

  #[test]
  fn names_variables_after_their_expression() {
    let ctx_graph = graph("");
    let ctx = BuildContext::new(ResolveContext::new(&ctx_graph, "app.tsx"));
    let expr = parse_expression("props.color").unwrap();
    let variable = ctx.variable(&expr, Some("-".into()), None).unwrap();

    assert_eq!(variable.name, format!("--_{}-", hash("props.color")));
    assert_eq!(variable.prefix.as_deref(), Some("-"));
  }
}
