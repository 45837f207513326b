//! Static evaluation of style expressions.
//!
//! Resolution replaces an expression with the value it provably evaluates to
//! without running the program: constant bindings are substituted, member
//! chains index into object literals, calls bind their arguments and reduce
//! the callee's body, and literal arithmetic is folded. Anything that cannot be
//! proven comes back unchanged; that is never an error here.

use std::fmt;
use std::rc::Rc;

use swc_core::ecma::ast::{Expr, Ident, Lit, UnaryOp};

use crate::oracle::{BindingOracle, Imported, ModuleBinding};
use crate::scope::{Scope, ScopeBinding, Trail};
use crate::types::BindingSource;

mod call;
#[path = "constant-folding.rs"]
mod constant_folding;
mod member;

pub(crate) use call::reduce_function;
pub(crate) use member::prop_name_key;
pub use constant_folding::number_to_string;

/// Nesting limit for bindings resolved through each other.
const MAX_TRAIL: usize = 128;

/// Where an expression is evaluated.
#[derive(Clone)]
pub struct ResolveContext<'a> {
  pub oracle: &'a dyn BindingOracle,
  pub module: Rc<str>,
  pub scope: Scope,
  pub source: BindingSource,
  trail: Trail,
}

impl fmt::Debug for ResolveContext<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ResolveContext")
      .field("module", &self.module)
      .field("scope_depth", &self.scope.depth())
      .field("source", &self.source)
      .field("trail", &self.trail.len())
      .finish()
  }
}

impl<'a> ResolveContext<'a> {
  pub fn new(oracle: &'a dyn BindingOracle, module: impl Into<Rc<str>>) -> Self {
    Self {
      oracle,
      module: module.into(),
      scope: Scope::new(),
      source: BindingSource::Module,
      trail: Trail::default(),
    }
  }

  pub fn with_scope(&self, scope: Scope) -> Self {
    Self {
      scope,
      ..self.clone()
    }
  }

  /// Top level of the same module, keeping the trail.
  fn module_level(&self) -> Self {
    self.with_scope(Scope::new())
  }

  /// Top level of another module. Everything reached from there counts as
  /// imported.
  fn enter_module(&self, module: &str) -> Self {
    Self {
      module: module.into(),
      scope: Scope::new(),
      source: BindingSource::Import,
      ..self.clone()
    }
  }

  fn push_trail(&self, key: String) -> Self {
    Self {
      trail: self.trail.push(key),
      ..self.clone()
    }
  }

  fn exhausted(&self) -> bool {
    self.trail.len() > MAX_TRAIL
  }
}

/// A value together with the context it has to be read in.
#[derive(Clone, Debug)]
pub struct Resolved<'a> {
  pub value: Expr,
  pub source: BindingSource,
  pub ctx: ResolveContext<'a>,
}

impl<'a> Resolved<'a> {
  fn new(value: Expr, ctx: ResolveContext<'a>) -> Self {
    Self {
      value,
      source: ctx.source,
      ctx,
    }
  }

  fn unresolved(expr: &Expr, ctx: &ResolveContext<'a>) -> Self {
    Self::new(expr.clone(), ctx.clone())
  }

  /// Whether the value is a string or number literal.
  pub fn is_literal(&self) -> bool {
    matches!(self.value, Expr::Lit(Lit::Str(_)) | Expr::Lit(Lit::Num(_)))
  }
}

pub(crate) fn strip_wrappers(expr: &Expr) -> &Expr {
  match expr {
    Expr::Paren(paren) => strip_wrappers(&paren.expr),
    Expr::TsAs(ts_as) => strip_wrappers(&ts_as.expr),
    Expr::TsSatisfies(satisfies) => strip_wrappers(&satisfies.expr),
    Expr::TsNonNull(non_null) => strip_wrappers(&non_null.expr),
    Expr::TsConstAssertion(assertion) => strip_wrappers(&assertion.expr),
    Expr::TsTypeAssertion(assertion) => strip_wrappers(&assertion.expr),
    _ => expr,
  }
}

/// Resolve `expr` as far as it can be proven. Functions reduce to the value of
/// their body.
pub fn resolve<'a>(expr: &Expr, ctx: &ResolveContext<'a>) -> Resolved<'a> {
  let resolved = resolve_value(expr, ctx);
  if matches!(resolved.value, Expr::Arrow(_) | Expr::Fn(_)) {
    return reduce_function(resolved);
  }
  resolved
}

/// Like [`resolve`] but functions are kept as values so they can be called or
/// indexed.
pub(crate) fn resolve_value<'a>(expr: &Expr, ctx: &ResolveContext<'a>) -> Resolved<'a> {
  if ctx.exhausted() {
    tracing::debug!(module = %ctx.module, "resolution depth exhausted");
    return Resolved::unresolved(expr, ctx);
  }

  match expr {
    Expr::Paren(_)
    | Expr::TsAs(_)
    | Expr::TsSatisfies(_)
    | Expr::TsNonNull(_)
    | Expr::TsConstAssertion(_)
    | Expr::TsTypeAssertion(_) => resolve_value(strip_wrappers(expr), ctx),
    Expr::Ident(ident) => resolve_identifier(ident, ctx),
    Expr::Member(member) => member::resolve_member(member, ctx),
    Expr::Call(call) => call::resolve_call(call, ctx),
    Expr::Bin(bin) => {
      let left = resolve(&bin.left, ctx);
      let right = resolve(&bin.right, ctx);
      match constant_folding::fold_binary(bin.op, &left.value, &right.value, bin.span) {
        Some(folded) => Resolved::new(folded, ctx.clone()),
        None => Resolved::unresolved(expr, ctx),
      }
    }
    Expr::Unary(unary) if matches!(unary.op, UnaryOp::Minus | UnaryOp::Plus) => {
      let arg = resolve(&unary.arg, ctx);
      match constant_folding::fold_unary(unary.op, &arg.value, unary.span) {
        Some(folded) => Resolved::new(folded, ctx.clone()),
        None => Resolved::unresolved(expr, ctx),
      }
    }
    Expr::Tpl(tpl) => {
      let parts: Vec<Expr> = tpl
        .exprs
        .iter()
        .map(|part| resolve(part, ctx).value)
        .collect();
      match constant_folding::fold_template(tpl, &parts) {
        Some(folded) => Resolved::new(folded, ctx.clone()),
        None => Resolved::unresolved(expr, ctx),
      }
    }
    _ => Resolved::unresolved(expr, ctx),
  }
}

fn resolve_identifier<'a>(ident: &Ident, ctx: &ResolveContext<'a>) -> Resolved<'a> {
  let name = ident.sym.as_ref();
  match ctx.scope.lookup(name) {
    Some(ScopeBinding::Value(value)) => return Resolved::new(value.clone(), ctx.clone()),
    Some(ScopeBinding::Opaque) => return Resolved::new(Expr::Ident(ident.clone()), ctx.clone()),
    None => {}
  }

  let key = Trail::key(&ctx.module, name);
  if ctx.trail.contains(&key) {
    tracing::trace!(name, module = %ctx.module, "cyclic binding left unresolved");
    return Resolved::new(Expr::Ident(ident.clone()), ctx.clone());
  }

  match ctx.oracle.constant_initializer(&ctx.module, name) {
    Some(binding) => resolve_binding(binding, &ctx.push_trail(key))
      .unwrap_or_else(|| Resolved::new(Expr::Ident(ident.clone()), ctx.clone())),
    None => Resolved::new(Expr::Ident(ident.clone()), ctx.clone()),
  }
}

/// Value of a module binding, read from the module it lives in.
pub(crate) fn resolve_binding<'a>(
  binding: ModuleBinding,
  ctx: &ResolveContext<'a>,
) -> Option<Resolved<'a>> {
  match binding {
    ModuleBinding::Constant { init, path } => {
      let mut resolved = resolve_value(&init, &ctx.module_level());
      for key in &path {
        resolved = member::lookup_key(&resolved, key)?;
      }
      Some(resolved)
    }
    ModuleBinding::Import { source, imported } => {
      let export = match imported {
        Imported::Named(name) => name,
        Imported::Default => "default".to_string(),
        Imported::Namespace => return None,
      };
      resolve_export(&source, &export, ctx)
    }
  }
}

/// Value exported from `module` as `export`.
pub(crate) fn resolve_export<'a>(
  module: &str,
  export: &str,
  ctx: &ResolveContext<'a>,
) -> Option<Resolved<'a>> {
  let key = Trail::key(module, &format!("export:{export}"));
  if ctx.trail.contains(&key) {
    return None;
  }

  let binding = ctx.oracle.module_export(module, export)?;
  tracing::trace!(module, export, "following import");
  resolve_binding(binding, &ctx.enter_module(module).push_trail(key))
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::oracle::ModuleGraph;
  use crate::parse::parse_expression;

  pub(crate) fn graph(modules: &[(&str, &str)]) -> ModuleGraph {
    let mut graph = ModuleGraph::new(vec!["@compiled/react".into()]);
    for (id, source) in modules {
      graph.add_source(*id, source).unwrap();
    }
    graph
  }

  pub(crate) fn resolve_in(graph: &ModuleGraph, code: &str) -> (Expr, BindingSource) {
    let ctx = ResolveContext::new(graph, "app.tsx");
    let expr = parse_expression(code).unwrap();
    let resolved = resolve(&expr, &ctx);
    (resolved.value, resolved.source)
  }

  pub(crate) fn as_string(expr: &Expr) -> Option<String> {
    match expr {
      Expr::Lit(Lit::Str(value)) => Some(value.value.to_string()),
      Expr::Lit(Lit::Num(value)) => Some(number_to_string(value.value)),
      _ => None,
    }
  }

  #[test]
  fn resolves_constant_identifiers() {
    let graph = graph(&[("app.tsx", "const primary = 'blue'; const color = primary;")]);
    let (value, source) = resolve_in(&graph, "color");

    assert_eq!(as_string(&value), Some("blue".into()));
    assert_eq!(source, BindingSource::Module);
  }

  #[test]
  fn leaves_unknown_and_reassigned_identifiers() {
    let graph = graph(&[("app.tsx", "let color = 'red'; color = 'blue';")]);

    assert!(matches!(resolve_in(&graph, "color").0, Expr::Ident(_)));
    assert!(matches!(resolve_in(&graph, "props").0, Expr::Ident(_)));
  }

  #[test]
  fn stops_on_cyclic_bindings() {
    let graph = graph(&[("app.tsx", "const a = b; const b = a;")]);
    assert!(matches!(resolve_in(&graph, "a").0, Expr::Ident(_)));
  }

  #[test]
  fn follows_imports_across_modules() {
    let graph = graph(&[
      (
        "app.tsx",
        indoc! {"
          import { primary } from './colors';
          import spacing from './spacing';
          import * as tokens from './tokens';
        "},
      ),
      ("./colors", "const base = 'blue'; export const primary = base;"),
      ("./spacing", "export default 8;"),
      ("./tokens", "export const radius = { small: '3px' };"),
    ]);

    let (value, source) = resolve_in(&graph, "primary");
    assert_eq!(as_string(&value), Some("blue".into()));
    assert_eq!(source, BindingSource::Import);

    assert_eq!(as_string(&resolve_in(&graph, "spacing").0), Some("8".into()));
    assert_eq!(
      as_string(&resolve_in(&graph, "tokens.radius.small").0),
      Some("3px".into())
    );
  }

  #[test]
  fn folds_arithmetic_and_templates() {
    let graph = graph(&[("app.tsx", "const unit = 8; const gap = `${unit * 2}px`;")]);

    assert_eq!(as_string(&resolve_in(&graph, "gap").0), Some("16px".into()));
    assert_eq!(as_string(&resolve_in(&graph, "-unit").0), Some("-8".into()));
    assert_eq!(
      as_string(&resolve_in(&graph, "(unit as number) + 'px'").0),
      Some("8px".into())
    );
  }

  #[test]
  fn resolves_destructured_bindings() {
    let graph = graph(&[(
      "app.tsx",
      "const theme = { colors: { primary: 'blue' } }; const { colors: { primary } } = theme;",
    )]);

    assert_eq!(as_string(&resolve_in(&graph, "primary").0), Some("blue".into()));
  }
}
