use indexmap::IndexMap;
use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
  ArrayLit, BlockStmt, BlockStmtOrExpr, CallExpr, Callee, Decl, Expr, ExprOrSpread, Ident,
  ObjectPatProp, Pat, ReturnStmt, Stmt,
};

use super::member::{lookup_key, member_of, prop_name_key};
use super::{resolve, resolve_value, strip_wrappers, ResolveContext, Resolved};
use crate::scope::ScopeBinding;

pub(crate) enum FunctionBody<'e> {
  Expr(&'e Expr),
  Block(&'e BlockStmt),
}

/// Parameters and body of an arrow function or function expression.
pub(crate) fn function_parts(expr: &Expr) -> Option<(Vec<&Pat>, FunctionBody<'_>)> {
  match strip_wrappers(expr) {
    Expr::Arrow(arrow) => {
      let body = match arrow.body.as_ref() {
        BlockStmtOrExpr::Expr(expr) => FunctionBody::Expr(expr),
        BlockStmtOrExpr::BlockStmt(block) => FunctionBody::Block(block),
      };
      Some((arrow.params.iter().collect(), body))
    }
    Expr::Fn(function) => {
      let body = function.function.body.as_ref()?;
      Some((
        function.function.params.iter().map(|param| &param.pat).collect(),
        FunctionBody::Block(body),
      ))
    }
    _ => None,
  }
}

fn undefined() -> Expr {
  Expr::Ident(Ident::new("undefined".into(), DUMMY_SP, SyntaxContext::empty()))
}

fn is_undefined(expr: &Expr) -> bool {
  matches!(expr, Expr::Ident(ident) if &*ident.sym == "undefined")
}

fn pattern_names(pattern: &Pat, names: &mut Vec<String>) {
  match pattern {
    Pat::Ident(binding) => names.push(binding.id.sym.to_string()),
    Pat::Assign(assign) => pattern_names(&assign.left, names),
    Pat::Rest(rest) => pattern_names(&rest.arg, names),
    Pat::Array(array) => {
      for element in array.elems.iter().flatten() {
        pattern_names(element, names);
      }
    }
    Pat::Object(object) => {
      for prop in &object.props {
        match prop {
          ObjectPatProp::KeyValue(key_value) => pattern_names(&key_value.value, names),
          ObjectPatProp::Assign(assign) => names.push(assign.key.sym.to_string()),
          ObjectPatProp::Rest(rest) => pattern_names(&rest.arg, names),
        }
      }
    }
    Pat::Expr(_) | Pat::Invalid(_) => {}
  }
}

/// Read `key` from a bound value. Literals are indexed; anything else becomes
/// a member expression on the value.
fn read_key<'a>(value: &Resolved<'a>, key: &str) -> Resolved<'a> {
  match strip_wrappers(&value.value) {
    Expr::Object(_) | Expr::Array(_) => lookup_key(value, key)
      .unwrap_or_else(|| Resolved::new(undefined(), value.ctx.clone())),
    other => Resolved::new(member_of(other.clone(), key), value.ctx.clone()),
  }
}

/// Bind the names in `pattern` to `value`. `None` stands for `undefined`.
/// Defaults are evaluated in `ctx` extended with the bindings made so far.
fn bind_pattern<'a>(
  pattern: &Pat,
  value: Option<Resolved<'a>>,
  bindings: &mut IndexMap<String, ScopeBinding>,
  ctx: &ResolveContext<'a>,
) -> Option<()> {
  let value = value.filter(|value| !is_undefined(&value.value));

  match pattern {
    Pat::Ident(binding) => {
      let bound = value.map(|value| value.value).unwrap_or_else(undefined);
      bindings.insert(binding.id.sym.to_string(), ScopeBinding::Value(bound));
    }
    Pat::Assign(assign) => {
      let value = value.or_else(|| {
        let scope = ctx.scope.child(bindings.clone());
        Some(resolve_value(&assign.right, &ctx.with_scope(scope)))
      });
      bind_pattern(&assign.left, value, bindings, ctx)?;
    }
    Pat::Object(object) => {
      for prop in &object.props {
        match prop {
          ObjectPatProp::KeyValue(key_value) => {
            let key = prop_name_key(&key_value.key, ctx)?;
            let field = value.as_ref().map(|value| read_key(value, &key));
            bind_pattern(&key_value.value, field, bindings, ctx)?;
          }
          ObjectPatProp::Assign(assign) => {
            let field = value
              .as_ref()
              .map(|value| read_key(value, &assign.key.sym))
              .filter(|field| !is_undefined(&field.value))
              .or_else(|| {
                let default = assign.value.as_deref()?;
                let scope = ctx.scope.child(bindings.clone());
                Some(resolve_value(default, &ctx.with_scope(scope)))
              });
            let bound = field.map(|field| field.value).unwrap_or_else(undefined);
            bindings.insert(assign.key.sym.to_string(), ScopeBinding::Value(bound));
          }
          ObjectPatProp::Rest(_) => return None,
        }
      }
    }
    Pat::Array(array) => {
      for (index, element) in array.elems.iter().enumerate() {
        let Some(element) = element else {
          continue;
        };
        if matches!(element, Pat::Rest(_)) {
          return None;
        }
        let item = value.as_ref().map(|value| read_key(value, &index.to_string()));
        bind_pattern(element, item, bindings, ctx)?;
      }
    }
    Pat::Rest(_) | Pat::Expr(_) | Pat::Invalid(_) => return None,
  }
  Some(())
}

fn bind_arguments<'a>(
  params: &[&Pat],
  args: &[ExprOrSpread],
  callee_ctx: &ResolveContext<'a>,
  caller_ctx: &ResolveContext<'a>,
) -> Option<IndexMap<String, ScopeBinding>> {
  if args.iter().any(|arg| arg.spread.is_some()) {
    return None;
  }

  let values: Vec<Resolved<'a>> = args
    .iter()
    .map(|arg| resolve_value(&arg.expr, caller_ctx))
    .collect();

  let mut bindings = IndexMap::new();
  for (index, param) in params.iter().enumerate() {
    if let Pat::Rest(rest) = param {
      let rest_values = values.get(index..).unwrap_or(&[]);
      let array = Expr::Array(ArrayLit {
        span: DUMMY_SP,
        elems: rest_values
          .iter()
          .map(|value| {
            Some(ExprOrSpread {
              spread: None,
              expr: Box::new(value.value.clone()),
            })
          })
          .collect(),
      });
      bind_pattern(
        &rest.arg,
        Some(Resolved::new(array, caller_ctx.clone())),
        &mut bindings,
        callee_ctx,
      )?;
      break;
    }
    bind_pattern(param, values.get(index).cloned(), &mut bindings, callee_ctx)?;
  }
  Some(bindings)
}

/// Value of a function body: the expression body, or the terminal `return` of
/// a block that only declares locals before it.
fn evaluate_body<'a>(body: FunctionBody<'_>, ctx: &ResolveContext<'a>) -> Option<Resolved<'a>> {
  let block = match body {
    FunctionBody::Expr(expr) => return Some(resolve(expr, ctx)),
    FunctionBody::Block(block) => block,
  };

  let (last, statements) = block.stmts.split_last()?;
  let mut ctx = ctx.clone();
  for statement in statements {
    match statement {
      Stmt::Empty(_) => {}
      Stmt::Decl(Decl::Var(var)) => {
        let mut bindings = IndexMap::new();
        for declarator in &var.decls {
          let value = declarator
            .init
            .as_deref()
            .map(|init| resolve_value(init, &ctx));
          bind_pattern(&declarator.name, value, &mut bindings, &ctx)?;
        }
        ctx = ctx.with_scope(ctx.scope.child(bindings));
      }
      _ => return None,
    }
  }

  match last {
    Stmt::Return(ReturnStmt { arg: Some(arg), .. }) => Some(resolve(arg, &ctx)),
    _ => None,
  }
}

/// Reduce a function value to its body, with every parameter opaque.
pub(crate) fn reduce_function(function: Resolved<'_>) -> Resolved<'_> {
  let Some((params, body)) = function_parts(&function.value) else {
    return function.clone();
  };

  let mut names = Vec::new();
  for param in &params {
    pattern_names(param, &mut names);
  }
  let bindings = names
    .into_iter()
    .map(|name| (name, ScopeBinding::Opaque))
    .collect();
  let ctx = function
    .ctx
    .with_scope(function.ctx.scope.child(bindings));

  match evaluate_body(body, &ctx) {
    Some(reduced) => reduced,
    None => function.clone(),
  }
}

pub(super) fn resolve_call<'a>(call: &CallExpr, ctx: &ResolveContext<'a>) -> Resolved<'a> {
  let unresolved = || Resolved::unresolved(&Expr::Call(call.clone()), ctx);
  let Callee::Expr(callee) = &call.callee else {
    return unresolved();
  };

  let function = resolve_value(callee, ctx);
  let Some((params, body)) = function_parts(&function.value) else {
    return unresolved();
  };
  let Some(bindings) = bind_arguments(&params, &call.args, &function.ctx, ctx) else {
    tracing::trace!("call arguments could not be bound");
    return unresolved();
  };

  let body_ctx = function
    .ctx
    .with_scope(function.ctx.scope.child(bindings));
  evaluate_body(body, &body_ctx).unwrap_or_else(unresolved)
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use super::super::tests::{as_string, graph, resolve_in};
  use super::*;

  #[test]
  fn invokes_functions_with_bound_arguments() {
    let graph = graph(&[(
      "app.tsx",
      indoc! {"
        const spacing = (multiplier) => `${multiplier * 8}px`;
        function color({ tone = 'light', palette: { primary } }) {
          const prefix = tone + '-';
          return prefix + primary;
        }
        const sum = (first, ...rest) => first + rest[0] + rest[1];
        const withDefault = (size = 4) => size;
      "},
    )]);

    assert_eq!(as_string(&resolve_in(&graph, "spacing(2)").0), Some("16px".into()));
    assert_eq!(
      as_string(&resolve_in(&graph, "color({ palette: { primary: 'blue' } })").0),
      Some("light-blue".into())
    );
    assert_eq!(as_string(&resolve_in(&graph, "sum(1, 2, 3)").0), Some("6".into()));
    assert_eq!(as_string(&resolve_in(&graph, "withDefault()").0), Some("4".into()));
    assert_eq!(as_string(&resolve_in(&graph, "withDefault(undefined)").0), Some("4".into()));
  }

  #[test]
  fn indexes_into_call_results() {
    let graph = graph(&[("app.tsx", "const theme = () => ({ colors: { primary: 'blue' } });")]);

    assert_eq!(
      as_string(&resolve_in(&graph, "theme().colors.primary").0),
      Some("blue".into())
    );
  }

  #[test]
  fn reduces_uncalled_functions_to_their_body() {
    let graph = graph(&[("app.tsx", "const gap = 4;")]);

    assert_eq!(as_string(&resolve_in(&graph, "() => gap * 2").0), Some("8".into()));
    assert!(matches!(
      resolve_in(&graph, "(props) => props.color").0,
      Expr::Member(_)
    ));
  }

  #[test]
  fn destructures_opaque_arguments_into_member_reads() {
    let graph = graph(&[("app.tsx", "const pick = ({ color }) => color;")]);
    assert!(matches!(resolve_in(&graph, "pick(props)").0, Expr::Member(_)));
  }

  #[test]
  fn leaves_control_flow_and_recursion_unresolved() {
    let graph = graph(&[(
      "app.tsx",
      indoc! {"
        function choose(a) { if (a) { return 'x'; } return 'y'; }
        const loop = (n) => loop(n);
      "},
    )]);

    assert!(matches!(resolve_in(&graph, "choose(true)").0, Expr::Call(_)));
    assert!(matches!(resolve_in(&graph, "loop(1)").0, Expr::Call(_)));
  }
}
