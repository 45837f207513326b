use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{
  ComputedPropName, Expr, FnExpr, IdentName, Lit, MemberExpr, MemberProp, Prop, PropName,
  PropOrSpread,
};

use super::constant_folding::{number_literal, number_to_string, string_literal};
use super::{resolve, resolve_export, resolve_value, strip_wrappers, ResolveContext, Resolved};
use crate::oracle::{Imported, ModuleBinding};

pub(super) fn resolve_member<'a>(member: &MemberExpr, ctx: &ResolveContext<'a>) -> Resolved<'a> {
  resolve_member_path(member, ctx)
    .unwrap_or_else(|| Resolved::unresolved(&Expr::Member(member.clone()), ctx))
}

fn resolve_member_path<'a>(member: &MemberExpr, ctx: &ResolveContext<'a>) -> Option<Resolved<'a>> {
  let key = member_key(&member.prop, ctx)?;
  let object = strip_wrappers(&member.obj);

  if let Expr::Ident(ident) = object {
    if ctx.scope.lookup(&ident.sym).is_none() {
      if let Some(ModuleBinding::Import {
        source,
        imported: Imported::Namespace,
      }) = ctx.oracle.constant_initializer(&ctx.module, &ident.sym)
      {
        return resolve_export(&source, &key, ctx);
      }
    }
  }

  let base = resolve_value(object, ctx);
  lookup_key(&base, &key)
}

/// Static key of a member property.
pub(crate) fn member_key(prop: &MemberProp, ctx: &ResolveContext<'_>) -> Option<String> {
  match prop {
    MemberProp::Ident(ident) => Some(ident.sym.to_string()),
    MemberProp::Computed(computed) => literal_key(&resolve(&computed.expr, ctx).value),
    MemberProp::PrivateName(_) => None,
  }
}

/// Static key of an object property.
pub(crate) fn prop_name_key(name: &PropName, ctx: &ResolveContext<'_>) -> Option<String> {
  match name {
    PropName::Ident(ident) => Some(ident.sym.to_string()),
    PropName::Str(value) => Some(value.value.to_string()),
    PropName::Num(value) => Some(number_to_string(value.value)),
    PropName::BigInt(value) => Some(value.value.to_string()),
    PropName::Computed(computed) => literal_key(&resolve(&computed.expr, ctx).value),
  }
}

fn literal_key(expr: &Expr) -> Option<String> {
  match expr {
    Expr::Lit(Lit::Str(value)) => Some(value.value.to_string()),
    Expr::Lit(Lit::Num(value)) => Some(number_to_string(value.value)),
    _ => None,
  }
}

/// Index an object or array literal. Later properties and spreads win, as
/// they would at runtime.
pub(crate) fn lookup_key<'a>(resolved: &Resolved<'a>, key: &str) -> Option<Resolved<'a>> {
  let ctx = &resolved.ctx;
  match strip_wrappers(&resolved.value) {
    Expr::Object(object) => {
      for prop in object.props.iter().rev() {
        match prop {
          PropOrSpread::Prop(prop) => match prop.as_ref() {
            Prop::KeyValue(key_value)
              if prop_name_key(&key_value.key, ctx).as_deref() == Some(key) =>
            {
              return Some(resolve_value(&key_value.value, ctx));
            }
            Prop::Shorthand(ident) if &*ident.sym == key => {
              return Some(resolve_value(&Expr::Ident(ident.clone()), ctx));
            }
            Prop::Method(method) if prop_name_key(&method.key, ctx).as_deref() == Some(key) => {
              return Some(Resolved::new(
                Expr::Fn(FnExpr {
                  ident: None,
                  function: method.function.clone(),
                }),
                ctx.clone(),
              ));
            }
            _ => {}
          },
          PropOrSpread::Spread(spread) => {
            let inner = resolve_value(&spread.expr, ctx);
            if let Some(found) = lookup_key(&inner, key) {
              return Some(found);
            }
          }
        }
      }
      None
    }
    Expr::Array(array) => {
      if key == "length" && array.elems.iter().flatten().all(|e| e.spread.is_none()) {
        return Some(Resolved::new(
          number_literal(array.elems.len() as f64, DUMMY_SP),
          ctx.clone(),
        ));
      }
      let index: usize = key.parse().ok()?;
      let elements = array.elems.get(..=index)?;
      if elements.iter().flatten().any(|element| element.spread.is_some()) {
        return None;
      }
      let element = elements.last()?.as_ref()?;
      Some(resolve_value(&element.expr, ctx))
    }
    _ => None,
  }
}

fn is_identifier_name(key: &str) -> bool {
  let mut chars = key.chars();
  matches!(chars.next(), Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// `object.key` as an expression, for keys read from values that could not be
/// resolved.
pub(crate) fn member_of(object: Expr, key: &str) -> Expr {
  let prop = if is_identifier_name(key) {
    MemberProp::Ident(IdentName::new(key.into(), DUMMY_SP))
  } else {
    MemberProp::Computed(ComputedPropName {
      span: DUMMY_SP,
      expr: Box::new(string_literal(key, DUMMY_SP)),
    })
  };

  Expr::Member(MemberExpr {
    span: DUMMY_SP,
    obj: Box::new(object),
    prop,
  })
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use super::super::tests::{as_string, graph, resolve_in};
  use super::*;

  #[test]
  fn indexes_objects_by_every_key_kind() {
    let graph = graph(&[(
      "app.tsx",
      indoc! {"
        const key = 'primary';
        const theme = {
          colors: { primary: 'blue', 'secondary-color': 'red' },
          sizes: [4, 8, 16],
          1: 'one',
        };
      "},
    )]);

    assert_eq!(as_string(&resolve_in(&graph, "theme.colors[key]").0), Some("blue".into()));
    assert_eq!(
      as_string(&resolve_in(&graph, "theme.colors['secondary-color']").0),
      Some("red".into())
    );
    assert_eq!(as_string(&resolve_in(&graph, "theme.sizes[2]").0), Some("16".into()));
    assert_eq!(as_string(&resolve_in(&graph, "theme.sizes.length").0), Some("3".into()));
    assert_eq!(as_string(&resolve_in(&graph, "theme[1]").0), Some("one".into()));
  }

  #[test]
  fn later_properties_and_spreads_override() {
    let graph = graph(&[(
      "app.tsx",
      indoc! {"
        const base = { color: 'red', size: 1 };
        const theme = { color: 'green', ...base, size: 2 };
      "},
    )]);

    assert_eq!(as_string(&resolve_in(&graph, "theme.color").0), Some("red".into()));
    assert_eq!(as_string(&resolve_in(&graph, "theme.size").0), Some("2".into()));
  }

  #[test]
  fn leaves_unknown_members_unresolved() {
    let graph = graph(&[("app.tsx", "const theme = { color: 'red' };")]);

    assert!(matches!(resolve_in(&graph, "theme.missing").0, Expr::Member(_)));
    assert!(matches!(resolve_in(&graph, "props.color").0, Expr::Member(_)));
  }

  #[test]
  fn builds_member_expressions_for_opaque_values() {
    let graph = graph(&[]);
    let (value, _) = resolve_in(&graph, "props");

    assert!(matches!(
      member_of(value.clone(), "color"),
      Expr::Member(MemberExpr { prop: MemberProp::Ident(_), .. })
    ));
    assert!(matches!(
      member_of(value, "background-color"),
      Expr::Member(MemberExpr { prop: MemberProp::Computed(_), .. })
    ));
  }
}
