use swc_core::common::{Spanned, DUMMY_SP};
use swc_core::ecma::ast::{Expr, Lit, ObjectLit, Prop, PropName, PropOrSpread};

use super::conditional::{build_conditional, has_css_branches, is_css_branch};
use super::css_values::{add_unit_if_needed, css_property_name, normalize_content_value};
use super::items::to_css_rule;
use super::keyframes::{build_keyframes, is_keyframes};
use super::{build_expr, is_empty_value, node_type, style_call_of, template, BuildContext};
use crate::error::{BuildError, BuildResult};
use crate::oracle::StyleApi;
use crate::resolve::{prop_name_key, resolve, strip_wrappers};
use crate::types::{CssItem, CssOutput, LogicalOperator};

fn declaration(property: &str, value: &str) -> CssOutput {
  CssOutput::from_item(CssItem::unconditional(format!("{property}: {value};")))
}

fn property_key(name: &PropName, ctx: &BuildContext<'_>) -> BuildResult<String> {
  match prop_name_key(name, &ctx.resolve) {
    Some(key) => Ok(key),
    None => match name {
      PropName::Computed(computed) => Err(BuildError::unsupported(
        node_type(&computed.expr),
        computed.span,
      )),
      _ => Err(BuildError::unsupported("ObjectProperty", DUMMY_SP)),
    },
  }
}

/// Items of an object literal in source order, one per property. Items are
/// left unmerged so a conditional branch can tell how many values it sets.
pub(super) fn build_object(object: &ObjectLit, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let mut output = CssOutput::new();

  for prop in &object.props {
    match prop {
      PropOrSpread::Spread(spread) => output.extend(build_expr(&spread.expr, ctx)?),
      PropOrSpread::Prop(prop) => match prop.as_ref() {
        Prop::KeyValue(key_value) => {
          let key = property_key(&key_value.key, ctx)?;
          output.extend(build_property(&key, &key_value.value, ctx)?);
        }
        Prop::Shorthand(ident) => {
          output.extend(build_property(&ident.sym, &Expr::Ident(ident.clone()), ctx)?);
        }
        other => {
          tracing::debug!(span = ?other.span(), "skipping object member without a value");
        }
      },
    }
  }

  Ok(output)
}

fn build_property(key: &str, value: &Expr, ctx: &BuildContext<'_>) -> BuildResult<CssOutput> {
  let property = css_property_name(key);
  let resolved = resolve(value, &ctx.resolve);
  let value_ctx = ctx.with_resolve(resolved.ctx.clone());

  match strip_wrappers(&resolved.value) {
    Expr::Lit(Lit::Str(text)) => {
      let text = if property == "content" {
        normalize_content_value(&text.value)
      } else {
        text.value.to_string()
      };
      Ok(declaration(&property, &text))
    }
    Expr::Lit(Lit::Num(number)) => Ok(declaration(
      &property,
      &add_unit_if_needed(key, number.value),
    )),
    empty if is_empty_value(empty) => Ok(CssOutput::new()),
    Expr::Object(_) | Expr::Array(_) => {
      Ok(to_css_rule(key, build_expr(&resolved.value, &value_ctx)?))
    }
    Expr::Bin(bin)
      if LogicalOperator::from_binary_op(bin.op).is_some()
        && is_css_branch(&bin.right, &value_ctx) =>
    {
      Ok(to_css_rule(key, build_expr(&resolved.value, &value_ctx)?))
    }
    Expr::Cond(cond) if has_css_branches(cond, &value_ctx) => {
      Ok(to_css_rule(key, build_conditional(cond, &value_ctx)?))
    }
    Expr::Cond(_) => template::build_declaration(&property, &resolved.value, &value_ctx),
    Expr::Tpl(tpl) => template::build_declaration_template(&property, tpl, &value_ctx),
    keyframes if is_keyframes(keyframes, &value_ctx) => {
      let keyframes = build_keyframes(keyframes, &value_ctx)?;
      let mut output = CssOutput::from_item(CssItem::Sheet {
        css: keyframes.sheet,
      });
      output.extend(declaration(&property, &keyframes.name));
      Ok(output)
    }
    call if style_call_of(call, &value_ctx) == Some(StyleApi::Css) => {
      Ok(to_css_rule(key, build_expr(call, &value_ctx)?))
    }
    _ => {
      let variable = ctx.variable(value, None, None)?;
      let mut output = declaration(&property, &format!("var({})", variable.name));
      output.variables.push(variable);
      Ok(output)
    }
  }
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use atomic_css::{compile_atomic_css, CompileOptions};

  use super::super::tests::{build, build_in, css_of, graph};
  use crate::types::CssItem;

  #[test]
  fn builds_declarations_with_units() {
    let output = build("{ color: 'red', fontSize: 12, lineHeight: 1.5, margin: 0 }").unwrap();
    assert_eq!(
      css_of(&output),
      vec!["color: red;font-size: 12px;line-height: 1.5;margin: 0;"]
    );
    assert!(output.variables.is_empty());
  }

  #[test]
  fn quotes_content_values() {
    let output = build("{ content: '', '&::after': { content: 'hi' } }").unwrap();
    assert_eq!(
      css_of(&output),
      vec!["content: \"\";&::after { content: \"hi\"; }"]
    );
  }

  #[test]
  fn nests_selectors_and_at_rules() {
    let output = build(indoc! {"
      {
        ':hover': { color: 'red' },
        '@media (min-width: 500px)': { ':focus': { color: 'blue' } },
      }
    "})
    .unwrap();

    assert_eq!(
      css_of(&output),
      vec![":hover { color: red; }@media (min-width: 500px) { :focus { color: blue; } }"]
    );
  }

  #[test]
  fn fractional_numbers_match_their_string_form() {
    assert_eq!(
      css_of(&build("{ opacity: 0.5 }").unwrap()),
      css_of(&build("'opacity: 0.5;'").unwrap())
    );
  }

  #[test]
  fn type_selector_keys_survive_compilation() {
    let output = build("{ div: { color: 'red' }, margin: 0 }").unwrap();
    let css = css_of(&output);
    assert_eq!(css, vec!["div { color: red; }margin: 0;"]);

    let compiled = compile_atomic_css(&css[0], &CompileOptions::default()).unwrap();
    assert_eq!(compiled.class_names.len(), 5);
    assert!(compiled
      .sheets
      .iter()
      .any(|sheet| sheet.ends_with(" div{color:red}")));
  }

  #[test]
  fn resolves_values_and_computed_keys() {
    let graph = graph(indoc! {"
      const gap = 4;
      const hover = ':hover';
      const colors = { primary: 'blue' };
    "});

    let output = build_in(
      &graph,
      "{ padding: gap * 2, [hover]: { color: colors.primary }, ...{ margin: gap } }",
    )
    .unwrap();

    assert_eq!(
      css_of(&output),
      vec!["padding: 8px;:hover { color: blue; }margin: 4px;"]
    );
  }

  #[test]
  fn skips_empty_values() {
    let output = build("{ color: null, margin: undefined, padding: 0 }").unwrap();
    assert_eq!(css_of(&output), vec!["padding: 0;"]);
  }

  #[test]
  fn turns_dynamic_values_into_variables() {
    let output = build("{ color: props.color, '--gap': props.gap }").unwrap();

    assert_eq!(output.variables.len(), 2);
    let color = &output.variables[0];
    let gap = &output.variables[1];
    assert_eq!(
      css_of(&output),
      vec![format!(
        "color: var({});--gap: var({});",
        color.name, gap.name
      )]
    );
    assert_ne!(color.name, gap.name);
  }

  #[test]
  fn value_conditionals_become_conditional_declarations() {
    let output = build("{ color: isPrimary ? 'blue' : 'red' }").unwrap();

    assert_eq!(output.css.len(), 1);
    let CssItem::Conditional {
      consequent,
      alternate,
      ..
    } = &output.css[0]
    else {
      panic!("expected a conditional item, got {:?}", output.css[0]);
    };
    assert_eq!(consequent.css(), "color:blue");
    assert_eq!(alternate.css(), "color:red");
  }

  #[test]
  fn block_conditionals_nest_under_their_key() {
    let output = build("{ ':hover': isPrimary ? { color: 'blue' } : null }").unwrap();

    assert_eq!(output.css.len(), 1);
    let CssItem::Logical { css, .. } = &output.css[0] else {
      panic!("expected a logical item, got {:?}", output.css[0]);
    };
    assert_eq!(css, ":hover { color: blue; }");
  }

  #[test]
  fn keyframes_values_emit_sheets() {
    let graph = graph(indoc! {"
      import { keyframes } from '@compiled/react';
      const fadeIn = keyframes({ from: { opacity: 0 }, to: { opacity: 1 } });
    "});

    let output = build_in(&graph, "{ animationName: fadeIn }").unwrap();
    assert_eq!(output.css.len(), 2);

    let CssItem::Sheet { css: sheet } = &output.css[0] else {
      panic!("expected a sheet first, got {:?}", output.css[0]);
    };
    let name = sheet
      .strip_prefix("@keyframes ")
      .and_then(|rest| rest.split_whitespace().next())
      .unwrap();
    assert!(name.starts_with('k'));
    assert_eq!(
      sheet,
      &format!("@keyframes {name} {{ from {{ opacity: 0; }}to {{ opacity: 1; }} }}")
    );
    assert_eq!(output.css[1].css(), format!("animation-name: {name};"));
  }
}
