use indexmap::IndexMap;
use swc_core::common::{Span, Spanned};
use swc_core::ecma::ast::{Expr, Prop, PropOrSpread};

use super::items::merge_subsequent_unconditional;
use super::object::build_object;
use super::BuildContext;
use crate::error::{BuildError, BuildResult, StaticConstruct};
use crate::resolve::{prop_name_key, resolve, strip_wrappers};
use crate::types::{CssItem, CssOutput};

#[derive(Clone, Copy, Debug)]
enum VariantTableMessage {
  NumberOfArguments,
  ArgumentType,
  NoSpreadElement,
  NoObjectMethod,
  StaticKey,
  VariantType,
  StaticVariant,
}

impl VariantTableMessage {
  fn message(&self) -> &'static str {
    match self {
      VariantTableMessage::NumberOfArguments => "cssMap function can only receive one argument.",
      VariantTableMessage::ArgumentType => "cssMap function can only receive an object.",
      VariantTableMessage::NoSpreadElement => "Spread element is not supported in CSS Map.",
      VariantTableMessage::NoObjectMethod => "Object method is not supported in CSS Map.",
      VariantTableMessage::StaticKey => "Property key may only be a static string.",
      VariantTableMessage::VariantType => "The variant object must be statically defined.",
      VariantTableMessage::StaticVariant => {
        "The variant object must be statically defined. Each variant may only contain unconditional styles."
      }
    }
  }

  fn error(self, span: Span) -> BuildError {
    BuildError::InvalidVariantTable {
      message: self.message().into(),
      span,
    }
  }
}

/// Build every variant of a `cssMap({ variant: { ...styles } })` call. Each
/// variant must be an object of static styles.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build_variant_table(
  expr: &Expr,
  ctx: &BuildContext<'_>,
) -> BuildResult<IndexMap<String, CssOutput>> {
  let Expr::Call(call) = strip_wrappers(expr) else {
    return Err(VariantTableMessage::ArgumentType.error(expr.span()));
  };
  let [argument] = call.args.as_slice() else {
    return Err(VariantTableMessage::NumberOfArguments.error(call.span));
  };
  if argument.spread.is_some() {
    return Err(VariantTableMessage::ArgumentType.error(argument.expr.span()));
  }

  let resolved = resolve(&argument.expr, &ctx.resolve);
  let Expr::Object(object) = strip_wrappers(&resolved.value) else {
    return Err(VariantTableMessage::ArgumentType.error(argument.expr.span()));
  };
  let table_ctx = ctx
    .with_resolve(resolved.ctx.clone())
    .static_only(StaticConstruct::VariantTable);

  let mut variants = IndexMap::new();
  for prop in &object.props {
    let PropOrSpread::Prop(prop) = prop else {
      return Err(VariantTableMessage::NoSpreadElement.error(prop.span()));
    };
    let (variant, value) = match prop.as_ref() {
      Prop::KeyValue(key_value) => match prop_name_key(&key_value.key, &table_ctx.resolve) {
        Some(variant) => (variant, key_value.value.as_ref().clone()),
        None => return Err(VariantTableMessage::StaticKey.error(key_value.key.span())),
      },
      Prop::Shorthand(ident) => (ident.sym.to_string(), Expr::Ident(ident.clone())),
      other => return Err(VariantTableMessage::NoObjectMethod.error(other.span())),
    };

    let resolved_value = resolve(&value, &table_ctx.resolve);
    let Expr::Object(styles) = strip_wrappers(&resolved_value.value) else {
      return Err(VariantTableMessage::VariantType.error(value.span()));
    };

    let built = build_object(styles, &table_ctx.with_resolve(resolved_value.ctx.clone()))?;
    let css = merge_subsequent_unconditional(built.css);
    if css
      .iter()
      .any(|item| !matches!(item, CssItem::Unconditional { .. } | CssItem::Sheet { .. }))
    {
      return Err(VariantTableMessage::StaticVariant.error(value.span()));
    }

    tracing::trace!(variant = %variant, items = css.len(), "built variant");
    variants.insert(
      variant,
      CssOutput {
        css,
        variables: built.variables,
      },
    );
  }

  Ok(variants)
}
