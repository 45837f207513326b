//! Per-module compilation state.

use atomic_css::{compile_atomic_css, compile_stylesheet, compress_class_names};
use indexmap::{IndexMap, IndexSet};
use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{Expr, KeyValueProp, Lit, ObjectLit, Prop, PropName, PropOrSpread, Str};

use crate::build::{build_css, build_variant_table, BuildContext};
use crate::cache::StyleCache;
use crate::class_names::{transform_css_items, TransformedItems};
use crate::error::{BuildResult, StaticConstruct};
use crate::options::ExtractOptions;
use crate::oracle::BindingOracle;
use crate::resolve::ResolveContext;
use crate::types::{CssItem, CssOutput};

/// Compiled class names and sheets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledClasses {
  pub class_names: Vec<String>,
  pub sheets: Vec<String>,
}

/// A variant table declared with `cssMap()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariantTable {
  pub variants: IndexMap<String, CompiledClasses>,
}

impl VariantTable {
  /// Sheets of every variant, without duplicates.
  pub fn sheets(&self) -> Vec<String> {
    let sheets: IndexSet<&String> = self
      .variants
      .values()
      .flat_map(|variant| variant.sheets.iter())
      .collect();
    sheets.into_iter().cloned().collect()
  }

  /// The object literal that replaces the `cssMap()` call: every variant
  /// mapped to its class names.
  pub fn class_name_object(&self) -> Expr {
    Expr::Object(ObjectLit {
      span: DUMMY_SP,
      props: self
        .variants
        .iter()
        .map(|(variant, classes)| {
          PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
            key: PropName::Str(Str {
              span: DUMMY_SP,
              value: variant.as_str().into(),
              raw: None,
            }),
            value: Box::new(Expr::Lit(Lit::Str(Str {
              span: DUMMY_SP,
              value: classes.class_names.join(" ").into(),
              raw: None,
            }))),
          })))
        })
        .collect(),
    })
  }
}

/// Everything compiled for one module: the style declarations it makes, the
/// variant tables it declares and the sheets it needs.
#[derive(Debug)]
pub struct CompilationUnit {
  module: String,
  options: ExtractOptions,
  cache: StyleCache,
  cache_namespace: String,
  sheets: IndexSet<String>,
  variant_tables: IndexMap<String, VariantTable>,
  declarations: IndexMap<String, CssOutput>,
}

impl CompilationUnit {
  pub fn new(module: impl Into<String>, options: ExtractOptions, cache: StyleCache) -> Self {
    let cache_namespace = options.cache_namespace();
    Self {
      module: module.into(),
      options,
      cache,
      cache_namespace,
      sheets: IndexSet::new(),
      variant_tables: IndexMap::new(),
      declarations: IndexMap::new(),
    }
  }

  pub fn module(&self) -> &str {
    &self.module
  }

  pub fn options(&self) -> &ExtractOptions {
    &self.options
  }

  /// Build context for expressions of this module.
  pub fn context<'a>(&'a self, oracle: &'a dyn BindingOracle) -> BuildContext<'a> {
    BuildContext::new(ResolveContext::new(oracle, self.module.as_str())).with_unit(self)
  }

  pub fn build(&self, oracle: &dyn BindingOracle, expr: &Expr) -> BuildResult<CssOutput> {
    build_css(expr, &self.context(oracle))
  }

  /// Build an `xcss` value. Every value has to be known at build time.
  pub fn build_xcss(&self, oracle: &dyn BindingOracle, expr: &Expr) -> BuildResult<CssOutput> {
    build_css(
      expr,
      &self.context(oracle).static_only(StaticConstruct::Xcss),
    )
  }

  /// Build `const name = css(...)` so later uses of `name` refer to it.
  pub fn declare_css(
    &mut self,
    oracle: &dyn BindingOracle,
    name: &str,
    expr: &Expr,
  ) -> BuildResult<&CssOutput> {
    let output = self.build(oracle, expr)?;
    tracing::debug!(module = %self.module, name, items = output.css.len(), "declared css");
    self.declarations.insert(name.to_string(), output);
    Ok(&self.declarations[name])
  }

  /// Build and compile `const name = cssMap(...)`.
  pub fn declare_variant_table(
    &mut self,
    oracle: &dyn BindingOracle,
    name: &str,
    expr: &Expr,
  ) -> BuildResult<&VariantTable> {
    let variants = build_variant_table(expr, &self.context(oracle))?;

    let mut table = VariantTable::default();
    for (variant, output) in variants {
      let mut classes = CompiledClasses::default();
      for item in &output.css {
        match item {
          CssItem::Sheet { css } => classes.sheets.extend(self.compile_sheet(css)?),
          other => {
            let compiled = self.compile(&other.css())?;
            classes.class_names.extend(compiled.class_names);
            classes.sheets.extend(compiled.sheets);
          }
        }
      }
      self.add_sheets(&classes.sheets);
      table.variants.insert(variant, classes);
    }

    tracing::debug!(module = %self.module, name, variants = table.variants.len(), "declared cssMap");
    self.variant_tables.insert(name.to_string(), table);
    Ok(&self.variant_tables[name])
  }

  /// Compile built items into class names, registering their sheets.
  pub fn transform(&mut self, output: &CssOutput) -> BuildResult<TransformedItems> {
    transform_css_items(&output.css, self)
  }

  /// Compile declarations into atomic rules. Class names come back in the
  /// form the runtime expects.
  pub fn compile(&self, css: &str) -> BuildResult<CompiledClasses> {
    let compile_options = &self.options.compile;
    let compiled = self.cache.load(&self.cache_namespace, css, || {
      compile_atomic_css(css, compile_options)
    })?;

    Ok(CompiledClasses {
      class_names: compress_class_names(
        &compiled.class_names,
        compile_options.class_name_compression_map.as_ref(),
      ),
      sheets: compiled.sheets,
    })
  }

  /// Compile a complete stylesheet such as `@keyframes`.
  pub fn compile_sheet(&self, css: &str) -> BuildResult<Vec<String>> {
    Ok(compile_stylesheet(css, &self.options.compile)?.sheets)
  }

  pub(crate) fn add_sheets(&mut self, sheets: &[String]) {
    for sheet in sheets {
      self.sheets.insert(sheet.clone());
    }
  }

  /// Every sheet needed by the module, in first use order.
  pub fn sheets(&self) -> impl Iterator<Item = &str> {
    self.sheets.iter().map(String::as_str)
  }

  pub fn variant_table(&self, name: &str) -> Option<&VariantTable> {
    self.variant_tables.get(name)
  }

  pub fn declaration(&self, name: &str) -> Option<&CssOutput> {
    self.declarations.get(name)
  }
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::error::BuildError;
  use crate::oracle::ModuleGraph;
  use crate::parse::parse_expression;

  fn graph(source: &str) -> ModuleGraph {
    let mut graph = ModuleGraph::new(vec!["@compiled/react".into()]);
    graph.add_source("app.tsx", source).unwrap();
    graph
  }

  fn unit() -> CompilationUnit {
    CompilationUnit::new("app.tsx", ExtractOptions::default(), StyleCache::new())
  }

  #[test]
  fn declared_css_is_referenced_by_name() {
    let graph = graph("import { css } from '@compiled/react';");
    let mut unit = unit();
    unit
      .declare_css(&graph, "base", &parse_expression("css({ color: 'red' })").unwrap())
      .unwrap();

    let output = unit
      .build(&graph, &parse_expression("[base, { margin: 0 }]").unwrap())
      .unwrap();

    assert_eq!(
      output.css,
      vec![
        CssItem::Reference {
          reference: "base".into(),
          css: "color: red;".into(),
        },
        CssItem::unconditional("margin: 0;"),
      ]
    );
  }

  #[test]
  fn variant_tables_compile_each_variant() {
    let graph = graph(indoc! {"
      import { cssMap } from '@compiled/react';
      const styles = cssMap({ primary: { color: 'blue' }, danger: { color: 'red' } });
    "});
    let mut unit = unit();
    let table = unit
      .declare_variant_table(
        &graph,
        "styles",
        &parse_expression("cssMap({ primary: { color: 'blue' }, danger: { color: 'red' } })")
          .unwrap(),
      )
      .unwrap()
      .clone();

    assert_eq!(table.variants.len(), 2);
    assert_eq!(table.variants["primary"].class_names.len(), 1);
    assert_eq!(table.sheets().len(), 2);
    assert_eq!(unit.sheets().count(), 2);

    let Expr::Object(object) = table.class_name_object() else {
      panic!("expected an object literal");
    };
    assert_eq!(object.props.len(), 2);

    let output = unit
      .build(&graph, &parse_expression("styles[variant]").unwrap())
      .unwrap();
    assert!(matches!(&output.css[0], CssItem::Map { name, .. } if name == "styles"));

    let transformed = unit.transform(&output).unwrap();
    assert_eq!(transformed.sheets.len(), 2);
  }

  #[test]
  fn variant_tables_need_a_variant() {
    let graph = graph("import { cssMap } from '@compiled/react';");
    let mut unit = unit();
    unit
      .declare_variant_table(
        &graph,
        "styles",
        &parse_expression("cssMap({ primary: { color: 'blue' } })").unwrap(),
      )
      .unwrap();

    let error = unit
      .build(&graph, &parse_expression("styles").unwrap())
      .unwrap_err();
    assert!(matches!(error, BuildError::InvalidVariantTable { .. }));
  }

  #[test]
  fn undeclared_variant_tables_are_reported() {
    let graph = graph(indoc! {"
      import { cssMap } from '@compiled/react';
      const styles = cssMap({ primary: { color: 'blue' } });
    "});

    let error = unit()
      .build(&graph, &parse_expression("styles.primary").unwrap())
      .unwrap_err();
    assert_eq!(
      error.to_string(),
      "cssMap `styles` must be declared before it is used"
    );
  }

  #[test]
  fn xcss_must_be_static() {
    let graph = graph("");
    let unit = unit();

    let error = unit
      .build_xcss(&graph, &parse_expression("{ color: props.color }").unwrap())
      .unwrap_err();
    assert_eq!(
      error.to_string(),
      "xcss contains values that can't be statically evaluated"
    );

    let output = unit
      .build_xcss(&graph, &parse_expression("{ color: 'red' }").unwrap())
      .unwrap();
    assert_eq!(output.css, vec![CssItem::unconditional("color: red;")]);
  }

  #[test]
  fn compiled_css_is_cached_across_units() {
    let cache = StyleCache::new();
    let first = CompilationUnit::new("a.tsx", ExtractOptions::default(), cache.clone());
    let second = CompilationUnit::new("b.tsx", ExtractOptions::default(), cache.clone());

    let a = first.compile("color: red;").unwrap();
    let b = second.compile("color: red;").unwrap();
    assert_eq!(a, b);
    assert_eq!(cache.len(), 1);
  }
}
