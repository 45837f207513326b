use indexmap::IndexSet;

use crate::error::CompileResult;
use crate::options::CompileOptions;
use crate::passes::{
  atomicize::Atomicize, discard_duplicates::DiscardDuplicates,
  expand_shorthands::ExpandShorthands, extract::ExtractSheets, flatten_nested::FlattenNested,
  increase_specificity::IncreaseSpecificity, parent_orphaned_pseudos::ParentOrphanedPseudos,
  sort::SortAtomicStyleSheet, validate::ValidateProperties, vendor_prefix::VendorPrefix,
};
use crate::rule_tree::{self, Node};

/// A single rewrite over the rule tree.
pub trait Pass {
  fn name(&self) -> &'static str;

  fn run(&self, nodes: &mut Vec<Node>, ctx: &mut PassContext<'_>) -> CompileResult<()>;
}

/// State shared by the passes of one compilation.
#[derive(Debug)]
pub struct PassContext<'a> {
  pub options: &'a CompileOptions,
  class_names: IndexSet<String>,
  emitted_classes: IndexSet<String>,
  sheets: IndexSet<String>,
}

impl<'a> PassContext<'a> {
  pub fn new(options: &'a CompileOptions) -> Self {
    Self {
      options,
      class_names: IndexSet::new(),
      emitted_classes: IndexSet::new(),
      sheets: IndexSet::new(),
    }
  }

  pub fn push_class_name(&mut self, class_name: impl Into<String>) {
    self.class_names.insert(class_name.into());
  }

  /// Record the class written into a selector, which is the compressed alias
  /// when one exists.
  pub(crate) fn push_emitted_class(&mut self, class: &str) {
    if !self.emitted_classes.contains(class) {
      self.emitted_classes.insert(class.to_string());
    }
  }

  pub(crate) fn is_emitted_class(&self, class: &str) -> bool {
    self.emitted_classes.contains(class)
  }

  pub fn push_sheet(&mut self, sheet: impl Into<String>) {
    self.sheets.insert(sheet.into());
  }

  pub fn sheets(&self) -> Vec<&str> {
    self.sheets.iter().map(String::as_str).collect()
  }

  fn finish(self) -> CompiledCss {
    CompiledCss {
      sheets: self.sheets.into_iter().collect(),
      class_names: self.class_names.into_iter().collect(),
    }
  }
}

/// Output of a compilation: one self-contained CSS fragment per atomic rule
/// and the class names to apply, both in emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledCss {
  pub sheets: Vec<String>,
  pub class_names: Vec<String>,
}

fn atomic_passes(options: &CompileOptions) -> Vec<Box<dyn Pass>> {
  let mut passes: Vec<Box<dyn Pass>> = vec![
    Box::new(DiscardDuplicates),
    Box::new(ParentOrphanedPseudos),
    Box::new(FlattenNested),
  ];
  if options.validate_properties {
    passes.push(Box::new(ValidateProperties));
  }
  passes.push(Box::new(ExpandShorthands));
  passes.push(Box::new(Atomicize));
  if options.increase_specificity {
    passes.push(Box::new(IncreaseSpecificity));
  }
  passes.push(Box::new(SortAtomicStyleSheet));
  passes.push(Box::new(VendorPrefix));
  passes.push(Box::new(ExtractSheets));
  passes
}

fn run_passes(
  mut nodes: Vec<Node>,
  passes: &[Box<dyn Pass>],
  options: &CompileOptions,
) -> CompileResult<CompiledCss> {
  let mut ctx = PassContext::new(options);
  for pass in passes {
    tracing::trace!(pass = pass.name(), nodes = nodes.len(), "running pass");
    pass.run(&mut nodes, &mut ctx)?;
  }
  Ok(ctx.finish())
}

/// Compile a declaration list (which may nest rules and at-rules) into atomic
/// rules.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile_atomic_css(css: &str, options: &CompileOptions) -> CompileResult<CompiledCss> {
  if css.trim().is_empty() {
    return Ok(CompiledCss::default());
  }

  let nodes = rule_tree::parse_declarations(css)?;
  let result = run_passes(nodes, &atomic_passes(options), options)?;
  tracing::debug!(
    sheets = result.sheets.len(),
    class_names = result.class_names.len(),
    "compiled atomic css"
  );
  Ok(result)
}

/// Compile a complete stylesheet such as `@keyframes` or `@font-face`. Nothing
/// is atomicized; each top-level rule becomes one sheet.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile_stylesheet(css: &str, options: &CompileOptions) -> CompileResult<CompiledCss> {
  if css.trim().is_empty() {
    return Ok(CompiledCss::default());
  }

  let nodes = rule_tree::parse_stylesheet(css)?;
  let passes: Vec<Box<dyn Pass>> = vec![Box::new(VendorPrefix), Box::new(ExtractSheets)];
  run_passes(nodes, &passes, options)
}

/// Sort an aggregated atomic stylesheet into cascade order and print it.
#[tracing::instrument(level = "debug", skip_all)]
pub fn sort_atomic_style_sheet(css: &str, options: &CompileOptions) -> CompileResult<String> {
  let mut nodes = rule_tree::parse_stylesheet(css)?;
  let mut ctx = PassContext::new(options);
  SortAtomicStyleSheet.run(&mut nodes, &mut ctx)?;
  Ok(rule_tree::print_nodes(&nodes))
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::compression::CompressionMap;
  use crate::error::CompileError;

  fn compile(css: &str) -> CompiledCss {
    compile_atomic_css(css, &CompileOptions::default()).unwrap()
  }

  #[test]
  fn empty_input_produces_nothing() {
    assert_eq!(compile("   "), CompiledCss::default());
  }

  #[test]
  fn compiles_a_single_declaration() {
    assert_eq!(
      compile("color: blue;"),
      CompiledCss {
        sheets: vec!["._syaz13q2{color:blue}".into()],
        class_names: vec!["_syaz13q2".into()],
      }
    );
  }

  #[test]
  fn class_names_ignore_whitespace() {
    assert_eq!(compile("color:    blue;"), compile("color: blue;"));
  }

  #[test]
  fn later_duplicate_declarations_win() {
    let result = compile("color: red; color: blue;");
    assert_eq!(result.class_names, vec!["_syaz13q2"]);
  }

  #[test]
  fn expands_margin_shorthand() {
    let result = compile("margin: 1px 2px 3px;");
    assert_eq!(
      result.sheets,
      vec![
        format!("._{}{}{{margin-top:1px}}", hash4("undefined&margin-top"), hash4("1px")),
        format!("._{}{}{{margin-right:2px}}", hash4("undefined&margin-right"), hash4("2px")),
        format!("._{}{}{{margin-bottom:3px}}", hash4("undefined&margin-bottom"), hash4("3px")),
        format!("._{}{}{{margin-left:2px}}", hash4("undefined&margin-left"), hash4("2px")),
      ]
    );
  }

  fn hash4(key: &str) -> String {
    atomic_hash::short_hash(key, 4)
  }

  #[test]
  fn nested_type_selectors_become_descendants() {
    let result = compile("div { color: blue; } margin: 0;");

    let class_name = format!("_{}{}", hash4("undefined& divcolor"), hash4("blue"));
    assert!(result
      .sheets
      .contains(&format!(".{class_name} div{{color:blue}}")));
    assert!(result.class_names.contains(&class_name));
    assert_eq!(result.sheets.len(), 5);
  }

  #[test]
  fn unparsable_css_is_an_error() {
    assert!(matches!(
      compile_atomic_css("color: red; 1px { color: blue; }", &CompileOptions::default()),
      Err(CompileError::Parse { .. })
    ));
  }

  #[test]
  fn orders_pseudo_selectors_lvfha() {
    let result = compile(indoc! {"
      &:active { color: red; }
      &:hover { color: red; }
      &:focus { color: red; }
      &:visited { color: red; }
      &:link { color: red; }
    "});

    let pseudos: Vec<&str> = result
      .sheets
      .iter()
      .filter_map(|sheet| sheet.split(':').nth(1))
      .collect();
    assert_eq!(pseudos, vec!["link{color", "visited{color", "focus{color", "hover{color", "active{color"]);
  }

  #[test]
  fn at_rules_come_after_plain_rules() {
    let result = compile(indoc! {"
      @media (min-width: 500px) { color: red; }
      color: blue;
    "});

    assert_eq!(result.sheets.len(), 2);
    assert_eq!(result.sheets[0], "._syaz13q2{color:blue}");
    assert!(result.sheets[1].starts_with("@media (min-width: 500px){._"));
  }

  #[test]
  fn compression_map_renames_emitted_selector_only() {
    let options = CompileOptions {
      class_name_compression_map: Some(CompressionMap::from([("syaz13q2".into(), "a".into())])),
      ..CompileOptions::default()
    };
    let result = compile_atomic_css("color: blue;", &options).unwrap();

    assert_eq!(result.sheets, vec![".a{color:blue}"]);
    assert_eq!(result.class_names, vec!["_syaz13q2"]);
  }

  #[test]
  fn increases_specificity_when_asked() {
    let options = CompileOptions {
      increase_specificity: true,
      ..CompileOptions::default()
    };
    let result = compile_atomic_css("color: blue;", &options).unwrap();

    assert_eq!(result.sheets, vec!["._syaz13q2:not(#\\#){color:blue}"]);
  }

  #[test]
  fn validation_rejects_unknown_properties() {
    let options = CompileOptions {
      validate_properties: true,
      ..CompileOptions::default()
    };
    assert_eq!(
      compile_atomic_css("colour: blue;", &options),
      Err(CompileError::UnknownProperty {
        name: "colour".into()
      })
    );
  }

  #[test]
  fn forbidden_at_rules_fail() {
    assert_eq!(
      compile_atomic_css("@import url('a.css');", &CompileOptions::default()),
      Err(CompileError::ForbiddenAtRule {
        name: "import".into()
      })
    );
  }

  #[test]
  fn keyframes_compile_as_one_sheet() {
    let result = compile_stylesheet(
      "@keyframes fade { from { opacity: 0; } to { opacity: 1; } }",
      &CompileOptions::default(),
    )
    .unwrap();

    assert_eq!(
      result.sheets,
      vec!["@keyframes fade{from{opacity:0}to{opacity:1}}"]
    );
    assert!(result.class_names.is_empty());
  }

  #[test]
  fn sorts_aggregated_sheets() {
    let sorted = sort_atomic_style_sheet(
      "@media (min-width: 400px){._a{color:red}}._b:hover{color:red}@media (min-width: 200px){._c{color:red}}._d:link{color:red}",
      &CompileOptions::default(),
    )
    .unwrap();

    assert_eq!(
      sorted,
      "._d:link{color:red}._b:hover{color:red}@media (min-width: 200px){._c{color:red}}@media (min-width: 400px){._a{color:red}}"
    );
  }
}
