use swc_core::common::sync::Lrc;
use swc_core::common::SourceMap;
use swc_core::ecma::ast::Expr;
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::codegen::{Config, Emitter, Node};

/// Print an expression as source code. Used to derive names from expressions,
/// so the output only has to be stable, not pretty.
pub fn print_expression(expr: &Expr) -> String {
  let cm: Lrc<SourceMap> = Default::default();
  let mut buffer = Vec::new();

  {
    let mut writer = JsWriter::new(cm.clone(), "\n", &mut buffer, None);
    writer.set_indent_str("  ");
    let mut emitter = Emitter {
      cfg: Config::default(),
      comments: None,
      cm,
      wr: writer,
    };

    expr.emit_with(&mut emitter).expect("emit expression");
  }

  String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::parse::parse_expression;

  #[test]
  fn prints_expressions_independent_of_source_spacing() {
    let spaced = parse_expression("props.isPrimary   ?  'red' : 'blue'").unwrap();
    let compact = parse_expression("props.isPrimary?'red':'blue'").unwrap();

    assert_eq!(print_expression(&spaced), print_expression(&compact));
    assert!(print_expression(&compact).starts_with("props.isPrimary"));
  }
}
