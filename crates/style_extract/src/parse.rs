use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, SourceMap, Spanned};
use swc_core::ecma::ast::{Expr, Module};
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

use crate::error::{BuildError, BuildResult};

pub fn syntax_for_filename(name: &str) -> Syntax {
  if name.ends_with(".ts") || name.ends_with(".tsx") || name.ends_with(".cts") {
    Syntax::Typescript(TsSyntax {
      tsx: name.ends_with(".tsx"),
      decorators: true,
      ..Default::default()
    })
  } else {
    Syntax::Es(EsSyntax {
      jsx: true,
      decorators: true,
      ..Default::default()
    })
  }
}

fn parser_error(error: swc_core::ecma::parser::error::Error) -> BuildError {
  BuildError::Parse {
    message: error.kind().msg().to_string(),
    span: error.span(),
  }
}

/// Parse a whole module. The file name only selects the syntax.
pub fn parse_module(filename: &str, source: &str) -> BuildResult<Module> {
  let cm: Lrc<SourceMap> = Default::default();
  let fm = cm.new_source_file(
    FileName::Custom(filename.to_string()).into(),
    source.to_string(),
  );
  let lexer = Lexer::new(
    syntax_for_filename(filename),
    Default::default(),
    StringInput::from(&*fm),
    None,
  );

  let mut parser = Parser::new_from(lexer);
  let module = parser.parse_module().map_err(parser_error)?;
  for error in parser.take_errors() {
    tracing::debug!(filename, error = %error.kind().msg(), "recovered from parse error");
  }
  Ok(module)
}

/// Parse a single expression, as found at a style call site.
pub fn parse_expression(source: &str) -> BuildResult<Expr> {
  let cm: Lrc<SourceMap> = Default::default();
  let fm = cm.new_source_file(
    FileName::Custom("expression.tsx".into()).into(),
    source.to_string(),
  );
  let lexer = Lexer::new(
    syntax_for_filename("expression.tsx"),
    Default::default(),
    StringInput::from(&*fm),
    None,
  );

  let mut parser = Parser::new_from(lexer);
  let expr = parser.parse_expr().map_err(parser_error)?;
  Ok(*expr)
}
