use atomic_css::CompileError;
use serde::{Deserialize, Serialize};
use swc_core::common::Span;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

const DOCUMENTATION_URL: &str = "https://compiledcssinjs.com/docs/limitations";

/// Construct whose values must be known at build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaticConstruct {
  VariantTable,
  Keyframes,
  Xcss,
  ImportedValue,
}

impl StaticConstruct {
  pub fn as_str(&self) -> &'static str {
    match self {
      StaticConstruct::VariantTable => "cssMap",
      StaticConstruct::Keyframes => "keyframes",
      StaticConstruct::Xcss => "xcss",
      StaticConstruct::ImportedValue => "Imported value",
    }
  }
}

/// Failure while turning a style expression into CSS.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
  #[error("{construct} contains values that can't be statically evaluated")]
  NotStatic { construct: &'static str, span: Span },

  #[error("This {node} was unable to have its styles extracted, try using an object or string")]
  UnsupportedExpression { node: &'static str, span: Span },

  #[error("Conditional branch contains unexpected expression")]
  ConditionalArity { span: Span },

  #[error("Variable `{name}` could not be found")]
  UnresolvedIdentifier { name: String, span: Span },

  #[error("cssMap `{name}` must be declared before it is used")]
  VariantTableNotDeclared { name: String, span: Span },

  #[error("{message}")]
  InvalidVariantTable { message: String, span: Span },

  #[error("Keyframes contains unexpected CSS")]
  UnexpectedKeyframes { span: Span },

  #[error("{message}")]
  Parse { message: String, span: Span },

  #[error(transparent)]
  Compile(#[from] CompileError),
}

impl BuildError {
  pub fn unsupported(node: &'static str, span: Span) -> Self {
    BuildError::UnsupportedExpression { node, span }
  }

  pub fn not_static(construct: StaticConstruct, span: Span) -> Self {
    BuildError::NotStatic {
      construct: construct.as_str(),
      span,
    }
  }

  pub fn span(&self) -> Option<Span> {
    match self {
      BuildError::NotStatic { span, .. }
      | BuildError::UnsupportedExpression { span, .. }
      | BuildError::ConditionalArity { span }
      | BuildError::UnresolvedIdentifier { span, .. }
      | BuildError::VariantTableNotDeclared { span, .. }
      | BuildError::InvalidVariantTable { span, .. }
      | BuildError::UnexpectedKeyframes { span }
      | BuildError::Parse { span, .. } => Some(*span),
      BuildError::Compile(_) => None,
    }
  }

  fn hints(&self) -> Option<Vec<String>> {
    match self {
      BuildError::NotStatic { .. } => Some(vec![
        "Move the value into the module being compiled or replace it with a literal".into(),
      ]),
      BuildError::UnsupportedExpression { .. } => {
        Some(vec!["Use an object or string to declare styles".into()])
      }
      BuildError::ConditionalArity { .. } => Some(vec![
        "Each conditional branch may only set one value per property".into(),
      ]),
      BuildError::VariantTableNotDeclared { .. } => {
        Some(vec!["Declare the cssMap at the top level of the module".into()])
      }
      _ => None,
    }
  }
}

/// Serializable form of a [`BuildError`] for tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
  pub message: String,
  #[serde(skip)]
  pub span: Option<Span>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hints: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none", rename = "documentationUrl")]
  pub documentation_url: Option<String>,
}

impl From<&BuildError> for Diagnostic {
  fn from(error: &BuildError) -> Self {
    let documentation_url = match error {
      BuildError::NotStatic { .. } | BuildError::UnsupportedExpression { .. } => {
        Some(DOCUMENTATION_URL.to_string())
      }
      _ => None,
    };

    Diagnostic {
      message: error.to_string(),
      span: error.span().filter(|span| !span.lo().is_dummy()),
      hints: error.hints(),
      documentation_url,
    }
  }
}
