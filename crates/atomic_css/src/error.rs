use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// Failure raised while compiling CSS text into atomic rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
  #[error("Failed to parse CSS: {message}")]
  Parse { message: String },

  #[error("Nested rules need to be flattened first, found `{selector}` inside another rule")]
  UnflattenedRule { selector: String },

  #[error("At-rule '@{name}' cannot be used in CSS rules")]
  ForbiddenAtRule { name: String },

  #[error("Unknown at-rule '@{name}'")]
  UnknownAtRule { name: String },

  #[error(
    "{prefix} isn't a valid CSS identifier. Accepted characters are ^[a-zA-Z\\-_]+[a-zA-Z\\-_0-9]*$"
  )]
  InvalidClassHashPrefix { prefix: String },

  #[error("Unknown CSS property '{name}'")]
  UnknownProperty { name: String },

  #[error("Shorthand '{shorthand}' and its longhand '{longhand}' cannot be declared together")]
  ShorthandLonghandMix { shorthand: String, longhand: String },
}

impl CompileError {
  pub(crate) fn parse(message: impl Into<String>) -> Self {
    CompileError::Parse {
      message: message.into(),
    }
  }

  /// Whether the error was caused by user-authored styles rather than an
  /// inconsistency inside the pipeline.
  pub fn is_user_error(&self) -> bool {
    !matches!(self, CompileError::UnflattenedRule { .. })
  }
}
