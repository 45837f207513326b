use atomic_css::CompileOptions;
use serde::{Deserialize, Serialize};

/// Options for extracting and compiling the styles of one module.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractOptions {
  ///
  /// Modules whose `css`, `keyframes` and `cssMap` exports are recognized as
  /// style APIs.
  ///
  /// Defaults to `["@compiled/react", "@atlaskit/css"]`
  ///
  pub import_sources: Vec<String>,
  ///
  /// Options passed to the atomic compiler for every item.
  ///
  #[serde(flatten)]
  pub compile: CompileOptions,
}

impl Default for ExtractOptions {
  fn default() -> Self {
    Self {
      import_sources: vec!["@compiled/react".into(), "@atlaskit/css".into()],
      compile: CompileOptions::default(),
    }
  }
}

impl ExtractOptions {
  /// Namespace for cache keys. Any option change yields different keys.
  pub(crate) fn cache_namespace(&self) -> String {
    serde_json::to_string(&self.compile).unwrap_or_default()
  }
}
