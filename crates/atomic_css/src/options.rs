use serde::{Deserialize, Serialize};

use crate::compression::CompressionMap;

/// Options controlling a single compilation of CSS text into atomic rules.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
  ///
  /// Prefix mixed into every class hash. Must be a valid CSS identifier.
  ///
  /// Defaults to `None`
  ///
  pub class_hash_prefix: Option<String>,
  ///
  /// Map of full class name suffix (`XXXXYYYY`) to its compressed alias. Emitted
  /// selectors use the alias; reported class names stay uncompressed.
  ///
  /// Defaults to `None`
  ///
  pub class_name_compression_map: Option<CompressionMap>,
  ///
  /// Append `:not(#\#)` after every generated class.
  ///
  /// Defaults to `false`
  ///
  pub increase_specificity: bool,
  ///
  /// Sort at-rules into mobile-first order.
  ///
  /// Defaults to `true`
  ///
  pub sort_at_rules: bool,
  ///
  /// Place shorthand rules before rules setting their longhands.
  ///
  /// Defaults to `true`
  ///
  pub sort_shorthand: bool,
  ///
  /// Reject unknown properties and shorthand/longhand mixing within one
  /// selector context.
  ///
  /// Defaults to `false`
  ///
  pub validate_properties: bool,
  ///
  /// Split `a, b {}` into one atomic rule per selector.
  ///
  /// Defaults to `true`
  ///
  pub flatten_multiple_selectors: bool,
}

impl Default for CompileOptions {
  fn default() -> Self {
    Self {
      class_hash_prefix: None,
      class_name_compression_map: None,
      increase_specificity: false,
      sort_at_rules: true,
      sort_shorthand: true,
      validate_properties: false,
      flatten_multiple_selectors: true,
    }
  }
}

impl CompileOptions {
  pub(crate) fn compressed_alias(&self, class_name: &str) -> Option<&str> {
    let suffix = class_name.strip_prefix('_')?;
    self
      .class_name_compression_map
      .as_ref()?
      .get(suffix)
      .map(String::as_str)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn deserializes_partial_camel_case_options() {
    let options: CompileOptions = serde_json::from_str(
      r#"{ "classHashPrefix": "app", "increaseSpecificity": true, "sortAtRules": false }"#,
    )
    .unwrap();

    assert_eq!(
      options,
      CompileOptions {
        class_hash_prefix: Some("app".into()),
        increase_specificity: true,
        sort_at_rules: false,
        ..CompileOptions::default()
      }
    );
  }

  #[test]
  fn looks_up_compressed_alias_by_suffix() {
    let options = CompileOptions {
      class_name_compression_map: Some(CompressionMap::from([("syaz13q2".into(), "a".into())])),
      ..CompileOptions::default()
    };

    assert_eq!(options.compressed_alias("_syaz13q2"), Some("a"));
    assert_eq!(options.compressed_alias("_syaz5scs"), None);
  }
}
