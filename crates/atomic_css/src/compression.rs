//! Build-wide compression of atomic class names into short aliases.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;

/// Class name suffix (`XXXXYYYY`, without the leading `_`) to alias.
pub type CompressionMap = IndexMap<String, String>;

const ALIAS_ALPHABET: &[u8; 27] = b"abcdefghijklmnopqrstuvwxyz_";

/// Aliases containing any of these are skipped so content blockers do not
/// hide elements styled with them.
const DENYLISTED_SUBSTRINGS: &[&str] = &["ad"];

static ATOMIC_CLASS: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\._([a-z0-9]{8})\b").expect("invalid atomic class regex"));

/// Aliases in minimal length order: `a` .. `_`, `aa`, `ab`, ...
#[derive(Debug, Default)]
struct AliasSequence {
  next: u64,
}

impl Iterator for AliasSequence {
  type Item = String;

  fn next(&mut self) -> Option<String> {
    self.next += 1;
    let mut remaining = self.next;
    let mut alias = Vec::new();
    while remaining > 0 {
      remaining -= 1;
      alias.push(ALIAS_ALPHABET[(remaining % 27) as usize]);
      remaining /= 27;
    }
    alias.reverse();
    String::from_utf8(alias).ok()
  }
}

fn is_denylisted(alias: &str) -> bool {
  DENYLISTED_SUBSTRINGS
    .iter()
    .any(|substring| alias.contains(substring))
}

/// Unique atomic class suffixes found in `css`, in order of first appearance.
pub fn collect_atomic_class_suffixes(css: &str) -> IndexSet<String> {
  ATOMIC_CLASS
    .captures_iter(css)
    .filter_map(|captures| captures.get(1))
    .map(|suffix| suffix.as_str().to_string())
    .collect()
}

/// Extend `previous` with aliases for every atomic class in `css` that does
/// not have one yet. Entries of `previous` are never changed or removed.
#[tracing::instrument(level = "debug", skip_all)]
pub fn generate(css: &str, previous: Option<&CompressionMap>) -> CompressionMap {
  let mut map = previous.cloned().unwrap_or_default();
  let reserved: HashSet<String> = map.values().cloned().collect();
  let mut aliases = AliasSequence::default()
    .filter(|alias| !reserved.contains(alias) && !is_denylisted(alias));

  let mut added = 0usize;
  for suffix in collect_atomic_class_suffixes(css) {
    if map.contains_key(&suffix) {
      continue;
    }
    if let Some(alias) = aliases.next() {
      map.insert(suffix, alias);
      added += 1;
    }
  }

  tracing::debug!(total = map.len(), added, "generated compression map");
  map
}

/// Rewrite `_XXXXYYYY` into the `_XXXX_alias` form understood by the runtime.
/// Names without an alias are returned unchanged.
pub fn compress_class_names(class_names: &[String], map: Option<&CompressionMap>) -> Vec<String> {
  let map = match map {
    Some(map) if !map.is_empty() => map,
    _ => return class_names.to_vec(),
  };

  class_names
    .iter()
    .map(|class_name| {
      let compressed = class_name
        .strip_prefix('_')
        .and_then(|suffix| Some((suffix.get(..4)?, map.get(suffix)?)));
      match compressed {
        Some((group, alias)) => format!("_{group}_{alias}"),
        None => class_name.clone(),
      }
    })
    .collect()
}
