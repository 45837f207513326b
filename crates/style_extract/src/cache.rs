use std::sync::Arc;

use atomic_css::{CompileResult, CompiledCss};
use atomic_hash::hash;
use indexmap::IndexMap;
use parking_lot::Mutex;

const DEFAULT_MAX_SIZE: usize = 500;

#[derive(Debug)]
struct Entries {
  max_size: usize,
  entries: IndexMap<String, CompiledCss>,
}

/// LRU cache of compiled CSS keyed by the CSS text and the options it was
/// compiled with. Clones share the same entries, so one cache can serve every
/// module of a build.
#[derive(Clone, Debug)]
pub struct StyleCache {
  inner: Arc<Mutex<Entries>>,
}

impl Default for StyleCache {
  fn default() -> Self {
    Self::new()
  }
}

impl StyleCache {
  pub fn new() -> Self {
    Self::with_max_size(DEFAULT_MAX_SIZE)
  }

  /// A cache holding at most `max_size` entries. Zero disables caching.
  pub fn with_max_size(max_size: usize) -> Self {
    Self {
      inner: Arc::new(Mutex::new(Entries {
        max_size,
        entries: IndexMap::new(),
      })),
    }
  }

  pub fn unique_key(namespace: &str, key: &str) -> String {
    hash(&format!("{namespace}----{key}"))
  }

  /// Cached result for `key`, compiling it with `compile` on a miss. Errors are
  /// not cached.
  pub fn load<F>(&self, namespace: &str, key: &str, compile: F) -> CompileResult<CompiledCss>
  where
    F: FnOnce() -> CompileResult<CompiledCss>,
  {
    let unique_key = Self::unique_key(namespace, key);

    {
      let mut inner = self.inner.lock();
      if inner.max_size == 0 {
        drop(inner);
        return compile();
      }
      if let Some(existing) = inner.entries.shift_remove(&unique_key) {
        let result = existing.clone();
        inner.entries.insert(unique_key, existing);
        return Ok(result);
      }
    }

    let computed = compile()?;

    let mut inner = self.inner.lock();
    if inner.entries.len() >= inner.max_size {
      inner.entries.shift_remove_index(0);
    }
    inner.entries.insert(unique_key, computed.clone());
    Ok(computed)
  }

  pub fn len(&self) -> usize {
    self.inner.lock().entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn clear(&self) {
    self.inner.lock().entries.clear();
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use atomic_css::CompileError;
  use pretty_assertions::assert_eq;

  use super::*;

  fn compiled(class_name: &str) -> CompiledCss {
    CompiledCss {
      sheets: vec![format!(".{class_name}{{color:red}}")],
      class_names: vec![class_name.to_string()],
    }
  }

  #[test]
  fn caches_by_namespace_and_key() {
    let cache = StyleCache::new();
    let calls = Cell::new(0);
    let compile = || {
      calls.set(calls.get() + 1);
      Ok(compiled("_a"))
    };

    assert_eq!(cache.load("ns", "color: red;", compile).unwrap(), compiled("_a"));
    assert_eq!(cache.load("ns", "color: red;", compile).unwrap(), compiled("_a"));
    assert_eq!(calls.get(), 1);

    cache.load("other", "color: red;", compile).unwrap();
    assert_eq!(calls.get(), 2);
    assert_eq!(cache.len(), 2);
  }

  #[test]
  fn evicts_the_least_recently_used_entry() {
    let cache = StyleCache::with_max_size(2);
    cache.load("", "a", || Ok(compiled("_a"))).unwrap();
    cache.load("", "b", || Ok(compiled("_b"))).unwrap();
    cache.load("", "a", || Ok(compiled("_unused"))).unwrap();
    cache.load("", "c", || Ok(compiled("_c"))).unwrap();

    assert_eq!(cache.len(), 2);
    let recompiled = cache.load("", "b", || Ok(compiled("_b2"))).unwrap();
    assert_eq!(recompiled, compiled("_b2"));
  }

  #[test]
  fn skips_storage_when_disabled_and_on_errors() {
    let cache = StyleCache::with_max_size(0);
    cache.load("", "a", || Ok(compiled("_a"))).unwrap();
    assert!(cache.is_empty());

    let cache = StyleCache::new();
    let error = cache
      .load("", "a", || {
        Err(CompileError::UnknownAtRule {
          name: "foo".into(),
        })
      })
      .unwrap_err();
    assert_eq!(error.to_string(), "Unknown at-rule '@foo'");
    assert!(cache.is_empty());
  }

  #[test]
  fn clones_share_entries() {
    let cache = StyleCache::new();
    let clone = cache.clone();
    clone.load("", "a", || Ok(compiled("_a"))).unwrap();
    assert_eq!(cache.len(), 1);
    cache.clear();
    assert!(clone.is_empty());
  }
}
