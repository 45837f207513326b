//! Lexical scopes and the resolution trail.
//!
//! Both are persistent linked lists: deriving a child never touches the parent,
//! so a scope can be handed to a nested resolution by value and dropped when
//! it returns.

use std::rc::Rc;

use indexmap::IndexMap;
use swc_core::ecma::ast::Expr;

/// What a name in a local frame refers to.
#[derive(Clone, Debug, PartialEq)]
pub enum ScopeBinding {
  /// Bound to an already resolved value, such as a call argument.
  Value(Expr),
  /// Bound to something unknown at build time, such as a function parameter
  /// without an argument. Shadows module level bindings of the same name.
  Opaque,
}

#[derive(Debug)]
struct Frame {
  bindings: IndexMap<String, ScopeBinding>,
  parent: Option<Rc<Frame>>,
}

#[derive(Clone, Debug, Default)]
pub struct Scope {
  head: Option<Rc<Frame>>,
}

impl Scope {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn child(&self, bindings: IndexMap<String, ScopeBinding>) -> Scope {
    if bindings.is_empty() {
      return self.clone();
    }

    Scope {
      head: Some(Rc::new(Frame {
        bindings,
        parent: self.head.clone(),
      })),
    }
  }

  /// Innermost binding for `name`.
  pub fn lookup(&self, name: &str) -> Option<&ScopeBinding> {
    let mut frame = self.head.as_deref();
    while let Some(current) = frame {
      if let Some(binding) = current.bindings.get(name) {
        return Some(binding);
      }
      frame = current.parent.as_deref();
    }
    None
  }

  pub fn depth(&self) -> usize {
    let mut depth = 0;
    let mut frame = self.head.as_deref();
    while let Some(current) = frame {
      depth += 1;
      frame = current.parent.as_deref();
    }
    depth
  }
}

#[derive(Debug)]
struct TrailNode {
  key: String,
  parent: Option<Rc<TrailNode>>,
}

/// Bindings currently being resolved, innermost first. Used to stop on cycles.
#[derive(Clone, Debug, Default)]
pub struct Trail {
  head: Option<Rc<TrailNode>>,
  len: usize,
}

impl Trail {
  pub fn key(module: &str, name: &str) -> String {
    format!("{module}#{name}")
  }

  pub fn contains(&self, key: &str) -> bool {
    let mut node = self.head.as_deref();
    while let Some(current) = node {
      if current.key == key {
        return true;
      }
      node = current.parent.as_deref();
    }
    false
  }

  pub fn push(&self, key: String) -> Trail {
    Trail {
      head: Some(Rc::new(TrailNode {
        key,
        parent: self.head.clone(),
      })),
      len: self.len + 1,
    }
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use swc_core::common::DUMMY_SP;
  use swc_core::ecma::ast::{Lit, Str};

  use super::*;

  fn string(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str {
      span: DUMMY_SP,
      value: value.into(),
      raw: None,
    }))
  }

  #[test]
  fn child_scopes_shadow_without_touching_parent() {
    let root = Scope::new().child(IndexMap::from([(
      "color".to_string(),
      ScopeBinding::Value(string("red")),
    )]));
    let child = root.child(IndexMap::from([("color".to_string(), ScopeBinding::Opaque)]));

    assert_eq!(child.lookup("color"), Some(&ScopeBinding::Opaque));
    assert_eq!(root.lookup("color"), Some(&ScopeBinding::Value(string("red"))));
    assert_eq!(child.depth(), 2);
    assert_eq!(root.lookup("size"), None);
  }

  #[test]
  fn empty_frames_are_not_pushed() {
    let scope = Scope::new().child(IndexMap::new());
    assert_eq!(scope.depth(), 0);
  }

  #[test]
  fn trail_detects_repeated_keys() {
    let trail = Trail::default().push(Trail::key("app", "a"));
    let nested = trail.push(Trail::key("app", "b"));

    assert!(nested.contains("app#a"));
    assert!(!trail.contains("app#b"));
    assert_eq!(nested.len(), 2);
  }
}
