//! Answers questions about bindings outside the expression being built.
//!
//! The resolver never walks modules itself: it asks a [`BindingOracle`] for
//! the initializer of a module-level name, for a module's export, or whether a
//! callee is one of the style APIs. [`ModuleGraph`] is an in-memory oracle
//! built from parsed modules.

use indexmap::{IndexMap, IndexSet};
use swc_core::ecma::ast::{
  AssignExpr, AssignTarget, Decl, DefaultDecl, ExportSpecifier, Expr, FnExpr, ImportSpecifier,
  Module, ModuleDecl, ModuleExportName, ModuleItem, ObjectPatProp, Pat, PropName,
  SimpleAssignTarget, Stmt, UpdateExpr,
};
use swc_core::ecma::visit::{noop_visit_type, Visit, VisitWith};

use crate::error::BuildResult;
use crate::parse::parse_module;

/// Name an import binds to in the source module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Imported {
  Named(String),
  Default,
  Namespace,
}

/// Module-level binding as seen by the resolver.
#[derive(Clone, Debug, PartialEq)]
pub enum ModuleBinding {
  /// `const name = init`, or a destructured part of `init` at `path`.
  /// Function declarations are reported as a function expression.
  Constant { init: Expr, path: Vec<String> },
  Import { source: String, imported: Imported },
}

/// Recognized style-producing calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleApi {
  Css,
  Keyframes,
  CssMap,
}

impl StyleApi {
  pub fn from_export(name: &str) -> Option<Self> {
    match name {
      "css" => Some(StyleApi::Css),
      "keyframes" => Some(StyleApi::Keyframes),
      "cssMap" => Some(StyleApi::CssMap),
      _ => None,
    }
  }
}

pub trait BindingOracle {
  /// Initializer of `name` in `module`, only when the binding is never
  /// reassigned. `let` and `var` count as constant until assigned to.
  fn constant_initializer(&self, module: &str, name: &str) -> Option<ModuleBinding>;

  /// Binding exported from `module` as `export`. Default exports use
  /// `"default"`.
  fn module_export(&self, module: &str, export: &str) -> Option<ModuleBinding>;

  /// Style API that `callee` refers to in `module`.
  fn style_call(&self, module: &str, callee: &str) -> Option<StyleApi>;
}

#[derive(Clone, Debug)]
struct LocalBinding {
  binding: ModuleBinding,
  constant: bool,
}

#[derive(Clone, Debug)]
enum Export {
  Local(String),
  Binding(ModuleBinding),
}

#[derive(Clone, Debug, Default)]
struct ModuleScope {
  bindings: IndexMap<String, LocalBinding>,
  exports: IndexMap<String, Export>,
}

/// In-memory oracle over a set of parsed modules. Module ids are whatever
/// string an import uses to reach the module.
#[derive(Clone, Debug, Default)]
pub struct ModuleGraph {
  modules: IndexMap<String, ModuleScope>,
  import_sources: Vec<String>,
}

impl ModuleGraph {
  pub fn new(import_sources: Vec<String>) -> Self {
    Self {
      modules: IndexMap::new(),
      import_sources,
    }
  }

  pub fn add_module(&mut self, id: impl Into<String>, module: &Module) {
    let id = id.into();
    let scope = collect_module_scope(module);
    tracing::trace!(
      module = %id,
      bindings = scope.bindings.len(),
      exports = scope.exports.len(),
      "registered module"
    );
    self.modules.insert(id, scope);
  }

  /// Parse `source` and register it under `id`.
  pub fn add_source(&mut self, id: impl Into<String>, source: &str) -> BuildResult<()> {
    let id = id.into();
    let module = parse_module(&id, source)?;
    self.add_module(id, &module);
    Ok(())
  }

  pub fn contains(&self, id: &str) -> bool {
    self.modules.contains_key(id)
  }
}

impl BindingOracle for ModuleGraph {
  fn constant_initializer(&self, module: &str, name: &str) -> Option<ModuleBinding> {
    let local = self.modules.get(module)?.bindings.get(name)?;
    local.constant.then(|| local.binding.clone())
  }

  fn module_export(&self, module: &str, export: &str) -> Option<ModuleBinding> {
    match self.modules.get(module)?.exports.get(export)? {
      Export::Local(local) => self.constant_initializer(module, local),
      Export::Binding(binding) => Some(binding.clone()),
    }
  }

  fn style_call(&self, module: &str, callee: &str) -> Option<StyleApi> {
    let local = self.modules.get(module)?.bindings.get(callee)?;
    match &local.binding {
      ModuleBinding::Import {
        source,
        imported: Imported::Named(name),
      } if self.import_sources.iter().any(|candidate| candidate == source) => {
        StyleApi::from_export(name)
      }
      _ => None,
    }
  }
}

fn prop_name_to_string(name: &PropName) -> Option<String> {
  match name {
    PropName::Ident(ident) => Some(ident.sym.to_string()),
    PropName::Str(value) => Some(value.value.to_string()),
    PropName::Num(value) => Some(value.value.to_string()),
    PropName::BigInt(value) => Some(value.value.to_string()),
    PropName::Computed(_) => None,
  }
}

fn module_export_name_to_string(name: &ModuleExportName) -> String {
  match name {
    ModuleExportName::Ident(ident) => ident.sym.to_string(),
    ModuleExportName::Str(value) => value.value.to_string(),
  }
}

fn imported_from_name(name: String) -> Imported {
  if name == "default" {
    Imported::Default
  } else {
    Imported::Named(name)
  }
}

#[derive(Default)]
struct ReassignmentCollector {
  names: IndexSet<String>,
}

impl Visit for ReassignmentCollector {
  noop_visit_type!();

  fn visit_assign_expr(&mut self, node: &AssignExpr) {
    if let AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) = &node.left {
      self.names.insert(binding.id.sym.to_string());
    }
    node.visit_children_with(self);
  }

  fn visit_update_expr(&mut self, node: &UpdateExpr) {
    if let Expr::Ident(ident) = node.arg.as_ref() {
      self.names.insert(ident.sym.to_string());
    }
    node.visit_children_with(self);
  }
}

struct ScopeBuilder {
  scope: ModuleScope,
  reassigned: IndexSet<String>,
}

impl ScopeBuilder {
  fn insert(&mut self, name: &str, binding: ModuleBinding, constant: bool) {
    let constant = constant && !self.reassigned.contains(name);
    self
      .scope
      .bindings
      .insert(name.to_string(), LocalBinding { binding, constant });
  }

  fn register_pattern(&mut self, pattern: &Pat, init: &Expr, path: Vec<String>, constant: bool) {
    match pattern {
      Pat::Ident(binding) => self.insert(
        binding.id.sym.as_ref(),
        ModuleBinding::Constant {
          init: init.clone(),
          path,
        },
        constant,
      ),
      Pat::Assign(assign) => self.register_pattern(&assign.left, init, path, constant),
      Pat::Object(object) => {
        for prop in &object.props {
          match prop {
            ObjectPatProp::KeyValue(key_value) => {
              if let Some(key) = prop_name_to_string(&key_value.key) {
                let mut next = path.clone();
                next.push(key);
                self.register_pattern(&key_value.value, init, next, constant);
              }
            }
            ObjectPatProp::Assign(assign) => {
              let mut next = path.clone();
              next.push(assign.key.sym.to_string());
              self.insert(
                assign.key.sym.as_ref(),
                ModuleBinding::Constant {
                  init: init.clone(),
                  path: next,
                },
                constant,
              );
            }
            ObjectPatProp::Rest(_) => {}
          }
        }
      }
      Pat::Array(array) => {
        for (index, element) in array.elems.iter().enumerate() {
          if let Some(element) = element {
            let mut next = path.clone();
            next.push(index.to_string());
            self.register_pattern(element, init, next, constant);
          }
        }
      }
      _ => {}
    }
  }

  /// Registers a declaration and returns the names it declares.
  fn register_decl(&mut self, decl: &Decl) -> Vec<String> {
    match decl {
      Decl::Var(var) => {
        let mut names = Vec::new();
        for declarator in &var.decls {
          let Some(init) = declarator.init.as_deref() else {
            continue;
          };
          let before = self.scope.bindings.len();
          self.register_pattern(&declarator.name, init, Vec::new(), true);
          names.extend(self.scope.bindings.keys().skip(before).cloned());
        }
        names
      }
      Decl::Fn(function) => {
        let name = function.ident.sym.to_string();
        self.insert(
          &name,
          ModuleBinding::Constant {
            init: Expr::Fn(FnExpr {
              ident: Some(function.ident.clone()),
              function: function.function.clone(),
            }),
            path: Vec::new(),
          },
          true,
        );
        vec![name]
      }
      _ => Vec::new(),
    }
  }

  fn register_import(&mut self, source: &str, specifier: &ImportSpecifier) {
    let (local, imported) = match specifier {
      ImportSpecifier::Named(named) => {
        if named.is_type_only {
          return;
        }
        let imported = named
          .imported
          .as_ref()
          .map(module_export_name_to_string)
          .unwrap_or_else(|| named.local.sym.to_string());
        (named.local.sym.to_string(), imported_from_name(imported))
      }
      ImportSpecifier::Default(default) => (default.local.sym.to_string(), Imported::Default),
      ImportSpecifier::Namespace(namespace) => {
        (namespace.local.sym.to_string(), Imported::Namespace)
      }
    };

    self.insert(
      &local,
      ModuleBinding::Import {
        source: source.to_string(),
        imported,
      },
      true,
    );
  }

  fn register_module_decl(&mut self, decl: &ModuleDecl) {
    match decl {
      ModuleDecl::Import(import) => {
        if import.type_only {
          return;
        }
        let source = import.src.value.to_string();
        for specifier in &import.specifiers {
          self.register_import(&source, specifier);
        }
      }
      ModuleDecl::ExportDecl(export) => {
        for name in self.register_decl(&export.decl) {
          self.scope.exports.insert(name.clone(), Export::Local(name));
        }
      }
      ModuleDecl::ExportNamed(named) => {
        let source = named.src.as_ref().map(|src| src.value.to_string());
        for specifier in &named.specifiers {
          match (specifier, &source) {
            (ExportSpecifier::Named(specifier), None) if !specifier.is_type_only => {
              let local = module_export_name_to_string(&specifier.orig);
              let exported = specifier
                .exported
                .as_ref()
                .map(module_export_name_to_string)
                .unwrap_or_else(|| local.clone());
              self.scope.exports.insert(exported, Export::Local(local));
            }
            (ExportSpecifier::Named(specifier), Some(source)) if !specifier.is_type_only => {
              let orig = module_export_name_to_string(&specifier.orig);
              let exported = specifier
                .exported
                .as_ref()
                .map(module_export_name_to_string)
                .unwrap_or_else(|| orig.clone());
              self.scope.exports.insert(
                exported,
                Export::Binding(ModuleBinding::Import {
                  source: source.clone(),
                  imported: imported_from_name(orig),
                }),
              );
            }
            (ExportSpecifier::Namespace(namespace), Some(source)) => {
              self.scope.exports.insert(
                module_export_name_to_string(&namespace.name),
                Export::Binding(ModuleBinding::Import {
                  source: source.clone(),
                  imported: Imported::Namespace,
                }),
              );
            }
            _ => {}
          }
        }
      }
      ModuleDecl::ExportDefaultExpr(export) => {
        self.scope.exports.insert(
          "default".into(),
          Export::Binding(ModuleBinding::Constant {
            init: (*export.expr).clone(),
            path: Vec::new(),
          }),
        );
      }
      ModuleDecl::ExportDefaultDecl(export) => {
        if let DefaultDecl::Fn(function) = &export.decl {
          let binding = ModuleBinding::Constant {
            init: Expr::Fn(function.clone()),
            path: Vec::new(),
          };
          if let Some(ident) = &function.ident {
            self.insert(ident.sym.as_ref(), binding.clone(), true);
          }
          self
            .scope
            .exports
            .insert("default".into(), Export::Binding(binding));
        }
      }
      _ => {}
    }
  }
}

fn collect_module_scope(module: &Module) -> ModuleScope {
  let mut collector = ReassignmentCollector::default();
  module.visit_with(&mut collector);

  let mut builder = ScopeBuilder {
    scope: ModuleScope::default(),
    reassigned: collector.names,
  };

  for item in &module.body {
    match item {
      ModuleItem::ModuleDecl(decl) => builder.register_module_decl(decl),
      ModuleItem::Stmt(Stmt::Decl(decl)) => {
        builder.register_decl(decl);
      }
      ModuleItem::Stmt(_) => {}
    }
  }

  builder.scope
}
