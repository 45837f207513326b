//! Build-time extraction of styles written inline in JavaScript.
//!
//! A style expression is first resolved as far as it can be proven without
//! running the program ([`resolve`]), then built into [`CssItem`]s and
//! [`Variable`]s ([`build`]), and finally compiled into atomic class names and
//! sheets ([`class_names`]). [`CompilationUnit`] ties the steps together for
//! one module and [`StyleCache`] memoizes compiled CSS across modules.

pub mod build;
pub mod cache;
pub mod class_names;
pub mod error;
pub mod options;
pub mod oracle;
pub mod parse;
pub mod print;
pub mod resolve;
pub mod scope;
pub mod types;
pub mod unit;

pub use build::{build_css, BuildContext};
pub use cache::StyleCache;
pub use class_names::{transform_css_items, TransformedItems};
pub use error::{BuildError, BuildResult, Diagnostic, StaticConstruct};
pub use options::ExtractOptions;
pub use oracle::{BindingOracle, Imported, ModuleBinding, ModuleGraph, StyleApi};
pub use resolve::{resolve, ResolveContext, Resolved};
pub use types::{BindingSource, CssItem, CssOutput, LogicalOperator, Variable};
pub use unit::{CompilationUnit, CompiledClasses, VariantTable};
