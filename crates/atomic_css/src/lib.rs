//! Compiles CSS declarations into atomic rules: one declaration per rule,
//! addressed by a class name derived from the declaration's context,
//! property and value.
//!
//! ```text
//! color: blue;  =>  ._syaz13q2{color:blue}
//! ```

#[path = "at-rules/mod.rs"]
pub mod at_rules;
pub mod compression;
pub mod error;
pub mod options;
pub mod passes;
pub mod pipeline;
pub mod properties;
pub mod rule_tree;

pub use compression::{compress_class_names, CompressionMap};
pub use error::{CompileError, CompileResult};
pub use options::CompileOptions;
pub use pipeline::{compile_atomic_css, compile_stylesheet, sort_atomic_style_sheet, CompiledCss};
