use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{BinExpr, BinaryOp, Expr, Lit, Null, ParenExpr, UnaryExpr, UnaryOp};

/// Operator joining a guard expression to the class names it gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOperator {
  And,
  Or,
  Nullish,
}

impl LogicalOperator {
  pub fn as_str(&self) -> &'static str {
    match self {
      LogicalOperator::And => "&&",
      LogicalOperator::Or => "||",
      LogicalOperator::Nullish => "??",
    }
  }

  pub fn to_binary_op(self) -> BinaryOp {
    match self {
      LogicalOperator::And => BinaryOp::LogicalAnd,
      LogicalOperator::Or => BinaryOp::LogicalOr,
      LogicalOperator::Nullish => BinaryOp::NullishCoalescing,
    }
  }

  pub fn from_binary_op(op: BinaryOp) -> Option<Self> {
    match op {
      BinaryOp::LogicalAnd => Some(LogicalOperator::And),
      BinaryOp::LogicalOr => Some(LogicalOperator::Or),
      BinaryOp::NullishCoalescing => Some(LogicalOperator::Nullish),
      _ => None,
    }
  }

  /// Condition under which the right-hand side of `left <op> right` is
  /// evaluated.
  pub fn applies_when(self, left: Expr) -> Expr {
    match self {
      LogicalOperator::And => left,
      LogicalOperator::Or => negate(left),
      LogicalOperator::Nullish => Expr::Bin(BinExpr {
        span: DUMMY_SP,
        op: BinaryOp::EqEq,
        left: Box::new(parenthesize(left)),
        right: Box::new(Expr::Lit(Lit::Null(Null { span: DUMMY_SP }))),
      }),
    }
  }
}

pub(crate) fn parenthesize(expr: Expr) -> Expr {
  match expr {
    Expr::Ident(_) | Expr::Member(_) | Expr::Call(_) | Expr::Paren(_) | Expr::Lit(_) => expr,
    other => Expr::Paren(ParenExpr {
      span: DUMMY_SP,
      expr: Box::new(other),
    }),
  }
}

pub(crate) fn negate(expr: Expr) -> Expr {
  Expr::Unary(UnaryExpr {
    span: DUMMY_SP,
    op: UnaryOp::Bang,
    arg: Box::new(parenthesize(expr)),
  })
}

pub(crate) fn logical(operator: LogicalOperator, left: Expr, right: Expr) -> Expr {
  let left = match (&left, operator) {
    (Expr::Bin(bin), LogicalOperator::And) if bin.op == BinaryOp::NullishCoalescing => {
      parenthesize(left)
    }
    _ => left,
  };
  Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: operator.to_binary_op(),
    left: Box::new(left),
    right: Box::new(right),
  })
}

/// One unit of built CSS.
#[derive(Clone, Debug, PartialEq)]
pub enum CssItem {
  /// Declarations or rules that always apply.
  Unconditional { css: String },
  /// Exactly one branch applies at runtime. `guard` gates the whole
  /// conditional when it sits under a logical expression or a one-sided
  /// conditional.
  Conditional {
    test: Box<Expr>,
    consequent: Box<CssItem>,
    alternate: Box<CssItem>,
    guard: Option<Box<Expr>>,
  },
  /// CSS applied when `expression <operator> classes` yields the classes.
  Logical {
    css: String,
    expression: Box<Expr>,
    operator: LogicalOperator,
  },
  /// Emitted once regardless of which classes are applied (`@keyframes`).
  Sheet { css: String },
  /// A `css()` declaration compiled elsewhere in the same unit.
  Reference { reference: String, css: String },
  /// A lookup into a variant table declared with `cssMap()`.
  Map { name: String, expression: Box<Expr> },
}

impl CssItem {
  pub fn unconditional(css: impl Into<String>) -> Self {
    CssItem::Unconditional { css: css.into() }
  }

  pub fn logical(css: impl Into<String>, expression: Expr, operator: LogicalOperator) -> Self {
    CssItem::Logical {
      css: css.into(),
      expression: Box::new(expression),
      operator,
    }
  }

  /// Raw CSS text carried by the item. Conditionals concatenate both branches.
  pub fn css(&self) -> String {
    match self {
      CssItem::Unconditional { css }
      | CssItem::Logical { css, .. }
      | CssItem::Sheet { css }
      | CssItem::Reference { css, .. } => css.clone(),
      CssItem::Conditional {
        consequent,
        alternate,
        ..
      } => {
        let mut css = consequent.css();
        css.push_str(&alternate.css());
        css
      }
      CssItem::Map { .. } => String::new(),
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      CssItem::Unconditional { .. } => "unconditional",
      CssItem::Conditional { .. } => "conditional",
      CssItem::Logical { .. } => "logical",
      CssItem::Sheet { .. } => "sheet",
      CssItem::Reference { .. } => "reference",
      CssItem::Map { .. } => "map",
    }
  }

  /// Rewrite the CSS text of every branch, leaving sheets and variant table
  /// lookups untouched.
  pub(crate) fn map_css(self, f: &impl Fn(String) -> String) -> CssItem {
    match self {
      CssItem::Unconditional { css } => CssItem::Unconditional { css: f(css) },
      CssItem::Logical {
        css,
        expression,
        operator,
      } => CssItem::Logical {
        css: f(css),
        expression,
        operator,
      },
      CssItem::Reference { reference, css } => CssItem::Reference {
        reference,
        css: f(css),
      },
      CssItem::Conditional {
        test,
        consequent,
        alternate,
        guard,
      } => CssItem::Conditional {
        test,
        consequent: Box::new(consequent.map_css(f)),
        alternate: Box::new(alternate.map_css(f)),
        guard,
      },
      item @ (CssItem::Sheet { .. } | CssItem::Map { .. }) => item,
    }
  }
}

/// A value that could not be reduced at build time. It is passed to the
/// runtime as a custom property and referenced as `var(name)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
  pub name: String,
  pub expression: Expr,
  pub prefix: Option<String>,
  pub suffix: Option<String>,
}

/// Built CSS for one style expression.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CssOutput {
  pub css: Vec<CssItem>,
  pub variables: Vec<Variable>,
}

impl CssOutput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_item(item: CssItem) -> Self {
    Self {
      css: vec![item],
      variables: Vec::new(),
    }
  }

  pub fn extend(&mut self, other: CssOutput) {
    self.css.extend(other.css);
    self.variables.extend(other.variables);
  }

  pub fn is_empty(&self) -> bool {
    self.css.is_empty()
  }
}

/// Where a resolved value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingSource {
  /// Defined in the module being compiled.
  Module,
  /// Reached through an import.
  Import,
}
