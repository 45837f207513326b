use swc_core::common::Span;
use swc_core::ecma::ast::{BinaryOp, Expr, Lit, Number, Str, Tpl, UnaryOp};

/// Number formatted the way JavaScript stringifies it.
pub fn number_to_string(value: f64) -> String {
  if value == 0.0 {
    return "0".into();
  }
  if value.is_nan() {
    return "NaN".into();
  }
  if value.is_infinite() {
    return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
  }
  format!("{value}")
}

pub(crate) fn string_literal(value: &str, span: Span) -> Expr {
  Expr::Lit(Lit::Str(Str {
    span,
    value: value.into(),
    raw: None,
  }))
}

pub(crate) fn number_literal(value: f64, span: Span) -> Expr {
  Expr::Lit(Lit::Num(Number {
    span,
    value,
    raw: None,
  }))
}

enum Literal {
  Str(String),
  Num(f64),
}

impl Literal {
  fn from_expr(expr: &Expr) -> Option<Self> {
    match expr {
      Expr::Lit(Lit::Str(value)) => Some(Literal::Str(value.value.to_string())),
      Expr::Lit(Lit::Num(value)) => Some(Literal::Num(value.value)),
      _ => None,
    }
  }

  fn into_string(self) -> String {
    match self {
      Literal::Str(value) => value,
      Literal::Num(value) => number_to_string(value),
    }
  }
}

pub(super) fn fold_binary(op: BinaryOp, left: &Expr, right: &Expr, span: Span) -> Option<Expr> {
  let left = Literal::from_expr(left)?;
  let right = Literal::from_expr(right)?;

  match (op, left, right) {
    (BinaryOp::Add, Literal::Num(a), Literal::Num(b)) => Some(number_literal(a + b, span)),
    (BinaryOp::Add, left, right) => {
      let mut value = left.into_string();
      value.push_str(&right.into_string());
      Some(string_literal(&value, span))
    }
    (op, Literal::Num(a), Literal::Num(b)) => {
      let value = match op {
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        BinaryOp::Exp => a.powf(b),
        _ => return None,
      };
      Some(number_literal(value, span))
    }
    _ => None,
  }
}

pub(super) fn fold_unary(op: UnaryOp, arg: &Expr, span: Span) -> Option<Expr> {
  let Expr::Lit(Lit::Num(number)) = arg else {
    return None;
  };
  match op {
    UnaryOp::Minus => Some(number_literal(-number.value, span)),
    UnaryOp::Plus => Some(number_literal(number.value, span)),
    _ => None,
  }
}

/// Template whose interpolations are all literals, as one string.
pub(super) fn fold_template(tpl: &Tpl, parts: &[Expr]) -> Option<Expr> {
  let mut value = String::new();
  for (index, quasi) in tpl.quasis.iter().enumerate() {
    value.push_str(quasi.cooked.as_ref().unwrap_or(&quasi.raw));
    if let Some(part) = parts.get(index) {
      value.push_str(&Literal::from_expr(part)?.into_string());
    }
  }
  Some(string_literal(&value, tpl.span))
}
