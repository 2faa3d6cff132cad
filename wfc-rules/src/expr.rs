//! Typed predicate and formula expressions over grid coordinates.
//!
//! Rule files describe placement rules, initialisation rules and pass-level
//! radius formulas as small expression trees. Evaluation only ever sees the
//! variables bound in [`Bindings`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while evaluating an [`Expr`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("Expected a {expected} value but the expression produced {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow while evaluating expression")]
    Overflow,
}

/// Variables an expression may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    X,
    Y,
    MaxX,
    MaxY,
    MapWidth,
    MapHeight,
}

/// Variable bindings for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub x: i64,
    pub y: i64,
    pub map_width: i64,
    pub map_height: i64,
}

impl Bindings {
    /// Bindings for the cell at `(x, y)` on a `width` x `height` map.
    pub fn for_cell(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x: to_i64(x),
            y: to_i64(y),
            map_width: to_i64(width),
            map_height: to_i64(height),
        }
    }

    /// Map-level bindings; `X` and `Y` are zero.
    pub fn for_map(width: usize, height: usize) -> Self {
        Self::for_cell(0, 0, width, height)
    }

    fn get(&self, variable: Variable) -> i64 {
        match variable {
            Variable::X => self.x,
            Variable::Y => self.y,
            Variable::MaxX => self.map_width - 1,
            Variable::MaxY => self.map_height - 1,
            Variable::MapWidth => self.map_width,
            Variable::MapHeight => self.map_height,
        }
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Result of evaluating an [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl Value {
    const fn type_name(self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
        }
    }
}

/// Expression tree.
///
/// In RON this reads naturally, e.g. `And([Gt(Var(X), Int(0)), Lt(Var(Y), Var(MaxY))])`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Int(i64),
    Bool(bool),
    Var(Variable),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Mod(Box<Expr>, Box<Expr>),
    Min(Box<Expr>, Box<Expr>),
    Max(Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
    Le(Box<Expr>, Box<Expr>),
    Gt(Box<Expr>, Box<Expr>),
    Ge(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Default for Expr {
    fn default() -> Self {
        Self::Int(1)
    }
}

impl Expr {
    pub fn var(variable: Variable) -> Self {
        Self::Var(variable)
    }

    /// Shorthand for building binary nodes in code.
    pub fn binary(op: fn(Box<Expr>, Box<Expr>) -> Expr, lhs: Expr, rhs: Expr) -> Self {
        op(Box::new(lhs), Box::new(rhs))
    }

    pub fn evaluate(&self, bindings: &Bindings) -> Result<Value, ExprError> {
        Ok(match self {
            Self::Int(value) => Value::Int(*value),
            Self::Bool(value) => Value::Bool(*value),
            Self::Var(variable) => Value::Int(bindings.get(*variable)),
            Self::Neg(inner) => Value::Int(
                inner
                    .eval_int(bindings)?
                    .checked_neg()
                    .ok_or(ExprError::Overflow)?,
            ),
            Self::Add(l, r) => Value::Int(arith(l, r, bindings, i64::checked_add)?),
            Self::Sub(l, r) => Value::Int(arith(l, r, bindings, i64::checked_sub)?),
            Self::Mul(l, r) => Value::Int(arith(l, r, bindings, i64::checked_mul)?),
            Self::Div(l, r) => Value::Int(divide(l, r, bindings, i64::checked_div)?),
            Self::Mod(l, r) => Value::Int(divide(l, r, bindings, i64::checked_rem_euclid)?),
            Self::Min(l, r) => Value::Int(l.eval_int(bindings)?.min(r.eval_int(bindings)?)),
            Self::Max(l, r) => Value::Int(l.eval_int(bindings)?.max(r.eval_int(bindings)?)),
            Self::Eq(l, r) => Value::Bool(l.evaluate(bindings)? == r.evaluate(bindings)?),
            Self::Ne(l, r) => Value::Bool(l.evaluate(bindings)? != r.evaluate(bindings)?),
            Self::Lt(l, r) => Value::Bool(l.eval_int(bindings)? < r.eval_int(bindings)?),
            Self::Le(l, r) => Value::Bool(l.eval_int(bindings)? <= r.eval_int(bindings)?),
            Self::Gt(l, r) => Value::Bool(l.eval_int(bindings)? > r.eval_int(bindings)?),
            Self::Ge(l, r) => Value::Bool(l.eval_int(bindings)? >= r.eval_int(bindings)?),
            Self::Not(inner) => Value::Bool(!inner.eval_bool(bindings)?),
            Self::And(terms) => {
                for term in terms {
                    if !term.eval_bool(bindings)? {
                        return Ok(Value::Bool(false));
                    }
                }
                Value::Bool(true)
            }
            Self::Or(terms) => {
                for term in terms {
                    if term.eval_bool(bindings)? {
                        return Ok(Value::Bool(true));
                    }
                }
                Value::Bool(false)
            }
        })
    }

    pub fn eval_int(&self, bindings: &Bindings) -> Result<i64, ExprError> {
        match self.evaluate(bindings)? {
            Value::Int(value) => Ok(value),
            other => Err(ExprError::TypeMismatch {
                expected: "integer",
                found: other.type_name(),
            }),
        }
    }

    pub fn eval_bool(&self, bindings: &Bindings) -> Result<bool, ExprError> {
        match self.evaluate(bindings)? {
            Value::Bool(value) => Ok(value),
            other => Err(ExprError::TypeMismatch {
                expected: "boolean",
                found: other.type_name(),
            }),
        }
    }
}

fn arith(
    lhs: &Expr,
    rhs: &Expr,
    bindings: &Bindings,
    op: fn(i64, i64) -> Option<i64>,
) -> Result<i64, ExprError> {
    op(lhs.eval_int(bindings)?, rhs.eval_int(bindings)?).ok_or(ExprError::Overflow)
}

fn divide(
    lhs: &Expr,
    rhs: &Expr,
    bindings: &Bindings,
    op: fn(i64, i64) -> Option<i64>,
) -> Result<i64, ExprError> {
    let divisor = rhs.eval_int(bindings)?;
    if divisor == 0 {
        return Err(ExprError::DivisionByZero);
    }
    op(lhs.eval_int(bindings)?, divisor).ok_or(ExprError::Overflow)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Var(v) => write!(f, "{v:?}"),
            Self::Neg(e) => write!(f, "-({e})"),
            Self::Add(l, r) => write!(f, "({l} + {r})"),
            Self::Sub(l, r) => write!(f, "({l} - {r})"),
            Self::Mul(l, r) => write!(f, "({l} * {r})"),
            Self::Div(l, r) => write!(f, "({l} / {r})"),
            Self::Mod(l, r) => write!(f, "({l} % {r})"),
            Self::Min(l, r) => write!(f, "min({l}, {r})"),
            Self::Max(l, r) => write!(f, "max({l}, {r})"),
            Self::Eq(l, r) => write!(f, "({l} == {r})"),
            Self::Ne(l, r) => write!(f, "({l} != {r})"),
            Self::Lt(l, r) => write!(f, "({l} < {r})"),
            Self::Le(l, r) => write!(f, "({l} <= {r})"),
            Self::Gt(l, r) => write!(f, "({l} > {r})"),
            Self::Ge(l, r) => write!(f, "({l} >= {r})"),
            Self::Not(e) => write!(f, "!({e})"),
            Self::And(terms) => write_joined(f, terms, " && "),
            Self::Or(terms) => write_joined(f, terms, " || "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[Expr], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{term}")?;
    }
    f.write_str(")")
}
