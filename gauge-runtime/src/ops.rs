//! Operators over runtime values
//!
//! Numbers combine as exact rationals. Unit values follow the unit
//! arithmetic rules: same-family addition, scalar scaling, ratios, and
//! comparisons aligned into the left operand's system.

use crate::Value;
use gauge_core::{codes, GaugeError, Number};
use gauge_units::{UnitError, UnitValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp { Add, Sub, Mul, Div, Eq, Ne, Lt, Le, Gt, Ge }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp { Neg }

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            BinaryOp::Eq => ordering == Ordering::Equal,
            BinaryOp::Ne => ordering != Ordering::Equal,
            BinaryOp::Lt => ordering == Ordering::Less,
            BinaryOp::Le => ordering != Ordering::Greater,
            BinaryOp::Gt => ordering == Ordering::Greater,
            BinaryOp::Ge => ordering != Ordering::Less,
            _ => false,
        }
    }

    /// Verb used in scalar promotion messages
    fn verb(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "subtract",
            BinaryOp::Mul => "multiply",
            BinaryOp::Div => "divide",
            _ => "compare",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Apply a binary operator
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    // Propagate errors
    if let Value::Error(e) = left {
        return Value::Error(e.clone().with_note("from left operand"));
    }
    if let Value::Error(e) = right {
        return Value::Error(e.clone().with_note("from right operand"));
    }

    trace!(op = op.symbol(), left = left.type_name(), right = right.type_name(), "binary op");

    match (left, right) {
        (Value::Number(l), Value::Number(r)) => numbers(op, l, r),
        (Value::Unit(l), Value::Unit(r)) => units(op, l, r),
        (Value::Unit(u), Value::Number(n)) => unit_and_number(op, u, n),
        (Value::Number(n), Value::Unit(u)) => number_and_unit(op, n, u),
        _ => match op {
            BinaryOp::Eq => Value::Bool(left == right),
            BinaryOp::Ne => Value::Bool(left != right),
            _ => {
                let bad = if matches!(left, Value::Number(_) | Value::Unit(_)) { right } else { left };
                Value::Error(GaugeError::type_error("Number or Unit", bad.type_name()))
            }
        },
    }
}

/// Apply a unary operator
pub fn unary(op: UnaryOp, value: &Value) -> Value {
    if let Value::Error(e) = value {
        return Value::Error(e.clone());
    }

    match op {
        UnaryOp::Neg => match value {
            Value::Number(n) => Value::Number(n.neg()),
            Value::Unit(u) => u.neg().into(),
            _ => Value::Error(GaugeError::type_error("Number or Unit", value.type_name())),
        },
    }
}

fn numbers(op: BinaryOp, l: &Number, r: &Number) -> Value {
    match op {
        BinaryOp::Add => Value::Number(l.add(r)),
        BinaryOp::Sub => Value::Number(l.sub(r)),
        BinaryOp::Mul => Value::Number(l.mul(r)),
        BinaryOp::Div => match l.checked_div(r) {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e.into()),
        },
        _ => Value::Bool(op.holds(l.cmp(r))),
    }
}

fn units(op: BinaryOp, l: &UnitValue, r: &UnitValue) -> Value {
    match op {
        BinaryOp::Add => l.add(r).into(),
        BinaryOp::Sub => l.sub(r).into(),
        BinaryOp::Mul => Value::Error(
            GaugeError::new(codes::UNSUPPORTED_OPERATION, "Cannot multiply two unit values")
                .with_suggestion("Multiply a unit value by a plain number")
                .with_example(format!("#2{} * 3", l.display_hint())),
        ),
        BinaryOp::Div => l.ratio(r).into(),
        BinaryOp::Eq => Value::Bool(l.equals(r)),
        BinaryOp::Ne => Value::Bool(!l.equals(r)),
        _ => match l.compare(r) {
            Ok(ordering) => Value::Bool(op.holds(ordering)),
            Err(e) => Value::Error(e.into()),
        },
    }
}

fn unit_and_number(op: BinaryOp, u: &UnitValue, n: &Number) -> Value {
    match op {
        BinaryOp::Mul => u.mul_scalar(n).into(),
        BinaryOp::Div => u.div_scalar(n).into(),
        BinaryOp::Eq => Value::Bool(false),
        BinaryOp::Ne => Value::Bool(true),
        _ => scalar_promotion(op, u),
    }
}

fn number_and_unit(op: BinaryOp, n: &Number, u: &UnitValue) -> Value {
    match op {
        BinaryOp::Mul => u.mul_scalar(n).into(),
        BinaryOp::Div => Value::Error(
            GaugeError::new(codes::UNSUPPORTED_OPERATION, "Cannot divide a plain number by a unit value")
                .with_suggestion("Divide two values of the same family to get a plain ratio")
                .with_example(format!("#10{} / #2{}", u.display_hint(), u.display_hint())),
        ),
        BinaryOp::Eq => Value::Bool(false),
        BinaryOp::Ne => Value::Bool(true),
        _ => scalar_promotion(op, u),
    }
}

fn scalar_promotion(op: BinaryOp, u: &UnitValue) -> Value {
    let err: GaugeError = UnitError::ScalarPromotion { op: op.verb(), family: u.family() }.into();
    Value::Error(err)
}
