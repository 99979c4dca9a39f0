// Author: Dustin Pilgrim
// License: MIT

//! Type inference and safe evaluation of raw value text.
//!
//! A raw value becomes, in this order: a boolean, an integer literal, a
//! real literal, the result of an arithmetic expression, or finally the
//! verbatim string. Expressions only ever see the supplied [`Namespace`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::ast::{BinaryOp, Expr, UnaryOp, Value};
use crate::error::EvalError;
use crate::namespace::{Binding, Function, Namespace};
use crate::parser::parse_expression;
use crate::ConfigError;

static INTEGER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?[0-9]+$").expect("integer literal pattern")
});

static REAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)([eE][+-]?[0-9]+)?$").expect("real literal pattern")
});

/// Where a value lives decides what an unknown name means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Inside the constants section an unknown name is an error.
    Constants,
    /// Anywhere else the text falls back to a plain string.
    Section,
}

/// Evaluate raw text from an ordinary section against `namespace`.
///
/// The returned error has no path or line attached; the loader fills those in.
pub fn evaluate(raw: &str, namespace: &Namespace) -> Result<Value, ConfigError> {
    infer_value(raw, namespace, Scope::Section).map_err(|e| ConfigError::EvaluationError {
        path: String::new(),
        reason: e.to_string(),
        line: 0,
    })
}

pub(crate) fn infer_value(raw: &str, namespace: &Namespace, scope: Scope) -> Result<Value, EvalError> {
    let text = raw.trim();

    if text.eq_ignore_ascii_case("true") {
        return Ok(Value::Boolean(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(Value::Boolean(false));
    }

    if INTEGER_LITERAL.is_match(text) {
        // Too wide for i64: still a number, so read it as a real
        return Ok(text
            .parse::<i64>()
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Real(text.parse::<f64>().unwrap_or(f64::INFINITY))));
    }

    if REAL_LITERAL.is_match(text) {
        if let Ok(r) = text.parse::<f64>() {
            return Ok(Value::Real(r));
        }
    }

    let expr = match parse_expression(text) {
        Ok(expr) => expr,
        Err(e) => {
            trace!(text, reason = %e, "Not an expression, keeping string");
            return Ok(Value::String(text.to_string()));
        }
    };

    match eval_expr(&expr, namespace) {
        Ok(value) => Ok(value),
        Err(EvalError::Unresolved(name)) if scope == Scope::Section => {
            trace!(text, %name, "Unknown name, keeping string");
            Ok(Value::String(text.to_string()))
        }
        Err(e) => Err(e),
    }
}

/// Integers stay integers until something forces a real.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Real(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Real(r) => r,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(i) => Value::Integer(i),
            Num::Real(r) => Value::Real(r),
        }
    }
}

fn to_num(value: Value) -> Result<Num, EvalError> {
    match value {
        Value::Integer(i) => Ok(Num::Int(i)),
        Value::Real(r) => Ok(Num::Real(r)),
        other => Err(EvalError::Invalid(format!(
            "expected a number, got {} '{}'",
            other.type_name(),
            other
        ))),
    }
}

fn eval_expr(expr: &Expr, namespace: &Namespace) -> Result<Value, EvalError> {
    match expr {
        Expr::Integer(i) => Ok(Value::Integer(*i)),
        Expr::Real(r) => Ok(Value::Real(*r)),
        Expr::Ident(name) => match namespace.resolve(name) {
            Some(Binding::Constant(value)) => Ok(value.clone()),
            // a bare function name is no value: same as an unknown name
            Some(Binding::Function(_)) | None => Err(EvalError::Unresolved(name.clone())),
        },
        Expr::Unary(op, inner) => {
            let n = to_num(eval_expr(inner, namespace)?)?;
            Ok(apply_unary(*op, n).into_value())
        }
        Expr::Binary(op, lhs, rhs) => {
            let l = to_num(eval_expr(lhs, namespace)?)?;
            let r = to_num(eval_expr(rhs, namespace)?)?;
            apply_binary(*op, l, r).map(Num::into_value)
        }
        Expr::Call(name, args) => {
            let function = match namespace.resolve(name) {
                Some(Binding::Function(f)) => f,
                Some(Binding::Constant(_)) => {
                    return Err(EvalError::Invalid(format!("'{}' is not a function", name)));
                }
                None => return Err(EvalError::Unresolved(name.clone())),
            };
            let mut nums = Vec::with_capacity(args.len());
            for arg in args {
                nums.push(to_num(eval_expr(arg, namespace)?)?);
            }
            call_function(function, name, &nums).map(Num::into_value)
        }
    }
}

fn apply_unary(op: UnaryOp, n: Num) -> Num {
    match (op, n) {
        (UnaryOp::Plus, n) => n,
        (UnaryOp::Minus, Num::Int(i)) => i.checked_neg().map_or(Num::Real(-(i as f64)), Num::Int),
        (UnaryOp::Minus, Num::Real(r)) => Num::Real(-r),
    }
}

fn apply_binary(op: BinaryOp, l: Num, r: Num) -> Result<Num, EvalError> {
    match op {
        BinaryOp::Add => Ok(int_or_real(l, r, i64::checked_add, |a, b| a + b)),
        BinaryOp::Sub => Ok(int_or_real(l, r, i64::checked_sub, |a, b| a - b)),
        BinaryOp::Mul => Ok(int_or_real(l, r, i64::checked_mul, |a, b| a * b)),
        BinaryOp::Div => {
            check_divisor(r, "division")?;
            Ok(Num::Real(l.as_f64() / r.as_f64()))
        }
        BinaryOp::FloorDiv => {
            check_divisor(r, "floor division")?;
            Ok(int_or_real(l, r, floor_div, |a, b| (a / b).floor()))
        }
        BinaryOp::Mod => {
            check_divisor(r, "modulo")?;
            Ok(int_or_real(l, r, floor_mod, |a, b| a - b * (a / b).floor()))
        }
        BinaryOp::Pow => power(l, r),
    }
}

/// Integer op when both sides are integers and it doesn't overflow, real op otherwise.
fn int_or_real(
    l: Num,
    r: Num,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    real_op: impl Fn(f64, f64) -> f64,
) -> Num {
    if let (Num::Int(a), Num::Int(b)) = (l, r) {
        if let Some(v) = int_op(a, b) {
            return Num::Int(v);
        }
    }
    Num::Real(real_op(l.as_f64(), r.as_f64()))
}

fn check_divisor(r: Num, what: &str) -> Result<(), EvalError> {
    if r.as_f64() == 0.0 {
        Err(EvalError::Invalid(format!("{} by zero", what)))
    } else {
        Ok(())
    }
}

/// Rounds toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

/// Result takes the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let m = a.checked_rem(b)?;
    if m != 0 && ((m < 0) != (b < 0)) {
        Some(m + b)
    } else {
        Some(m)
    }
}

fn power(base: Num, exp: Num) -> Result<Num, EvalError> {
    if let (Num::Int(b), Num::Int(e)) = (base, exp) {
        if e >= 0 {
            if let Some(v) = u32::try_from(e).ok().and_then(|e| b.checked_pow(e)) {
                return Ok(Num::Int(v));
            }
        }
    }

    let (b, e) = (base.as_f64(), exp.as_f64());
    if b == 0.0 && e < 0.0 {
        return Err(EvalError::Invalid("zero cannot be raised to a negative power".into()));
    }
    if b < 0.0 && e.fract() != 0.0 {
        return Err(EvalError::Invalid("negative number cannot be raised to a fractional power".into()));
    }
    Ok(Num::Real(b.powf(e)))
}

fn call_function(function: Function, name: &str, args: &[Num]) -> Result<Num, EvalError> {
    if let Some(expected) = function.arity() {
        if args.len() != expected {
            return Err(EvalError::Invalid(format!(
                "{}() takes {} argument{}, {} given",
                name,
                expected,
                if expected == 1 { "" } else { "s" },
                args.len()
            )));
        }
    }

    let real = |f: fn(f64) -> f64| Ok(Num::Real(f(args[0].as_f64())));

    match function {
        Function::Sin => real(f64::sin),
        Function::Cos => real(f64::cos),
        Function::Tan => real(f64::tan),
        Function::Exp => real(f64::exp),
        Function::Ln => {
            if args[0].as_f64() <= 0.0 {
                return Err(EvalError::Invalid(format!("{}() math domain error", name)));
            }
            real(f64::ln)
        }
        Function::Sqrt => {
            if args[0].as_f64() < 0.0 {
                return Err(EvalError::Invalid(format!("{}() math domain error", name)));
            }
            real(f64::sqrt)
        }
        Function::Abs => Ok(match args[0] {
            Num::Int(i) => i.checked_abs().map_or(Num::Real((i as f64).abs()), Num::Int),
            Num::Real(r) => Num::Real(r.abs()),
        }),
        Function::Int => match args[0] {
            Num::Int(i) => Ok(Num::Int(i)),
            Num::Real(r) => {
                let t = r.trunc();
                if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
                    Ok(Num::Int(t as i64))
                } else {
                    Err(EvalError::Invalid(format!("cannot convert {} to integer", r)))
                }
            }
        },
        Function::Float => Ok(Num::Real(args[0].as_f64())),
        Function::Pow => power(args[0], args[1]),
        Function::Sum => Ok(args
            .iter()
            .fold(Num::Int(0), |acc, &n| int_or_real(acc, n, i64::checked_add, |a, b| a + b))),
    }
}

#[cfg(test)]
mod tests;
