//! Binary operator implementations for the evaluator.
//!
//! The value set is fixed, so dispatch is a match on [`BinaryOp`] followed by
//! a match on the operand variants. Arithmetic and ordering accept integers
//! only; equality and the logical operators accept anything.

use lam_ir::BinaryOp;

use crate::errors::{integer_overflow, not_a_number, unknown_operator, zero_division};
use crate::{EvalResult, Value};

/// Checked arithmetic where the only failure is overflow.
#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

/// Checked `/` or `%`: zero divisor first, then overflow (`i64::MIN / -1`).
#[inline]
fn checked_div<F>(divisor: i64, op: F, op_name: &'static str) -> EvalResult
where
    F: FnOnce() -> Option<i64>,
{
    if divisor == 0 {
        Err(zero_division())
    } else {
        checked_arith(op(), op_name)
    }
}

#[inline]
fn expect_int(value: &Value) -> EvalResult<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(not_a_number(other)),
    }
}

/// Resolve an operator symbol and apply it.
///
/// Fails with `UnknownOperator` when the symbol is not in the table.
pub fn apply_operator(symbol: &str, left: Value, right: Value) -> EvalResult {
    let op = BinaryOp::from_symbol(symbol).ok_or_else(|| unknown_operator(symbol))?;
    evaluate_binary(left, right, op)
}

/// Evaluate a binary operation on two already-evaluated operands.
#[expect(
    clippy::needless_pass_by_value,
    reason = "`&&` and `||` hand one of the owned operands back"
)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And => Ok(if left.is_truthy() { right } else { Value::Bool(false) }),
        BinaryOp::Or => Ok(if left.is_truthy() { left } else { right }),
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Add => int_arith(&left, &right, i64::checked_add, "addition"),
        BinaryOp::Sub => int_arith(&left, &right, i64::checked_sub, "subtraction"),
        BinaryOp::Mul => int_arith(&left, &right, i64::checked_mul, "multiplication"),
        BinaryOp::Div => {
            let (a, b) = int_operands(&left, &right)?;
            checked_div(b, || a.checked_div(b), "division")
        }
        BinaryOp::Mod => {
            let (a, b) = int_operands(&left, &right)?;
            checked_div(b, || a.checked_rem(b), "remainder")
        }
        BinaryOp::Lt => int_compare(&left, &right, |a, b| a < b),
        BinaryOp::LtEq => int_compare(&left, &right, |a, b| a <= b),
        BinaryOp::Gt => int_compare(&left, &right, |a, b| a > b),
        BinaryOp::GtEq => int_compare(&left, &right, |a, b| a >= b),
    }
}

/// Both operands as integers, left first. A non-integer divisor is reported
/// before a zero one.
#[inline]
fn int_operands(left: &Value, right: &Value) -> EvalResult<(i64, i64)> {
    Ok((expect_int(left)?, expect_int(right)?))
}

#[inline]
fn int_arith(
    left: &Value,
    right: &Value,
    op: fn(i64, i64) -> Option<i64>,
    op_name: &'static str,
) -> EvalResult {
    let (a, b) = int_operands(left, right)?;
    checked_arith(op(a, b), op_name)
}

#[inline]
fn int_compare(left: &Value, right: &Value, cmp: fn(i64, i64) -> bool) -> EvalResult {
    let (a, b) = int_operands(left, right)?;
    Ok(Value::Bool(cmp(a, b)))
}
