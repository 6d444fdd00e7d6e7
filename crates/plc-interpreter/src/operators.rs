// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Binary operator semantics
//!
//! `&&` and `||` never reach this module; the interpreter short-circuits
//! them before the right operand is evaluated.

use crate::decimal;
use crate::error::{EvaluationError, EvaluationResult};
use crate::value::Value;
use num_traits::Zero;
use plc_ast::BinaryOperator;
use std::cmp::Ordering;

/// Apply a non-logical binary operator to two evaluated operands
pub fn apply(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    position: usize,
) -> EvaluationResult<Value> {
    match op {
        BinaryOperator::Equal => Ok(Value::Boolean(left == right)),
        BinaryOperator::NotEqual => Ok(Value::Boolean(left != right)),
        BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => {
            let ordering = compare(op, left, right, position)?;
            Ok(Value::Boolean(match op {
                BinaryOperator::LessThan => ordering == Ordering::Less,
                BinaryOperator::LessThanOrEqual => ordering != Ordering::Greater,
                BinaryOperator::GreaterThan => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOperator::Add => add(left, right, position),
        BinaryOperator::Subtract | BinaryOperator::Multiply | BinaryOperator::Divide => {
            arithmetic(op, left, right, position)
        }
        BinaryOperator::And | BinaryOperator::Or => match (left, right) {
            (Value::Boolean(l), Value::Boolean(r)) => Ok(Value::Boolean(if op == BinaryOperator::And {
                *l && *r
            } else {
                *l || *r
            })),
            _ => Err(unsupported(op, left, right, position)),
        },
    }
}

fn unsupported(op: BinaryOperator, left: &Value, right: &Value, position: usize) -> EvaluationError {
    EvaluationError::UnsupportedOperands {
        op,
        left: left.kind(),
        right: right.kind(),
        position,
    }
}

/// Natural ordering of two values of the same ordered kind
fn compare(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    position: usize,
) -> EvaluationResult<Ordering> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => Ok(l.cmp(r)),
        (Value::Decimal(l), Value::Decimal(r)) => Ok(l.cmp(r)),
        (Value::Character(l), Value::Character(r)) => Ok(l.cmp(r)),
        (Value::String(l), Value::String(r)) => Ok(l.cmp(r)),
        _ => Err(unsupported(op, left, right, position)),
    }
}

fn add(left: &Value, right: &Value, position: usize) -> EvaluationResult<Value> {
    match (left, right) {
        (Value::String(_), _) | (_, Value::String(_)) => Ok(Value::String(format!("{left}{right}"))),
        (Value::Integer(l), Value::Integer(r)) => Ok(Value::Integer(l + r)),
        (Value::Decimal(l), Value::Decimal(r)) => Ok(Value::Decimal(decimal::add(l, r))),
        _ => Err(unsupported(BinaryOperator::Add, left, right, position)),
    }
}

fn arithmetic(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    position: usize,
) -> EvaluationResult<Value> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => match op {
            BinaryOperator::Subtract => Ok(Value::Integer(l - r)),
            BinaryOperator::Multiply => Ok(Value::Integer(l * r)),
            _ => {
                if r.is_zero() {
                    return Err(EvaluationError::DivideByZero { position });
                }
                // BigInt division truncates toward zero
                Ok(Value::Integer(l / r))
            }
        },
        (Value::Decimal(l), Value::Decimal(r)) => match op {
            BinaryOperator::Subtract => Ok(Value::Decimal(decimal::subtract(l, r))),
            BinaryOperator::Multiply => Ok(Value::Decimal(decimal::multiply(l, r))),
            _ => decimal::divide(l, r)
                .map(Value::Decimal)
                .ok_or(EvaluationError::DivideByZero { position }),
        },
        _ => Err(unsupported(op, left, right, position)),
    }
}
