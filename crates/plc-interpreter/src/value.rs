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

//! Runtime values

use crate::decimal;
use crate::error::{EvaluationError, EvaluationResult};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use plc_ast::Literal;
use plc_core::Type;
use std::fmt;
use std::str::FromStr;

/// A runtime value; the closed set of kinds a program can produce
#[derive(Debug, Clone)]
pub enum Value {
    /// `NIL`
    Nil,
    /// Boolean
    Boolean(bool),
    /// Arbitrary precision integer
    Integer(BigInt),
    /// Arbitrary precision decimal, keeping its scale
    Decimal(BigDecimal),
    /// Character
    Character(char),
    /// String
    String(String),
}

impl Value {
    /// Runtime kind of this value
    pub fn kind(&self) -> Type {
        match self {
            Value::Nil => Type::Nil,
            Value::Boolean(_) => Type::Boolean,
            Value::Integer(_) => Type::Integer,
            Value::Decimal(_) => Type::Decimal,
            Value::Character(_) => Type::Character,
            Value::String(_) => Type::String,
        }
    }

    /// Build the value a literal denotes
    pub fn from_literal(literal: &Literal, position: usize) -> EvaluationResult<Self> {
        Ok(match literal {
            Literal::Nil => Value::Nil,
            Literal::Boolean(value) => Value::Boolean(*value),
            Literal::Integer(value) => Value::Integer(value.clone()),
            Literal::Decimal(text) => {
                let digits = text.strip_prefix('+').unwrap_or(text);
                let value = BigDecimal::from_str(digits).map_err(|_| EvaluationError::InvalidLiteral {
                    literal: text.clone(),
                    position,
                })?;
                Value::Decimal(value)
            }
            Literal::Character(value) => Value::Character(*value),
            Literal::String(value) => Value::String(value.clone()),
        })
    }

    /// Boolean payload, failing on any other kind
    pub fn as_boolean(&self, position: usize) -> EvaluationResult<bool> {
        match self {
            Value::Boolean(value) => Ok(*value),
            other => Err(EvaluationError::TypeMismatch {
                expected: Type::Boolean,
                actual: other.kind(),
                position,
            }),
        }
    }

    /// Whether this is `NIL`
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

/// Structural equality: same kind and same payload. Decimals must also
/// agree in scale, so `1.0 != 1.00`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::Integer(l), Value::Integer(r)) => l == r,
            (Value::Decimal(l), Value::Decimal(r)) => decimal::identical(l, r),
            (Value::Character(l), Value::Character(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("NIL"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Decimal(value) => decimal::format(value, f),
            Value::Character(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(BigInt::from(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Character(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_literals_keep_scale() {
        let value = Value::from_literal(&Literal::Decimal("+1.50".to_string()), 0).unwrap();
        assert_eq!(value.to_string(), "1.50");
        assert_eq!(value.kind(), Type::Decimal);
    }

    #[test]
    fn decimal_literals_beyond_machine_precision() {
        let text = "123456789012345678901234567890.000000000000000000001";
        let value = Value::from_literal(&Literal::Decimal(text.to_string()), 0).unwrap();
        assert_eq!(value.to_string(), text);
    }

    #[test]
    fn decimal_equality_is_scale_sensitive() {
        let one = |text: &str| Value::from_literal(&Literal::Decimal(text.to_string()), 0).unwrap();
        assert_eq!(one("1.0"), one("1.0"));
        assert_ne!(one("1.0"), one("1.00"));
        assert_ne!(Value::from(1), one("1.0"));
    }

    #[test]
    fn textual_forms() {
        assert_eq!(Value::Nil.to_string(), "NIL");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from('x').to_string(), "x");
        assert_eq!(Value::from(-42).to_string(), "-42");
    }

    #[test]
    fn condition_must_be_boolean() {
        assert!(Value::from(true).as_boolean(0).unwrap());
        assert_eq!(
            Value::from(1).as_boolean(7),
            Err(EvaluationError::TypeMismatch {
                expected: Type::Boolean,
                actual: Type::Integer,
                position: 7,
            })
        );
    }
}
