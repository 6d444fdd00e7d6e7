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

//! Runtime dispatch for members of the builtin kinds
//!
//! Implementations are keyed by receiver kind and name. Signatures live in
//! [`plc_core::types::MEMBERS`]; dispatch resolves the signature first so
//! the analyzer and interpreter agree on what exists.

use crate::decimal;
use crate::error::{EvaluationError, EvaluationResult};
use crate::value::Value;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use plc_core::Type;

type MemberFn = fn(&Value, &[Value], usize) -> EvaluationResult<Value>;

static IMPLEMENTATIONS: &[(Type, &str, MemberFn)] = &[
    (Type::String, "length", string_length),
    (Type::String, "charAt", string_char_at),
    (Type::String, "concat", string_concat),
    (Type::Integer, "toDecimal", integer_to_decimal),
    (Type::Decimal, "toInteger", decimal_to_integer),
    (Type::Boolean, "toString", to_string),
    (Type::Integer, "toString", to_string),
    (Type::Decimal, "toString", to_string),
    (Type::Character, "toString", to_string),
    (Type::String, "toString", to_string),
];

/// Invoke `name` on `receiver` with already evaluated arguments
pub fn invoke(
    receiver: &Value,
    name: &str,
    arguments: &[Value],
    position: usize,
) -> EvaluationResult<Value> {
    let kind = receiver.kind();
    let undefined = || EvaluationError::UndefinedMethod {
        name: name.to_string(),
        arity: arguments.len(),
        receiver: kind,
        position,
    };
    let signature = kind.method(name, arguments.len()).ok_or_else(undefined)?;
    for (parameter, argument) in signature.parameters.iter().zip(arguments) {
        if !parameter.is_assignable_from(argument.kind()) {
            return Err(EvaluationError::TypeMismatch {
                expected: *parameter,
                actual: argument.kind(),
                position,
            });
        }
    }
    let (_, _, implementation) = IMPLEMENTATIONS
        .iter()
        .find(|(ty, member, _)| *ty == kind && *member == name)
        .ok_or_else(undefined)?;
    implementation(receiver, arguments, position)
}

fn string_length(receiver: &Value, _: &[Value], position: usize) -> EvaluationResult<Value> {
    match receiver {
        Value::String(text) => Ok(Value::Integer(BigInt::from(text.chars().count()))),
        other => Err(receiver_mismatch(Type::String, other, position)),
    }
}

fn string_char_at(receiver: &Value, arguments: &[Value], position: usize) -> EvaluationResult<Value> {
    match (receiver, arguments) {
        (Value::String(text), [Value::Integer(index)]) => {
            let length = text.chars().count();
            index
                .to_usize()
                .and_then(|i| text.chars().nth(i))
                .map(Value::Character)
                .ok_or_else(|| EvaluationError::IndexOutOfBounds {
                    index: index.to_string(),
                    length,
                    position,
                })
        }
        (other, _) => Err(receiver_mismatch(Type::String, other, position)),
    }
}

fn string_concat(receiver: &Value, arguments: &[Value], position: usize) -> EvaluationResult<Value> {
    match (receiver, arguments) {
        (Value::String(text), [Value::String(suffix)]) => Ok(Value::String(format!("{text}{suffix}"))),
        (other, _) => Err(receiver_mismatch(Type::String, other, position)),
    }
}

fn integer_to_decimal(receiver: &Value, _: &[Value], position: usize) -> EvaluationResult<Value> {
    match receiver {
        Value::Integer(value) => Ok(Value::Decimal(BigDecimal::new(value.clone(), 0))),
        other => Err(receiver_mismatch(Type::Integer, other, position)),
    }
}

fn decimal_to_integer(receiver: &Value, _: &[Value], position: usize) -> EvaluationResult<Value> {
    match receiver {
        Value::Decimal(value) => Ok(Value::Integer(decimal::round_half_even(value))),
        other => Err(receiver_mismatch(Type::Decimal, other, position)),
    }
}

fn to_string(receiver: &Value, _: &[Value], _: usize) -> EvaluationResult<Value> {
    Ok(Value::String(receiver.to_string()))
}

fn receiver_mismatch(expected: Type, actual: &Value, position: usize) -> EvaluationError {
    EvaluationError::TypeMismatch {
        expected,
        actual: actual.kind(),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plc_core::types::MEMBERS;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(text: &str) -> Value {
        Value::Decimal(BigDecimal::from_str(text).unwrap())
    }

    #[test]
    fn every_signature_has_an_implementation() {
        for signature in MEMBERS {
            assert!(
                IMPLEMENTATIONS
                    .iter()
                    .any(|(ty, name, _)| *ty == signature.receiver && *name == signature.name),
                "{}.{}",
                signature.receiver,
                signature.name
            );
        }
        assert_eq!(IMPLEMENTATIONS.len(), MEMBERS.len());
    }

    #[test]
    fn string_members() {
        let text = Value::from("héllo");
        assert_eq!(invoke(&text, "length", &[], 0).unwrap(), Value::from(5));
        assert_eq!(invoke(&text, "charAt", &[Value::from(1)], 0).unwrap(), Value::from('é'));
        assert_eq!(
            invoke(&text, "concat", &[Value::from("!")], 0).unwrap(),
            Value::from("héllo!")
        );
    }

    #[test]
    fn char_at_is_bounds_checked() {
        let err = invoke(&Value::from("ab"), "charAt", &[Value::from(2)], 9).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::IndexOutOfBounds {
                index: "2".to_string(),
                length: 2,
                position: 9,
            }
        );
        assert!(invoke(&Value::from("ab"), "charAt", &[Value::from(-1)], 0).is_err());
    }

    #[rstest]
    #[case("2.5", "2")]
    #[case("3.5", "4")]
    #[case("-2.5", "-2")]
    #[case("1.49", "1")]
    #[case("123456789012345678901234567890.5", "123456789012345678901234567890")]
    fn to_integer_rounds_half_even(#[case] input: &str, #[case] expected: &str) {
        let expected = Value::Integer(BigInt::from_str(expected).unwrap());
        assert_eq!(invoke(&dec(input), "toInteger", &[], 0).unwrap(), expected);
    }

    #[test]
    fn conversions_and_text() {
        assert_eq!(invoke(&Value::from(3), "toDecimal", &[], 0).unwrap(), dec("3"));
        assert_eq!(invoke(&Value::from(true), "toString", &[], 0).unwrap(), Value::from("true"));
        assert_eq!(invoke(&dec("1.50"), "toString", &[], 0).unwrap(), Value::from("1.50"));
    }

    #[test]
    fn unknown_members_name_the_receiver() {
        let err = invoke(&Value::Nil, "toString", &[], 4).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::UndefinedMethod {
                name: "toString".to_string(),
                arity: 0,
                receiver: Type::Nil,
                position: 4,
            }
        );
        let err = invoke(&Value::from("x"), "charAt", &[Value::from("0")], 1).unwrap_err();
        assert!(matches!(err, EvaluationError::TypeMismatch { expected: Type::Integer, .. }));
    }
}
