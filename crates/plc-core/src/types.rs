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

//! Builtin type model
//!
//! The language has a closed set of nominal types. `Any` and `Comparable` are
//! abstract: no value has them as its runtime kind, they only appear as the
//! target side of an assignability check.

use std::fmt;
use thiserror::Error;

/// A builtin type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    /// Top type, accepts every other type
    Any,
    /// The type of `NIL` and of methods without a declared return type
    Nil,
    /// Accepts the four ordered kinds
    Comparable,
    /// `TRUE` / `FALSE`
    Boolean,
    /// Arbitrary precision integer
    Integer,
    /// Decimal number
    Decimal,
    /// Single character
    Character,
    /// Character string
    String,
}

/// Error raised when a source type cannot flow into a target type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Type '{actual}' is not assignable to '{target}'")]
pub struct AssignabilityError {
    /// Type on the receiving side
    pub target: Type,
    /// Type that was offered
    pub actual: Type,
}

/// Signature of a member callable on a value of a builtin kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSignature {
    /// Kind the member is defined on
    pub receiver: Type,
    /// Member name as written in source
    pub name: &'static str,
    /// Member name in generated Java
    pub jvm_name: &'static str,
    /// Parameter types, excluding the receiver
    pub parameters: &'static [Type],
    /// Result type
    pub returns: Type,
}

impl MemberSignature {
    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

const fn member(
    receiver: Type,
    name: &'static str,
    jvm_name: &'static str,
    parameters: &'static [Type],
    returns: Type,
) -> MemberSignature {
    MemberSignature {
        receiver,
        name,
        jvm_name,
        parameters,
        returns,
    }
}

/// Methods available on the builtin kinds, keyed by receiver, name and arity
pub static MEMBERS: &[MemberSignature] = &[
    member(Type::String, "length", "length", &[], Type::Integer),
    member(Type::String, "charAt", "charAt", &[Type::Integer], Type::Character),
    member(Type::String, "concat", "concat", &[Type::String], Type::String),
    member(Type::Integer, "toDecimal", "doubleValue", &[], Type::Decimal),
    member(Type::Decimal, "toInteger", "intValue", &[], Type::Integer),
    member(Type::Boolean, "toString", "toString", &[], Type::String),
    member(Type::Integer, "toString", "toString", &[], Type::String),
    member(Type::Decimal, "toString", "toString", &[], Type::String),
    member(Type::Character, "toString", "toString", &[], Type::String),
    member(Type::String, "toString", "toString", &[], Type::String),
];

impl Type {
    /// Every builtin type, in declaration order
    pub const ALL: [Type; 8] = [
        Type::Any,
        Type::Nil,
        Type::Comparable,
        Type::Boolean,
        Type::Integer,
        Type::Decimal,
        Type::Character,
        Type::String,
    ];

    /// Name used in source type annotations
    pub const fn name(self) -> &'static str {
        match self {
            Type::Any => "Any",
            Type::Nil => "Nil",
            Type::Comparable => "Comparable",
            Type::Boolean => "Boolean",
            Type::Integer => "Integer",
            Type::Decimal => "Decimal",
            Type::Character => "Character",
            Type::String => "String",
        }
    }

    /// Name of the corresponding Java type
    pub const fn jvm_name(self) -> &'static str {
        match self {
            Type::Any => "Object",
            Type::Nil => "Void",
            Type::Comparable => "Comparable",
            Type::Boolean => "boolean",
            Type::Integer => "int",
            Type::Decimal => "double",
            Type::Character => "char",
            Type::String => "String",
        }
    }

    /// Resolve a type annotation
    pub fn from_name(name: &str) -> Option<Type> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Whether values of this type are ordered (Integer, Decimal, Character, String)
    pub const fn is_comparable(self) -> bool {
        matches!(
            self,
            Type::Integer | Type::Decimal | Type::Character | Type::String
        )
    }

    /// Assignability law: identical types, `Any` targets, and `Comparable`
    /// targets receiving one of the four ordered kinds
    pub fn is_assignable_from(self, source: Type) -> bool {
        self == source
            || self == Type::Any
            || (self == Type::Comparable && source.is_comparable())
    }

    /// Checked form of [`Type::is_assignable_from`]
    pub fn require_assignable(target: Type, source: Type) -> Result<(), AssignabilityError> {
        if target.is_assignable_from(source) {
            Ok(())
        } else {
            Err(AssignabilityError {
                target,
                actual: source,
            })
        }
    }

    /// Look up a field on this type. The builtin kinds expose no fields.
    pub fn field(self, _name: &str) -> Option<Type> {
        None
    }

    /// Look up a method on this type by name and arity
    pub fn method(self, name: &str, arity: usize) -> Option<&'static MemberSignature> {
        MEMBERS
            .iter()
            .find(|m| m.receiver == self && m.name == name && m.arity() == arity)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn every_type_is_assignable_to_itself_and_any() {
        for ty in Type::ALL {
            assert!(Type::require_assignable(ty, ty).is_ok(), "{ty} -> {ty}");
            assert!(Type::require_assignable(Type::Any, ty).is_ok(), "{ty} -> Any");
        }
    }

    #[rstest]
    #[case(Type::Integer, true)]
    #[case(Type::Decimal, true)]
    #[case(Type::Character, true)]
    #[case(Type::String, true)]
    #[case(Type::Boolean, false)]
    #[case(Type::Nil, false)]
    #[case(Type::Any, false)]
    #[case(Type::Comparable, true)]
    fn comparable_accepts_ordered_kinds(#[case] source: Type, #[case] accepted: bool) {
        assert_eq!(
            Type::require_assignable(Type::Comparable, source).is_ok(),
            accepted
        );
    }

    #[test]
    fn all_other_pairs_are_rejected() {
        for target in Type::ALL {
            for source in Type::ALL {
                let expected = target == source
                    || target == Type::Any
                    || (target == Type::Comparable && source.is_comparable());
                assert_eq!(target.is_assignable_from(source), expected, "{source} -> {target}");
            }
        }
    }

    #[test]
    fn assignability_error_names_both_types() {
        let err = Type::require_assignable(Type::Integer, Type::String).unwrap_err();
        assert_eq!(err.to_string(), "Type 'String' is not assignable to 'Integer'");
    }

    #[test]
    fn type_names_round_trip() {
        for ty in Type::ALL {
            assert_eq!(Type::from_name(ty.name()), Some(ty));
        }
        assert_eq!(Type::from_name("Object"), None);
    }

    #[test]
    fn members_resolve_by_arity() {
        assert_eq!(
            Type::String.method("charAt", 1).map(|m| m.returns),
            Some(Type::Character)
        );
        assert!(Type::String.method("charAt", 0).is_none());
        assert!(Type::Nil.method("toString", 0).is_none());
        assert!(Type::Integer.field("value").is_none());
    }
}
