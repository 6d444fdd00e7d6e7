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

//! Expression AST node definitions

use crate::node::NodeId;
use crate::operator::BinaryOperator;
use num_bigint::BigInt;
use smallvec::SmallVec;

/// An expression together with its identity and source position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expression {
    /// Side table key
    pub id: NodeId,
    /// Byte offset of the token that starts the expression. For access and
    /// call nodes this is the offset of the member identifier.
    pub offset: usize,
    /// The expression itself
    pub kind: ExpressionKind,
}

/// Expression variants
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpressionKind {
    /// Literal value
    Literal(Literal),

    /// Parenthesized expression
    Group(Box<Expression>),

    /// Binary operation (boxed for size optimization)
    Binary(Box<BinaryData>),

    /// Variable read, or field read on a receiver
    Access {
        /// Receiver for `receiver.name` forms
        receiver: Option<Box<Expression>>,
        /// Variable or field name
        name: String,
    },

    /// Function call, or method call on a receiver (boxed for size optimization)
    Function(Box<FunctionData>),
}

/// Binary operation data (separate struct to optimize enum size)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryData {
    /// The operator
    pub op: BinaryOperator,
    /// Left operand
    pub left: Expression,
    /// Right operand
    pub right: Expression,
}

/// Function call data (separate struct to optimize enum size)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionData {
    /// Receiver for `receiver.name(...)` forms
    pub receiver: Option<Expression>,
    /// Function or method name
    pub name: String,
    /// Arguments (SmallVec for common case of 0-4 args)
    pub arguments: SmallVec<[Expression; 4]>,
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    /// `NIL`
    Nil,
    /// `TRUE` / `FALSE`
    Boolean(bool),
    /// Integer literal, kept at arbitrary precision
    Integer(BigInt),
    /// Decimal literal (stored as string to preserve precision)
    Decimal(String),
    /// Character literal with escapes decoded
    Character(char),
    /// String literal with escapes decoded
    String(String),
}

impl Expression {
    /// Create an expression node
    pub fn new(id: NodeId, offset: usize, kind: ExpressionKind) -> Self {
        Self { id, offset, kind }
    }

    /// Create a literal expression
    pub fn literal(id: NodeId, offset: usize, value: Literal) -> Self {
        Self::new(id, offset, ExpressionKind::Literal(value))
    }

    /// Create a group expression
    pub fn group(id: NodeId, offset: usize, inner: Expression) -> Self {
        Self::new(id, offset, ExpressionKind::Group(Box::new(inner)))
    }

    /// Create a binary operation expression
    pub fn binary(
        id: NodeId,
        offset: usize,
        op: BinaryOperator,
        left: Expression,
        right: Expression,
    ) -> Self {
        Self::new(
            id,
            offset,
            ExpressionKind::Binary(Box::new(BinaryData { op, left, right })),
        )
    }

    /// Create an access expression
    pub fn access(
        id: NodeId,
        offset: usize,
        receiver: Option<Expression>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            offset,
            ExpressionKind::Access {
                receiver: receiver.map(Box::new),
                name: name.into(),
            },
        )
    }

    /// Create a function call expression
    pub fn function(
        id: NodeId,
        offset: usize,
        receiver: Option<Expression>,
        name: impl Into<String>,
        arguments: impl Into<SmallVec<[Expression; 4]>>,
    ) -> Self {
        Self::new(
            id,
            offset,
            ExpressionKind::Function(Box::new(FunctionData {
                receiver,
                name: name.into(),
                arguments: arguments.into(),
            })),
        )
    }

    /// Check if this expression is an access (a valid assignment target)
    pub fn is_access(&self) -> bool {
        matches!(self.kind, ExpressionKind::Access { .. })
    }

    /// Check if this expression is a function call
    pub fn is_function(&self) -> bool {
        matches!(self.kind, ExpressionKind::Function(_))
    }

    /// Get the literal value if this is a literal expression
    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExpressionKind::Literal(value) => Some(value),
            _ => None,
        }
    }
}
