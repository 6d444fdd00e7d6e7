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

//! Runtime error types

use plc_ast::BinaryOperator;
use plc_core::{Phase, PhaseError, Type};
use thiserror::Error;

/// Result type for evaluation
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Unrecoverable runtime fault; aborts the run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// Integer or decimal division by zero
    #[error("Cannot divide by zero")]
    DivideByZero {
        /// Position of the division
        position: usize,
    },

    /// Write to a constant that already holds a value
    #[error("Cannot reassign constant '{name}'")]
    ConstantReassignment {
        /// Variable name
        name: String,
        /// Position of the assignment target
        position: usize,
    },

    /// No zero-arity `main` to start from
    #[error("The main function is not defined")]
    MissingMain,

    /// Value of the wrong kind where one specific kind is required
    #[error("Expected a value of type '{expected}', received '{actual}'")]
    TypeMismatch {
        /// Required kind
        expected: Type,
        /// Kind received
        actual: Type,
        /// Position of the offending expression
        position: usize,
    },

    /// Operator applied to unsupported operand kinds
    #[error("Unsupported operands '{left}' and '{right}' for '{op}'")]
    UnsupportedOperands {
        /// The operator
        op: BinaryOperator,
        /// Left operand kind
        left: Type,
        /// Right operand kind
        right: Type,
        /// Position of the expression
        position: usize,
    },

    /// Variable name with no binding in scope
    #[error("Variable '{name}' is not defined")]
    UndefinedVariable {
        /// Variable name
        name: String,
        /// Position of the access
        position: usize,
    },

    /// No function under (name, arity) in scope
    #[error("Function '{name}' with arity {arity} is not defined")]
    UndefinedFunction {
        /// Function name
        name: String,
        /// Number of arguments supplied
        arity: usize,
        /// Position of the call
        position: usize,
    },

    /// Field read or write on a value without that field
    #[error("Field '{name}' is not defined on type '{receiver}'")]
    UndefinedField {
        /// Field name
        name: String,
        /// Runtime kind of the receiver
        receiver: Type,
        /// Position of the field name
        position: usize,
    },

    /// Method call on a value without that method
    #[error("Method '{name}' with arity {arity} is not defined on type '{receiver}'")]
    UndefinedMethod {
        /// Method name
        name: String,
        /// Number of arguments supplied
        arity: usize,
        /// Runtime kind of the receiver
        receiver: Type,
        /// Position of the method name
        position: usize,
    },

    /// Name defined twice in one scope
    #[error("'{name}' is already defined in this scope")]
    Redefinition {
        /// The name
        name: String,
        /// Position of the second definition
        position: usize,
    },

    /// Call nesting exceeded the configured limit
    #[error("Maximum call depth of {limit} exceeded")]
    CallDepthExceeded {
        /// Configured limit
        limit: usize,
        /// Position of the call that went too deep
        position: usize,
    },

    /// Literal that has no runtime representation
    #[error("Invalid literal '{literal}'")]
    InvalidLiteral {
        /// Literal text
        literal: String,
        /// Position of the literal
        position: usize,
    },

    /// `charAt` past the end of a string
    #[error("Index {index} out of bounds for length {length}")]
    IndexOutOfBounds {
        /// Requested index
        index: String,
        /// String length in characters
        length: usize,
        /// Position of the call
        position: usize,
    },

    /// Assignment whose target is not an access
    #[error("Invalid target for assignment")]
    InvalidAssignmentTarget {
        /// Position of the target
        position: usize,
    },

    /// Writing program output failed
    #[error("Failed to write output: {message}")]
    Output {
        /// Underlying IO error
        message: String,
    },
}

impl EvaluationError {
    /// Byte offset the error refers to
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::DivideByZero { position }
            | Self::ConstantReassignment { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::UnsupportedOperands { position, .. }
            | Self::UndefinedVariable { position, .. }
            | Self::UndefinedFunction { position, .. }
            | Self::UndefinedField { position, .. }
            | Self::UndefinedMethod { position, .. }
            | Self::Redefinition { position, .. }
            | Self::CallDepthExceeded { position, .. }
            | Self::InvalidLiteral { position, .. }
            | Self::IndexOutOfBounds { position, .. }
            | Self::InvalidAssignmentTarget { position } => Some(*position),
            Self::MissingMain | Self::Output { .. } => None,
        }
    }
}

impl From<std::io::Error> for EvaluationError {
    fn from(error: std::io::Error) -> Self {
        Self::Output {
            message: error.to_string(),
        }
    }
}

impl PhaseError for EvaluationError {
    fn phase(&self) -> Phase {
        Phase::Evaluation
    }

    fn offset(&self) -> Option<usize> {
        self.position()
    }
}
