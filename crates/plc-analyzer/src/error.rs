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

//! Analysis error types

use plc_ast::{BinaryOperator, NodeId};
use plc_core::{AssignabilityError, Phase, PhaseError, Type};
use thiserror::Error;

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Static analysis failure, reported for the first violation found
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Type annotation names no builtin type
    #[error("Undefined type '{name}'")]
    UndefinedType {
        /// The unresolved type name
        name: String,
        /// Position of the annotated name
        position: usize,
    },

    /// Variable access with no binding in scope
    #[error("Variable '{name}' not found in the current scope")]
    UndefinedVariable {
        /// Variable name
        name: String,
        /// Position of the access
        position: usize,
    },

    /// Field access on a type without such field
    #[error("Field '{name}' not found in type '{receiver}'")]
    UndefinedField {
        /// Field name
        name: String,
        /// Static type of the receiver
        receiver: Type,
        /// Position of the field name
        position: usize,
    },

    /// Call with no function registered under (name, arity)
    #[error("Function '{name}' with arity {arity} not found in the current scope")]
    UndefinedFunction {
        /// Function name
        name: String,
        /// Number of arguments supplied
        arity: usize,
        /// Position of the call
        position: usize,
    },

    /// Method call on a type without such method
    #[error("Method '{name}' with arity {arity} not found in type '{receiver}'")]
    UndefinedMethod {
        /// Method name
        name: String,
        /// Number of arguments supplied
        arity: usize,
        /// Static type of the receiver
        receiver: Type,
        /// Position of the method name
        position: usize,
    },

    /// Assignability law violated
    #[error("Type '{actual}' is not assignable to '{target}'")]
    NotAssignable {
        /// Receiving type
        target: Type,
        /// Offered type
        actual: Type,
        /// Position of the offending value
        position: usize,
    },

    /// Condition of IF, FOR or WHILE is not Boolean
    #[error("Condition of {statement} must be of type Boolean, found '{actual}'")]
    NonBooleanCondition {
        /// Statement keyword
        statement: &'static str,
        /// Type of the condition
        actual: Type,
        /// Position of the condition
        position: usize,
    },

    /// IF then-branch or FOR body without statements
    #[error("Body of {statement} cannot be empty")]
    EmptyBody {
        /// Statement keyword
        statement: &'static str,
        /// Position of the condition
        position: usize,
    },

    /// Binary operands of unsupported types
    #[error("Invalid operands '{left}' and '{right}' for '{op}'")]
    OperandMismatch {
        /// The operator
        op: BinaryOperator,
        /// Left operand type
        left: Type,
        /// Right operand type
        right: Type,
        /// Position of the expression
        position: usize,
    },

    /// Integer literal outside the signed 32-bit range
    #[error("Integer literal '{literal}' is out of range")]
    IntegerOutOfRange {
        /// Literal text
        literal: String,
        /// Position of the literal
        position: usize,
    },

    /// Decimal literal that is not representable
    #[error("Decimal literal '{literal}' is out of range")]
    DecimalOutOfRange {
        /// Literal text
        literal: String,
        /// Position of the literal
        position: usize,
    },

    /// No zero-arity `main`
    #[error("The main function is not defined")]
    MissingMain,

    /// `main` does not return Integer
    #[error("The main function must return 'Integer', found '{actual}'")]
    MainReturnType {
        /// Declared return type
        actual: Type,
        /// Position of the method name
        position: usize,
    },

    /// RETURN outside any method
    #[error("RETURN is only allowed inside a method")]
    ReturnOutsideMethod {
        /// Position of the RETURN keyword
        position: usize,
    },

    /// Write to a constant variable
    #[error("Cannot assign to constant '{name}'")]
    ConstantAssignment {
        /// Variable name
        name: String,
        /// Position of the assignment target
        position: usize,
    },

    /// Constant field without initializer
    #[error("Constant '{name}' must have an initial value")]
    UninitializedConstant {
        /// Field name
        name: String,
        /// Position of the field name
        position: usize,
    },

    /// Variable defined twice in one scope
    #[error("Variable '{name}' is already defined in this scope")]
    RedefinedVariable {
        /// Variable name
        name: String,
        /// Position of the second definition
        position: usize,
    },

    /// Function defined twice with the same arity in one scope
    #[error("Function '{name}' with arity {arity} is already defined in this scope")]
    RedefinedFunction {
        /// Function name
        name: String,
        /// Arity
        arity: usize,
        /// Position of the second definition
        position: usize,
    },

    /// Expression statement that is not a call
    #[error("Expression statements must be function calls")]
    ExpressionStatement {
        /// Position of the expression
        position: usize,
    },

    /// Parenthesized expression that is not binary
    #[error("Group expression must contain a binary expression")]
    InvalidGroup {
        /// Position of the opening parenthesis
        position: usize,
    },

    /// LET without type and initializer
    #[error("Cannot declare variable '{name}' without a type or initial value")]
    UntypedDeclaration {
        /// Variable name
        name: String,
        /// Position of the variable name
        position: usize,
    },

    /// FOR loop variable of a type that cannot be ordered
    #[error("Loop variable '{name}' must be Comparable, found '{actual}'")]
    LoopVariableNotComparable {
        /// Variable name
        name: String,
        /// Inferred type
        actual: Type,
        /// Position of the variable name
        position: usize,
    },

    /// Assignment whose target is not an access
    #[error("Invalid target for assignment")]
    InvalidAssignmentTarget {
        /// Position of the target
        position: usize,
    },

    /// A side table slot was written twice
    #[error("Internal error: node {node} annotated twice")]
    DuplicateAnnotation {
        /// The node
        node: NodeId,
    },
}

impl AnalysisError {
    /// Attach a position to a failed assignability check
    pub fn not_assignable(error: AssignabilityError, position: usize) -> Self {
        Self::NotAssignable {
            target: error.target,
            actual: error.actual,
            position,
        }
    }

    /// Byte offset the error refers to
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UndefinedType { position, .. }
            | Self::UndefinedVariable { position, .. }
            | Self::UndefinedField { position, .. }
            | Self::UndefinedFunction { position, .. }
            | Self::UndefinedMethod { position, .. }
            | Self::NotAssignable { position, .. }
            | Self::NonBooleanCondition { position, .. }
            | Self::EmptyBody { position, .. }
            | Self::OperandMismatch { position, .. }
            | Self::IntegerOutOfRange { position, .. }
            | Self::DecimalOutOfRange { position, .. }
            | Self::MainReturnType { position, .. }
            | Self::ReturnOutsideMethod { position }
            | Self::ConstantAssignment { position, .. }
            | Self::UninitializedConstant { position, .. }
            | Self::RedefinedVariable { position, .. }
            | Self::RedefinedFunction { position, .. }
            | Self::ExpressionStatement { position }
            | Self::InvalidGroup { position }
            | Self::UntypedDeclaration { position, .. }
            | Self::LoopVariableNotComparable { position, .. }
            | Self::InvalidAssignmentTarget { position } => Some(*position),
            Self::MissingMain | Self::DuplicateAnnotation { .. } => None,
        }
    }
}

impl PhaseError for AnalysisError {
    fn phase(&self) -> Phase {
        Phase::Analysis
    }

    fn offset(&self) -> Option<usize> {
        self.position()
    }
}
