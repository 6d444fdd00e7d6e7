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

//! Statement AST node definitions

use crate::expression::Expression;
use crate::node::NodeId;

/// Statements, only found inside method bodies
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// Expression evaluated for its effect, `expr;`
    Expression(Expression),

    /// Local variable, `LET name [: Type] [= value];`
    Declaration(Declaration),

    /// `receiver = value;`
    Assignment(Assignment),

    /// `IF condition DO ... [ELSE ...] END`
    If {
        /// Branch condition
        condition: Expression,
        /// Statements run when the condition holds
        then_statements: Vec<Statement>,
        /// Statements run otherwise
        else_statements: Vec<Statement>,
    },

    /// `FOR (init; condition; increment) [DO] ... END`
    For {
        /// Declares the loop variable
        initialization: Option<Declaration>,
        /// Checked before every iteration
        condition: Expression,
        /// Run after every iteration
        increment: Option<Assignment>,
        /// Loop body
        statements: Vec<Statement>,
    },

    /// `WHILE condition DO ... END`
    While {
        /// Checked before every iteration
        condition: Expression,
        /// Loop body
        statements: Vec<Statement>,
    },

    /// `RETURN value;`
    Return {
        /// Byte offset of the `RETURN` keyword
        offset: usize,
        /// Returned value
        value: Expression,
    },
}

/// Local variable declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    /// Side table key
    pub id: NodeId,
    /// Byte offset of the variable name
    pub offset: usize,
    /// Variable name
    pub name: String,
    /// Declared type name, inferred from the initializer when absent
    pub type_name: Option<String>,
    /// Optional initializer
    pub value: Option<Expression>,
}

/// Assignment to a variable or a receiver field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// Target, always an access expression when produced by the parser
    pub receiver: Expression,
    /// Assigned value
    pub value: Expression,
}
