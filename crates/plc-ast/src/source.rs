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

//! Top-level program structure

use crate::node::NodeId;
use crate::statement::Statement;
use crate::expression::Expression;

/// A whole program: global fields followed by methods, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Source {
    /// Global variables
    pub fields: Vec<Field>,
    /// Global methods
    pub methods: Vec<Method>,
}

/// `LET [CONST] name: Type [= value];`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// Side table key
    pub id: NodeId,
    /// Byte offset of the field name
    pub offset: usize,
    /// Variable name
    pub name: String,
    /// Declared type name
    pub type_name: String,
    /// Whether the field was declared `CONST`
    pub constant: bool,
    /// Optional initializer
    pub value: Option<Expression>,
}

/// `DEF name(params) [: Type] DO statements END`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Method {
    /// Side table key
    pub id: NodeId,
    /// Byte offset of the method name
    pub offset: usize,
    /// Method name
    pub name: String,
    /// Parameter names
    pub parameters: Vec<String>,
    /// Byte offsets of the parameter names, parallel to `parameters`
    pub parameter_offsets: Vec<usize>,
    /// Parameter type names, parallel to `parameters`
    pub parameter_types: Vec<String>,
    /// Byte offsets of the parameter type names
    pub parameter_type_offsets: Vec<usize>,
    /// Declared return type name, absent for methods returning `Nil`
    pub return_type: Option<String>,
    /// Byte offset of the return type name
    pub return_type_offset: Option<usize>,
    /// Body
    pub statements: Vec<Statement>,
}

impl Source {
    /// Look up a method by name and arity
    pub fn method(&self, name: &str, arity: usize) -> Option<&Method> {
        self.methods
            .iter()
            .find(|method| method.name == name && method.arity() == arity)
    }
}

impl Method {
    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}
