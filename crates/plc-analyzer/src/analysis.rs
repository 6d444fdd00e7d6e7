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

//! Analysis results
//!
//! Each map is a side table keyed by [`NodeId`]. Slots are written exactly
//! once; a second write is reported as an internal error.

use crate::binding::{Function, Variable};
use crate::error::{AnalysisError, AnalysisResult};
use plc_ast::NodeId;
use plc_core::Type;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Side tables and global bindings produced by a successful analysis
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Static type of every expression
    pub types: FxHashMap<NodeId, Type>,
    /// Variable bound by every access, field, and declaration
    pub variables: FxHashMap<NodeId, Variable>,
    /// Function bound by every call and method
    pub functions: FxHashMap<NodeId, Function>,
    /// Global variables, sorted by name
    pub global_variables: Vec<Variable>,
    /// Global functions including builtins, sorted by name then arity
    pub global_functions: Vec<Function>,
}

fn record<V>(table: &mut FxHashMap<NodeId, V>, node: NodeId, value: V) -> AnalysisResult<()> {
    match table.entry(node) {
        Entry::Occupied(_) => Err(AnalysisError::DuplicateAnnotation { node }),
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}

impl Analysis {
    /// Static type of an expression
    pub fn type_of(&self, node: NodeId) -> Option<Type> {
        self.types.get(&node).copied()
    }

    /// Variable bound to an access, field, or declaration
    pub fn variable(&self, node: NodeId) -> Option<&Variable> {
        self.variables.get(&node)
    }

    /// Function bound to a call or method
    pub fn function(&self, node: NodeId) -> Option<&Function> {
        self.functions.get(&node)
    }

    pub(crate) fn record_type(&mut self, node: NodeId, ty: Type) -> AnalysisResult<()> {
        record(&mut self.types, node, ty)
    }

    pub(crate) fn record_variable(&mut self, node: NodeId, variable: Variable) -> AnalysisResult<()> {
        record(&mut self.variables, node, variable)
    }

    pub(crate) fn record_function(&mut self, node: NodeId, function: Function) -> AnalysisResult<()> {
        record(&mut self.functions, node, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_write_is_an_internal_error() {
        let mut analysis = Analysis::default();
        analysis.record_type(NodeId(3), Type::Integer).unwrap();
        assert_eq!(
            analysis.record_type(NodeId(3), Type::Integer),
            Err(AnalysisError::DuplicateAnnotation { node: NodeId(3) })
        );
        assert_eq!(analysis.type_of(NodeId(3)), Some(Type::Integer));
    }
}
