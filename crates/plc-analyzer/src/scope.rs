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

//! Static scope arena
//!
//! Scopes are records in a vector addressed by [`ScopeId`]; each record keeps
//! its parent id, so lookups walk the chain without shared ownership.

use crate::binding::{Function, Variable};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Index of a scope record in a [`ScopeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

#[derive(Debug, Default)]
struct ScopeRecord {
    parent: Option<ScopeId>,
    variables: FxHashMap<String, Variable>,
    functions: FxHashMap<(String, usize), Function>,
}

/// Arena of parent-linked scopes
#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<ScopeRecord>,
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeArena {
    /// Create an arena holding only the root scope
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeRecord::default()],
        }
    }

    /// The root (global) scope
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Open a new scope nested in `parent`
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeRecord {
            parent: Some(parent),
            ..ScopeRecord::default()
        });
        trace!(scope = id.0, parent = parent.0, "opened static scope");
        id
    }

    /// Parent of `scope`, `None` for the root
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.0).and_then(|record| record.parent)
    }

    /// Number of scope records
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether the arena is empty; never true since the root always exists
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Define a variable in `scope`. Returns `false` when the name is already
    /// defined in that same scope.
    pub fn define_variable(&mut self, scope: ScopeId, variable: Variable) -> bool {
        let Some(record) = self.scopes.get_mut(scope.0) else {
            return false;
        };
        if record.variables.contains_key(&variable.name) {
            return false;
        }
        trace!(scope = scope.0, name = %variable.name, ty = %variable.ty, "defined variable");
        record.variables.insert(variable.name.clone(), variable);
        true
    }

    /// Define a function in `scope` under its (name, arity). Returns `false`
    /// when that key is already defined in that same scope.
    pub fn define_function(&mut self, scope: ScopeId, function: Function) -> bool {
        let Some(record) = self.scopes.get_mut(scope.0) else {
            return false;
        };
        let key = (function.name.clone(), function.arity());
        if record.functions.contains_key(&key) {
            return false;
        }
        trace!(scope = scope.0, name = %function.name, arity = function.arity(), "defined function");
        record.functions.insert(key, function);
        true
    }

    /// Resolve a variable from `scope` outwards
    pub fn lookup_variable(&self, scope: ScopeId, name: &str) -> Option<&Variable> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = self.scopes.get(id.0)?;
            if let Some(variable) = record.variables.get(name) {
                return Some(variable);
            }
            current = record.parent;
        }
        None
    }

    /// Resolve a function by (name, arity) from `scope` outwards
    pub fn lookup_function(&self, scope: ScopeId, name: &str, arity: usize) -> Option<&Function> {
        let key = (name.to_string(), arity);
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = self.scopes.get(id.0)?;
            if let Some(function) = record.functions.get(&key) {
                return Some(function);
            }
            current = record.parent;
        }
        None
    }

    /// Variables defined directly in `scope`, sorted by name
    pub fn variables(&self, scope: ScopeId) -> Vec<&Variable> {
        let mut variables: Vec<&Variable> = self
            .scopes
            .get(scope.0)
            .map(|record| record.variables.values().collect())
            .unwrap_or_default();
        variables.sort_by(|a, b| a.name.cmp(&b.name));
        variables
    }

    /// Functions defined directly in `scope`, sorted by name then arity
    pub fn functions(&self, scope: ScopeId) -> Vec<&Function> {
        let mut functions: Vec<&Function> = self
            .scopes
            .get(scope.0)
            .map(|record| record.functions.values().collect())
            .unwrap_or_default();
        functions.sort_by(|a, b| (&a.name, a.arity()).cmp(&(&b.name, b.arity())));
        functions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plc_core::Type;

    #[test]
    fn child_scopes_see_parent_bindings() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        assert!(arena.define_variable(root, Variable::new("x", Type::Integer, false)));
        let child = arena.child(root);
        assert_eq!(arena.lookup_variable(child, "x").map(|v| v.ty), Some(Type::Integer));
        assert_eq!(arena.parent(child), Some(root));
        assert!(arena.lookup_variable(root, "y").is_none());
    }

    #[test]
    fn redefinition_fails_only_in_same_scope() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        assert!(arena.define_variable(root, Variable::new("x", Type::Integer, false)));
        assert!(!arena.define_variable(root, Variable::new("x", Type::String, false)));

        let child = arena.child(root);
        assert!(arena.define_variable(child, Variable::new("x", Type::String, false)));
        assert_eq!(arena.lookup_variable(child, "x").map(|v| v.ty), Some(Type::String));
        assert_eq!(arena.lookup_variable(root, "x").map(|v| v.ty), Some(Type::Integer));
    }

    #[test]
    fn functions_are_keyed_by_arity() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        assert!(arena.define_function(root, Function::new("f", vec![], Type::Nil)));
        assert!(arena.define_function(root, Function::new("f", vec![Type::Any], Type::Nil)));
        assert!(!arena.define_function(root, Function::new("f", vec![Type::String], Type::Nil)));
        assert!(arena.lookup_function(root, "f", 1).is_some());
        assert!(arena.lookup_function(root, "f", 2).is_none());
        assert_eq!(arena.functions(root).len(), 2);
    }
}
