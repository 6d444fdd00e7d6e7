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

//! Runtime scope arena
//!
//! Every scope is a record addressed by [`ScopeId`] with an optional parent
//! id. Block and call scopes are released when they exit, provided they are
//! the most recent record and nothing captured them. Method definition
//! scopes are captured and persist for the whole run.

use crate::error::EvaluationResult;
use crate::value::Value;
use plc_ast::Method;
use rustc_hash::FxHashMap;
use std::io::Write;
use tracing::trace;

/// Index of a scope record in a [`ScopeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

/// Builtin implemented in Rust
pub type NativeFunction = fn(&mut dyn Write, &[Value]) -> EvaluationResult<Value>;

/// A mutable variable slot
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeVariable {
    /// Current value
    pub value: Value,
    /// Whether the slot rejects writes once it holds a value
    pub constant: bool,
}

/// Something that can be invoked by name and arity
#[derive(Debug, Clone, Copy)]
pub enum Callable<'a> {
    /// Builtin
    Native(NativeFunction),
    /// User method closing over its defining scope
    Method {
        /// The method definition
        method: &'a Method,
        /// Scope the method was defined in
        closure: ScopeId,
    },
}

#[derive(Debug, Default)]
struct ScopeRecord<'a> {
    parent: Option<ScopeId>,
    captured: bool,
    variables: FxHashMap<String, RuntimeVariable>,
    functions: FxHashMap<(String, usize), Callable<'a>>,
}

/// Arena of parent-linked runtime scopes
#[derive(Debug)]
pub struct ScopeArena<'a> {
    scopes: Vec<ScopeRecord<'a>>,
}

impl Default for ScopeArena<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ScopeArena<'a> {
    /// Create an arena holding only the root scope, which is always captured
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeRecord {
                captured: true,
                ..ScopeRecord::default()
            }],
        }
    }

    /// The root (global) scope
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Number of live scope records
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether the arena is empty; never true since the root always exists
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Open a new scope nested in `parent`
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeRecord {
            parent: Some(parent),
            ..ScopeRecord::default()
        });
        id
    }

    /// Mark a scope as referenced by a closure so it is never released
    pub fn capture(&mut self, scope: ScopeId) {
        if let Some(record) = self.scopes.get_mut(scope.0) {
            record.captured = true;
        }
    }

    /// Release a scope on exit when it is the newest record and uncaptured
    pub fn release(&mut self, scope: ScopeId) {
        let releasable = scope.0 + 1 == self.scopes.len()
            && self.scopes.last().is_some_and(|record| !record.captured);
        if releasable {
            self.scopes.pop();
        } else {
            trace!(scope = scope.0, "scope retained");
        }
    }

    /// Define a variable in `scope`; `false` when the name already exists there
    pub fn define_variable(&mut self, scope: ScopeId, name: &str, variable: RuntimeVariable) -> bool {
        let Some(record) = self.scopes.get_mut(scope.0) else {
            return false;
        };
        if record.variables.contains_key(name) {
            return false;
        }
        record.variables.insert(name.to_string(), variable);
        true
    }

    /// Define a function in `scope`; `false` when (name, arity) already exists there
    pub fn define_function(
        &mut self,
        scope: ScopeId,
        name: &str,
        arity: usize,
        callable: Callable<'a>,
    ) -> bool {
        let Some(record) = self.scopes.get_mut(scope.0) else {
            return false;
        };
        let key = (name.to_string(), arity);
        if record.functions.contains_key(&key) {
            return false;
        }
        record.functions.insert(key, callable);
        true
    }

    fn find_variable(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = self.scopes.get(id.0)?;
            if record.variables.contains_key(name) {
                return Some(id);
            }
            current = record.parent;
        }
        None
    }

    /// Resolve a variable from `scope` outwards
    pub fn lookup_variable(&self, scope: ScopeId, name: &str) -> Option<&RuntimeVariable> {
        let id = self.find_variable(scope, name)?;
        self.scopes.get(id.0)?.variables.get(name)
    }

    /// Resolve a variable from `scope` outwards for writing
    pub fn lookup_variable_mut(&mut self, scope: ScopeId, name: &str) -> Option<&mut RuntimeVariable> {
        let id = self.find_variable(scope, name)?;
        self.scopes.get_mut(id.0)?.variables.get_mut(name)
    }

    /// Resolve a function by (name, arity) from `scope` outwards
    pub fn lookup_function(&self, scope: ScopeId, name: &str, arity: usize) -> Option<Callable<'a>> {
        let key = (name.to_string(), arity);
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = self.scopes.get(id.0)?;
            if let Some(callable) = record.functions.get(&key) {
                return Some(*callable);
            }
            current = record.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(value: i64) -> RuntimeVariable {
        RuntimeVariable {
            value: Value::from(value),
            constant: false,
        }
    }

    #[test]
    fn blocks_release_in_lifo_order() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        let outer = arena.child(root);
        let inner = arena.child(outer);
        assert_eq!(arena.len(), 3);

        // Not the newest record, kept
        arena.release(outer);
        assert_eq!(arena.len(), 3);

        arena.release(inner);
        arena.release(outer);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn captured_scopes_persist() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        let scope = arena.child(root);
        arena.capture(scope);
        arena.release(scope);
        assert_eq!(arena.len(), 2);
        arena.release(root);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn writes_reach_the_defining_scope() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        assert!(arena.define_variable(root, "x", var(1)));
        let child = arena.child(root);
        if let Some(slot) = arena.lookup_variable_mut(child, "x") {
            slot.value = Value::from(2);
        }
        assert_eq!(arena.lookup_variable(root, "x").map(|v| &v.value), Some(&Value::from(2)));
        assert!(!arena.define_variable(root, "x", var(3)));
        assert!(arena.define_variable(child, "x", var(3)));
    }
}
