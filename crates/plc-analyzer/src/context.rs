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

//! Analysis context passed down the walk by value

use crate::scope::ScopeId;
use plc_core::Type;

/// The method whose body is being analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodContext {
    /// Declared return type, `Nil` when omitted
    pub returns: Type,
}

/// Where the walk currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisContext {
    /// Scope new names are defined in and lookups start from
    pub scope: ScopeId,
    /// Enclosing method, `None` at top level
    pub method: Option<MethodContext>,
}

impl AnalysisContext {
    /// Context for the global scope
    pub fn global(scope: ScopeId) -> Self {
        Self {
            scope,
            method: None,
        }
    }

    /// Same context in a different scope
    pub fn with_scope(self, scope: ScopeId) -> Self {
        Self { scope, ..self }
    }

    /// Same context inside a method body
    pub fn with_method(self, returns: Type) -> Self {
        Self {
            method: Some(MethodContext { returns }),
            ..self
        }
    }
}
