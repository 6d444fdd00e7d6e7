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

//! Resolved names

use plc_core::{MemberSignature, Type};

/// A variable binding: global field, local, parameter, or loop variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Name in source
    pub name: String,
    /// Name in generated Java
    pub jvm_name: String,
    /// Static type
    pub ty: Type,
    /// Whether writes are rejected
    pub constant: bool,
}

impl Variable {
    /// Create a variable whose Java name matches its source name
    pub fn new(name: impl Into<String>, ty: Type, constant: bool) -> Self {
        let name = name.into();
        Self {
            jvm_name: name.clone(),
            name,
            ty,
            constant,
        }
    }
}

/// A function binding: user method, builtin, or member of a builtin kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Name in source
    pub name: String,
    /// Name in generated Java
    pub jvm_name: String,
    /// Declared parameter types, excluding any receiver
    pub parameter_types: Vec<Type>,
    /// Declared return type
    pub returns: Type,
}

impl Function {
    /// Create a function whose Java name matches its source name
    pub fn new(name: impl Into<String>, parameter_types: Vec<Type>, returns: Type) -> Self {
        let name = name.into();
        Self {
            jvm_name: name.clone(),
            name,
            parameter_types,
            returns,
        }
    }

    /// Override the Java name
    pub fn with_jvm_name(mut self, jvm_name: impl Into<String>) -> Self {
        self.jvm_name = jvm_name.into();
        self
    }

    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

impl From<&MemberSignature> for Function {
    fn from(member: &MemberSignature) -> Self {
        Function::new(member.name, member.parameters.to_vec(), member.returns)
            .with_jvm_name(member.jvm_name)
    }
}
