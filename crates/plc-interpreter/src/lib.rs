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

//! Tree-walking interpreter for PLC programs
//!
//! Expressions evaluate to a [`Value`], statements to a [`Flow`]. A `RETURN`
//! produces [`Flow::Returned`], which every block and loop passes upward
//! until the nearest call frame consumes it. Runtime scopes live in a
//! [`ScopeArena`] and are released in LIFO order when a block exits.

#![warn(missing_docs)]

pub mod config;
mod decimal;
pub mod error;
pub mod flow;
pub mod interpreter;
pub mod members;
pub mod operators;
pub mod scope;
pub mod value;

pub use config::InterpreterConfig;
pub use error::{EvaluationError, EvaluationResult};
pub use flow::Flow;
pub use interpreter::Interpreter;
pub use scope::{Callable, NativeFunction, RuntimeVariable, ScopeArena, ScopeId};
pub use value::Value;
