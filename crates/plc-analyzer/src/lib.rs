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

//! Static analysis for PLC programs
//!
//! The [`Analyzer`] walks a parsed [`plc_ast::Source`] once, in pre-order,
//! binding every variable access and call to a [`Variable`] or [`Function`]
//! and every expression to a [`plc_core::Type`]. Results go to the
//! [`Analysis`] side table keyed by node id; the tree itself is never
//! modified.

#![warn(missing_docs)]

pub mod analysis;
pub mod analyzer;
pub mod binding;
pub mod context;
pub mod error;
pub mod scope;

pub use analysis::Analysis;
pub use analyzer::{Analyzer, analyze};
pub use binding::{Function, Variable};
pub use context::{AnalysisContext, MethodContext};
pub use error::{AnalysisError, AnalysisResult};
pub use scope::{ScopeArena, ScopeId};
