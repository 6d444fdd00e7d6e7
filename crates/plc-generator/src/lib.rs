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

//! Java source emission for PLC programs
//!
//! The [`Generator`] prints a `Main` class from a parsed [`plc_ast::Source`]
//! and the [`plc_analyzer::Analysis`] computed for it. Names and types come
//! from the analysis, so generation needs a complete one.

#![warn(missing_docs)]

pub mod error;
pub mod escape;
pub mod generator;

pub use error::{GenerateError, GenerateResult};
pub use generator::{Generator, generate};
