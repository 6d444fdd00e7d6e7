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

//! PLC teaching language toolchain
//!
//! Source text flows through five phases: the lexer produces tokens, the
//! parser builds a [`Source`] tree, the analyzer resolves names and types
//! into an [`Analysis`] side table, and the analyzed program is either
//! interpreted or printed as Java.
//!
//! ```
//! use plc::Engine;
//!
//! let engine = Engine::new();
//! let program = engine.compile("DEF main(): Integer DO print(1 + 2); RETURN 0; END")?;
//! let mut output = Vec::new();
//! let result = engine.run(&program, &mut output)?;
//! assert_eq!(String::from_utf8_lossy(&output), "3\n");
//! assert_eq!(result, plc::Value::from(0));
//! # Ok::<(), plc::PlcError>(())
//! ```

#![warn(missing_docs)]

// Workspace crates
pub use plc_analyzer as analyzer;
pub use plc_ast as ast;
pub use plc_core as core;
pub use plc_diagnostics as diagnostics;
pub use plc_generator as generator;
pub use plc_interpreter as interpreter;
pub use plc_parser as parser;

pub mod engine;
pub mod error;

pub use engine::{Engine, Program};
pub use error::{PlcError, Result};

pub use plc_analyzer::{Analysis, AnalysisError};
pub use plc_ast::{Expression, Source, Statement};
pub use plc_core::{Phase, PhaseError, SourceLocation, Type};
pub use plc_diagnostics::DiagnosticRenderer;
pub use plc_generator::GenerateError;
pub use plc_interpreter::{EvaluationError, InterpreterConfig, Value};
pub use plc_parser::{ParseError, Token, TokenKind};

/// Tokenize source text
pub fn lex(input: &str) -> Result<Vec<Token<'_>>> {
    Ok(plc_parser::tokenize(input)?)
}

/// Tokenize and parse source text into a program tree
pub fn parse(input: &str) -> Result<Source> {
    Ok(plc_parser::parse(input)?)
}

/// Analyze a parsed program
pub fn analyze(source: &Source) -> Result<Analysis> {
    Ok(plc_analyzer::analyze(source)?)
}
