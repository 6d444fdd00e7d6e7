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

//! End-to-end pipeline

use crate::error::Result;
use plc_analyzer::Analysis;
use plc_ast::Source;
use plc_interpreter::{Interpreter, InterpreterConfig, Value};
use std::io::Write;
use tracing::debug;

/// A parsed and analyzed program
#[derive(Debug, Clone)]
pub struct Program {
    /// Program tree
    pub source: Source,
    /// Resolved names and types
    pub analysis: Analysis,
}

/// Drives the phases with a fixed interpreter configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: InterpreterConfig,
}

impl Engine {
    /// Engine with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit interpreter limits
    pub fn with_config(config: InterpreterConfig) -> Self {
        Self { config }
    }

    /// Interpreter limits in use
    pub fn config(&self) -> InterpreterConfig {
        self.config
    }

    /// Lex, parse and analyze `input`
    pub fn compile(&self, input: &str) -> Result<Program> {
        let source = plc_parser::parse(input)?;
        let analysis = plc_analyzer::analyze(&source)?;
        debug!(
            fields = source.fields.len(),
            methods = source.methods.len(),
            "compiled program"
        );
        Ok(Program { source, analysis })
    }

    /// Interpret an analyzed program, writing `print` output to `output`
    pub fn run<W: Write>(&self, program: &Program, output: W) -> Result<Value> {
        self.run_unchecked(&program.source, output)
    }

    /// Interpret a program tree that has not been analyzed
    ///
    /// Type errors surface as runtime faults instead of being rejected up front.
    pub fn run_unchecked<W: Write>(&self, source: &Source, output: W) -> Result<Value> {
        let mut interpreter = Interpreter::with_config(output, self.config);
        Ok(interpreter.run(source)?)
    }

    /// Print an analyzed program as Java source
    pub fn generate(&self, program: &Program) -> Result<String> {
        Ok(plc_generator::generate(&program.source, &program.analysis)?)
    }
}
