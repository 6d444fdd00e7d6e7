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

//! Umbrella error type

use plc_analyzer::AnalysisError;
use plc_core::{Phase, PhaseError};
use plc_generator::GenerateError;
use plc_interpreter::EvaluationError;
use plc_parser::ParseError;
use thiserror::Error;

/// Result type for the toolchain
pub type Result<T> = std::result::Result<T, PlcError>;

/// Failure of any phase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlcError {
    /// Lexer or parser failure
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Name or type resolution failure
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Runtime fault
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Java emission failure
    #[error(transparent)]
    Generation(#[from] GenerateError),
}

impl PlcError {
    /// Phase that failed
    pub fn phase(&self) -> Phase {
        match self {
            Self::Parse(_) => Phase::Parse,
            Self::Analysis(_) => Phase::Analysis,
            Self::Evaluation(_) => Phase::Evaluation,
            Self::Generation(_) => Phase::Generation,
        }
    }

    /// Byte offset of the offending construct, when known
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Parse(err) => err.offset(),
            Self::Analysis(err) => err.offset(),
            Self::Evaluation(err) => err.offset(),
            Self::Generation(err) => err.offset(),
        }
    }
}

impl PhaseError for PlcError {
    fn phase(&self) -> Phase {
        PlcError::phase(self)
    }

    fn offset(&self) -> Option<usize> {
        PlcError::offset(self)
    }
}
