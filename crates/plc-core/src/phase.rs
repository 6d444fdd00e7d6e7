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

//! Phase identification for errors

use std::fmt;

/// Toolchain phase that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Tokenizer or grammar failure
    Parse,
    /// Name or type resolution failure
    Analysis,
    /// Runtime fault
    Evaluation,
    /// Source emission failure
    Generation,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Parse => write!(f, "parse error"),
            Phase::Analysis => write!(f, "analysis error"),
            Phase::Evaluation => write!(f, "runtime error"),
            Phase::Generation => write!(f, "generation error"),
        }
    }
}

/// Common surface of every phase error, used by the diagnostics renderer
pub trait PhaseError: std::error::Error {
    /// Phase that failed
    fn phase(&self) -> Phase;

    /// Byte offset of the offending construct, when known
    fn offset(&self) -> Option<usize>;
}
