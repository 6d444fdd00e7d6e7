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

//! Generation errors

use plc_ast::NodeId;
use plc_core::{Phase, PhaseError};
use std::fmt;
use thiserror::Error;

/// Result type for generation
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Generation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// A node the generator needs has no entry in the analysis
    #[error("Node {node} has no resolved {annotation}")]
    MissingAnnotation {
        /// The unannotated node
        node: NodeId,
        /// Kind of annotation that was looked up
        annotation: &'static str,
        /// Byte offset of the node
        position: usize,
    },

    /// Writing to the output buffer failed
    #[error("Failed to format generated source")]
    Format(#[from] fmt::Error),
}

impl GenerateError {
    /// Byte offset the error refers to
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::MissingAnnotation { position, .. } => Some(*position),
            Self::Format(_) => None,
        }
    }
}

impl PhaseError for GenerateError {
    fn phase(&self) -> Phase {
        Phase::Generation
    }

    fn offset(&self) -> Option<usize> {
        self.position()
    }
}
