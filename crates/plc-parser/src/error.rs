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

//! Parser error types

use plc_core::{Phase, PhaseError};
use std::borrow::Cow;
use thiserror::Error;

/// Result type for lexer and parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with location information
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A specific token or pattern was required
    #[error("Expected {expected} but found '{found}' at position {position}")]
    ExpectedToken {
        /// The expected token description
        expected: Cow<'static, str>,
        /// Literal text of the token that was found
        found: String,
        /// Position of the token that was found
        position: usize,
    },

    /// Input ran out while more tokens were required
    #[error("Expected {expected} but found end of input")]
    UnexpectedEndOfInput {
        /// The expected token description
        expected: Cow<'static, str>,
        /// End of the input
        position: usize,
    },

    /// Invalid literal value
    #[error("Invalid {literal_type} literal at position {position}: {value}")]
    InvalidLiteral {
        /// Type of literal that failed to parse
        literal_type: Cow<'static, str>,
        /// The invalid value that was encountered
        value: String,
        /// Position where the invalid literal was found
        position: usize,
    },

    /// Invalid escape sequence
    #[error("Invalid escape sequence at position {position}: {sequence}")]
    InvalidEscape {
        /// The invalid escape sequence
        sequence: String,
        /// Position where the escape sequence was found
        position: usize,
    },

    /// Unclosed string literal
    #[error("Unclosed string literal starting at position {position}")]
    UnclosedString {
        /// Position where the unclosed string started
        position: usize,
    },

    /// Left side of `=` is not a variable or field access
    #[error("Invalid assignment target at position {position}, expected a variable or field")]
    InvalidAssignmentTarget {
        /// Position of the target expression
        position: usize,
    },
}

impl ParseError {
    /// Byte offset the error refers to
    pub fn position(&self) -> usize {
        match self {
            Self::ExpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position, .. }
            | Self::InvalidLiteral { position, .. }
            | Self::InvalidEscape { position, .. }
            | Self::UnclosedString { position }
            | Self::InvalidAssignmentTarget { position } => *position,
        }
    }

    /// Whether the input ended early
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::UnexpectedEndOfInput { .. })
    }
}

impl PhaseError for ParseError {
    fn phase(&self) -> Phase {
        Phase::Parse
    }

    fn offset(&self) -> Option<usize> {
        Some(self.position())
    }
}
