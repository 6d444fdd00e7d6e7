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

//! Token definitions

use std::fmt;

/// Token categories produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// Identifier or keyword, e.g. `LET`, `main`, `x-1_b`
    Identifier,
    /// Integer literal with optional sign, e.g. `0`, `-12`
    Integer,
    /// Decimal literal with optional sign, e.g. `3.14`
    Decimal,
    /// Character literal including quotes, e.g. `'a'`
    Character,
    /// String literal including quotes, e.g. `"hi\n"`
    String,
    /// Operator or punctuation, e.g. `<=`, `&&`, `;`
    Operator,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Decimal => "DECIMAL",
            TokenKind::Character => "CHARACTER",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
        };
        f.pad(name)
    }
}

/// A token with zero-copy literal text and its byte offset in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'input> {
    /// Token category
    pub kind: TokenKind,
    /// Exact source text of the token
    pub literal: &'input str,
    /// Byte offset of the first character
    pub offset: usize,
}

impl<'input> Token<'input> {
    /// Create a token
    pub fn new(kind: TokenKind, literal: &'input str, offset: usize) -> Self {
        Self {
            kind,
            literal,
            offset,
        }
    }

    /// Byte offset one past the last character
    pub fn end(&self) -> usize {
        self.offset + self.literal.len()
    }

    /// Check if this token has the given literal text. Keywords and
    /// punctuation are matched this way.
    pub fn is(&self, literal: &str) -> bool {
        self.literal == literal
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<10} {:<12} @{}", self.kind, self.literal, self.offset)
    }
}
