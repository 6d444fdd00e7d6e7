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

//! Lexer and parser for PLC programs
//!
//! This crate turns source text into tokens and tokens into the AST defined
//! in `plc-ast`. Both phases fail fast on the first violation with a
//! [`ParseError`] that carries the byte offset of the offending input.

#![warn(missing_docs)]

pub mod error;
pub mod escape;
pub mod lexer;
pub mod parser;
pub mod token;

// Re-export main types
pub use error::{ParseError, ParseResult};
pub use lexer::{Lexer, tokenize};
pub use parser::{Parser, Precedence};
pub use token::{Token, TokenKind};

// Re-export from workspace crates for convenience
pub use plc_ast::{Expression, Source};

/// Tokenize and parse a whole program
pub fn parse(input: &str) -> ParseResult<Source> {
    let tokens = tokenize(input)?;
    Parser::new(tokens, input.len()).parse_source()
}

/// Tokenize and parse a single expression, requiring all input be consumed
pub fn parse_expression(input: &str) -> ParseResult<Expression> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens, input.len());
    let expression = parser.parse_expression()?;
    parser.expect_end()?;
    Ok(expression)
}
