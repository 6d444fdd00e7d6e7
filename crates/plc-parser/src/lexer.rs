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

//! Tokenizer for PLC source text
//!
//! Keywords are not distinguished from identifiers here; the parser matches
//! them by literal text. Any non-whitespace character that starts no other
//! token becomes a single-character operator, so the only lexical failures
//! are malformed character and string literals.

use crate::error::{ParseError, ParseResult};
use crate::escape::is_escape_char;
use crate::token::{Token, TokenKind};
use tracing::debug;

/// Streaming tokenizer over a source string
pub struct Lexer<'input> {
    input: &'input str,
    position: usize,
    start: usize,
}

impl<'input> Lexer<'input> {
    /// Create a lexer over `input`
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            position: 0,
            start: 0,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn peek(&self) -> Option<char> {
        self.peek_nth(0)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn bump_if(&mut self, predicate: impl Fn(char) -> bool) -> bool {
        match self.peek() {
            Some(ch) if predicate(ch) => {
                self.position += ch.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn emit(&self, kind: TokenKind) -> Token<'input> {
        Token::new(kind, &self.input[self.start..self.position], self.start)
    }

    fn is_whitespace(ch: char) -> bool {
        matches!(ch, ' ' | '\u{8}' | '\n' | '\r' | '\t')
    }

    fn is_id_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_id_continue(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
    }

    fn skip_whitespace(&mut self) {
        while self.bump_if(Self::is_whitespace) {}
    }

    /// Lex the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<Token<'input>>> {
        self.skip_whitespace();
        self.start = self.position;

        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let token = if Self::is_id_start(ch) {
            self.lex_identifier()
        } else if ch.is_ascii_digit()
            || (matches!(ch, '+' | '-') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()))
        {
            self.lex_number()
        } else if ch == '\'' {
            self.lex_character()?
        } else if ch == '"' {
            self.lex_string()?
        } else {
            self.lex_operator()
        };

        Ok(Some(token))
    }

    fn lex_identifier(&mut self) -> Token<'input> {
        self.bump();
        while self.bump_if(Self::is_id_continue) {}
        self.emit(TokenKind::Identifier)
    }

    fn lex_number(&mut self) -> Token<'input> {
        self.bump_if(|c| matches!(c, '+' | '-'));
        // A leading zero is a complete integer part
        if !self.bump_if(|c| c == '0') {
            while self.bump_if(|c| c.is_ascii_digit()) {}
        }

        let fraction_follows =
            self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit());
        if fraction_follows {
            self.bump();
            while self.bump_if(|c| c.is_ascii_digit()) {}
            return self.emit(TokenKind::Decimal);
        }
        self.emit(TokenKind::Integer)
    }

    fn lex_character(&mut self) -> ParseResult<Token<'input>> {
        self.bump();
        match self.bump() {
            Some('\\') => self.lex_escape()?,
            Some(ch) if !matches!(ch, '\'' | '\n' | '\r') => {}
            _ => {
                return Err(ParseError::InvalidLiteral {
                    literal_type: "character".into(),
                    value: self.input[self.start..self.position].to_string(),
                    position: self.start,
                });
            }
        }
        if !self.bump_if(|c| c == '\'') {
            return Err(ParseError::InvalidLiteral {
                literal_type: "character".into(),
                value: self.input[self.start..self.position].to_string(),
                position: self.start,
            });
        }
        Ok(self.emit(TokenKind::Character))
    }

    fn lex_string(&mut self) -> ParseResult<Token<'input>> {
        self.bump();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    return Ok(self.emit(TokenKind::String));
                }
                None | Some('\n') | Some('\r') => {
                    return Err(ParseError::UnclosedString {
                        position: self.start,
                    });
                }
                Some('\\') => {
                    self.bump();
                    self.lex_escape()?;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Consume the character after a backslash
    fn lex_escape(&mut self) -> ParseResult<()> {
        let backslash = self.position - 1;
        match self.peek() {
            Some(ch) if is_escape_char(ch) => {
                self.bump();
                Ok(())
            }
            other => Err(ParseError::InvalidEscape {
                sequence: match other {
                    Some(ch) => format!("\\{ch}"),
                    None => "\\".to_string(),
                },
                position: backslash,
            }),
        }
    }

    fn lex_operator(&mut self) -> Token<'input> {
        let first = self.bump();
        match first {
            Some('<' | '>' | '!' | '=') => {
                self.bump_if(|c| c == '=');
            }
            Some('&') => {
                self.bump_if(|c| c == '&');
            }
            Some('|') => {
                self.bump_if(|c| c == '|');
            }
            _ => {}
        }
        self.emit(TokenKind::Operator)
    }

    /// Lex the whole input
    pub fn tokenize_all(&mut self) -> ParseResult<Vec<Token<'input>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Tokenize a source string
pub fn tokenize(input: &str) -> ParseResult<Vec<Token<'_>>> {
    let tokens = Lexer::new(input).tokenize_all()?;
    debug!(bytes = input.len(), tokens = tokens.len(), "tokenized source");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.literal))
            .collect()
    }

    #[rstest]
    #[case("getName", TokenKind::Identifier)]
    #[case("_x-1_b", TokenKind::Identifier)]
    #[case("0", TokenKind::Integer)]
    #[case("-12", TokenKind::Integer)]
    #[case("+7", TokenKind::Integer)]
    #[case("3.14", TokenKind::Decimal)]
    #[case("-0.5", TokenKind::Decimal)]
    #[case("'c'", TokenKind::Character)]
    #[case(r"'\n'", TokenKind::Character)]
    #[case(r#""a\tb""#, TokenKind::String)]
    #[case("<=", TokenKind::Operator)]
    #[case("&&", TokenKind::Operator)]
    #[case("$", TokenKind::Operator)]
    fn single_token(#[case] input: &str, #[case] kind: TokenKind) {
        assert_eq!(kinds(input), vec![(kind, input)]);
    }

    #[test]
    fn leading_zero_splits_integer() {
        assert_eq!(
            kinds("01"),
            vec![(TokenKind::Integer, "0"), (TokenKind::Integer, "1")]
        );
    }

    #[test]
    fn sign_without_digit_is_operator() {
        assert_eq!(
            kinds("i + 1"),
            vec![
                (TokenKind::Identifier, "i"),
                (TokenKind::Operator, "+"),
                (TokenKind::Integer, "1"),
            ]
        );
    }

    #[test]
    fn trailing_dot_is_not_decimal() {
        assert_eq!(
            kinds("1.toString"),
            vec![
                (TokenKind::Integer, "1"),
                (TokenKind::Operator, "."),
                (TokenKind::Identifier, "toString"),
            ]
        );
    }

    #[test]
    fn offsets_skip_whitespace() {
        let tokens = tokenize("LET\t x\n=\u{8}1;").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 5, 7, 9, 10]);
    }

    #[test]
    fn single_equals_and_bang_are_operators() {
        assert_eq!(
            kinds("= ! == !="),
            vec![
                (TokenKind::Operator, "="),
                (TokenKind::Operator, "!"),
                (TokenKind::Operator, "=="),
                (TokenKind::Operator, "!="),
            ]
        );
    }

    #[rstest]
    #[case("'ab'", 0)]
    #[case("''", 0)]
    #[case("x = '", 4)]
    fn malformed_character(#[case] input: &str, #[case] position: usize) {
        let err = tokenize(input).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLiteral { .. }), "{err:?}");
        assert_eq!(err.position(), position);
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize("print(\"abc\n\");").unwrap_err();
        assert_eq!(err, ParseError::UnclosedString { position: 6 });
    }

    #[test]
    fn invalid_escape_points_at_backslash() {
        let err = tokenize(r#""ab\e""#).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidEscape {
                sequence: "\\e".to_string(),
                position: 3,
            }
        );
    }
}
