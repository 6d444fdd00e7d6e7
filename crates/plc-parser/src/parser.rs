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

//! Recursive descent parser with precedence climbing for binary operators
//!
//! Grammar summary:
//!
//! ```text
//! source      ::= (field | method)*
//! field       ::= 'LET' 'CONST'? identifier ':' identifier ('=' expression)? ';'
//! method      ::= 'DEF' identifier '(' (identifier ':' identifier (',' ...)*)? ')'
//!                 (':' identifier)? 'DO' statement* 'END'
//! statement   ::= declaration | if | for | while | return
//!               | expression ('=' expression)? ';'
//! expression  ::= logical, then comparison, additive, multiplicative
//! secondary   ::= primary ('.' identifier ('(' arguments? ')')?)*
//! primary     ::= 'NIL' | 'TRUE' | 'FALSE' | literal | '(' expression ')'
//!               | identifier ('(' arguments? ')')?
//! ```

use crate::error::{ParseError, ParseResult};
use crate::escape::decode_escapes;
use crate::token::{Token, TokenKind};
use num_bigint::BigInt;
use plc_ast::{
    Assignment, BinaryOperator, Declaration, Expression, Field, Literal, Method, NodeIdGenerator,
    Source, Statement,
};
use smallvec::SmallVec;
use std::borrow::Cow;
use tracing::debug;

/// Binary operator precedence levels (higher = tighter binding)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// `&&` `||`
    Logical = 1,
    /// `<` `<=` `>` `>=` `==` `!=`
    Comparison = 2,
    /// `+` `-`
    Additive = 3,
    /// `*` `/`
    Multiplicative = 4,
    /// Member access chains; no binary operator lives here
    Secondary = 5,
}

impl Precedence {
    /// Lowest level, where a full expression starts
    pub const LOWEST: Precedence = Precedence::Logical;

    /// Get the next higher precedence level for left-associative operators
    pub const fn next_level(self) -> Self {
        match self {
            Precedence::Logical => Precedence::Comparison,
            Precedence::Comparison => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Secondary,
            Precedence::Secondary => Precedence::Secondary,
        }
    }

    fn of(op: BinaryOperator) -> Self {
        match op.precedence() {
            1 => Precedence::Logical,
            2 => Precedence::Comparison,
            3 => Precedence::Additive,
            _ => Precedence::Multiplicative,
        }
    }
}

/// Parser over a fully lexed token sequence
pub struct Parser<'input> {
    tokens: Vec<Token<'input>>,
    index: usize,
    end: usize,
    ids: NodeIdGenerator,
}

impl<'input> Parser<'input> {
    /// Create a parser. `end` is the byte length of the source and is
    /// reported when input runs out.
    pub fn new(tokens: Vec<Token<'input>>, end: usize) -> Self {
        Self {
            tokens,
            index: 0,
            end,
            ids: NodeIdGenerator::new(),
        }
    }

    fn current(&self) -> Option<&Token<'input>> {
        self.tokens.get(self.index)
    }

    fn peek(&self, literal: &str) -> bool {
        self.current().is_some_and(|token| token.is(literal))
    }

    fn peek_kind(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|token| token.kind == kind)
    }

    fn advance(&mut self) -> Option<Token<'input>> {
        let token = self.tokens.get(self.index).copied();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn match_literal(&mut self, literal: &str) -> bool {
        if self.peek(literal) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn error_here(&self, expected: impl Into<Cow<'static, str>>) -> ParseError {
        match self.current() {
            Some(token) => ParseError::ExpectedToken {
                expected: expected.into(),
                found: token.literal.to_string(),
                position: token.offset,
            },
            None => ParseError::UnexpectedEndOfInput {
                expected: expected.into(),
                position: self.end,
            },
        }
    }

    fn expect(&mut self, literal: &'static str) -> ParseResult<Token<'input>> {
        if self.peek(literal) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.error_here(format!("'{literal}'")))
    }

    fn expect_identifier(&mut self, what: &'static str) -> ParseResult<Token<'input>> {
        if self.peek_kind(TokenKind::Identifier) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.error_here(what))
    }

    /// Fail unless every token has been consumed
    pub fn expect_end(&self) -> ParseResult<()> {
        match self.current() {
            None => Ok(()),
            Some(_) => Err(self.error_here("end of input")),
        }
    }

    /// Parse the `source` rule, consuming all tokens
    pub fn parse_source(mut self) -> ParseResult<Source> {
        let mut source = Source::default();
        while self.current().is_some() {
            if self.peek("LET") {
                source.fields.push(self.parse_field()?);
            } else if self.peek("DEF") {
                source.methods.push(self.parse_method()?);
            } else {
                return Err(self.error_here("'LET' or 'DEF'"));
            }
        }
        debug!(
            fields = source.fields.len(),
            methods = source.methods.len(),
            nodes = self.ids.allocated(),
            "parsed source"
        );
        Ok(source)
    }

    fn parse_field(&mut self) -> ParseResult<Field> {
        self.expect("LET")?;
        let constant = self.match_literal("CONST");
        let name = self.expect_identifier("field name")?;
        self.expect(":")?;
        let type_name = self.expect_identifier("type name")?;
        let value = if self.match_literal("=") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(";")?;

        Ok(Field {
            id: self.ids.next_id(),
            offset: name.offset,
            name: name.literal.to_string(),
            type_name: type_name.literal.to_string(),
            constant,
            value,
        })
    }

    fn parse_method(&mut self) -> ParseResult<Method> {
        self.expect("DEF")?;
        let name = self.expect_identifier("method name")?;
        self.expect("(")?;

        let mut parameters = Vec::new();
        let mut parameter_offsets = Vec::new();
        let mut parameter_types = Vec::new();
        let mut parameter_type_offsets = Vec::new();
        if !self.peek(")") {
            loop {
                let parameter = self.expect_identifier("parameter name")?;
                self.expect(":")?;
                let type_name = self.expect_identifier("type name")?;
                parameters.push(parameter.literal.to_string());
                parameter_offsets.push(parameter.offset);
                parameter_types.push(type_name.literal.to_string());
                parameter_type_offsets.push(type_name.offset);
                if !self.match_literal(",") {
                    break;
                }
            }
        }
        self.expect(")")?;

        let return_type = if self.match_literal(":") {
            Some(self.expect_identifier("return type name")?)
        } else {
            None
        };

        self.expect("DO")?;
        let statements = self.parse_block(&["END"])?;
        self.expect("END")?;

        Ok(Method {
            id: self.ids.next_id(),
            offset: name.offset,
            name: name.literal.to_string(),
            parameters,
            parameter_offsets,
            parameter_types,
            parameter_type_offsets,
            return_type: return_type.map(|token| token.literal.to_string()),
            return_type_offset: return_type.map(|token| token.offset),
            statements,
        })
    }

    /// Parse statements until one of `terminators` is the current token
    fn parse_block(&mut self, terminators: &[&'static str]) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while !terminators.iter().any(|t| self.peek(t)) {
            if self.current().is_none() {
                return Err(self.error_here(format!("'{}'", terminators.join("' or '"))));
            }
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Parse the `statement` rule
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        if self.peek("LET") {
            self.parse_declaration_statement().map(Statement::Declaration)
        } else if self.peek("IF") {
            self.parse_if_statement()
        } else if self.peek("FOR") {
            self.parse_for_statement()
        } else if self.peek("WHILE") {
            self.parse_while_statement()
        } else if self.peek("RETURN") {
            self.parse_return_statement()
        } else {
            let expression = self.parse_expression()?;
            let statement = if self.match_literal("=") {
                let receiver = Self::assignment_target(expression)?;
                let value = self.parse_expression()?;
                Statement::Assignment(Assignment { receiver, value })
            } else {
                Statement::Expression(expression)
            };
            self.expect(";")?;
            Ok(statement)
        }
    }

    fn assignment_target(expression: Expression) -> ParseResult<Expression> {
        if expression.is_access() {
            Ok(expression)
        } else {
            Err(ParseError::InvalidAssignmentTarget {
                position: expression.offset,
            })
        }
    }

    fn parse_declaration_statement(&mut self) -> ParseResult<Declaration> {
        self.expect("LET")?;
        let name = self.expect_identifier("variable name")?;
        let type_name = if self.match_literal(":") {
            Some(self.expect_identifier("type name")?.literal.to_string())
        } else {
            None
        };
        let value = if self.match_literal("=") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(";")?;

        Ok(Declaration {
            id: self.ids.next_id(),
            offset: name.offset,
            name: name.literal.to_string(),
            type_name,
            value,
        })
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        self.expect("IF")?;
        let condition = self.parse_expression()?;
        self.expect("DO")?;
        let then_statements = self.parse_block(&["ELSE", "END"])?;
        let else_statements = if self.match_literal("ELSE") {
            self.parse_block(&["END"])?
        } else {
            Vec::new()
        };
        self.expect("END")?;

        Ok(Statement::If {
            condition,
            then_statements,
            else_statements,
        })
    }

    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        self.expect("FOR")?;
        self.expect("(")?;

        let initialization = if self.peek(";") {
            None
        } else {
            let name = self.expect_identifier("loop variable")?;
            self.expect("=")?;
            let value = self.parse_expression()?;
            Some(Declaration {
                id: self.ids.next_id(),
                offset: name.offset,
                name: name.literal.to_string(),
                type_name: None,
                value: Some(value),
            })
        };
        self.expect(";")?;

        let condition = self.parse_expression()?;
        self.expect(";")?;

        let increment = if self.peek(")") {
            None
        } else {
            let name = self.expect_identifier("loop variable")?;
            let receiver =
                Expression::access(self.ids.next_id(), name.offset, None, name.literal);
            self.expect("=")?;
            let value = self.parse_expression()?;
            Some(Assignment { receiver, value })
        };
        self.expect(")")?;
        self.match_literal("DO");

        let statements = self.parse_block(&["END"])?;
        self.expect("END")?;

        Ok(Statement::For {
            initialization,
            condition,
            increment,
            statements,
        })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        self.expect("WHILE")?;
        let condition = self.parse_expression()?;
        self.expect("DO")?;
        let statements = self.parse_block(&["END"])?;
        self.expect("END")?;
        Ok(Statement::While {
            condition,
            statements,
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        let keyword = self.expect("RETURN")?;
        let value = self.parse_expression()?;
        self.expect(";")?;
        Ok(Statement::Return {
            offset: keyword.offset,
            value,
        })
    }

    /// Parse the `expression` rule
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_expression_with_precedence(Precedence::LOWEST)
    }

    fn current_binary_operator(&self) -> Option<BinaryOperator> {
        self.current()
            .filter(|token| token.kind == TokenKind::Operator)
            .and_then(|token| BinaryOperator::from_symbol(token.literal))
    }

    fn parse_expression_with_precedence(
        &mut self,
        min_precedence: Precedence,
    ) -> ParseResult<Expression> {
        let mut left = self.parse_secondary_expression()?;

        while let Some(op) = self.current_binary_operator() {
            let precedence = Precedence::of(op);
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let right = self.parse_expression_with_precedence(precedence.next_level())?;
            let offset = left.offset;
            left = Expression::binary(self.ids.next_id(), offset, op, left, right);
        }

        Ok(left)
    }

    fn parse_secondary_expression(&mut self) -> ParseResult<Expression> {
        let mut receiver = self.parse_primary_expression()?;
        while self.match_literal(".") {
            let name = self.expect_identifier("member name")?;
            receiver = if self.match_literal("(") {
                let arguments = self.parse_arguments()?;
                Expression::function(
                    self.ids.next_id(),
                    name.offset,
                    Some(receiver),
                    name.literal,
                    arguments,
                )
            } else {
                Expression::access(self.ids.next_id(), name.offset, Some(receiver), name.literal)
            };
        }
        Ok(receiver)
    }

    /// Parse call arguments after the opening parenthesis
    fn parse_arguments(&mut self) -> ParseResult<SmallVec<[Expression; 4]>> {
        let mut arguments = SmallVec::new();
        if !self.peek(")") {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.match_literal(",") {
                    break;
                }
            }
        }
        self.expect(")")?;
        Ok(arguments)
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        let Some(token) = self.current().copied() else {
            return Err(self.error_here("an expression"));
        };

        let literal = match (token.kind, token.literal) {
            (TokenKind::Identifier, "NIL") => Some(Literal::Nil),
            (TokenKind::Identifier, "TRUE") => Some(Literal::Boolean(true)),
            (TokenKind::Identifier, "FALSE") => Some(Literal::Boolean(false)),
            (TokenKind::Integer, text) => Some(Literal::Integer(Self::integer_literal(
                text,
                token.offset,
            )?)),
            (TokenKind::Decimal, text) => Some(Literal::Decimal(text.to_string())),
            (TokenKind::Character, text) => {
                Some(Literal::Character(Self::character_literal(text, token.offset)?))
            }
            (TokenKind::String, text) => Some(Literal::String(decode_escapes(
                Self::unquote(text),
                token.offset + 1,
            )?)),
            _ => None,
        };
        if let Some(value) = literal {
            self.advance();
            return Ok(Expression::literal(self.ids.next_id(), token.offset, value));
        }

        if token.is("(") {
            self.advance();
            let inner = self.parse_expression()?;
            self.expect(")")?;
            return Ok(Expression::group(self.ids.next_id(), token.offset, inner));
        }

        if token.kind == TokenKind::Identifier {
            self.advance();
            if self.match_literal("(") {
                let arguments = self.parse_arguments()?;
                return Ok(Expression::function(
                    self.ids.next_id(),
                    token.offset,
                    None,
                    token.literal,
                    arguments,
                ));
            }
            return Ok(Expression::access(
                self.ids.next_id(),
                token.offset,
                None,
                token.literal,
            ));
        }

        Err(self.error_here("an expression"))
    }

    fn unquote(text: &str) -> &str {
        text.get(1..text.len().saturating_sub(1)).unwrap_or_default()
    }

    fn integer_literal(text: &str, position: usize) -> ParseResult<BigInt> {
        let digits = text.strip_prefix('+').unwrap_or(text);
        digits
            .parse::<BigInt>()
            .map_err(|_| ParseError::InvalidLiteral {
                literal_type: "integer".into(),
                value: text.to_string(),
                position,
            })
    }

    fn character_literal(text: &str, position: usize) -> ParseResult<char> {
        let decoded = decode_escapes(Self::unquote(text), position + 1)?;
        let mut chars = decoded.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(ParseError::InvalidLiteral {
                literal_type: "character".into(),
                value: text.to_string(),
                position,
            }),
        }
    }
}
