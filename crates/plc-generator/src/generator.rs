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

//! Java emitter

use crate::error::{GenerateError, GenerateResult};
use crate::escape::{escape_char, escape_string};
use plc_analyzer::{Analysis, Function, Variable};
use plc_ast::{
    Assignment, Declaration, Expression, ExpressionKind, Field, Literal, Method, NodeId, Source,
    Statement,
};
use plc_core::Type;
use std::fmt::Write;
use tracing::debug;

const INDENT: &str = "    ";

/// Prints Java source into an owned buffer
#[derive(Debug)]
pub struct Generator<'a> {
    analysis: &'a Analysis,
    output: String,
    indent: usize,
}

impl<'a> Generator<'a> {
    /// Create a generator reading bindings from `analysis`
    pub fn new(analysis: &'a Analysis) -> Self {
        Self {
            analysis,
            output: String::new(),
            indent: 0,
        }
    }

    /// Emit the `Main` class for `source`
    pub fn generate(mut self, source: &Source) -> GenerateResult<String> {
        debug!(
            fields = source.fields.len(),
            methods = source.methods.len(),
            "generating java source"
        );
        self.output.push_str("public class Main {");
        self.indent += 1;

        if !source.fields.is_empty() {
            self.output.push('\n');
            for field in &source.fields {
                self.newline();
                self.field(field)?;
            }
        }

        self.output.push('\n');
        self.newline();
        self.output.push_str("public static void main(String[] args) {");
        self.indent += 1;
        self.newline();
        self.output.push_str("System.exit(new Main().main());");
        self.indent -= 1;
        self.newline();
        self.output.push('}');
        self.output.push('\n');

        for method in &source.methods {
            self.newline();
            self.method(method)?;
            self.output.push('\n');
        }

        self.indent -= 1;
        self.output.push_str("\n}");
        debug!(bytes = self.output.len(), "generation finished");
        Ok(self.output)
    }

    fn newline(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indent {
            self.output.push_str(INDENT);
        }
    }

    fn variable(&self, node: NodeId, position: usize) -> GenerateResult<&'a Variable> {
        self.analysis
            .variable(node)
            .ok_or(GenerateError::MissingAnnotation {
                node,
                annotation: "variable",
                position,
            })
    }

    fn function(&self, node: NodeId, position: usize) -> GenerateResult<&'a Function> {
        self.analysis
            .function(node)
            .ok_or(GenerateError::MissingAnnotation {
                node,
                annotation: "function",
                position,
            })
    }

    fn field(&mut self, field: &Field) -> GenerateResult<()> {
        let variable = self.variable(field.id, field.offset)?;
        if field.constant {
            self.output.push_str("final ");
        }
        write!(self.output, "{} {}", variable.ty.jvm_name(), variable.jvm_name)?;
        if let Some(value) = &field.value {
            self.output.push_str(" = ");
            self.expression(value)?;
        }
        self.output.push(';');
        Ok(())
    }

    fn method(&mut self, method: &Method) -> GenerateResult<()> {
        let function = self.function(method.id, method.offset)?;
        let returns = match function.returns {
            Type::Nil => "void",
            other => other.jvm_name(),
        };
        write!(self.output, "{returns} {}(", function.jvm_name)?;
        for (index, (name, ty)) in method
            .parameters
            .iter()
            .zip(&function.parameter_types)
            .enumerate()
        {
            if index > 0 {
                self.output.push_str(", ");
            }
            write!(self.output, "{} {name}", ty.jvm_name())?;
        }
        self.output.push_str(") ");
        self.block(&method.statements)
    }

    /// `{}` when empty, otherwise one statement per line one level deeper
    fn block(&mut self, statements: &[Statement]) -> GenerateResult<()> {
        if statements.is_empty() {
            self.output.push_str("{}");
            return Ok(());
        }
        self.output.push('{');
        self.indent += 1;
        for statement in statements {
            self.newline();
            self.statement(statement)?;
        }
        self.indent -= 1;
        self.newline();
        self.output.push('}');
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> GenerateResult<()> {
        match statement {
            Statement::Expression(expression) => {
                self.expression(expression)?;
                self.output.push(';');
            }
            Statement::Declaration(declaration) => {
                self.declaration(declaration)?;
                self.output.push(';');
            }
            Statement::Assignment(assignment) => {
                self.assignment(assignment)?;
                self.output.push(';');
            }
            Statement::If {
                condition,
                then_statements,
                else_statements,
            } => {
                self.output.push_str("if (");
                self.expression(condition)?;
                self.output.push_str(") ");
                self.block(then_statements)?;
                if !else_statements.is_empty() {
                    self.output.push_str(" else ");
                    self.block(else_statements)?;
                }
            }
            Statement::For {
                initialization,
                condition,
                increment,
                statements,
            } => {
                self.output.push_str("for (");
                if let Some(declaration) = initialization {
                    self.output.push(' ');
                    self.declaration(declaration)?;
                }
                self.output.push_str("; ");
                self.expression(condition)?;
                self.output.push(';');
                if let Some(assignment) = increment {
                    self.output.push(' ');
                    self.assignment(assignment)?;
                }
                self.output.push_str(" ) ");
                self.block(statements)?;
            }
            Statement::While {
                condition,
                statements,
            } => {
                self.output.push_str("while (");
                self.expression(condition)?;
                self.output.push_str(") ");
                self.block(statements)?;
            }
            Statement::Return { value, .. } => {
                self.output.push_str("return ");
                self.expression(value)?;
                self.output.push(';');
            }
        }
        Ok(())
    }

    fn declaration(&mut self, declaration: &Declaration) -> GenerateResult<()> {
        let variable = self.variable(declaration.id, declaration.offset)?;
        write!(self.output, "{} {}", variable.ty.jvm_name(), variable.jvm_name)?;
        if let Some(value) = &declaration.value {
            self.output.push_str(" = ");
            self.expression(value)?;
        }
        Ok(())
    }

    fn assignment(&mut self, assignment: &Assignment) -> GenerateResult<()> {
        self.expression(&assignment.receiver)?;
        self.output.push_str(" = ");
        self.expression(&assignment.value)
    }

    fn expression(&mut self, expression: &Expression) -> GenerateResult<()> {
        match &expression.kind {
            ExpressionKind::Literal(literal) => self.literal(literal)?,
            ExpressionKind::Group(inner) => {
                self.output.push('(');
                self.expression(inner)?;
                self.output.push(')');
            }
            ExpressionKind::Binary(data) => {
                self.expression(&data.left)?;
                write!(self.output, " {} ", data.op.symbol())?;
                self.expression(&data.right)?;
            }
            ExpressionKind::Access { receiver, .. } => {
                let variable = self.variable(expression.id, expression.offset)?;
                if let Some(receiver) = receiver {
                    self.expression(receiver)?;
                    self.output.push('.');
                }
                self.output.push_str(&variable.jvm_name);
            }
            ExpressionKind::Function(data) => {
                let function = self.function(expression.id, expression.offset)?;
                if let Some(receiver) = &data.receiver {
                    self.expression(receiver)?;
                    self.output.push('.');
                }
                self.output.push_str(&function.jvm_name);
                self.output.push('(');
                for (index, argument) in data.arguments.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(", ");
                    }
                    self.expression(argument)?;
                }
                self.output.push(')');
            }
        }
        Ok(())
    }

    fn literal(&mut self, literal: &Literal) -> GenerateResult<()> {
        match literal {
            Literal::Nil => self.output.push_str("null"),
            Literal::Boolean(value) => write!(self.output, "{value}")?,
            Literal::Integer(value) => write!(self.output, "{value}")?,
            Literal::Decimal(text) => self.output.push_str(text.strip_prefix('+').unwrap_or(text)),
            Literal::Character(value) => write!(self.output, "'{}'", escape_char(*value))?,
            Literal::String(value) => write!(self.output, "\"{}\"", escape_string(value))?,
        }
        Ok(())
    }
}

/// Emit Java source for an analyzed program
pub fn generate(source: &Source, analysis: &Analysis) -> GenerateResult<String> {
    Generator::new(analysis).generate(source)
}
