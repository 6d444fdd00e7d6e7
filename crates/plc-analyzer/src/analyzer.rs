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

//! Single-pass name and type resolution

use crate::analysis::Analysis;
use crate::binding::{Function, Variable};
use crate::context::AnalysisContext;
use crate::error::{AnalysisError, AnalysisResult};
use crate::scope::ScopeArena;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use plc_ast::{
    Assignment, BinaryData, BinaryOperator, Declaration, Expression, ExpressionKind, Field,
    FunctionData, Literal, Method, Source, Statement,
};
use plc_core::Type;
use std::str::FromStr;
use tracing::debug;

/// Static analyzer over one program
pub struct Analyzer {
    scopes: ScopeArena,
    analysis: Analysis,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create an analyzer whose global scope holds the builtin `print(Any)`
    pub fn new() -> Self {
        let mut scopes = ScopeArena::new();
        let root = scopes.root();
        scopes.define_function(
            root,
            Function::new("print", vec![Type::Any], Type::Nil).with_jvm_name("System.out.println"),
        );
        Self {
            scopes,
            analysis: Analysis::default(),
        }
    }

    /// Analyze a whole program
    pub fn analyze(mut self, source: &Source) -> AnalysisResult<Analysis> {
        debug!(
            fields = source.fields.len(),
            methods = source.methods.len(),
            "analyzing source"
        );
        let ctx = AnalysisContext::global(self.scopes.root());

        for field in &source.fields {
            self.visit_field(field, ctx)?;
        }
        for method in &source.methods {
            self.visit_method(method, ctx)?;
        }

        match self.scopes.lookup_function(ctx.scope, "main", 0) {
            None => return Err(AnalysisError::MissingMain),
            Some(main) if main.returns != Type::Integer => {
                let position = source.method("main", 0).map_or(0, |method| method.offset);
                return Err(AnalysisError::MainReturnType {
                    actual: main.returns,
                    position,
                });
            }
            Some(_) => {}
        }

        let root = self.scopes.root();
        self.analysis.global_variables = self.scopes.variables(root).into_iter().cloned().collect();
        self.analysis.global_functions = self.scopes.functions(root).into_iter().cloned().collect();
        debug!(
            types = self.analysis.types.len(),
            scopes = self.scopes.len(),
            "analysis complete"
        );
        Ok(self.analysis)
    }

    fn resolve_type(name: &str, position: usize) -> AnalysisResult<Type> {
        Type::from_name(name).ok_or_else(|| AnalysisError::UndefinedType {
            name: name.to_string(),
            position,
        })
    }

    fn require_assignable(target: Type, actual: Type, position: usize) -> AnalysisResult<()> {
        Type::require_assignable(target, actual)
            .map_err(|error| AnalysisError::not_assignable(error, position))
    }

    fn define_variable(
        &mut self,
        ctx: AnalysisContext,
        variable: Variable,
        position: usize,
    ) -> AnalysisResult<()> {
        let name = variable.name.clone();
        if self.scopes.define_variable(ctx.scope, variable) {
            Ok(())
        } else {
            Err(AnalysisError::RedefinedVariable { name, position })
        }
    }

    fn visit_field(&mut self, field: &Field, ctx: AnalysisContext) -> AnalysisResult<()> {
        let ty = Self::resolve_type(&field.type_name, field.offset)?;
        match &field.value {
            Some(value) => {
                let actual = self.visit_expression(value, ctx)?;
                Self::require_assignable(ty, actual, value.offset)?;
            }
            None if field.constant => {
                return Err(AnalysisError::UninitializedConstant {
                    name: field.name.clone(),
                    position: field.offset,
                });
            }
            None => {}
        }

        let variable = Variable::new(&field.name, ty, field.constant);
        self.define_variable(ctx, variable.clone(), field.offset)?;
        self.analysis.record_variable(field.id, variable)
    }

    fn visit_method(&mut self, method: &Method, ctx: AnalysisContext) -> AnalysisResult<()> {
        let at = |offsets: &[usize], index: usize| offsets.get(index).copied().unwrap_or(method.offset);
        let parameter_types = method
            .parameter_types
            .iter()
            .enumerate()
            .map(|(index, name)| Self::resolve_type(name, at(&method.parameter_type_offsets, index)))
            .collect::<AnalysisResult<Vec<_>>>()?;
        let returns = match &method.return_type {
            Some(name) => {
                Self::resolve_type(name, method.return_type_offset.unwrap_or(method.offset))?
            }
            None => Type::Nil,
        };

        // Registered before the body so the method can call itself
        let function = Function::new(&method.name, parameter_types.clone(), returns);
        if !self.scopes.define_function(ctx.scope, function.clone()) {
            return Err(AnalysisError::RedefinedFunction {
                name: method.name.clone(),
                arity: method.arity(),
                position: method.offset,
            });
        }
        self.analysis.record_function(method.id, function)?;

        let body = ctx
            .with_scope(self.scopes.child(ctx.scope))
            .with_method(returns);
        for (index, (name, ty)) in method.parameters.iter().zip(parameter_types).enumerate() {
            let position = at(&method.parameter_offsets, index);
            self.define_variable(body, Variable::new(name, ty, false), position)?;
        }
        self.visit_block(&method.statements, body)
    }

    fn visit_block(&mut self, statements: &[Statement], ctx: AnalysisContext) -> AnalysisResult<()> {
        statements
            .iter()
            .try_for_each(|statement| self.visit_statement(statement, ctx))
    }

    fn visit_statement(&mut self, statement: &Statement, ctx: AnalysisContext) -> AnalysisResult<()> {
        match statement {
            Statement::Expression(expression) => {
                self.visit_expression(expression, ctx)?;
                if !expression.is_function() {
                    return Err(AnalysisError::ExpressionStatement {
                        position: expression.offset,
                    });
                }
                Ok(())
            }
            Statement::Declaration(declaration) => self.visit_declaration(declaration, ctx),
            Statement::Assignment(assignment) => self.visit_assignment(assignment, ctx),
            Statement::If {
                condition,
                then_statements,
                else_statements,
            } => {
                self.require_condition("IF", condition, ctx)?;
                if then_statements.is_empty() {
                    return Err(AnalysisError::EmptyBody {
                        statement: "IF",
                        position: condition.offset,
                    });
                }
                let then_scope = self.scopes.child(ctx.scope);
                self.visit_block(then_statements, ctx.with_scope(then_scope))?;
                if !else_statements.is_empty() {
                    let else_scope = self.scopes.child(ctx.scope);
                    self.visit_block(else_statements, ctx.with_scope(else_scope))?;
                }
                Ok(())
            }
            Statement::For {
                initialization,
                condition,
                increment,
                statements,
            } => {
                let loop_ctx = ctx.with_scope(self.scopes.child(ctx.scope));
                if let Some(declaration) = initialization {
                    self.visit_declaration(declaration, loop_ctx)?;
                    let ty = self
                        .scopes
                        .lookup_variable(loop_ctx.scope, &declaration.name)
                        .map_or(Type::Nil, |variable| variable.ty);
                    if !Type::Comparable.is_assignable_from(ty) {
                        return Err(AnalysisError::LoopVariableNotComparable {
                            name: declaration.name.clone(),
                            actual: ty,
                            position: declaration.offset,
                        });
                    }
                }
                self.require_condition("FOR", condition, loop_ctx)?;
                if let Some(assignment) = increment {
                    self.visit_assignment(assignment, loop_ctx)?;
                }
                if statements.is_empty() {
                    return Err(AnalysisError::EmptyBody {
                        statement: "FOR",
                        position: condition.offset,
                    });
                }
                let body_scope = self.scopes.child(loop_ctx.scope);
                self.visit_block(statements, loop_ctx.with_scope(body_scope))
            }
            Statement::While {
                condition,
                statements,
            } => {
                self.require_condition("WHILE", condition, ctx)?;
                let body_scope = self.scopes.child(ctx.scope);
                self.visit_block(statements, ctx.with_scope(body_scope))
            }
            Statement::Return { offset, value } => {
                let Some(method) = ctx.method else {
                    return Err(AnalysisError::ReturnOutsideMethod { position: *offset });
                };
                let actual = self.visit_expression(value, ctx)?;
                Self::require_assignable(method.returns, actual, value.offset)
            }
        }
    }

    fn require_condition(
        &mut self,
        statement: &'static str,
        condition: &Expression,
        ctx: AnalysisContext,
    ) -> AnalysisResult<()> {
        let actual = self.visit_expression(condition, ctx)?;
        if actual != Type::Boolean {
            return Err(AnalysisError::NonBooleanCondition {
                statement,
                actual,
                position: condition.offset,
            });
        }
        Ok(())
    }

    fn visit_declaration(
        &mut self,
        declaration: &Declaration,
        ctx: AnalysisContext,
    ) -> AnalysisResult<()> {
        let inferred = match &declaration.value {
            Some(value) => Some((self.visit_expression(value, ctx)?, value.offset)),
            None => None,
        };

        let ty = match (&declaration.type_name, inferred) {
            (Some(name), Some((actual, position))) => {
                let declared = Self::resolve_type(name, declaration.offset)?;
                Self::require_assignable(declared, actual, position)?;
                declared
            }
            (Some(name), None) => Self::resolve_type(name, declaration.offset)?,
            (None, Some((actual, _))) => actual,
            (None, None) => {
                return Err(AnalysisError::UntypedDeclaration {
                    name: declaration.name.clone(),
                    position: declaration.offset,
                });
            }
        };

        let variable = Variable::new(&declaration.name, ty, false);
        self.define_variable(ctx, variable.clone(), declaration.offset)?;
        self.analysis.record_variable(declaration.id, variable)
    }

    fn visit_assignment(&mut self, assignment: &Assignment, ctx: AnalysisContext) -> AnalysisResult<()> {
        let receiver = &assignment.receiver;
        if !receiver.is_access() {
            return Err(AnalysisError::InvalidAssignmentTarget {
                position: receiver.offset,
            });
        }
        self.visit_expression(receiver, ctx)?;
        let actual = self.visit_expression(&assignment.value, ctx)?;

        let Some(variable) = self.analysis.variable(receiver.id) else {
            return Err(AnalysisError::InvalidAssignmentTarget {
                position: receiver.offset,
            });
        };
        if variable.constant {
            return Err(AnalysisError::ConstantAssignment {
                name: variable.name.clone(),
                position: receiver.offset,
            });
        }
        Self::require_assignable(variable.ty, actual, assignment.value.offset)
    }

    /// Resolve an expression's type and record it in the side table
    fn visit_expression(&mut self, expression: &Expression, ctx: AnalysisContext) -> AnalysisResult<Type> {
        let ty = match &expression.kind {
            ExpressionKind::Literal(literal) => Self::literal_type(literal, expression.offset)?,
            ExpressionKind::Group(inner) => {
                let ty = self.visit_expression(inner, ctx)?;
                if !matches!(inner.kind, ExpressionKind::Binary(_)) {
                    return Err(AnalysisError::InvalidGroup {
                        position: expression.offset,
                    });
                }
                ty
            }
            ExpressionKind::Binary(data) => self.visit_binary(data, expression.offset, ctx)?,
            ExpressionKind::Access { receiver, name } => {
                let variable = match receiver {
                    Some(receiver) => {
                        let receiver_type = self.visit_expression(receiver, ctx)?;
                        let ty = receiver_type.field(name).ok_or_else(|| {
                            AnalysisError::UndefinedField {
                                name: name.clone(),
                                receiver: receiver_type,
                                position: expression.offset,
                            }
                        })?;
                        Variable::new(name, ty, false)
                    }
                    None => self
                        .scopes
                        .lookup_variable(ctx.scope, name)
                        .cloned()
                        .ok_or_else(|| AnalysisError::UndefinedVariable {
                            name: name.clone(),
                            position: expression.offset,
                        })?,
                };
                let ty = variable.ty;
                self.analysis.record_variable(expression.id, variable)?;
                ty
            }
            ExpressionKind::Function(data) => self.visit_function(data, expression, ctx)?,
        };

        self.analysis.record_type(expression.id, ty)?;
        Ok(ty)
    }

    fn literal_type(literal: &Literal, position: usize) -> AnalysisResult<Type> {
        Ok(match literal {
            Literal::Nil => Type::Nil,
            Literal::Boolean(_) => Type::Boolean,
            Literal::Character(_) => Type::Character,
            Literal::String(_) => Type::String,
            Literal::Integer(value) => {
                Self::require_i32(value, position)?;
                Type::Integer
            }
            Literal::Decimal(text) => {
                let digits = text.strip_prefix('+').unwrap_or(text);
                let finite = BigDecimal::from_str(digits)
                    .ok()
                    .and_then(|value| value.to_f64())
                    .is_some_and(f64::is_finite);
                if !finite {
                    return Err(AnalysisError::DecimalOutOfRange {
                        literal: text.clone(),
                        position,
                    });
                }
                Type::Decimal
            }
        })
    }

    fn require_i32(value: &BigInt, position: usize) -> AnalysisResult<i32> {
        value
            .to_i32()
            .ok_or_else(|| AnalysisError::IntegerOutOfRange {
                literal: value.to_string(),
                position,
            })
    }

    fn visit_binary(
        &mut self,
        data: &BinaryData,
        position: usize,
        ctx: AnalysisContext,
    ) -> AnalysisResult<Type> {
        let left = self.visit_expression(&data.left, ctx)?;
        let right = self.visit_expression(&data.right, ctx)?;
        let mismatch = || AnalysisError::OperandMismatch {
            op: data.op,
            left,
            right,
            position,
        };

        match data.op {
            BinaryOperator::And | BinaryOperator::Or => {
                if left == Type::Boolean && right == Type::Boolean {
                    Ok(Type::Boolean)
                } else {
                    Err(mismatch())
                }
            }
            op if op.is_comparison() => {
                if left == right && left.is_comparable() {
                    Ok(Type::Boolean)
                } else {
                    Err(mismatch())
                }
            }
            BinaryOperator::Add if left == Type::String || right == Type::String => Ok(Type::String),
            _ => match (left, right) {
                (Type::Integer, Type::Integer) => Ok(Type::Integer),
                (Type::Decimal, Type::Decimal) => Ok(Type::Decimal),
                _ => Err(mismatch()),
            },
        }
    }

    fn visit_function(
        &mut self,
        data: &FunctionData,
        expression: &Expression,
        ctx: AnalysisContext,
    ) -> AnalysisResult<Type> {
        let arity = data.arguments.len();
        let function = match &data.receiver {
            Some(receiver) => {
                let receiver_type = self.visit_expression(receiver, ctx)?;
                receiver_type
                    .method(&data.name, arity)
                    .map(Function::from)
                    .ok_or_else(|| AnalysisError::UndefinedMethod {
                        name: data.name.clone(),
                        arity,
                        receiver: receiver_type,
                        position: expression.offset,
                    })?
            }
            None => self
                .scopes
                .lookup_function(ctx.scope, &data.name, arity)
                .cloned()
                .ok_or_else(|| AnalysisError::UndefinedFunction {
                    name: data.name.clone(),
                    arity,
                    position: expression.offset,
                })?,
        };

        for (argument, parameter) in data.arguments.iter().zip(&function.parameter_types) {
            let actual = self.visit_expression(argument, ctx)?;
            Self::require_assignable(*parameter, actual, argument.offset)?;
        }

        let returns = function.returns;
        self.analysis.record_function(expression.id, function)?;
        Ok(returns)
    }
}

/// Analyze a program with a fresh [`Analyzer`]
pub fn analyze(source: &Source) -> AnalysisResult<Analysis> {
    Analyzer::new().analyze(source)
}
