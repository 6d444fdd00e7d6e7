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

//! Program execution

use crate::config::InterpreterConfig;
use crate::error::{EvaluationError, EvaluationResult};
use crate::flow::Flow;
use crate::members;
use crate::operators;
use crate::scope::{Callable, RuntimeVariable, ScopeArena, ScopeId};
use crate::value::Value;
use plc_ast::{
    Assignment, BinaryOperator, Declaration, Expression, ExpressionKind, Method, Source,
    Statement,
};
use stacker::maybe_grow;
use std::io::Write;
use tracing::{debug, trace};

/// Remaining stack below which a call or expression moves to a new segment
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each additional stack segment
const STACK_GROW: usize = 8 * 1024 * 1024;

fn native_print(output: &mut dyn Write, arguments: &[Value]) -> EvaluationResult<Value> {
    for argument in arguments {
        writeln!(output, "{argument}")?;
    }
    Ok(Value::Nil)
}

/// Tree-walking interpreter writing program output to `W`
///
/// One interpreter runs one program: [`Interpreter::run`] defines the
/// program's globals in the root scope, so a second run of the same
/// interpreter fails with a redefinition error.
#[derive(Debug)]
pub struct Interpreter<'a, W: Write> {
    scopes: ScopeArena<'a>,
    output: W,
    config: InterpreterConfig,
    depth: usize,
}

impl<'a, W: Write> Interpreter<'a, W> {
    /// Create an interpreter with the default configuration
    pub fn new(output: W) -> Self {
        Self::with_config(output, InterpreterConfig::default())
    }

    /// Create an interpreter with explicit limits
    pub fn with_config(output: W, config: InterpreterConfig) -> Self {
        let mut scopes = ScopeArena::new();
        let root = scopes.root();
        scopes.define_function(root, "print", 1, Callable::Native(native_print));
        Self {
            scopes,
            output,
            config,
            depth: 0,
        }
    }

    /// The output sink
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Consume the interpreter, returning the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Define every field and method, then call `main()` and return its result
    pub fn run(&mut self, source: &'a Source) -> EvaluationResult<Value> {
        debug!(
            fields = source.fields.len(),
            methods = source.methods.len(),
            "interpreting program"
        );
        let root = self.scopes.root();

        for field in &source.fields {
            let value = match &field.value {
                Some(initializer) => self.evaluate(initializer, root)?,
                None => Value::Nil,
            };
            let variable = RuntimeVariable {
                value,
                constant: field.constant,
            };
            if !self.scopes.define_variable(root, &field.name, variable) {
                return Err(EvaluationError::Redefinition {
                    name: field.name.clone(),
                    position: field.offset,
                });
            }
        }

        for method in &source.methods {
            let callable = Callable::Method {
                method,
                closure: root,
            };
            if !self
                .scopes
                .define_function(root, &method.name, method.arity(), callable)
            {
                return Err(EvaluationError::Redefinition {
                    name: method.name.clone(),
                    position: method.offset,
                });
            }
        }
        self.scopes.capture(root);

        let main = self
            .scopes
            .lookup_function(root, "main", 0)
            .ok_or(EvaluationError::MissingMain)?;
        let result = self.call(main, Vec::new(), 0)?;
        self.output.flush()?;
        debug!(result = %result, scopes = self.scopes.len(), "program finished");
        Ok(result)
    }

    fn call(
        &mut self,
        callable: Callable<'a>,
        arguments: Vec<Value>,
        position: usize,
    ) -> EvaluationResult<Value> {
        let (method, closure) = match callable {
            Callable::Native(function) => return function(&mut self.output, &arguments),
            Callable::Method { method, closure } => (method, closure),
        };
        if self.depth >= self.config.max_call_depth {
            return Err(EvaluationError::CallDepthExceeded {
                limit: self.config.max_call_depth,
                position,
            });
        }
        trace!(name = %method.name, depth = self.depth, "call");

        self.depth += 1;
        let frame = self.scopes.child(closure);
        let result = maybe_grow(STACK_RED_ZONE, STACK_GROW, || {
            self.invoke(frame, method, arguments)
        });
        self.scopes.release(frame);
        self.depth -= 1;

        Ok(match result? {
            Flow::Returned(value) => value,
            Flow::Continue => Value::Nil,
        })
    }

    fn invoke(
        &mut self,
        frame: ScopeId,
        method: &Method,
        arguments: Vec<Value>,
    ) -> EvaluationResult<Flow> {
        for (index, (name, value)) in method.parameters.iter().zip(arguments).enumerate() {
            let variable = RuntimeVariable {
                value,
                constant: false,
            };
            if !self.scopes.define_variable(frame, name, variable) {
                return Err(EvaluationError::Redefinition {
                    name: name.clone(),
                    position: method.parameter_offsets.get(index).copied().unwrap_or(method.offset),
                });
            }
        }
        self.execute_statements(&method.statements, frame)
    }

    fn execute_statements(
        &mut self,
        statements: &[Statement],
        scope: ScopeId,
    ) -> EvaluationResult<Flow> {
        for statement in statements {
            let flow = self.execute(statement, scope)?;
            if flow.is_return() {
                return Ok(flow);
            }
        }
        Ok(Flow::Continue)
    }

    /// Run `statements` in a fresh child of `parent`
    fn execute_block(&mut self, statements: &[Statement], parent: ScopeId) -> EvaluationResult<Flow> {
        let scope = self.scopes.child(parent);
        let flow = self.execute_statements(statements, scope);
        self.scopes.release(scope);
        flow
    }

    fn execute(&mut self, statement: &Statement, scope: ScopeId) -> EvaluationResult<Flow> {
        match statement {
            Statement::Expression(expression) => {
                self.evaluate(expression, scope)?;
                Ok(Flow::Continue)
            }
            Statement::Declaration(declaration) => {
                self.declare(declaration, scope)?;
                Ok(Flow::Continue)
            }
            Statement::Assignment(assignment) => {
                self.assign(assignment, scope)?;
                Ok(Flow::Continue)
            }
            Statement::If {
                condition,
                then_statements,
                else_statements,
            } => {
                let branch = if self.condition(condition, scope)? {
                    then_statements
                } else {
                    else_statements
                };
                self.execute_block(branch, scope)
            }
            Statement::For {
                initialization,
                condition,
                increment,
                statements,
            } => {
                let loop_scope = self.scopes.child(scope);
                let flow = self.execute_for(
                    loop_scope,
                    initialization.as_ref(),
                    condition,
                    increment.as_ref(),
                    statements,
                );
                self.scopes.release(loop_scope);
                flow
            }
            Statement::While {
                condition,
                statements,
            } => {
                while self.condition(condition, scope)? {
                    let flow = self.execute_block(statements, scope)?;
                    if flow.is_return() {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Continue)
            }
            Statement::Return { value, .. } => Ok(Flow::Returned(self.evaluate(value, scope)?)),
        }
    }

    fn execute_for(
        &mut self,
        loop_scope: ScopeId,
        initialization: Option<&Declaration>,
        condition: &Expression,
        increment: Option<&Assignment>,
        statements: &[Statement],
    ) -> EvaluationResult<Flow> {
        if let Some(declaration) = initialization {
            self.declare(declaration, loop_scope)?;
        }
        while self.condition(condition, loop_scope)? {
            let flow = self.execute_block(statements, loop_scope)?;
            if flow.is_return() {
                return Ok(flow);
            }
            if let Some(assignment) = increment {
                self.assign(assignment, loop_scope)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn condition(&mut self, condition: &Expression, scope: ScopeId) -> EvaluationResult<bool> {
        self.evaluate(condition, scope)?.as_boolean(condition.offset)
    }

    fn declare(&mut self, declaration: &Declaration, scope: ScopeId) -> EvaluationResult<()> {
        let value = match &declaration.value {
            Some(initializer) => self.evaluate(initializer, scope)?,
            None => Value::Nil,
        };
        let variable = RuntimeVariable {
            value,
            constant: false,
        };
        if self.scopes.define_variable(scope, &declaration.name, variable) {
            Ok(())
        } else {
            Err(EvaluationError::Redefinition {
                name: declaration.name.clone(),
                position: declaration.offset,
            })
        }
    }

    fn assign(&mut self, assignment: &Assignment, scope: ScopeId) -> EvaluationResult<()> {
        let value = self.evaluate(&assignment.value, scope)?;
        let target = &assignment.receiver;
        match &target.kind {
            ExpressionKind::Access {
                receiver: Some(receiver),
                name,
            } => {
                let receiver = self.evaluate(receiver, scope)?;
                Err(EvaluationError::UndefinedField {
                    name: name.clone(),
                    receiver: receiver.kind(),
                    position: target.offset,
                })
            }
            ExpressionKind::Access {
                receiver: None,
                name,
            } => {
                let slot = self.scopes.lookup_variable_mut(scope, name).ok_or_else(|| {
                    EvaluationError::UndefinedVariable {
                        name: name.clone(),
                        position: target.offset,
                    }
                })?;
                if slot.constant && !slot.value.is_nil() {
                    return Err(EvaluationError::ConstantReassignment {
                        name: name.clone(),
                        position: target.offset,
                    });
                }
                slot.value = value;
                Ok(())
            }
            _ => Err(EvaluationError::InvalidAssignmentTarget {
                position: target.offset,
            }),
        }
    }

    fn evaluate(&mut self, expression: &Expression, scope: ScopeId) -> EvaluationResult<Value> {
        maybe_grow(STACK_RED_ZONE, STACK_GROW, || self.evaluate_expression(expression, scope))
    }

    fn evaluate_expression(
        &mut self,
        expression: &Expression,
        scope: ScopeId,
    ) -> EvaluationResult<Value> {
        let position = expression.offset;
        match &expression.kind {
            ExpressionKind::Literal(literal) => Value::from_literal(literal, position),
            ExpressionKind::Group(inner) => self.evaluate(inner, scope),
            ExpressionKind::Binary(data) => match data.op {
                BinaryOperator::And => {
                    if !self.condition(&data.left, scope)? {
                        return Ok(Value::Boolean(false));
                    }
                    Ok(Value::Boolean(self.condition(&data.right, scope)?))
                }
                BinaryOperator::Or => {
                    if self.condition(&data.left, scope)? {
                        return Ok(Value::Boolean(true));
                    }
                    Ok(Value::Boolean(self.condition(&data.right, scope)?))
                }
                op => {
                    let left = self.evaluate(&data.left, scope)?;
                    let right = self.evaluate(&data.right, scope)?;
                    operators::apply(op, &left, &right, position)
                }
            },
            ExpressionKind::Access {
                receiver: Some(receiver),
                name,
            } => {
                let receiver = self.evaluate(receiver, scope)?;
                Err(EvaluationError::UndefinedField {
                    name: name.clone(),
                    receiver: receiver.kind(),
                    position,
                })
            }
            ExpressionKind::Access {
                receiver: None,
                name,
            } => self
                .scopes
                .lookup_variable(scope, name)
                .map(|variable| variable.value.clone())
                .ok_or_else(|| EvaluationError::UndefinedVariable {
                    name: name.clone(),
                    position,
                }),
            ExpressionKind::Function(data) => {
                // Arguments are evaluated before the receiver
                let arguments = data
                    .arguments
                    .iter()
                    .map(|argument| self.evaluate(argument, scope))
                    .collect::<EvaluationResult<Vec<_>>>()?;
                let receiver = match &data.receiver {
                    Some(receiver) => Some(self.evaluate(receiver, scope)?),
                    None => None,
                };
                match receiver {
                    Some(receiver) => members::invoke(&receiver, &data.name, &arguments, position),
                    None => {
                        let callable = self
                            .scopes
                            .lookup_function(scope, &data.name, arguments.len())
                            .ok_or_else(|| EvaluationError::UndefinedFunction {
                                name: data.name.clone(),
                                arity: arguments.len(),
                                position,
                            })?;
                        self.call(callable, arguments, position)
                    }
                }
            }
        }
    }
}
