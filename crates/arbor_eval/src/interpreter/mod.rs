//! Tree-walking evaluator over items.
//!
//! The interpreter holds a stack of scopes. Selectors read the top scope;
//! evaluating a record pushes it, so selectors inside the record see its
//! siblings; invoking a lambda pushes a record of its parameters.
//!
//! # Entry points
//!
//! - [`Interpreter::evaluate`] reduces an item to a constant where it can.
//! - [`Interpreter::substitute`] resolves what the current scopes can
//!   answer and rebuilds the rest of the expression.
//! - [`Interpreter::for_selected`] and [`Interpreter::map_selected`] (in
//!   `select.rs`) walk selections directly.

mod builder;
mod scope_guard;

pub use builder::{InterpreterBuilder, InterpreterSettings};
pub use scope_guard::{ScopedInterpreter, UnscopedInterpreter};

use arbor_item::{BinaryOp, Item, Operator, Record, Value};
use arbor_stack::ensure_sufficient_stack;
use tracing::warn;

use crate::errors::{scope_overflow, scope_underflow};
use crate::EvalResult;

/// Scope stack and evaluation entry points.
#[derive(Clone, Debug, Default)]
pub struct Interpreter {
    settings: InterpreterSettings,
    scopes: Vec<Item>,
}

impl Interpreter {
    /// An interpreter with default settings and no scopes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: InterpreterSettings) -> Self {
        Interpreter {
            settings,
            scopes: Vec::new(),
        }
    }

    /// An interpreter whose only scope is `scope`.
    pub fn from_scope(scope: impl Into<Item>) -> Self {
        Interpreter {
            settings: InterpreterSettings::default(),
            scopes: vec![scope.into()],
        }
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn settings(&self) -> &InterpreterSettings {
        &self.settings
    }

    // Scope stack

    #[inline]
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self, scope: impl Into<Item>) -> EvalResult<()> {
        let limit = self.settings.max_scope_depth;
        if self.scopes.len() >= limit {
            warn!(limit, "scope stack limit reached");
            return Err(scope_overflow(limit));
        }
        self.scopes.push(scope.into());
        Ok(())
    }

    pub fn pop_scope(&mut self) -> EvalResult<Item> {
        self.scopes.pop().ok_or_else(scope_underflow)
    }

    /// The innermost scope.
    pub fn peek_scope(&self) -> Option<&Item> {
        self.scopes.last()
    }

    /// The scope at `index`, counting from the outermost.
    pub fn get_scope(&self, index: usize) -> Option<&Item> {
        self.scopes.get(index)
    }

    /// Replace the innermost scope, returning the old one.
    pub fn swap_scope(&mut self, scope: impl Into<Item>) -> EvalResult<Item> {
        let top = self.scopes.last_mut().ok_or_else(scope_underflow)?;
        Ok(std::mem::replace(top, scope.into()))
    }

    // Evaluation

    /// Evaluate `item` against the current scopes.
    ///
    /// - Fields keep their key and evaluate their value. A field whose
    ///   value evaluates to `Absent` is itself `Absent`.
    /// - Records evaluate item by item with themselves as the scope;
    ///   items that evaluate to `Absent` are dropped.
    /// - Selectors collect every selection; one bare value is returned
    ///   as is, several are gathered into a record, none is `Absent`.
    /// - Operators evaluate their operands; `&&`, `||` and `?:` only as
    ///   far as needed.
    /// - Everything else evaluates to itself.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn evaluate(&mut self, item: &Item) -> EvalResult {
        ensure_sufficient_stack(|| match item {
            Item::Field(field) => {
                let value = self.evaluate_value(field.value())?.into_value();
                if value.is_defined() {
                    Ok(Item::Field(field.updated_value(value)))
                } else {
                    Ok(Item::absent())
                }
            }
            Item::Value(value) => self.evaluate_value(value),
        })
    }

    pub(crate) fn evaluate_value(&mut self, value: &Value) -> EvalResult {
        match value {
            Value::Record(record) => self.evaluate_record(record),
            Value::Selector(selector) => {
                let mut selected = Vec::new();
                self.for_selected(selector, |interpreter| {
                    if let Some(scope) = interpreter.peek_scope() {
                        selected.push(scope.clone());
                    }
                    None::<()>
                })?;
                if selected.is_empty() {
                    Ok(Item::absent())
                } else {
                    Ok(Item::Value(Record::of(selected).flattened()))
                }
            }
            Value::Operator(operator) => self.evaluate_operator(operator),
            _ => Ok(Item::Value(value.clone())),
        }
    }

    fn evaluate_record(&mut self, record: &Record) -> EvalResult {
        self.with_scope(record.clone(), |scoped| {
            let mut evaluated = Record::with_capacity(record.len());
            for item in record {
                let result = scoped.evaluate(item)?;
                if result.is_defined() {
                    evaluated.push(result)?;
                }
            }
            Ok(Item::from(evaluated))
        })
    }

    fn evaluate_operator(&mut self, operator: &Operator) -> EvalResult {
        match operator {
            Operator::Binary {
                op: BinaryOp::Or,
                lhs,
                rhs,
            } => {
                let lhs = self.evaluate(lhs)?;
                if lhs.is_truthy() {
                    Ok(lhs)
                } else {
                    self.evaluate(rhs)
                }
            }
            Operator::Binary {
                op: BinaryOp::And,
                lhs,
                rhs,
            } => {
                let lhs = self.evaluate(lhs)?;
                if lhs.is_truthy() {
                    self.evaluate(rhs)
                } else {
                    Ok(lhs)
                }
            }
            Operator::Binary { op, lhs, rhs } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                Ok(lhs.binary(*op, &rhs))
            }
            Operator::Unary { op, operand } => Ok(self.evaluate(operand)?.unary(*op)),
            Operator::Conditional {
                test,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(test)?.is_truthy() {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }
            Operator::Invoke { func, args } => {
                let func = self.evaluate_value(func)?;
                let args = self.evaluate_value(args)?;
                match func.value() {
                    Value::Lambda(lambda) => self.invoke(lambda, args.value()),
                    _ => Ok(Item::absent()),
                }
            }
        }
    }

    // Substitution

    /// Resolve every selector the current scopes can answer and fold the
    /// operators that become constant. Unresolved selectors stay in place,
    /// so the result may still need evaluating later.
    pub fn substitute(&mut self, item: &Item) -> EvalResult {
        ensure_sufficient_stack(|| match item {
            Item::Field(field) => {
                let value = self.substitute_value(field.value())?.into_value();
                Ok(Item::Field(field.updated_value(value)))
            }
            Item::Value(value) => self.substitute_value(value),
        })
    }

    fn substitute_value(&mut self, value: &Value) -> EvalResult {
        match value {
            Value::Selector(_) => {
                let selected = self.evaluate_value(value)?;
                if selected.is_defined() {
                    Ok(selected)
                } else {
                    Ok(Item::Value(value.clone()))
                }
            }
            Value::Operator(operator) => self.substitute_operator(operator),
            Value::Record(record) => self.with_scope(record.clone(), |scoped| {
                let items = record
                    .iter()
                    .map(|item| scoped.substitute(item))
                    .collect::<EvalResult<Vec<Item>>>()?;
                Ok(Item::from(Record::of(items)))
            }),
            _ => Ok(Item::Value(value.clone())),
        }
    }

    fn substitute_operator(&mut self, operator: &Operator) -> EvalResult {
        match operator {
            Operator::Binary { op, lhs, rhs } => {
                let lhs = self.substitute(lhs)?;
                let rhs = self.substitute(rhs)?;
                Ok(lhs.binary(*op, &rhs))
            }
            Operator::Unary { op, operand } => Ok(self.substitute(operand)?.unary(*op)),
            Operator::Conditional {
                test,
                then_branch,
                else_branch,
            } => {
                let test = self.substitute(test)?;
                let then_branch = self.substitute(then_branch)?;
                let else_branch = self.substitute(else_branch)?;
                Ok(test.conditional(&then_branch, &else_branch))
            }
            Operator::Invoke { func, args } => {
                let func = self.substitute_value(func)?.into_value();
                let args = self.substitute_value(args)?.into_value();
                match &func {
                    Value::Lambda(lambda) if args.is_constant() => self.invoke(lambda, &args),
                    _ => Ok(Item::from(Operator::invoke(func, args))),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
