//! Lambda invocation.
//!
//! Arguments bind by position. Binding is permissive: a missing argument
//! falls back to the parameter's default, or is left unbound so lookups
//! of it yield `Absent`, and excess arguments are ignored.

use arbor_item::{Item, LambdaFunc, Record, Value};
use tracing::debug;

use crate::{EvalResult, Interpreter};

/// Calling a lambda against an interpreter.
pub trait Invoke {
    /// Bind `args` and evaluate the template in a new parameter scope.
    fn invoke(&self, args: &Value, interpreter: &mut Interpreter) -> EvalResult;
}

impl Invoke for LambdaFunc {
    fn invoke(&self, args: &Value, interpreter: &mut Interpreter) -> EvalResult {
        interpreter.invoke(self, args)
    }
}

/// The parameter declarations of `bindings`.
fn parameters(bindings: &Value) -> Vec<Item> {
    match bindings {
        Value::Record(params) => params.iter().cloned().collect(),
        param => vec![Item::Value(param.clone())],
    }
}

/// Positional arguments. A record spreads into its values only when
/// there is more than one parameter to receive them.
fn arguments(args: &Value, arity: usize) -> Vec<Value> {
    match args {
        Value::Record(record) if arity > 1 => record.values().cloned().collect(),
        arg => vec![arg.clone()],
    }
}

/// Bind each parameter to its argument.
///
/// A text parameter names a slot. A field parameter names a slot by its
/// key and holds the default value. Anything else binds nothing.
fn bind(parameters: &[Item], arguments: &[Value]) -> EvalResult<Record> {
    let mut scope = Record::with_capacity(parameters.len());
    for (i, param) in parameters.iter().enumerate() {
        let arg = arguments.get(i).filter(|arg| arg.is_defined());
        match param {
            Item::Value(Value::Text(name)) => {
                if let Some(arg) = arg {
                    scope.push(Item::slot(name.clone(), arg.clone()))?;
                }
            }
            Item::Field(field) => {
                let value = arg.unwrap_or(field.value());
                scope.push(Item::slot(field.key().clone(), value.clone()))?;
            }
            Item::Value(_) => {}
        }
    }
    Ok(scope)
}

impl Interpreter {
    /// Invoke `lambda` with `args`.
    ///
    /// ```
    /// use arbor_eval::Interpreter;
    /// use arbor_item::{Item, LambdaFunc, Selector, Value};
    ///
    /// let double = LambdaFunc::new(
    ///     "x",
    ///     Item::from(Selector::identity().get("x")).times(&Item::from(2)).into_value(),
    /// );
    /// let mut interpreter = Interpreter::new();
    /// assert_eq!(interpreter.invoke(&double, &Value::from(21)).unwrap(), Item::from(42));
    /// ```
    pub fn invoke(&mut self, lambda: &LambdaFunc, args: &Value) -> EvalResult {
        let parameters = parameters(lambda.bindings());
        let arguments = arguments(args, parameters.len());
        let scope = bind(&parameters, &arguments)?;
        debug!(
            arity = lambda.arity(),
            args = arguments.len(),
            "invoking lambda"
        );
        self.with_scope(scope, |scoped| scoped.evaluate_value(lambda.template()))
    }
}
