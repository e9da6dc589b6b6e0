use crate::Value;

/// An anonymous function: parameter bindings and a template to evaluate.
///
/// `bindings` is a single parameter (a text name, or a slot whose value is
/// the default) or a record of them. Arity is never enforced at call time.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LambdaFunc {
    bindings: Box<Value>,
    template: Box<Value>,
}

impl LambdaFunc {
    pub fn new(bindings: impl Into<Value>, template: impl Into<Value>) -> LambdaFunc {
        LambdaFunc {
            bindings: Box::new(bindings.into()),
            template: Box::new(template.into()),
        }
    }

    pub fn bindings(&self) -> &Value {
        &self.bindings
    }

    pub fn template(&self) -> &Value {
        &self.template
    }

    /// Declared parameter count, at least one.
    pub fn arity(&self) -> usize {
        match &*self.bindings {
            Value::Record(params) => params.len().max(1),
            _ => 1,
        }
    }
}
