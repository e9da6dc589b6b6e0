//! `InterpreterBuilder` for creating interpreters with custom settings.

use arbor_item::Item;

use super::Interpreter;
use crate::EvalResult;

/// Tunables for an [`Interpreter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterpreterSettings {
    /// Deepest the scope stack may grow. Records nest one scope per level,
    /// and every lambda call adds one.
    pub max_scope_depth: usize,
}

impl InterpreterSettings {
    pub const DEFAULT_MAX_SCOPE_DEPTH: usize = 512;
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        InterpreterSettings {
            max_scope_depth: Self::DEFAULT_MAX_SCOPE_DEPTH,
        }
    }
}

/// Builder for [`Interpreter`].
///
/// ```
/// use arbor_eval::Interpreter;
/// use arbor_item::{Item, Record};
///
/// let interpreter = Interpreter::builder()
///     .max_scope_depth(16)
///     .scope(Record::of([Item::slot("x", 1)]))
///     .build()
///     .unwrap();
/// assert_eq!(interpreter.scope_depth(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InterpreterBuilder {
    settings: InterpreterSettings,
    scopes: Vec<Item>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all settings at once.
    #[must_use]
    pub fn settings(mut self, settings: InterpreterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Limit the scope stack. Clamped to at least one scope.
    #[must_use]
    pub fn max_scope_depth(mut self, depth: usize) -> Self {
        self.settings.max_scope_depth = depth.max(1);
        self
    }

    /// Push an initial scope. Later calls nest inside earlier ones.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<Item>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Build the interpreter, pushing the initial scopes in order.
    ///
    /// Fails if there are more initial scopes than the depth limit allows.
    pub fn build(self) -> EvalResult<Interpreter> {
        let mut interpreter = Interpreter::with_settings(self.settings);
        for scope in self.scopes {
            interpreter.push_scope(scope)?;
        }
        Ok(interpreter)
    }
}
