//! RAII guards for the scope stack.
//!
//! [`ScopedInterpreter`] pushes a scope and pops it when dropped, even
//! during unwinding. [`UnscopedInterpreter`] does the reverse: it pops the
//! innermost scope, hands out mutable access to it, and pushes it back when
//! dropped. Write-back uses the latter to edit a record while its children
//! occupy the stack.
//!
//! Both guards implement `Deref`/`DerefMut` to [`Interpreter`], so the
//! guarded interpreter is used exactly like the plain one.
//!
//! ```text
//! interpreter.with_scope(record, |scoped| scoped.evaluate(item))
//! ```

use std::ops::{Deref, DerefMut};

use arbor_item::Item;

use super::Interpreter;
use crate::EvalResult;

/// Guard that pops the scope it pushed.
pub struct ScopedInterpreter<'i> {
    interpreter: &'i mut Interpreter,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        // The guard pushed this scope, so the stack is not empty.
        let _ = self.interpreter.pop_scope();
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

/// Guard that restores the scope it popped.
pub struct UnscopedInterpreter<'i> {
    interpreter: &'i mut Interpreter,
    scope: Item,
}

impl UnscopedInterpreter<'_> {
    /// The popped scope.
    pub fn scope(&self) -> &Item {
        &self.scope
    }

    /// The popped scope, for in-place edits that the guard will restore.
    pub fn scope_mut(&mut self) -> &mut Item {
        &mut self.scope
    }

    /// The interpreter and the popped scope, borrowed together.
    pub fn split(&mut self) -> (&mut Interpreter, &mut Item) {
        (&mut *self.interpreter, &mut self.scope)
    }
}

impl Drop for UnscopedInterpreter<'_> {
    fn drop(&mut self) {
        // Restoring a popped scope never exceeds the depth it came from.
        self.interpreter.scopes.push(std::mem::take(&mut self.scope));
    }
}

impl Deref for UnscopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for UnscopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Push `scope` and return a guard that pops it on drop.
    pub fn scoped(&mut self, scope: impl Into<Item>) -> EvalResult<ScopedInterpreter<'_>> {
        self.push_scope(scope)?;
        Ok(ScopedInterpreter { interpreter: self })
    }

    /// Run `f` with `scope` pushed. The scope is popped when `f` returns or
    /// unwinds.
    pub fn with_scope<T, F>(&mut self, scope: impl Into<Item>, f: F) -> EvalResult<T>
    where
        F: FnOnce(&mut ScopedInterpreter<'_>) -> EvalResult<T>,
    {
        let mut scoped = self.scoped(scope)?;
        f(&mut scoped)
    }

    /// Run `f` with `scope` pushed and return the scope as `f` left it.
    pub(crate) fn map_scope<F>(&mut self, scope: Item, f: F) -> EvalResult<Item>
    where
        F: FnOnce(&mut Interpreter) -> EvalResult<()>,
    {
        let mut scoped = self.scoped(scope)?;
        f(&mut *scoped)?;
        scoped.swap_scope(Item::absent())
    }

    /// Pop the innermost scope and return a guard that pushes it back on
    /// drop.
    pub fn unscoped(&mut self) -> EvalResult<UnscopedInterpreter<'_>> {
        let scope = self.pop_scope()?;
        Ok(UnscopedInterpreter {
            interpreter: self,
            scope,
        })
    }
}

#[cfg(test)]
mod tests;
