//! Error constructors for the evaluator.
//!
//! Evaluation itself is total: unresolved selectors and mismatched
//! operands produce `Absent`. Errors report misuse of the scope stack and
//! structural failures raised while writing selections back.

use arbor_item::StructureError;
use thiserror::Error;

/// Result of an evaluation step. Defaults to producing an item.
pub type EvalResult<T = arbor_item::Item> = Result<T, EvalError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    /// `pop_scope` or `swap_scope` on an empty stack.
    #[error("scope stack underflow")]
    ScopeUnderflow,
    /// `push_scope` past the configured depth.
    #[error("scope stack overflow: more than {limit} scopes")]
    ScopeOverflow { limit: usize },
    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct EvalError {
    kind: EvalErrorKind,
}

impl EvalError {
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError { kind }
    }

    pub fn kind(&self) -> &EvalErrorKind {
        &self.kind
    }
}

impl From<StructureError> for EvalError {
    fn from(error: StructureError) -> Self {
        EvalError::from_kind(EvalErrorKind::Structure(error))
    }
}

#[cold]
pub fn scope_underflow() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ScopeUnderflow)
}

#[cold]
pub fn scope_overflow(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ScopeOverflow { limit })
}
