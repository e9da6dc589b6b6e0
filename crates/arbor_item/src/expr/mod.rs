//! Expression nodes: selectors, operators and lambdas.
//!
//! These are plain data. Evaluation lives in `arbor_eval`; the value
//! algebra builds [`Operator`] nodes whenever an operand is not constant.

mod lambda;
mod operator;
mod selector;

pub use lambda::LambdaFunc;
pub use operator::{BinaryOp, Operator, UnaryOp};
pub use selector::Selector;
