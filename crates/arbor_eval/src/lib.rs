//! Arbor Eval - selector and expression evaluator over Arbor items.
//!
//! # Architecture
//!
//! - [`Interpreter`]: a stack of scopes plus the evaluation entry points
//!   (`evaluate`, `substitute`, `for_selected`, `map_selected`, `invoke`).
//! - [`ScopedInterpreter`] / [`UnscopedInterpreter`]: RAII guards that
//!   keep the scope stack balanced on every exit path.
//! - [`InterpreterBuilder`]: settings and initial scopes.
//!
//! Operators, selectors and lambdas are plain data from `arbor_item`;
//! this crate only walks them.
//!
//! ```
//! use arbor_eval::Interpreter;
//! use arbor_item::{Item, Record, Selector};
//!
//! let users = Record::of([
//!     Item::from(Record::of([Item::attr("id", 1), Item::slot("name", "ada")])),
//!     Item::from(Record::of([Item::attr("id", 2), Item::slot("name", "bob")])),
//! ]);
//! let mut interpreter = Interpreter::from_scope(Record::of([Item::slot("users", users)]));
//! let ids = Selector::identity().get("users").values().get_attr("id");
//! assert_eq!(
//!     interpreter.evaluate(&Item::from(ids)).unwrap(),
//!     Item::from(Record::of([1, 2]))
//! );
//! ```

pub mod errors;
pub mod interpreter;
mod lambda;
mod select;

use std::sync::Once;

pub use errors::{scope_overflow, scope_underflow, EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{
    Interpreter, InterpreterBuilder, InterpreterSettings, ScopedInterpreter, UnscopedInterpreter,
};
pub use lambda::Invoke;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=arbor_eval=debug` or `RUST_LOG=arbor_item=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
