//! Structural data model for Arbor.
//!
//! A tree of dynamic values built from [`Item`]s. An item is either a bare
//! [`Value`] or a keyed [`Field`]; the composite value is the [`Record`], an
//! ordered sequence of items with keyed access and copy-on-write sharing.
//!
//! # Values
//!
//! - `Absent` is the result of every failed lookup and is falsy.
//! - `Extant` is present but empty.
//! - `Bool`, [`Num`] and [`Text`] are scalars.
//! - `Record` nests.
//! - [`Selector`], [`Operator`] and [`LambdaFunc`] are expression nodes,
//!   evaluated by `arbor_eval`.
//!
//! # Errors
//!
//! Only hard failures return [`StructureError`]: mutating committed data,
//! out-of-range positions, foreign data of the wrong shape and unparsable
//! numbers. Misses and operators on mismatched kinds yield `Absent`.
//!
//! ```
//! use arbor_item::{Item, Record, Value};
//!
//! let mut record = Record::of([Item::attr("id", 1), Item::slot("name", "box")]);
//! assert_eq!(record.get("name"), &Value::from("box"));
//!
//! record.commit();
//! assert!(record.push(2).is_err());
//! ```

mod algebra;
mod cache;
mod convert;
mod display;
mod errors;
mod expr;
mod field;
mod flags;
mod interpolate;
mod item;
mod num;
mod record;
mod text;
mod value;

pub use cache::HashGenCacheSet;
pub use errors::{
    coercion_failed, immutable, index_out_of_bounds, parse_num_failed, range_out_of_bounds,
    StructureError, StructureErrorKind, StructureResult,
};
pub use expr::{BinaryOp, LambdaFunc, Operator, Selector, UnaryOp};
pub use field::{Field, FieldKind};
pub use flags::{FieldFlags, NumFlags, RecordFlags};
pub use interpolate::Interpolator;
pub use item::Item;
pub use num::{Num, EPSILON};
pub use record::{Record, RecordCursor, RecordView, RecordViewMut};
pub use text::Text;
pub use value::Value;
