//! Dynamic values.
//!
//! [`Value`] is the non-field half of [`Item`](crate::Item): the scalar
//! kinds, records, and the expression nodes that evaluate to them.

use std::cmp::Ordering;

use crate::expr::{LambdaFunc, Operator, Selector};
use crate::{Num, Record, Text};

/// Shared `Absent` for lookups that return a reference.
pub(crate) static ABSENT: Value = Value::Absent;

/// A dynamic value.
///
/// Cloning is cheap: text and record storage are reference counted.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub enum Value {
    /// Nothing at all. Falsy, and the result of every failed lookup.
    #[default]
    Absent,
    /// Present but carrying no data.
    Extant,
    Bool(bool),
    Num(Num),
    Text(Text),
    Record(Record),
    Selector(Selector),
    Operator(Operator),
    Lambda(LambdaFunc),
}

impl Value {
    /// Rank of the variant in the cross-kind total order.
    pub fn type_order(&self) -> u8 {
        match self {
            Value::Record(_) => 3,
            Value::Text(_) => 5,
            Value::Num(_) => 6,
            Value::Bool(_) => 7,
            Value::Selector(_) => 10,
            Value::Operator(_) => 20,
            Value::Lambda(_) => 50,
            Value::Extant => 98,
            Value::Absent => 99,
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Extant => "extant",
            Value::Bool(_) => "bool",
            Value::Num(_) => "num",
            Value::Text(_) => "text",
            Value::Record(_) => "record",
            Value::Selector(_) => "selector",
            Value::Operator(_) => "operator",
            Value::Lambda(_) => "lambda",
        }
    }

    /// False only for `Absent`.
    #[inline]
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Absent)
    }

    /// False for `Absent` and `Extant`.
    #[inline]
    pub fn is_distinct(&self) -> bool {
        !matches!(self, Value::Absent | Value::Extant)
    }

    /// Distinct, and for records, holding at least one definite member.
    pub fn is_definite(&self) -> bool {
        match self {
            Value::Absent | Value::Extant => false,
            Value::Record(record) => record.iter().any(crate::Item::is_definite),
            _ => true,
        }
    }

    /// False for expression nodes and records that contain them.
    pub fn is_constant(&self) -> bool {
        match self {
            Value::Selector(_) | Value::Operator(_) | Value::Lambda(_) => false,
            Value::Record(record) => record.iter().all(crate::Item::is_constant),
            _ => true,
        }
    }

    /// `Absent` and `false` are falsy; everything else is truthy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Absent | Value::Bool(false))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<Num> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_text().map(Text::as_str)
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_selector(&self) -> Option<&Selector> {
        match self {
            Value::Selector(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            Value::Operator(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&LambdaFunc> {
        match self {
            Value::Lambda(l) => Some(l),
            _ => None,
        }
    }

    /// View as a record: records as themselves, `Absent` as an empty
    /// record, anything else as a one-item record.
    pub fn unflattened(&self) -> Record {
        match self {
            Value::Record(r) => r.clone(),
            Value::Absent => Record::new(),
            other => Record::of([crate::Item::Value(other.clone())]),
        }
    }

    /// Commit nested record storage. Scalars are already immutable.
    pub fn commit(&mut self) -> &mut Self {
        if let Value::Record(record) = self {
            record.commit();
        }
        self
    }

    /// Mark nested record storage as shared.
    pub fn alias(&mut self) {
        if let Value::Record(record) = self {
            record.alias();
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Num(a), Value::Num(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Record(a), Value::Record(b)) => a.cmp(b),
            (Value::Selector(a), Value::Selector(b)) => a.cmp(b),
            (Value::Operator(a), Value::Operator(b)) => a.cmp(b),
            (Value::Lambda(a), Value::Lambda(b)) => a.cmp(b),
            _ => self.type_order().cmp(&other.type_order()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! value_from_num {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Num(Num::from(n))
                }
            }
        )*
    };
}

value_from_num!(f64, f32, i32, i64, u32, u64, usize);

impl From<Num> for Value {
    fn from(n: Num) -> Self {
        Value::Num(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(Text::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(Text::from(s))
    }
}

impl From<Text> for Value {
    fn from(t: Text) -> Self {
        Value::Text(t)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Selector> for Value {
    fn from(s: Selector) -> Self {
        Value::Selector(s)
    }
}

impl From<Operator> for Value {
    fn from(o: Operator) -> Self {
        Value::Operator(o)
    }
}

impl From<LambdaFunc> for Value {
    fn from(l: LambdaFunc) -> Self {
        Value::Lambda(l)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Absent, Into::into)
    }
}
