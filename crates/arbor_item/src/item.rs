//! The tree node type.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::expr::{LambdaFunc, Operator, Selector};
use crate::value::ABSENT;
use crate::{Field, FieldKind, Num, Record, Text, Value};

/// Shared absent item for lookups that return a reference.
pub(crate) static ABSENT_ITEM: Item = Item::Value(Value::Absent);

/// Any node in a structural tree: a keyed [`Field`] or a bare [`Value`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Field(Field),
    Value(Value),
}

impl Item {
    pub fn attr(key: impl Into<Text>, value: impl Into<Value>) -> Item {
        Item::Field(Field::attr(key, value))
    }

    pub fn slot(key: impl Into<Value>, value: impl Into<Value>) -> Item {
        Item::Field(Field::slot(key, value))
    }

    pub fn absent() -> Item {
        Item::Value(Value::Absent)
    }

    pub fn extant() -> Item {
        Item::Value(Value::Extant)
    }

    /// The field key, or `Absent` for bare values.
    pub fn key(&self) -> &Value {
        match self {
            Item::Field(field) => field.key(),
            Item::Value(_) => &ABSENT,
        }
    }

    /// The field value, or the value itself.
    pub fn value(&self) -> &Value {
        match self {
            Item::Field(field) => field.value(),
            Item::Value(value) => value,
        }
    }

    pub fn to_value(&self) -> Value {
        self.value().clone()
    }

    pub fn into_value(self) -> Value {
        match self {
            Item::Field(field) => field.into_value(),
            Item::Value(value) => value,
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Item::Field(field) => Some(field),
            Item::Value(_) => None,
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Item::Field(_))
    }

    pub fn is_attr(&self) -> bool {
        matches!(self, Item::Field(f) if f.is_attr())
    }

    pub fn is_slot(&self) -> bool {
        matches!(self, Item::Field(f) if f.is_slot())
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Item::Value(_))
    }

    pub fn is_defined(&self) -> bool {
        match self {
            Item::Field(_) => true,
            Item::Value(v) => v.is_defined(),
        }
    }

    pub fn is_distinct(&self) -> bool {
        match self {
            Item::Field(_) => true,
            Item::Value(v) => v.is_distinct(),
        }
    }

    pub fn is_definite(&self) -> bool {
        match self {
            Item::Field(_) => true,
            Item::Value(v) => v.is_definite(),
        }
    }

    pub fn is_constant(&self) -> bool {
        match self {
            Item::Field(f) => f.is_constant(),
            Item::Value(v) => v.is_constant(),
        }
    }

    /// Fields are truthy; values follow [`Value::is_truthy`].
    pub fn is_truthy(&self) -> bool {
        match self {
            Item::Field(_) => true,
            Item::Value(v) => v.is_truthy(),
        }
    }

    pub fn type_order(&self) -> u8 {
        match self {
            Item::Field(f) => match f.kind() {
                FieldKind::Attr => 1,
                FieldKind::Slot => 2,
            },
            Item::Value(v) => v.type_order(),
        }
    }

    /// Stable 64-bit hash, consistent with `Eq`.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Structural equality with numbers compared within `epsilon`.
    pub fn equivalent_to(&self, that: &Item, epsilon: f64) -> bool {
        match (self, that) {
            (Item::Field(a), Item::Field(b)) => {
                a.kind() == b.kind()
                    && a.key() == b.key()
                    && values_equivalent(a.value(), b.value(), epsilon)
            }
            (Item::Value(a), Item::Value(b)) => values_equivalent(a, b, epsilon),
            _ => false,
        }
    }

    pub fn commit(&mut self) -> &mut Self {
        match self {
            Item::Field(f) => {
                f.commit();
            }
            Item::Value(v) => {
                v.commit();
            }
        }
        self
    }

    pub fn alias(&mut self) {
        match self {
            Item::Field(f) => f.alias(),
            Item::Value(v) => v.alias(),
        }
    }
}

fn values_equivalent(a: &Value, b: &Value, epsilon: f64) -> bool {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => x.equivalent_to(*y, epsilon),
        (Value::Record(x), Value::Record(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|(i, j)| i.equivalent_to(j, epsilon))
        }
        _ => a == b,
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Item::Field(a), Item::Field(b)) => a.cmp(b),
            (Item::Value(a), Item::Value(b)) => a.cmp(b),
            _ => self.type_order().cmp(&other.type_order()),
        }
    }
}

impl Default for Item {
    fn default() -> Self {
        Item::absent()
    }
}

impl From<Field> for Item {
    fn from(field: Field) -> Self {
        Item::Field(field)
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::Value(value)
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Value(Value::from(s))
    }
}

macro_rules! item_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Item {
                fn from(v: $t) -> Self {
                    Item::Value(Value::from(v))
                }
            }
        )*
    };
}

item_from_value!(
    bool, f64, f32, i32, i64, u32, u64, usize, Num, String, Text, Record, Selector, Operator,
    LambdaFunc
);

#[cfg(test)]
mod tests;
