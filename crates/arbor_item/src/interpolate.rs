//! Interpolation between two items.
//!
//! A thin bridge for animation code: numbers interpolate linearly, fields
//! interpolate their values, records of equal length interpolate pairwise,
//! and anything else steps from one item to the other at `u = 1`.

use crate::{Field, Item, Num, Record, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum Interpolator {
    Num { from: Num, to: Num },
    Field {
        from: Field,
        to: Field,
        value: Box<Interpolator>,
    },
    Record(Vec<Interpolator>),
    Step { from: Item, to: Item },
}

impl Interpolator {
    /// The item at `u`, where `0` is the start and `1` the end.
    pub fn interpolate(&self, u: f64) -> Item {
        match self {
            Interpolator::Num { from, to } => Item::Value(Value::Num(from.lerp(*to, u))),
            Interpolator::Field { from, to, value } => {
                let base = if u < 1.0 { from } else { to };
                Item::Field(base.updated_value(value.interpolate(u).into_value()))
            }
            Interpolator::Record(parts) => {
                Item::Value(Value::Record(Record::of(parts.iter().map(|p| p.interpolate(u)))))
            }
            Interpolator::Step { from, to } => {
                if u < 1.0 {
                    from.clone()
                } else {
                    to.clone()
                }
            }
        }
    }
}

fn value_interpolator(from: &Value, to: &Value) -> Interpolator {
    match (from, to) {
        (Value::Num(a), Value::Num(b)) => Interpolator::Num { from: *a, to: *b },
        (Value::Record(a), Value::Record(b)) if a.len() == b.len() => Interpolator::Record(
            a.iter()
                .zip(b.iter())
                .map(|(x, y)| x.interpolate_to(y))
                .collect(),
        ),
        _ => Interpolator::Step {
            from: Item::Value(from.clone()),
            to: Item::Value(to.clone()),
        },
    }
}

impl Item {
    pub fn interpolate_to(&self, that: &Item) -> Interpolator {
        match (self, that) {
            (Item::Field(a), Item::Field(b)) => Interpolator::Field {
                from: a.clone(),
                to: b.clone(),
                value: Box::new(value_interpolator(a.value(), b.value())),
            },
            (Item::Value(a), Item::Value(b)) => value_interpolator(a, b),
            _ => Interpolator::Step {
                from: self.clone(),
                to: that.clone(),
            },
        }
    }
}
