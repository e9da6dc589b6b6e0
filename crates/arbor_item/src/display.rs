//! `Debug` and `Display` for the structural model.
//!
//! `Debug` prints the Rust expression that rebuilds a value, e.g.
//! `Record::of([Item::attr("a", 1.0), Item::from(2.0)])`. `Display` prints a
//! compact human-readable form: `{@a: 1, 2}`.

use std::fmt::{self, Debug, Display, Formatter, Write};

use crate::expr::{LambdaFunc, Operator, Selector};
use crate::{Field, FieldKind, Item, Num, Record, Text, Value};

// Debug

impl Debug for Num {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let v = self.value();
        if self.is_uint32() {
            write!(f, "Num::uint32({v})")
        } else if self.is_uint64() {
            write!(f, "Num::uint64({v})")
        } else if v.is_nan() {
            f.write_str("Num::NAN")
        } else if v.is_infinite() {
            let sign = if v < 0.0 { "-" } else { "" };
            write!(f, "Num::from({sign}f64::INFINITY)")
        } else {
            write!(f, "Num::from({v:?})")
        }
    }
}

/// A value as a constructor argument: literals where `From` accepts them.
struct Arg<'a>(&'a Value);

impl Debug for Arg<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Num(n) if !n.is_uint32() && !n.is_uint64() && n.value().is_finite() => {
                write!(f, "{:?}", n.value())
            }
            Value::Num(n) => write!(f, "{n:?}"),
            Value::Text(t) => write!(f, "{t:?}"),
            Value::Record(r) => write!(f, "{r:?}"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("Value::Absent"),
            Value::Extant => f.write_str("Value::Extant"),
            Value::Bool(_) | Value::Num(_) | Value::Text(_) => {
                write!(f, "Value::from({:?})", Arg(self))
            }
            Value::Record(r) => write!(f, "Value::from({r:?})"),
            Value::Selector(s) => write!(f, "Value::Selector({s:?})"),
            Value::Operator(o) => write!(f, "Value::Operator({o:?})"),
            Value::Lambda(l) => write!(f, "Value::Lambda({l:?})"),
        }
    }
}

impl Debug for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind() {
            FieldKind::Attr => write!(
                f,
                "Field::attr({:?}, {:?})",
                Arg(self.key()),
                Arg(self.value())
            ),
            FieldKind::Slot => write!(
                f,
                "Field::slot({:?}, {:?})",
                Arg(self.key()),
                Arg(self.value())
            ),
        }
    }
}

impl Debug for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Item::Field(field) => {
                let ctor = match field.kind() {
                    FieldKind::Attr => "attr",
                    FieldKind::Slot => "slot",
                };
                write!(
                    f,
                    "Item::{ctor}({:?}, {:?})",
                    Arg(field.key()),
                    Arg(field.value())
                )
            }
            Item::Value(Value::Absent) => f.write_str("Item::absent()"),
            Item::Value(Value::Extant) => f.write_str("Item::extant()"),
            Item::Value(value) => write!(f, "Item::from({:?})", Arg(value)),
        }
    }
}

impl Debug for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Record::of([")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item:?}")?;
        }
        f.write_str("])")
    }
}

impl Debug for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut step = self;
        match step {
            Selector::Literal { item, then } => {
                write!(f, "Selector::literal({item:?})")?;
                step = then.as_ref();
            }
            _ => f.write_str("Selector::identity()")?,
        }
        loop {
            match step {
                Selector::Identity => return Ok(()),
                Selector::Get { key, .. } => write!(f, ".get({:?})", Arg(key))?,
                Selector::GetAttr { key, .. } => write!(f, ".get_attr({key:?})")?,
                Selector::GetItem { index, .. } => write!(f, ".get_item({index:?})")?,
                Selector::Keys { .. } => f.write_str(".keys()")?,
                Selector::Values { .. } => f.write_str(".values()")?,
                Selector::Children { .. } => f.write_str(".children()")?,
                Selector::Descendants { .. } => f.write_str(".descendants()")?,
                Selector::Filter { predicate, .. } => write!(f, ".filter({:?})", Arg(predicate))?,
                Selector::Literal { item, .. } => {
                    write!(f, ".and_then(Selector::literal({item:?}))")?;
                }
            }
            match step.then() {
                Some(next) => step = next,
                None => return Ok(()),
            }
        }
    }
}

impl Debug for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Binary { op, lhs, rhs } => {
                write!(f, "Operator::binary(BinaryOp::{op:?}, {lhs:?}, {rhs:?})")
            }
            Operator::Unary { op, operand } => {
                write!(f, "Operator::unary(UnaryOp::{op:?}, {operand:?})")
            }
            Operator::Conditional {
                test,
                then_branch,
                else_branch,
            } => write!(
                f,
                "Operator::conditional({test:?}, {then_branch:?}, {else_branch:?})"
            ),
            Operator::Invoke { func, args } => {
                write!(f, "Operator::invoke({:?}, {:?})", Arg(func), Arg(args))
            }
        }
    }
}

impl Debug for LambdaFunc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LambdaFunc::new({:?}, {:?})",
            Arg(self.bindings()),
            Arg(self.template())
        )
    }
}

// Display

impl Display for Num {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let v = self.value();
        if v.is_nan() {
            f.write_str("NaN")
        } else if v.is_infinite() {
            f.write_str(if v < 0.0 { "-Infinity" } else { "Infinity" })
        } else {
            write!(f, "{v}")
        }
    }
}

/// Keys print bare when they are identifiers.
fn write_key(f: &mut Formatter<'_>, key: &Value) -> fmt::Result {
    match key {
        Value::Text(text) if text.is_ident() => f.write_str(text),
        other => write!(f, "{other}"),
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("undefined"),
            Value::Extant => f.write_str("extant"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Num(n) => write!(f, "{n}"),
            Value::Text(t) => write!(f, "{t:?}"),
            Value::Record(r) => write!(f, "{r}"),
            Value::Selector(s) => write!(f, "{s}"),
            Value::Operator(o) => write!(f, "{o}"),
            Value::Lambda(l) => write!(f, "{l}"),
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_attr() {
            f.write_char('@')?;
        }
        write_key(f, self.key())?;
        match self.value() {
            Value::Extant if self.is_attr() => Ok(()),
            value => write!(f, ": {value}"),
        }
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Item::Field(field) => write!(f, "{field}"),
            Item::Value(value) => write!(f, "{value}"),
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_char('}')
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('$')?;
        let mut step = self;
        let mut first = true;
        loop {
            let sep = if first { "" } else { "." };
            match step {
                Selector::Identity => return Ok(()),
                Selector::Get { key, .. } => {
                    f.write_str(sep)?;
                    write_key(f, key)?;
                }
                Selector::GetAttr { key, .. } => {
                    f.write_str(sep)?;
                    f.write_char('@')?;
                    write_key(f, &Value::Text(Text::clone(key)))?;
                }
                Selector::GetItem { index, .. } => write!(f, "[{index}]")?,
                Selector::Keys { .. } => write!(f, "{sep}*:")?,
                Selector::Values { .. } => write!(f, "{sep}:*")?,
                Selector::Children { .. } => write!(f, "{sep}*")?,
                Selector::Descendants { .. } => write!(f, "{sep}**")?,
                Selector::Filter { predicate, .. } => write!(f, "[{predicate}]")?,
                Selector::Literal { item, .. } => write!(f, "({item})")?,
            }
            first = false;
            match step.then() {
                Some(next) => step = next,
                None => return Ok(()),
            }
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Binary { op, lhs, rhs } => {
                write!(f, "({lhs} {} {rhs})", op.as_symbol())
            }
            Operator::Unary { op, operand } => write!(f, "{}{operand}", op.as_symbol()),
            Operator::Conditional {
                test,
                then_branch,
                else_branch,
            } => write!(f, "({test} ? {then_branch} : {else_branch})"),
            Operator::Invoke { func, args } => write!(f, "{func}({args})"),
        }
    }
}

impl Display for LambdaFunc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.bindings() {
            Value::Text(name) => write!(f, "{name} => {}", self.template()),
            bindings => write!(f, "{bindings} => {}", self.template()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::BinaryOp;
    use pretty_assertions::assert_eq;

    #[test]
    fn debug_prints_constructors() {
        let record = Record::of([Item::attr("a", 1), Item::slot("b", "x"), Item::from(true)]);
        assert_eq!(
            format!("{record:?}"),
            r#"Record::of([Item::attr("a", 1.0), Item::slot("b", "x"), Item::from(true)])"#
        );
        assert_eq!(format!("{:?}", Value::Absent), "Value::Absent");
        assert_eq!(format!("{:?}", Num::uint32(5)), "Num::uint32(5)");
        assert_eq!(format!("{:?}", Num::NAN), "Num::NAN");
        assert_eq!(format!("{:?}", Item::from(-0.0)), "Item::from(-0.0)");
        assert_eq!(format!("{:?}", Item::absent()), "Item::absent()");
    }

    #[test]
    fn display_is_compact() {
        let record = Record::of([
            Item::attr("tag", Value::Extant),
            Item::attr("a", 1),
            Item::slot("b", 2.5),
            Item::slot("two words", "x"),
            Item::from(3),
        ]);
        assert_eq!(
            record.to_string(),
            r#"{@tag, @a: 1, b: 2.5, "two words": "x", 3}"#
        );
        assert_eq!(Value::Absent.to_string(), "undefined");
        assert_eq!(Num::from(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Num::NEGATIVE_ZERO.to_string(), "-0");
    }

    #[test]
    fn selectors_and_operators() {
        assert_eq!(Selector::identity().to_string(), "$");
        assert_eq!(Selector::identity().get_attr("a").to_string(), "$@a");
        assert_eq!(Selector::identity().get("a").get("b").to_string(), "$a.b");
        assert_eq!(Selector::identity().get("a").get_item(0).to_string(), "$a[0]");
        assert_eq!(Selector::identity().descendants().to_string(), "$**");

        let sum = Operator::binary(BinaryOp::Plus, Selector::identity().get("x"), 1);
        assert_eq!(sum.to_string(), "($x + 1)");
        let lambda = LambdaFunc::new("x", Value::from(sum));
        assert_eq!(lambda.to_string(), "x => ($x + 1)");
    }

    #[test]
    fn debug_prints_builder_chains() {
        let selector = Selector::identity().get("a").get_attr("id").children();
        assert_eq!(
            format!("{selector:?}"),
            r#"Selector::identity().get("a").get_attr("id").children()"#
        );
        assert_eq!(format!("{:?}", Selector::identity()), "Selector::identity()");
        assert_eq!(
            format!("{:?}", Selector::literal(1).get_item(0)),
            "Selector::literal(Item::from(1.0)).get_item(Num::from(0.0))"
        );

        let sum = Operator::binary(BinaryOp::Plus, Selector::identity().get("x"), 1);
        assert_eq!(
            format!("{sum:?}"),
            r#"Operator::binary(BinaryOp::Plus, Item::from(Value::Selector(Selector::identity().get("x"))), Item::from(1.0))"#
        );
        let lambda = LambdaFunc::new("x", Selector::identity().get("x"));
        assert_eq!(
            format!("{lambda:?}"),
            r#"LambdaFunc::new("x", Value::Selector(Selector::identity().get("x")))"#
        );
    }
}
