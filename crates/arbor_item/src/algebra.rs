//! Operators over items and values.
//!
//! Every operator is total. Operand kinds without a meaning for the
//! operator produce `Absent`; any non-constant operand (a selector, an
//! operator or a lambda) produces an [`Operator`] node to be evaluated
//! later. Comparisons use the cross-kind total order and always yield a
//! `Bool`.

use crate::expr::{BinaryOp, Operator, UnaryOp};
use crate::{Item, Num, Value};

impl Value {
    /// Apply a binary operator.
    pub fn binary(&self, op: BinaryOp, that: &Value) -> Value {
        if !self.is_constant() || !that.is_constant() {
            return Value::Operator(Operator::binary(op, self.clone(), that.clone()));
        }
        match op {
            BinaryOp::Or => {
                if self.is_truthy() {
                    self.clone()
                } else {
                    that.clone()
                }
            }
            BinaryOp::And => {
                if self.is_truthy() {
                    that.clone()
                } else {
                    self.clone()
                }
            }
            BinaryOp::Lt => Value::Bool(self < that),
            BinaryOp::Le => Value::Bool(self <= that),
            BinaryOp::Eq => Value::Bool(self == that),
            BinaryOp::Ne => Value::Bool(self != that),
            BinaryOp::Ge => Value::Bool(self >= that),
            BinaryOp::Gt => Value::Bool(self > that),
            BinaryOp::Plus => match (self, that) {
                (Value::Num(a), Value::Num(b)) => Value::Num(a.plus(*b)),
                (Value::Text(a), Value::Text(b)) => Value::Text(a.concat(b)),
                _ => Value::Absent,
            },
            BinaryOp::Minus => num_op(self, that, Num::minus),
            BinaryOp::Times => num_op(self, that, Num::times),
            BinaryOp::Divide => num_op(self, that, Num::divide),
            BinaryOp::Modulo => num_op(self, that, Num::modulo),
            BinaryOp::BitwiseOr => bit_op(self, that, Num::bitwise_or, |a, b| a | b),
            BinaryOp::BitwiseXor => bit_op(self, that, Num::bitwise_xor, |a, b| a ^ b),
            BinaryOp::BitwiseAnd => bit_op(self, that, Num::bitwise_and, |a, b| a & b),
        }
    }

    /// Apply a unary operator.
    pub fn unary(&self, op: UnaryOp) -> Value {
        if !self.is_constant() {
            return Value::Operator(Operator::unary(op, self.clone()));
        }
        match (op, self) {
            (UnaryOp::Not, value) => Value::Bool(!value.is_truthy()),
            (UnaryOp::BitwiseNot, Value::Num(n)) => Value::Num(n.bitwise_not()),
            (UnaryOp::BitwiseNot, Value::Bool(b)) => Value::Bool(!b),
            (UnaryOp::Negative, Value::Num(n)) => Value::Num(n.negative()),
            (UnaryOp::Positive, Value::Num(n)) => Value::Num(n.positive()),
            (UnaryOp::Inverse, Value::Num(n)) => Value::Num(n.inverse()),
            _ => Value::Absent,
        }
    }

    /// `then_branch` if this value is truthy, else `else_branch`.
    pub fn conditional(&self, then_branch: &Value, else_branch: &Value) -> Value {
        if !self.is_constant() {
            return Value::Operator(Operator::conditional(
                self.clone(),
                then_branch.clone(),
                else_branch.clone(),
            ));
        }
        if self.is_truthy() {
            then_branch.clone()
        } else {
            else_branch.clone()
        }
    }
}

fn num_op(a: &Value, b: &Value, f: fn(Num, Num) -> Num) -> Value {
    match (a, b) {
        (Value::Num(a), Value::Num(b)) => Value::Num(f(*a, *b)),
        _ => Value::Absent,
    }
}

fn bit_op(a: &Value, b: &Value, num: fn(Num, Num) -> Num, logic: fn(bool, bool) -> bool) -> Value {
    match (a, b) {
        (Value::Num(a), Value::Num(b)) => Value::Num(num(*a, *b)),
        (Value::Bool(a), Value::Bool(b)) => Value::Bool(logic(*a, *b)),
        _ => Value::Absent,
    }
}

impl Item {
    /// Apply a binary operator.
    ///
    /// Comparisons and the logical operators treat items whole. Arithmetic
    /// and bitwise operators work on values; a field on the left keeps its
    /// key and kind around the result.
    pub fn binary(&self, op: BinaryOp, that: &Item) -> Item {
        if !self.is_constant() || !that.is_constant() {
            return Item::Value(Value::Operator(Operator::binary(
                op,
                self.clone(),
                that.clone(),
            )));
        }
        match op {
            BinaryOp::Or => {
                if self.is_truthy() {
                    self.clone()
                } else {
                    that.clone()
                }
            }
            BinaryOp::And => {
                if self.is_truthy() {
                    that.clone()
                } else {
                    self.clone()
                }
            }
            BinaryOp::Lt => Item::from(self < that),
            BinaryOp::Le => Item::from(self <= that),
            BinaryOp::Eq => Item::from(self == that),
            BinaryOp::Ne => Item::from(self != that),
            BinaryOp::Ge => Item::from(self >= that),
            BinaryOp::Gt => Item::from(self > that),
            _ => {
                let result = self.value().binary(op, that.value());
                match self {
                    Item::Field(field) => Item::Field(field.updated_value(result)),
                    Item::Value(_) => Item::Value(result),
                }
            }
        }
    }

    /// Apply a unary operator. `!` treats the item whole; the others work
    /// on its value and keep a field's key.
    pub fn unary(&self, op: UnaryOp) -> Item {
        if !self.is_constant() {
            return Item::Value(Value::Operator(Operator::unary(op, self.clone())));
        }
        if op == UnaryOp::Not {
            return Item::from(!self.is_truthy());
        }
        let result = self.value().unary(op);
        match self {
            Item::Field(field) => Item::Field(field.updated_value(result)),
            Item::Value(_) => Item::Value(result),
        }
    }

    /// `then_branch` if this item is truthy, else `else_branch`.
    pub fn conditional(&self, then_branch: &Item, else_branch: &Item) -> Item {
        if !self.is_constant() {
            return Item::Value(Value::Operator(Operator::conditional(
                self.clone(),
                then_branch.clone(),
                else_branch.clone(),
            )));
        }
        if self.is_truthy() {
            then_branch.clone()
        } else {
            else_branch.clone()
        }
    }
}

macro_rules! binary_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        #[allow(
            clippy::should_implement_trait,
            reason = "operators on items yield items, not bools"
        )]
        impl Item {
            $(
                pub fn $name(&self, that: &Item) -> Item {
                    self.binary(BinaryOp::$op, that)
                }
            )*
        }
    };
}

macro_rules! unary_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        #[allow(
            clippy::should_implement_trait,
            reason = "operators on items yield items, not bools"
        )]
        impl Item {
            $(
                pub fn $name(&self) -> Item {
                    self.unary(UnaryOp::$op)
                }
            )*
        }
    };
}

binary_ops! {
    or => Or,
    and => And,
    bitwise_or => BitwiseOr,
    bitwise_xor => BitwiseXor,
    bitwise_and => BitwiseAnd,
    lt => Lt,
    le => Le,
    eq => Eq,
    ne => Ne,
    ge => Ge,
    gt => Gt,
    plus => Plus,
    minus => Minus,
    times => Times,
    divide => Divide,
    modulo => Modulo,
}

unary_ops! {
    not => Not,
    bitwise_not => BitwiseNot,
    negative => Negative,
    positive => Positive,
    inverse => Inverse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Record, Selector};
    use pretty_assertions::assert_eq;

    fn item(v: impl Into<Item>) -> Item {
        v.into()
    }

    #[test]
    fn numeric_arithmetic() {
        assert_eq!(item(2).plus(&item(3)), item(5));
        assert_eq!(item(2).minus(&item(3)), item(-1));
        assert_eq!(item(2).times(&item(3)), item(6));
        assert_eq!(item(3).divide(&item(2)), item(1.5));
        assert_eq!(item(7).modulo(&item(4)), item(3));
        assert_eq!(item(4).negative(), item(-4));
        assert_eq!(item(4).inverse(), item(0.25));
    }

    #[test]
    fn text_concatenation() {
        assert_eq!(item("foo").plus(&item("bar")), item("foobar"));
        assert_eq!(item("foo").minus(&item("bar")), Item::absent());
    }

    #[test]
    fn mismatched_kinds_are_absent() {
        assert_eq!(item(1).plus(&item("x")), Item::absent());
        assert_eq!(item(true).times(&item(2)), Item::absent());
        assert_eq!(
            item(Record::of([1, 2])).plus(&item(1)),
            Item::absent()
        );
        assert_eq!(item("x").negative(), Item::absent());
    }

    #[test]
    fn bitwise_on_nums_and_bools() {
        assert_eq!(item(6).bitwise_and(&item(3)), item(2));
        assert_eq!(item(true).bitwise_xor(&item(true)), item(false));
        assert_eq!(item(true).bitwise_or(&item(false)), item(true));
        assert_eq!(item(0).bitwise_not(), item(-1));
    }

    #[test]
    fn logic_returns_operands() {
        assert_eq!(item(0).or(&item(5)), item(0));
        assert_eq!(Item::absent().or(&item(5)), item(5));
        assert_eq!(item(false).and(&item(5)), item(false));
        assert_eq!(item(1).and(&item(5)), item(5));
        assert_eq!(Item::absent().not(), item(true));
        assert_eq!(item(1).conditional(&item("y"), &item("n")), item("y"));
        assert_eq!(item(false).conditional(&item("y"), &item("n")), item("n"));
    }

    #[test]
    fn comparisons_are_total() {
        assert_eq!(item(1).lt(&item(2)), item(true));
        assert_eq!(item(2).le(&item(2)), item(true));
        assert_eq!(item(1).eq(&item(1)), item(true));
        assert_eq!(item(1).ne(&item("1")), item(true));
        // Text orders before Num, everything before Absent.
        assert_eq!(item("z").lt(&item(0)), item(true));
        assert_eq!(item(0).gt(&Item::absent()), item(false));
        assert_eq!(Item::absent().eq(&Item::absent()), item(true));
    }

    #[test]
    fn field_keeps_key() {
        let field = Item::slot("n", 2);
        assert_eq!(field.times(&item(4)), Item::slot("n", 8));
        assert_eq!(item(4).times(&field), item(8));
        assert_eq!(Item::attr("n", 2).negative(), Item::attr("n", -2));
    }

    #[test]
    fn non_constant_operands_build_operators() {
        let sel = item(Selector::identity().get("x"));
        let built = sel.plus(&item(1));
        assert_eq!(
            built,
            item(Operator::binary(BinaryOp::Plus, sel.clone(), 1))
        );
        assert!(!built.is_constant());
        assert_eq!(sel.not(), item(Operator::unary(UnaryOp::Not, sel.clone())));
    }
}
