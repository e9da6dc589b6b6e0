use crate::{Item, Value};

/// Binary operators, lowest precedence first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitwiseOr => "|",
            BinaryOp::BitwiseXor => "^",
            BinaryOp::BitwiseAnd => "&",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Ge => ">=",
            BinaryOp::Gt => ">",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        }
    }

    /// `&&` and `||` evaluate their right operand lazily.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::Or | BinaryOp::And)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnaryOp {
    Not,
    BitwiseNot,
    Negative,
    Positive,
    Inverse,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitwiseNot => "~",
            UnaryOp::Negative => "-",
            UnaryOp::Positive => "+",
            UnaryOp::Inverse => "1/",
        }
    }
}

/// A deferred operation over items.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Binary {
        op: BinaryOp,
        lhs: Box<Item>,
        rhs: Box<Item>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Item>,
    },
    Conditional {
        test: Box<Item>,
        then_branch: Box<Item>,
        else_branch: Box<Item>,
    },
    /// Call of a lambda with an argument value.
    Invoke { func: Box<Value>, args: Box<Value> },
}

impl Operator {
    pub fn binary(op: BinaryOp, lhs: impl Into<Item>, rhs: impl Into<Item>) -> Operator {
        Operator::Binary {
            op,
            lhs: Box::new(lhs.into()),
            rhs: Box::new(rhs.into()),
        }
    }

    pub fn unary(op: UnaryOp, operand: impl Into<Item>) -> Operator {
        Operator::Unary {
            op,
            operand: Box::new(operand.into()),
        }
    }

    pub fn conditional(
        test: impl Into<Item>,
        then_branch: impl Into<Item>,
        else_branch: impl Into<Item>,
    ) -> Operator {
        Operator::Conditional {
            test: Box::new(test.into()),
            then_branch: Box::new(then_branch.into()),
            else_branch: Box::new(else_branch.into()),
        }
    }

    pub fn invoke(func: impl Into<Value>, args: impl Into<Value>) -> Operator {
        Operator::Invoke {
            func: Box::new(func.into()),
            args: Box::new(args.into()),
        }
    }
}
