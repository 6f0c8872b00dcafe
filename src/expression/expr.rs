//! Expression AST definitions.

use crate::access::Value;
use crate::expression::operator::Operator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Value of the input row at the given position
    FieldRef(usize),

    /// Literal constant value
    Literal(Value),

    /// Operator applied to an ordered operand list
    Call {
        op: Operator,
        operands: Vec<Expression>,
    },
}

impl Expression {
    /// Create a field reference expression
    pub fn field(index: usize) -> Self {
        Expression::FieldRef(index)
    }

    /// Create a literal expression
    pub fn literal(value: Value) -> Self {
        Expression::Literal(value)
    }

    /// Create a string literal expression
    pub fn string(value: impl Into<String>) -> Self {
        Expression::Literal(Value::String(value.into()))
    }

    /// Create an integer literal expression
    pub fn int32(value: i32) -> Self {
        Expression::Literal(Value::Int32(value))
    }

    /// Create a call expression
    pub fn call(op: Operator, operands: Vec<Expression>) -> Self {
        Expression::Call { op, operands }
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::call(Operator::Eq, vec![left, right])
    }

    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::call(Operator::Ne, vec![left, right])
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::call(Operator::Lt, vec![left, right])
    }

    pub fn le(left: Expression, right: Expression) -> Self {
        Self::call(Operator::Le, vec![left, right])
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::call(Operator::Gt, vec![left, right])
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::call(Operator::Ge, vec![left, right])
    }

    pub fn like(left: Expression, pattern: Expression) -> Self {
        Self::call(Operator::Like, vec![left, pattern])
    }

    /// Create an AND over any number of predicates
    pub fn and(operands: Vec<Expression>) -> Self {
        Self::call(Operator::And, operands)
    }

    /// Create an OR over any number of predicates
    pub fn or(operands: Vec<Expression>) -> Self {
        Self::call(Operator::Or, operands)
    }

    /// Create a NOT expression
    pub fn not_expr(operand: Expression) -> Self {
        Self::call(Operator::Not, vec![operand])
    }

    /// Index of the referenced field if this is a plain field reference
    pub fn as_field_ref(&self) -> Option<usize> {
        match self {
            Expression::FieldRef(index) => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::FieldRef(index) => write!(f, "${}", index),
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Call { op, operands } => {
                write!(f, "{}(", op)?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                f.write_str(")")
            }
        }
    }
}
