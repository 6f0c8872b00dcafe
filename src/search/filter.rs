//! Predicate translation into search filter clauses.
//!
//! Connectives render left to right with every operand parenthesized, so
//! `AND(a, OR(b, c))` becomes `(a) AND ((b) OR (c))`. Operands of one
//! connective are never regrouped by precedence.

use crate::access::Value;
use crate::expression::{Expression, Operator, Unsupported};
use crate::search::escape::search_escape;

/// Renders filter conditions against a fixed view of field names.
#[derive(Debug, Clone, Copy)]
pub struct FilterTranslator<'a> {
    field_names: &'a [String],
}

impl<'a> FilterTranslator<'a> {
    /// `field_names[i]` is the remote name of `FieldRef(i)`
    pub fn new(field_names: &'a [String]) -> Self {
        Self { field_names }
    }

    /// Translate a whole filter condition.
    ///
    /// Any node without a search spelling rejects the entire condition;
    /// a partial clause is never returned.
    pub fn translate(&self, condition: &Expression) -> Result<String, Unsupported> {
        match condition {
            Expression::Call { op, operands } => {
                let mut out = String::new();
                self.render_call(op, operands, &mut out)?;
                Ok(out)
            }
            _ => Err(Unsupported::ExpectedPredicate {
                operator: "filter".to_string(),
            }),
        }
    }

    fn render_call(
        &self,
        op: &Operator,
        operands: &[Expression],
        out: &mut String,
    ) -> Result<(), Unsupported> {
        let text = op.search_text().ok_or_else(|| Unsupported::Operator {
            operator: op.to_string(),
        })?;

        match op {
            Operator::Not => {
                let [operand] = operands else {
                    return Err(arity(op, 1, operands.len()));
                };
                out.push_str(" NOT ");
                self.render_nested(op, operand, out)
            }
            Operator::And | Operator::Or => {
                if operands.len() < 2 {
                    return Err(arity(op, 2, operands.len()));
                }
                for (i, operand) in operands.iter().enumerate() {
                    self.render_nested(op, operand, out)?;
                    if i != operands.len() - 1 {
                        out.push(' ');
                        out.push_str(text);
                        out.push(' ');
                    }
                }
                Ok(())
            }
            _ => self.render_comparison(op, text, operands, out),
        }
    }

    fn render_nested(
        &self,
        parent: &Operator,
        operand: &Expression,
        out: &mut String,
    ) -> Result<(), Unsupported> {
        match operand {
            Expression::Call { op, operands } => {
                out.push('(');
                self.render_call(op, operands, out)?;
                out.push(')');
                Ok(())
            }
            _ => Err(Unsupported::ExpectedPredicate {
                operator: parent.to_string(),
            }),
        }
    }

    fn render_comparison(
        &self,
        op: &Operator,
        text: &str,
        operands: &[Expression],
        out: &mut String,
    ) -> Result<(), Unsupported> {
        let [left, right] = operands else {
            return Err(arity(op, 2, operands.len()));
        };

        match (left, right) {
            (Expression::FieldRef(index), Expression::Literal(value)) => {
                let name = self.field_names.get(*index).ok_or(Unsupported::FieldOutOfRange {
                    index: *index,
                    width: self.field_names.len(),
                })?;
                let literal = render_literal(op, value)?;
                out.push_str(name);
                out.push_str(text);
                out.push_str(&literal);
                Ok(())
            }
            (_, Expression::FieldRef(_)) => Err(Unsupported::FieldOnRight {
                operator: op.to_string(),
            }),
            (Expression::FieldRef(_), _) => Err(Unsupported::ExpectedLiteral {
                operator: op.to_string(),
            }),
            _ => Err(Unsupported::ExpectedField {
                operator: op.to_string(),
            }),
        }
    }
}

fn render_literal(op: &Operator, value: &Value) -> Result<String, Unsupported> {
    match value {
        Value::String(s) if *op == Operator::Like => Ok(search_escape(&s.replace('%', "*"))),
        Value::String(s) => Ok(search_escape(s)),
        other => other.numeric_text().ok_or(Unsupported::LiteralType {
            data_type: other.data_type(),
        }),
    }
}

fn arity(op: &Operator, expected: usize, actual: usize) -> Unsupported {
    Unsupported::Arity {
        operator: op.to_string(),
        expected,
        actual,
    }
}
