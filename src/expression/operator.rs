//! Operator definitions for expressions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operators a host call expression can carry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,

    // Logical
    And,
    Or,
    Not,

    // Not pushable
    Add,
    Sub,
    Mul,
    Div,
    IsNull,
    IsNotNull,
    In,
    Cast,
    Other(String),
}

impl Operator {
    /// Whether the search language has a form for this operator
    pub fn is_pushable(&self) -> bool {
        self.search_text().is_some()
    }

    /// Text of this operator inside a search filter.
    ///
    /// `LIKE` is spelled `=` (its value carries `*` wildcards) and `<>` is
    /// spelled `!=`.
    pub fn search_text(&self) -> Option<&'static str> {
        match self {
            Operator::Eq | Operator::Like => Some("="),
            Operator::Ne => Some("!="),
            Operator::Lt => Some("<"),
            Operator::Le => Some("<="),
            Operator::Gt => Some(">"),
            Operator::Ge => Some(">="),
            Operator::And => Some("AND"),
            Operator::Or => Some("OR"),
            Operator::Not => Some("NOT"),
            Operator::Add
            | Operator::Sub
            | Operator::Mul
            | Operator::Div
            | Operator::IsNull
            | Operator::IsNotNull
            | Operator::In
            | Operator::Cast
            | Operator::Other(_) => None,
        }
    }

    /// Get the SQL display string for this operator
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Like => "LIKE",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::In => "IN",
            Operator::Cast => "CAST",
            Operator::Other(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
