//! Reasons an expression cannot be pushed into a search string.

use crate::access::DataType;
use thiserror::Error;

/// A shape the search language has no spelling for.
///
/// These are ordinary "rule does not apply" outcomes, never failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Unsupported {
    #[error("operator {operator} has no search form")]
    Operator { operator: String },

    #[error("operator {operator} expects {expected} operands, got {actual}")]
    Arity {
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error("operator {operator} requires a field reference as its first operand")]
    ExpectedField { operator: String },

    #[error("operator {operator} must be written as field=value, found a field on the right")]
    FieldOnRight { operator: String },

    #[error("operator {operator} requires a literal as its second operand")]
    ExpectedLiteral { operator: String },

    #[error("operands of {operator} must be predicates")]
    ExpectedPredicate { operator: String },

    #[error("literal of type {} has no search form", type_name(.data_type))]
    LiteralType { data_type: Option<DataType> },

    #[error("field index {index} out of range for row of width {width}")]
    FieldOutOfRange { index: usize, width: usize },

    #[error("projection expression at position {position} is not a field reference")]
    ComputedProjection { position: usize },
}

fn type_name(data_type: &Option<DataType>) -> String {
    match data_type {
        Some(data_type) => data_type.to_string(),
        None => "NULL".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display() {
        let err = Unsupported::Operator {
            operator: "IS NULL".to_string(),
        };
        assert_eq!(err.to_string(), "operator IS NULL has no search form");

        let err = Unsupported::Arity {
            operator: "=".to_string(),
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "operator = expects 2 operands, got 3");

        let err = Unsupported::LiteralType {
            data_type: Some(DataType::Boolean),
        };
        assert_eq!(err.to_string(), "literal of type BOOLEAN has no search form");

        let err = Unsupported::LiteralType { data_type: None };
        assert_eq!(err.to_string(), "literal of type NULL has no search form");

        let err = Unsupported::FieldOutOfRange { index: 4, width: 2 };
        assert_eq!(
            err.to_string(),
            "field index 4 out of range for row of width 2"
        );
    }
}
